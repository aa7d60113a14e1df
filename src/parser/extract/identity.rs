use std::sync::LazyLock;

use regex::Regex;

use crate::parser::blocks::PostBlock;
use crate::parser::dom::{self, ElementMatch};

pub const IDENTITY: ElementMatch = ElementMatch::tag("font").attrs(&[
    ("size", "2"),
    ("face", "Arial"),
    ("color", "#000099"),
]);

const BOLD: ElementMatch = ElementMatch::tag("b");

// "member since DD.MM.YY" / "N posts"
static JOIN_DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"חבר מתאריך (\d{1,2}\.\d{1,2}\.\d{2,4})").unwrap());
static POST_COUNT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\d+) הודעות").unwrap());

#[derive(Debug, Default, PartialEq, Eq)]
pub struct Identity {
    pub username: Option<String>,
    pub join_date: Option<String>,
    pub post_count: Option<u64>,
}

/// `None` means the block has no identity block at all.
pub fn extract(block: &PostBlock<'_>) -> Option<Identity> {
    let info = block.find(&IDENTITY)?;
    let text = dom::text_of(info);

    let username = dom::first_descendant(info, |el| BOLD.matches(el))
        .map(dom::text_of)
        .filter(|name| !name.trim().is_empty());
    let join_date = JOIN_DATE_RE
        .captures(&text)
        .map(|caps| caps[1].to_string());
    let post_count = POST_COUNT_RE
        .captures(&text)
        .and_then(|caps| caps[1].parse().ok());

    Some(Identity {
        username,
        join_date,
        post_count,
    })
}
