use std::sync::LazyLock;

use regex::Regex;
use scraper::ElementRef;

use crate::parser::blocks::PostBlock;
use crate::parser::dom;
use crate::record::ReplyTo;

static ANCHOR_HREF_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"#\d+$").unwrap());

fn is_reply_link(el: &ElementRef<'_>) -> bool {
    let e = el.value();
    e.name() == "a" && e.attr("href").is_some_and(|href| ANCHOR_HREF_RE.is_match(href))
}

/// Last word of the first in-page anchor link, e.g. "הודעה 42" -> 42.
pub fn extract(block: &PostBlock<'_>) -> Option<ReplyTo> {
    let link = block.find_where(is_reply_link)?;
    let text = dom::text_of(link);
    text.split_whitespace().last().map(ReplyTo::from_token)
}
