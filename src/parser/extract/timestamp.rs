//! Time and date of a post.
//!
//! Article headers put the date as plain text right after the red time
//! node; comment headers put it after a small light-grey spacer font
//! somewhere further on. Both layouts are tried, in that order.

use scraper::ElementRef;

use super::non_empty;
use crate::parser::blocks::PostBlock;
use crate::parser::dom::{self, ElementMatch};

pub const STAMP_ANCHOR: ElementMatch = ElementMatch::tag("font").attrs(&[("color", "black")]);
pub const TIME: ElementMatch = ElementMatch::tag("font").attrs(&[("color", "red")]);
pub const DATE_MARKER: ElementMatch =
    ElementMatch::tag("font").attrs(&[("color", "#eeeeee"), ("size", "1")]);

#[derive(Debug, Default, PartialEq, Eq)]
pub struct Timestamp {
    pub time: Option<String>,
    pub date: Option<String>,
}

pub fn extract(block: &PostBlock<'_>) -> Timestamp {
    let Some(time_node) = block
        .find(&STAMP_ANCHOR)
        .and_then(|anchor| block.find_next(anchor, &TIME))
    else {
        return Timestamp::default();
    };

    Timestamp {
        time: non_empty(&dom::text_of(time_node)),
        date: sibling_date(time_node).or_else(|| marker_date(block, time_node)),
    }
}

fn sibling_date(time_node: ElementRef<'_>) -> Option<String> {
    dom::next_text_sibling(time_node).and_then(non_empty)
}

fn marker_date<'a>(block: &PostBlock<'a>, time_node: ElementRef<'a>) -> Option<String> {
    let marker = block.find_next(time_node, &DATE_MARKER)?;
    dom::adjacent_text(marker).and_then(non_empty)
}
