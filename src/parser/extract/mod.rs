pub mod identity;
pub mod reply;
pub mod timestamp;

use super::blocks::PostBlock;
use super::dom::{self, ElementMatch};
use crate::record::Post;

pub const TITLE: ElementMatch = ElementMatch::tag("h1").class("text16b");
pub const CONTENT: ElementMatch = ElementMatch::tag("font").class("text15");

/// Runs every field rule against one block. Rules are independent; a miss
/// in one leaves only its own fields unset.
pub fn extract_post(block: &PostBlock<'_>) -> Post {
    let mut post = Post::default();

    if let Some(id) = identity::extract(block) {
        post.username = id.username;
        post.join_date = id.join_date;
        post.post_count = id.post_count;
        post.has_identity = true;
    }

    let stamp = timestamp::extract(block);
    post.time = stamp.time;
    post.date = stamp.date;

    post.article_title = trimmed_text(block, &TITLE);
    post.content = content(block);
    post.reply_to = reply::extract(block);
    post
}

fn trimmed_text(block: &PostBlock<'_>, m: &ElementMatch) -> Option<String> {
    block.find(m).and_then(|el| non_empty(&dom::text_of(el)))
}

/// Body text, including the parts tree repair moved out of the font when
/// it was closed over an open paragraph.
fn content(block: &PostBlock<'_>) -> Option<String> {
    let body = block.find(&CONTENT)?;
    let mut text = dom::text_of(body);
    for copy in dom::split_continuations(body, &CONTENT) {
        text.push_str(&dom::text_of(copy));
    }
    non_empty(&text)
}

/// Trimmed copy of `s`, or `None` when nothing but whitespace is left.
pub(crate) fn non_empty(s: &str) -> Option<String> {
    let t = s.trim();
    (!t.is_empty()).then(|| t.to_string())
}
