pub mod blocks;
pub mod dom;
pub mod extract;

use crate::record::PageRecord;
use dom::Document;

/// Decoded page text → located post blocks → extracted posts → page record.
pub fn parse_page(text: &str) -> PageRecord {
    let doc = Document::parse(text);
    let posts = blocks::locate(&doc)
        .iter()
        .map(extract::extract_post)
        .collect();
    PageRecord::assemble(posts)
}
