use scraper::ElementRef;

use super::dom::{self, Document, ElementMatch};

/// Layout container the forum uses for every article and comment.
pub const POST_TABLE: ElementMatch = ElementMatch::tag("table").attrs(&[
    ("width", "100%"),
    ("cellpadding", "3"),
    ("cellspacing", "0"),
]);

/// One candidate post: a view into the page tree, not a standalone value.
#[derive(Clone, Copy)]
pub struct PostBlock<'a> {
    element: ElementRef<'a>,
}

impl<'a> PostBlock<'a> {
    /// First element inside the block matching `m`.
    pub fn find(&self, m: &ElementMatch) -> Option<ElementRef<'a>> {
        dom::first_descendant(self.element, |el| m.matches(el))
    }

    pub fn find_where<P>(&self, pred: P) -> Option<ElementRef<'a>>
    where
        P: Fn(&ElementRef<'a>) -> bool,
    {
        dom::first_descendant(self.element, pred)
    }

    /// Next element matching `m` after `from`, anywhere later in the page.
    pub fn find_next(&self, from: ElementRef<'a>, m: &ElementMatch) -> Option<ElementRef<'a>> {
        dom::find_next(from, m)
    }
}

/// Every post container in the page, in document order. Nested matches are
/// each reported; no filtering is done here.
pub fn locate(doc: &Document) -> Vec<PostBlock<'_>> {
    doc.select_all(&POST_TABLE)
        .map(|element| PostBlock { element })
        .collect()
}
