//! Read-only queries over a parsed page.
//!
//! Every lookup the extractors make is built from a few primitives:
//! first descendant matching a predicate, next text sibling, next matching
//! element in document order, and the copies tree repair splits off an
//! element. None of them fail; a miss is `None` or empty.

use scraper::{ElementRef, Html};

pub struct Document {
    html: Html,
}

impl Document {
    pub fn parse(text: &str) -> Self {
        Document {
            html: Html::parse_document(text),
        }
    }

    /// All elements matching `m`, in document order.
    pub fn select_all<'a>(&'a self, m: &'a ElementMatch) -> impl Iterator<Item = ElementRef<'a>> + 'a {
        self.html
            .root_element()
            .descendants()
            .filter_map(ElementRef::wrap)
            .filter(move |el| m.matches(el))
    }
}

/// Tag name plus exact attribute values, optionally requiring one class token.
#[derive(Debug, Clone, Copy)]
pub struct ElementMatch {
    tag: &'static str,
    attrs: &'static [(&'static str, &'static str)],
    class: Option<&'static str>,
}

impl ElementMatch {
    pub const fn tag(tag: &'static str) -> Self {
        ElementMatch {
            tag,
            attrs: &[],
            class: None,
        }
    }

    pub const fn attrs(self, attrs: &'static [(&'static str, &'static str)]) -> Self {
        ElementMatch { attrs, ..self }
    }

    pub const fn class(self, class: &'static str) -> Self {
        ElementMatch {
            class: Some(class),
            ..self
        }
    }

    pub fn matches(&self, el: &ElementRef<'_>) -> bool {
        let e = el.value();
        e.name().eq_ignore_ascii_case(self.tag)
            && self.attrs.iter().all(|(k, v)| e.attr(k) == Some(*v))
            && self.class.map_or(true, |c| e.classes().any(|token| token == c))
    }
}

/// First element matching `m` that starts after `from` in document order.
/// Descendants of `from` come first, then the following siblings of `from`
/// and of each ancestor; the search is not bounded by any block.
pub fn find_next<'a>(from: ElementRef<'a>, m: &ElementMatch) -> Option<ElementRef<'a>> {
    let following = std::iter::once(*from)
        .chain(from.ancestors())
        .flat_map(|node| node.next_siblings())
        .flat_map(|sibling| sibling.descendants());
    from.descendants()
        .skip(1)
        .chain(following)
        .filter_map(ElementRef::wrap)
        .find(|el| m.matches(el))
}

/// Copies of `el` that HTML tree repair moved into its following siblings.
///
/// Closing `<font>` while a `<p>` inside it is still open makes the parser
/// lift the `<p>` out and give it a fresh copy of the font as first child,
/// so the rest of the font's text lives there.
pub fn split_continuations<'a>(el: ElementRef<'a>, m: &'a ElementMatch) -> impl Iterator<Item = ElementRef<'a>> + 'a {
    el.next_siblings()
        .map_while(|sibling| sibling.first_child().and_then(ElementRef::wrap))
        .take_while(move |copy| m.matches(copy))
}

/// First proper descendant of `el` satisfying `pred`.
pub fn first_descendant<'a, P>(el: ElementRef<'a>, pred: P) -> Option<ElementRef<'a>>
where
    P: Fn(&ElementRef<'a>) -> bool,
{
    el.descendants()
        .skip(1)
        .filter_map(ElementRef::wrap)
        .find(|d| pred(d))
}

/// Concatenated text of every descendant text node.
pub fn text_of(el: ElementRef<'_>) -> String {
    el.text().collect()
}

/// First following sibling that is a text node, skipping element siblings.
pub fn next_text_sibling<'a>(el: ElementRef<'a>) -> Option<&'a str> {
    el.next_siblings()
        .find_map(|node| node.value().as_text().map(|t| &**t))
}

/// The immediately following sibling, only if it is a text node.
pub fn adjacent_text<'a>(el: ElementRef<'a>) -> Option<&'a str> {
    el.next_sibling()?.value().as_text().map(|t| &**t)
}
