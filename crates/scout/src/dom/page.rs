// ABOUTME: dom_query implementation of the PageTree/PageNode traits.
// ABOUTME: Selectors go through the shared compiled-matcher cache.

use dom_query::{Document, Selection};

use super::{PageNode, PageTree};
use crate::extractors::compiled::get_or_compile;

/// An HTML document parsed with `dom_query`.
pub struct HtmlPage {
    doc: Document,
}

impl HtmlPage {
    /// Parse an HTML string. html5ever always synthesizes `html`/`body`,
    /// so even fragments get a body region.
    pub fn parse(html: &str) -> Self {
        Self {
            doc: Document::from(html),
        }
    }

    /// Access the underlying document.
    pub fn document(&self) -> &Document {
        &self.doc
    }
}

impl From<Document> for HtmlPage {
    fn from(doc: Document) -> Self {
        Self { doc }
    }
}

/// One element of an [`HtmlPage`].
#[derive(Clone)]
pub struct HtmlNode<'a> {
    sel: Selection<'a>,
}

impl<'a> HtmlNode<'a> {
    fn collect(sel: Selection<'a>) -> Vec<HtmlNode<'a>> {
        sel.nodes()
            .iter()
            .map(|node| HtmlNode {
                sel: Selection::from(node.clone()),
            })
            .collect()
    }

    /// Lowercase tag name of the element, if it is one.
    pub fn tag_name(&self) -> Option<String> {
        self.sel
            .nodes()
            .first()
            .and_then(|n| n.node_name())
            .map(|t| t.to_lowercase())
    }
}

impl PageNode for HtmlNode<'_> {
    fn text_content(&self) -> String {
        self.sel.text().to_string()
    }

    fn query_all(&self, selector: &str) -> Vec<Self> {
        match get_or_compile(selector) {
            Some(matcher) => HtmlNode::collect(self.sel.select_matcher(&matcher)),
            None => Vec::new(),
        }
    }
}

impl PageTree for HtmlPage {
    type Node<'a> = HtmlNode<'a>;

    fn query_all(&self, selector: &str) -> Vec<HtmlNode<'_>> {
        match get_or_compile(selector) {
            Some(matcher) => HtmlNode::collect(self.doc.select_matcher(&matcher)),
            None => Vec::new(),
        }
    }

    fn query_first(&self, selector: &str) -> Option<HtmlNode<'_>> {
        let matcher = get_or_compile(selector)?;
        let sel = self.doc.select_matcher(&matcher);
        sel.nodes().first().map(|node| HtmlNode {
            sel: Selection::from(node.clone()),
        })
    }
}
