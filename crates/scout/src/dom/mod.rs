// ABOUTME: Read-only page tree abstraction the extractor runs against.
// ABOUTME: Declares PageTree/PageNode and re-exports the dom_query-backed HtmlPage.

//! DOM access for content extraction.
//!
//! The extractor never touches `dom_query` directly. It sees a page through
//! two small traits: [`PageTree`] answers "all nodes matching S" and "first
//! node matching S", [`PageNode`] exposes flattened text and a scoped
//! descendant query. Neither trait has mutating operations.

pub mod cleaners;
pub mod page;

pub use page::{HtmlNode, HtmlPage};

/// A single element of a page tree.
pub trait PageNode: Sized {
    /// Flattened text of the node and all of its descendants.
    fn text_content(&self) -> String;

    /// Descendants of this node matching `selector`, in document order.
    fn query_all(&self, selector: &str) -> Vec<Self>;
}

/// A parsed, read-only page.
pub trait PageTree {
    type Node<'a>: PageNode
    where
        Self: 'a;

    /// All nodes matching `selector`, in document order.
    ///
    /// An unparseable selector matches nothing.
    fn query_all(&self, selector: &str) -> Vec<Self::Node<'_>>;

    /// First node matching `selector` in document order.
    fn query_first(&self, selector: &str) -> Option<Self::Node<'_>> {
        self.query_all(selector).into_iter().next()
    }
}
