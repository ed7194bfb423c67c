// ABOUTME: Strategy descriptors for the article extraction cascade and their default priority order.
// ABOUTME: Each descriptor pairs a selection rule with an acceptance threshold and runs against any PageTree.

//! Extraction strategies.
//!
//! A strategy is plain data: which nodes to look at and how much text they
//! must yield to be accepted. The order of the list returned by
//! [`default_strategies`] is the heuristic: semantic markup is trusted more
//! than class-name conventions, which are trusted more than raw paragraph
//! harvesting, which beats dumping the whole main region.

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::dom::cleaners::{clean_text, trim_text, utf16_len, word_count};
use crate::dom::{PageNode, PageTree};

/// Semantic article container.
pub const ARTICLE_SELECTOR: &str = "article";

/// Common article-body markup, in priority order.
pub const CONTAINER_SELECTORS: &[&str] = &[
    ".article-body",
    ".article-content",
    ".story-body",
    ".news-article",
    ".entry-content",
    ".post-content",
    r#"[itemprop="articleBody"]"#,
    ".story",
    ".content",
];

pub const MAIN_SELECTOR: &str = "main";
pub const BODY_SELECTOR: &str = "body";
pub const PARAGRAPH_SELECTOR: &str = "p";

/// Article and container text must have strictly more tokens than this.
pub const MIN_ARTICLE_WORDS: usize = 50;

/// Paragraphs must have strictly more trimmed UTF-16 units than this.
pub const MIN_PARAGRAPH_CHARS: usize = 20;

/// Fallback text needs at least this many tokens.
pub const MIN_FALLBACK_WORDS: usize = 20;

/// Which cascade step produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    SemanticTag,
    ContainerClass,
    Paragraphs,
    Fallback,
}

/// One step of the extraction cascade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StrategyDescriptor {
    /// Longest node matching `selector` (first wins ties), cleaned, more than `min_words` tokens.
    SemanticTag { selector: String, min_words: usize },
    /// First match of each selector in order, cleaned, more than `min_words` tokens.
    ContainerClass {
        selectors: Vec<String>,
        min_words: usize,
    },
    /// Trimmed paragraphs of the main region longer than `min_chars`, joined by a blank line.
    Paragraphs { min_chars: usize },
    /// Cleaned text of the whole main region, at least `min_words` tokens.
    Fallback { min_words: usize },
}

impl StrategyDescriptor {
    pub fn semantic_tag() -> Self {
        StrategyDescriptor::SemanticTag {
            selector: ARTICLE_SELECTOR.to_string(),
            min_words: MIN_ARTICLE_WORDS,
        }
    }

    pub fn container_class() -> Self {
        StrategyDescriptor::ContainerClass {
            selectors: CONTAINER_SELECTORS.iter().map(|s| s.to_string()).collect(),
            min_words: MIN_ARTICLE_WORDS,
        }
    }

    pub fn paragraphs() -> Self {
        StrategyDescriptor::Paragraphs {
            min_chars: MIN_PARAGRAPH_CHARS,
        }
    }

    pub fn fallback() -> Self {
        StrategyDescriptor::Fallback {
            min_words: MIN_FALLBACK_WORDS,
        }
    }

    pub fn kind(&self) -> StrategyKind {
        match self {
            StrategyDescriptor::SemanticTag { .. } => StrategyKind::SemanticTag,
            StrategyDescriptor::ContainerClass { .. } => StrategyKind::ContainerClass,
            StrategyDescriptor::Paragraphs { .. } => StrategyKind::Paragraphs,
            StrategyDescriptor::Fallback { .. } => StrategyKind::Fallback,
        }
    }

    /// CSS selectors this strategy queries.
    pub fn selectors(&self) -> Vec<&str> {
        match self {
            StrategyDescriptor::SemanticTag { selector, .. } => vec![selector.as_str()],
            StrategyDescriptor::ContainerClass { selectors, .. } => {
                selectors.iter().map(String::as_str).collect()
            }
            StrategyDescriptor::Paragraphs { .. } => {
                vec![MAIN_SELECTOR, BODY_SELECTOR, PARAGRAPH_SELECTOR]
            }
            StrategyDescriptor::Fallback { .. } => vec![MAIN_SELECTOR, BODY_SELECTOR],
        }
    }

    /// Run this strategy. `None` means "not accepted, try the next one".
    pub fn try_extract<T: PageTree>(&self, tree: &T) -> Option<String> {
        match self {
            StrategyDescriptor::SemanticTag {
                selector,
                min_words,
            } => longest_node_text(tree, selector)
                .map(|text| clean_text(&text))
                .filter(|text| word_count(text) > *min_words),
            StrategyDescriptor::ContainerClass {
                selectors,
                min_words,
            } => selectors.iter().find_map(|selector| {
                let node = tree.query_first(selector)?;
                let text = clean_text(&node.text_content());
                trace!(selector = %selector, words = word_count(&text), "container candidate");
                (word_count(&text) > *min_words).then_some(text)
            }),
            StrategyDescriptor::Paragraphs { min_chars } => {
                let region = main_region(tree)?;
                let paragraphs: Vec<String> = region
                    .query_all(PARAGRAPH_SELECTOR)
                    .iter()
                    .filter_map(|p| {
                        let text = p.text_content();
                        let trimmed = trim_text(&text);
                        (utf16_len(trimmed) > *min_chars).then(|| trimmed.to_string())
                    })
                    .collect();
                if paragraphs.is_empty() {
                    None
                } else {
                    Some(paragraphs.join("\n\n"))
                }
            }
            StrategyDescriptor::Fallback { min_words } => {
                let region = main_region(tree)?;
                let text = clean_text(&region.text_content());
                (word_count(&text) >= *min_words).then_some(text)
            }
        }
    }
}

/// The canonical cascade order.
pub fn default_strategies() -> Vec<StrategyDescriptor> {
    vec![
        StrategyDescriptor::semantic_tag(),
        StrategyDescriptor::container_class(),
        StrategyDescriptor::paragraphs(),
        StrategyDescriptor::fallback(),
    ]
}

/// `main` if present, otherwise `body`.
fn main_region<T: PageTree>(tree: &T) -> Option<T::Node<'_>> {
    tree.query_first(MAIN_SELECTOR)
        .or_else(|| tree.query_first(BODY_SELECTOR))
}

/// Raw text of the matching node with the most UTF-16 units; earliest node wins ties.
fn longest_node_text<T: PageTree>(tree: &T, selector: &str) -> Option<String> {
    let mut best: Option<(usize, String)> = None;
    for node in tree.query_all(selector) {
        let text = node.text_content();
        let len = utf16_len(&text);
        if best.as_ref().map_or(true, |(best_len, _)| len > *best_len) {
            best = Some((len, text));
        }
    }
    best.map(|(_, text)| text)
}
