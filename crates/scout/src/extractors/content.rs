// ABOUTME: The article Extractor: runs strategy descriptors in priority order and returns the first accepted text.
// ABOUTME: Provides extract()/extract_html() convenience entry points over the default cascade.

//! Article body extraction.
//!
//! Key behaviors:
//! - Strategies run strictly in list order; the first one to accept wins and
//!   nothing after it is evaluated.
//! - The only failure is [`ExtractError::NoContentFound`], returned once the
//!   whole list has been exhausted.
//! - The page is never mutated and nothing is remembered between calls.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::dom::cleaners::word_count;
use crate::dom::{HtmlPage, PageTree};
use crate::error::ExtractError;
use crate::extractors::compiled::precompile_selectors;
use crate::extractors::strategy::{default_strategies, StrategyDescriptor, StrategyKind};

static DEFAULT_EXTRACTOR: Lazy<Extractor> = Lazy::new(Extractor::default);

/// Successfully extracted article text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Extraction {
    pub text: String,
    pub strategy: StrategyKind,
    pub word_count: usize,
}

/// An ordered strategy cascade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Extractor {
    strategies: Vec<StrategyDescriptor>,
}

impl Default for Extractor {
    fn default() -> Self {
        Self {
            strategies: default_strategies(),
        }
    }
}

impl Extractor {
    /// The canonical cascade.
    pub fn new() -> Self {
        Self::default()
    }

    /// A cascade with a caller-chosen order.
    pub fn with_strategies(strategies: Vec<StrategyDescriptor>) -> Self {
        Self { strategies }
    }

    /// Load a cascade from a JSON array of strategy descriptors.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn strategies(&self) -> &[StrategyDescriptor] {
        &self.strategies
    }

    /// Compile every selector the cascade uses and return the ones that do not parse.
    ///
    /// An unparseable selector silently matches nothing during extraction.
    pub fn invalid_selectors(&self) -> Vec<String> {
        precompile_selectors(self.strategies.iter().flat_map(|s| s.selectors()))
    }

    /// Extract article text from a page tree.
    pub fn extract<T: PageTree>(&self, tree: &T) -> Result<Extraction, ExtractError> {
        for strategy in &self.strategies {
            let kind = strategy.kind();
            match strategy.try_extract(tree) {
                Some(text) => {
                    let words = word_count(&text);
                    debug!(strategy = ?kind, words, "strategy accepted");
                    return Ok(Extraction {
                        text,
                        strategy: kind,
                        word_count: words,
                    });
                }
                None => debug!(strategy = ?kind, "strategy rejected"),
            }
        }
        Err(ExtractError::NoContentFound)
    }

    /// Parse `html` and extract from it.
    pub fn extract_html(&self, html: &str) -> Result<Extraction, ExtractError> {
        let page = HtmlPage::parse(html);
        self.extract(&page)
    }
}

/// Extract with the default cascade.
pub fn extract<T: PageTree>(tree: &T) -> Result<Extraction, ExtractError> {
    DEFAULT_EXTRACTOR.extract(tree)
}

/// Parse `html` and extract with the default cascade.
pub fn extract_html(html: &str) -> Result<Extraction, ExtractError> {
    DEFAULT_EXTRACTOR.extract_html(html)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::PageNode;
    use pretty_assertions::assert_eq;

    fn words(prefix: &str, n: usize) -> String {
        (0..n)
            .map(|i| format!("{}{:03}", prefix, i))
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn page(body: &str) -> HtmlPage {
        HtmlPage::parse(&format!(
            "<!DOCTYPE html><html><head><title>t</title></head><body>{}</body></html>",
            body
        ))
    }

    #[test]
    fn article_tag_wins_over_everything() {
        let html = format!(
            r#"<div class="article-body">{}</div><article>{}</article><main><p>{}</p></main>"#,
            words("c", 200),
            words("a", 60),
            words("p", 100)
        );
        let result = extract(&page(&html)).unwrap();
        assert_eq!(result.strategy, StrategyKind::SemanticTag);
        assert_eq!(result.text, words("a", 60));
        assert_eq!(result.word_count, 60);
    }

    #[test]
    fn longest_article_is_chosen() {
        let html = format!(
            "<article>{}</article><article>{}</article>",
            words("s", 55),
            words("l", 80)
        );
        let result = extract(&page(&html)).unwrap();
        assert_eq!(result.text, words("l", 80));
    }

    #[test]
    fn article_length_tie_goes_to_first() {
        let html = format!(
            "<article>{}</article><article>{}</article>",
            words("x", 60),
            words("y", 60)
        );
        let result = extract(&page(&html)).unwrap();
        assert_eq!(result.text, words("x", 60));
    }

    #[test]
    fn article_length_counts_utf16_units() {
        // 101 chars but 152 UTF-16 units, against 119 of each.
        let emoji = vec!["\u{1F600}"; 51].join(" ");
        let html = format!(
            "<article>{}</article><article>{}</article>",
            emoji,
            vec!["bb"; 40].join(" ")
        );
        let result = extract(&page(&html)).unwrap();
        assert_eq!(result.strategy, StrategyKind::SemanticTag);
        assert_eq!(result.text, emoji);
        assert_eq!(result.word_count, 51);
    }

    #[test]
    fn paragraph_threshold_counts_utf16_units() {
        // 11 chars, 22 UTF-16 units.
        let emoji = "\u{1F600}".repeat(11);
        let result = extract(&page(&format!("<main><p>{}</p></main>", emoji))).unwrap();
        assert_eq!(result.strategy, StrategyKind::Paragraphs);
        assert_eq!(result.text, emoji);
    }

    #[test]
    fn article_text_is_cleaned() {
        let html = format!(
            "<article>\n   <h1>Title</h1>\n\n   <p>{}</p>\n</article>",
            words("w", 55)
        );
        let result = extract(&page(&html)).unwrap();
        assert_eq!(result.text, format!("Title {}", words("w", 55)));
    }

    #[test]
    fn short_article_falls_through_to_containers() {
        let html = format!(
            r#"<article>{}</article><div class="entry-content">{}</div>"#,
            words("a", 10),
            words("e", 70)
        );
        let result = extract(&page(&html)).unwrap();
        assert_eq!(result.strategy, StrategyKind::ContainerClass);
        assert_eq!(result.text, words("e", 70));
    }

    #[test]
    fn first_listed_selector_beats_larger_later_match() {
        // .content is earlier in the document and much larger, but .article-body
        // has priority in the selector list.
        let html = format!(
            r#"<div class="content">{}</div><div class="article-body">{}</div>"#,
            words("c", 300),
            words("b", 51)
        );
        let result = extract(&page(&html)).unwrap();
        assert_eq!(result.strategy, StrategyKind::ContainerClass);
        assert_eq!(result.text, words("b", 51));
    }

    #[test]
    fn itemprop_selector_matches() {
        let html = format!(
            r#"<section itemprop="articleBody">{}</section>"#,
            words("i", 64)
        );
        let result = extract(&page(&html)).unwrap();
        assert_eq!(result.strategy, StrategyKind::ContainerClass);
        assert_eq!(result.text, words("i", 64));
    }

    #[test]
    fn only_first_match_of_a_selector_is_considered() {
        let html = format!(
            r#"<div class="story-body">too short</div><div class="story-body">{}</div>"#,
            words("s", 80)
        );
        let result = extract(&page(&html)).unwrap();
        // Container strategy rejects; no paragraphs; the whole body is the fallback.
        assert_eq!(result.strategy, StrategyKind::Fallback);
        assert_eq!(result.text, format!("too short{}", words("s", 80)));
    }

    #[test]
    fn paragraphs_joined_in_document_order() {
        let html = r#"
            <nav><p>This navigation paragraph is long enough</p></nav>
            <main>
                <p>  The first paragraph of the story.  </p>
                <p>Short one</p>
                <div><p>The second paragraph, nested in a div.</p></div>
            </main>
        "#;
        let result = extract(&page(html)).unwrap();
        assert_eq!(result.strategy, StrategyKind::Paragraphs);
        assert_eq!(
            result.text,
            "The first paragraph of the story.\n\nThe second paragraph, nested in a div."
        );
        assert!(result.word_count < 50);
    }

    #[test]
    fn paragraphs_use_body_without_main() {
        let html = r#"
            <header><p>Site header with a long tagline</p></header>
            <div><p>Body paragraph that should be kept.</p></div>
        "#;
        let result = extract(&page(html)).unwrap();
        assert_eq!(
            result.text,
            "Site header with a long tagline\n\nBody paragraph that should be kept."
        );
    }

    #[test]
    fn short_paragraphs_fall_back_to_region_text() {
        let html = format!(
            "<main><p>Tiny note</p> <div>{}</div></main><footer>{}</footer>",
            words("m", 25),
            words("f", 5)
        );
        let result = extract(&page(&html)).unwrap();
        assert_eq!(result.strategy, StrategyKind::Fallback);
        assert_eq!(result.text, format!("Tiny note {}", words("m", 25)));
    }

    #[test]
    fn too_little_text_is_no_content() {
        let html = format!("<main><p>Hi</p><div>{}</div></main>", words("z", 10));
        let err = extract(&page(&html)).unwrap_err();
        assert_eq!(err, ExtractError::NoContentFound);
    }

    #[test]
    fn empty_document_is_no_content() {
        assert_eq!(extract_html(""), Err(ExtractError::NoContentFound));
    }

    #[test]
    fn reordered_chain_changes_winner() {
        let html = format!(
            "<article><p>{}</p></article><p>A separate paragraph outside the article.</p>",
            words("a", 60)
        );
        let doc = page(&html);

        let default = extract(&doc).unwrap();
        assert_eq!(default.strategy, StrategyKind::SemanticTag);

        let paragraphs_first = Extractor::with_strategies(vec![
            StrategyDescriptor::paragraphs(),
            StrategyDescriptor::semantic_tag(),
        ]);
        let result = paragraphs_first.extract(&doc).unwrap();
        assert_eq!(result.strategy, StrategyKind::Paragraphs);
        assert_eq!(
            result.text,
            format!("{}\n\nA separate paragraph outside the article.", words("a", 60))
        );
    }

    #[test]
    fn empty_chain_finds_nothing() {
        let extractor = Extractor::with_strategies(Vec::new());
        let doc = page(&format!("<article>{}</article>", words("a", 100)));
        assert_eq!(extractor.extract(&doc), Err(ExtractError::NoContentFound));
    }

    #[test]
    fn extractor_loads_from_json() {
        let extractor =
            Extractor::from_json(r#"[{"type": "fallback", "min_words": 2}]"#).unwrap();
        assert_eq!(extractor.strategies().len(), 1);
        let result = extractor.extract_html("<p>two words</p>").unwrap();
        assert_eq!(result.strategy, StrategyKind::Fallback);
        assert_eq!(result.text, "two words");
    }

    #[test]
    fn invalid_selectors_are_reported() {
        assert!(Extractor::default().invalid_selectors().is_empty());

        let extractor = Extractor::with_strategies(vec![StrategyDescriptor::ContainerClass {
            selectors: vec![".story".to_string(), "div[[".to_string()],
            min_words: 50,
        }]);
        assert_eq!(extractor.invalid_selectors(), vec!["div[[".to_string()]);
    }

    #[test]
    fn default_extractor_serializes_as_array() {
        let json = serde_json::to_value(Extractor::default()).unwrap();
        let array = json.as_array().expect("transparent over the strategy list");
        assert_eq!(array.len(), 4);
        assert_eq!(array[0]["type"], "semantic_tag");
        assert_eq!(array[3]["min_words"], 20);
    }

    /// A tree with no `main` and no `body`.
    struct BareTree {
        articles: Vec<String>,
    }

    #[derive(Clone)]
    struct BareNode(String);

    impl PageNode for BareNode {
        fn text_content(&self) -> String {
            self.0.clone()
        }

        fn query_all(&self, _selector: &str) -> Vec<Self> {
            Vec::new()
        }
    }

    impl PageTree for BareTree {
        type Node<'a> = BareNode;

        fn query_all(&self, selector: &str) -> Vec<BareNode> {
            if selector == "article" {
                self.articles.iter().cloned().map(BareNode).collect()
            } else {
                Vec::new()
            }
        }
    }

    #[test]
    fn custom_tree_without_regions() {
        let tree = BareTree {
            articles: vec![words("t", 70)],
        };
        let result = extract(&tree).unwrap();
        assert_eq!(result.text, words("t", 70));

        let empty = BareTree {
            articles: vec!["few words".to_string()],
        };
        assert_eq!(extract(&empty), Err(ExtractError::NoContentFound));
    }
}
