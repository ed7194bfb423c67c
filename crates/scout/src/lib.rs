// ABOUTME: Main library entry point for scout, a news article fact-check client.
// ABOUTME: Re-exports the public API: Client, the extractor cascade, classifier types, and the verdict renderer.

//! Scout - extract the article from a news page and ask a classifier about it.
//!
//! The pipeline is fetch → extract → classify → render. Extraction is a
//! synchronous heuristic cascade over a read-only page tree; classification
//! is one HTTP call; rendering is a pure function of the prediction and a
//! [`RenderPolicy`].
//!
//! # Example
//!
//! ```no_run
//! use newsfact_scout::{Client, ScoutError};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), ScoutError> {
//!     let client = Client::builder().endpoint("http://localhost:5000").build();
//!     let report = client.analyze("https://example.com/article").await?;
//!     println!("{}", report.format_text());
//!     Ok(())
//! }
//! ```
//!
//! Extraction alone needs no network:
//!
//! ```
//! let html = format!("<article>{}</article>", "word ".repeat(60));
//! let extraction = newsfact_scout::extract_html(&html).unwrap();
//! assert_eq!(extraction.word_count, 60);
//! ```

pub mod classifier;
pub mod client;
pub mod dom;
pub mod error;
pub mod extractors;
pub mod options;
pub mod render;
pub mod resource;
pub mod result;

pub use crate::classifier::{Backend, HealthStatus, Prediction};
pub use crate::client::Client;
pub use crate::dom::{HtmlPage, PageNode, PageTree};
pub use crate::error::{ErrorCode, ExtractError, ScoutError};
pub use crate::extractors::content::{extract, extract_html, Extraction, Extractor};
pub use crate::extractors::strategy::{StrategyDescriptor, StrategyKind};
pub use crate::options::{ClientBuilder, Options};
pub use crate::render::{render, Damping, LabelMapping, RenderModel, RenderPolicy, Tier, Verdict};
pub use crate::result::AnalysisReport;
