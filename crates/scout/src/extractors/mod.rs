// ABOUTME: Article text extraction: the strategy cascade, its descriptors, and the selector cache.
// ABOUTME: Everything here is synchronous and read-only over the page tree.

//! Content extraction module.
//!
//! Submodules:
//! - `content`: the [`Extractor`](content::Extractor) that walks the cascade.
//! - `strategy`: strategy descriptors and the default priority order.
//! - `compiled`: process-wide compiled selector cache.

pub mod compiled;
pub mod content;
pub mod strategy;
