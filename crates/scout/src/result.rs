// ABOUTME: AnalysisReport: the extracted article, the classifier's prediction, and its rendered verdict.
// ABOUTME: Includes plain-text formatting and a text preview helper.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::classifier::Prediction;
use crate::extractors::strategy::StrategyKind;
use crate::render::RenderModel;

/// Preview length in chars.
pub const PREVIEW_CHARS: usize = 200;

/// Outcome of analyzing one page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub url: String,
    pub strategy: StrategyKind,
    pub word_count: usize,
    pub characters: usize,
    pub text_preview: String,
    pub prediction: Prediction,
    pub render: RenderModel,
    pub analyzed_at: DateTime<Utc>,
}

impl AnalysisReport {
    /// Format the report for a terminal.
    pub fn format_text(&self) -> String {
        let mut parts = Vec::new();
        if !self.url.is_empty() {
            parts.push(format!("Source: {}", self.url));
        }
        parts.push(self.render.to_text());
        if let Some(ref label) = self.prediction.prediction_label {
            parts.push(format!("Label: {}", label));
        }
        if self.render.damped {
            parts.push(format!(
                "(display-adjusted from {:.1}%)",
                self.render.raw_percentage
            ));
        }
        parts.push(format!(
            "Analyzed {} words via {:?}",
            self.word_count, self.strategy
        ));
        parts.join("\n")
    }
}

/// First [`PREVIEW_CHARS`] chars of `text`, with `...` when cut.
pub fn text_preview(text: &str) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(PREVIEW_CHARS).collect();
    if chars.next().is_some() {
        format!("{}...", head)
    } else {
        head
    }
}
