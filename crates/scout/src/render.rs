// ABOUTME: Pure rendering of a classifier Prediction into a display-ready RenderModel.
// ABOUTME: Label mapping direction and percentage damping are explicit, independent RenderPolicy knobs.

//! Verdict rendering.
//!
//! [`render`] is a pure function of a [`Prediction`] and a [`RenderPolicy`].
//! Applying the resulting [`RenderModel`] to a surface (terminal text, JSON)
//! is a separate step and never feeds back into the model.
//!
//! Two conventions exist for what prediction code `0` means, so the mapping
//! is always chosen by the caller. Damping is a display-only adjustment: the
//! model keeps the raw percentage next to the displayed one.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::classifier::Prediction;

/// Displayed percentage at or above which the tier is [`Tier::High`].
pub const HIGH_TIER_THRESHOLD: f64 = 75.0;

/// Displayed percentage at or above which the tier is [`Tier::Medium`].
pub const MEDIUM_TIER_THRESHOLD: f64 = 55.0;

/// Which label the numeric prediction code `0` stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LabelMapping {
    /// 0 = factual/real, 1 = misleading/fake.
    ZeroIsFactual,
    /// 0 = misleading/fake, 1 = factual/real.
    ZeroIsMisleading,
}

impl LabelMapping {
    pub fn verdict(self, prediction: u8) -> Verdict {
        let zero = prediction == 0;
        match (self, zero) {
            (LabelMapping::ZeroIsFactual, true) | (LabelMapping::ZeroIsMisleading, false) => {
                Verdict::Factual
            }
            _ => Verdict::Misleading,
        }
    }
}

impl fmt::Display for LabelMapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LabelMapping::ZeroIsFactual => "zero-is-factual",
            LabelMapping::ZeroIsMisleading => "zero-is-misleading",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for LabelMapping {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "zero-is-factual" | "factual" => Ok(LabelMapping::ZeroIsFactual),
            "zero-is-misleading" | "misleading" | "inverted" => Ok(LabelMapping::ZeroIsMisleading),
            other => Err(format!(
                "unknown label mapping '{}', expected zero-is-factual or zero-is-misleading",
                other
            )),
        }
    }
}

/// The factual/misleading label axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Factual,
    Misleading,
}

impl Verdict {
    pub fn headline(self) -> &'static str {
        match self {
            Verdict::Factual => "This article likely contains factual information.",
            Verdict::Misleading => "This article may contain misleading information.",
        }
    }
}

/// Coarse confidence bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    High,
    Medium,
    Low,
}

impl Tier {
    pub fn from_percentage(percentage: f64) -> Self {
        if percentage >= HIGH_TIER_THRESHOLD {
            Tier::High
        } else if percentage >= MEDIUM_TIER_THRESHOLD {
            Tier::Medium
        } else {
            Tier::Low
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Tier::High => "high",
            Tier::Medium => "medium",
            Tier::Low => "low",
        }
    }

    fn title(self) -> &'static str {
        match self {
            Tier::High => "High",
            Tier::Medium => "Medium",
            Tier::Low => "Low",
        }
    }
}

/// Display-only shrink of low percentages.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Damping {
    /// Percentages strictly below this are damped.
    pub below: f64,
    pub factor: f64,
}

impl Default for Damping {
    fn default() -> Self {
        Self {
            below: 60.0,
            factor: 0.8,
        }
    }
}

impl Damping {
    pub fn applies_to(&self, percentage: f64) -> bool {
        percentage < self.below
    }

    pub fn apply(&self, percentage: f64) -> f64 {
        if self.applies_to(percentage) {
            percentage * self.factor
        } else {
            percentage
        }
    }
}

/// How a prediction is presented.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RenderPolicy {
    pub label_mapping: LabelMapping,
    #[serde(default)]
    pub damping: Option<Damping>,
}

impl RenderPolicy {
    /// A policy with the given label mapping and no damping.
    pub fn new(label_mapping: LabelMapping) -> Self {
        Self {
            label_mapping,
            damping: None,
        }
    }

    pub fn with_damping(mut self, damping: Damping) -> Self {
        self.damping = Some(damping);
        self
    }
}

/// Everything a surface needs to show a verdict.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderModel {
    pub verdict: Verdict,
    pub tier: Tier,
    /// confidence × 100, untouched.
    pub raw_percentage: f64,
    /// Percentage after any presentation transform; the tier is derived from this.
    pub percentage: f64,
    pub damped: bool,
    /// Style bucket, e.g. `result-high-risk`.
    pub theme: String,
    /// e.g. "Medium confidence" or "High risk".
    pub caption: String,
    pub headline: String,
}

impl RenderModel {
    pub fn score_line(&self) -> String {
        format!("Confidence: {:.1}%", self.percentage)
    }

    /// Plain terminal rendering.
    pub fn to_text(&self) -> String {
        [
            self.headline.clone(),
            self.caption.clone(),
            self.score_line(),
        ]
        .join("\n")
    }
}

/// Derive the display model for a prediction.
pub fn render(prediction: &Prediction, policy: &RenderPolicy) -> RenderModel {
    let verdict = policy.label_mapping.verdict(prediction.prediction);
    let raw_percentage = prediction.confidence * 100.0;
    let percentage = policy
        .damping
        .map_or(raw_percentage, |d| d.apply(raw_percentage));
    let tier = Tier::from_percentage(percentage);

    let noun = match verdict {
        Verdict::Factual => "confidence",
        Verdict::Misleading => "risk",
    };

    RenderModel {
        verdict,
        tier,
        raw_percentage,
        percentage,
        damped: policy
            .damping
            .is_some_and(|d| d.applies_to(raw_percentage)),
        theme: format!("result-{}-{}", tier.as_str(), noun),
        caption: format!("{} {}", tier.title(), noun),
        headline: verdict.headline().to_string(),
    }
}
