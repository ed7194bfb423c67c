// ABOUTME: Wire types and HTTP calls for the remote text classifier.
// ABOUTME: Posts extracted text to /analyze (or a detector model endpoint) and probes /health.

//! Classifier client.
//!
//! Two backends are understood:
//! - [`Backend::Analyze`]: the fact-check server. `POST {endpoint}/analyze`
//!   with `{ "text", "source_url" }`, answering `{ prediction, confidence, ... }`.
//! - [`Backend::Detector`]: a hosted text-classification model (the
//!   human vs. AI-generated variant). `POST {endpoint}` with `{ "inputs" }`,
//!   answering `[[{ "label", "score" }, ...]]` sorted by score.
//!
//! Each call is one request. Nothing is retried.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::ScoutError;

/// Default classifier endpoint (the analysis server's default bind).
pub const DEFAULT_ENDPOINT: &str = "http://localhost:5000";

/// Which request/response shape the endpoint speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Backend {
    #[default]
    Analyze,
    Detector,
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Backend::Analyze => "analyze",
            Backend::Detector => "detector",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for Backend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "analyze" | "server" => Ok(Backend::Analyze),
            "detector" | "huggingface" | "hf" => Ok(Backend::Detector),
            other => Err(format!(
                "unknown backend '{}', expected analyze or detector",
                other
            )),
        }
    }
}

/// Body of an analyze request.
#[derive(Debug, Clone, Serialize)]
pub struct AnalyzeRequest<'a> {
    pub text: &'a str,
    pub source_url: &'a str,
}

/// Classifier verdict.
///
/// `prediction` and `confidence` are the contract. The other fields are
/// echoed by the analysis server and may be absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub prediction: u8,
    pub confidence: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prediction_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence_percentage: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_preview: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub characters_analyzed: Option<u64>,
}

impl Prediction {
    pub fn new(prediction: u8, confidence: f64) -> Self {
        Self {
            prediction,
            confidence,
            prediction_label: None,
            confidence_percentage: None,
            text_preview: None,
            source_url: None,
            characters_analyzed: None,
        }
    }

    /// Reject codes other than 0/1 and confidences outside [0, 1].
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.prediction > 1 {
            anyhow::bail!("prediction must be 0 or 1, got {}", self.prediction);
        }
        if !(0.0..=1.0).contains(&self.confidence) {
            anyhow::bail!("confidence must be within [0, 1], got {}", self.confidence);
        }
        Ok(())
    }
}

/// One label/score pair from a detector model.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LabelScore {
    pub label: String,
    pub score: f64,
}

impl LabelScore {
    /// Map a detector label onto the 0/1 prediction code.
    ///
    /// `Real`/`Human`/`LABEL_0` are 0; `Fake`/`AI`/`LABEL_1` are 1.
    fn prediction_code(&self) -> Option<u8> {
        match self.label.to_lowercase().as_str() {
            "real" | "human" | "label_0" => Some(0),
            "fake" | "ai" | "machine" | "label_1" => Some(1),
            _ => None,
        }
    }
}

/// Answer of `GET {endpoint}/health`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub model_loaded: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy" && self.model_loaded
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// Where and how to reach the classifier.
#[derive(Debug, Clone)]
pub struct ClassifyOptions {
    pub endpoint: String,
    pub backend: Backend,
    pub headers: HashMap<String, String>,
}

impl Default for ClassifyOptions {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            backend: Backend::Analyze,
            headers: HashMap::new(),
        }
    }
}

impl ClassifyOptions {
    fn route(&self, path: &str) -> Result<String, ScoutError> {
        let base = self.endpoint.trim_end_matches('/');
        let target = if path.is_empty() {
            base.to_string()
        } else {
            format!("{}/{}", base, path)
        };
        url::Url::parse(&target).map_err(|e| {
            ScoutError::invalid_url(
                &self.endpoint,
                "Classify",
                Some(anyhow::anyhow!("invalid classifier endpoint: {}", e)),
            )
        })?;
        Ok(target)
    }
}

/// Send `text` to the classifier and decode its verdict.
pub async fn classify(
    client: &reqwest::Client,
    text: &str,
    source_url: &str,
    opts: &ClassifyOptions,
) -> Result<Prediction, ScoutError> {
    let target = match opts.backend {
        Backend::Analyze => opts.route("analyze")?,
        Backend::Detector => opts.route("")?,
    };

    let mut request = client.post(&target);
    for (key, value) in &opts.headers {
        request = request.header(key, value);
    }
    request = match opts.backend {
        Backend::Analyze => request.json(&AnalyzeRequest { text, source_url }),
        Backend::Detector => request.json(&serde_json::json!({ "inputs": text })),
    };

    debug!(endpoint = %target, backend = %opts.backend, chars = text.chars().count(), "classifying");
    let response = request
        .send()
        .await
        .map_err(|e| ScoutError::from_request(&target, "Classify", e))?;

    let status = response.status();
    let body = response.bytes().await.map_err(|e| {
        ScoutError::classify(
            &target,
            "Classify",
            Some(anyhow::anyhow!("failed to read body: {}", e)),
        )
    })?;

    if !status.is_success() {
        let message = serde_json::from_slice::<ErrorBody>(&body)
            .map(|b| b.error)
            .unwrap_or_else(|_| String::from_utf8_lossy(&body).trim().to_string());
        warn!(status = status.as_u16(), %message, "classifier rejected request");
        return Err(ScoutError::classify(
            &target,
            "Classify",
            Some(anyhow::anyhow!("HTTP status {}: {}", status.as_u16(), message)),
        ));
    }

    let prediction = match opts.backend {
        Backend::Analyze => decode_prediction(&body),
        Backend::Detector => decode_detector(&body),
    }
    .map_err(|e| ScoutError::invalid_response(&target, "Classify", Some(e)))?;

    prediction
        .validate()
        .map_err(|e| ScoutError::invalid_response(&target, "Classify", Some(e)))?;
    Ok(prediction)
}

/// Probe the analysis server's health route.
///
/// Both 200 (healthy) and 500 (unhealthy) carry a [`HealthStatus`] body.
pub async fn health(
    client: &reqwest::Client,
    opts: &ClassifyOptions,
) -> Result<HealthStatus, ScoutError> {
    let target = opts.route("health")?;
    let mut request = client.get(&target);
    for (key, value) in &opts.headers {
        request = request.header(key, value);
    }

    let response = request
        .send()
        .await
        .map_err(|e| ScoutError::from_request(&target, "Health", e))?;
    let status = response.status().as_u16();
    let body = response.bytes().await.map_err(|e| {
        ScoutError::classify(
            &target,
            "Health",
            Some(anyhow::anyhow!("failed to read body: {}", e)),
        )
    })?;

    match status {
        200 | 500 => serde_json::from_slice(&body).map_err(|e| {
            ScoutError::invalid_response(
                &target,
                "Health",
                Some(anyhow::anyhow!("malformed health body: {}", e)),
            )
        }),
        other => Err(ScoutError::classify(
            &target,
            "Health",
            Some(anyhow::anyhow!("HTTP status {}", other)),
        )),
    }
}

fn decode_prediction(body: &[u8]) -> anyhow::Result<Prediction> {
    serde_json::from_slice(body)
        .map_err(|e| anyhow::anyhow!("malformed classifier body: {}", e))
}

fn decode_detector(body: &[u8]) -> anyhow::Result<Prediction> {
    let batches: Vec<Vec<LabelScore>> = serde_json::from_slice(body)
        .map_err(|e| anyhow::anyhow!("malformed detector body: {}", e))?;
    let top = batches
        .into_iter()
        .next()
        .and_then(|scores| scores.into_iter().next())
        .ok_or_else(|| anyhow::anyhow!("detector returned no scores"))?;
    let code = top
        .prediction_code()
        .ok_or_else(|| anyhow::anyhow!("unknown detector label '{}'", top.label))?;

    let mut prediction = Prediction::new(code, top.score);
    prediction.prediction_label = Some(top.label);
    Ok(prediction)
}
