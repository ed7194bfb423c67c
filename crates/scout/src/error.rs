// ABOUTME: Error types for scout: the extractor's NoContentFound and the categorized ScoutError.
// ABOUTME: ScoutError carries an ErrorCode plus url/op context, with convenience constructors and boolean helpers.

use std::fmt;

/// The only way article extraction can fail.
///
/// Raised after every strategy in the cascade, fallback included, has
/// rejected the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ExtractError {
    #[error("could not identify article content on this page")]
    NoContentFound,
}

/// Error codes representing different categories of scout failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    InvalidUrl,
    Fetch,
    Timeout,
    Ssrf,
    NoContent,
    Classify,
    InvalidResponse,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorCode::InvalidUrl => "invalid URL",
            ErrorCode::Fetch => "fetch error",
            ErrorCode::Timeout => "timeout",
            ErrorCode::Ssrf => "SSRF blocked",
            ErrorCode::NoContent => "no article content found",
            ErrorCode::Classify => "classifier error",
            ErrorCode::InvalidResponse => "invalid classifier response",
        };
        write!(f, "{}", s)
    }
}

/// The main error type for fetch, extract and classify operations.
#[derive(Debug, thiserror::Error)]
pub struct ScoutError {
    pub code: ErrorCode,
    pub url: String,
    pub op: String,
    #[source]
    pub source: Option<anyhow::Error>,
}

impl fmt::Display for ScoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "scout: {} {}: {}", self.op, self.url, self.code)?;
        if let Some(ref src) = self.source {
            write!(f, ": {}", src)?;
        }
        Ok(())
    }
}

impl ScoutError {
    fn new(
        code: ErrorCode,
        url: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self {
            code,
            url: url.into(),
            op: op.into(),
            source,
        }
    }

    /// Create an InvalidUrl error.
    pub fn invalid_url(
        url: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self::new(ErrorCode::InvalidUrl, url, op, source)
    }

    /// Create a Fetch error.
    pub fn fetch(
        url: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self::new(ErrorCode::Fetch, url, op, source)
    }

    /// Create a Timeout error.
    pub fn timeout(
        url: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self::new(ErrorCode::Timeout, url, op, source)
    }

    /// Create an SSRF error.
    pub fn ssrf(
        url: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self::new(ErrorCode::Ssrf, url, op, source)
    }

    /// Create a NoContent error wrapping the extractor failure.
    pub fn no_content(url: impl Into<String>, op: impl Into<String>, err: ExtractError) -> Self {
        Self::new(ErrorCode::NoContent, url, op, Some(anyhow::Error::new(err)))
    }

    /// Create a Classify error.
    pub fn classify(
        url: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self::new(ErrorCode::Classify, url, op, source)
    }

    /// Create an InvalidResponse error.
    pub fn invalid_response(
        url: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self::new(ErrorCode::InvalidResponse, url, op, source)
    }

    /// Map a reqwest transport failure to Timeout or Classify.
    pub(crate) fn from_request(
        url: impl Into<String>,
        op: impl Into<String>,
        err: reqwest::Error,
    ) -> Self {
        if err.is_timeout() {
            Self::timeout(url, op, Some(anyhow::Error::new(err)))
        } else {
            Self::classify(
                url,
                op,
                Some(anyhow::anyhow!("request failed: {}", err)),
            )
        }
    }

    /// Returns true if this is a Timeout error.
    pub fn is_timeout(&self) -> bool {
        self.code == ErrorCode::Timeout
    }

    /// Returns true if this is an SSRF error.
    pub fn is_ssrf(&self) -> bool {
        self.code == ErrorCode::Ssrf
    }

    /// Returns true if this is a Fetch error.
    pub fn is_fetch(&self) -> bool {
        self.code == ErrorCode::Fetch
    }

    /// Returns true if this is a NoContent error.
    pub fn is_no_content(&self) -> bool {
        self.code == ErrorCode::NoContent
    }

    /// Returns true if this is an InvalidUrl error.
    pub fn is_invalid_url(&self) -> bool {
        self.code == ErrorCode::InvalidUrl
    }

    /// Returns true if this is a Classify error.
    pub fn is_classify(&self) -> bool {
        self.code == ErrorCode::Classify
    }

    /// Returns true if this is an InvalidResponse error.
    pub fn is_invalid_response(&self) -> bool {
        self.code == ErrorCode::InvalidResponse
    }
}
