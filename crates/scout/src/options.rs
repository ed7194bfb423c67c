// ABOUTME: Configuration for the scout Client: network settings, classifier endpoint, render policy, extractor.
// ABOUTME: ClientBuilder provides a fluent API for constructing Client instances with custom settings.

use std::collections::HashMap;
use std::time::Duration;

use crate::classifier::{Backend, DEFAULT_ENDPOINT};
use crate::client::Client;
use crate::extractors::content::Extractor;
use crate::render::{Damping, LabelMapping, RenderPolicy};

/// Configuration options for the scout client.
#[derive(Debug, Clone)]
pub struct Options {
    /// Per-request timeout for page fetches and classifier calls.
    pub timeout: Duration,
    pub user_agent: String,
    pub allow_private_networks: bool,
    /// Headers sent with page fetches.
    pub headers: HashMap<String, String>,
    pub http_client: Option<reqwest::Client>,
    pub endpoint: String,
    pub backend: Backend,
    /// Headers sent with classifier calls only (auth tokens and the like).
    pub classifier_headers: HashMap<String, String>,
    pub render_policy: RenderPolicy,
    pub extractor: Extractor,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            user_agent: "Scout/1.0".to_string(),
            allow_private_networks: false,
            headers: HashMap::new(),
            http_client: None,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            backend: Backend::Analyze,
            classifier_headers: HashMap::new(),
            // The analysis server emits 0 = Real.
            render_policy: RenderPolicy::new(LabelMapping::ZeroIsFactual),
            extractor: Extractor::default(),
        }
    }
}

/// Builder for constructing Client instances with custom configuration.
#[derive(Debug, Clone)]
pub struct ClientBuilder {
    opts: Options,
}

impl ClientBuilder {
    /// Create a new ClientBuilder with default options.
    pub fn new() -> Self {
        Self {
            opts: Options::default(),
        }
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.opts.timeout = timeout;
        self
    }

    /// Set the User-Agent header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.opts.user_agent = user_agent.into();
        self
    }

    /// Allow or disallow page fetches from private networks.
    pub fn allow_private_networks(mut self, allow: bool) -> Self {
        self.opts.allow_private_networks = allow;
        self
    }

    /// Use a custom HTTP client.
    pub fn http_client(mut self, client: reqwest::Client) -> Self {
        self.opts.http_client = Some(client);
        self
    }

    /// Add a custom header to page fetches.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.opts.headers.insert(key.into(), value.into());
        self
    }

    /// Set the classifier base endpoint.
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.opts.endpoint = endpoint.into();
        self
    }

    /// Set the classifier backend.
    pub fn backend(mut self, backend: Backend) -> Self {
        self.opts.backend = backend;
        self
    }

    /// Add a header to classifier calls.
    pub fn classifier_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.opts.classifier_headers.insert(key.into(), value.into());
        self
    }

    /// Send `Authorization: Bearer {token}` to the classifier.
    pub fn api_token(self, token: impl AsRef<str>) -> Self {
        let value = format!("Bearer {}", token.as_ref());
        self.classifier_header("Authorization", value)
    }

    /// Replace the render policy.
    pub fn render_policy(mut self, policy: RenderPolicy) -> Self {
        self.opts.render_policy = policy;
        self
    }

    /// Pin the prediction-code-to-label direction.
    pub fn label_mapping(mut self, mapping: LabelMapping) -> Self {
        self.opts.render_policy.label_mapping = mapping;
        self
    }

    /// Enable or disable display damping.
    pub fn damping(mut self, damping: Option<Damping>) -> Self {
        self.opts.render_policy.damping = damping;
        self
    }

    /// Use a custom extraction cascade.
    pub fn extractor(mut self, extractor: Extractor) -> Self {
        self.opts.extractor = extractor;
        self
    }

    /// Build the Client with the configured options.
    pub fn build(self) -> Client {
        Client::new(self.opts)
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
