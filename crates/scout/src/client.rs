// ABOUTME: The main Client for scout: fetches pages, extracts article text, classifies it, and renders the verdict.
// ABOUTME: Provides async analyze()/analyze_html() plus the individual extract, classify, health and render steps.

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use chrono::Utc;
use reqwest::dns::{Addrs, Name, Resolve, Resolving};
use tracing::{debug, info, warn};

use crate::classifier::{self, ClassifyOptions, HealthStatus, Prediction};
use crate::dom::cleaners::utf16_len;
use crate::dom::HtmlPage;
use crate::error::ScoutError;
use crate::extractors::content::Extraction;
use crate::options::{ClientBuilder, Options};
use crate::render::{render, RenderModel};
use crate::resource::{fetch, is_private_ip, FetchOptions};
use crate::result::{text_preview, AnalysisReport};

const MAX_REDIRECTS: usize = 10;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// The scout client.
#[derive(Debug, Clone)]
pub struct Client {
    opts: Options,
    http_client: reqwest::Client,
    classifier_client: reqwest::Client,
    fetch_opts: FetchOptions,
    classify_opts: ClassifyOptions,
}

/// Reject redirects to private IP literals unless the caller allows them.
///
/// Hostname targets are checked when they are resolved, by [`PublicResolver`].
fn redirect_policy(allow_private: bool) -> reqwest::redirect::Policy {
    reqwest::redirect::Policy::custom(move |attempt| {
        if attempt.previous().len() >= MAX_REDIRECTS {
            return attempt.error("too many redirects");
        }
        if allow_private {
            return attempt.follow();
        }
        let blocked = attempt
            .url()
            .host_str()
            .map(|host| host.trim_start_matches('[').trim_end_matches(']'))
            .and_then(|bare| bare.parse::<IpAddr>().ok())
            .is_some_and(|ip| is_private_ip(&ip));
        if blocked {
            attempt.error("redirect to private IP blocked")
        } else {
            attempt.follow()
        }
    })
}

/// DNS resolver that drops private addresses, so no hop of a request
/// (redirects included) can connect to one.
#[derive(Debug, Clone, Copy, Default)]
struct PublicResolver;

impl Resolve for PublicResolver {
    fn resolve(&self, name: Name) -> Resolving {
        let host = name.as_str().to_string();
        Box::pin(async move {
            let addrs: Vec<SocketAddr> = tokio::net::lookup_host((host.as_str(), 0))
                .await
                .map_err(|e| -> BoxError { Box::new(e) })?
                .filter(|addr| !is_private_ip(&addr.ip()))
                .collect();
            if addrs.is_empty() {
                return Err(BoxError::from(format!(
                    "{} resolves only to private addresses",
                    host
                )));
            }
            Ok::<Addrs, BoxError>(Box::new(addrs.into_iter()))
        })
    }
}

fn build_http_client(opts: &Options, public_only: bool) -> reqwest::Client {
    let mut builder = reqwest::Client::builder();
    if public_only {
        builder = builder.dns_resolver(Arc::new(PublicResolver));
    }
    builder
        .redirect(redirect_policy(opts.allow_private_networks))
        .user_agent(&opts.user_agent)
        .timeout(opts.timeout)
        .cookie_store(true)
        .gzip(true)
        .brotli(true)
        .deflate(true)
        .build()
        .unwrap_or_else(|e| {
            warn!(error = %e, "falling back to a default HTTP client");
            reqwest::Client::new()
        })
}

impl Client {
    /// Create a new ClientBuilder for configuring the client.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Create a new Client with the given options.
    pub fn new(opts: Options) -> Self {
        // The classifier usually runs on localhost, so only page fetches
        // go through the public-only resolver.
        let (http_client, classifier_client) = match &opts.http_client {
            Some(client) => (client.clone(), client.clone()),
            None => (
                build_http_client(&opts, !opts.allow_private_networks),
                build_http_client(&opts, false),
            ),
        };

        let fetch_opts = FetchOptions {
            headers: opts.headers.clone(),
            allow_private_networks: opts.allow_private_networks,
        };
        let classify_opts = ClassifyOptions {
            endpoint: opts.endpoint.clone(),
            backend: opts.backend,
            headers: opts.classifier_headers.clone(),
        };

        Self {
            opts,
            http_client,
            classifier_client,
            fetch_opts,
            classify_opts,
        }
    }

    pub fn options(&self) -> &Options {
        &self.opts
    }

    /// Fetch a page and extract its article text.
    pub async fn extract(&self, url: &str) -> Result<Extraction, ScoutError> {
        let page = fetch(&self.http_client, url, &self.fetch_opts).await?;
        let html = page.text_utf8();
        self.extract_html(&html, &page.final_url)
    }

    /// Extract article text from an HTML string.
    ///
    /// `url` is only used for error context.
    pub fn extract_html(&self, html: &str, url: &str) -> Result<Extraction, ScoutError> {
        // The parsed page stays in this scope and never crosses an await.
        let page = HtmlPage::parse(html);
        let extraction = self
            .opts
            .extractor
            .extract(&page)
            .map_err(|e| ScoutError::no_content(url, "Extract", e))?;
        debug!(
            %url,
            strategy = ?extraction.strategy,
            words = extraction.word_count,
            "extracted article text"
        );
        Ok(extraction)
    }

    /// Send text to the configured classifier.
    pub async fn classify(&self, text: &str, source_url: &str) -> Result<Prediction, ScoutError> {
        classifier::classify(&self.classifier_client, text, source_url, &self.classify_opts).await
    }

    /// Probe the classifier's health route.
    pub async fn health(&self) -> Result<HealthStatus, ScoutError> {
        classifier::health(&self.classifier_client, &self.classify_opts).await
    }

    /// Render a prediction with the configured policy.
    pub fn render(&self, prediction: &Prediction) -> RenderModel {
        render(prediction, &self.opts.render_policy)
    }

    /// Fetch, extract, classify and render one page.
    pub async fn analyze(&self, url: &str) -> Result<AnalysisReport, ScoutError> {
        let page = fetch(&self.http_client, url, &self.fetch_opts).await?;
        let html = page.text_utf8();
        let extraction = self.extract_html(&html, &page.final_url)?;
        self.report(extraction, url).await
    }

    /// Extract, classify and render already-fetched HTML.
    pub async fn analyze_html(&self, html: &str, url: &str) -> Result<AnalysisReport, ScoutError> {
        let extraction = self.extract_html(html, url)?;
        self.report(extraction, url).await
    }

    async fn report(&self, extraction: Extraction, url: &str) -> Result<AnalysisReport, ScoutError> {
        let prediction = self.classify(&extraction.text, url).await?;
        let render = self.render(&prediction);
        info!(
            %url,
            strategy = ?extraction.strategy,
            prediction = prediction.prediction,
            confidence = prediction.confidence,
            theme = %render.theme,
            "analyzed page"
        );

        Ok(AnalysisReport {
            url: url.to_string(),
            strategy: extraction.strategy,
            word_count: extraction.word_count,
            characters: utf16_len(&extraction.text),
            text_preview: text_preview(&extraction.text),
            prediction,
            render,
            analyzed_at: Utc::now(),
        })
    }
}
