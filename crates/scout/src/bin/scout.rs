// ABOUTME: CLI binary for scout: fetches news pages or reads HTML files, extracts the article, and classifies it.
// ABOUTME: Prints the rendered verdict as text or JSON; --extract-only skips the classifier entirely.

use std::fs;
use std::io::{self, IsTerminal, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::{Duration, Instant};

use clap::Parser;
use newsfact_scout::{
    Backend, Client, Damping, Extraction, Extractor, LabelMapping, ScoutError,
};
use serde::Serialize;
use tracing::warn;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "scout")]
#[command(about = "Extract news articles and check them against a fact-check classifier")]
struct Args {
    /// Classifier base URL
    #[arg(long, env = "SCOUT_ENDPOINT", default_value = "http://localhost:5000")]
    endpoint: String,

    /// Classifier protocol: analyze or detector
    #[arg(long, default_value_t = Backend::Analyze)]
    backend: Backend,

    /// Bearer token sent to the classifier
    #[arg(long, env = "SCOUT_API_TOKEN", hide_env_values = true)]
    api_token: Option<String>,

    /// Which label prediction code 0 stands for
    #[arg(long, default_value_t = LabelMapping::ZeroIsFactual)]
    label_mapping: LabelMapping,

    /// Shrink displayed percentages below 60% by 0.8
    #[arg(long)]
    damping: bool,

    /// JSON file with a custom strategy cascade
    #[arg(long)]
    strategies: Option<PathBuf>,

    /// Print the extracted article text and skip classification
    #[arg(long)]
    extract_only: bool,

    /// Check classifier health and exit
    #[arg(long)]
    health: bool,

    /// Output as JSON
    #[arg(long = "json")]
    json_output: bool,

    /// Output file path (default: stdout)
    #[arg(short = 'o', long = "output")]
    output: Option<PathBuf>,

    /// HTML file to analyze, or - for stdin (requires --url)
    #[arg(long = "html")]
    html: Option<PathBuf>,

    /// Source URL for HTML file analysis (required with --html)
    #[arg(long = "url")]
    url: Option<String>,

    /// Request timeout in seconds
    #[arg(long, default_value_t = 30)]
    timeout: u64,

    /// Allow fetching from private/local networks
    #[arg(long = "allow-private-networks")]
    allow_private_networks: bool,

    /// Print elapsed time in ms to stderr
    #[arg(long = "timing")]
    timing: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// URLs to analyze (fetch mode)
    #[arg()]
    urls: Vec<String>,
}

fn init_logging(verbose: u8) {
    let env_filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_ansi(io::stderr().is_terminal())
                .with_writer(io::stderr),
        )
        .init();
}

/// Read an HTML file, or stdin when the path is `-`.
fn read_html(path: &Path) -> io::Result<String> {
    if path == Path::new("-") {
        let mut html = String::new();
        io::stdin().read_to_string(&mut html)?;
        Ok(html)
    } else {
        fs::read_to_string(path)
    }
}

fn load_extractor(path: &Path) -> Result<Extractor, String> {
    let raw = fs::read_to_string(path).map_err(|e| format!("reading {:?}: {}", path, e))?;
    let extractor =
        Extractor::from_json(&raw).map_err(|e| format!("parsing {:?}: {}", path, e))?;
    for selector in extractor.invalid_selectors() {
        warn!(%selector, "selector does not parse and will match nothing");
    }
    Ok(extractor)
}

/// One object for a single result, an array otherwise.
fn to_json<T: Serialize>(items: &[T]) -> Result<String, serde_json::Error> {
    match items {
        [single] => serde_json::to_string_pretty(single),
        many => serde_json::to_string_pretty(many),
    }
}

fn format_output<T: Serialize>(
    items: &[T],
    json_output: bool,
    text: impl Fn(&T) -> String,
) -> Result<String, serde_json::Error> {
    if json_output {
        to_json(items)
    } else {
        Ok(items.iter().map(text).collect::<Vec<_>>().join("\n\n"))
    }
}

fn emit(output: &str, path: Option<&Path>) -> bool {
    match path {
        Some(path) => match fs::write(path, output) {
            Ok(()) => true,
            Err(e) => {
                eprintln!("error writing to {:?}: {}", path, e);
                false
            }
        },
        None => {
            println!("{}", output);
            true
        }
    }
}

async fn run_extract(client: &Client, args: &Args, html: Option<&str>) -> (Vec<Extraction>, bool) {
    let outcomes: Vec<(&str, Result<Extraction, ScoutError>)> = match (html, args.url.as_deref()) {
        (Some(html), Some(url)) => vec![(url, client.extract_html(html, url))],
        _ => {
            let mut outcomes = Vec::with_capacity(args.urls.len());
            for url in &args.urls {
                outcomes.push((url.as_str(), client.extract(url).await));
            }
            outcomes
        }
    };

    let mut results = Vec::new();
    let mut had_error = false;
    for (url, outcome) in outcomes {
        match outcome {
            Ok(extraction) => results.push(extraction),
            Err(e) => {
                eprintln!("error extracting {}: {}", url, e);
                had_error = true;
            }
        }
    }
    (results, had_error)
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    if args.html.is_some() && args.url.is_none() {
        eprintln!("error: --url is required when using --html");
        return ExitCode::from(1);
    }

    if !args.health && args.html.is_none() && args.urls.is_empty() {
        eprintln!("error: at least one URL is required, or use --html with --url");
        return ExitCode::from(1);
    }

    if args.html.is_some() && !args.urls.is_empty() {
        eprintln!("error: cannot use both --html and positional URLs");
        return ExitCode::from(1);
    }

    let mut builder = Client::builder()
        .endpoint(&args.endpoint)
        .backend(args.backend)
        .label_mapping(args.label_mapping)
        .damping(args.damping.then(Damping::default))
        .timeout(Duration::from_secs(args.timeout))
        .allow_private_networks(args.allow_private_networks);
    if let Some(token) = &args.api_token {
        builder = builder.api_token(token);
    }
    if let Some(path) = &args.strategies {
        match load_extractor(path) {
            Ok(extractor) => builder = builder.extractor(extractor),
            Err(e) => {
                eprintln!("error loading strategies: {}", e);
                return ExitCode::from(1);
            }
        }
    }
    let client = builder.build();

    if args.health {
        return match client.health().await {
            Ok(status) => {
                let rendered = if args.json_output {
                    serde_json::to_string_pretty(&status).unwrap_or_default()
                } else {
                    let line = format!("{} (model loaded: {})", status.status, status.model_loaded);
                    match &status.error {
                        Some(err) => format!("{}: {}", line, err),
                        None => line,
                    }
                };
                println!("{}", rendered);
                if status.is_healthy() {
                    ExitCode::SUCCESS
                } else {
                    ExitCode::from(1)
                }
            }
            Err(e) => {
                eprintln!("error checking health: {}", e);
                ExitCode::from(1)
            }
        };
    }

    let html = match &args.html {
        Some(path) => match read_html(path) {
            Ok(content) => Some(content),
            Err(e) => {
                eprintln!("error reading file {:?}: {}", path, e);
                return ExitCode::from(1);
            }
        },
        None => None,
    };

    let start = Instant::now();
    let (output, mut had_error) = if args.extract_only {
        let (results, had_error) = run_extract(&client, &args, html.as_deref()).await;
        let output = (!results.is_empty())
            .then(|| format_output(&results, args.json_output, |e| e.text.clone()));
        (output, had_error)
    } else {
        let mut results = Vec::new();
        let mut had_error = false;
        let targets: Vec<(&str, Option<&str>)> = match (html.as_deref(), args.url.as_deref()) {
            (Some(html), Some(url)) => vec![(url, Some(html))],
            _ => args.urls.iter().map(|u| (u.as_str(), None)).collect(),
        };
        for (url, html) in targets {
            let outcome = match html {
                Some(html) => client.analyze_html(html, url).await,
                None => client.analyze(url).await,
            };
            match outcome {
                Ok(report) => results.push(report),
                Err(e) => {
                    eprintln!("error analyzing {}: {}", url, e);
                    had_error = true;
                }
            }
        }
        let output = (!results.is_empty())
            .then(|| format_output(&results, args.json_output, |r| r.format_text()));
        (output, had_error)
    };
    let elapsed = start.elapsed();

    match output {
        Some(Ok(rendered)) => {
            if !emit(&rendered, args.output.as_deref()) {
                had_error = true;
            }
        }
        Some(Err(e)) => {
            eprintln!("error serializing output: {}", e);
            had_error = true;
        }
        None => {}
    }

    if args.timing {
        let _ = writeln!(io::stderr(), "elapsed: {}ms", elapsed.as_millis());
    }

    if had_error {
        ExitCode::from(1)
    } else {
        ExitCode::SUCCESS
    }
}
