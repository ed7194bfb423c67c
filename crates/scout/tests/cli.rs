// ABOUTME: Integration tests for the scout CLI binary.
// ABOUTME: Covers HTML file extraction, classifier round trips against a mock server, and argument validation.

use assert_cmd::assert::OutputAssertExt;
use assert_cmd::cargo::CommandCargoExt;
use httpmock::prelude::*;
use predicates::prelude::*;
use serde_json::json;
use std::fs;
use std::path::PathBuf;
use std::process::Command;
use tempfile::TempDir;

fn scout_cmd() -> Command {
    let mut cmd = Command::cargo_bin("scout").unwrap();
    cmd.env_remove("SCOUT_ENDPOINT")
        .env_remove("SCOUT_API_TOKEN")
        .env_remove("RUST_LOG");
    cmd
}

fn words(prefix: &str, n: usize) -> String {
    (0..n)
        .map(|i| format!("{}{}", prefix, i))
        .collect::<Vec<_>>()
        .join(" ")
}

fn article_html() -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head><title>Story</title></head>
<body>
<nav>Home World Sports</nav>
<article>
<h1>Headline</h1>
<p>{}</p>
</article>
<footer>Copyright</footer>
</body>
</html>"#,
        words("w", 60)
    )
}

fn write_html(dir: &TempDir, html: &str) -> PathBuf {
    let path = dir.path().join("page.html");
    fs::write(&path, html).unwrap();
    path
}

#[test]
fn extract_only_prints_article_text() {
    let temp_dir = TempDir::new().unwrap();
    let html_path = write_html(&temp_dir, &article_html());

    scout_cmd()
        .arg("--html")
        .arg(&html_path)
        .arg("--url")
        .arg("https://example.com/story")
        .arg("--extract-only")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Headline w0 w1"))
        .stdout(predicate::str::contains("w59"))
        .stdout(predicate::str::contains("Copyright").not());
}

#[test]
fn html_from_stdin() {
    assert_cmd::Command::cargo_bin("scout")
        .unwrap()
        .env_remove("RUST_LOG")
        .arg("--html")
        .arg("-")
        .arg("--url")
        .arg("https://example.com/story")
        .arg("--extract-only")
        .write_stdin(article_html())
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Headline w0"));
}

#[test]
fn extract_only_json_names_strategy() {
    let temp_dir = TempDir::new().unwrap();
    let html_path = write_html(&temp_dir, &article_html());

    let output = scout_cmd()
        .arg("--html")
        .arg(&html_path)
        .arg("--url")
        .arg("https://example.com/story")
        .arg("--extract-only")
        .arg("--json")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let value: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(value["strategy"], "semantic_tag");
    assert_eq!(value["word_count"], 61);
}

#[test]
fn strategies_file_reorders_cascade() {
    let temp_dir = TempDir::new().unwrap();
    let html = format!(
        "<html><body><article>{}</article><main><p>A paragraph long enough to count.</p></main></body></html>",
        words("a", 80)
    );
    let html_path = write_html(&temp_dir, &html);
    let strategies_path = temp_dir.path().join("strategies.json");
    fs::write(
        &strategies_path,
        r#"[{"type": "paragraphs", "min_chars": 20}, {"type": "fallback", "min_words": 20}]"#,
    )
    .unwrap();

    scout_cmd()
        .arg("--html")
        .arg(&html_path)
        .arg("--url")
        .arg("https://example.com")
        .arg("--strategies")
        .arg(&strategies_path)
        .arg("--extract-only")
        .assert()
        .success()
        .stdout(predicate::str::diff("A paragraph long enough to count.\n"));
}

#[test]
fn bad_strategies_file_fails() {
    let temp_dir = TempDir::new().unwrap();
    let html_path = write_html(&temp_dir, &article_html());
    let strategies_path = temp_dir.path().join("strategies.json");
    fs::write(&strategies_path, r#"[{"type": "readability"}]"#).unwrap();

    scout_cmd()
        .arg("--html")
        .arg(&html_path)
        .arg("--url")
        .arg("https://example.com")
        .arg("--strategies")
        .arg(&strategies_path)
        .arg("--extract-only")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error loading strategies"));
}

#[test]
fn unparseable_strategy_selector_warns() {
    let temp_dir = TempDir::new().unwrap();
    let html_path = write_html(&temp_dir, &article_html());
    let strategies_path = temp_dir.path().join("strategies.json");
    fs::write(
        &strategies_path,
        r#"[{"type": "semantic_tag", "selector": "article[[", "min_words": 50},
            {"type": "semantic_tag", "selector": "article", "min_words": 50}]"#,
    )
    .unwrap();

    scout_cmd()
        .arg("--html")
        .arg(&html_path)
        .arg("--url")
        .arg("https://example.com")
        .arg("--strategies")
        .arg(&strategies_path)
        .arg("--extract-only")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Headline"))
        .stderr(predicate::str::contains("selector does not parse"));
}

#[test]
fn html_analysis_renders_verdict() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST).path("/analyze").json_body(json!({
            "text": format!("Headline {}", words("w", 60)),
            "source_url": "https://example.com/story"
        }));
        then.status(200).json_body(json!({
            "prediction": 0,
            "prediction_label": "Real",
            "confidence": 0.82
        }));
    });

    let temp_dir = TempDir::new().unwrap();
    let html_path = write_html(&temp_dir, &article_html());

    scout_cmd()
        .arg("--endpoint")
        .arg(server.base_url())
        .arg("--html")
        .arg(&html_path)
        .arg("--url")
        .arg("https://example.com/story")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "This article likely contains factual information.",
        ))
        .stdout(predicate::str::contains("High confidence"))
        .stdout(predicate::str::contains("Confidence: 82.0%"));

    mock.assert();
}

#[test]
fn endpoint_from_environment_and_damping() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST).path("/analyze");
        then.status(200)
            .json_body(json!({ "prediction": 0, "confidence": 0.5 }));
    });

    let temp_dir = TempDir::new().unwrap();
    let html_path = write_html(&temp_dir, &article_html());

    scout_cmd()
        .env("SCOUT_ENDPOINT", server.base_url())
        .arg("--html")
        .arg(&html_path)
        .arg("--url")
        .arg("https://example.com/story")
        .arg("--damping")
        .assert()
        .success()
        .stdout(predicate::str::contains("Low confidence"))
        .stdout(predicate::str::contains("Confidence: 40.0%"));

    mock.assert();
}

#[test]
fn json_report_written_to_file() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/analyze");
        then.status(200)
            .json_body(json!({ "prediction": 1, "confidence": 0.9 }));
    });

    let temp_dir = TempDir::new().unwrap();
    let html_path = write_html(&temp_dir, &article_html());
    let output_path = temp_dir.path().join("report.json");

    scout_cmd()
        .arg("--endpoint")
        .arg(server.base_url())
        .arg("--html")
        .arg(&html_path)
        .arg("--url")
        .arg("https://example.com/story")
        .arg("--json")
        .arg("-o")
        .arg(&output_path)
        .assert()
        .success();

    let report: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&output_path).unwrap()).unwrap();
    assert_eq!(report["url"], "https://example.com/story");
    assert_eq!(report["strategy"], "semantic_tag");
    assert_eq!(report["render"]["verdict"], "misleading");
    assert_eq!(report["render"]["theme"], "result-high-risk");
    assert_eq!(report["prediction"]["prediction"], 1);
}

#[test]
fn classifier_error_exits_nonzero() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/analyze");
        then.status(500)
            .json_body(json!({ "error": "Failed to load model" }));
    });

    let temp_dir = TempDir::new().unwrap();
    let html_path = write_html(&temp_dir, &article_html());

    scout_cmd()
        .arg("--endpoint")
        .arg(server.base_url())
        .arg("--html")
        .arg(&html_path)
        .arg("--url")
        .arg("https://example.com/story")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Failed to load model"));
}

#[test]
fn page_without_content_exits_nonzero() {
    let temp_dir = TempDir::new().unwrap();
    let html_path = write_html(&temp_dir, "<html><body><p>Too short.</p></body></html>");

    scout_cmd()
        .arg("--html")
        .arg(&html_path)
        .arg("--url")
        .arg("https://example.com")
        .arg("--extract-only")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no article content found"));
}

#[test]
fn fetch_mode_extracts_each_url() {
    let server = MockServer::start();
    let page1 = server.mock(|when, then| {
        when.method(GET).path("/one");
        then.status(200)
            .header("content-type", "text/html; charset=utf-8")
            .body(format!("<html><body><main>{}</main></body></html>", words("one", 25)));
    });
    let page2 = server.mock(|when, then| {
        when.method(GET).path("/two");
        then.status(200)
            .header("content-type", "text/html; charset=utf-8")
            .body(format!("<html><body><main>{}</main></body></html>", words("two", 25)));
    });

    let output = scout_cmd()
        .arg("--allow-private-networks")
        .arg("--extract-only")
        .arg("--json")
        .arg(server.url("/one"))
        .arg(server.url("/two"))
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    page1.assert();
    page2.assert();

    let value: serde_json::Value = serde_json::from_slice(&output).unwrap();
    let items = value.as_array().expect("two results serialize as an array");
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["strategy"], "fallback");
    assert_eq!(items[1]["text"], words("two", 25));
}

#[test]
fn private_url_blocked_without_flag() {
    let server = MockServer::start();

    scout_cmd()
        .arg("--extract-only")
        .arg(server.url("/page"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("SSRF blocked"));
}

#[test]
fn health_reports_status() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/health");
        then.status(200)
            .json_body(json!({ "status": "healthy", "model_loaded": true }));
    });

    scout_cmd()
        .arg("--endpoint")
        .arg(server.base_url())
        .arg("--health")
        .assert()
        .success()
        .stdout(predicate::str::contains("healthy (model loaded: true)"));
}

#[test]
fn unhealthy_classifier_exits_nonzero() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/health");
        then.status(500).json_body(json!({
            "status": "unhealthy",
            "model_loaded": false,
            "error": "weights missing"
        }));
    });

    scout_cmd()
        .arg("--endpoint")
        .arg(server.base_url())
        .arg("--health")
        .assert()
        .failure()
        .stdout(predicate::str::contains("weights missing"));
}

#[test]
fn timing_flag_prints_elapsed() {
    let temp_dir = TempDir::new().unwrap();
    let html_path = write_html(&temp_dir, &article_html());

    scout_cmd()
        .arg("--html")
        .arg(&html_path)
        .arg("--url")
        .arg("https://example.com")
        .arg("--extract-only")
        .arg("--timing")
        .assert()
        .success()
        .stderr(predicate::str::contains("elapsed:"))
        .stderr(predicate::str::contains("ms"));
}

#[test]
fn missing_url_with_html_fails() {
    let temp_dir = TempDir::new().unwrap();
    let html_path = write_html(&temp_dir, &article_html());

    scout_cmd()
        .arg("--html")
        .arg(&html_path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("--url is required"));
}

#[test]
fn no_input_fails() {
    scout_cmd()
        .assert()
        .failure()
        .stderr(predicate::str::contains("at least one URL is required"));
}

#[test]
fn html_and_urls_conflict() {
    let temp_dir = TempDir::new().unwrap();
    let html_path = write_html(&temp_dir, &article_html());

    scout_cmd()
        .arg("--html")
        .arg(&html_path)
        .arg("--url")
        .arg("https://example.com")
        .arg("https://example.com/other")
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot use both"));
}
