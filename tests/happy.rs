use secrecy::SecretString;
use serde_json::{json, Value};
use std::io::Write;
use std::path::PathBuf;
use tempfile::NamedTempFile;
use trust_score::{EvaluationReport, WeightPreset};
use trust_score_app::{score_packages, Args};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const OWNER: &str = "owner_0";
const REPO: &str = "repo_0";

const README: &str = r#"# project

## Install

```sh
npm i project
```

## Usage

```js
project()
```

## Example

```js
project(1)
```

## Docs

See [docs](https://docs.dev), [api](https://api.dev), [guide](https://guide.dev), [faq](https://faq.dev).

## License

MIT
"#;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn happy_path_reports_in_input_order() {
    let github = MockServer::start().await;
    let registry = MockServer::start().await;
    mock_repository(&github, true).await;
    mock_registry_package(&registry).await;

    let url_file = write_url_file(&[
        &format!("https://github.com/{OWNER}/{REPO}"),
        "https://www.npmjs.com/package/left-pad",
    ]);

    let mut reports = score_packages(args(&github, &registry, url_file.path().to_path_buf()))
        .await
        .unwrap();

    let first = reports.recv().await.expect("first report");
    assert_eq!(first.url, format!("https://github.com/{OWNER}/{REPO}"));
    assert_happy_scores(&first);

    let second = reports.recv().await.expect("second report");
    assert_eq!(second.url, "https://www.npmjs.com/package/left-pad");
    assert_happy_scores(&second);

    assert!(reports.recv().await.is_none(), "exactly one report per line");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn failing_responsiveness_leaves_other_metrics_intact() {
    let github = MockServer::start().await;
    let registry = MockServer::start().await;
    mock_repository(&github, false).await;

    let url_file = write_url_file(&[&format!("https://github.com/{OWNER}/{REPO}")]);

    let mut reports = score_packages(args(&github, &registry, url_file.path().to_path_buf()))
        .await
        .unwrap();
    let report = reports.recv().await.expect("report");

    assert_eq!(report.responsive_maintainer, 0.0);
    assert_eq!(report.correctness, 0.763);
    assert_eq!(report.bus_factor, 1.0);
    assert_eq!(report.ramp_up, 1.0);
    assert_eq!(report.license, 1.0);
    assert_eq!(report.pr_code_reviews, 0.25);
    assert_eq!(report.dependency, 0.5);
    // 0.2 * (0.763 + 1.0 + 0.0 + 1.0) + 0.1 + 0.05 * 0.25 + 0.05 * 0.5
    assert_eq!(report.net_score, 0.69);
}

fn assert_happy_scores(report: &EvaluationReport) {
    assert_eq!(report.ramp_up, 1.0);
    assert_eq!(report.license, 1.0);
    assert_eq!(report.dependency, 0.5);
    assert_eq!(report.pr_code_reviews, 0.25);
    assert_eq!(report.bus_factor, 1.0);
    assert_eq!(report.responsive_maintainer, 0.72);
    assert_eq!(report.correctness, 0.763);
    assert_eq!(report.net_score, 0.834);
    assert!(report.net_score_latency >= 0.0);
}

fn args(github: &MockServer, registry: &MockServer, url_file: PathBuf) -> Args {
    Args {
        url_file,
        api_token: Some(SecretString::new("test-token".to_string())),
        api_url: github.uri(),
        registry_url: registry.uri(),
        weights: WeightPreset::Balanced,
        checkout_dir: None,
        max_pages: 30,
        timeout: 30,
        metric_timeout: 120,
    }
}

fn write_url_file(urls: &[&str]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    for url in urls {
        writeln!(file, "{url}").unwrap();
    }
    file
}

fn repo_path(tail: &str) -> String {
    format!("/repos/{OWNER}/{REPO}{tail}")
}

fn issue(closed_at: Option<&str>) -> Value {
    json!({"created_at": "2024-01-01T00:00:00Z", "closed_at": closed_at})
}

async fn mock_registry_package(registry: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/left-pad"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "left-pad",
            "repository": {
                "type": "git",
                "url": format!("git+https://github.com/{OWNER}/{REPO}.git"),
            },
        })))
        .mount(registry)
        .await;
}

/// Mounts a healthy mid-sized repository: 2 open / 8 closed issues closed in
/// a day, two merged PRs answered in 12 hours (one reviewed, 100 of 400
/// added lines), 30 commits across three contributors, a complete README,
/// and a half-pinned manifest.
async fn mock_repository(github: &MockServer, comments_ok: bool) {
    let open_issues: Vec<Value> = (0..2).map(|_| issue(None)).collect();
    Mock::given(method("GET"))
        .and(path(repo_path("/issues")))
        .and(query_param("state", "open"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&open_issues))
        .mount(github)
        .await;

    // One pull-request-backed entry that must not count as an issue.
    let mut closed_issues: Vec<Value> =
        (0..8).map(|_| issue(Some("2024-01-02T00:00:00Z"))).collect();
    closed_issues.push(json!({
        "created_at": "2024-01-01T00:00:00Z",
        "closed_at": "2024-01-02T00:00:00Z",
        "pull_request": {"url": format!("https://api.github.com/repos/{OWNER}/{REPO}/pulls/1")},
    }));
    Mock::given(method("GET"))
        .and(path(repo_path("/issues")))
        .and(query_param("state", "closed"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&closed_issues))
        .mount(github)
        .await;

    Mock::given(method("GET"))
        .and(path(repo_path("/pulls")))
        .and(query_param("state", "open"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(github)
        .await;

    let pulls = json!([
        {"number": 1, "created_at": "2024-01-01T00:00:00Z", "merged_at": "2024-01-01T05:00:00Z"},
        {"number": 2, "created_at": "2024-01-01T00:00:00Z", "merged_at": "2024-01-01T06:00:00Z"},
    ]);
    for state in ["closed", "all"] {
        Mock::given(method("GET"))
            .and(path(repo_path("/pulls")))
            .and(query_param("state", state))
            .respond_with(ResponseTemplate::new(200).set_body_json(&pulls))
            .mount(github)
            .await;
    }

    for (number, additions) in [(1, 100), (2, 300)] {
        Mock::given(method("GET"))
            .and(path(repo_path(&format!("/pulls/{number}"))))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"number": number, "additions": additions})),
            )
            .mount(github)
            .await;
    }

    Mock::given(method("GET"))
        .and(path(repo_path("/pulls/1/reviews")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": 7}])))
        .mount(github)
        .await;
    Mock::given(method("GET"))
        .and(path(repo_path("/pulls/2/reviews")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(github)
        .await;

    for number in [1, 2] {
        let response = if comments_ok {
            ResponseTemplate::new(200)
                .set_body_json(json!([{"created_at": "2024-01-01T12:00:00Z"}]))
        } else {
            ResponseTemplate::new(500)
        };
        Mock::given(method("GET"))
            .and(path(repo_path(&format!("/issues/{number}/comments"))))
            .respond_with(response)
            .mount(github)
            .await;
    }

    let commits: Vec<Value> = [("alice", 20), ("bob", 6), ("carol", 4)]
        .iter()
        .flat_map(|(author, count)| {
            (0..*count).map(move |_| {
                json!({"commit": {"author": {"name": author, "date": "2024-01-01T00:00:00Z"}}})
            })
        })
        .collect();
    Mock::given(method("GET"))
        .and(path(repo_path("/commits")))
        .respond_with(ResponseTemplate::new(200).set_body_json(&commits))
        .mount(github)
        .await;

    Mock::given(method("GET"))
        .and(path(repo_path("/contributors")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"login": "alice", "contributions": 20},
            {"login": "bob", "contributions": 6},
            {"login": "carol", "contributions": 4},
        ])))
        .mount(github)
        .await;

    Mock::given(method("GET"))
        .and(path(repo_path("/readme")))
        .respond_with(ResponseTemplate::new(200).set_body_raw(README, "text/plain"))
        .mount(github)
        .await;

    Mock::given(method("GET"))
        .and(path(repo_path("/contents/package.json")))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            r#"{"dependencies": {"a": "1.2.3", "b": "^1.0.0"}}"#,
            "application/json",
        ))
        .mount(github)
        .await;
}
