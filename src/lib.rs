mod args;

pub use args::Args;

use github_client::GithubClientBuilder;
use log::warn;
use npm_client::NpmClient;
use std::path::Path;
use std::time::Duration;
use tokio::sync::mpsc::{self, Receiver};
use trust_score::api::{Error, Result};
use trust_score::{EvaluationReport, Orchestrator, Weights};

/// Builds the clients from `args` and streams one report per input line.
///
/// Input lines are evaluated sequentially to bound outbound request volume,
/// so the receiver yields reports in input order. Dropping the receiver
/// cancels the batch.
pub async fn score_packages(args: Args) -> Result<Receiver<EvaluationReport>> {
    let token = args
        .api_token
        .ok_or_else(|| Error::Config("GITHUB_TOKEN is not set".to_string()))?;

    let urls = read_url_file(&args.url_file)?;

    let github = GithubClientBuilder::default()
        .with_api_url(&args.api_url)
        .with_timeout(Duration::from_secs(args.timeout))
        .with_max_pages(args.max_pages)
        .try_with_token(token)?
        .build()?;
    let registry = NpmClient::new(&args.registry_url, Duration::from_secs(args.timeout))?;

    let weights = Weights::from(args.weights);
    weights.validate()?;
    let mut orchestrator = Orchestrator::new(github, weights)
        .with_metric_timeout(Duration::from_secs(args.metric_timeout));
    if let Some(dir) = args.checkout_dir {
        orchestrator = orchestrator.with_checkout_root(dir);
    }

    let (sender, receiver) = mpsc::channel(1);
    let _ = tokio::spawn(async move {
        for url in urls {
            let report = orchestrator.evaluate_url(&url, &registry).await;
            if sender.send(report).await.is_err() {
                warn!("report receiver dropped, stopping batch");
                break;
            }
        }
    });
    Ok(receiver)
}

fn read_url_file(path: &Path) -> Result<Vec<String>> {
    let content = std::fs::read_to_string(path)
        .map_err(|err| Error::Config(format!("cannot read {}: {err}", path.display())))?;
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect())
}

/// Tests
