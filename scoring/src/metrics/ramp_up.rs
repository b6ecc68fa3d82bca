use crate::api::{Provider, TargetRef};
use crate::metrics::elapsed_ms;
use crate::report::MetricResult;
use log::{debug, error};
use regex::Regex;
use std::sync::LazyLock;
use std::time::Instant;

static HEADERS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^#{1,6}\s").expect("invalid regex"));
static CODE_BLOCKS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```.*?```").expect("invalid regex"));
static INSTALL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)install").expect("invalid regex"));
static USAGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)usage|example").expect("invalid regex"));
static EXTERNAL_LINKS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[[^\]]*\]\(https?://[^)]*\)").expect("invalid regex"));

pub async fn evaluate<P>(provider: &P, target: &TargetRef) -> MetricResult
where
    P: Provider + ?Sized,
{
    let started = Instant::now();
    match provider.readme(target).await {
        Ok(readme) => {
            let score = score_readme(&readme);
            debug!("ramp-up for {target}: {score}");
            MetricResult::new(score, elapsed_ms(started))
        }
        Err(err) => {
            error!("ramp-up for {target} failed: {err}");
            MetricResult::zero(elapsed_ms(started))
        }
    }
}

/// Scores onboarding quality from README structure. Each component is
/// capped so a single over-long section cannot carry the score alone.
pub fn score_readme(readme: &str) -> f64 {
    if readme.trim().is_empty() {
        return 0.0;
    }

    let mut score = 0.0;

    let headers = HEADERS.find_iter(readme).count() as f64;
    score += (headers / 5.0).min(0.3);

    let code_blocks = CODE_BLOCKS.find_iter(readme).count() as f64;
    score += (code_blocks / 3.0).min(0.2);

    if INSTALL.is_match(readme) {
        score += 0.15;
    }
    if USAGE.is_match(readme) {
        score += 0.15;
    }

    let links = EXTERNAL_LINKS.find_iter(readme).count() as f64;
    score += (links * 0.05).min(0.2);

    score.min(1.0)
}

/// Tests
