use crate::api::{Commit, Contributor, Provider, Result, TargetRef};
use crate::metrics::{clamp01, elapsed_ms};
use crate::report::MetricResult;
use log::{debug, error};
use std::collections::HashMap;
use std::time::Instant;

/// Share of commit history the top contributors must cover.
const COVERAGE_THRESHOLD: f64 = 0.8;
/// Below this commit count the signal is too weak to score.
const MIN_COMMITS: u32 = 20;

/// Raw bus factor paired with its normalized score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BusFactorOutcome {
    pub bus_factor: u32,
    pub result: MetricResult,
}

pub async fn evaluate<P>(provider: &P, target: &TargetRef) -> BusFactorOutcome
where
    P: Provider + ?Sized,
{
    let started = Instant::now();
    match fetch(provider, target).await {
        Ok((commits, contributors)) => {
            let (bus_factor, score) = score_history(&commits, &contributors);
            debug!("bus factor for {target}: {bus_factor} (score {score})");
            BusFactorOutcome {
                bus_factor,
                result: MetricResult::new(score, elapsed_ms(started)),
            }
        }
        Err(err) => {
            error!("bus factor for {target} failed: {err}");
            BusFactorOutcome {
                bus_factor: 1,
                result: MetricResult::zero(elapsed_ms(started)),
            }
        }
    }
}

async fn fetch<P>(provider: &P, target: &TargetRef) -> Result<(Vec<Commit>, Vec<Contributor>)>
where
    P: Provider + ?Sized,
{
    futures::try_join!(provider.commits(target), provider.contributors(target))
}

/// Counts how many of the most active authors it takes to cover
/// [`COVERAGE_THRESHOLD`] of the commit history, then normalizes that count
/// against the contributor pool.
fn score_history(commits: &[Commit], contributors: &[Contributor]) -> (u32, f64) {
    let total_commits = commits.len() as u32;
    let total_contributors = contributors.len() as u32;
    if total_commits == 0 || total_contributors == 0 {
        return (1, 0.0);
    }

    let mut per_author: HashMap<&str, u32> = HashMap::new();
    for commit in commits {
        *per_author.entry(commit.author.as_str()).or_insert(0) += 1;
    }
    let mut counts: Vec<u32> = per_author.into_values().collect();
    counts.sort_unstable_by(|a, b| b.cmp(a));

    let mut accumulated = 0u32;
    let mut bus_factor = 0u32;
    for count in counts {
        accumulated += count;
        bus_factor += 1;
        if f64::from(accumulated) > f64::from(total_commits) * COVERAGE_THRESHOLD {
            break;
        }
    }

    (bus_factor, normalize(bus_factor, total_contributors, total_commits))
}

fn normalize(bus_factor: u32, total_contributors: u32, total_commits: u32) -> f64 {
    if total_contributors == 0 || total_commits < MIN_COMMITS {
        return 0.0;
    }
    let ratio = f64::from(bus_factor) / f64::from(total_contributors);
    let commit_threshold = (f64::from(total_commits) / 100.0).min(1000.0);
    let mut score = clamp01(ratio * f64::from(total_commits) / commit_threshold);
    if total_contributors < 3 {
        score *= 0.5;
    }
    score
}

/// Tests
