use crate::api::{IssueState, Provider, Result, TargetRef};
use crate::metrics::elapsed_ms;
use crate::report::MetricResult;
use chrono::{DateTime, Utc};
use log::{debug, error};
use std::time::Instant;

/// Normalization ceiling for issue closure, in hours (5 days).
const MAX_CLOSURE_HOURS: f64 = 120.0;
/// Normalization ceiling for first response to a PR, in hours (1.5 days).
const MAX_RESPONSE_HOURS: f64 = 36.0;

const RESPONSE_WEIGHT: f64 = 0.6;
const CLOSURE_WEIGHT: f64 = 0.4;

pub async fn evaluate<P>(provider: &P, target: &TargetRef) -> MetricResult
where
    P: Provider + ?Sized,
{
    let started = Instant::now();
    match collect_times(provider, target).await {
        Ok((closure_hours, response_hours)) => {
            let score = score_times(closure_hours, response_hours);
            debug!(
                "responsiveness for {target}: {score} \
                 (closure {closure_hours}h, response {response_hours}h)"
            );
            MetricResult::new(score, elapsed_ms(started))
        }
        Err(err) => {
            error!("responsiveness for {target} failed: {err}");
            MetricResult::zero(elapsed_ms(started))
        }
    }
}

async fn collect_times<P>(provider: &P, target: &TargetRef) -> Result<(f64, f64)>
where
    P: Provider + ?Sized,
{
    futures::try_join!(
        avg_closure_hours(provider, target),
        avg_response_hours(provider, target),
    )
}

/// Mean time from issue creation to closure over all closed issues.
async fn avg_closure_hours<P>(provider: &P, target: &TargetRef) -> Result<f64>
where
    P: Provider + ?Sized,
{
    let issues = provider.closed_issues(target).await?;
    let mut total = 0.0;
    let mut counted = 0u32;
    for issue in issues {
        if let Some(closed_at) = issue.closed_at {
            total += hours_between(issue.created_at, closed_at);
            counted += 1;
        }
    }
    Ok(mean(total, counted))
}

/// Mean time from PR creation to its first comment, over merged PRs.
/// PRs that never received a comment are excluded from the mean.
async fn avg_response_hours<P>(provider: &P, target: &TargetRef) -> Result<f64>
where
    P: Provider + ?Sized,
{
    let pull_requests = provider.pull_requests(target, IssueState::Closed).await?;
    let mut total = 0.0;
    let mut counted = 0u32;
    for pr in pull_requests {
        if pr.merged_at.is_none() {
            continue;
        }
        if let Some(first_comment) = provider.first_pr_comment(target, pr.number).await? {
            total += hours_between(pr.created_at, first_comment);
            counted += 1;
        }
    }
    Ok(mean(total, counted))
}

fn mean(total: f64, counted: u32) -> f64 {
    if counted == 0 {
        0.0
    } else {
        total / f64::from(counted)
    }
}

fn hours_between(from: DateTime<Utc>, to: DateTime<Utc>) -> f64 {
    (to - from).num_seconds() as f64 / 3600.0
}

fn score_times(closure_hours: f64, response_hours: f64) -> f64 {
    if closure_hours == 0.0 && response_hours == 0.0 {
        return 0.0;
    }
    let closure_score = normalize(closure_hours, MAX_CLOSURE_HOURS);
    let response_score = normalize(response_hours, MAX_RESPONSE_HOURS);
    RESPONSE_WEIGHT * response_score + CLOSURE_WEIGHT * closure_score
}

fn normalize(hours: f64, max_hours: f64) -> f64 {
    (1.0 - hours / max_hours).max(0.0)
}

/// Tests
