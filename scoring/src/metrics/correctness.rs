use crate::api::{IssueState, Provider, Result, TargetRef};
use crate::metrics::{clamp01, elapsed_ms};
use crate::report::MetricResult;
use derive_more::Constructor;
use log::{debug, error};
use std::time::Instant;

const ISSUE_WEIGHT: f64 = 0.6;
const PR_WEIGHT: f64 = 0.4;

#[derive(Constructor, Debug, Clone, Copy, PartialEq, Eq)]
struct ActivityCounts {
    open_issues: u32,
    closed_issues: u32,
    open_prs: u32,
    closed_prs: u32,
}

pub async fn evaluate<P>(provider: &P, target: &TargetRef) -> MetricResult
where
    P: Provider + ?Sized,
{
    let started = Instant::now();
    match fetch_counts(provider, target).await {
        Ok(counts) => {
            let score = score_activity(counts);
            debug!("correctness for {target}: {score}");
            MetricResult::new(score, elapsed_ms(started))
        }
        Err(err) => {
            error!("correctness for {target} failed: {err}");
            MetricResult::zero(elapsed_ms(started))
        }
    }
}

async fn fetch_counts<P>(provider: &P, target: &TargetRef) -> Result<ActivityCounts>
where
    P: Provider + ?Sized,
{
    let (open_issues, closed_issues, open_prs, closed_prs) = futures::try_join!(
        provider.issue_count(target, IssueState::Open),
        provider.issue_count(target, IssueState::Closed),
        provider.pull_request_count(target, IssueState::Open),
        provider.pull_request_count(target, IssueState::Closed),
    )?;
    Ok(ActivityCounts::new(
        open_issues,
        closed_issues,
        open_prs,
        closed_prs,
    ))
}

/// Resolution rates weighted 60/40 between issues and pull requests, scaled
/// by a logarithmic activity factor so busy repositories with the same rates
/// rank above quiet ones.
fn score_activity(counts: ActivityCounts) -> f64 {
    let total_issues = counts.open_issues + counts.closed_issues;
    let total_prs = counts.open_prs + counts.closed_prs;
    if total_issues + total_prs == 0 {
        return 0.0;
    }

    let issue_rate = if total_issues > 0 {
        f64::from(counts.closed_issues) / f64::from(total_issues)
    } else {
        0.0
    };
    let pr_rate = if total_prs > 0 {
        f64::from(counts.closed_prs) / f64::from(total_prs)
    } else {
        0.0
    };
    let weighted = ISSUE_WEIGHT * issue_rate + PR_WEIGHT * pr_rate;

    let activity = f64::from(total_issues + total_prs + 1).log10() / 101f64.log10();
    clamp01(weighted * (0.7 + 0.3 * activity))
}

/// Tests
