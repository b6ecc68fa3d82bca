use crate::api::{IssueState, Provider, Result, TargetRef};
use crate::metrics::elapsed_ms;
use crate::report::MetricResult;
use log::{debug, error};
use std::time::Instant;

pub async fn evaluate<P>(provider: &P, target: &TargetRef) -> MetricResult
where
    P: Provider + ?Sized,
{
    let started = Instant::now();
    match collect_line_counts(provider, target).await {
        Ok(lines) => {
            let score = score_review_coverage(&lines);
            debug!("review coverage for {target}: {score}");
            MetricResult::new(score, elapsed_ms(started))
        }
        Err(err) => {
            error!("review coverage for {target} failed: {err}");
            MetricResult::zero(elapsed_ms(started))
        }
    }
}

/// Addition count of every pull request, paired with whether it received at
/// least one review.
async fn collect_line_counts<P>(provider: &P, target: &TargetRef) -> Result<Vec<(u64, bool)>>
where
    P: Provider + ?Sized,
{
    let pull_requests = provider.pull_requests(target, IssueState::All).await?;
    let mut lines = Vec::with_capacity(pull_requests.len());
    for pr in pull_requests {
        let additions = provider.pull_request_additions(target, pr.number).await?;
        let reviewed = provider.review_count(target, pr.number).await? > 0;
        lines.push((additions, reviewed));
    }
    Ok(lines)
}

/// Fraction of added lines that went through review. No pull requests, no
/// additions, or no reviewed additions all score zero.
pub fn score_review_coverage(lines: &[(u64, bool)]) -> f64 {
    if lines.is_empty() {
        return 0.0;
    }
    let total: u64 = lines.iter().map(|(additions, _)| additions).sum();
    let reviewed: u64 = lines
        .iter()
        .filter(|(_, reviewed)| *reviewed)
        .map(|(additions, _)| additions)
        .sum();
    if total == 0 || reviewed == 0 {
        return 0.0;
    }
    reviewed as f64 / total as f64
}

/// Tests

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_pull_requests_scores_zero() {
        assert_eq!(score_review_coverage(&[]), 0.0);
    }

    #[test]
    fn zero_added_lines_scores_zero() {
        assert_eq!(score_review_coverage(&[(0, true), (0, false)]), 0.0);
    }

    #[test]
    fn unreviewed_history_scores_zero() {
        assert_eq!(score_review_coverage(&[(100, false), (50, false)]), 0.0);
    }

    #[test]
    fn fully_reviewed_history_scores_one() {
        assert_eq!(score_review_coverage(&[(100, true), (50, true)]), 1.0);
    }

    #[test]
    fn partial_coverage_is_the_line_fraction() {
        assert_eq!(score_review_coverage(&[(100, true), (300, false)]), 0.25);
    }
}
