use derive_more::Constructor;
use serde::Serialize;

/// Outcome of a single metric evaluation.
///
/// Created exactly once per evaluator invocation; a failed or input-starved
/// metric yields a zero score, never an absent one.
#[derive(Constructor, Debug, Clone, Copy, PartialEq)]
pub struct MetricResult {
    pub score: f64,
    pub latency_ms: u64,
}

impl MetricResult {
    pub fn zero(latency_ms: u64) -> Self {
        MetricResult::new(0.0, latency_ms)
    }
}

/// One result per metric, in aggregation order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricSet {
    pub correctness: MetricResult,
    pub bus_factor: MetricResult,
    pub responsiveness: MetricResult,
    pub ramp_up: MetricResult,
    pub license: MetricResult,
    pub pr_reviews: MetricResult,
    pub dependency: MetricResult,
}

/// Final scored report for one input URL.
///
/// Field names follow the established output contract of the scorer: scores
/// rounded to three decimals, latencies reported in seconds with three
/// decimals.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationReport {
    #[serde(rename = "URL")]
    pub url: String,
    #[serde(rename = "NetScore")]
    pub net_score: f64,
    #[serde(rename = "NetScore_Latency")]
    pub net_score_latency: f64,
    #[serde(rename = "RampUp")]
    pub ramp_up: f64,
    #[serde(rename = "RampUp_Latency")]
    pub ramp_up_latency: f64,
    #[serde(rename = "Correctness")]
    pub correctness: f64,
    #[serde(rename = "Correctness_Latency")]
    pub correctness_latency: f64,
    #[serde(rename = "BusFactor")]
    pub bus_factor: f64,
    #[serde(rename = "BusFactor_Latency")]
    pub bus_factor_latency: f64,
    #[serde(rename = "ResponsiveMaintainer")]
    pub responsive_maintainer: f64,
    #[serde(rename = "ResponsiveMaintainer_Latency")]
    pub responsive_maintainer_latency: f64,
    #[serde(rename = "License")]
    pub license: f64,
    #[serde(rename = "License_Latency")]
    pub license_latency: f64,
    #[serde(rename = "PR_Code_Reviews")]
    pub pr_code_reviews: f64,
    #[serde(rename = "PR_Code_Reviews_Latency")]
    pub pr_code_reviews_latency: f64,
    #[serde(rename = "DependencyMetric")]
    pub dependency: f64,
    #[serde(rename = "DependencyMetric_Latency")]
    pub dependency_latency: f64,
}

impl EvaluationReport {
    pub fn from_metrics(
        url: impl Into<String>,
        metrics: &MetricSet,
        net_score: f64,
        total_latency_ms: u64,
    ) -> Self {
        EvaluationReport {
            url: url.into(),
            net_score: round3(net_score),
            net_score_latency: secs(total_latency_ms),
            ramp_up: round3(metrics.ramp_up.score),
            ramp_up_latency: secs(metrics.ramp_up.latency_ms),
            correctness: round3(metrics.correctness.score),
            correctness_latency: secs(metrics.correctness.latency_ms),
            bus_factor: round3(metrics.bus_factor.score),
            bus_factor_latency: secs(metrics.bus_factor.latency_ms),
            responsive_maintainer: round3(metrics.responsiveness.score),
            responsive_maintainer_latency: secs(metrics.responsiveness.latency_ms),
            license: round3(metrics.license.score),
            license_latency: secs(metrics.license.latency_ms),
            pr_code_reviews: round3(metrics.pr_reviews.score),
            pr_code_reviews_latency: secs(metrics.pr_reviews.latency_ms),
            dependency: round3(metrics.dependency.score),
            dependency_latency: secs(metrics.dependency.latency_ms),
        }
    }

    /// Report for an input that never reached evaluation.
    pub fn zeroed(url: impl Into<String>) -> Self {
        let zero = MetricResult::zero(0);
        let metrics = MetricSet {
            correctness: zero,
            bus_factor: zero,
            responsiveness: zero,
            ramp_up: zero,
            license: zero,
            pr_reviews: zero,
            dependency: zero,
        };
        EvaluationReport::from_metrics(url, &metrics, 0.0, 0)
    }
}

/// Rounds to three decimal places.
fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

/// Milliseconds as seconds, rounded to three decimal places.
fn secs(latency_ms: u64) -> f64 {
    round3(latency_ms as f64 / 1000.0)
}

/// Tests

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round3_truncates_to_three_decimals() {
        assert_eq!(round3(0.762734), 0.763);
        assert_eq!(round3(0.1004), 0.1);
        assert_eq!(round3(1.0), 1.0);
    }

    #[test]
    fn latency_reported_in_seconds() {
        assert_eq!(secs(1234), 1.234);
        assert_eq!(secs(0), 0.0);
        assert_eq!(secs(12), 0.012);
    }

    #[test]
    fn zeroed_report_has_no_score_anywhere() {
        let report = EvaluationReport::zeroed("https://example.com/x");
        assert_eq!(report.url, "https://example.com/x");
        assert_eq!(report.net_score, 0.0);
        assert_eq!(report.bus_factor, 0.0);
        assert_eq!(report.license, 0.0);
        assert_eq!(report.net_score_latency, 0.0);
    }

    #[test]
    fn report_serializes_with_contract_field_names() {
        let report = EvaluationReport::zeroed("u");
        let json = serde_json::to_value(&report).unwrap();
        for field in [
            "URL",
            "NetScore",
            "NetScore_Latency",
            "RampUp",
            "Correctness",
            "BusFactor",
            "ResponsiveMaintainer",
            "License",
            "PR_Code_Reviews",
            "DependencyMetric",
            "DependencyMetric_Latency",
        ] {
            assert!(json.get(field).is_some(), "missing field {field}");
        }
    }
}
