use crate::api::{Provider, RegistryResolver, TargetRef};
use crate::metrics::{
    bus_factor, bus_factor::BusFactorOutcome, correctness, dependency, elapsed_ms, license,
    pr_reviews, ramp_up, responsiveness,
};
use crate::report::{EvaluationReport, MetricResult, MetricSet};
use crate::url;
use crate::weights::Weights;
use log::{error, info};
use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

const DEFAULT_METRIC_TIMEOUT: Duration = Duration::from_secs(120);

/// Runs the seven metric evaluators concurrently for one target and folds
/// their results into a weighted report.
///
/// No evaluator failure ever aborts an evaluation: every metric degrades to
/// a zero score, and a target that cannot even be resolved short-circuits to
/// an all-zero report.
pub struct Orchestrator<P> {
    provider: Arc<P>,
    weights: Weights,
    checkout_root: Option<PathBuf>,
    metric_timeout: Duration,
}

impl<P> Orchestrator<P>
where
    P: Provider,
{
    pub fn new(provider: P, weights: Weights) -> Self {
        Orchestrator {
            provider: Arc::new(provider),
            weights,
            checkout_root: None,
            metric_timeout: DEFAULT_METRIC_TIMEOUT,
        }
    }

    /// Root directory holding local checkouts, laid out `<root>/<owner>_<repo>`.
    pub fn with_checkout_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.checkout_root = Some(root.into());
        self
    }

    pub fn with_metric_timeout(mut self, timeout: Duration) -> Self {
        self.metric_timeout = timeout;
        self
    }

    /// Resolves and evaluates one input URL. Resolution failures yield a
    /// zero-valued report without a single provider call.
    pub async fn evaluate_url<R>(&self, input: &str, registry: &R) -> EvaluationReport
    where
        R: RegistryResolver + ?Sized,
    {
        match url::resolve(input, registry).await {
            Ok(target) => self.evaluate(input, &target).await,
            Err(err) => {
                error!("skipping evaluation of {input}: {err}");
                EvaluationReport::zeroed(input)
            }
        }
    }

    /// Fans out all seven evaluators concurrently and joins their results.
    pub async fn evaluate(&self, input: &str, target: &TargetRef) -> EvaluationReport {
        let started = Instant::now();
        let provider = self.provider.as_ref();
        let checkout = self
            .checkout_root
            .as_ref()
            .map(|root| root.join(format!("{}_{}", target.owner(), target.repo())));

        let (correctness, bus_factor, license, ramp_up, responsiveness, pr_reviews, dependency) =
            futures::join!(
                self.bounded("correctness", correctness::evaluate(provider, target)),
                self.bounded_bus_factor(bus_factor::evaluate(provider, target)),
                self.bounded(
                    "license",
                    license::evaluate(provider, target, checkout.as_deref()),
                ),
                self.bounded("ramp-up", ramp_up::evaluate(provider, target)),
                self.bounded("responsiveness", responsiveness::evaluate(provider, target)),
                self.bounded("review coverage", pr_reviews::evaluate(provider, target)),
                self.bounded("dependency pinning", dependency::evaluate(provider, target)),
            );

        let metrics = MetricSet {
            correctness,
            bus_factor: bus_factor.result,
            responsiveness,
            ramp_up,
            license,
            pr_reviews,
            dependency,
        };
        let net_score = self.weights.net_score(&metrics);
        let total_ms = elapsed_ms(started);
        info!(
            "scored {input} as {net_score:.3} in {total_ms}ms (bus factor {})",
            bus_factor.bus_factor
        );
        EvaluationReport::from_metrics(input, &metrics, net_score, total_ms)
    }

    /// Applies the per-metric timeout; a timed-out metric is a failed metric.
    async fn bounded<F>(&self, name: &str, metric: F) -> MetricResult
    where
        F: Future<Output = MetricResult>,
    {
        let started = Instant::now();
        match tokio::time::timeout(self.metric_timeout, metric).await {
            Ok(result) => result,
            Err(_) => {
                error!("{name} timed out after {:?}", self.metric_timeout);
                MetricResult::zero(elapsed_ms(started))
            }
        }
    }

    async fn bounded_bus_factor<F>(&self, metric: F) -> BusFactorOutcome
    where
        F: Future<Output = BusFactorOutcome>,
    {
        let started = Instant::now();
        match tokio::time::timeout(self.metric_timeout, metric).await {
            Ok(outcome) => outcome,
            Err(_) => {
                error!("bus factor timed out after {:?}", self.metric_timeout);
                BusFactorOutcome {
                    bus_factor: 1,
                    result: MetricResult::zero(elapsed_ms(started)),
                }
            }
        }
    }
}

/// Tests
