//! Package trustworthiness scoring
//!
//! # Overview
//!
//! Given a GitHub repository (or an npm package that links to one), the engine
//! evaluates seven independent health metrics against the repository's hosting
//! metadata: maintainer diversity (bus factor), issue/PR resolution health,
//! onboarding quality of the README, maintainer responsiveness, license
//! compatibility, code-review coverage of merged lines, and dependency-pinning
//! discipline.
//!
//! All seven evaluators run concurrently for a single target and every one of
//! them degrades to a zero score on failure, so a batch of input URLs always
//! produces one fully-populated report per line. The sub-scores are combined
//! into a weighted net score in `[0, 1]`.
//!
//! The `api` feature exposes the provider traits and domain types that client
//! crates implement; the `orchestrator` feature adds the evaluators, the
//! aggregation policy, and the fan-out orchestrator itself.

#[cfg(feature = "api")]
pub mod api;

#[cfg(feature = "orchestrator")]
pub mod metrics;
#[cfg(feature = "orchestrator")]
pub mod orchestrator;
#[cfg(feature = "orchestrator")]
pub mod report;
#[cfg(feature = "orchestrator")]
pub mod url;
#[cfg(feature = "orchestrator")]
pub mod weights;

#[cfg(feature = "orchestrator")]
pub use orchestrator::Orchestrator;
#[cfg(feature = "orchestrator")]
pub use report::{EvaluationReport, MetricResult};
#[cfg(feature = "orchestrator")]
pub use weights::{WeightPreset, Weights};
