use crate::api::{Error, Result};
use crate::report::MetricSet;
use strum_macros::{Display, EnumString};

const SUM_TOLERANCE: f64 = 1e-6;

/// Aggregation policy: the relative weight of each sub-metric in the net
/// score. Weights must sum to 1.0 so the net score stays a convex
/// combination of scores in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Weights {
    pub correctness: f64,
    pub bus_factor: f64,
    pub responsiveness: f64,
    pub ramp_up: f64,
    pub license: f64,
    pub pr_reviews: f64,
    pub dependency: f64,
}

impl Weights {
    /// Canonical weighting: engagement metrics dominate, packaging
    /// discipline contributes the remainder.
    pub const fn balanced() -> Self {
        Weights {
            correctness: 0.2,
            bus_factor: 0.2,
            responsiveness: 0.2,
            ramp_up: 0.2,
            license: 0.1,
            pr_reviews: 0.05,
            dependency: 0.05,
        }
    }

    /// Near-uniform weighting with a slightly heavier review-coverage share.
    pub const fn flat() -> Self {
        Weights {
            correctness: 0.15,
            bus_factor: 0.15,
            responsiveness: 0.15,
            ramp_up: 0.15,
            license: 0.15,
            pr_reviews: 0.10,
            dependency: 0.15,
        }
    }

    pub fn validate(&self) -> Result<()> {
        let sum = self.correctness
            + self.bus_factor
            + self.responsiveness
            + self.ramp_up
            + self.license
            + self.pr_reviews
            + self.dependency;
        if (sum - 1.0).abs() > SUM_TOLERANCE {
            return Err(Error::Config(format!(
                "metric weights must sum to 1.0, got {sum}"
            )));
        }
        Ok(())
    }

    pub fn net_score(&self, metrics: &MetricSet) -> f64 {
        metrics.correctness.score * self.correctness
            + metrics.bus_factor.score * self.bus_factor
            + metrics.responsiveness.score * self.responsiveness
            + metrics.ramp_up.score * self.ramp_up
            + metrics.license.score * self.license
            + metrics.pr_reviews.score * self.pr_reviews
            + metrics.dependency.score * self.dependency
    }
}

impl Default for Weights {
    fn default() -> Self {
        Weights::balanced()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum WeightPreset {
    Balanced,
    Flat,
}

impl From<WeightPreset> for Weights {
    fn from(preset: WeightPreset) -> Self {
        match preset {
            WeightPreset::Balanced => Weights::balanced(),
            WeightPreset::Flat => Weights::flat(),
        }
    }
}

/// Tests
