use crate::api::{Error, Provider, Result, TargetRef};
use crate::metrics::elapsed_ms;
use crate::report::MetricResult;
use log::{debug, error};
use semver::{Op, VersionReq};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::time::Instant;

#[derive(Debug, Default, Deserialize)]
struct Manifest {
    #[serde(default)]
    dependencies: BTreeMap<String, String>,
    #[serde(default, rename = "devDependencies")]
    dev_dependencies: BTreeMap<String, String>,
    #[serde(default, rename = "peerDependencies")]
    peer_dependencies: BTreeMap<String, String>,
    #[serde(default, rename = "optionalDependencies")]
    optional_dependencies: BTreeMap<String, String>,
}

impl Manifest {
    /// Union of all dependency groups; a name appearing in several groups is
    /// counted once.
    fn all_dependencies(self) -> BTreeMap<String, String> {
        let mut all = self.dependencies;
        all.extend(self.dev_dependencies);
        all.extend(self.peer_dependencies);
        all.extend(self.optional_dependencies);
        all
    }
}

pub async fn evaluate<P>(provider: &P, target: &TargetRef) -> MetricResult
where
    P: Provider + ?Sized,
{
    let started = Instant::now();
    match provider.manifest(target).await {
        Ok(Some(manifest)) => match score_manifest(&manifest) {
            Ok(score) => {
                debug!("dependency pinning for {target}: {score}");
                MetricResult::new(score, elapsed_ms(started))
            }
            Err(err) => {
                error!("dependency pinning for {target} failed: {err}");
                MetricResult::zero(elapsed_ms(started))
            }
        },
        Ok(None) => {
            debug!("no manifest found for {target}");
            MetricResult::zero(elapsed_ms(started))
        }
        Err(err) => {
            error!("dependency pinning for {target} failed: {err}");
            MetricResult::zero(elapsed_ms(started))
        }
    }
}

/// Fraction of declared dependencies pinned to an exact version. An empty
/// dependency set is vacuously well pinned.
pub fn score_manifest(manifest: &str) -> Result<f64> {
    let manifest: Manifest = serde_json::from_str(manifest)
        .map_err(|err| Error::MalformedResponse(format!("package.json: {err}")))?;
    let dependencies = manifest.all_dependencies();
    if dependencies.is_empty() {
        return Ok(1.0);
    }
    let pinned = dependencies
        .values()
        .filter(|version| is_pinned(version))
        .count();
    Ok(pinned as f64 / dependencies.len() as f64)
}

/// A version requirement is pinned when every comparator is an exact match
/// with at least major and minor specified. Bare `x.y.z` requirements are
/// exact in manifest notation, so they are normalized before parsing.
/// Anything unparseable counts as unpinned.
pub fn is_pinned(version: &str) -> bool {
    let version = version.trim();
    if version.is_empty() {
        return false;
    }
    let normalized = if version.starts_with(|c: char| c.is_ascii_digit()) {
        format!("={version}")
    } else {
        version.to_string()
    };
    match VersionReq::parse(&normalized) {
        Ok(req) => {
            !req.comparators.is_empty()
                && req
                    .comparators
                    .iter()
                    .all(|comparator| {
                        matches!(comparator.op, Op::Exact) && comparator.minor.is_some()
                    })
        }
        Err(_) => false,
    }
}

/// Tests
