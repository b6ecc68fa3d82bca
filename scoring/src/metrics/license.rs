use crate::api::{Provider, TargetRef};
use crate::metrics::elapsed_ms;
use crate::report::MetricResult;
use log::{debug, error, warn};
use regex::Regex;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;
use std::time::Instant;

/// A recognized license and the text patterns that identify it.
struct LicenseDefinition {
    name: &'static str,
    patterns: Vec<Regex>,
}

fn definition(name: &'static str, patterns: &[&str]) -> LicenseDefinition {
    LicenseDefinition {
        name,
        patterns: patterns
            .iter()
            .map(|pattern| Regex::new(pattern).expect("invalid regex"))
            .collect(),
    }
}

/// Licenses compatible with the scoring policy, in match order. Patterns
/// tolerate the `v2` / `version 2` / `2.0` spelling variants.
static COMPATIBLE_LICENSES: LazyLock<Vec<LicenseDefinition>> = LazyLock::new(|| {
    vec![
        definition("MIT", &[r"(?i)\bMIT\b"]),
        definition(
            "Apache-2.0",
            &[r"(?i)\bAPACHE(?:\s+LICENSE)?(?:,?\s+V(?:ERSION)?)?\s*2(?:\.0)?\b"],
        ),
        definition(
            "GPL-3.0",
            &[
                r"(?i)\bGPL[\s-]?(?:V(?:ERSION)?\s*)?3(?:\.0)?\b",
                r"(?i)\bGNU\s+GENERAL\s+PUBLIC\s+LICENSE\s+(?:V(?:ERSION)?\s*)?3(?:\.0)?\b",
            ],
        ),
        definition(
            "GPL-2.0",
            &[
                r"(?i)\bGPL[\s-]?(?:V(?:ERSION)?\s*)?2(?:\.0)?\b",
                r"(?i)\bGNU\s+GENERAL\s+PUBLIC\s+LICENSE\s+(?:V(?:ERSION)?\s*)?2(?:\.0)?\b",
            ],
        ),
        definition("BSD-3-Clause", &[r"(?i)\bBSD[\s-]3[\s-]CLAUSE\b"]),
        definition("BSD-2-Clause", &[r"(?i)\bBSD[\s-]2[\s-]CLAUSE\b"]),
        definition(
            "LGPL-2.1",
            &[
                r"(?i)\bLGPL[\s-]?(?:V(?:ERSION)?\s*)?2\.1\b",
                r"(?i)\bGNU\s+LESSER\s+GENERAL\s+PUBLIC\s+LICENSE\s+(?:V(?:ERSION)?\s*)?2\.1\b",
            ],
        ),
        definition("Zlib", &[r"(?i)\bZLIB\b"]),
    ]
});

/// Heading-bounded "License" section of a README.
static README_LICENSE_SECTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)#+\s*licen[cs]e\b\s*([^#]*)").expect("invalid regex"));

/// Evaluates license compatibility, preferring a local checkout when one is
/// configured; otherwise the provider README's license section is consulted.
pub async fn evaluate<P>(
    provider: &P,
    target: &TargetRef,
    checkout: Option<&Path>,
) -> MetricResult
where
    P: Provider + ?Sized,
{
    let started = Instant::now();
    let text = match checkout {
        Some(dir) if dir.is_dir() => license_text_from_checkout(dir),
        _ => match provider.readme(target).await {
            Ok(readme) => license_section(&readme),
            Err(err) => {
                error!("license lookup for {target} failed: {err}");
                None
            }
        },
    };

    let score = match text.as_deref().and_then(matched_license) {
        Some(name) => {
            debug!("license for {target}: {name}");
            1.0
        }
        None => {
            warn!("no compatible license found for {target}");
            0.0
        }
    };
    MetricResult::new(score, elapsed_ms(started))
}

/// First compatible license whose pattern matches the text.
pub fn matched_license(text: &str) -> Option<&'static str> {
    COMPATIBLE_LICENSES
        .iter()
        .find(|license| license.patterns.iter().any(|pattern| pattern.is_match(text)))
        .map(|license| license.name)
}

/// License text from a checkout: a top-level `LICENSE*` file first, then the
/// license section of `README.md`.
pub fn license_text_from_checkout(dir: &Path) -> Option<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .ok()?
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().is_file())
        .filter_map(|entry| entry.file_name().into_string().ok())
        .collect();
    names.sort();

    if let Some(name) = names
        .iter()
        .find(|name| name.to_uppercase().starts_with("LICENSE"))
    {
        return fs::read_to_string(dir.join(name)).ok();
    }

    let readme = names
        .iter()
        .find(|name| name.eq_ignore_ascii_case("readme.md"))?;
    license_section(&fs::read_to_string(dir.join(readme)).ok()?)
}

pub fn license_section(readme: &str) -> Option<String> {
    README_LICENSE_SECTION
        .captures(readme)
        .map(|captures| captures[1].trim().to_string())
        .filter(|section| !section.is_empty())
}

/// Tests
