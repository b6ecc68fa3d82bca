use crate::api::{Error, RegistryResolver, Result, TargetRef};
use regex::Regex;
use std::sync::LazyLock;
use strum_macros::Display;

static GITHUB_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https?://github\.com/[^/]+/[^/]+/?$").expect("invalid regex")
});
static NPM_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https?://(?:www\.)?npmjs\.com/package/(?P<package>[^/]+)/?$")
        .expect("invalid regex")
});
static REPO_REF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"github\.com[:/](?P<owner>[^/]+)/(?P<repo>[^/]+?)/?$").expect("invalid regex")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum UrlKind {
    SourceRepo,
    PackageRegistry,
    Unsupported,
}

pub fn classify(input: &str) -> UrlKind {
    if GITHUB_URL.is_match(input) {
        UrlKind::SourceRepo
    } else if NPM_URL.is_match(input) {
        UrlKind::PackageRegistry
    } else {
        UrlKind::Unsupported
    }
}

/// Extracts `owner/repo` from a GitHub URL, tolerating `git@`-style
/// separators and a trailing `.git`.
pub fn parse_repo_url(input: &str) -> Result<TargetRef> {
    let captures = REPO_REF
        .captures(input)
        .ok_or_else(|| Error::Resolution(format!("not a repository URL: {input}")))?;
    let owner = &captures["owner"];
    let repo = &captures["repo"];
    let repo = repo.strip_suffix(".git").unwrap_or(repo);
    TargetRef::new(owner, repo)
}

pub fn npm_package_name(input: &str) -> Option<String> {
    NPM_URL
        .captures(input)
        .map(|captures| captures["package"].to_string())
}

/// Registry metadata records repository URLs in VCS notation; strip the
/// `git+` prefix and rewrite `git://` before parsing.
fn normalize_repository_url(raw: &str) -> String {
    let url = raw.strip_prefix("git+").unwrap_or(raw);
    match url.strip_prefix("git://") {
        Some(rest) => format!("https://{rest}"),
        None => url.to_string(),
    }
}

/// Resolves an input URL to the repository it identifies, consulting the
/// package registry for registry URLs. Every failure mode surfaces as a
/// resolution error so the caller can emit a zero-valued report instead of
/// aborting the batch.
pub async fn resolve<R>(input: &str, registry: &R) -> Result<TargetRef>
where
    R: RegistryResolver + ?Sized,
{
    match classify(input) {
        UrlKind::SourceRepo => parse_repo_url(input),
        UrlKind::PackageRegistry => {
            let package = npm_package_name(input)
                .ok_or_else(|| Error::Resolution(format!("invalid registry URL: {input}")))?;
            let raw = registry.repository_url(&package).await?.ok_or_else(|| {
                Error::Resolution(format!("package {package} has no linked repository"))
            })?;
            parse_repo_url(&normalize_repository_url(&raw))
        }
        UrlKind::Unsupported => Err(Error::Resolution(format!("unsupported URL: {input}"))),
    }
}

/// Tests

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_by_host() {
        assert_eq!(classify("https://github.com/lodash/lodash"), UrlKind::SourceRepo);
        assert_eq!(classify("http://github.com/a/b.git"), UrlKind::SourceRepo);
        assert_eq!(
            classify("https://www.npmjs.com/package/express"),
            UrlKind::PackageRegistry
        );
        assert_eq!(
            classify("https://npmjs.com/package/express"),
            UrlKind::PackageRegistry
        );
        assert_eq!(classify("https://gitlab.com/a/b"), UrlKind::Unsupported);
        assert_eq!(classify("not a url"), UrlKind::Unsupported);
    }

    #[test]
    fn parses_owner_and_repo() {
        let target = parse_repo_url("https://github.com/lodash/lodash").unwrap();
        assert_eq!(target.owner(), "lodash");
        assert_eq!(target.repo(), "lodash");
    }

    #[test]
    fn strips_git_suffix_and_trailing_slash() {
        let target = parse_repo_url("https://github.com/socketio/socket.io.git").unwrap();
        assert_eq!(target.repo(), "socket.io");
        let target = parse_repo_url("https://github.com/a/b/").unwrap();
        assert_eq!(target.repo(), "b");
    }

    #[test]
    fn parses_scp_style_remotes() {
        let target = parse_repo_url("git@github.com:owner/repo.git").unwrap();
        assert_eq!(target.owner(), "owner");
        assert_eq!(target.repo(), "repo");
    }

    #[test]
    fn extracts_package_name() {
        assert_eq!(
            npm_package_name("https://www.npmjs.com/package/left-pad"),
            Some("left-pad".to_string())
        );
        assert_eq!(npm_package_name("https://www.npmjs.com/settings"), None);
    }

    #[test]
    fn normalizes_vcs_notation() {
        assert_eq!(
            normalize_repository_url("git+https://github.com/a/b.git"),
            "https://github.com/a/b.git"
        );
        assert_eq!(
            normalize_repository_url("git://github.com/a/b.git"),
            "https://github.com/a/b.git"
        );
        assert_eq!(
            normalize_repository_url("https://github.com/a/b"),
            "https://github.com/a/b"
        );
    }

    struct FixedRegistry(Option<String>);

    #[async_trait::async_trait]
    impl RegistryResolver for FixedRegistry {
        async fn repository_url(&self, _package: &str) -> Result<Option<String>> {
            Ok(self.0.clone())
        }
    }

    #[tokio::test]
    async fn resolves_registry_url_through_metadata() {
        let registry = FixedRegistry(Some("git+https://github.com/owner/repo.git".to_string()));
        let target = resolve("https://www.npmjs.com/package/x", &registry)
            .await
            .unwrap();
        assert_eq!(target.to_string(), "owner/repo");
    }

    #[tokio::test]
    async fn missing_repository_field_is_a_resolution_error() {
        let registry = FixedRegistry(None);
        let err = resolve("https://www.npmjs.com/package/x", &registry)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Resolution(_)));
    }

    #[tokio::test]
    async fn unsupported_url_never_reaches_the_registry() {
        struct PanickingRegistry;

        #[async_trait::async_trait]
        impl RegistryResolver for PanickingRegistry {
            async fn repository_url(&self, _package: &str) -> Result<Option<String>> {
                panic!("registry must not be queried for unsupported URLs");
            }
        }

        let err = resolve("https://example.com/thing", &PanickingRegistry)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Resolution(_)));
    }
}
