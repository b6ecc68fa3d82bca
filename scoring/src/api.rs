use async_trait::async_trait;
use chrono::{DateTime, Utc};
use derive_more::Constructor;
use std::fmt::{self, Display};
use strum_macros::Display as StrumDisplay;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("configuration error: {0}")]
    Config(String),
    #[error("cannot resolve {0}")]
    Resolution(String),
    // the only reason of the `reqwest` dependency..
    #[error("request error: {0}")]
    Request(#[from] reqwest::Error),
    #[error("malformed response: {0}")]
    MalformedResponse(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Resolved `owner/repo` pair identifying the project under evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetRef {
    owner: String,
    repo: String,
}

impl TargetRef {
    pub fn new(owner: impl Into<String>, repo: impl Into<String>) -> Result<Self> {
        let owner = owner.into();
        let repo = repo.into();
        if owner.is_empty() || repo.is_empty() {
            return Err(Error::Resolution(format!(
                "incomplete repository reference '{owner}/{repo}'"
            )));
        }
        Ok(TargetRef { owner, repo })
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn repo(&self) -> &str {
        &self.repo
    }
}

impl Display for TargetRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, StrumDisplay)]
#[strum(serialize_all = "lowercase")]
pub enum IssueState {
    Open,
    Closed,
    All,
}

#[derive(Constructor, Debug, Clone, PartialEq)]
pub struct Issue {
    pub created_at: DateTime<Utc>,
    pub closed_at: Option<DateTime<Utc>>,
}

#[derive(Constructor, Debug, Clone, PartialEq)]
pub struct PullRequest {
    pub number: u64,
    pub created_at: DateTime<Utc>,
    pub merged_at: Option<DateTime<Utc>>,
}

#[derive(Constructor, Debug, Clone, PartialEq)]
pub struct Commit {
    pub author: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Constructor, Debug, Clone, PartialEq)]
pub struct Contributor {
    pub identity: String,
    pub contributions: u32,
}

/// Source-control metadata provider consumed by the metric evaluators.
///
/// Implementations must be safe for concurrent use: all seven evaluators of a
/// single evaluation share one provider instance.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Number of issues in the given state, excluding pull-request-backed ones.
    async fn issue_count(&self, target: &TargetRef, state: IssueState) -> Result<u32>;

    async fn closed_issues(&self, target: &TargetRef) -> Result<Vec<Issue>>;

    async fn pull_requests(&self, target: &TargetRef, state: IssueState)
        -> Result<Vec<PullRequest>>;

    async fn pull_request_count(&self, target: &TargetRef, state: IssueState) -> Result<u32> {
        Ok(self.pull_requests(target, state).await?.len() as u32)
    }

    /// Line-addition count of a single pull request's diff.
    async fn pull_request_additions(&self, target: &TargetRef, number: u64) -> Result<u64>;

    async fn review_count(&self, target: &TargetRef, number: u64) -> Result<u32>;

    /// Timestamp of the first comment on a pull request, if any.
    async fn first_pr_comment(
        &self,
        target: &TargetRef,
        number: u64,
    ) -> Result<Option<DateTime<Utc>>>;

    async fn commits(&self, target: &TargetRef) -> Result<Vec<Commit>>;

    async fn contributors(&self, target: &TargetRef) -> Result<Vec<Contributor>>;

    async fn readme(&self, target: &TargetRef) -> Result<String>;

    /// Manifest (`package.json`) contents, or `None` if the repository has none.
    async fn manifest(&self, target: &TargetRef) -> Result<Option<String>>;
}

/// Package-registry metadata lookup used to resolve registry URLs to
/// source repositories.
#[async_trait]
pub trait RegistryResolver: Send + Sync {
    /// Repository URL recorded in the registry metadata, or `None` if the
    /// package has no linked repository.
    async fn repository_url(&self, package: &str) -> Result<Option<String>>;
}

/// Tests

#[test]
fn target_ref_rejects_empty_fields() {
    assert!(TargetRef::new("", "repo").is_err());
    assert!(TargetRef::new("owner", "").is_err());
    let target = TargetRef::new("owner", "repo").unwrap();
    assert_eq!(target.to_string(), "owner/repo");
}

#[test]
fn issue_state_renders_as_query_value() {
    assert_eq!(IssueState::Open.to_string(), "open");
    assert_eq!(IssueState::Closed.to_string(), "closed");
    assert_eq!(IssueState::All.to_string(), "all");
}
