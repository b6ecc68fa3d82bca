use chrono::{DateTime, Utc};
use serde::Deserialize;
use trust_score::api;

#[derive(Deserialize, Debug)]
pub struct Issue {
    pub created_at: DateTime<Utc>,
    pub closed_at: Option<DateTime<Utc>>,
    /// Present when the issue is backed by a pull request.
    pub pull_request: Option<PullRequestLink>,
}

#[derive(Deserialize, Debug)]
pub struct PullRequestLink {}

impl From<Issue> for api::Issue {
    fn from(issue: Issue) -> Self {
        api::Issue::new(issue.created_at, issue.closed_at)
    }
}

#[derive(Deserialize, Debug)]
pub struct PullRequest {
    pub number: u64,
    pub created_at: DateTime<Utc>,
    pub merged_at: Option<DateTime<Utc>>,
}

impl From<PullRequest> for api::PullRequest {
    fn from(pr: PullRequest) -> Self {
        api::PullRequest::new(pr.number, pr.created_at, pr.merged_at)
    }
}

#[derive(Deserialize, Debug)]
pub struct PullRequestDetails {
    pub additions: u64,
}

/// Reviews are only ever counted, so the body shape is irrelevant.
#[derive(Deserialize, Debug)]
pub struct Review {}

#[derive(Deserialize, Debug)]
pub struct Comment {
    pub created_at: DateTime<Utc>,
}

#[derive(Deserialize, Debug)]
pub struct Commit {
    pub commit: CommitDetails,
}

#[derive(Deserialize, Debug)]
pub struct CommitDetails {
    pub author: CommitAuthor,
}

#[derive(Deserialize, Debug)]
pub struct CommitAuthor {
    pub name: String,
    pub date: DateTime<Utc>,
}

impl From<Commit> for api::Commit {
    fn from(commit: Commit) -> Self {
        api::Commit::new(commit.commit.author.name, commit.commit.author.date)
    }
}

#[derive(Deserialize, Debug)]
pub struct Contributor {
    pub login: String,
    pub contributions: u32,
}

impl From<Contributor> for api::Contributor {
    fn from(contributor: Contributor) -> Self {
        api::Contributor::new(contributor.login, contributor.contributions)
    }
}

/// Tests
