//! GitHub REST implementation of the source metadata provider.

mod builder;
mod limiter;
mod pager;
mod payload;

pub use builder::GithubClientBuilder;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use limiter::RateLimiter;
use pager::Pager;
use reqwest::header;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use trust_score::api::{self, IssueState, Provider, Result, TargetRef};

const PER_PAGE: usize = 100;
const RAW_CONTENT: &str = "application/vnd.github.v3.raw";

pub struct GithubClient {
    client: reqwest::Client,
    api_url: String,
    limiter: RateLimiter,
    max_pages: u32,
}

impl GithubClient {
    fn repo_url(&self, target: &TargetRef, tail: &str) -> String {
        format!(
            "{}/repos/{}/{}{}",
            self.api_url,
            target.owner(),
            target.repo(),
            tail
        )
    }

    async fn get_json<T>(&self, url: &str, query: &[(&str, String)]) -> Result<T>
    where
        T: DeserializeOwned,
    {
        self.limiter.acquire().await;
        let response = self.client.get(url).query(query).send().await?;
        self.limiter.observe(response.headers()).await;
        Ok(response.error_for_status()?.json::<T>().await?)
    }

    /// Fetches a list endpoint page by page until a short page or the page
    /// cap, whichever comes first.
    async fn get_paged<T>(&self, url: &str, query: &[(&str, String)]) -> Result<Vec<T>>
    where
        T: DeserializeOwned,
    {
        let mut pager = Pager::bounded(self.max_pages);
        let mut items = Vec::new();
        while let Some(page) = pager.next_page() {
            let mut query = query.to_vec();
            query.push(("per_page", PER_PAGE.to_string()));
            query.push(("page", page.to_string()));
            let batch: Vec<T> = self.get_json(url, &query).await?;
            let short_page = batch.len() < PER_PAGE;
            items.extend(batch);
            if short_page {
                break;
            }
        }
        Ok(items)
    }

    /// `/issues` also lists pull requests; keep only true issues.
    async fn issues(&self, target: &TargetRef, state: IssueState) -> Result<Vec<payload::Issue>> {
        let issues: Vec<payload::Issue> = self
            .get_paged(
                &self.repo_url(target, "/issues"),
                &[("state", state.to_string())],
            )
            .await?;
        Ok(issues
            .into_iter()
            .filter(|issue| issue.pull_request.is_none())
            .collect())
    }

    async fn get_raw(&self, url: &str) -> Result<reqwest::Response> {
        self.limiter.acquire().await;
        let response = self
            .client
            .get(url)
            .header(header::ACCEPT, RAW_CONTENT)
            .send()
            .await?;
        self.limiter.observe(response.headers()).await;
        Ok(response)
    }
}

#[async_trait]
impl Provider for GithubClient {
    async fn issue_count(&self, target: &TargetRef, state: IssueState) -> Result<u32> {
        Ok(self.issues(target, state).await?.len() as u32)
    }

    async fn closed_issues(&self, target: &TargetRef) -> Result<Vec<api::Issue>> {
        let issues = self.issues(target, IssueState::Closed).await?;
        Ok(issues.into_iter().map(api::Issue::from).collect())
    }

    async fn pull_requests(
        &self,
        target: &TargetRef,
        state: IssueState,
    ) -> Result<Vec<api::PullRequest>> {
        let pull_requests: Vec<payload::PullRequest> = self
            .get_paged(
                &self.repo_url(target, "/pulls"),
                &[("state", state.to_string())],
            )
            .await?;
        Ok(pull_requests
            .into_iter()
            .map(api::PullRequest::from)
            .collect())
    }

    async fn pull_request_additions(&self, target: &TargetRef, number: u64) -> Result<u64> {
        let details: payload::PullRequestDetails = self
            .get_json(&self.repo_url(target, &format!("/pulls/{number}")), &[])
            .await?;
        Ok(details.additions)
    }

    async fn review_count(&self, target: &TargetRef, number: u64) -> Result<u32> {
        let reviews: Vec<payload::Review> = self
            .get_paged(&self.repo_url(target, &format!("/pulls/{number}/reviews")), &[])
            .await?;
        Ok(reviews.len() as u32)
    }

    async fn first_pr_comment(
        &self,
        target: &TargetRef,
        number: u64,
    ) -> Result<Option<DateTime<Utc>>> {
        let comments: Vec<payload::Comment> = self
            .get_json(
                &self.repo_url(target, &format!("/issues/{number}/comments")),
                &[("per_page", "1".to_string()), ("page", "1".to_string())],
            )
            .await?;
        Ok(comments.first().map(|comment| comment.created_at))
    }

    async fn commits(&self, target: &TargetRef) -> Result<Vec<api::Commit>> {
        let commits: Vec<payload::Commit> = self
            .get_paged(&self.repo_url(target, "/commits"), &[])
            .await?;
        Ok(commits.into_iter().map(api::Commit::from).collect())
    }

    async fn contributors(&self, target: &TargetRef) -> Result<Vec<api::Contributor>> {
        let contributors: Vec<payload::Contributor> = self
            .get_paged(&self.repo_url(target, "/contributors"), &[])
            .await?;
        Ok(contributors
            .into_iter()
            .map(api::Contributor::from)
            .collect())
    }

    async fn readme(&self, target: &TargetRef) -> Result<String> {
        let response = self.get_raw(&self.repo_url(target, "/readme")).await?;
        Ok(response.error_for_status()?.text().await?)
    }

    async fn manifest(&self, target: &TargetRef) -> Result<Option<String>> {
        let response = self
            .get_raw(&self.repo_url(target, "/contents/package.json"))
            .await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        Ok(Some(response.error_for_status()?.text().await?))
    }
}
