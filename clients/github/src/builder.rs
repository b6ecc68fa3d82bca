use crate::limiter::RateLimiter;
use crate::GithubClient;
use reqwest::header;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::ClientBuilder;
use secrecy::ExposeSecret;
use std::time::Duration;
use trust_score::api::Result;
use url::Url;

const DEFAULT_API_URL: &str = "https://api.github.com";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const DEFAULT_MAX_PAGES: u32 = 30;

pub struct GithubClientBuilder {
    client_builder: ClientBuilder,
    api_url: String,
    headers: HeaderMap,
    timeout: Duration,
    connect_timeout: Duration,
    max_pages: u32,
}

impl Default for GithubClientBuilder {
    fn default() -> Self {
        let mut headers = HeaderMap::new();
        let _ = headers.insert(header::USER_AGENT, HeaderValue::from_static("trust-score"));
        let _ = headers.insert(
            header::ACCEPT,
            HeaderValue::from_static("application/vnd.github.v3+json"),
        );
        GithubClientBuilder {
            client_builder: ClientBuilder::default(),
            api_url: DEFAULT_API_URL.to_string(),
            headers,
            timeout: DEFAULT_TIMEOUT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            max_pages: DEFAULT_MAX_PAGES,
        }
    }
}

impl GithubClientBuilder {
    pub fn try_with_token(self, token: secrecy::SecretString) -> Result<GithubClientBuilder> {
        let value = format!("token {}", token.expose_secret());
        self.try_with_header(header::AUTHORIZATION, &value)
    }

    pub fn try_with_user_agent<STR: AsRef<str>>(self, user_agent: STR) -> Result<GithubClientBuilder> {
        self.try_with_header(header::USER_AGENT, user_agent.as_ref())
    }

    pub fn with_api_url<STR: AsRef<str>>(mut self, api_url: STR) -> GithubClientBuilder {
        self.api_url = api_url.as_ref().trim_end_matches('/').to_string();
        self
    }

    /// Response timeout for every request.
    pub fn with_timeout(mut self, timeout: Duration) -> GithubClientBuilder {
        self.timeout = timeout;
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> GithubClientBuilder {
        self.connect_timeout = timeout;
        self
    }

    /// Cap on pages fetched per list endpoint.
    pub fn with_max_pages(mut self, max_pages: u32) -> GithubClientBuilder {
        self.max_pages = max_pages;
        self
    }

    fn try_with_header(mut self, key: HeaderName, value: &str) -> Result<GithubClientBuilder> {
        let value = HeaderValue::from_str(value).map_err(anyhow::Error::from)?;
        let _ = self.headers.insert(key, value);
        Ok(self)
    }

    pub fn build(self) -> Result<GithubClient> {
        let _ = Url::parse(&self.api_url).map_err(anyhow::Error::from)?;
        let client = self
            .client_builder
            .default_headers(self.headers)
            .timeout(self.timeout)
            .connect_timeout(self.connect_timeout)
            .build()?;
        Ok(GithubClient {
            client,
            api_url: self.api_url,
            limiter: RateLimiter::optimistic(),
            max_pages: self.max_pages,
        })
    }
}

/// Tests
