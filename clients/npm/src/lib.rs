//! npm registry implementation of the package resolver.

mod payload;

use async_trait::async_trait;
use log::debug;
use reqwest::StatusCode;
use std::time::Duration;
use trust_score::api::{Error, RegistryResolver, Result};
use url::Url;

const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

pub struct NpmClient {
    client: reqwest::Client,
    registry_url: String,
}

impl NpmClient {
    pub fn new<STR: AsRef<str>>(registry_url: STR, timeout: Duration) -> Result<Self> {
        let registry_url = registry_url.as_ref().trim_end_matches('/').to_string();
        let _ = Url::parse(&registry_url).map_err(anyhow::Error::from)?;
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(DEFAULT_CONNECT_TIMEOUT)
            .build()?;
        Ok(NpmClient {
            client,
            registry_url,
        })
    }
}

#[async_trait]
impl RegistryResolver for NpmClient {
    async fn repository_url(&self, package: &str) -> Result<Option<String>> {
        let url = format!("{}/{}", self.registry_url, package);
        let response = self.client.get(&url).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(Error::Resolution(format!("package {package} not found")));
        }
        let metadata: payload::PackageMetadata = response.error_for_status()?.json().await?;
        let repository = metadata.repository.and_then(|repository| repository.url);
        debug!("registry metadata for {package}: repository {repository:?}");
        Ok(repository)
    }
}

/// Tests
