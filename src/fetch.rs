use std::future::Future;
use std::time::Duration;

use anyhow::{Context, Result};
use url::Url;

use crate::utils::get_random_user_agent;

/// Turns a target reference into the raw HTML behind it.
///
/// The target is either an absolute URL or a reference relative to the site
/// base (a page token like `"2"`, or a detail link pulled from a listing row).
/// Implementations return the body as a string; callers parse it themselves,
/// since `scraper::Html` cannot cross task boundaries.
pub trait DocumentFetcher: Send + Sync {
    fn fetch(&self, target: &str) -> impl Future<Output = Result<String>> + Send;
}

/// HTTP-backed fetcher resolving relative targets against a base URL.
pub struct HttpFetcher {
    client: reqwest::Client,
    base: Url,
}

impl HttpFetcher {
    pub fn new(base_url: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .cookie_store(true)
            .build()?;

        let base = Url::parse(base_url).context("Invalid base URL")?;

        Ok(Self { client, base })
    }

    fn resolve(&self, target: &str) -> Result<Url> {
        self.base
            .join(target)
            .with_context(|| format!("Cannot resolve {} against {}", target, self.base))
    }
}

impl DocumentFetcher for HttpFetcher {
    async fn fetch(&self, target: &str) -> Result<String> {
        let url = self.resolve(target)?;
        log::info!("Fetching: {}", url);

        let response = self
            .client
            .get(url)
            .header("User-Agent", get_random_user_agent())
            .header("Accept", "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8")
            .header("Accept-Language", "en-US,en;q=0.5")
            .send()
            .await
            .context("Failed to fetch page")?;

        if !response.status().is_success() {
            anyhow::bail!("HTTP error: {}", response.status());
        }

        response.text().await.context("Failed to read response body")
    }
}
