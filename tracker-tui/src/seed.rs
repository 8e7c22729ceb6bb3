//! Seed document source.
//!
//! When no persisted data exists the tracker starts from a seed document,
//! read from a local JSON file or fetched over HTTP. Fetching is the only
//! asynchronous step in the program and happens once at startup.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::Client;

use crate::models::ProjectsDocument;

/// Upper bound for fetching a remote seed document
const SEED_TIMEOUT: Duration = Duration::from_secs(10);

/// Where the seed document comes from
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SeedSource {
    /// Start with an empty collection
    #[default]
    None,
    /// Local JSON file
    File(PathBuf),
    /// HTTP(S) resource
    Url(String),
}

impl SeedSource {
    /// Interpret a command-line value: URLs start with `http://` or
    /// `https://`, `none` or an empty value disables seeding, anything else
    /// is a path.
    pub fn parse(value: &str) -> Self {
        let value = value.trim();
        if value.is_empty() || value.eq_ignore_ascii_case("none") {
            SeedSource::None
        } else if value.starts_with("http://") || value.starts_with("https://") {
            SeedSource::Url(value.to_string())
        } else {
            SeedSource::File(PathBuf::from(value))
        }
    }
}

impl std::fmt::Display for SeedSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SeedSource::None => write!(f, "none"),
            SeedSource::File(path) => write!(f, "{}", path.display()),
            SeedSource::Url(url) => write!(f, "{}", url),
        }
    }
}

/// Loads seed documents
#[derive(Debug, Clone)]
pub struct SeedClient {
    client: Client,
}

impl SeedClient {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .timeout(SEED_TIMEOUT)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client })
    }

    /// Load the seed document. `Ok(None)` means seeding is disabled.
    pub async fn fetch(&self, source: &SeedSource) -> Result<Option<ProjectsDocument>> {
        match source {
            SeedSource::None => Ok(None),
            SeedSource::File(path) => {
                let raw = tokio::fs::read_to_string(path)
                    .await
                    .with_context(|| format!("Failed to read seed file {}", path.display()))?;
                let doc = serde_json::from_str(&raw)
                    .with_context(|| format!("Failed to parse seed file {}", path.display()))?;
                Ok(Some(doc))
            }
            SeedSource::Url(url) => self.fetch_url(url).await.map(Some),
        }
    }

    async fn fetch_url(&self, url: &str) -> Result<ProjectsDocument> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .context("Failed to send request for seed document")?;

        if !response.status().is_success() {
            anyhow::bail!(
                "Seed fetch failed: {} - {}",
                response.status(),
                response.text().await.unwrap_or_default()
            );
        }

        response
            .json()
            .await
            .context("Failed to parse seed document")
    }
}
