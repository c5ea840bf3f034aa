//! Reqwest-backed catalog adapter.
//!
//! This adapter owns transport details only: URL construction, timeout and
//! HTTP error mapping, and JSON decoding into launches.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::{Client, Url};

use crate::dto::parse_launches;
use crate::{CatalogError, Launch, LaunchCatalog, LaunchId, Result};

const LAUNCHES_PATH: &str = "launches";
const MAX_ERROR_BODY_CHARS: usize = 256;

/// Catalog client performing GET requests against one base URL.
///
/// The underlying `reqwest::Client` holds the connection pool; clones share
/// it.
#[derive(Debug, Clone)]
pub struct HttpLaunchCatalog {
    client: Client,
    base_url: Url,
}

impl HttpLaunchCatalog {
    /// Builds a catalog client with an explicit request timeout.
    ///
    /// `base_url` should end with `/` so that `launches` is resolved
    /// beneath it.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(base_url: Url, timeout: Duration) -> std::result::Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base_url })
    }

    /// Builds a catalog client from a configured base URL string.
    ///
    /// A missing trailing `/` is added so relative paths resolve beneath
    /// the base.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::InvalidUrl`] for an unparsable URL.
    pub fn from_base_url(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{base_url}/")
        };
        let base_url =
            Url::parse(&base_url).map_err(|e| CatalogError::InvalidUrl(format!("{base_url}: {e}")))?;
        Ok(Self::new(base_url, timeout)?)
    }

    /// Returns the base URL requests are resolved against.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn launches_url(&self) -> Result<Url> {
        self.base_url
            .join(LAUNCHES_PATH)
            .map_err(|e| CatalogError::InvalidUrl(e.to_string()))
    }

    async fn fetch(&self, url: Url) -> Result<Vec<Launch>> {
        let started = Instant::now();
        let response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        let body = response.bytes().await?;
        metrics::histogram!("gateway_catalog_fetch_seconds")
            .record(started.elapsed().as_secs_f64());

        if !status.is_success() {
            let text: String = String::from_utf8_lossy(&body)
                .chars()
                .take(MAX_ERROR_BODY_CHARS)
                .collect();
            tracing::warn!(status = status.as_u16(), "catalog returned error status");
            return Err(CatalogError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        Ok(parse_launches(body.as_ref())?)
    }
}

#[async_trait]
impl LaunchCatalog for HttpLaunchCatalog {
    #[tracing::instrument(skip(self))]
    async fn get_all_launches(&self) -> Result<Vec<Launch>> {
        let mut launches = self.fetch(self.launches_url()?).await?;
        // The remote order is not guaranteed; pagination relies on ids being
        // sorted and unique.
        launches.sort_by_key(|launch| launch.id);
        launches.dedup_by_key(|launch| launch.id);
        tracing::debug!(count = launches.len(), "fetched launches");
        Ok(launches)
    }

    #[tracing::instrument(skip(self))]
    async fn get_launch_by_id(&self, id: LaunchId) -> Result<Option<Launch>> {
        let mut url = self.launches_url()?;
        url.query_pairs_mut()
            .append_pair("flight_number", &id.to_string());

        let launches = self.fetch(url).await?;
        Ok(launches.into_iter().find(|launch| launch.id == id))
    }
}
