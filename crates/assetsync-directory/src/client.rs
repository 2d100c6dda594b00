//! reqwest-backed directory client.
//!
//! Talks JSON to the asset-management API with a bearer token. Every call is
//! one round trip bounded by the configured timeout; there is no retry.

use async_trait::async_trait;
use reqwest::{header, Client, Method, RequestBuilder};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::auth::ApiToken;
use crate::collection::{Collection, Query};
use crate::directory::Directory;
use crate::entity::{EntityId, RemoteEntity};
use crate::envelope;
use crate::error::{DirectoryError, DirectoryResult};

/// Request timeout used when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Connection settings for [`HttpDirectory`].
#[derive(Debug, Clone)]
pub struct DirectoryConfig {
    /// API base URL, e.g. `https://assets.example.com/api/v1`.
    pub base_url: String,
    pub token: ApiToken,
    pub timeout: Duration,
}

impl DirectoryConfig {
    pub fn new(base_url: impl Into<String>, token: ApiToken) -> Self {
        Self {
            base_url: base_url.into(),
            token,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn validate(&self) -> DirectoryResult<()> {
        let url = self.base_url.trim();
        if url.is_empty() {
            return Err(DirectoryError::InvalidConfig(
                "API base URL is empty".to_string(),
            ));
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(DirectoryError::InvalidConfig(format!(
                "API base URL must start with http:// or https://: {url}"
            )));
        }
        if self.token.is_empty() {
            return Err(DirectoryError::InvalidConfig(
                "API token is empty".to_string(),
            ));
        }
        if self.timeout.is_zero() {
            return Err(DirectoryError::InvalidConfig(
                "timeout must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Directory client over HTTP.
#[derive(Debug, Clone)]
pub struct HttpDirectory {
    /// Base URL without trailing slash.
    base_url: String,
    token: ApiToken,
    http_client: Client,
}

impl HttpDirectory {
    /// Build a client from configuration.
    pub fn new(config: DirectoryConfig) -> DirectoryResult<Self> {
        config.validate()?;

        let http_client = Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("assetsync/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| DirectoryError::InvalidConfig(format!("failed to build HTTP client: {e}")))?;

        Ok(Self::with_http_client(
            config.base_url,
            config.token,
            http_client,
        ))
    }

    /// Create a client with a pre-built `reqwest::Client` (for testing).
    #[must_use]
    pub fn with_http_client(base_url: String, token: ApiToken, http_client: Client) -> Self {
        let base_url = base_url.trim().trim_end_matches('/').to_string();
        Self {
            base_url,
            token,
            http_client,
        }
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn collection_url(&self, collection: Collection) -> String {
        format!("{}/{}", self.base_url, collection.path())
    }

    fn record_url(&self, collection: Collection, id: &EntityId) -> String {
        format!("{}/{}/{}", self.base_url, collection.path(), id)
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        let builder = self
            .http_client
            .request(method, url)
            .header(header::ACCEPT, "application/json");
        self.token.apply(builder)
    }
}

#[async_trait]
impl Directory for HttpDirectory {
    async fn search(
        &self,
        collection: Collection,
        query: &Query,
    ) -> DirectoryResult<Vec<RemoteEntity>> {
        let url = self.collection_url(collection);
        debug!(url = %url, query = %query, "GET");

        let response = self
            .request(Method::GET, &url)
            .query(&[(query.param(), query.value())])
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            warn!(collection = %collection, query = %query, status = status.as_u16(), "Search failed");
            return Err(DirectoryError::Server {
                status: status.as_u16(),
                body,
            });
        }

        let rows = envelope::parse_rows(&body).inspect_err(|e| {
            warn!(collection = %collection, query = %query, error = %e, "Search returned an unexpected body");
        })?;
        debug!(
            collection = %collection,
            query = %query,
            status = status.as_u16(),
            rows = rows.len(),
            "Search completed"
        );
        Ok(rows)
    }

    async fn create(
        &self,
        collection: Collection,
        payload: &Value,
    ) -> DirectoryResult<RemoteEntity> {
        let url = self.collection_url(collection);
        debug!(url = %url, "POST");

        let response = self.request(Method::POST, &url).json(payload).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            warn!(collection = %collection, status = status.as_u16(), body = %body, "Create failed");
            return Err(DirectoryError::Server {
                status: status.as_u16(),
                body,
            });
        }

        let created = envelope::extract_created(collection, &body).inspect_err(|e| {
            warn!(collection = %collection, status = status.as_u16(), error = %e, "Create not accepted");
        })?;
        info!(
            collection = %collection,
            status = status.as_u16(),
            id = %created.id().map(|id| id.to_string()).unwrap_or_default(),
            "Record created"
        );
        Ok(created)
    }

    async fn update(
        &self,
        collection: Collection,
        id: &EntityId,
        payload: &Value,
    ) -> DirectoryResult<()> {
        let url = self.record_url(collection, id);
        debug!(url = %url, "PATCH");

        let response = self.request(Method::PATCH, &url).json(payload).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !collection.accepts_update_status(status.as_u16()) {
            warn!(collection = %collection, id = %id, status = status.as_u16(), body = %body, "Update failed");
            return Err(DirectoryError::Server {
                status: status.as_u16(),
                body,
            });
        }

        if let Ok(value) = serde_json::from_str::<Value>(&body) {
            envelope::check_rejected(&value).inspect_err(|e| {
                warn!(collection = %collection, id = %id, error = %e, "Update not accepted");
            })?;
        }

        info!(collection = %collection, id = %id, status = status.as_u16(), "Record updated");
        Ok(())
    }
}
