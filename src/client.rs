//! Remote fetch client for the upstream catalog: one GET per identifier, no retries.

use crate::config::UpstreamConfig;
use crate::error::{AppError, FetchError};
use crate::model::CatalogPayload;
use async_trait::async_trait;
use reqwest::Client;

/// User agent sent with every upstream request.
pub const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Where the sync engine gets payloads from.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Fetch one entity. Any failure is `AppError::FetchFailed` carrying `id`.
    async fn fetch(&self, id: i32) -> Result<CatalogPayload, AppError>;
}

/// HTTP implementation against `{base_url}/pokemon/{id}`.
#[derive(Clone, Debug)]
pub struct PokeApiClient {
    client: Client,
    base_url: String,
}

impl PokeApiClient {
    /// Build a client whose requests time out after `config.timeout`.
    pub fn new(config: &UpstreamConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .connect_timeout(config.timeout)
            .timeout(config.timeout)
            .build()?;
        Ok(PokeApiClient {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn entity_url(&self, id: i32) -> String {
        format!("{}/pokemon/{}", self.base_url, id)
    }

    async fn fetch_inner(&self, id: i32) -> Result<CatalogPayload, FetchError> {
        let url = self.entity_url(id);
        tracing::debug!(url = %url, "fetch");
        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }
        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

#[async_trait]
impl CatalogSource for PokeApiClient {
    async fn fetch(&self, id: i32) -> Result<CatalogPayload, AppError> {
        self.fetch_inner(id)
            .await
            .map_err(|source| AppError::FetchFailed { id, source })
    }
}
