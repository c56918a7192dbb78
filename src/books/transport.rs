use std::future::Future;
use std::time::Duration;

use http::StatusCode;
use reqwest::Client;

use crate::books::error::UpstreamError;
use crate::config::types::GoogleBooksConfig;
use crate::utils::constants::GOOGLE_BOOKS_MAX_RESULTS;

/// Query for `GET /volumes`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VolumesRequest {
    pub query: String,
    pub api_key: Option<String>,
    pub language: Option<String>,
    pub max_results: Option<u32>,
    pub print_type: Option<String>,
    pub order_by: Option<String>,
}

impl VolumesRequest {
    /// Query parameters in the order they are sent. Unset options are left out.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("q", self.query.to_owned())];
        if let Some(language) = &self.language {
            pairs.push(("langRestrict", language.to_owned()));
        }
        if let Some(max_results) = self.max_results {
            pairs.push(("maxResults", max_results.min(GOOGLE_BOOKS_MAX_RESULTS).to_string()));
        }
        if let Some(print_type) = &self.print_type {
            pairs.push(("printType", print_type.to_owned()));
        }
        if let Some(order_by) = &self.order_by {
            pairs.push(("orderBy", order_by.to_owned()));
        }
        if let Some(api_key) = &self.api_key {
            pairs.push(("key", api_key.to_owned()));
        }
        pairs
    }
}

/// Raw upstream answer, status and body untouched.
#[derive(Debug, Clone)]
pub struct UpstreamResponse {
    pub status: StatusCode,
    pub body: String,
}

/// Anything that can send a volumes query and hand back the response.
pub trait BooksTransport: Send + Sync {
    fn get_volumes(
        &self,
        request: &VolumesRequest,
    ) -> impl Future<Output = Result<UpstreamResponse, UpstreamError>> + Send;
}

/// Google Books over `reqwest`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
    volumes_url: String,
}

impl ReqwestTransport {
    pub fn new(client: Client, base_url: &str) -> Self {
        Self {
            client,
            volumes_url: format!("{}/volumes", base_url.trim_end_matches('/')),
        }
    }

    pub fn from_config(config: &GoogleBooksConfig) -> Result<Self, UpstreamError> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()?;
        Ok(Self::new(client, &config.base_url))
    }

    pub fn volumes_url(&self) -> &str {
        &self.volumes_url
    }
}

impl BooksTransport for ReqwestTransport {
    async fn get_volumes(&self, request: &VolumesRequest) -> Result<UpstreamResponse, UpstreamError> {
        let response = self
            .client
            .get(&self.volumes_url)
            .query(&request.query_pairs())
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;
        Ok(UpstreamResponse { status, body })
    }
}
