//! reqwest-backed metadata client.

use std::time::Duration;

use async_trait::async_trait;
use cog_common::{RasterMetadata, ViewerError, ViewerResult};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::{encode_query_value, MetadataSource};

/// Configuration for the metadata client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Service root, e.g. `http://127.0.0.1:8000`
    pub base_url: String,
    /// HTTP request timeout
    pub request_timeout: Duration,
    /// TCP connect timeout
    pub connect_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000".to_string(),
            request_timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
        }
    }
}

/// Error body returned by the service on 4xx/5xx.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: serde_json::Value,
}

/// Fetches `/cog/info` over HTTP.
#[derive(Debug, Clone)]
pub struct HttpMetadataClient {
    client: Client,
    base_url: String,
}

impl HttpMetadataClient {
    pub fn new(config: ClientConfig) -> ViewerResult<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .pool_max_idle_per_host(2)
            .build()
            .map_err(|e| ViewerError::InternalError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full info request URL for a locator.
    pub fn info_url(&self, locator: &str) -> String {
        format!(
            "{}/cog/info?url={}",
            self.base_url,
            encode_query_value(locator)
        )
    }
}

#[async_trait]
impl MetadataSource for HttpMetadataClient {
    #[instrument(skip(self), fields(base = %self.base_url))]
    async fn fetch_info(&self, locator: &str) -> ViewerResult<RasterMetadata> {
        let url = self.info_url(locator);
        debug!(url = %url, "Requesting raster info");

        let response = self.client.get(&url).send().await.map_err(map_reqwest)?;
        let status = response.status();
        let body = response.text().await.map_err(map_reqwest)?;

        if !status.is_success() {
            let detail = serde_json::from_str::<ErrorBody>(&body)
                .map(|e| match e.detail {
                    serde_json::Value::String(s) => s,
                    other => other.to_string(),
                })
                .unwrap_or(body);
            return Err(ViewerError::ServiceStatus {
                status: status.as_u16(),
                detail,
            });
        }

        RasterMetadata::from_json(&body)
    }
}

fn map_reqwest(err: reqwest::Error) -> ViewerError {
    if err.is_timeout() {
        ViewerError::Timeout
    } else {
        ViewerError::MetadataRequest(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_info_url() {
        let client = HttpMetadataClient::new(ClientConfig {
            base_url: "http://127.0.0.1:8000/".to_string(),
            ..Default::default()
        })
        .unwrap();

        assert_eq!(client.base_url(), "http://127.0.0.1:8000");
        assert_eq!(
            client.info_url("https://x/test.tif"),
            "http://127.0.0.1:8000/cog/info?url=https%3A%2F%2Fx%2Ftest.tif"
        );
    }
}
