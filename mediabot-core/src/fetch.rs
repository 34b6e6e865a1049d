// ============================================================================
// mediabot-core/src/fetch.rs
// ============================================================================
//
// DIRECT FETCHER: Plain HTTP GET of fully resolved URLs
//
// Every request carries the configured browser-like User-Agent. Bodies are read
// fully into memory; there is no retry, streaming or resume. Failures propagate
// to the caller as fetch failures.

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};

use crate::config::CoreConfig;
use crate::error::{CoreError, CoreResult};

/// Abstraction over the HTTP layer, so the pipeline can run against a mock.
pub trait MediaFetcher {
    /// GETs `url` and returns the complete response body.
    fn fetch_bytes(&self, url: &str) -> CoreResult<Vec<u8>>;

    /// GETs `url` and parses the body as JSON.
    fn fetch_json(&self, url: &str) -> CoreResult<serde_json::Value> {
        let body = self.fetch_bytes(url)?;
        Ok(serde_json::from_slice(&body)?)
    }
}

/// `MediaFetcher` backed by a blocking reqwest client.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(config: &CoreConfig) -> CoreResult<Self> {
        Self::with_user_agent(&config.user_agent, config.http_timeout)
    }

    pub fn with_user_agent(user_agent: &str, timeout: Option<Duration>) -> CoreResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(user_agent)
                .map_err(|e| CoreError::Config(format!("Invalid User-Agent: {e}")))?,
        );

        // The blocking client defaults to a 30s timeout; `None` disables it.
        let client = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| CoreError::Config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self { client })
    }
}

impl MediaFetcher for HttpFetcher {
    fn fetch_bytes(&self, url: &str) -> CoreResult<Vec<u8>> {
        log::debug!("GET {}", url);

        let fetch_error = |source| CoreError::Fetch {
            url: url.to_string(),
            source,
        };

        let response = self.client.get(url).send().map_err(fetch_error)?;
        let status = response.status();
        if !status.is_success() {
            log::error!("GET {} returned {}", url, status);
            return Err(CoreError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().map_err(fetch_error)?;
        log::debug!("Fetched {} bytes from {}", body.len(), url);
        Ok(body.to_vec())
    }
}
