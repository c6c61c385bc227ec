//! HTTP access to the stop/departure lookup service.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use nextbus_api_types::{DepartureQuery, DepartureRecord, StopQuery, StopRecord};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::models::types::{Result, TransitError};
use crate::network::traits::{DataFetcher, DepartureSource, StopSearch};

/// Default request timeout for [`ReqwestFetcher`].
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// [`DataFetcher`] backed by an async `reqwest` client.
#[derive(Clone)]
pub struct ReqwestFetcher {
    client: reqwest::Client,
}

impl ReqwestFetcher {
    pub fn new() -> Result<Self> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TransitError::Request(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }
}

impl DataFetcher for ReqwestFetcher {
    fn fetch<'a>(
        &'a self,
        url: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<u8>>> + Send + 'a>> {
        Box::pin(async move {
            let response = self
                .client
                .get(url)
                .send()
                .await
                .map_err(|e| TransitError::Request(e.to_string()))?;

            let status = response.status();
            if !status.is_success() {
                return Err(TransitError::Status {
                    status: status.as_u16(),
                    url: url.to_string(),
                });
            }

            let body = response
                .bytes()
                .await
                .map_err(|e| TransitError::Request(format!("Failed to read response: {}", e)))?;

            Ok(body.to_vec())
        })
    }
}

/// The lookup service reached over HTTP.
///
/// Implements both [`StopSearch`] and [`DepartureSource`]. The transport is
/// pluggable through `F` so tests can answer with canned bodies.
pub struct HttpBackend<F = ReqwestFetcher> {
    base_url: String,
    fetcher: F,
}

impl HttpBackend<ReqwestFetcher> {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        Ok(Self::with_fetcher(base_url, ReqwestFetcher::with_timeout(timeout)?))
    }
}

impl<F: DataFetcher> HttpBackend<F> {
    pub fn with_fetcher(base_url: impl Into<String>, fetcher: F) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url, fetcher }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str, params: &[(&'static str, String)]) -> Result<String> {
        reqwest::Url::parse_with_params(&format!("{}/{}", self.base_url, path), params)
            .map(String::from)
            .map_err(|e| TransitError::InvalidData(format!("Bad service URL {}: {}", self.base_url, e)))
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let body = self.fetcher.fetch(url).await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

impl<F: DataFetcher> StopSearch for HttpBackend<F> {
    fn search<'a>(
        &'a self,
        query: &'a StopQuery,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<StopRecord>>> + Send + 'a>> {
        Box::pin(async move {
            let url = self.endpoint("stops", &query.params())?;
            debug!(%url, "Searching stops");

            let mut stops: Vec<StopRecord> = self.get_json(&url).await?;
            stops.truncate(query.max);
            Ok(stops)
        })
    }
}

impl<F: DataFetcher> DepartureSource for HttpBackend<F> {
    fn departures<'a>(
        &'a self,
        query: &'a DepartureQuery,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<DepartureRecord>>> + Send + 'a>> {
        Box::pin(async move {
            let url = self.endpoint("departures", &query.params())?;
            debug!(%url, "Fetching departures");

            let mut departures: Vec<DepartureRecord> = self.get_json(&url).await?;
            departures.truncate(query.max);
            Ok(departures)
        })
    }
}
