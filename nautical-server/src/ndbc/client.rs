//! NDBC HTTP client.
//!
//! Fetches the active station list and per-station realtime observation
//! files from the National Data Buoy Center.

use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};

use crate::domain::{BuoySnapshot, Source, StationId};

use super::error::NdbcError;
use super::parse::{parse_active_stations, parse_realtime};

/// Default base URL for NDBC.
const DEFAULT_BASE_URL: &str = "https://www.ndbc.noaa.gov";

/// Configuration for the NDBC client.
#[derive(Debug, Clone)]
pub struct NdbcConfig {
    /// Base URL for the service
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl NdbcConfig {
    /// Create a config pointing at the production service.
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 30,
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

impl Default for NdbcConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Client for the NDBC data service.
#[derive(Debug, Clone)]
pub struct NdbcClient {
    http: reqwest::Client,
    base_url: String,
}

impl NdbcClient {
    /// Create a new NDBC client.
    pub fn new(config: NdbcConfig) -> Result<Self, NdbcError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("nautical-server/", env!("CARGO_PKG_VERSION"))),
        );

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Fetch every active station, grouped by program.
    pub async fn fetch_sources(&self) -> Result<Vec<Source>, NdbcError> {
        let url = format!("{}/activestations.xml", self.base_url);
        let body = self.get_text(&url, None).await?;
        parse_active_stations(&body)
    }

    /// Fetch the latest observation for one station.
    pub async fn fetch_latest(&self, station: &StationId) -> Result<BuoySnapshot, NdbcError> {
        let url = format!("{}/data/realtime2/{}.txt", self.base_url, station.as_str());
        let body = self.get_text(&url, Some(station)).await?;
        parse_realtime(station, &body)
    }

    async fn get_text(&self, url: &str, station: Option<&StationId>) -> Result<String, NdbcError> {
        let response = self.http.get(url).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(NdbcError::NotFound(
                station.map(|s| s.to_string()).unwrap_or_else(|| url.to_string()),
            ));
        }

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(NdbcError::RateLimited);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NdbcError::Api {
                status: status.as_u16(),
                message: body.chars().take(500).collect(),
            });
        }

        Ok(response.text().await?)
    }
}
