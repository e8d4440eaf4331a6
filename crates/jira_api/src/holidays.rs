use std::time::Duration;

use reqwest::Client;
use tracing::debug;

use crate::config::{DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_TIMEOUT_SECS};
use crate::error::{JiraError, Result};

/// Public holiday lookup against a nager.date compatible service.
#[derive(Clone)]
pub struct HolidayService {
    http: Client,
    base_url: String,
}

impl HolidayService {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .connect_timeout(Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS))
            .build()
            .map_err(|err| JiraError::Other(err.to_string()))?;
        Ok(Self {
            http,
            base_url: base_url.into(),
        })
    }

    /// Returns the response body untouched so callers can cache it byte for byte.
    pub async fn fetch_raw(&self, year: i32, country_code: &str) -> Result<Vec<u8>> {
        let url = format!(
            "{}/publicholidays/{}/{}",
            self.base_url.trim_end_matches('/'),
            year,
            country_code.to_uppercase()
        );
        debug!(%url, "fetching public holidays");
        let response = self.http.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(JiraError::http(status, &body));
        }

        let bytes = response.bytes().await?;
        if bytes.is_empty() {
            return Err(JiraError::Serialization(format!(
                "empty holiday response for {year}/{country_code}"
            )));
        }
        Ok(bytes.to_vec())
    }
}
