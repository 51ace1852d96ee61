// src/report/client.rs
use reqwest::{header, StatusCode, Url};
use std::time::Duration;

use crate::report::models::ReportDetail;
use crate::utils::error::ApiError;

const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Client for the company-analysis report API.
pub struct ReportClient {
    http: reqwest::Client,
    base_url: Url,
    access_token: Option<String>,
}

impl ReportClient {
    /// Builds a client for `base_url`. The token, if any, is sent the way the
    /// backend expects it: as the `accessToken` cookie.
    pub fn new(base_url: &str, access_token: Option<String>) -> Result<Self, ApiError> {
        let mut base_url = Url::parse(base_url)
            .map_err(|e| ApiError::InvalidBaseUrl(base_url.to_string(), e.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidBaseUrl(base_url.to_string(), "cannot be a base URL".to_string()));
        }
        // Keep any path prefix when joining endpoint paths.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self { http, base_url, access_token })
    }

    pub fn detail_url(&self, id: u64) -> Result<Url, ApiError> {
        self.base_url
            .join(&format!("api/v1/company-analysis/{}", id))
            .map_err(|e| ApiError::InvalidBaseUrl(self.base_url.to_string(), e.to_string()))
    }

    /// Fetches one report record. Ids must be positive.
    pub async fn fetch_detail(&self, id: i64) -> Result<ReportDetail, ApiError> {
        if id <= 0 {
            return Err(ApiError::InvalidId(id));
        }
        let id = id as u64;
        let url = self.detail_url(id)?;

        tracing::info!("Fetching report {} from: {}", id, url);

        let mut request = self.http.get(url.clone()).header(header::ACCEPT, "application/json");
        if let Some(token) = &self.access_token {
            tracing::debug!("Sending access token cookie");
            request = request.header(header::COOKIE, format!("accessToken={}", token));
        }

        let response = request.send().await?; // Propagates reqwest::Error as ApiError::Network

        let status = response.status();
        if !status.is_success() {
            tracing::error!("HTTP error status: {} for URL: {}", status, url);
            return Err(match status {
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ApiError::Unauthorized,
                StatusCode::NOT_FOUND => ApiError::NotFound(id),
                other => ApiError::Http(other),
            });
        }

        let detail: ReportDetail = response.json().await?;
        tracing::debug!("Received report {} for company '{}'", detail.company_analysis_id, detail.company_name);
        Ok(detail)
    }
}
