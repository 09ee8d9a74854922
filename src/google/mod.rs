//! Google Sheets and Drive adapters.
//!
//! One [`GoogleContext`] is built at startup from the configuration and the
//! credentials, then shared by the sheet and drive clients.

mod credentials;
mod drive;
mod sheets;

pub use credentials::{Credentials, SCOPES, TOKEN_ENV};
pub use drive::DriveClient;
pub use sheets::{LeaderboardColumns, SheetUpdate, SheetsClient, column_letter};

use crate::config::GoogleConfig;
use crate::error::{BoundaryError, BoundaryErrorKind, CredentialError};
use crate::ports::Backends;
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument};

pub(crate) const SHEETS_API: &str = "https://sheets.googleapis.com/v4/spreadsheets";
pub(crate) const DRIVE_API: &str = "https://www.googleapis.com/drive/v3/files";
pub(crate) const DRIVE_UPLOAD_API: &str = "https://www.googleapis.com/upload/drive/v3/files";

/// Shared HTTP client, credentials and settings for the Google adapters.
#[derive(Debug)]
pub struct GoogleContext {
    http: reqwest::Client,
    credentials: Credentials,
    config: GoogleConfig,
}

impl GoogleContext {
    /// Loads credentials and builds the HTTP client.
    ///
    /// # Errors
    ///
    /// [`CredentialError`] if the credentials cannot be loaded or the client
    /// cannot be constructed.
    #[instrument(skip(config))]
    pub fn connect(config: GoogleConfig) -> Result<Self, CredentialError> {
        let credentials = Credentials::load(config.credentials_file())?;
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(*config.timeout_secs()))
            .build()
            .map_err(|e| CredentialError::new(format!("Failed to build HTTP client: {}", e)))?;
        info!(service_account = credentials.is_service_account(), "Google context ready");
        Ok(Self {
            http,
            credentials,
            config,
        })
    }

    /// Settings this context was built with.
    pub fn config(&self) -> &GoogleConfig {
        &self.config
    }

    pub(crate) fn get(&self, url: reqwest::Url) -> RequestBuilder {
        self.http.get(url)
    }

    pub(crate) fn post(&self, url: reqwest::Url) -> RequestBuilder {
        self.http.post(url)
    }

    pub(crate) fn patch(&self, url: reqwest::Url) -> RequestBuilder {
        self.http.patch(url)
    }

    /// Authorises and sends a request, mapping non-success statuses to [`BoundaryError`].
    #[instrument(skip(self, request))]
    pub(crate) async fn send(&self, request: RequestBuilder) -> Result<Response, BoundaryError> {
        let token = self.credentials.bearer_token().await?;
        let response = request.bearer_auth(token).send().await?;
        let status = response.status();
        debug!(%status, url = %response.url(), "Google API response");
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        let kind = if status == StatusCode::NOT_FOUND {
            BoundaryErrorKind::NotFound
        } else {
            BoundaryErrorKind::Http
        };
        Err(BoundaryError::new(kind, format!("HTTP {}: {}", status, body)))
    }

    /// Sends a request and decodes the JSON body.
    pub(crate) async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<T, BoundaryError> {
        let response = self.send(request).await?;
        Ok(response.json::<T>().await?)
    }
}

/// Parses one of the API base URLs extended with path segments.
pub(crate) fn api_url(base: &str, segments: &[&str]) -> Result<reqwest::Url, BoundaryError> {
    let mut url = reqwest::Url::parse(base)
        .map_err(|e| BoundaryError::new(BoundaryErrorKind::Http, format!("Bad URL: {}", e)))?;
    url.path_segments_mut()
        .map_err(|_| BoundaryError::new(BoundaryErrorKind::Http, "URL cannot be a base"))?
        .extend(segments);
    Ok(url)
}

/// Drive query literal: single quotes and backslashes escaped.
pub(crate) fn query_literal(value: &str) -> String {
    format!("'{}'", value.replace('\\', "\\\\").replace('\'', "\\'"))
}

/// Connects to Google and opens the spreadsheet. Fails if either step fails.
#[instrument(skip(config))]
pub async fn google_backends(config: GoogleConfig) -> Result<Backends, crate::SessionError> {
    let context = Arc::new(GoogleContext::connect(config)?);
    let sheets = SheetsClient::open(Arc::clone(&context)).await?;
    let drive = DriveClient::new(context);
    Ok(Backends {
        history: Box::new(sheets.clone()),
        leaderboard: Box::new(sheets),
        predictors: Box::new(drive),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_url_encodes_segments() {
        let url = api_url(SHEETS_API, &["abc", "values", "'my sheet'!A1"]).unwrap();
        assert_eq!(
            url.as_str(),
            "https://sheets.googleapis.com/v4/spreadsheets/abc/values/'my%20sheet'!A1"
        );
    }

    #[test]
    fn test_query_literal_escapes_quotes() {
        assert_eq!(query_literal("it's"), r"'it\'s'");
    }
}
