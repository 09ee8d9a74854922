//! Credentials for the Google APIs.

use crate::error::{BoundaryError, BoundaryErrorKind, CredentialError};
use gcp_auth::{CustomServiceAccount, TokenProvider};
use serde::Deserialize;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Environment variable that overrides the credentials file with a raw token.
pub const TOKEN_ENV: &str = "TICTACTOE_ACCESS_TOKEN";

/// OAuth scopes requested when minting tokens from a service account.
pub const SCOPES: &[&str] = &[
    "https://www.googleapis.com/auth/spreadsheets",
    "https://www.googleapis.com/auth/drive",
];

#[derive(Clone)]
enum Source {
    /// Mints and caches short-lived tokens from a service-account key.
    ServiceAccount(Arc<CustomServiceAccount>),
    /// A bearer token used as is.
    Token(String),
}

/// Fields used to tell the supported credential files apart.
#[derive(Deserialize)]
struct CredentialsFile {
    #[serde(rename = "type")]
    kind: Option<String>,
    access_token: Option<String>,
}

/// Authorisation for Sheets and Drive requests.
#[derive(Clone)]
pub struct Credentials {
    source: Source,
}

impl Credentials {
    /// Creates credentials from a raw bearer token.
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            source: Source::Token(access_token.into()),
        }
    }

    /// Loads credentials, preferring a token in [`TOKEN_ENV`] over the file.
    ///
    /// # Errors
    ///
    /// [`CredentialError`] when neither source yields usable credentials.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CredentialError> {
        if let Ok(token) = std::env::var(TOKEN_ENV)
            && !token.trim().is_empty()
        {
            info!("Using access token from environment");
            return Ok(Self::new(token.trim()));
        }
        Self::from_file(path)
    }

    /// Loads a service-account key, or a JSON file with an `access_token` field.
    ///
    /// The key's private key is parsed here, so a broken key fails at startup
    /// rather than on the first request.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, CredentialError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(CredentialError::new(format!(
                "Credentials file '{}' not found",
                path.display()
            )));
        }
        let content = std::fs::read_to_string(path).map_err(|e| {
            CredentialError::new(format!(
                "Credentials file '{}' is not readable: {}",
                path.display(),
                e
            ))
        })?;
        let file: CredentialsFile = serde_json::from_str(&content)
            .map_err(|e| CredentialError::new(format!("Failed to parse credentials: {}", e)))?;

        if file.kind.as_deref() == Some("service_account") {
            let account = CustomServiceAccount::from_json(&content).map_err(|e| {
                CredentialError::new(format!("Invalid service account key: {}", e))
            })?;
            info!("Service account credentials loaded");
            return Ok(Self {
                source: Source::ServiceAccount(Arc::new(account)),
            });
        }

        match file.access_token {
            Some(token) if !token.trim().is_empty() => {
                debug!("Access token loaded");
                Ok(Self::new(token.trim()))
            }
            Some(_) => Err(CredentialError::new(
                "Credentials file has an empty access_token",
            )),
            None => Err(CredentialError::new(
                "Credentials file holds neither a service account key nor an access_token",
            )),
        }
    }

    /// True when tokens are minted from a service-account key.
    pub fn is_service_account(&self) -> bool {
        matches!(self.source, Source::ServiceAccount(_))
    }

    /// A bearer token valid for [`SCOPES`]. Service-account tokens are cached
    /// and refreshed by the token provider.
    ///
    /// # Errors
    ///
    /// [`BoundaryErrorKind::Http`] when the token exchange fails.
    pub async fn bearer_token(&self) -> Result<String, BoundaryError> {
        match &self.source {
            Source::Token(token) => Ok(token.clone()),
            Source::ServiceAccount(account) => {
                let token = account.token(SCOPES).await.map_err(|e| {
                    BoundaryError::new(
                        BoundaryErrorKind::Http,
                        format!("Token exchange failed: {}", e),
                    )
                })?;
                Ok(token.as_str().to_string())
            }
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match self.source {
            Source::ServiceAccount(_) => "service_account",
            Source::Token(_) => "access_token",
        };
        f.debug_struct("Credentials")
            .field("kind", &kind)
            .field("secret", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SERVICE_ACCOUNT: &str = concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/tests/fixtures/service_account.json"
    );

    #[test]
    fn test_missing_file_is_credential_error() {
        let err = Credentials::from_file("/definitely/not/here/creds.json").unwrap_err();
        assert!(err.message.contains("not found"));
    }

    #[tokio::test]
    async fn test_reads_token_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"access_token": "ya29.token"}}"#).unwrap();
        let creds = Credentials::from_file(file.path()).unwrap();
        assert!(!creds.is_service_account());
        assert_eq!(creds.bearer_token().await.unwrap(), "ya29.token");
        assert!(!format!("{:?}", creds).contains("ya29"));
    }

    #[test]
    fn test_empty_token_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"access_token": "  "}}"#).unwrap();
        assert!(Credentials::from_file(file.path()).is_err());
    }

    #[test]
    fn test_reads_service_account_key() {
        let creds = Credentials::from_file(SERVICE_ACCOUNT).expect("Service account key");
        assert!(creds.is_service_account());
        assert!(!format!("{:?}", creds).contains("PRIVATE KEY"));
    }

    #[test]
    fn test_service_account_with_broken_key_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"type": "service_account", "client_email": "a@b.iam.gserviceaccount.com",
                "private_key": "not a key", "token_uri": "https://oauth2.googleapis.com/token"}}"#
        )
        .unwrap();
        let err = Credentials::from_file(file.path()).unwrap_err();
        assert!(err.message.contains("service account"));
    }

    #[test]
    fn test_unrecognised_file_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"client_id": "abc"}}"#).unwrap();
        let err = Credentials::from_file(file.path()).unwrap_err();
        assert!(err.message.contains("neither"));
    }
}
