// The `google_auth` module runs the installed-app OAuth flow and builds a Gmail hub.

use google_gmail1::{
    Gmail,
    api::Scope,
    yup_oauth2::{InstalledFlowAuthenticator, InstalledFlowReturnMethod},
};
use hyper_rustls::{HttpsConnector, HttpsConnectorBuilder};
use hyper_util::{
    client::legacy::Client, client::legacy::connect::HttpConnector, rt::TokioExecutor,
};
use rustls::crypto::{CryptoProvider, ring::default_provider};
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// A type alias for the HTTPS connector.
pub type HttpsConnectorType = HttpsConnector<HttpConnector>;
/// A type alias for the Gmail hub.
pub type GmailHubType = Gmail<HttpsConnectorType>;

/// The `AuthError` enum defines the possible errors that can occur during authentication.
#[derive(Error, Debug)]
pub enum AuthError {
    /// The OAuth client secret could not be read.
    #[error("Failed to read client secret from {path}: {reason}")]
    Secret { path: PathBuf, reason: String },
    /// The authenticator could not be built.
    #[error("Failed to build the authenticator: {0}")]
    Authenticator(String),
    /// No token could be obtained for the requested scopes.
    #[error("Failed to obtain an access token: {0}")]
    Token(String),
    /// The HTTPS connector could not load the native root certificates.
    #[error("Failed to build the HTTPS connector: {0}")]
    Connector(String),
}

/// Where the OAuth client secret and the persisted token live.
#[derive(Clone, Debug)]
pub struct GoogleAuthConfig(Arc<InnerConf>);

#[derive(Clone, Debug)]
pub struct InnerConf {
    /// The path to the OAuth client `credentials.json` file.
    pub credentials_path: PathBuf,
    /// The path where the token is cached between runs.
    pub token_path: PathBuf,
}

impl GoogleAuthConfig {
    pub fn new(credentials_path: PathBuf, token_path: PathBuf) -> GoogleAuthConfig {
        GoogleAuthConfig(Arc::new(InnerConf {
            credentials_path,
            token_path,
        }))
    }

    pub fn credentials_path(&self) -> &PathBuf {
        &self.0.credentials_path
    }

    pub fn token_path(&self) -> &PathBuf {
        &self.0.token_path
    }
}

/// Authenticates with the Gmail API for `scopes` and returns a ready hub.
///
/// On first use this prints an authorization URL and waits for the browser
/// redirect; afterwards the token cached at `token_path` is reused.
pub async fn gmail_auth(
    conf: GoogleAuthConfig,
    scopes: &[Scope],
) -> Result<GmailHubType, AuthError> {
    info!(credentials = %conf.credentials_path().display(), "Authenticating with Gmail API");

    let secret = google_gmail1::yup_oauth2::read_application_secret(conf.credentials_path())
        .await
        .map_err(|e| AuthError::Secret {
            path: conf.credentials_path().clone(),
            reason: e.to_string(),
        })?;

    let auth = InstalledFlowAuthenticator::builder(secret, InstalledFlowReturnMethod::HTTPRedirect)
        .persist_tokens_to_disk(conf.token_path())
        .build()
        .await
        .map_err(|e| AuthError::Authenticator(e.to_string()))?;

    // Fail here rather than on the first API call.
    auth.token(scopes)
        .await
        .map_err(|e| AuthError::Token(e.to_string()))?;

    _ = CryptoProvider::install_default(default_provider());

    let https = HttpsConnectorBuilder::new()
        .with_native_roots()
        .map_err(|e| AuthError::Connector(e.to_string()))?
        .https_or_http()
        .enable_http1()
        .build();

    let client = Client::builder(TokioExecutor::new()).build(https);

    let hub = Gmail::new(client, auth);
    info!("Successfully authenticated with Gmail API");
    Ok(hub)
}
