//! LoginClient - OAuth2 Authorization Code + PKCE client
//!
//! Manages the complete flow against a login portal:
//! - PKCE code generation and verifier persistence
//! - Authorization URL construction and browser launch
//! - Redirect response checking
//! - Code-for-token exchange and token deletion (logout)

use reqwest::Client;
use serde::Serialize;
use url::Url;

use crate::error::{Error, ErrorStatus};
use crate::pkce::PkcePair;
use crate::redirect;
use crate::store::VerifierStore;
use crate::token::ApiToken;
use crate::Result;

/// Authorization endpoint, relative to the login URL
const AUTHORIZE_PATH: &str = "authorize/";

/// Token endpoint, relative to the login URL
const TOKEN_PATH: &str = "token";

/// Suffix appended to the app identifier to form the redirect URI
const REDIRECT_SUFFIX: &str = "://oauth2redirect";

const DEFAULT_RESPONSE_TYPE: &str = "code";
const DEFAULT_ACCESS_TYPE: &str = "offline";
const CHALLENGE_METHOD: &str = "S256";

/// Token exchange request
#[derive(Debug, Serialize)]
struct TokenExchangeRequest<'a> {
    grant_type: &'a str,
    client_id: &'a str,
    code: &'a str,
    code_verifier: &'a str,
    redirect_uri: &'a str,
}

/// OAuth2 PKCE login client
///
/// One instance per (portal, client, app) triple. Cloning shares the
/// underlying HTTP connection pool.
#[derive(Clone)]
pub struct LoginClient {
    login_url: String,
    client_id: String,
    app_uid: String,
    http_client: Client,
    store: VerifierStore,
}

impl LoginClient {
    /// Create a new login client
    ///
    /// `login_url` is the portal base URL; a trailing slash is added when
    /// missing. `app_uid` doubles as the redirect URI scheme.
    pub fn new(
        login_url: impl Into<String>,
        client_id: impl Into<String>,
        app_uid: impl Into<String>,
    ) -> Self {
        let mut login_url = login_url.into();
        if !login_url.ends_with('/') {
            login_url.push('/');
        }

        Self {
            login_url,
            client_id: client_id.into(),
            app_uid: app_uid.into(),
            http_client: Client::new(),
            store: VerifierStore::new(),
        }
    }

    /// Use a custom verifier store location
    pub fn with_store(mut self, store: VerifierStore) -> Self {
        self.store = store;
        self
    }

    /// The redirect URI the login server sends the user back to
    pub fn redirect_uri(&self) -> String {
        format!("{}{}", self.app_uid, REDIRECT_SUFFIX)
    }

    /// The code verifier pending consumption, if any
    pub fn code_verifier(&self) -> Result<Option<String>> {
        self.store.load()
    }

    /// Build the authorization URL
    ///
    /// Generates a fresh PKCE pair and persists the verifier so that
    /// [`get_token`](Self::get_token) can consume it after the redirect.
    pub fn authorization_url(&self) -> Result<String> {
        let pkce = PkcePair::new();
        self.store.save(&pkce.verifier)?;

        let mut url = Url::parse(&format!("{}{}", self.login_url, AUTHORIZE_PATH))
            .map_err(|e| Error::OAuth(format!("Invalid login URL: {}", e)))?;

        url.query_pairs_mut()
            .append_pair("response_type", DEFAULT_RESPONSE_TYPE)
            .append_pair("access_type", DEFAULT_ACCESS_TYPE)
            .append_pair("client_id", &self.client_id)
            .append_pair("redirect_uri", &self.redirect_uri())
            .append_pair("code_challenge_method", CHALLENGE_METHOD)
            .append_pair("code_challenge", &pkce.challenge);

        Ok(url.to_string())
    }

    /// Start the authorization flow in the system browser
    ///
    /// Returns the authorization URL so callers can show it as a manual
    /// fallback when the browser fails to open.
    pub fn start(&self) -> Result<String> {
        let auth_url = self.authorization_url()?;

        if let Err(e) = open::that(&auth_url) {
            tracing::warn!("Failed to open browser: {}", e);
        }

        Ok(auth_url)
    }

    /// Check a redirect response URI and extract the authorization code
    ///
    /// The URI scheme must match this client's app identifier.
    pub fn check_response(&self, uri: &str) -> Result<String> {
        redirect::parse_redirect(uri, &self.app_uid)
    }

    /// Exchange an authorization code for an API token
    ///
    /// Consumes the persisted code verifier on success; a failed exchange
    /// keeps it so the caller may retry with the same authorization.
    pub async fn get_token(&self, code: &str) -> Result<ApiToken> {
        let verifier = self.store.load()?.ok_or_else(|| {
            Error::OAuth("No pending code verifier; start the flow first".to_string())
        })?;

        let request = TokenExchangeRequest {
            grant_type: "authorization_code",
            client_id: &self.client_id,
            code,
            code_verifier: &verifier,
            redirect_uri: &self.redirect_uri(),
        };

        tracing::debug!("Exchanging authorization code at {}{}", self.login_url, TOKEN_PATH);

        let response = self
            .http_client
            .post(format!("{}{}", self.login_url, TOKEN_PATH))
            .form(&request)
            .send()
            .await?;

        let body = classify_token_response(response).await?;

        let mut token: ApiToken = serde_json::from_str(&body)?;
        token.stamp_expiry();

        self.store.clear()?;
        tracing::info!("Token obtained for user {}", token.user_id);

        Ok(token)
    }

    /// Delete a token on the server (logout)
    pub async fn delete_token(&self, token: &ApiToken) -> Result<()> {
        let response = self
            .http_client
            .delete(format!("{}{}", self.login_url, TOKEN_PATH))
            .bearer_auth(&token.access_token)
            .send()
            .await?;

        let status = response.status();
        if status.as_u16() >= 500 {
            return Err(token_error(ErrorStatus::Server, response).await);
        }
        if status.as_u16() >= 400 {
            return Err(token_error(ErrorStatus::Auth, response).await);
        }

        tracing::info!("Token deleted");
        Ok(())
    }
}

/// Map the token endpoint response onto the error categories:
/// 5xx is a server failure, 4xx an authentication failure, and a
/// successful status with an empty body counts as a connection problem.
async fn classify_token_response(response: reqwest::Response) -> Result<String> {
    let status = response.status();

    if status.as_u16() >= 500 {
        return Err(token_error(ErrorStatus::Server, response).await);
    }
    if status.as_u16() >= 400 {
        return Err(token_error(ErrorStatus::Auth, response).await);
    }

    let body = response.text().await?;
    if body.trim().is_empty() {
        return Err(Error::Token {
            status: ErrorStatus::Connection,
            message: "Empty response body".to_string(),
        });
    }

    Ok(body)
}

async fn token_error(status: ErrorStatus, response: reqwest::Response) -> Error {
    let http_status = response.status();
    let body = response.text().await.unwrap_or_default();
    Error::Token {
        status,
        message: format!("HTTP {}: {}", http_status, body.trim()),
    }
}
