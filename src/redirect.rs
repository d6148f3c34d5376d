//! Redirect response parser
//!
//! After the user finishes the browser flow, the login server redirects to
//! the app's custom URI scheme (`{app_uid}://oauth2redirect`) carrying
//! either a `code` or an `error` query parameter.

use url::Url;

use crate::error::Error;
use crate::Result;

/// OAuth error code sent when the user refuses the authorization
pub const ERROR_ACCESS_DENIED: &str = "access_denied";

/// Parse a redirect URI and extract the authorization code
///
/// The URI scheme must match `app_uid`; a redirect for another app is
/// rejected. An `error` parameter wins over anything else.
pub fn parse_redirect(uri: &str, app_uid: &str) -> Result<String> {
    let url = Url::parse(uri)
        .map_err(|e| Error::OAuth(format!("Failed to parse redirect URI: {}", e)))?;

    if url.scheme() != app_uid {
        return Err(Error::OAuth(format!(
            "Unexpected redirect scheme: expected {}, got {}",
            app_uid,
            url.scheme()
        )));
    }

    let mut code = None;
    let mut error = None;
    let mut error_description = None;

    for (key, value) in url.query_pairs() {
        match key.as_ref() {
            "code" => code = Some(value.to_string()),
            "error" => error = Some(value.to_string()),
            "error_description" => error_description = Some(value.to_string()),
            _ => {}
        }
    }

    if let Some(err) = error.filter(|e| !e.is_empty()) {
        return Err(if err == ERROR_ACCESS_DENIED {
            Error::OAuth("Access denied by the user".to_string())
        } else {
            let description = error_description.unwrap_or_else(|| "Unknown error".to_string());
            Error::OAuth(format!("Authorization failed: {} - {}", err, description))
        });
    }

    match code.filter(|c| !c.is_empty()) {
        Some(code) => Ok(code),
        None => Err(Error::OAuth("Missing authorization code".to_string())),
    }
}
