//! API token data transfer object
//!
//! The JSON body returned by the login server's `token` endpoint, plus the
//! locally computed expiry timestamp.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Safety margin subtracted from the advertised lifetime, in seconds.
///
/// A token is treated as expired slightly before the server would
/// actually reject it.
const EXPIRY_MARGIN_SECS: i64 = 60;

/// OAuth2 token as returned by the `token` endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiToken {
    /// The access token for API requests
    pub access_token: String,

    /// The refresh token for obtaining new access tokens
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,

    /// Token type (usually "Bearer")
    #[serde(default = "default_token_type")]
    pub token_type: String,

    /// Advertised lifetime in seconds
    #[serde(default)]
    pub expires_in: i64,

    /// Identifier of the user the token belongs to
    #[serde(default)]
    pub user_id: i64,

    /// Scopes granted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,

    /// When the access token expires, with the margin already applied.
    /// Not part of the wire response; stamped after deserialization.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

fn default_token_type() -> String {
    "Bearer".to_string()
}

impl ApiToken {
    /// Compute `expires_at` from `expires_in`, keeping a margin so the
    /// token is renewed before the server starts rejecting it.
    pub fn stamp_expiry(&mut self) {
        if self.expires_in > 0 {
            self.expires_at =
                Some(Utc::now() + Duration::seconds(self.expires_in - EXPIRY_MARGIN_SECS));
        }
    }

    /// Check if the access token is expired
    ///
    /// Tokens without an expiry timestamp never expire.
    pub fn is_expired(&self) -> bool {
        match self.expires_at {
            Some(expires) => Utc::now() >= expires,
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(expires_in: i64) -> ApiToken {
        ApiToken {
            access_token: "access".to_string(),
            refresh_token: Some("refresh".to_string()),
            token_type: "Bearer".to_string(),
            expires_in,
            user_id: 42,
            scope: None,
            expires_at: None,
        }
    }

    #[test]
    fn test_stamp_expiry_applies_margin() {
        let mut t = token(3600);
        t.stamp_expiry();

        let expires = t.expires_at.expect("expiry should be stamped");
        let lifetime = expires - Utc::now();
        // 3600s advertised, 60s margin
        assert!(lifetime <= Duration::seconds(3540));
        assert!(lifetime > Duration::seconds(3530));
    }

    #[test]
    fn test_zero_lifetime_is_not_stamped() {
        let mut t = token(0);
        t.stamp_expiry();
        assert!(t.expires_at.is_none());
        assert!(!t.is_expired());
    }

    #[test]
    fn test_short_lifetime_is_already_expired() {
        // Anything inside the margin counts as expired
        let mut t = token(30);
        t.stamp_expiry();
        assert!(t.is_expired());
    }

    #[test]
    fn test_deserialize_wire_response() {
        let body = r#"{
            "access_token": "at",
            "refresh_token": "rt",
            "token_type": "Bearer",
            "expires_in": 7200,
            "user_id": 7,
            "scope": "user_info"
        }"#;

        let t: ApiToken = serde_json::from_str(body).unwrap();
        assert_eq!(t.access_token, "at");
        assert_eq!(t.refresh_token.as_deref(), Some("rt"));
        assert_eq!(t.expires_in, 7200);
        assert_eq!(t.user_id, 7);
        assert_eq!(t.scope.as_deref(), Some("user_info"));
        assert!(t.expires_at.is_none());
    }

    #[test]
    fn test_deserialize_minimal_response() {
        // Servers may omit everything but the access token
        let t: ApiToken = serde_json::from_str(r#"{"access_token": "at"}"#).unwrap();
        assert_eq!(t.token_type, "Bearer");
        assert_eq!(t.user_id, 0);
        assert!(t.refresh_token.is_none());
    }

    #[test]
    fn test_serialization_round_trip() {
        let mut t = token(3600);
        t.stamp_expiry();

        let json = serde_json::to_string(&t).unwrap();
        let parsed: ApiToken = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.access_token, t.access_token);
        assert_eq!(parsed.expires_at, t.expires_at);
    }
}
