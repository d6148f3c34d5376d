//! Sesame - OAuth 2.0 Authorization Code flow with PKCE
//!
//! This library implements the client side of RFC 7636 against a login
//! portal: PKCE code generation, authorization URL construction, redirect
//! response parsing, and the code-for-token exchange.

pub mod client;
pub mod config;
pub mod error;
pub mod pkce;
pub mod redirect;
pub mod store;
pub mod token;

pub use client::LoginClient;
pub use error::{Error, ErrorStatus, Result};
pub use token::ApiToken;
