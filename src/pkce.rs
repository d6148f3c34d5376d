//! PKCE (Proof Key for Code Exchange) utilities for OAuth2
//!
//! Implements RFC 7636 for secure authorization code exchange.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use rand::RngCore;
use sha2::{Digest, Sha256};

/// Number of random bytes behind the code verifier.
///
/// 33 bytes encode to 44 base64url characters, inside RFC 7636's
/// 43-128 character window.
const CODE_VERIFIER_BYTES: usize = 33;

/// Generate a cryptographically random code verifier
///
/// Random bytes encoded as base64url without padding, as defined in
/// RFC 7636 section 4.1.
pub fn generate_code_verifier() -> String {
    let mut code = [0u8; CODE_VERIFIER_BYTES];
    rand::thread_rng().fill_bytes(&mut code);
    URL_SAFE_NO_PAD.encode(code)
}

/// Generate a code challenge from the code verifier
///
/// Uses S256 method: BASE64URL(SHA256(code_verifier))
pub fn generate_code_challenge(verifier: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(verifier.as_bytes());
    let hash = hasher.finalize();
    URL_SAFE_NO_PAD.encode(hash)
}

/// PKCE pair containing both verifier and challenge
#[derive(Debug, Clone)]
pub struct PkcePair {
    pub verifier: String,
    pub challenge: String,
}

impl PkcePair {
    /// Generate a new PKCE pair
    pub fn new() -> Self {
        let verifier = generate_code_verifier();
        let challenge = generate_code_challenge(&verifier);
        Self { verifier, challenge }
    }
}

impl Default for PkcePair {
    fn default() -> Self {
        Self::new()
    }
}
