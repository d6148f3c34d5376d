//! Verifier persistence
//!
//! The code verifier generated for an authorization request has to survive
//! until the redirect comes back and the code is exchanged. It is kept in a
//! small JSON file under the config directory and removed once consumed.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::Result;

/// On-disk form of the pending verifier
#[derive(Debug, Serialize, Deserialize)]
struct PendingVerifier {
    code_verifier: String,
}

/// File-backed store for the pending PKCE code verifier
#[derive(Debug, Clone)]
pub struct VerifierStore {
    path: PathBuf,
}

impl VerifierStore {
    /// Store backed by the default location, `<config dir>/verifier.json`
    pub fn new() -> Self {
        Self {
            path: crate::config::config_dir().join("verifier.json"),
        }
    }

    /// Store backed by an explicit file path
    pub fn at(path: PathBuf) -> Self {
        Self { path }
    }

    /// Persist a verifier, replacing any previous one
    pub fn save(&self, verifier: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let pending = PendingVerifier {
            code_verifier: verifier.to_string(),
        };
        let content = serde_json::to_string_pretty(&pending)?;
        std::fs::write(&self.path, content)?;

        // The verifier is a secret until consumed
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = std::fs::Permissions::from_mode(0o600);
            std::fs::set_permissions(&self.path, perms)?;
        }

        Ok(())
    }

    /// Load the pending verifier, if one exists
    pub fn load(&self) -> Result<Option<String>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&self.path)?;
        let pending: PendingVerifier = serde_json::from_str(&content)?;
        Ok(Some(pending.code_verifier))
    }

    /// Remove the pending verifier after it has been consumed
    pub fn clear(&self) -> Result<()> {
        if self.path.exists() {
            std::fs::remove_file(&self.path)?;
        }
        Ok(())
    }
}

impl Default for VerifierStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store() -> (tempfile::TempDir, VerifierStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = VerifierStore::at(dir.path().join("verifier.json"));
        (dir, store)
    }

    #[test]
    fn test_load_missing_returns_none() {
        let (_dir, store) = temp_store();
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_save_and_load() {
        let (_dir, store) = temp_store();
        store.save("some-verifier").unwrap();
        assert_eq!(store.load().unwrap().as_deref(), Some("some-verifier"));
    }

    #[test]
    fn test_save_replaces_previous() {
        let (_dir, store) = temp_store();
        store.save("first").unwrap();
        store.save("second").unwrap();
        assert_eq!(store.load().unwrap().as_deref(), Some("second"));
    }

    #[test]
    fn test_clear_consumes_verifier() {
        let (_dir, store) = temp_store();
        store.save("pending").unwrap();
        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());

        // Clearing again is a no-op
        store.clear().unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn test_file_permissions_are_restrictive() {
        use std::os::unix::fs::PermissionsExt;

        let (_dir, store) = temp_store();
        store.save("secret").unwrap();

        let mode = std::fs::metadata(store.path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
