//! Bearer session persistence and restoration
//!
//! The token lives in a single file under the data directory. On startup it
//! is re-validated against the server's who-am-I endpoint and silently
//! discarded when the server rejects it.

use crate::api::types::UserRecord;
use crate::api::ApiClient;
use crate::Result;
use log::{debug, info, warn};
use std::fs;
use std::path::PathBuf;

/// An authenticated session
#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub user: UserRecord,
}

/// On-disk token cache
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Cached token, if any
    pub fn load_token(&self) -> Option<String> {
        let token = fs::read_to_string(&self.path).ok()?;
        let token = token.trim().to_string();
        if token.is_empty() {
            None
        } else {
            Some(token)
        }
    }

    pub fn save_token(&self, token: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, token)?;
        debug!("Session token cached at {:?}", self.path);
        Ok(())
    }

    /// Remove the cached token
    pub fn clear(&self) {
        match fs::remove_file(&self.path) {
            Ok(()) => debug!("Session token cleared"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!("Failed to clear session token: {}", e),
        }
    }
}

/// Attach the cached token to the client, if there is one to try
///
/// Returns the token so the caller can kick off validation; the actual
/// who-am-I round trip runs as a background job.
pub fn attach_cached_token(store: &SessionStore, client: &mut ApiClient) -> Option<String> {
    let token = store.load_token()?;
    client.set_token(&token);
    Some(token)
}

/// Validate the attached token against the server
///
/// Used by the restoration job; a rejection is not an error to the caller,
/// the session is just gone.
pub fn validate(client: &ApiClient) -> Result<UserRecord> {
    let user = client.me()?;
    info!("Session restored for {}", user.email);
    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_round_trip() {
        let tmp = tempfile::tempdir().unwrap();
        let store = SessionStore::new(tmp.path().join("data").join("token"));

        assert!(store.load_token().is_none());
        store.save_token("tok-123").unwrap();
        assert_eq!(store.load_token(), Some("tok-123".to_string()));

        store.clear();
        assert!(store.load_token().is_none());
        // Clearing again is fine
        store.clear();
    }

    #[test]
    fn test_blank_token_file_is_no_session() {
        let tmp = tempfile::tempdir().unwrap();
        let store = SessionStore::new(tmp.path().join("token"));
        fs::write(tmp.path().join("token"), "  \n").unwrap();
        assert!(store.load_token().is_none());
    }
}
