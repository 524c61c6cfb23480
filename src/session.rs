//! Persisted session credential.
//!
//! SYSTEM CONTEXT
//! ==============
//! The API client reads the credential from here on every request, login and
//! register write it, and the auth context clears it on logout or when the
//! backend rejects it during initialization. Nothing else is persisted.
//!
//! The credential is opaque: no expiry tracking and no parsing. A stale token
//! stays "present" until the backend turns it down.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use serde_json::{Map, Value};

/// Fixed storage key the credential lives under.
pub const TOKEN_KEY: &str = "token";

/// Errors produced while writing the session credential.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("session file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("session file encode failed: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Storage for the one credential a client instance holds.
pub trait SessionStore: Send + Sync {
    /// Current credential, or `None` when signed out.
    fn get(&self) -> Option<String>;

    /// Persist `token`, replacing any previous credential.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be written.
    fn set(&self, token: &str) -> Result<(), SessionError>;

    /// Remove the credential. Clearing an empty store succeeds.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be written.
    fn clear(&self) -> Result<(), SessionError>;

    fn is_present(&self) -> bool {
        self.get().is_some()
    }
}

// =============================================================================
// MEMORY STORE
// =============================================================================

/// Process-local store. Lost when the process exits.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    token: Mutex<Option<String>>,
}

impl MemorySessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_token(token: impl Into<String>) -> Self {
        Self { token: Mutex::new(Some(token.into())) }
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self) -> Option<String> {
        self.token
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .filter(|token| !token.is_empty())
    }

    fn set(&self, token: &str) -> Result<(), SessionError> {
        *self.token.lock().unwrap_or_else(PoisonError::into_inner) = Some(token.to_owned());
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        *self.token.lock().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }
}

// =============================================================================
// FILE STORE
// =============================================================================

/// JSON object file keyed like browser local storage (`{"token": "..."}`).
///
/// A missing or unreadable file reads as "no credential". Unknown keys in the
/// file are preserved across writes.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Map<String, Value> {
        let Ok(raw) = std::fs::read_to_string(&self.path) else {
            return Map::new();
        };
        match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Object(map)) => map,
            Ok(_) | Err(_) => {
                tracing::warn!(path = %self.path.display(), "ignoring malformed session file");
                Map::new()
            }
        }
    }

    fn save(&self, map: &Map<String, Value>) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let raw = serde_json::to_string_pretty(map)?;
        std::fs::write(&self.path, raw)?;
        Ok(())
    }
}

impl SessionStore for FileSessionStore {
    fn get(&self) -> Option<String> {
        self.load()
            .get(TOKEN_KEY)
            .and_then(Value::as_str)
            .filter(|token| !token.is_empty())
            .map(str::to_owned)
    }

    fn set(&self, token: &str) -> Result<(), SessionError> {
        let mut map = self.load();
        map.insert(TOKEN_KEY.to_owned(), Value::String(token.to_owned()));
        self.save(&map)
    }

    fn clear(&self) -> Result<(), SessionError> {
        let mut map = self.load();
        map.remove(TOKEN_KEY);
        if !map.is_empty() {
            return self.save(&map);
        }
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
