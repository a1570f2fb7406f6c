//! Persisted login state
//!
//! The session lives outside the store so it survives restarts. The HTTP
//! client reads the token from the repository on every request, and the
//! console mirrors the stored user into its state at startup.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::User;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("failed to access session file '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("session data is corrupt: {0}")]
    Corrupt(String),
}

/// Token plus the user it was issued for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub user: User,
}

/// Storage for the current session.
pub trait SessionRepository: Send + Sync {
    fn load(&self) -> Result<Option<Session>, SessionError>;

    fn save(&self, session: &Session) -> Result<(), SessionError>;

    fn clear(&self) -> Result<(), SessionError>;

    /// Bearer token for the next request; unreadable storage counts as
    /// signed out.
    fn token(&self) -> Option<String> {
        match self.load() {
            Ok(session) => session.map(|s| s.token),
            Err(e) => {
                tracing::warn!(error = %e, "could not read session");
                None
            }
        }
    }
}

/// On-disk shape: two string keys, the user serialized as JSON text.
#[derive(Serialize, Deserialize)]
struct StoredSession {
    token: String,
    user: String,
}

/// JSON file in the platform data directory.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<data_dir>/schoolcast/session.json`, or the working directory when
    /// the platform has no data dir.
    pub fn default_path() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("schoolcast")
            .join("session.json")
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> SessionError {
        SessionError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl SessionRepository for FileSessionStore {
    fn load(&self) -> Result<Option<Session>, SessionError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(self.io_error(e)),
        };

        let stored: StoredSession =
            serde_json::from_str(&content).map_err(|e| SessionError::Corrupt(e.to_string()))?;
        let user: User =
            serde_json::from_str(&stored.user).map_err(|e| SessionError::Corrupt(e.to_string()))?;

        Ok(Some(Session {
            token: stored.token,
            user,
        }))
    }

    fn save(&self, session: &Session) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }
        let stored = StoredSession {
            token: session.token.clone(),
            user: serde_json::to_string(&session.user)
                .map_err(|e| SessionError::Corrupt(e.to_string()))?,
        };
        let content =
            serde_json::to_string_pretty(&stored).map_err(|e| SessionError::Corrupt(e.to_string()))?;
        fs::write(&self.path, content).map_err(|e| self.io_error(e))?;
        tracing::info!(path = %self.path.display(), "session saved");
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                tracing::info!(path = %self.path.display(), "session cleared");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.io_error(e)),
        }
    }
}

/// Process-local session, used by tests.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    session: Mutex<Option<Session>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_session(session: Session) -> Self {
        Self {
            session: Mutex::new(Some(session)),
        }
    }
}

impl SessionRepository for MemorySessionStore {
    fn load(&self) -> Result<Option<Session>, SessionError> {
        let guard = self
            .session
            .lock()
            .map_err(|_| SessionError::Corrupt("session lock poisoned".into()))?;
        Ok(guard.clone())
    }

    fn save(&self, session: &Session) -> Result<(), SessionError> {
        let mut guard = self
            .session
            .lock()
            .map_err(|_| SessionError::Corrupt("session lock poisoned".into()))?;
        *guard = Some(session.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        let mut guard = self
            .session
            .lock()
            .map_err(|_| SessionError::Corrupt("session lock poisoned".into()))?;
        *guard = None;
        Ok(())
    }
}
