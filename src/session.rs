//! Persisted session and the in-process handle shared by every view.
//!
//! The session file holds two fixed keys, `token` and `user`, mirroring what
//! a browser client keeps in local storage.

use crate::models::{Session, User};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoredSession {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    user: Option<User>,
}

/// File-backed storage for the bearer token and user snapshot
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the stored session; a missing or tokenless file means signed out
    pub async fn load(&self) -> Result<Option<Session>> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => {
                return Err(err)
                    .with_context(|| format!("Failed to read {}", self.path.display()))
            }
        };

        let stored: StoredSession = match serde_json::from_str(&raw) {
            Ok(stored) => stored,
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "Ignoring unreadable session file");
                return Ok(None);
            }
        };

        Ok(stored
            .token
            .filter(|token| !token.is_empty())
            .map(|token| Session { token, user: stored.user }))
    }

    pub async fn save(&self, session: &Session) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let stored = StoredSession {
            token: Some(session.token.clone()),
            user: session.user.clone(),
        };
        let json = serde_json::to_string_pretty(&stored)?;
        tokio::fs::write(&self.path, json)
            .await
            .with_context(|| format!("Failed to write {}", self.path.display()))?;

        debug!(path = %self.path.display(), "Session saved");
        Ok(())
    }

    pub async fn clear(&self) -> Result<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => {
                Err(err).with_context(|| format!("Failed to remove {}", self.path.display()))
            }
        }
    }
}

/// Shared session state: set on login, read by every authenticated call,
/// dropped on the first unauthorized response.
#[derive(Debug, Clone)]
pub struct SessionContext {
    current: Arc<RwLock<Option<Session>>>,
    store: Option<SessionStore>,
}

impl SessionContext {
    /// Context without persistence
    pub fn in_memory(session: Option<Session>) -> Self {
        Self {
            current: Arc::new(RwLock::new(session)),
            store: None,
        }
    }

    /// Context seeded from, and written back to, `store`
    pub async fn restore(store: SessionStore) -> Result<Self> {
        let session = store.load().await?;
        if session.is_some() {
            debug!(path = %store.path().display(), "Restored session");
        }
        Ok(Self {
            current: Arc::new(RwLock::new(session)),
            store: Some(store),
        })
    }

    pub async fn token(&self) -> Option<String> {
        self.current.read().await.as_ref().map(|s| s.token.clone())
    }

    pub async fn is_signed_in(&self) -> bool {
        self.current.read().await.is_some()
    }

    pub async fn establish(&self, session: Session) -> Result<()> {
        if let Some(store) = &self.store {
            store.save(&session).await?;
        }
        *self.current.write().await = Some(session);
        Ok(())
    }

    /// Forget the session after the backend rejected it
    pub async fn invalidate(&self) {
        let had_session = self.current.write().await.take().is_some();
        if had_session {
            info!("Session rejected by server, signing out");
        }
        if let Some(store) = &self.store {
            if let Err(err) = store.clear().await {
                warn!(error = %err, "Failed to clear persisted session");
            }
        }
    }

    pub async fn sign_out(&self) -> Result<()> {
        self.current.write().await.take();
        if let Some(store) = &self.store {
            store.clear().await?;
        }
        Ok(())
    }
}
