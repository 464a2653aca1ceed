//! Session token storage.
//!
//! A [`Session`] owns the one opaque token issued at login. It keeps the token in memory
//! for request decoration and mirrors it into a [`TokenStore`] so it survives restarts.
//! The token is never decoded or validated here, and never logged.

use std::sync::{Arc, Mutex, PoisonError, RwLock};

use log::{info, warn};

/// Fixed name of the durable slot holding the token.
pub const TOKEN_SLOT: &str = "token";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("Failed to read stored token: {0}")]
    Load(String),
    #[error("Failed to persist token: {0}")]
    Save(String),
    #[error("Failed to remove stored token: {0}")]
    Clear(String),
}

/// Durable storage for the token slot.
///
/// Implementations decide where the slot lives (a config file, browser storage, memory).
pub trait TokenStore: Send + Sync {
    fn load(&self) -> Result<Option<String>, SessionError>;

    fn save(&self, token: &str) -> Result<(), SessionError>;

    fn clear(&self) -> Result<(), SessionError>;
}

/// Process-local token slot.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    slot: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            slot: Mutex::new(Some(token.into())),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<Option<String>, SessionError> {
        Ok(self
            .slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }

    fn save(&self, token: &str) -> Result<(), SessionError> {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = Some(token.to_owned());
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }
}

struct SessionInner {
    token: RwLock<Option<String>>,
    store: Box<dyn TokenStore>,
}

/// Shared handle to the signed-in session. Clones observe the same token.
#[derive(Clone)]
pub struct Session {
    inner: Arc<SessionInner>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}

impl Session {
    /// Signed-out session backed by `store`; nothing is read from it.
    pub fn new(store: impl TokenStore + 'static) -> Self {
        Self {
            inner: Arc::new(SessionInner {
                token: RwLock::new(None),
                store: Box::new(store),
            }),
        }
    }

    /// Session backed by `store`, starting from whatever token it holds.
    ///
    /// An unreadable slot is treated as signed out.
    pub fn restore(store: impl TokenStore + 'static) -> Self {
        let token = match store.load() {
            Ok(token) => token,
            Err(err) => {
                warn!("Session: starting signed out, {err}");
                None
            }
        };
        if token.is_some() {
            info!("Session: restored stored token");
        }
        Self {
            inner: Arc::new(SessionInner {
                token: RwLock::new(token),
                store: Box::new(store),
            }),
        }
    }

    /// In-memory session with no durable slot behind it.
    pub fn ephemeral() -> Self {
        Self::new(MemoryTokenStore::new())
    }

    /// Persist `token`, then make it the current token.
    ///
    /// If persisting fails the previous token stays in place.
    pub fn set_token(&self, token: impl Into<String>) -> Result<(), SessionError> {
        let token = token.into();
        self.inner.store.save(&token)?;
        *self
            .inner
            .token
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(token);
        Ok(())
    }

    pub fn get_token(&self) -> Option<String> {
        self.inner
            .token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Drop the token from memory and from the durable slot.
    pub fn clear_token(&self) -> Result<(), SessionError> {
        self.inner
            .token
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        self.inner.store.clear()
    }

    pub fn is_authenticated(&self) -> bool {
        self.inner
            .token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }
}
