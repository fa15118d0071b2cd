//! Credential store interface and the persisted session
//!
//! The pipeline only reads the bearer token and, on an authentication
//! failure, clears it. Login, logout and profile updates go through
//! [`SessionStore`].

use crate::core::{LogContext, Logger};
use crate::storage::{Storage, StorageError};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Storage key of the bearer token
pub const TOKEN_KEY: &str = "token";
/// Storage key of the serialized current user
pub const USER_KEY: &str = "auth_user";

/// What the pipeline needs from the credential holder
pub trait CredentialStore: Send + Sync {
    fn token(&self) -> Option<String>;
    /// Forced logout
    fn clear(&self);
}

/// The signed-in user, shaped like the backend's user response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default)]
    pub is_superuser: bool,
    /// Frontend-side admin flag, honoured alongside `is_superuser`
    #[serde(default)]
    pub is_admin: bool,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

fn default_active() -> bool {
    true
}

/// Partial profile update; `None` leaves a field untouched
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserUpdate {
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub avatar_url: Option<String>,
}

impl UserUpdate {
    fn apply(self, user: &mut User) {
        if let Some(email) = self.email {
            user.email = email;
        }
        if let Some(full_name) = self.full_name {
            user.full_name = Some(full_name);
        }
        if let Some(phone) = self.phone {
            user.phone = Some(phone);
        }
        if let Some(avatar_url) = self.avatar_url {
            user.avatar_url = Some(avatar_url);
        }
    }
}

#[derive(Debug, Default)]
struct SessionState {
    token: Option<String>,
    user: Option<User>,
}

/// Token and current user, mirrored to a [`Storage`] backend
///
/// Storage failures never fail a session operation: the in-memory state is
/// authoritative and the failure is logged.
pub struct SessionStore {
    state: RwLock<SessionState>,
    storage: Arc<dyn Storage>,
    logger: Option<Arc<Logger>>,
}

impl SessionStore {
    /// Restore a session previously written to `storage`
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        let store = Self {
            state: RwLock::new(SessionState::default()),
            storage,
            logger: None,
        };
        store.restore();
        store
    }

    #[must_use]
    pub fn with_logger(mut self, logger: Arc<Logger>) -> Self {
        self.logger = Some(logger);
        self
    }

    fn restore(&self) {
        let token = self.read(TOKEN_KEY);
        let user = self.read(USER_KEY).and_then(|json| match serde_json::from_str::<User>(&json) {
            Ok(user) => Some(user),
            Err(e) => {
                eprintln!("[SESSION ERROR] Failed to parse stored user: {}", e);
                None
            }
        });

        let mut state = self.state.write();
        state.token = token;
        state.user = user;
    }

    /// Read a persisted value; a failing backend counts as absent
    fn read(&self, key: &str) -> Option<String> {
        match self.storage.get(key) {
            Ok(value) => value,
            Err(e) => {
                eprintln!("[SESSION ERROR] Failed to read '{}': {}", key, e);
                None
            }
        }
    }

    pub fn login(&self, token: impl Into<String>, user: User) {
        let username = user.username.clone();
        self.set_token(token);
        self.set_user(user);
        if let Some(logger) = &self.logger {
            logger.user_action("login", LogContext::new().with_field("username", username));
        }
    }

    pub fn set_token(&self, token: impl Into<String>) {
        let token = token.into();
        self.persist(TOKEN_KEY, self.storage.set(TOKEN_KEY, &token));
        self.state.write().token = Some(token);
    }

    pub fn set_user(&self, user: User) {
        self.save_user(&user);
        self.state.write().user = Some(user);
    }

    /// Apply a profile update; ignored when nobody is signed in
    pub fn update_user(&self, update: UserUpdate) {
        let snapshot = {
            let mut state = self.state.write();
            match state.user.as_mut() {
                Some(user) => {
                    update.apply(user);
                    user.clone()
                }
                None => return,
            }
        };
        self.save_user(&snapshot);
    }

    pub fn logout(&self) {
        {
            let mut state = self.state.write();
            state.token = None;
            state.user = None;
        }
        self.persist(TOKEN_KEY, self.storage.remove(TOKEN_KEY));
        self.persist(USER_KEY, self.storage.remove(USER_KEY));
    }

    pub fn user(&self) -> Option<User> {
        self.state.read().user.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        let state = self.state.read();
        state.token.is_some() && state.user.is_some()
    }

    pub fn is_admin(&self) -> bool {
        self.state
            .read()
            .user
            .as_ref()
            .map_or(false, |user| user.is_superuser || user.is_admin)
    }

    fn save_user(&self, user: &User) {
        match serde_json::to_string(user) {
            Ok(json) => self.persist(USER_KEY, self.storage.set(USER_KEY, &json)),
            Err(e) => eprintln!("[SESSION ERROR] Failed to serialize user: {}", e),
        }
    }

    fn persist(&self, key: &str, result: Result<(), StorageError>) {
        if let Err(e) = result {
            match &self.logger {
                Some(logger) => logger.warn_with_context(
                    "Failed to persist session state",
                    LogContext::new()
                        .with_field("key", key)
                        .with_field("error", e.to_string()),
                ),
                None => eprintln!("[SESSION ERROR] Failed to persist '{}': {}", key, e),
            }
        }
    }
}

impl CredentialStore for SessionStore {
    fn token(&self) -> Option<String> {
        self.state.read().token.clone()
    }

    fn clear(&self) {
        self.logout();
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.read();
        f.debug_struct("SessionStore")
            .field("has_token", &state.token.is_some())
            .field("user", &state.user.as_ref().map(|u| u.username.as_str()))
            .field("storage", &self.storage.name())
            .finish()
    }
}
