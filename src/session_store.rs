use crate::error::app_error::AppError;
use crate::models::session::Session;
use crate::storage::KeyValueStore;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::warn;

pub const TOKEN_KEY: &str = "token";
pub const USERNAME_KEY: &str = "username";
pub const IS_ADMIN_KEY: &str = "isAdmin";
pub const LAST_ACTIVITY_KEY: &str = "lastActivityTime";

/// Persistent session: token, cached identity and last activity timestamp.
/// Timestamps are stored as milliseconds since the Unix epoch.
#[derive(Clone)]
pub struct SessionStore {
    store: Arc<dyn KeyValueStore>,
}

impl SessionStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub fn save(&self, session: &Session) -> Result<(), AppError> {
        self.store.set(TOKEN_KEY, &session.token)?;
        self.store.set(USERNAME_KEY, &session.username)?;
        self.store.set(IS_ADMIN_KEY, if session.is_admin { "true" } else { "false" })?;
        if let Some(last_activity) = session.last_activity_time {
            self.set_last_activity(last_activity)?;
        }
        Ok(())
    }

    pub fn load(&self) -> Result<Option<Session>, AppError> {
        let Some(token) = self.token()? else {
            return Ok(None);
        };

        Ok(Some(Session {
            token,
            username: self.store.get(USERNAME_KEY)?.unwrap_or_default(),
            is_admin: self.store.get(IS_ADMIN_KEY)?.as_deref() == Some("true"),
            last_activity_time: self.last_activity()?,
        }))
    }

    pub fn token(&self) -> Result<Option<String>, AppError> {
        Ok(self.store.get(TOKEN_KEY)?.filter(|token| !token.is_empty()))
    }

    pub fn has_token(&self) -> bool {
        match self.token() {
            Ok(token) => token.is_some(),
            Err(e) => {
                warn!(error = %e, "failed to read session token");
                false
            }
        }
    }

    /// Removes the whole session, timestamp included.
    pub fn clear(&self) -> Result<(), AppError> {
        self.store.remove(TOKEN_KEY)?;
        self.store.remove(USERNAME_KEY)?;
        self.store.remove(IS_ADMIN_KEY)?;
        self.store.remove(LAST_ACTIVITY_KEY)
    }

    pub fn last_activity(&self) -> Result<Option<DateTime<Utc>>, AppError> {
        let raw = self.store.get(LAST_ACTIVITY_KEY)?;
        Ok(raw.and_then(|value| match value.parse::<i64>() {
            Ok(millis) => DateTime::from_timestamp_millis(millis),
            Err(_) => {
                warn!(value = %value, "ignoring malformed last activity timestamp");
                None
            }
        }))
    }

    /// Stores `at` unless a later timestamp is already persisted, and returns
    /// the timestamp now in effect.
    pub fn set_last_activity(&self, at: DateTime<Utc>) -> Result<DateTime<Utc>, AppError> {
        if let Some(current) = self.last_activity()?
            && current > at
        {
            return Ok(current);
        }

        self.store.set(LAST_ACTIVITY_KEY, &at.timestamp_millis().to_string())?;
        Ok(at)
    }

    pub fn clear_last_activity(&self) -> Result<(), AppError> {
        self.store.remove(LAST_ACTIVITY_KEY)
    }
}
