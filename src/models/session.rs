use chrono::{DateTime, Utc};
use serde::Serialize;

/// Authenticated context persisted across restarts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Session {
    pub token: String,
    pub username: String,
    pub is_admin: bool,
    pub last_activity_time: Option<DateTime<Utc>>,
}

impl Session {
    pub fn new(token: impl Into<String>, username: impl Into<String>, is_admin: bool) -> Self {
        Self {
            token: token.into(),
            username: username.into(),
            is_admin,
            last_activity_time: None,
        }
    }
}
