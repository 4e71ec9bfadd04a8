use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Serialize, Debug, Clone, PartialEq, Eq, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1))]
    pub username: String,
    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1))]
    pub username: String,
    #[validate(length(min = 1))]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

/// Answer of `/api/auth/login` and `/api/auth/register`. On failure only
/// `message` is filled in.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct AuthResponse {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default, rename = "isAdmin")]
    pub is_admin: bool,
    #[serde(default)]
    pub message: Option<String>,
}

impl AuthResponse {
    /// The token, if the backend actually issued one.
    pub fn issued_token(&self) -> Option<&str> {
        self.token.as_deref().filter(|token| !token.is_empty())
    }
}
