mod client;
mod json;

pub use client::HttpBackend;

use crate::error::app_error::AppError;
use crate::models::auth::{AuthResponse, LoginRequest, RegisterRequest};
use crate::models::user::{ActiveUser, CreateUserRequest, StatusResponse, UpdateSelfRequest, UpdateUserRequest, User};

/// The portal REST backend.
///
/// Implementations turn a 403 into [`AppError::Forbidden`], any other non-2xx
/// answer into [`AppError::Rejected`] carrying the backend's `message`, and
/// transport failures into [`AppError::Connection`]. `login` and `register`
/// return the parsed body on 2xx even when it carries no token; deciding what
/// that means is up to the caller.
#[async_trait::async_trait]
pub trait Backend: Send + Sync {
    async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, AppError>;
    async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse, AppError>;
    async fn logout(&self, token: &str) -> Result<(), AppError>;
    async fn current_user(&self, token: &str) -> Result<User, AppError>;
    async fn update_current_user(&self, token: &str, request: &UpdateSelfRequest) -> Result<StatusResponse, AppError>;
    async fn list_users(&self, token: &str) -> Result<Vec<User>, AppError>;
    async fn active_users(&self, token: &str) -> Result<Vec<ActiveUser>, AppError>;
    async fn create_user(&self, token: &str, request: &CreateUserRequest) -> Result<StatusResponse, AppError>;
    async fn update_user(&self, token: &str, id: i64, request: &UpdateUserRequest) -> Result<StatusResponse, AppError>;
    async fn delete_user(&self, token: &str, id: i64) -> Result<StatusResponse, AppError>;
}

pub mod paths {
    pub const LOGIN: &str = "/api/auth/login";
    pub const REGISTER: &str = "/api/auth/register";
    pub const LOGOUT: &str = "/api/auth/logout";
    pub const ME: &str = "/api/user/me";
    pub const ALL_USERS: &str = "/api/user/all";
    pub const ACTIVE_USERS: &str = "/api/user/active";
    pub const CREATE_USER: &str = "/api/user/register";

    pub fn user(id: i64) -> String {
        format!("/api/user/{id}")
    }
}

/// Request ID sent as `X-Request-Id` so client and server logs can be matched.
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

impl RequestId {
    pub fn new() -> Self {
        RequestId(uuid::Uuid::new_v4().to_string())
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}
