use crate::api::{Backend, RequestId, json, paths};
use crate::config::ApiConfig;
use crate::error::app_error::AppError;
use crate::models::auth::{AuthResponse, LoginRequest, RegisterRequest};
use crate::models::user::{ActiveUser, CreateUserRequest, StatusResponse, UpdateSelfRequest, UpdateUserRequest, User};
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};

/// [`Backend`] speaking JSON over HTTP.
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(config: &ApiConfig) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds.max(1)))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str, token: Option<&str>) -> RequestBuilder {
        let builder = self.client.request(method, format!("{}{}", self.base_url, path));
        match token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn call<T: DeserializeOwned>(&self, method: Method, path: &str, token: Option<&str>) -> Result<T, AppError> {
        let bytes = self.execute(self.request(method.clone(), path, token), &method, path).await?;
        Ok(json::decode(path, &bytes)?)
    }

    async fn call_with<B: Serialize + Sync, T: DeserializeOwned>(&self, method: Method, path: &str, token: Option<&str>, body: &B) -> Result<T, AppError> {
        let bytes = self.execute(self.request(method.clone(), path, token).json(body), &method, path).await?;
        Ok(json::decode(path, &bytes)?)
    }

    async fn execute(&self, builder: RequestBuilder, method: &Method, path: &str) -> Result<Vec<u8>, AppError> {
        let request_id = RequestId::new();
        debug!(request_id = %request_id.0, method = %method, path = %path, "sending request");

        let response = builder.header("X-Request-Id", &request_id.0).send().await.map_err(|e| {
            warn!(request_id = %request_id.0, method = %method, path = %path, error = %e, "request failed");
            AppError::Connection(e.to_string())
        })?;

        let status = response.status();
        let bytes = response.bytes().await.map_err(|e| AppError::Connection(e.to_string()))?;

        if status == StatusCode::FORBIDDEN {
            debug!(request_id = %request_id.0, method = %method, path = %path, "forbidden");
            return Err(AppError::Forbidden);
        }

        if !status.is_success() {
            warn!(
                request_id = %request_id.0,
                method = %method,
                path = %path,
                status = %status.as_u16(),
                "request completed with error"
            );
            return Err(AppError::rejected(status.as_u16(), json::error_message(&bytes)));
        }

        debug!(request_id = %request_id.0, method = %method, path = %path, status = %status.as_u16(), "request completed");
        Ok(bytes.to_vec())
    }
}

#[async_trait::async_trait]
impl Backend for HttpBackend {
    async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, AppError> {
        self.call_with(Method::POST, paths::LOGIN, None, request).await
    }

    async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse, AppError> {
        self.call_with(Method::POST, paths::REGISTER, None, request).await
    }

    async fn logout(&self, token: &str) -> Result<(), AppError> {
        self.execute(self.request(Method::POST, paths::LOGOUT, Some(token)), &Method::POST, paths::LOGOUT)
            .await
            .map(|_| ())
    }

    async fn current_user(&self, token: &str) -> Result<User, AppError> {
        self.call(Method::GET, paths::ME, Some(token)).await
    }

    async fn update_current_user(&self, token: &str, request: &UpdateSelfRequest) -> Result<StatusResponse, AppError> {
        self.call_with(Method::PUT, paths::ME, Some(token), request).await
    }

    async fn list_users(&self, token: &str) -> Result<Vec<User>, AppError> {
        self.call(Method::GET, paths::ALL_USERS, Some(token)).await
    }

    async fn active_users(&self, token: &str) -> Result<Vec<ActiveUser>, AppError> {
        self.call(Method::GET, paths::ACTIVE_USERS, Some(token)).await
    }

    async fn create_user(&self, token: &str, request: &CreateUserRequest) -> Result<StatusResponse, AppError> {
        self.call_with(Method::POST, paths::CREATE_USER, Some(token), request).await
    }

    async fn update_user(&self, token: &str, id: i64, request: &UpdateUserRequest) -> Result<StatusResponse, AppError> {
        self.call_with(Method::PUT, &paths::user(id), Some(token), request).await
    }

    async fn delete_user(&self, token: &str, id: i64) -> Result<StatusResponse, AppError> {
        self.call(Method::DELETE, &paths::user(id), Some(token)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_trimmed_from_base_url() {
        let backend = HttpBackend::new(&ApiConfig {
            base_url: "http://portal.test/".to_string(),
            request_timeout_seconds: 5,
        })
        .unwrap();
        assert_eq!(backend.base_url(), "http://portal.test");
    }

    #[tokio::test]
    async fn unreachable_backend_is_a_connection_error() {
        let backend = HttpBackend::new(&ApiConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            request_timeout_seconds: 2,
        })
        .unwrap();

        let err = backend.current_user("token").await.unwrap_err();
        assert!(err.is_transport(), "unexpected error: {err:?}");
    }
}
