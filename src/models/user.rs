use serde::{Deserialize, Serialize};
use validator::Validate;

/// A portal account as returned by `/api/user/me` and `/api/user/all`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    #[serde(rename = "isAdmin")]
    pub is_admin: bool,
}

/// Entry of `/api/user/active`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct ActiveUser {
    #[serde(default)]
    pub id: Option<i64>,
    pub username: String,
    pub email: String,
    #[serde(rename = "isAdmin")]
    pub is_admin: bool,
}

/// The caller's cached profile. Right after login only the username and the
/// admin flag are known; `id` and `email` arrive with the `/api/user/me` fetch.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    pub id: Option<i64>,
    pub username: String,
    pub email: Option<String>,
    pub is_admin: bool,
}

impl From<&User> for CurrentUser {
    fn from(user: &User) -> Self {
        Self {
            id: Some(user.id),
            username: user.username.clone(),
            email: Some(user.email.clone()),
            is_admin: user.is_admin,
        }
    }
}

/// Contents of the create/edit user dialog.
#[derive(Debug, Clone, PartialEq, Eq, Default, Validate)]
pub struct UserForm {
    /// `None` while creating a user.
    pub id: Option<i64>,
    #[validate(length(min = 1))]
    pub username: String,
    #[validate(length(min = 1))]
    pub email: String,
    pub password: String,
    pub is_admin: bool,
}

impl UserForm {
    pub fn for_user(user: &User) -> Self {
        Self {
            id: Some(user.id),
            username: user.username.clone(),
            email: user.email.clone(),
            password: String::new(),
            is_admin: user.is_admin,
        }
    }

    /// The password, unless the field was left blank.
    pub fn new_password(&self) -> Option<String> {
        if self.password.trim().is_empty() { None } else { Some(self.password.clone()) }
    }
}

/// Body of `PUT /api/user/me`. Carries no role: users cannot change their own.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct UpdateSelfRequest {
    pub username: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

/// Body of `PUT /api/user/{id}`.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct UpdateUserRequest {
    pub username: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(rename = "isAdmin")]
    pub is_admin: bool,
}

/// Body of `POST /api/user/register`.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct CreateUserRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(rename = "isAdmin")]
    pub is_admin: bool,
}

impl From<&UserForm> for UpdateSelfRequest {
    fn from(form: &UserForm) -> Self {
        Self {
            username: form.username.clone(),
            email: form.email.clone(),
            password: form.new_password(),
        }
    }
}

impl From<&UserForm> for UpdateUserRequest {
    fn from(form: &UserForm) -> Self {
        Self {
            username: form.username.clone(),
            email: form.email.clone(),
            password: form.new_password(),
            is_admin: form.is_admin,
        }
    }
}

impl From<&UserForm> for CreateUserRequest {
    fn from(form: &UserForm) -> Self {
        Self {
            username: form.username.clone(),
            email: form.email.clone(),
            password: form.password.clone(),
            is_admin: form.is_admin,
        }
    }
}

/// `{status, message}` acknowledgement of the user management endpoints.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct StatusResponse {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl StatusResponse {
    pub const SUCCESS: &'static str = "success";

    pub fn is_success(&self) -> bool {
        self.status.as_deref() == Some(Self::SUCCESS)
    }
}
