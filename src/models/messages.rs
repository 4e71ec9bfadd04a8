//! User-facing texts shown inline or as notices.

pub const FIELDS_REQUIRED: &str = "Please fill in all fields";
pub const PASSWORD_REQUIRED: &str = "Password is required for a new user";
pub const CONNECTION_ERROR: &str = "Could not connect to the server";
pub const LOGIN_FAILED: &str = "Login failed";
pub const REGISTRATION_FAILED: &str = "Registration failed";
pub const SESSION_EXPIRED: &str = "Session expired due to inactivity. Please log in again.";
pub const ACTIVE_USERS_FAILED: &str = "Failed to load active users";
pub const SAVE_FAILED: &str = "Failed to save user";
pub const SAVE_SUCCEEDED: &str = "User saved successfully";
pub const DELETE_FAILED: &str = "Failed to delete user";

pub const ROLE_ADMIN: &str = "Administrator";
pub const ROLE_USER: &str = "User";

pub fn role_label(is_admin: bool) -> &'static str {
    if is_admin { ROLE_ADMIN } else { ROLE_USER }
}

pub fn delete_confirmation(username: &str) -> String {
    format!("Delete user \"{username}\"?")
}
