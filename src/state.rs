use crate::models::sort::SortState;
use crate::models::user::{ActiveUser, CurrentUser, User, UserForm};
use serde::Serialize;

/// Top-level screen. Being a single value, exactly one of them is visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum View {
    Auth(AuthTab),
    Workspace,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum AuthTab {
    #[default]
    Login,
    Register,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ActiveUsersPanel {
    pub users: Vec<ActiveUser>,
    pub error: Option<String>,
}

impl ActiveUsersPanel {
    pub fn count(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty() && self.error.is_none()
    }

    pub fn clear(&mut self) {
        self.users.clear();
        self.error = None;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ModalMode {
    Create,
    Edit { id: i64 },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ModalMessage {
    Success(String),
    Error(String),
}

/// The create/edit user dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserModal {
    pub mode: ModalMode,
    pub form: UserForm,
    /// Hidden when the caller edits their own account, which also routes the
    /// save through the self-update endpoint.
    pub role_selector_hidden: bool,
    pub message: Option<ModalMessage>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    pub view: View,
    pub login_error: Option<String>,
    pub register_error: Option<String>,
    pub current_user: Option<CurrentUser>,
    pub admin_section_visible: bool,
    pub active_users: ActiveUsersPanel,
    /// Canonical list as last fetched from the backend.
    pub users: Vec<User>,
    /// `users` in the current sort order; this is what gets rendered.
    pub displayed_users: Vec<User>,
    pub sort: SortState,
    pub modal: Option<UserModal>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            view: View::Auth(AuthTab::Login),
            login_error: None,
            register_error: None,
            current_user: None,
            admin_section_visible: false,
            active_users: ActiveUsersPanel::default(),
            users: Vec::new(),
            displayed_users: Vec::new(),
            sort: SortState::default(),
            modal: None,
        }
    }
}

impl AppState {
    pub fn is_admin(&self) -> bool {
        self.current_user.as_ref().is_some_and(|user| user.is_admin)
    }

    pub fn current_user_id(&self) -> Option<i64> {
        self.current_user.as_ref().and_then(|user| user.id)
    }

    pub fn clear_auth_errors(&mut self) {
        self.login_error = None;
        self.register_error = None;
    }

    /// Back to the login tab with every workspace panel emptied. The sort
    /// order is kept for the lifetime of the client.
    pub fn reset_to_auth(&mut self) {
        self.view = View::Auth(AuthTab::Login);
        self.clear_auth_errors();
        self.current_user = None;
        self.admin_section_visible = false;
        self.active_users.clear();
        self.users.clear();
        self.displayed_users.clear();
        self.modal = None;
    }

    pub fn set_users(&mut self, users: Vec<User>) {
        self.displayed_users = self.sort.apply(&users);
        self.users = users;
    }

    pub fn resort(&mut self) {
        self.displayed_users = self.sort.apply(&self.users);
    }

    pub fn find_user(&self, id: i64) -> Option<&User> {
        self.users.iter().find(|user| user.id == id)
    }

    pub fn set_modal_message(&mut self, message: ModalMessage) {
        if let Some(modal) = self.modal.as_mut() {
            modal.message = Some(message);
        }
    }
}
