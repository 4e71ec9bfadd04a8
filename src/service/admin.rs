use crate::context::Context;
use crate::error::app_error::AppError;
use crate::models::messages;
use crate::models::sort::{SortColumn, SortState};
use crate::models::user::{StatusResponse, User, UserForm};
use crate::service::auth::refresh_current_user;
use crate::state::{ModalMessage, ModalMode, UserModal, View};
use std::sync::Arc;
use tracing::{debug, error, info, warn};
use validator::Validate;

/// Admin-only user table and the create/edit dialog.
pub struct AdminUserManager {
    ctx: Arc<Context>,
}

impl AdminUserManager {
    pub(crate) fn new(ctx: Arc<Context>) -> Self {
        Self { ctx }
    }

    /// Replaces the cached list and re-applies the current sort. Does nothing
    /// for non-admins; a 403 is ignored.
    pub async fn load_all_users(&self) -> Result<(), AppError> {
        if !self.ctx.state.lock().await.is_admin() {
            return Ok(());
        }

        let token = self.ctx.token()?;
        match self.ctx.backend.list_users(&token).await {
            Ok(users) => {
                debug!(count = users.len(), "user list loaded");
                self.ctx.state.lock().await.set_users(users);
                Ok(())
            }
            Err(AppError::Forbidden) => {
                debug!("user list forbidden, ignoring");
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "failed to load users");
                Err(e)
            }
        }
    }

    pub async fn sort_users(&self, column: SortColumn) -> SortState {
        let mut state = self.ctx.state.lock().await;
        state.sort.toggle(column);
        state.resort();
        state.sort
    }

    pub async fn displayed_users(&self) -> Vec<User> {
        self.ctx.state.lock().await.displayed_users.clone()
    }

    pub async fn open_create_modal(&self) {
        self.ctx.state.lock().await.modal = Some(UserModal {
            mode: ModalMode::Create,
            form: UserForm::default(),
            role_selector_hidden: false,
            message: None,
        });
    }

    pub async fn open_edit_modal(&self, id: i64) -> Result<(), AppError> {
        let mut state = self.ctx.state.lock().await;
        let user = state.find_user(id).cloned().ok_or(AppError::UserNotFound(id))?;
        let editing_self = state.current_user_id() == Some(id);

        state.modal = Some(UserModal {
            mode: ModalMode::Edit { id },
            form: UserForm::for_user(&user),
            role_selector_hidden: editing_self,
            message: None,
        });
        Ok(())
    }

    pub async fn close_modal(&self) {
        self.ctx.state.lock().await.modal = None;
    }

    /// Creates or updates a user from the dialog. The outcome is shown in the
    /// dialog; on success the list is reloaded and the dialog closes after
    /// the configured delay.
    pub async fn save_user(&self, form: UserForm) -> Result<(), AppError> {
        let (mode, role_selector_hidden, caller_id) = {
            let mut state = self.ctx.state.lock().await;
            let Some(modal) = state.modal.as_mut() else {
                return Err(AppError::Validation("No user dialog is open".to_string()));
            };
            modal.form = form.clone();
            modal.message = None;
            (modal.mode, modal.role_selector_hidden, state.current_user_id())
        };

        if let Err(e) = self.check_form(&form) {
            return Err(self.modal_error(e).await);
        }

        let token = match self.ctx.token() {
            Ok(token) => token,
            Err(e) => return Err(self.modal_error(e).await),
        };

        let result = match form.id {
            Some(_) if role_selector_hidden => self.ctx.backend.update_current_user(&token, &(&form).into()).await,
            Some(id) => self.ctx.backend.update_user(&token, id, &(&form).into()).await,
            None => self.ctx.backend.create_user(&token, &(&form).into()).await,
        };

        let response = match result.and_then(accepted) {
            Ok(response) => response,
            Err(e) => return Err(self.modal_error(e).await),
        };

        info!(user_id = ?form.id, username = %form.username, "user saved");
        let message = response.message.filter(|m| !m.trim().is_empty()).unwrap_or_else(|| messages::SAVE_SUCCEEDED.to_string());
        self.ctx.state.lock().await.set_modal_message(ModalMessage::Success(message));

        if form.id.is_some() && form.id == caller_id
            && let Err(e) = refresh_current_user(&self.ctx).await
        {
            warn!(error = %e, "failed to refresh current user after self edit");
        }

        tokio::time::sleep(self.ctx.config.admin.reload_delay()).await;

        // The session may have ended during the delay.
        if self.ctx.state.lock().await.view != View::Workspace {
            return Ok(());
        }
        if let Err(e) = self.load_all_users().await {
            warn!(error = %e, "failed to reload users after save");
        }
        // Another dialog may have been opened during the delay.
        let mut state = self.ctx.state.lock().await;
        if state.modal.as_ref().is_some_and(|modal| modal.mode == mode) {
            state.modal = None;
        }

        Ok(())
    }

    /// Asks for confirmation, then deletes. Returns whether a delete happened.
    pub async fn delete_user(&self, id: i64, username: &str) -> Result<bool, AppError> {
        if !self.ctx.frontend.confirm(&messages::delete_confirmation(username)) {
            debug!(user_id = id, "delete cancelled");
            return Ok(false);
        }

        let token = self.ctx.token()?;
        let result = self.ctx.backend.delete_user(&token, id).await.and_then(accepted);
        if let Err(e) = result {
            warn!(user_id = id, error = %e, "failed to delete user");
            self.ctx.frontend.alert(&e.user_message(messages::DELETE_FAILED));
            return Err(e);
        }

        info!(user_id = id, username = %username, "user deleted");
        if let Err(e) = self.load_all_users().await {
            warn!(error = %e, "failed to reload users after delete");
        }
        Ok(true)
    }

    fn check_form(&self, form: &UserForm) -> Result<(), AppError> {
        form.validate()?;
        if form.id.is_none() && form.password.is_empty() {
            return Err(AppError::Validation(messages::PASSWORD_REQUIRED.to_string()));
        }
        Ok(())
    }

    async fn modal_error(&self, error: AppError) -> AppError {
        if error.is_transport() {
            error!(error = %error, "save request failed");
        }
        let message = error.user_message(messages::SAVE_FAILED);
        self.ctx.state.lock().await.set_modal_message(ModalMessage::Error(message));
        error
    }
}

/// A 2xx answer still has to say `"success"`.
fn accepted(response: StatusResponse) -> Result<StatusResponse, AppError> {
    if response.is_success() {
        Ok(response)
    } else {
        Err(AppError::rejected(200, response.message))
    }
}
