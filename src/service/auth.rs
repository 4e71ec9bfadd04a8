use crate::context::Context;
use crate::error::app_error::AppError;
use crate::models::auth::{AuthResponse, LoginRequest, RegisterRequest};
use crate::models::messages;
use crate::models::session::Session;
use crate::models::user::{CurrentUser, User};
use crate::service::admin::AdminUserManager;
use crate::service::workspace::Workspace;
use crate::state::{AuthTab, View};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, error, info, warn};
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AuthFlow {
    Login,
    Register,
}

impl AuthFlow {
    fn fallback(self) -> &'static str {
        match self {
            AuthFlow::Login => messages::LOGIN_FAILED,
            AuthFlow::Register => messages::REGISTRATION_FAILED,
        }
    }
}

impl fmt::Display for AuthFlow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthFlow::Login => f.write_str("login"),
            AuthFlow::Register => f.write_str("register"),
        }
    }
}

/// Login, registration and logout, and the switch between the auth screen
/// and the workspace.
pub struct AuthController {
    ctx: Arc<Context>,
    workspace: Arc<Workspace>,
    admin: Arc<AdminUserManager>,
}

impl AuthController {
    pub(crate) fn new(ctx: Arc<Context>, workspace: Arc<Workspace>, admin: Arc<AdminUserManager>) -> Self {
        Self { ctx, workspace, admin }
    }

    pub async fn show_login(&self) {
        let mut state = self.ctx.state.lock().await;
        if matches!(state.view, View::Auth(_)) {
            state.view = View::Auth(AuthTab::Login);
            state.clear_auth_errors();
        }
    }

    pub async fn show_register(&self) {
        let mut state = self.ctx.state.lock().await;
        if matches!(state.view, View::Auth(_)) {
            state.view = View::Auth(AuthTab::Register);
            state.clear_auth_errors();
        }
    }

    /// Both fields are required; nothing is sent if either is empty.
    pub async fn login(&self, username: &str, password: &str) -> Result<(), AppError> {
        let request = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        if let Err(e) = request.validate() {
            return Err(self.fail(AuthFlow::Login, e.into()).await);
        }

        let result = self.ctx.backend.login(&request).await;
        self.complete(AuthFlow::Login, &request.username, result).await
    }

    /// Same contract as [`login`](Self::login) with three required fields.
    pub async fn register(&self, username: &str, email: &str, password: &str) -> Result<(), AppError> {
        let request = RegisterRequest {
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        };
        if let Err(e) = request.validate() {
            return Err(self.fail(AuthFlow::Register, e.into()).await);
        }

        let result = self.ctx.backend.register(&request).await;
        self.complete(AuthFlow::Register, &request.username, result).await
    }

    pub async fn logout(&self) -> Result<(), AppError> {
        end_session(&self.ctx, &self.workspace).await
    }

    /// Picks up a session persisted by an earlier run. Returns whether the
    /// workspace was entered.
    pub async fn restore(&self) -> Result<bool, AppError> {
        let Some(session) = self.ctx.sessions.load()? else {
            show_auth(&self.ctx, &self.workspace).await;
            return Ok(false);
        };

        info!(username = %session.username, "restoring saved session");
        self.ctx.state.lock().await.current_user = Some(CurrentUser {
            id: None,
            username: session.username,
            email: None,
            is_admin: session.is_admin,
        });

        self.enter_workspace().await?;
        Ok(true)
    }

    /// Shows the workspace. The profile is re-fetched before any admin-only
    /// element is revealed; if that fails the auth screen comes back.
    pub async fn enter_workspace(&self) -> Result<(), AppError> {
        {
            let mut state = self.ctx.state.lock().await;
            state.view = View::Workspace;
            state.admin_section_visible = false;
        }

        let user = match refresh_current_user(&self.ctx).await {
            Ok(user) => user,
            Err(e) => {
                warn!(error = %e, "failed to load current user");
                show_auth(&self.ctx, &self.workspace).await;
                return Err(e);
            }
        };

        if user.is_admin
            && let Err(e) = self.admin.load_all_users().await
        {
            warn!(error = %e, "failed to load user list");
        }

        self.workspace.start();
        Ok(())
    }

    async fn complete(&self, flow: AuthFlow, username: &str, result: Result<AuthResponse, AppError>) -> Result<(), AppError> {
        let response = match result {
            Ok(response) => response,
            Err(e) => return Err(self.fail(flow, e).await),
        };

        let Some(token) = response.issued_token() else {
            return Err(self.fail(flow, AppError::rejected(200, response.message.clone())).await);
        };

        let session = Session::new(token, response.username.clone().unwrap_or_else(|| username.to_string()), response.is_admin);
        if let Err(e) = self.ctx.sessions.save(&session) {
            return Err(self.fail(flow, e).await);
        }

        {
            let mut state = self.ctx.state.lock().await;
            state.clear_auth_errors();
            state.current_user = Some(CurrentUser {
                id: None,
                username: session.username.clone(),
                email: None,
                is_admin: session.is_admin,
            });
        }

        info!(username = %session.username, flow = %flow, "signed in");
        self.enter_workspace().await
    }

    /// Puts the inline error for `flow` in place and hands the error back.
    async fn fail(&self, flow: AuthFlow, error: AppError) -> AppError {
        if error.is_transport() {
            error!(flow = %flow, error = %error, "auth request failed");
        } else {
            debug!(flow = %flow, error = %error, "auth rejected");
        }

        let message = error.user_message(flow.fallback());
        let mut state = self.ctx.state.lock().await;
        match flow {
            AuthFlow::Login => state.login_error = Some(message),
            AuthFlow::Register => state.register_error = Some(message),
        }

        error
    }
}

/// Fetches `/api/user/me` into the cached profile.
pub(crate) async fn refresh_current_user(ctx: &Context) -> Result<User, AppError> {
    let token = ctx.token()?;
    let user = ctx.backend.current_user(&token).await?;

    let mut state = ctx.state.lock().await;
    state.current_user = Some(CurrentUser::from(&user));
    state.admin_section_visible = user.is_admin && state.view == View::Workspace;
    debug!(user_id = user.id, is_admin = user.is_admin, "current user loaded");

    Ok(user)
}

/// Auth screen with blank forms; both workspace timers are cancelled.
pub(crate) async fn show_auth(ctx: &Context, workspace: &Workspace) {
    workspace.stop();
    ctx.state.lock().await.reset_to_auth();
}

/// Full logout: timers, best-effort backend notification, persisted session.
pub(crate) async fn end_session(ctx: &Context, workspace: &Workspace) -> Result<(), AppError> {
    workspace.stop();

    match ctx.sessions.token() {
        Ok(Some(token)) => {
            if let Err(e) = ctx.backend.logout(&token).await {
                debug!(error = %e, "logout notification failed, ignoring");
            }
        }
        Ok(None) => {}
        Err(e) => warn!(error = %e, "failed to read session token"),
    }

    let cleared = ctx.sessions.clear();
    show_auth(ctx, workspace).await;
    info!("session ended");

    cleared
}
