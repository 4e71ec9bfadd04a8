use crate::api::{Backend, HttpBackend};
use crate::clock::{Clock, SystemClock};
use crate::config::Config;
use crate::context::Context;
use crate::error::app_error::AppError;
use crate::frontend::Frontend;
use crate::models::input::InputEvent;
use crate::service::activity::ActivityTracker;
use crate::service::admin::AdminUserManager;
use crate::service::auth::AuthController;
use crate::service::directory::DirectoryPoller;
use crate::service::workspace::Workspace;
use crate::session_store::SessionStore;
use crate::state::AppState;
use crate::storage::{FileStore, KeyValueStore};
use std::sync::Arc;
use tracing::info;

/// Entry point: wires the controllers around one shared context.
pub struct Portal {
    ctx: Arc<Context>,
    workspace: Arc<Workspace>,
    auth: AuthController,
    admin: Arc<AdminUserManager>,
}

impl Portal {
    pub fn new(config: Config, backend: Arc<dyn Backend>, store: Arc<dyn KeyValueStore>, frontend: Arc<dyn Frontend>, clock: Arc<dyn Clock>) -> Self {
        let ctx = Arc::new(Context::new(config, backend, SessionStore::new(store), frontend, clock));
        let workspace = Workspace::new(ctx.clone());
        let admin = Arc::new(AdminUserManager::new(ctx.clone()));
        let auth = AuthController::new(ctx.clone(), workspace.clone(), admin.clone());

        Self { ctx, workspace, auth, admin }
    }

    /// HTTP backend, file-backed session storage and the system clock.
    pub fn from_config(config: Config, frontend: Arc<dyn Frontend>) -> Result<Self, AppError> {
        let backend = HttpBackend::new(&config.api)?;
        let store = FileStore::open(&config.storage.path)?;
        info!(base_url = %backend.base_url(), storage = %store.path().display(), "portal client configured");

        Ok(Self::new(config, Arc::new(backend), Arc::new(store), frontend, Arc::new(SystemClock)))
    }

    pub fn auth(&self) -> &AuthController {
        &self.auth
    }

    pub fn admin(&self) -> &AdminUserManager {
        &self.admin
    }

    pub fn workspace(&self) -> &Arc<Workspace> {
        &self.workspace
    }

    pub fn tracker(&self) -> &Arc<ActivityTracker> {
        self.workspace.tracker()
    }

    pub fn poller(&self) -> &Arc<DirectoryPoller> {
        self.workspace.poller()
    }

    pub fn config(&self) -> &Config {
        &self.ctx.config
    }

    #[cfg(test)]
    pub(crate) fn context(&self) -> &Context {
        &self.ctx
    }

    /// Copy of the current view state for rendering.
    pub async fn snapshot(&self) -> AppState {
        self.ctx.state.lock().await.clone()
    }

    pub fn on_input(&self, event: InputEvent) {
        self.workspace.tracker().on_input(event);
    }
}
