use crate::api::Backend;
use crate::clock::Clock;
use crate::config::Config;
use crate::error::app_error::AppError;
use crate::frontend::Frontend;
use crate::session_store::SessionStore;
use crate::state::AppState;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Everything the controllers share. The state lock is never held across a
/// backend call.
pub struct Context {
    pub config: Config,
    pub backend: Arc<dyn Backend>,
    pub sessions: SessionStore,
    pub state: Mutex<AppState>,
    pub frontend: Arc<dyn Frontend>,
    pub clock: Arc<dyn Clock>,
}

impl Context {
    pub fn new(config: Config, backend: Arc<dyn Backend>, sessions: SessionStore, frontend: Arc<dyn Frontend>, clock: Arc<dyn Clock>) -> Self {
        Self {
            config,
            backend,
            sessions,
            state: Mutex::new(AppState::default()),
            frontend,
            clock,
        }
    }

    pub fn token(&self) -> Result<String, AppError> {
        self.sessions.token()?.ok_or(AppError::NoSession)
    }
}
