use crate::context::Context;
use crate::error::app_error::AppError;
use crate::models::messages;
use crate::service::activity::ActivityTracker;
use crate::service::auth::end_session;
use crate::service::directory::DirectoryPoller;
use std::sync::Arc;
use tracing::info;

/// Owns the two periodic tasks of a signed-in session so they always start
/// and stop together.
pub struct Workspace {
    ctx: Arc<Context>,
    tracker: Arc<ActivityTracker>,
    poller: Arc<DirectoryPoller>,
}

impl Workspace {
    pub(crate) fn new(ctx: Arc<Context>) -> Arc<Self> {
        Arc::new_cyclic(|workspace| Self {
            tracker: Arc::new(ActivityTracker::new(ctx.clone(), workspace.clone())),
            poller: Arc::new(DirectoryPoller::new(ctx.clone())),
            ctx,
        })
    }

    pub fn tracker(&self) -> &Arc<ActivityTracker> {
        &self.tracker
    }

    pub fn poller(&self) -> &Arc<DirectoryPoller> {
        &self.poller
    }

    pub fn is_running(&self) -> bool {
        self.tracker.is_running() || self.poller.is_running()
    }

    pub fn start(&self) {
        self.tracker.start();
        self.poller.start();
        info!("workspace timers started");
    }

    pub fn stop(&self) {
        self.tracker.stop();
        self.poller.stop();
    }

    /// Forced logout after the idle timeout.
    pub(crate) async fn expire_session(&self) -> Result<(), AppError> {
        let result = end_session(&self.ctx, self).await;
        self.ctx.frontend.alert(messages::SESSION_EXPIRED);
        result
    }
}
