use crate::context::Context;
use crate::error::app_error::AppError;
use crate::models::messages;
use crate::service::lock;
use crate::service::task::TaskHandle;
use crate::state::{ActiveUsersPanel, View};
use std::ops::ControlFlow;
use std::sync::{Arc, Mutex};
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// The panel now lists this many users.
    Rendered(usize),
    /// The caller is not (or no longer) an admin; the panel was emptied.
    Cleared,
    /// The fetch failed and the panel shows an error text.
    Failed,
}

/// Refreshes the active-user panel while the workspace is open.
pub struct DirectoryPoller {
    ctx: Arc<Context>,
    timer: Mutex<Option<TaskHandle>>,
}

impl DirectoryPoller {
    pub(crate) fn new(ctx: Arc<Context>) -> Self {
        Self { ctx, timer: Mutex::new(None) }
    }

    pub fn is_running(&self) -> bool {
        lock(&self.timer).as_ref().is_some_and(|timer| !timer.is_finished())
    }

    pub async fn poll_once(&self) -> PollOutcome {
        let visible = {
            let state = self.ctx.state.lock().await;
            state.view == View::Workspace && state.is_admin()
        };
        if !visible {
            return self.clear().await;
        }

        let token = match self.ctx.token() {
            Ok(token) => token,
            Err(_) => return self.clear().await,
        };

        let result = self.ctx.backend.active_users(&token).await;

        let mut state = self.ctx.state.lock().await;
        // The session may have ended while the request was in flight.
        if state.view != View::Workspace || !state.is_admin() {
            state.active_users.clear();
            return PollOutcome::Cleared;
        }

        match result {
            Ok(users) => {
                let count = users.len();
                state.active_users = ActiveUsersPanel { users, error: None };
                PollOutcome::Rendered(count)
            }
            Err(AppError::Forbidden) => {
                debug!("active users forbidden, clearing panel");
                state.active_users.clear();
                PollOutcome::Cleared
            }
            Err(e) => {
                warn!(error = %e, "failed to load active users");
                state.active_users = ActiveUsersPanel {
                    users: Vec::new(),
                    error: Some(messages::ACTIVE_USERS_FAILED.to_string()),
                };
                PollOutcome::Failed
            }
        }
    }

    /// Polls right away and then every configured interval. Any previous
    /// timer is cancelled first.
    pub fn start(self: &Arc<Self>) {
        self.stop();

        let poller = Arc::downgrade(self);
        let timer = TaskHandle::spawn_periodic("active-users", self.ctx.config.poller.interval(), true, move || {
            let poller = poller.clone();
            async move {
                match poller.upgrade() {
                    Some(poller) => {
                        poller.poll_once().await;
                        ControlFlow::Continue(())
                    }
                    None => ControlFlow::Break(()),
                }
            }
        });

        *lock(&self.timer) = Some(timer);
    }

    pub fn stop(&self) {
        if let Some(timer) = lock(&self.timer).take() {
            debug!(task = timer.name(), "active user polling stopped");
            timer.cancel();
        }
    }

    async fn clear(&self) -> PollOutcome {
        self.ctx.state.lock().await.active_users.clear();
        PollOutcome::Cleared
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user::{ActiveUser, CurrentUser};
    use crate::test_utils::{Call, Reply, TestPortal};

    async fn workspace_as(harness: &TestPortal, is_admin: bool) {
        harness.sign_in_storage(is_admin);
        let mut state = harness.portal.context().state.lock().await;
        state.view = View::Workspace;
        state.current_user = Some(CurrentUser {
            id: Some(1),
            username: "alice".into(),
            email: Some("alice@example.com".into()),
            is_admin,
        });
    }

    #[tokio::test]
    async fn admin_sees_active_users() {
        let harness = TestPortal::new();
        workspace_as(&harness, true).await;

        assert_eq!(harness.portal.poller().poll_once().await, PollOutcome::Rendered(1));
        let panel = harness.portal.snapshot().await.active_users;
        assert_eq!(panel.count(), 1);
        assert_eq!(panel.error, None);
    }

    #[tokio::test]
    async fn non_admin_gets_empty_panel_without_request() {
        let harness = TestPortal::new();
        workspace_as(&harness, false).await;
        harness.portal.context().state.lock().await.active_users.users.push(ActiveUser::default());

        assert_eq!(harness.portal.poller().poll_once().await, PollOutcome::Cleared);
        assert!(harness.portal.snapshot().await.active_users.is_empty());
        assert_eq!(harness.backend.count(|call| matches!(call, Call::ActiveUsers)), 0);
    }

    #[tokio::test]
    async fn forbidden_clears_without_error() {
        let harness = TestPortal::new();
        workspace_as(&harness, true).await;
        harness.portal.poller().poll_once().await;
        harness.backend.set_active_users(Reply::Forbidden);

        assert_eq!(harness.portal.poller().poll_once().await, PollOutcome::Cleared);
        let panel = harness.portal.snapshot().await.active_users;
        assert_eq!(panel.count(), 0);
        assert_eq!(panel.error, None);
    }

    #[tokio::test]
    async fn other_failures_show_error_text() {
        let harness = TestPortal::new();
        workspace_as(&harness, true).await;
        harness.backend.set_active_users(Reply::Rejected(500, None));

        assert_eq!(harness.portal.poller().poll_once().await, PollOutcome::Failed);
        let panel = harness.portal.snapshot().await.active_users;
        assert_eq!(panel.error.as_deref(), Some(messages::ACTIVE_USERS_FAILED));
    }

    #[tokio::test]
    async fn started_poller_fetches_immediately() {
        let harness = TestPortal::new();
        workspace_as(&harness, true).await;

        harness.portal.poller().start();
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        harness.portal.poller().stop();

        assert!(harness.backend.count(|call| matches!(call, Call::ActiveUsers)) >= 1);
        assert!(!harness.portal.poller().is_running());
    }
}
