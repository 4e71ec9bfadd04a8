use crate::context::Context;
use crate::error::app_error::AppError;
use crate::models::input::InputEvent;
use crate::service::lock;
use crate::service::task::TaskHandle;
use crate::service::workspace::Workspace;
use chrono::{DateTime, Utc};
use std::ops::ControlFlow;
use std::sync::{Arc, Mutex, Weak};
use std::time::Duration;
use tracing::{debug, info, trace, warn};

/// Result of one inactivity check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InactivityOutcome {
    /// No session token; the tracker stopped itself.
    NoSession,
    /// No timestamp anywhere yet; the clock starts now.
    Initialized,
    Active { idle: Duration },
    /// The idle timeout elapsed and the session was ended.
    Expired,
}

/// Watches user input and ends the session after the configured idle span.
///
/// Lifecycle: `Stopped --start()--> Running --(timeout | logout)--> stop() --> Stopped`.
pub struct ActivityTracker {
    ctx: Arc<Context>,
    workspace: Weak<Workspace>,
    last_activity: Mutex<Option<DateTime<Utc>>>,
    timer: Mutex<Option<TaskHandle>>,
}

impl ActivityTracker {
    pub(crate) fn new(ctx: Arc<Context>, workspace: Weak<Workspace>) -> Self {
        Self {
            ctx,
            workspace,
            last_activity: Mutex::new(None),
            timer: Mutex::new(None),
        }
    }

    pub fn is_running(&self) -> bool {
        lock(&self.timer).as_ref().is_some_and(|timer| !timer.is_finished())
    }

    pub fn last_activity(&self) -> Option<DateTime<Utc>> {
        *lock(&self.last_activity)
    }

    /// Entry point for every input-class event.
    pub fn on_input(&self, event: InputEvent) {
        match self.record_activity() {
            Ok(true) => trace!(event = ?event, "activity recorded"),
            Ok(false) => {}
            Err(e) => warn!(event = ?event, error = %e, "failed to record activity"),
        }
    }

    /// Stamps the current time as the last activity. Returns `false` without
    /// touching anything when there is no session.
    pub fn record_activity(&self) -> Result<bool, AppError> {
        if !self.ctx.sessions.has_token() {
            return Ok(false);
        }

        let effective = self.ctx.sessions.set_last_activity(self.ctx.clock.now())?;
        let mut last = lock(&self.last_activity);
        *last = Some(last.map_or(effective, |current| current.max(effective)));
        Ok(true)
    }

    pub async fn check_inactivity(&self) -> Result<InactivityOutcome, AppError> {
        // The token is checked first so that a timestamp is never created
        // for a session that no longer exists.
        if !self.ctx.sessions.has_token() {
            debug!("no session token, stopping activity tracker");
            self.stop();
            return Ok(InactivityOutcome::NoSession);
        }

        let now = self.ctx.clock.now();
        let last = {
            let mut last = lock(&self.last_activity);
            if last.is_none() {
                *last = self.ctx.sessions.last_activity()?;
            }
            *last
        };

        let Some(last) = last else {
            let effective = self.ctx.sessions.set_last_activity(now)?;
            *lock(&self.last_activity) = Some(effective);
            return Ok(InactivityOutcome::Initialized);
        };

        let idle = (now - last).to_std().unwrap_or(Duration::ZERO);
        let timeout = self.ctx.config.session.idle_timeout();
        if idle < timeout {
            trace!(idle_seconds = idle.as_secs(), "session active");
            return Ok(InactivityOutcome::Active { idle });
        }

        info!(idle_seconds = idle.as_secs(), timeout_seconds = timeout.as_secs(), "idle timeout reached, ending session");
        // Stopping first guarantees a single forced logout per session.
        self.stop();
        if let Some(workspace) = self.workspace.upgrade() {
            workspace.expire_session().await?;
        }

        Ok(InactivityOutcome::Expired)
    }

    /// Starts the periodic check, replacing any timer already running.
    pub fn start(self: &Arc<Self>) {
        self.stop();

        let tracker = Arc::downgrade(self);
        let period = self.ctx.config.session.check_interval();
        let timer = TaskHandle::spawn_periodic("activity-tracker", period, false, move || {
            let tracker = tracker.clone();
            async move {
                let Some(tracker) = tracker.upgrade() else {
                    return ControlFlow::Break(());
                };

                match tracker.check_inactivity().await {
                    Ok(InactivityOutcome::NoSession | InactivityOutcome::Expired) => ControlFlow::Break(()),
                    Ok(_) => ControlFlow::Continue(()),
                    Err(e) => {
                        warn!(error = %e, "inactivity check failed");
                        ControlFlow::Continue(())
                    }
                }
            }
        });

        *lock(&self.timer) = Some(timer);
        debug!(check_interval_seconds = period.as_secs(), "activity tracker started");
    }

    /// Cancels the timer and forgets the last activity, in memory and on disk.
    pub fn stop(&self) {
        if let Some(timer) = lock(&self.timer).take() {
            debug!(task = timer.name(), "activity tracker stopped");
            timer.cancel();
        }

        *lock(&self.last_activity) = None;
        if let Err(e) = self.ctx.sessions.clear_last_activity() {
            warn!(error = %e, "failed to clear last activity");
        }
    }
}
