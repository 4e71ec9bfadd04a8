use std::future::Future;
use std::ops::ControlFlow;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::debug;

/// Dispose handle for a periodic background task.
///
/// Cancelling (or dropping) the handle signals the task, which exits before
/// its next tick. A tick that is already running is allowed to finish, so a
/// task may cancel itself from inside its own tick.
#[derive(Debug)]
pub struct TaskHandle {
    name: &'static str,
    shutdown: watch::Sender<bool>,
    join: JoinHandle<()>,
}

impl TaskHandle {
    /// Runs `tick` every `period` until cancelled or until `tick` breaks.
    /// With `immediate` the first tick runs right away, otherwise after one
    /// full period.
    pub fn spawn_periodic<F, Fut>(name: &'static str, period: Duration, immediate: bool, mut tick: F) -> Self
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ControlFlow<()>> + Send + 'static,
    {
        let (shutdown, mut cancelled) = watch::channel(false);

        let join = tokio::spawn(async move {
            let start = if immediate { Instant::now() } else { Instant::now() + period };
            let mut ticker = tokio::time::interval_at(start, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    biased;
                    _ = cancelled.changed() => break,
                    _ = ticker.tick() => {
                        if tick().await.is_break() {
                            break;
                        }
                    }
                }
            }

            debug!(task = name, "periodic task finished");
        });

        debug!(task = name, period_ms = period.as_millis() as u64, "periodic task started");
        Self { name, shutdown, join }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }

    pub fn cancel(self) {
        drop(self);
    }
}

impl Drop for TaskHandle {
    fn drop(&mut self) {
        // Err only means the task is already gone.
        let _ = self.shutdown.send(true);
    }
}
