use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::debug;

use crate::state::Action;

/// Background task that asks for a listing refresh every `period`.
///
/// Lives exactly as long as the handle: dropping it aborts the task.
pub struct RefreshTimer {
    handle: JoinHandle<()>,
}

impl RefreshTimer {
    pub fn start(period: Duration, tx: UnboundedSender<Action>) -> Self {
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // first tick fires immediately; the initial load comes from mount
            ticker.tick().await;
            loop {
                ticker.tick().await;
                if tx.send(Action::RefreshRequested).is_err() {
                    break;
                }
            }
        });
        debug!(?period, "refresh timer started");
        Self { handle }
    }
}

impl Drop for RefreshTimer {
    fn drop(&mut self) {
        self.handle.abort();
        debug!("refresh timer stopped");
    }
}
