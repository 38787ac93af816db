//! Delayed bot replies
//!
//! Each ordinary turn spawns one task that sleeps for the reply delay and then
//! posts `AppEvent::Reply` back to the event loop. The reply text is fixed when
//! the turn is sent. The loop owns all state, so the task never touches the
//! transcript itself.

use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;

use crate::tui::AppEvent;

pub const DEFAULT_REPLY_DELAY: Duration = Duration::from_millis(1000);

pub struct ReplyScheduler {
    delay: Duration,
    tx: UnboundedSender<AppEvent>,
    pending: Vec<JoinHandle<()>>,
}

impl ReplyScheduler {
    pub fn new(tx: UnboundedSender<AppEvent>, delay: Duration) -> Self {
        Self {
            delay,
            tx,
            pending: Vec::new(),
        }
    }

    /// Spawn a task that posts `reply` after the delay. Replies are
    /// independent of one another; several can be in flight at once.
    pub fn schedule(&mut self, reply: &'static str) {
        self.prune();

        let tx = self.tx.clone();
        let delay = self.delay;
        self.pending.push(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if tx.send(AppEvent::Reply(reply)).is_err() {
                tracing::debug!("event loop gone, dropping reply");
            }
        }));

        tracing::debug!(
            delay_ms = delay.as_millis() as u64,
            pending = self.pending.len(),
            "scheduled bot reply"
        );
    }

    /// Number of replies that have not fired yet
    pub fn pending_count(&self) -> usize {
        self.pending.iter().filter(|h| !h.is_finished()).count()
    }

    pub fn has_pending(&self) -> bool {
        self.pending_count() > 0
    }

    /// Abort every reply that has not fired yet
    pub fn cancel_all(&mut self) {
        let cancelled = self.pending_count();
        for handle in self.pending.drain(..) {
            handle.abort();
        }
        if cancelled > 0 {
            tracing::debug!(cancelled, "cancelled pending replies");
        }
    }

    /// Forget handles of tasks that already completed
    pub fn prune(&mut self) {
        self.pending.retain(|h| !h.is_finished());
    }
}

impl Drop for ReplyScheduler {
    fn drop(&mut self) {
        self.cancel_all();
    }
}
