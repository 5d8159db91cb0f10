use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::trace;

use quiz_core::model::TimerKey;

/// Drives the per-question countdown.
///
/// At most one ticking task exists. Each tick carries the key it was started
/// for, so a tick that was already queued when the key changed is rejected by
/// the session instead of counting against the next question.
#[derive(Debug)]
pub struct Countdown {
    period: Duration,
    tx: mpsc::UnboundedSender<TimerKey>,
    active: Option<(TimerKey, JoinHandle<()>)>,
}

impl Countdown {
    /// A countdown that ticks once per second.
    #[must_use]
    pub fn every_second() -> (Self, mpsc::UnboundedReceiver<TimerKey>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let countdown = Self {
            period: Duration::from_secs(1),
            tx,
            active: None,
        };
        (countdown, rx)
    }

    #[must_use]
    pub fn active_key(&self) -> Option<TimerKey> {
        self.active.as_ref().map(|(key, _)| *key)
    }

    /// Make the running task match `desired`.
    ///
    /// Restarts from a full period when the key changes, stops when it is
    /// `None`, and leaves a matching task alone. Returns true if anything
    /// changed.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime when a task must be spawned.
    pub fn sync(&mut self, desired: Option<TimerKey>) -> bool {
        if self.active_key() == desired {
            return false;
        }
        self.cancel();
        if let Some(key) = desired {
            trace!(index = key.index(), "countdown started");
            let handle = tokio::spawn(run(key, self.period, self.tx.clone()));
            self.active = Some((key, handle));
        }
        true
    }

    pub fn cancel(&mut self) {
        if let Some((key, handle)) = self.active.take() {
            trace!(index = key.index(), "countdown cancelled");
            handle.abort();
        }
    }
}

impl Drop for Countdown {
    fn drop(&mut self) {
        self.cancel();
    }
}

async fn run(key: TimerKey, period: Duration, tx: mpsc::UnboundedSender<TimerKey>) {
    let mut interval = tokio::time::interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        interval.tick().await;
        if tx.send(key).is_err() {
            break;
        }
    }
}
