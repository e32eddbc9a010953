//! Live reminder count for the navigation badge
//!
//! The count is recomputed whenever the user's reminder key changes in
//! storage. A slow poll runs alongside to recover from dropped change
//! events and to pick up writes made through another `Storage` handle over
//! the same backend. The on-disk store is held by one process at a time, so
//! other processes cannot write to it while the badge is running.

use super::ReminderStore;
use std::time::Duration;
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

/// Background task publishing the number of reminders
///
/// Dropping the badge stops the task.
#[derive(Debug)]
pub struct ReminderBadge {
    count: watch::Receiver<usize>,
    token: CancellationToken,
    handle: Option<JoinHandle<()>>,
}

impl ReminderBadge {
    /// Start tracking the reminders in `store`
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn(store: ReminderStore, poll_interval: Duration) -> Self {
        let initial = read_count(&store).unwrap_or(0);
        let (tx, count) = watch::channel(initial);
        let token = CancellationToken::new();

        let task_token = token.clone();
        let handle = tokio::spawn(async move {
            let mut changes = store.subscribe();
            let mut ticker = tokio::time::interval(poll_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    biased;

                    _ = task_token.cancelled() => break,

                    change = changes.recv() => match change {
                        Ok(change) if change.key == store.key() => refresh(&store, &tx),
                        Ok(_) => {}
                        Err(RecvError::Lagged(skipped)) => {
                            tracing::debug!("Reminder badge skipped {} change(s)", skipped);
                            refresh(&store, &tx);
                        }
                        Err(RecvError::Closed) => break,
                    },

                    _ = ticker.tick() => refresh(&store, &tx),
                }
            }
            tracing::debug!("Reminder badge stopped");
        });

        Self {
            count,
            token,
            handle: Some(handle),
        }
    }

    /// Current reminder count
    pub fn count(&self) -> usize {
        *self.count.borrow()
    }

    /// A receiver that is notified whenever the count changes
    pub fn watch(&self) -> watch::Receiver<usize> {
        self.count.clone()
    }

    /// Stop the task and wait for it to finish
    pub async fn shutdown(mut self) {
        self.token.cancel();
        if let Some(handle) = self.handle.take() {
            if let Err(e) = handle.await {
                tracing::warn!("Reminder badge task failed: {}", e);
            }
        }
    }
}

impl Drop for ReminderBadge {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

fn read_count(store: &ReminderStore) -> Option<usize> {
    match store.count() {
        Ok(count) => Some(count),
        Err(e) => {
            tracing::warn!("Failed to count reminders: {}", e);
            None
        }
    }
}

fn refresh(store: &ReminderStore, tx: &watch::Sender<usize>) {
    if let Some(count) = read_count(store) {
        tx.send_if_modified(|current| {
            if *current == count {
                false
            } else {
                *current = count;
                true
            }
        });
    }
}
