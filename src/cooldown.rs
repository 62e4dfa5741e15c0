//! Cooldown countdown publishing.

use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::debug;
use tracing::warn;

use crate::limiter::ClaimLimiter;
use crate::store::DurableKeyValueStore;
use crate::time::Clock;

/// Handle to a running cooldown countdown.
///
/// Each tick re-derives the remainder from the stored absolute deadline,
/// so the published value cannot drift however irregularly ticks land.
/// When the remainder reaches zero the persisted window is cleared eagerly
/// (stale state would otherwise linger until the next load) and the task
/// stops; no timer outlives the cooldown. Dropping the handle aborts the
/// task.
///
/// The receiver holds `u64::MAX` until the first recomputation lands.
pub struct CooldownWatch {
    rx: watch::Receiver<u64>,
    task: JoinHandle<()>,
}

impl CooldownWatch {
    /// Latest published remainder in milliseconds.
    pub fn remaining_ms(&self) -> u64 {
        *self.rx.borrow()
    }

    /// Subscribe to remainder updates.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.rx.clone()
    }

    /// Whether the countdown task has stopped.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for CooldownWatch {
    fn drop(&mut self) {
        self.task.abort();
    }
}

impl<S: DurableKeyValueStore + ?Sized + 'static> ClaimLimiter<S> {
    /// Spawn a countdown for `address`, recomputing every `tick`.
    ///
    /// Publishes the current remainder immediately and then once per tick.
    /// Must be called inside a tokio runtime.
    pub fn watch_cooldown<C>(&self, address: impl Into<String>, clock: C, tick: Duration) -> CooldownWatch
    where
        C: Clock + 'static,
    {
        let limiter = self.clone();
        let address = address.into();
        let (tx, rx) = watch::channel(u64::MAX);

        let task = tokio::spawn(async move {
            loop {
                let now_ms = clock.now_unix_ms();
                // load_window clears an elapsed cooldown as a side effect.
                let window = match limiter.load_window(&address, now_ms).await {
                    Ok(window) => window,
                    Err(error) => {
                        warn!(address = %address, error = %error, "cooldown watch failed to load window");
                        break;
                    }
                };

                let remaining_ms = window.remaining_cooldown_ms(now_ms);
                if tx.send(remaining_ms).is_err() {
                    // All receivers gone; nothing left to publish.
                    break;
                }
                if remaining_ms == 0 {
                    debug!(address = %address, "cooldown finished, countdown stopped");
                    break;
                }

                tokio::time::sleep(tick).await;
            }
        });

        CooldownWatch { rx, task }
    }
}
