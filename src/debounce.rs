//! Trailing-edge call coalescing.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Coalesces bursts of calls into one trailing execution.
///
/// Every [`call`](Self::call) re-arms the timer; once `delay` elapses with
/// no newer call, the action runs exactly once with the latest value. This
/// is trailing debounce, not throttling: there is no leading-edge or
/// periodic execution. Dropping the debouncer cancels any pending
/// execution.
///
/// Must be created inside a tokio runtime; the timer lives on a spawned
/// task.
pub struct Debouncer<T: Send + 'static> {
    tx: mpsc::UnboundedSender<T>,
    task: JoinHandle<()>,
}

impl<T: Send + 'static> Debouncer<T> {
    /// Wrap `action` with a trailing-edge debounce of `delay`.
    pub fn new<F>(delay: Duration, mut action: F) -> Self
    where
        F: FnMut(T) + Send + 'static,
    {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(async move {
            let mut pending: Option<T> = None;
            loop {
                match pending.take() {
                    None => match rx.recv().await {
                        Some(value) => pending = Some(value),
                        None => break,
                    },
                    Some(value) => {
                        let deadline = tokio::time::sleep(delay);
                        tokio::pin!(deadline);
                        tokio::select! {
                            _ = &mut deadline => action(value),
                            next = rx.recv() => match next {
                                // A newer call replaces the value and re-arms.
                                Some(newer) => pending = Some(newer),
                                None => break,
                            },
                        }
                    }
                }
            }
        });
        Self { tx, task }
    }

    /// Wrap `action` with the delay given in milliseconds.
    pub fn wrap<F>(action: F, delay_ms: u64) -> Self
    where
        F: FnMut(T) + Send + 'static,
    {
        Self::new(Duration::from_millis(delay_ms), action)
    }

    /// Record an invocation carrying `value`, re-arming the timer.
    pub fn call(&self, value: T) {
        // Send only fails once the task is gone; nothing to coalesce then.
        let _ = self.tx.send(value);
    }
}

impl<T: Send + 'static> Drop for Debouncer<T> {
    fn drop(&mut self) {
        // A pending execution must not fire after the wrapper is gone.
        self.task.abort();
    }
}
