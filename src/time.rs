//! Injectable time sources.
//!
//! Cooldown arithmetic is pure in a caller-supplied `now_ms`, so the clock
//! is a capability: [`SystemClock`] in production, [`ManualClock`] in tests
//! where time must advance deterministically without waiting.

use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

/// Current Unix timestamp in milliseconds.
///
/// Returns 0 if system time is before the Unix epoch rather than panicking.
#[inline]
pub fn current_time_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Injectable clock.
pub trait Clock: Send + Sync {
    /// Current Unix timestamp in milliseconds.
    fn now_unix_ms(&self) -> u64;
}

impl<T: Clock + ?Sized> Clock for Arc<T> {
    #[inline]
    fn now_unix_ms(&self) -> u64 {
        (**self).now_unix_ms()
    }
}

/// Production clock backed by the system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    #[inline]
    fn now_unix_ms(&self) -> u64 {
        current_time_ms()
    }
}

/// Manually advanced clock for deterministic tests.
///
/// Clones share the underlying instant, so a test can hold one handle and
/// advance time under a component holding another.
#[derive(Debug, Clone)]
pub struct ManualClock {
    current_ms: Arc<AtomicU64>,
}

impl ManualClock {
    /// Create a clock frozen at `initial_ms`.
    pub fn new(initial_ms: u64) -> Self {
        Self {
            current_ms: Arc::new(AtomicU64::new(initial_ms)),
        }
    }

    /// Advance the clock by `delta_ms`.
    pub fn advance_ms(&self, delta_ms: u64) {
        self.current_ms.fetch_add(delta_ms, Ordering::SeqCst);
    }

    /// Jump the clock to `now_ms`.
    pub fn set_ms(&self, now_ms: u64) {
        self.current_ms.store(now_ms, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    #[inline]
    fn now_unix_ms(&self) -> u64 {
        self.current_ms.load(Ordering::SeqCst)
    }
}
