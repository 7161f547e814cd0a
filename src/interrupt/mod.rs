
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

/// The maximum amount of time before observing an interrupt in
/// [`InterruptSignal::sleep_interruptible`].
const INTERRUPT_PERIOD: Duration = Duration::from_millis(50);

/// Cross-thread cancellation flag for a pending connection attempt.
///
/// Cloned handles share the same flag. [`raise`](Self::raise) is
/// fire-and-forget: it never blocks and does not synchronize with the
/// in-flight attempt, so callers must not start a new attempt until the
/// interrupted `start()` call has returned. Blocking collaborators poll
/// [`is_raised`](Self::is_raised) so cancellation is observed within a
/// bounded delay.
#[derive(Debug, Clone, Default)]
pub struct InterruptSignal {
    raised: Arc<AtomicBool>,
}

impl InterruptSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests early abort of the in-flight attempt. Safe to call from any
    /// thread at any time.
    pub fn raise(&self) {
        self.raised.store(true, Ordering::Release);
    }

    pub fn is_raised(&self) -> bool {
        self.raised.load(Ordering::Acquire)
    }

    /// Re-arms the signal at the start of a new attempt.
    pub(crate) fn clear(&self) {
        self.raised.store(false, Ordering::Release);
    }

    /// Sleeps for `duration`, waking early if the signal is raised. Returns
    /// true if the sleep was interrupted.
    pub fn sleep_interruptible(&self, duration: Duration) -> bool {
        let deadline = Instant::now() + duration;
        loop {
            if self.is_raised() {
                return true;
            }
            let now = Instant::now();
            if now >= deadline {
                return false;
            }
            std::thread::sleep((deadline - now).min(INTERRUPT_PERIOD));
        }
    }
}
