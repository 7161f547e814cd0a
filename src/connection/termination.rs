use crate::connection::listener::ConnectionListener;
use crate::error::ErrorCode;
use crate::interrupt::InterruptSignal;
use crate::stage::ConnectionStage;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

/// Decorator around the caller's listener that owns delivery of the
/// `connection_terminated` event.
///
/// Internal stream workers report termination directly and concurrently, so
/// raw signals are deduplicated here: the first reporter wins, later ones
/// and anything after an explicit stop or interrupt are ignored. Delivery
/// happens on a short-lived detached thread because the callback may itself
/// call `stop()`, which would deadlock if it ran on a worker thread that
/// teardown needs to join.
pub struct TerminationNotifier {
    inner: Arc<dyn ConnectionListener>,
    interrupt: InterruptSignal,
    already_terminated: AtomicBool,
}

impl TerminationNotifier {
    pub fn new(inner: Arc<dyn ConnectionListener>, interrupt: InterruptSignal) -> Self {
        Self {
            inner,
            interrupt,
            already_terminated: AtomicBool::new(false),
        }
    }

    /// Re-arms the notifier at the start of a new connection attempt.
    pub(crate) fn reset(&self) {
        self.already_terminated.store(false, Ordering::Release);
    }

    /// Suppresses any future termination notification for this attempt.
    /// Called by `stop()` before teardown begins.
    pub(crate) fn disable(&self) {
        self.already_terminated.store(true, Ordering::Release);
    }
}

impl ConnectionListener for TerminationNotifier {
    fn stage_starting(&self, stage: ConnectionStage) {
        self.inner.stage_starting(stage);
    }

    fn stage_complete(&self, stage: ConnectionStage) {
        self.inner.stage_complete(stage);
    }

    fn stage_failed(&self, stage: ConnectionStage, code: ErrorCode) {
        self.inner.stage_failed(stage, code);
    }

    fn connection_started(&self) {
        self.inner.connection_started();
    }

    fn connection_terminated(&self, code: ErrorCode) {
        // Avoid recursion and issuing multiple callbacks
        if self.interrupt.is_raised() {
            return;
        }
        if self.already_terminated.swap(true, Ordering::AcqRel) {
            return;
        }

        let inner = Arc::clone(&self.inner);
        let spawned = thread::Builder::new()
            .name("async-term".to_owned())
            .spawn(move || {
                inner.connection_terminated(code);
            });

        match spawned {
            // Never joined: the callback is allowed to call stop().
            Ok(handle) => drop(handle),
            Err(e) => {
                // Nothing we can safely do here, so the notification is
                // dropped in release builds.
                log::error!("Failed to create termination thread: {e}");
                debug_assert!(false, "failed to create termination thread: {e}");
            }
        }
    }
}
