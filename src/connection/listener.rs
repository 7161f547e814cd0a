use crate::error::ErrorCode;
use crate::stage::ConnectionStage;

/// Callbacks reporting connection lifecycle progress to the caller.
///
/// All methods default to no-ops, so listeners only implement the events
/// they care about. Stage callbacks and `connection_started` fire
/// synchronously on the thread running `start()`; `connection_terminated` is
/// delivered asynchronously, at most once per attempt, and never after an
/// explicit stop or interrupt (see
/// [`TerminationNotifier`](crate::connection::termination::TerminationNotifier)).
pub trait ConnectionListener: Send + Sync {
    /// A setup stage is about to run.
    fn stage_starting(&self, stage: ConnectionStage) {
        let _ = stage;
    }

    /// A setup stage finished successfully.
    fn stage_complete(&self, stage: ConnectionStage) {
        let _ = stage;
    }

    /// A setup stage failed; full teardown follows immediately.
    fn stage_failed(&self, stage: ConnectionStage, code: ErrorCode) {
        let _ = (stage, code);
    }

    /// Every stage completed and the session is live.
    fn connection_started(&self) {}

    /// An established connection has ended.
    fn connection_terminated(&self, code: ErrorCode) {
        let _ = code;
    }
}
