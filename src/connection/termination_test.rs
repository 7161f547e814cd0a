use super::listener::ConnectionListener;
use super::termination::TerminationNotifier;
use crate::error::ErrorCode;
use crate::interrupt::InterruptSignal;
use crate::stage::ConnectionStage;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

#[derive(Default)]
struct Recorder {
    terminations: Mutex<Vec<ErrorCode>>,
    stages: Mutex<Vec<String>>,
}

impl ConnectionListener for Recorder {
    fn stage_starting(&self, stage: ConnectionStage) {
        self.stages.lock().unwrap().push(format!("starting:{stage}"));
    }

    fn stage_complete(&self, stage: ConnectionStage) {
        self.stages.lock().unwrap().push(format!("complete:{stage}"));
    }

    fn connection_terminated(&self, code: ErrorCode) {
        self.terminations.lock().unwrap().push(code);
    }
}

fn wait_for_terminations(recorder: &Recorder, n: usize) -> Vec<ErrorCode> {
    let deadline = Instant::now() + Duration::from_secs(2);
    while Instant::now() < deadline {
        let seen = recorder.terminations.lock().unwrap().clone();
        if seen.len() >= n {
            return seen;
        }
        thread::sleep(Duration::from_millis(10));
    }
    recorder.terminations.lock().unwrap().clone()
}

/// Gives any stray detached delivery thread a chance to run.
fn settle() {
    thread::sleep(Duration::from_millis(200));
}

#[test]
fn test_termination_delivered_asynchronously() {
    let recorder = Arc::new(Recorder::default());
    let notifier = TerminationNotifier::new(recorder.clone(), InterruptSignal::new());

    notifier.connection_terminated(42);

    assert_eq!(wait_for_terminations(&recorder, 1), vec![42]);
}

#[test]
fn test_termination_at_most_once_under_race() {
    let recorder = Arc::new(Recorder::default());
    let notifier = Arc::new(TerminationNotifier::new(
        recorder.clone(),
        InterruptSignal::new(),
    ));

    let mut reporters = Vec::new();
    for code in [7, 8] {
        let notifier = notifier.clone();
        reporters.push(thread::spawn(move || {
            notifier.connection_terminated(code);
        }));
    }
    for reporter in reporters {
        reporter.join().unwrap();
    }

    let seen = wait_for_terminations(&recorder, 1);
    settle();
    let seen_after = recorder.terminations.lock().unwrap().clone();
    assert_eq!(seen.len(), 1, "exactly one reporter must win: {seen:?}");
    assert_eq!(seen, seen_after);
    assert!(seen[0] == 7 || seen[0] == 8);
}

#[test]
fn test_termination_suppressed_after_disable() {
    let recorder = Arc::new(Recorder::default());
    let notifier = TerminationNotifier::new(recorder.clone(), InterruptSignal::new());

    notifier.disable();
    notifier.connection_terminated(5);

    settle();
    assert!(recorder.terminations.lock().unwrap().is_empty());
}

#[test]
fn test_termination_suppressed_after_interrupt() {
    let recorder = Arc::new(Recorder::default());
    let interrupt = InterruptSignal::new();
    let notifier = TerminationNotifier::new(recorder.clone(), interrupt.clone());

    interrupt.raise();
    notifier.connection_terminated(5);

    settle();
    assert!(recorder.terminations.lock().unwrap().is_empty());
}

#[test]
fn test_reset_rearms_delivery_for_next_attempt() {
    let recorder = Arc::new(Recorder::default());
    let notifier = TerminationNotifier::new(recorder.clone(), InterruptSignal::new());

    notifier.disable();
    notifier.connection_terminated(1);
    notifier.reset();
    notifier.connection_terminated(2);

    assert_eq!(wait_for_terminations(&recorder, 1), vec![2]);
}

#[test]
fn test_stage_callbacks_delegate_synchronously() {
    let recorder = Arc::new(Recorder::default());
    let notifier = TerminationNotifier::new(recorder.clone(), InterruptSignal::new());

    notifier.stage_starting(ConnectionStage::PlatformInit);
    notifier.stage_complete(ConnectionStage::PlatformInit);

    assert_eq!(
        *recorder.stages.lock().unwrap(),
        vec![
            "starting:platform initialization".to_owned(),
            "complete:platform initialization".to_owned(),
        ]
    );
}
