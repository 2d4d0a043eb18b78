//! Process termination through a recording host.
//!
//! The host's halt records the status and then parks the calling thread
//! forever, standing in for a process that never returns from exit.

use langbase_shutdown::{
    ApplicationHooks, HookError, ProcessHost, ShutdownSequencer, ShutdownState,
};
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

struct RecordingHost {
    before_halt: AtomicUsize,
    halts: Mutex<Vec<i32>>,
    halted: Mutex<mpsc::Sender<i32>>,
}

impl RecordingHost {
    fn new() -> (Self, mpsc::Receiver<i32>) {
        let (tx, rx) = mpsc::channel();
        let host = Self {
            before_halt: AtomicUsize::new(0),
            halts: Mutex::new(Vec::new()),
            halted: Mutex::new(tx),
        };
        (host, rx)
    }
}

impl ProcessHost for RecordingHost {
    fn before_halt(&self) {
        self.before_halt.fetch_add(1, Ordering::SeqCst);
    }

    fn halt(&self, status: i32) -> ! {
        self.halts.lock().push(status);
        let _ = self.halted.lock().send(status);
        loop {
            thread::park();
        }
    }
}

fn counting_sequencer() -> (
    Arc<ShutdownSequencer<RecordingHost>>,
    Arc<AtomicUsize>,
    mpsc::Receiver<i32>,
) {
    let (host, halted) = RecordingHost::new();
    let seq = Arc::new(ShutdownSequencer::new(host));
    let runs = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&runs);
    seq.register_hook(0, false, move || {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(())
    })
    .expect("register");
    (seq, runs, halted)
}

// ----------------------------------------------------------------------------
// Single terminator
// ----------------------------------------------------------------------------

#[test]
fn test_terminate_runs_hooks_then_halts() {
    let (seq, runs, halted) = counting_sequencer();
    let terminator = Arc::clone(&seq);
    thread::spawn(move || {
        let _ = terminator.terminate_process(3);
    });

    assert_eq!(halted.recv_timeout(Duration::from_secs(10)), Ok(3));
    assert_eq!(runs.load(Ordering::SeqCst), 1);
    assert_eq!(seq.host().before_halt.load(Ordering::SeqCst), 1);
    assert_eq!(*seq.host().halts.lock(), vec![3]);
    assert!(seq.is_shutdown());
}

#[test]
fn test_fatal_hook_returns_to_caller() {
    let (host, halted) = RecordingHost::new();
    let seq = ShutdownSequencer::new(host);
    seq.register_hook(2, false, || Err(HookError::Fatal("killed".into())))
        .expect("register");

    let result = seq.terminate_process(0);
    assert!(matches!(result, Err(HookError::Fatal(ref reason)) if reason == "killed"));
    assert!(halted.try_recv().is_err());
    assert!(matches!(seq.state(), ShutdownState::Running(slot) if slot.index() == 2));
}

#[test]
fn test_nonzero_exit_after_completion_halts_immediately() {
    let (seq, runs, halted) = counting_sequencer();
    seq.run_all().expect("run");
    assert_eq!(runs.load(Ordering::SeqCst), 1);

    let terminator = Arc::clone(&seq);
    thread::spawn(move || {
        let _ = terminator.terminate_process(70);
    });
    assert_eq!(halted.recv_timeout(Duration::from_secs(10)), Ok(70));
    assert_eq!(runs.load(Ordering::SeqCst), 1);
    // The fast path skips the before-halt notification.
    assert_eq!(seq.host().before_halt.load(Ordering::SeqCst), 0);
}

// ----------------------------------------------------------------------------
// Concurrent terminators
// ----------------------------------------------------------------------------

#[test]
fn test_concurrent_terminate_runs_once_and_halts_once() {
    let (seq, runs, halted) = counting_sequencer();
    let app_hooks = ApplicationHooks::install(&seq).expect("install");
    let app_runs = Arc::new(AtomicUsize::new(0));
    let app_counter = Arc::clone(&app_runs);
    app_hooks
        .add("app", move || {
            app_counter.fetch_add(1, Ordering::SeqCst);
        })
        .expect("add");

    for status in [1, 2] {
        let terminator = Arc::clone(&seq);
        thread::spawn(move || {
            let _ = terminator.terminate_process(status);
        });
    }

    let status = halted.recv_timeout(Duration::from_secs(10)).expect("first halt");
    assert!(status == 1 || status == 2);

    // The loser stays blocked behind the winner, which never returns.
    thread::sleep(Duration::from_millis(200));
    assert!(halted.try_recv().is_err());
    assert_eq!(*seq.host().halts.lock(), vec![status]);
    assert_eq!(runs.load(Ordering::SeqCst), 1);
    assert_eq!(app_runs.load(Ordering::SeqCst), 1);
}

#[test]
fn test_halt_skips_hooks() {
    let (seq, runs, halted) = counting_sequencer();
    let halter = Arc::clone(&seq);
    thread::spawn(move || {
        halter.halt(9);
    });
    assert_eq!(halted.recv_timeout(Duration::from_secs(10)), Ok(9));
    assert_eq!(runs.load(Ordering::SeqCst), 0);
    assert_eq!(seq.state(), ShutdownState::NotStarted);
}
