//! End-to-end behaviour of the runtime facade.

mod common;

use common::{RecordingHost, default_config, write_config};
use langbase::casing::Locale;
use langbase::shutdown::{ShutdownError, ShutdownState};
use langbase::{Config, Runtime};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::Duration;

// ----------------------------------------------------------------------------
// Names and casing
// ----------------------------------------------------------------------------

#[test]
fn test_names_through_runtime() {
    let (host, _halted) = RecordingHost::new();
    let runtime = Runtime::with_host(&default_config(), host).expect("runtime");
    assert!(!runtime.names_cache().is_loaded());
    assert_eq!(
        runtime.name_of(0x1F600).expect("names").as_deref(),
        Some("GRINNING FACE")
    );
    assert!(runtime.names_cache().is_loaded());
    assert_eq!(runtime.code_point_of("  grinning face ").expect("names"), Some(0x1F600));
    assert_eq!(
        runtime.name_of(0xAC00).expect("names").as_deref(),
        Some("HANGUL SYLLABLE GA")
    );
}

#[test]
fn test_missing_names_resource_is_reported() {
    let (_temp_dir, path) = write_config("names_resource: /nonexistent/names.dat\n");
    let config = Config::load_from(&path).expect("load");
    let (host, _halted) = RecordingHost::new();
    let runtime = Runtime::with_host(&config, host).expect("runtime");
    let err = runtime.name_of(0x41).expect_err("missing resource");
    assert!(format!("{err:#}").contains("/nonexistent/names.dat"));
}

#[test]
fn test_default_locale_from_config() {
    let (_temp_dir, path) = write_config("default_locale: tr\n");
    let config = Config::load_from(&path).expect("load");
    let (host, _halted) = RecordingHost::new();
    let runtime = Runtime::with_host(&config, host).expect("runtime");
    assert_eq!(runtime.to_uppercase("i", None), "\u{0130}");
    assert_eq!(runtime.to_uppercase("i", Some(&Locale::ROOT)), "I");
    assert_eq!(runtime.to_lowercase("I", None), "\u{0131}");
}

// ----------------------------------------------------------------------------
// Exit
// ----------------------------------------------------------------------------

#[test]
fn test_exit_runs_application_hooks_and_deletes_files() {
    let temp_dir = tempfile::tempdir().expect("tempdir");
    let scratch = temp_dir.path().join("scratch.tmp");
    std::fs::write(&scratch, b"x").expect("write");

    let (host, halted) = RecordingHost::new();
    let runtime = Arc::new(Runtime::with_host(&default_config(), host).expect("runtime"));
    let ran = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&ran);
    runtime
        .add_shutdown_hook("count", move || {
            counter.fetch_add(1, Ordering::SeqCst);
        })
        .expect("add hook");
    let removed = runtime.add_shutdown_hook("removed", || {}).expect("add hook");
    assert_eq!(runtime.remove_shutdown_hook(removed), Ok(true));
    runtime.delete_on_exit(&scratch).expect("delete on exit");

    let exiting = Arc::clone(&runtime);
    thread::spawn(move || {
        let _ = exiting.exit(4);
    });

    assert_eq!(halted.recv_timeout(Duration::from_secs(10)), Ok(4));
    assert_eq!(ran.load(Ordering::SeqCst), 1);
    assert!(!scratch.exists());
    assert_eq!(runtime.shutdown().state(), ShutdownState::Completed);
    assert_eq!(
        runtime.add_shutdown_hook("late", || {}),
        Err(ShutdownError::ShutdownInProgress)
    );
}

#[test]
fn test_builtin_slots_are_taken() {
    let (host, _halted) = RecordingHost::new();
    let runtime = Runtime::with_host(&default_config(), host).expect("runtime");
    assert!(matches!(
        runtime.shutdown().register_hook(1, false, || Ok(())),
        Err(ShutdownError::SlotOccupied { slot: 1, .. })
    ));
    assert!(matches!(
        runtime.shutdown().register_hook(2, false, || Ok(())),
        Err(ShutdownError::SlotOccupied { slot: 2, .. })
    ));
    assert_eq!(runtime.shutdown().register_hook(0, false, || Ok(())), Ok(()));
}
