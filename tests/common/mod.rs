//! Shared integration test helpers for langbase.
//!
//! Include with `mod common;` at the top of a test file. The
//! `#[allow(dead_code)]` attribute suppresses warnings when only a subset
//! of helpers is used per file.

#![allow(dead_code)]

use langbase::Config;
use langbase::shutdown::ProcessHost;
use parking_lot::Mutex;
use std::fs;
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;
use tempfile::TempDir;

/// Writes `yaml` to a config file inside a fresh temp dir.
///
/// The `TempDir` must be kept alive until all config I/O has completed.
pub fn write_config(yaml: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("config.yaml");
    fs::write(&path, yaml).expect("Failed to write config");
    (temp_dir, path)
}

/// Host whose halt records the status, signals the test, and then parks
/// the calling thread forever in place of ending the process.
pub struct RecordingHost {
    pub halts: Mutex<Vec<i32>>,
    halted: Mutex<mpsc::Sender<i32>>,
}

impl RecordingHost {
    pub fn new() -> (Self, mpsc::Receiver<i32>) {
        let (tx, rx) = mpsc::channel();
        let host = Self {
            halts: Mutex::new(Vec::new()),
            halted: Mutex::new(tx),
        };
        (host, rx)
    }
}

impl ProcessHost for RecordingHost {
    fn halt(&self, status: i32) -> ! {
        self.halts.lock().push(status);
        let _ = self.halted.lock().send(status);
        loop {
            thread::park();
        }
    }
}

/// Config with every field at its default.
pub fn default_config() -> Config {
    Config::default()
}
