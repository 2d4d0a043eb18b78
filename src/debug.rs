//! Logging bridge for the langbase binary.
//!
//! Routes every `log::info!()` etc. from the workspace crates to stderr as
//! `[timestamp] [LEVEL] [target] message`. The level comes from the
//! `--log-level` flag, then `RUST_LOG`, then the config file. The config is
//! read after logging starts, so its level is applied separately via
//! [`apply_config_level`] and only when nothing else pinned the level.

use parking_lot::Mutex;
use std::io::{self, Write};
use std::str::FromStr;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Level used until the config is applied.
const DEFAULT_LEVEL: log::LevelFilter = log::LevelFilter::Warn;

/// Set when the level came from the command line or `RUST_LOG`.
static LEVEL_PINNED: AtomicBool = AtomicBool::new(false);

static BRIDGE: OnceLock<LogBridge> = OnceLock::new();

struct LogBridge {
    sink: Mutex<Box<dyn Write + Send>>,
}

impl log::Log for LogBridge {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &log::Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = format_record(
            &get_timestamp(),
            record.level(),
            record.target(),
            &record.args().to_string(),
        );
        let mut sink = self.sink.lock();
        let _ = sink.write_all(line.as_bytes());
    }

    fn flush(&self) {
        let _ = self.sink.lock().flush();
    }
}

fn get_timestamp() -> String {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    format!("{}.{:06}", now.as_secs(), now.subsec_micros())
}

fn format_record(timestamp: &str, level: log::Level, target: &str, msg: &str) -> String {
    format!("[{}] [{:<5}] [{}] {}\n", timestamp, level, target, msg)
}

/// The level to start with, and whether it overrides the config file.
fn resolve_level(cli: Option<log::LevelFilter>, env: Option<&str>) -> (log::LevelFilter, bool) {
    if let Some(level) = cli {
        return (level, true);
    }
    match env.map(|v| log::LevelFilter::from_str(v.trim())) {
        Some(Ok(level)) => (level, true),
        _ => (DEFAULT_LEVEL, false),
    }
}

/// Install the stderr log bridge. Later calls only adjust the level.
pub fn init_log_bridge(cli_level: Option<log::LevelFilter>) {
    let env = std::env::var("RUST_LOG").ok();
    let (level, pinned) = resolve_level(cli_level, env.as_deref());
    LEVEL_PINNED.store(pinned, Ordering::Relaxed);

    let bridge = BRIDGE.get_or_init(|| LogBridge {
        sink: Mutex::new(Box::new(io::stderr())),
    });
    // Fails only if another logger was installed first; keep that one.
    let _ = log::set_logger(bridge);
    log::set_max_level(level);
}

/// Apply the config file's level unless the CLI or `RUST_LOG` chose one.
pub fn apply_config_level(level: log::LevelFilter) {
    if !LEVEL_PINNED.load(Ordering::Relaxed) {
        log::set_max_level(level);
    }
}
