//! Typed error types for langbase-shutdown.

use crate::slot::MAX_SYSTEM_HOOKS;
use thiserror::Error;

/// Misuse of the registration API. Callers are not expected to retry.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ShutdownError {
    /// The slot index is outside `0..MAX_SYSTEM_HOOKS`.
    #[error("hook slot {index} is out of range (0..{max})", max = MAX_SYSTEM_HOOKS)]
    InvalidSlot { index: usize },

    /// A hook already occupies the slot.
    #[error("hook slot {slot} is already taken by '{name}'")]
    SlotOccupied {
        /// Index of the contested slot.
        slot: usize,
        /// Name of the hook registered first.
        name: String,
    },

    /// Shutdown has started (or finished) and this registration is too late.
    #[error("shutdown in progress")]
    ShutdownInProgress,
}

/// Failure reported by a hook while shutdown runs.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HookError {
    /// Logged and suppressed; later slots still run.
    #[error("shutdown hook failed: {0}")]
    Failed(String),

    /// Aborts the remaining hooks and is returned to the terminating caller.
    #[error("fatal error in shutdown hook: {0}")]
    Fatal(String),
}
