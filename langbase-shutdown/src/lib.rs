//! Shutdown hook sequencing for the langbase runtime library.
//!
//! This crate provides:
//!
//! - `sequencer`: the fixed-slot hook sequence, its locks, and the halt
//! - `slot`: slot indices and hook descriptors
//! - `app_hooks`: user actions run concurrently in the application slot
//! - `delete_on_exit`: deferred file removal

pub mod app_hooks;
pub mod delete_on_exit;
mod error;
pub mod sequencer;
pub mod slot;

pub use app_hooks::{ApplicationHooks, HookId};
pub use delete_on_exit::DeleteOnExit;
pub use error::{HookError, ShutdownError};
pub use sequencer::{ProcessHost, ShutdownSequencer, ShutdownState, SystemHost};
pub use slot::{HookDescriptor, HookSlot, MAX_SYSTEM_HOOKS};
