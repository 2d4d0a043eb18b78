//! Hook slots and the descriptors registered into them.

use crate::error::{HookError, ShutdownError};
use std::fmt;
use std::sync::Arc;

/// Number of hook slots.
pub const MAX_SYSTEM_HOOKS: usize = 10;

/// Position of a hook in the shutdown order. Lower slots run first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HookSlot(usize);

impl HookSlot {
    /// Restores console state (echo, line discipline) before anything else.
    pub const CONSOLE_RESTORE: HookSlot = HookSlot(0);
    /// User hooks managed by [`crate::ApplicationHooks`].
    pub const APPLICATION_HOOKS: HookSlot = HookSlot(1);
    /// Deferred file removal managed by [`crate::DeleteOnExit`].
    pub const DELETE_ON_EXIT: HookSlot = HookSlot(2);

    /// # Errors
    ///
    /// [`ShutdownError::InvalidSlot`] if `index >= MAX_SYSTEM_HOOKS`.
    pub fn new(index: usize) -> Result<Self, ShutdownError> {
        if index < MAX_SYSTEM_HOOKS {
            Ok(Self(index))
        } else {
            Err(ShutdownError::InvalidSlot { index })
        }
    }

    pub fn index(self) -> usize {
        self.0
    }

    /// All slots in execution order.
    pub fn all() -> impl Iterator<Item = HookSlot> {
        (0..MAX_SYSTEM_HOOKS).map(HookSlot)
    }
}

impl fmt::Display for HookSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A registered shutdown callback. Runs at most once per sequence.
pub type Hook = Arc<dyn Fn() -> Result<(), HookError> + Send + Sync>;

/// A named hook bound to a slot.
#[derive(Clone)]
pub struct HookDescriptor {
    pub name: String,
    pub slot: HookSlot,
    /// Whether the hook may still be registered once shutdown is running,
    /// provided its slot has not been reached.
    pub allow_during_shutdown: bool,
    pub hook: Hook,
}

impl HookDescriptor {
    pub fn new<F>(name: impl Into<String>, slot: HookSlot, hook: F) -> Self
    where
        F: Fn() -> Result<(), HookError> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            slot,
            allow_during_shutdown: false,
            hook: Arc::new(hook),
        }
    }

    pub fn allow_during_shutdown(mut self, allow: bool) -> Self {
        self.allow_during_shutdown = allow;
        self
    }
}

impl fmt::Debug for HookDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookDescriptor")
            .field("name", &self.name)
            .field("slot", &self.slot)
            .field("allow_during_shutdown", &self.allow_during_shutdown)
            .finish_non_exhaustive()
    }
}
