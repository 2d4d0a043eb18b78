//! User-registered shutdown actions.
//!
//! Every action added here runs on its own named thread when the
//! [`HookSlot::APPLICATION_HOOKS`] slot is reached, and the slot completes
//! only after all of them have been joined. Actions run concurrently and in
//! no particular order.

use crate::error::{HookError, ShutdownError};
use crate::sequencer::{ProcessHost, ShutdownSequencer};
use crate::slot::{HookDescriptor, HookSlot};
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread;

/// Handle returned by [`ApplicationHooks::add`], used to remove the action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HookId(u64);

type Action = Box<dyn FnOnce() + Send + 'static>;

struct PendingAction {
    id: HookId,
    name: String,
    action: Action,
}

/// The application shutdown action registry.
pub struct ApplicationHooks {
    /// `None` once the actions have been taken for running.
    pending: Mutex<Option<Vec<PendingAction>>>,
    next_id: AtomicU64,
}

impl ApplicationHooks {
    fn new() -> Self {
        Self {
            pending: Mutex::new(Some(Vec::new())),
            next_id: AtomicU64::new(0),
        }
    }

    /// Create the registry and register it into the application slot.
    ///
    /// # Errors
    ///
    /// Any [`ShutdownError`] from registering the slot hook.
    pub fn install<H: ProcessHost>(
        sequencer: &ShutdownSequencer<H>,
    ) -> Result<Arc<Self>, ShutdownError> {
        let hooks = Arc::new(Self::new());
        let runner = Arc::clone(&hooks);
        sequencer.register(HookDescriptor::new(
            "application-hooks",
            HookSlot::APPLICATION_HOOKS,
            move || runner.run(),
        ))?;
        Ok(hooks)
    }

    /// Add an action to run at shutdown.
    ///
    /// # Errors
    ///
    /// [`ShutdownError::ShutdownInProgress`] once the actions have started.
    pub fn add<F>(&self, name: impl Into<String>, action: F) -> Result<HookId, ShutdownError>
    where
        F: FnOnce() + Send + 'static,
    {
        let mut pending = self.pending.lock();
        let actions = pending.as_mut().ok_or(ShutdownError::ShutdownInProgress)?;
        let id = HookId(self.next_id.fetch_add(1, Ordering::Relaxed));
        actions.push(PendingAction {
            id,
            name: name.into(),
            action: Box::new(action),
        });
        Ok(id)
    }

    /// Remove a previously added action. Returns whether it was present.
    ///
    /// # Errors
    ///
    /// [`ShutdownError::ShutdownInProgress`] once the actions have started.
    pub fn remove(&self, id: HookId) -> Result<bool, ShutdownError> {
        let mut pending = self.pending.lock();
        let actions = pending.as_mut().ok_or(ShutdownError::ShutdownInProgress)?;
        let before = actions.len();
        actions.retain(|pending| pending.id != id);
        Ok(actions.len() != before)
    }

    pub fn len(&self) -> usize {
        self.pending.lock().as_ref().map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn run(&self) -> Result<(), HookError> {
        let Some(actions) = self.pending.lock().take() else {
            return Ok(());
        };
        log::debug!("Starting {} application shutdown actions", actions.len());

        let mut handles = Vec::with_capacity(actions.len());
        for PendingAction { name, action, .. } in actions {
            match thread::Builder::new().name(name.clone()).spawn(action) {
                Ok(handle) => handles.push((name, handle)),
                Err(e) => log::warn!("Could not start shutdown action '{}': {}", name, e),
            }
        }
        for (name, handle) in handles {
            if handle.join().is_err() {
                log::warn!("Shutdown action '{}' panicked", name);
            }
        }
        Ok(())
    }
}
