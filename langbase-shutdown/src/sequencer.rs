//! The shutdown sequence.
//!
//! Two lock domains govern termination:
//!
//! - the slot-table lock guards the registered hooks and the [`ShutdownState`].
//!   Hooks are read under it one slot at a time and invoked after it is
//!   released, so a running hook may register hooks into later slots.
//! - the termination lock serialises whole sequences. A second terminator
//!   blocks until the first halts, which in a real process is forever.
//!
//! A third lock serialises the final [`ProcessHost::halt`] call.

use crate::error::{HookError, ShutdownError};
use crate::slot::{Hook, HookDescriptor, HookSlot, MAX_SYSTEM_HOOKS};
use parking_lot::Mutex;
use std::any::Any;
use std::convert::Infallible;
use std::panic::{self, AssertUnwindSafe};

/// Progress of the shutdown sequence. Only ever moves forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownState {
    NotStarted,
    /// The slot most recently read for execution.
    Running(HookSlot),
    Completed,
}

/// The host environment's termination primitives.
pub trait ProcessHost: Send + Sync {
    /// Called once, just before the hooks of an explicit exit run.
    fn before_halt(&self) {}

    /// Terminate the process immediately with `status`.
    fn halt(&self, status: i32) -> !;
}

/// Host backed by [`std::process::exit`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemHost;

impl ProcessHost for SystemHost {
    fn before_halt(&self) {
        log::logger().flush();
    }

    fn halt(&self, status: i32) -> ! {
        log::logger().flush();
        std::process::exit(status)
    }
}

#[derive(Clone)]
struct RegisteredHook {
    name: String,
    hook: Hook,
}

struct SlotTable {
    hooks: [Option<RegisteredHook>; MAX_SYSTEM_HOOKS],
    state: ShutdownState,
}

/// Fixed-slot registry of shutdown hooks, run once in ascending slot order.
pub struct ShutdownSequencer<H = SystemHost> {
    slots: Mutex<SlotTable>,
    termination: Mutex<()>,
    halt_lock: Mutex<()>,
    host: H,
}

impl ShutdownSequencer<SystemHost> {
    /// Sequencer that exits the current process.
    pub fn system() -> Self {
        Self::new(SystemHost)
    }
}

impl Default for ShutdownSequencer<SystemHost> {
    fn default() -> Self {
        Self::system()
    }
}

impl<H: ProcessHost> ShutdownSequencer<H> {
    pub fn new(host: H) -> Self {
        Self {
            slots: Mutex::new(SlotTable {
                hooks: Default::default(),
                state: ShutdownState::NotStarted,
            }),
            termination: Mutex::new(()),
            halt_lock: Mutex::new(()),
            host,
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn state(&self) -> ShutdownState {
        self.slots.lock().state
    }

    /// Whether every hook has run.
    pub fn is_shutdown(&self) -> bool {
        self.state() == ShutdownState::Completed
    }

    /// Register a hook into its slot.
    ///
    /// # Errors
    ///
    /// - [`ShutdownError::SlotOccupied`] if the slot already holds a hook.
    /// - [`ShutdownError::ShutdownInProgress`] if the sequence has completed,
    ///   or is running and either the descriptor does not allow late
    ///   registration or its slot has already been reached.
    pub fn register(&self, descriptor: HookDescriptor) -> Result<(), ShutdownError> {
        let HookDescriptor {
            name,
            slot,
            allow_during_shutdown,
            hook,
        } = descriptor;

        let mut table = self.slots.lock();
        if let Some(existing) = &table.hooks[slot.index()] {
            return Err(ShutdownError::SlotOccupied {
                slot: slot.index(),
                name: existing.name.clone(),
            });
        }
        match table.state {
            ShutdownState::NotStarted => {}
            ShutdownState::Running(current) if allow_during_shutdown && slot > current => {}
            ShutdownState::Running(_) | ShutdownState::Completed => {
                return Err(ShutdownError::ShutdownInProgress);
            }
        }

        log::debug!("Registered shutdown hook '{}' in slot {}", name, slot);
        table.hooks[slot.index()] = Some(RegisteredHook { name, hook });
        Ok(())
    }

    /// Register an anonymous hook by raw slot index.
    ///
    /// # Errors
    ///
    /// [`ShutdownError::InvalidSlot`] for an out-of-range index, otherwise as
    /// [`Self::register`].
    pub fn register_hook<F>(
        &self,
        index: usize,
        allow_during_shutdown: bool,
        hook: F,
    ) -> Result<(), ShutdownError>
    where
        F: Fn() -> Result<(), HookError> + Send + Sync + 'static,
    {
        let slot = HookSlot::new(index)?;
        self.register(
            HookDescriptor::new(format!("hook-{index}"), slot, hook)
                .allow_during_shutdown(allow_during_shutdown),
        )
    }

    /// Run every registered hook in slot order, unless already completed.
    ///
    /// Serialised with other sequences on the termination lock, so it must
    /// not be called from inside a hook.
    ///
    /// # Errors
    ///
    /// Returns the first [`HookError::Fatal`]; the remaining slots are skipped
    /// and the state stays at the failing slot.
    pub fn run_all(&self) -> Result<(), HookError> {
        let _termination = self.termination.lock();
        self.run_hooks()
    }

    /// Run the hooks because the last non-daemon thread has exited. The
    /// process is left to end on its own.
    ///
    /// # Errors
    ///
    /// As [`Self::run_all`].
    pub fn on_last_thread_exit(&self) -> Result<(), HookError> {
        log::info!("Last thread exited, running shutdown hooks");
        self.run_all()
    }

    /// Run the hooks and halt with `status`.
    ///
    /// A nonzero status requested after the hooks have completed halts at
    /// once without running anything. Concurrent callers queue on the
    /// termination lock behind the first, which never releases it.
    ///
    /// # Errors
    ///
    /// Returns only if a hook fails fatally, aborting the sequence before
    /// the halt.
    pub fn terminate_process(&self, status: i32) -> Result<Infallible, HookError> {
        {
            let table = self.slots.lock();
            if status != 0 && table.state == ShutdownState::Completed {
                log::info!("Exit requested with status {} during shutdown, halting", status);
                self.halt(status);
            }
        }

        let _termination = self.termination.lock();
        log::info!("Exit requested with status {}", status);
        self.host.before_halt();
        self.run_hooks()?;
        self.halt(status)
    }

    /// Halt immediately, skipping any hooks not yet run.
    pub fn halt(&self, status: i32) -> ! {
        let _halt = self.halt_lock.lock();
        self.host.halt(status)
    }

    fn run_hooks(&self) -> Result<(), HookError> {
        if self.is_shutdown() {
            return Ok(());
        }

        for slot in HookSlot::all() {
            let registered = {
                let mut table = self.slots.lock();
                table.state = ShutdownState::Running(slot);
                table.hooks[slot.index()].clone()
            };
            let Some(RegisteredHook { name, hook }) = registered else {
                continue;
            };

            log::debug!("Running shutdown hook '{}' (slot {})", name, slot);
            match panic::catch_unwind(AssertUnwindSafe(|| hook())) {
                Ok(Ok(())) => {}
                Ok(Err(HookError::Fatal(reason))) => {
                    log::error!("Shutdown hook '{}' failed fatally: {}", name, reason);
                    return Err(HookError::Fatal(reason));
                }
                Ok(Err(err)) => log::warn!("Shutdown hook '{}': {}", name, err),
                Err(payload) => log::warn!(
                    "Shutdown hook '{}' panicked: {}",
                    name,
                    panic_message(payload.as_ref())
                ),
            }
        }

        self.slots.lock().state = ShutdownState::Completed;
        log::debug!("All shutdown hooks completed");
        Ok(())
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("non-string panic payload")
}
