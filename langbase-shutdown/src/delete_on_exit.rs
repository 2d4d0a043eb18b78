//! Files and directories removed when the process shuts down.

use crate::error::{HookError, ShutdownError};
use crate::sequencer::{ProcessHost, ShutdownSequencer};
use crate::slot::{HookDescriptor, HookSlot};
use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Ordered set of paths deleted in reverse registration order at shutdown,
/// so a directory registered before its contents is removed after them.
pub struct DeleteOnExit {
    /// `None` once deletion has started.
    paths: Mutex<Option<Vec<PathBuf>>>,
}

impl DeleteOnExit {
    /// Create the list and register it into the delete-on-exit slot.
    ///
    /// The slot accepts late registration so that earlier hooks may still
    /// schedule deletions.
    ///
    /// # Errors
    ///
    /// Any [`ShutdownError`] from registering the slot hook.
    pub fn install<H: ProcessHost>(
        sequencer: &ShutdownSequencer<H>,
    ) -> Result<Arc<Self>, ShutdownError> {
        let list = Arc::new(Self {
            paths: Mutex::new(Some(Vec::new())),
        });
        let runner = Arc::clone(&list);
        sequencer.register(
            HookDescriptor::new("delete-on-exit", HookSlot::DELETE_ON_EXIT, move || runner.run())
                .allow_during_shutdown(true),
        )?;
        Ok(list)
    }

    /// Schedule `path` for deletion. Adding a path twice keeps its first
    /// position.
    ///
    /// # Errors
    ///
    /// [`ShutdownError::ShutdownInProgress`] once deletion has started.
    pub fn add(&self, path: impl Into<PathBuf>) -> Result<(), ShutdownError> {
        let path = path.into();
        let mut paths = self.paths.lock();
        let paths = paths.as_mut().ok_or(ShutdownError::ShutdownInProgress)?;
        if !paths.contains(&path) {
            paths.push(path);
        }
        Ok(())
    }

    pub fn paths(&self) -> Vec<PathBuf> {
        self.paths.lock().clone().unwrap_or_default()
    }

    fn run(&self) -> Result<(), HookError> {
        let Some(paths) = self.paths.lock().take() else {
            return Ok(());
        };
        for path in paths.iter().rev() {
            if let Err(e) = remove(path) {
                log::debug!("Delete on exit skipped {}: {}", path.display(), e);
            }
        }
        Ok(())
    }
}

/// Remove a file or an empty directory.
fn remove(path: &Path) -> std::io::Result<()> {
    if path.is_dir() {
        std::fs::remove_dir(path)
    } else {
        std::fs::remove_file(path)
    }
}
