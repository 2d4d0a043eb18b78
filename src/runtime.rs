//! The runtime facade.
//!
//! Owns one name cache, one casing engine, and one shutdown sequencer with
//! the application and delete-on-exit registries installed, and exposes the
//! operations a base library's character, string, and process types
//! delegate to.

use crate::config::Config;
use anyhow::{Context, Result};
use langbase_casing::{ConditionalCasing, Locale};
use langbase_names::{CharacterNames, NameTableCache};
use langbase_shutdown::{
    ApplicationHooks, DeleteOnExit, HookId, ProcessHost, ShutdownError, ShutdownSequencer,
    SystemHost,
};
use std::convert::Infallible;
use std::path::PathBuf;
use std::sync::Arc;

pub struct Runtime<H: ProcessHost = SystemHost> {
    names: NameTableCache,
    casing: ConditionalCasing,
    default_locale: Locale,
    shutdown: ShutdownSequencer<H>,
    app_hooks: Arc<ApplicationHooks>,
    delete_on_exit: Arc<DeleteOnExit>,
}

impl Runtime<SystemHost> {
    /// Runtime whose exit ends the current process.
    ///
    /// # Errors
    ///
    /// Fails if the built-in shutdown slots cannot be registered.
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::with_host(config, SystemHost)
    }
}

impl<H: ProcessHost> Runtime<H> {
    /// # Errors
    ///
    /// Fails if the built-in shutdown slots cannot be registered.
    pub fn with_host(config: &Config, host: H) -> Result<Self> {
        let shutdown = ShutdownSequencer::new(host);
        let app_hooks =
            ApplicationHooks::install(&shutdown).context("Failed to install application hooks")?;
        let delete_on_exit =
            DeleteOnExit::install(&shutdown).context("Failed to install delete-on-exit")?;

        let source = config.name_source();
        log::debug!("Character names will load from {}", source);

        Ok(Self {
            names: NameTableCache::new(source),
            casing: ConditionalCasing::new(),
            default_locale: config.locale(),
            shutdown,
            app_hooks,
            delete_on_exit,
        })
    }

    // ------------------------------------------------------------------------
    // Character names
    // ------------------------------------------------------------------------

    pub fn names_cache(&self) -> &NameTableCache {
        &self.names
    }

    /// Name lookups over the cached table, building it on first use.
    ///
    /// # Errors
    ///
    /// Fails if the name resource cannot be loaded.
    pub fn character_names(&self) -> Result<CharacterNames> {
        CharacterNames::from_cache(&self.names)
            .with_context(|| format!("Failed to load character names from {}", self.names.source()))
    }

    /// # Errors
    ///
    /// Fails if the name resource cannot be loaded.
    pub fn name_of(&self, code_point: u32) -> Result<Option<String>> {
        Ok(self
            .character_names()?
            .name_of(code_point)
            .map(|name| name.into_owned()))
    }

    /// # Errors
    ///
    /// Fails if the name resource cannot be loaded.
    pub fn code_point_of(&self, name: &str) -> Result<Option<u32>> {
        Ok(self.character_names()?.code_point_of(name))
    }

    // ------------------------------------------------------------------------
    // Case mapping
    // ------------------------------------------------------------------------

    pub fn casing(&self) -> &ConditionalCasing {
        &self.casing
    }

    pub fn default_locale(&self) -> &Locale {
        &self.default_locale
    }

    /// Lowercase under `locale`, or the configured default locale.
    pub fn to_lowercase(&self, text: &str, locale: Option<&Locale>) -> String {
        self.casing
            .to_lowercase(text, locale.unwrap_or(&self.default_locale))
    }

    /// Uppercase under `locale`, or the configured default locale.
    pub fn to_uppercase(&self, text: &str, locale: Option<&Locale>) -> String {
        self.casing
            .to_uppercase(text, locale.unwrap_or(&self.default_locale))
    }

    // ------------------------------------------------------------------------
    // Shutdown
    // ------------------------------------------------------------------------

    pub fn shutdown(&self) -> &ShutdownSequencer<H> {
        &self.shutdown
    }

    /// # Errors
    ///
    /// [`ShutdownError::ShutdownInProgress`] once shutdown has started.
    pub fn add_shutdown_hook<F>(&self, name: &str, action: F) -> Result<HookId, ShutdownError>
    where
        F: FnOnce() + Send + 'static,
    {
        self.app_hooks.add(name, action)
    }

    /// # Errors
    ///
    /// [`ShutdownError::ShutdownInProgress`] once shutdown has started.
    pub fn remove_shutdown_hook(&self, id: HookId) -> Result<bool, ShutdownError> {
        self.app_hooks.remove(id)
    }

    /// # Errors
    ///
    /// [`ShutdownError::ShutdownInProgress`] once deletion has run.
    pub fn delete_on_exit(&self, path: impl Into<PathBuf>) -> Result<(), ShutdownError> {
        self.delete_on_exit.add(path)
    }

    /// Run the shutdown hooks and halt with `status`.
    ///
    /// # Errors
    ///
    /// Returns only if a hook failed fatally and termination was abandoned.
    pub fn exit(&self, status: i32) -> Result<Infallible> {
        self.shutdown
            .terminate_process(status)
            .context("Shutdown aborted by a fatal hook error")
    }
}
