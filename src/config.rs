//! Configuration System
//!
//! Hierarchical configuration for building contexts: search directories,
//! initial option flags, diagnostic storage policy and logging. Values are
//! layered from defaults, the global config file, an explicit file and the
//! environment (see [`merge`] for the order).

use crate::context::ContextOptions;
use crate::diagnostics::ErrorStore;
use crate::error::ContextError;
use crate::logging::LoggingConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

mod facade;
pub mod merge;
pub mod sources;

pub use facade::ConfigLoader;

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContextConfig {
    /// Directories registered on context creation, in order
    #[serde(default)]
    pub search_dirs: Vec<PathBuf>,

    /// Which diagnostics each thread keeps
    #[serde(default)]
    pub errors: ErrorStore,

    /// Initial context flags
    #[serde(default)]
    pub options: OptionsConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Context flags as named booleans.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionsConfig {
    #[serde(default)]
    pub all_implemented: bool,
    #[serde(default)]
    pub trusted: bool,
    #[serde(default)]
    pub no_yang_library: bool,
    #[serde(default)]
    pub disable_searchdirs: bool,
    #[serde(default)]
    pub disable_searchdir_cwd: bool,
    #[serde(default)]
    pub prefer_searchdirs: bool,
}

impl OptionsConfig {
    pub fn to_flags(&self) -> ContextOptions {
        let mut flags = ContextOptions::empty();
        flags.set(ContextOptions::ALL_IMPLEMENTED, self.all_implemented);
        flags.set(ContextOptions::TRUSTED, self.trusted);
        flags.set(ContextOptions::NO_YANG_LIBRARY, self.no_yang_library);
        flags.set(ContextOptions::DISABLE_SEARCHDIRS, self.disable_searchdirs);
        flags.set(ContextOptions::DISABLE_SEARCHDIR_CWD, self.disable_searchdir_cwd);
        flags.set(ContextOptions::PREFER_SEARCHDIRS, self.prefer_searchdirs);
        flags
    }

    pub fn from_flags(flags: ContextOptions) -> Self {
        OptionsConfig {
            all_implemented: flags.contains(ContextOptions::ALL_IMPLEMENTED),
            trusted: flags.contains(ContextOptions::TRUSTED),
            no_yang_library: flags.contains(ContextOptions::NO_YANG_LIBRARY),
            disable_searchdirs: flags.contains(ContextOptions::DISABLE_SEARCHDIRS),
            disable_searchdir_cwd: flags.contains(ContextOptions::DISABLE_SEARCHDIR_CWD),
            prefer_searchdirs: flags.contains(ContextOptions::PREFER_SEARCHDIRS),
        }
    }
}

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    SearchDir(usize, String),
    Logging(String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::SearchDir(index, msg) => {
                write!(f, "search_dirs[{}]: {}", index, msg)
            }
            ValidationError::Logging(msg) => {
                write!(f, "Logging: {}", msg)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

impl ContextConfig {
    /// Validate the entire configuration
    ///
    /// Directory accessibility is not checked here; that happens when the
    /// context registers them.
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        for (index, dir) in self.search_dirs.iter().enumerate() {
            if dir.as_os_str().is_empty() {
                errors.push(ValidationError::SearchDir(
                    index,
                    "Search directory cannot be empty".to_string(),
                ));
            }
        }

        if let Err(e) = self.logging.validate() {
            errors.push(ValidationError::Logging(e));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Serialize to TOML, the format of the config files.
    pub fn to_toml(&self) -> Result<String, ContextError> {
        toml::to_string_pretty(self)
            .map_err(|e| ContextError::Config(format!("Failed to serialize config: {}", e)))
    }
}
