//! Config loading entry point.

use super::{merge, sources, ContextConfig};
use crate::error::ContextError;
use config::File;
use std::path::Path;
use tracing::debug;

/// Loads [`ContextConfig`] from layered sources.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load defaults, the global file, `config_file` if given, then the
    /// environment, and validate the result.
    pub fn load(config_file: Option<&Path>) -> Result<ContextConfig, ContextError> {
        let mut builder = merge::builder_with_defaults()?;
        builder = sources::global_file::add_to_builder(builder);
        if let Some(path) = config_file {
            builder = builder.add_source(File::from(path).required(true));
        }
        builder = sources::environment::add_to_builder(builder);

        let config: ContextConfig = builder.build()?.try_deserialize()?;
        Self::validated(config)
    }

    /// Load a single file on top of the defaults, ignoring global file and
    /// environment.
    pub fn load_from_file(path: &Path) -> Result<ContextConfig, ContextError> {
        let config: ContextConfig = merge::builder_with_defaults()?
            .add_source(File::from(path).required(true))
            .build()?
            .try_deserialize()?;
        Self::validated(config)
    }

    fn validated(config: ContextConfig) -> Result<ContextConfig, ContextError> {
        if let Err(errors) = config.validate() {
            let messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            return Err(ContextError::Config(messages.join("; ")));
        }
        debug!(
            search_dirs = config.search_dirs.len(),
            errors = ?config.errors,
            "Configuration loaded"
        );
        Ok(config)
    }
}
