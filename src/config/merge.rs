//! Merge rules: defaults, override order, conflict handling.
//!
//! Sources are layered lowest to highest: built-in defaults, global config
//! file, explicit config file, environment. Later sources override keys of
//! earlier ones; list values (`search_dirs`) are replaced, not concatenated.

use config::builder::DefaultState;
use config::Config;
use config::ConfigBuilder;
use config::ConfigError;

/// Create a Config builder with merge policy defaults applied.
pub fn builder_with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Config::builder()
        .set_default("errors", "all")?
        .set_default("logging.level", "info")?
        .set_default("logging.format", "text")?
        .set_default("logging.output", "stderr")
}
