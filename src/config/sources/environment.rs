//! Environment source: YANG_CONTEXT__<SECTION>__<KEY>
//!
//! e.g. `YANG_CONTEXT__OPTIONS__TRUSTED=true`,
//! `YANG_CONTEXT__SEARCH_DIRS=/usr/share/yang:/opt/models`.

use config::builder::DefaultState;
use config::ConfigBuilder;
use config::Environment;

pub const ENV_PREFIX: &str = "YANG_CONTEXT";

/// Add environment overrides to builder.
pub fn add_to_builder(builder: ConfigBuilder<DefaultState>) -> ConfigBuilder<DefaultState> {
    builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .separator("__")
            .try_parsing(true)
            .list_separator(":")
            .with_list_parse_key("search_dirs"),
    )
}
