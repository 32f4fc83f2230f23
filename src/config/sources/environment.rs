//! Environment source: `WSFS__SECTION__KEY=value`, e.g. `WSFS__LIMITS__MAX_NODES=64`.

use config::builder::DefaultState;
use config::ConfigBuilder;
use config::Environment;
use std::collections::HashMap;

pub const ENV_PREFIX: &str = "WSFS";
pub const ENV_SEPARATOR: &str = "__";

/// Environment source over the process environment, or over `vars` when given.
pub fn environment(vars: Option<HashMap<String, String>>) -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator(ENV_SEPARATOR)
        .separator(ENV_SEPARATOR)
        .try_parsing(true)
        .source(vars)
}

pub fn add_to_builder(builder: ConfigBuilder<DefaultState>) -> ConfigBuilder<DefaultState> {
    builder.add_source(environment(None))
}
