//! Configuration sources, lowest precedence first.

pub mod global_file;
pub mod workspace_file;

use config::builder::DefaultState;
use config::ConfigBuilder;
use config::Environment;

/// Environment variable prefix; `FACETRY__PAGINATION__DEFAULT_PAGE_SIZE=20`.
pub const ENV_PREFIX: &str = "FACETRY";
pub const ENV_SEPARATOR: &str = "__";

/// Add the environment source, highest precedence.
pub fn add_environment(builder: ConfigBuilder<DefaultState>) -> ConfigBuilder<DefaultState> {
    builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .separator(ENV_SEPARATOR)
            .try_parsing(true),
    )
}
