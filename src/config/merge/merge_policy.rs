//! Merge rules: defaults, override order, conflict handling.
//!
//! Later sources replace earlier ones key by key; tables merge, arrays replace.

use config::Config;
use config::ConfigBuilder;
use config::ConfigError;

/// Create a Config builder with merge policy defaults applied.
pub fn builder_with_defaults() -> Result<ConfigBuilder<config::builder::DefaultState>, ConfigError>
{
    Config::builder()
        .set_default("pagination.default_page_size", 10)?
        .set_default("pagination.default_window", 5)?
        .set_default("pagination.max_page_size", 100)?
        .set_default("catalog.item_type", "product")?
        .set_default("events.start_key", "_event_start_date")?
        .set_default("events.end_key", "_event_end_date")?
        .set_default("variation.default_color", "#CCCCCC")?
        .set_default("logging.level", "info")
}
