//! Entry point for loading [`EngineConfig`].

use super::merge::merge_policy;
use super::sources::{self, global_file, workspace_file};
use super::EngineConfig;
use crate::error::EngineError;
use config::File;
use std::path::Path;
use tracing::info;

/// Loads engine configuration from files and the environment
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load with full layering, rooted at `workspace_root`.
    ///
    /// Defaults, then the global file, then `config/config.toml` and
    /// `config/{FACETRY_ENV}.toml` under the root, then `FACETRY__*` variables.
    pub fn load(workspace_root: &Path) -> Result<EngineConfig, EngineError> {
        let builder = merge_policy::builder_with_defaults()?;
        let builder = global_file::add_to_builder(builder)?;
        let builder = workspace_file::add_to_builder(builder, workspace_root)?;
        let builder = sources::add_environment(builder);

        let config: EngineConfig = builder.build()?.try_deserialize()?;
        info!(workspace_root = %workspace_root.display(), "Loaded engine configuration");
        Ok(config)
    }

    /// Load a single explicit file over the defaults. Environment variables still apply.
    pub fn load_from_file(path: &Path) -> Result<EngineConfig, EngineError> {
        if !path.exists() {
            return Err(EngineError::ConfigError(format!(
                "Configuration file not found: {}",
                path.display()
            )));
        }
        let builder = merge_policy::builder_with_defaults()?
            .add_source(File::from(path).required(true));
        let builder = sources::add_environment(builder);

        let config: EngineConfig = builder.build()?.try_deserialize()?;
        info!(config_path = %path.display(), "Loaded engine configuration");
        Ok(config)
    }

    /// Load and reject invalid configurations.
    pub fn load_validated(workspace_root: &Path) -> Result<EngineConfig, EngineError> {
        let config = Self::load(workspace_root)?;
        config.ensure_valid()?;
        Ok(config)
    }
}
