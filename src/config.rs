//! Configuration System
//!
//! Engine-wide defaults loaded in layers: built-in defaults, the user's global file,
//! workspace files, then `FACETRY__SECTION__KEY` environment variables. Per-widget
//! settings live in [`crate::facet::FacetConfig`], not here.

use crate::error::EngineError;
use crate::logging::LoggingConfig;
use crate::pagination::PaginationConfig;
use crate::query::{CatalogConfig, CatalogFilter, EventConfig, QueryCompiler};
use crate::types::ItemId;
use crate::variation::{VariationConfig, VariationResolver};
use serde::{Deserialize, Serialize};

mod facade;
mod merge;
mod sources;

pub use facade::ConfigLoader;
pub use sources::global_file::global_config_path;

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub pagination: PaginationConfig,

    /// Storage field names for catalog widgets
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Event date metadata keys
    #[serde(default)]
    pub events: EventConfig,

    /// Swatch keywords, colors and metadata keys
    #[serde(default)]
    pub variation: VariationConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    Pagination(String),
    Catalog(String),
    Events(String),
    Variation(String),
    Logging(String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::Pagination(msg) => write!(f, "Pagination: {}", msg),
            ValidationError::Catalog(msg) => write!(f, "Catalog: {}", msg),
            ValidationError::Events(msg) => write!(f, "Events: {}", msg),
            ValidationError::Variation(msg) => write!(f, "Variation: {}", msg),
            ValidationError::Logging(msg) => write!(f, "Logging: {}", msg),
        }
    }
}

impl std::error::Error for ValidationError {}

impl EngineConfig {
    /// Validate every section, collecting all failures.
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if let Err(e) = self.pagination.validate() {
            errors.push(ValidationError::Pagination(e));
        }
        if let Err(e) = self.catalog.validate() {
            errors.push(ValidationError::Catalog(e));
        }
        if let Err(e) = self.events.validate() {
            errors.push(ValidationError::Events(e));
        }
        if let Err(e) = self.variation.validate() {
            errors.push(ValidationError::Variation(e));
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

    /// Like [`validate`](Self::validate), folded into a single engine error.
    pub fn ensure_valid(&self) -> Result<(), EngineError> {
        self.validate().map_err(|errors| {
            let msgs: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            EngineError::ValidationFailed(msgs.join("\n"))
        })
    }

    pub fn to_toml(&self) -> Result<String, EngineError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn query_compiler(&self) -> QueryCompiler {
        QueryCompiler::new(self.catalog.clone(), self.events.clone())
    }

    pub fn catalog_filter(&self, on_sale_ids: impl IntoIterator<Item = ItemId>) -> CatalogFilter {
        CatalogFilter::new(self.catalog.clone(), on_sale_ids)
    }

    pub fn variation_resolver(&self) -> VariationResolver {
        VariationResolver::new(&self.variation)
    }
}
