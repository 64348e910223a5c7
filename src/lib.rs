//! Facetry: Content Resolution & Faceted Filtering Engine
//!
//! Turns a widget's declarative facet configuration plus the ambient request (current
//! item, archive, query-string filters, clock) into a backend-agnostic
//! `QuerySpec`, runs it through a pluggable executor and returns ordered item ids
//! with pagination metadata. A separate resolver classifies variation attributes
//! into color, thumbnail or text swatches.

pub mod config;
pub mod context;
pub mod error;
pub mod executor;
pub mod facet;
pub mod logging;
pub mod pagination;
pub mod query;
pub mod resolver;
pub mod types;
pub mod variation;

pub use config::{ConfigLoader, EngineConfig};
pub use context::{ArchiveScope, ContextProvider, QueryStringFacets, RequestContext};
pub use error::{EngineError, ExecutorError};
pub use executor::{InMemoryExecutor, QueryExecutor, QueryResult};
pub use facet::{FacetConfig, OrderBy, SourceKind};
pub use pagination::{compute_page_window, PageToken, PageWindow};
pub use query::{compile, CatalogFilter, QueryCompiler, QuerySpec, TimeWindow};
pub use resolver::{ContentResolver, ResolvedCollection, ResolvedItem};
pub use types::{ItemId, TermId};
pub use variation::{VariationKind, VariationResolver};
