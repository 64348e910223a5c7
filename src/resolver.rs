//! Content resolution pipeline.
//!
//! Facets + context → compiled spec → (catalog merge) → executor → page window.
//! An executor failure is a normal "nothing to show" state, never an error.

use crate::context::RequestContext;
use crate::executor::{QueryExecutor, QueryResult};
use crate::facet::FacetConfig;
use crate::pagination::{total_pages, PageWindow, PaginationConfig};
use crate::query::{CatalogFilter, QueryCompiler, QuerySpec};
use crate::types::ItemId;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Item handed to the rendering layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedItem {
    pub id: ItemId,
    /// Zero-based position across the whole result, not just this page
    pub position: u64,
}

/// Items for one render plus the numbers a pager needs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedCollection {
    pub items: Vec<ResolvedItem>,
    pub current_page: u32,
    pub total_pages: u32,
    pub total_matched: u64,
    /// Page links, present only when the widget paginates
    pub pages: Option<PageWindow>,
}

impl ResolvedCollection {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn ids(&self) -> Vec<ItemId> {
        self.items.iter().map(|item| item.id).collect()
    }
}

/// Resolves widget facets into concrete items through an executor
#[derive(Debug, Clone)]
pub struct ContentResolver<E> {
    executor: E,
    compiler: QueryCompiler,
    pagination: PaginationConfig,
}

impl<E: QueryExecutor> ContentResolver<E> {
    pub fn new(executor: E) -> Self {
        Self {
            executor,
            compiler: QueryCompiler::default(),
            pagination: PaginationConfig::default(),
        }
    }

    pub fn with_compiler(mut self, compiler: QueryCompiler) -> Self {
        self.compiler = compiler;
        self
    }

    pub fn with_pagination(mut self, pagination: PaginationConfig) -> Self {
        self.pagination = pagination;
        self
    }

    pub fn compiler(&self) -> &QueryCompiler {
        &self.compiler
    }

    /// Resolve a plain content widget.
    pub fn resolve(&self, facets: &FacetConfig, ctx: &RequestContext) -> ResolvedCollection {
        let spec = self.compiler.compile(facets, ctx);
        self.run(facets, spec)
    }

    /// Resolve a catalog widget, additionally honouring the request's filter parameters.
    pub fn resolve_catalog(
        &self,
        facets: &FacetConfig,
        ctx: &RequestContext,
        catalog: &CatalogFilter,
    ) -> ResolvedCollection {
        let spec = catalog.apply(self.compiler.compile(facets, ctx), &ctx.query);
        self.run(facets, spec)
    }

    /// Execute an already compiled spec.
    pub fn run(&self, facets: &FacetConfig, spec: QuerySpec) -> ResolvedCollection {
        let result = match self.executor.execute(&spec) {
            Ok(result) => result,
            Err(e) => {
                warn!(error = %e, item_type = %spec.item_type, "Query executor failed; showing no items");
                QueryResult::empty()
            }
        };

        let total_pages = total_pages(result.total_matched, spec.offset, spec.page_size);
        let first_position = spec
            .page_size
            .limit()
            .map(|size| u64::from(spec.page.saturating_sub(1)) * u64::from(size))
            .unwrap_or(0);
        let items: Vec<ResolvedItem> = result
            .ids
            .into_iter()
            .enumerate()
            .map(|(i, id)| ResolvedItem {
                id,
                position: first_position + i as u64,
            })
            .collect();

        let pages = (facets.pagination_enabled && total_pages > 0).then(|| {
            let window = if facets.pagination_window == 0 {
                self.pagination.default_window
            } else {
                facets.pagination_window
            };
            PageWindow::new(spec.page, total_pages, window)
        });

        debug!(
            returned = items.len(),
            total_matched = result.total_matched,
            total_pages,
            page = spec.page,
            "Resolved content"
        );

        ResolvedCollection {
            items,
            current_page: spec.page,
            total_pages,
            total_matched: result.total_matched,
            pages,
        }
    }
}
