//! Query Compiler: merges a [`FacetConfig`] with a [`RequestContext`] into a
//! [`QuerySpec`]. Pure and deterministic; the same inputs always compile to the same
//! spec.

use super::spec::{PageSize, QuerySpec, SortDirection, SortKey, TermFilter, ValueType};
use super::time_window::resolve_event_ordering;
use super::{CatalogConfig, EventConfig};
use crate::context::{ArchiveScope, RequestContext};
use crate::facet::{FacetConfig, OrderBy, SourceKind};
use crate::types::ItemId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::debug;

/// Direction used when neither the widget nor a time window picks one
pub const DEFAULT_DIRECTION: SortDirection = SortDirection::Descending;

/// Compiles facets against request context using the given storage field names
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryCompiler {
    pub catalog: CatalogConfig,
    pub events: EventConfig,
}

/// Compile with the default catalog and event field names.
pub fn compile(facets: &FacetConfig, ctx: &RequestContext) -> QuerySpec {
    QueryCompiler::default().compile(facets, ctx)
}

impl QueryCompiler {
    pub fn new(catalog: CatalogConfig, events: EventConfig) -> Self {
        Self { catalog, events }
    }

    pub fn compile(&self, facets: &FacetConfig, ctx: &RequestContext) -> QuerySpec {
        let mut spec = QuerySpec::for_item_type(facets.item_type.clone());

        self.apply_scope(&mut spec, facets, ctx);
        apply_exclusions(&mut spec, facets, ctx);

        if !facets.uses_archive_context() {
            spec.offset = facets.offset;
        }

        self.apply_ordering(&mut spec, facets, ctx);
        apply_pagination(&mut spec, facets, ctx);

        debug!(
            item_type = %spec.item_type,
            source = ?facets.source_kind,
            term_filters = spec.term_filters.len(),
            meta_filters = spec.meta_filters.len(),
            page = spec.page,
            "Compiled query spec"
        );
        spec
    }

    fn apply_scope(&self, spec: &mut QuerySpec, facets: &FacetConfig, ctx: &RequestContext) {
        match facets.source_kind {
            SourceKind::FromArchiveContext => match &ctx.archive {
                Some(ArchiveScope::Term { taxonomy, term_id }) => {
                    spec.term_filters
                        .push(TermFilter::by_ids(taxonomy.clone(), [*term_id]));
                }
                Some(ArchiveScope::Author(author)) => {
                    spec.author_ids.insert(*author);
                }
                Some(ArchiveScope::Date(parts)) => match parts.range() {
                    Some(range) => spec.date_range = Some(range),
                    None => debug!(?parts, "Ignoring impossible archive date"),
                },
                Some(ArchiveScope::ItemType(item_type)) => {
                    if !item_type.trim().is_empty() {
                        spec.item_type = item_type.trim().to_string();
                    }
                }
                None => {}
            },
            SourceKind::Manual | SourceKind::FromRepository => {
                if facets.source_kind == SourceKind::Manual {
                    spec.include_ids = Some(manual_include_list(&facets.manual_ids));
                }
                if let Some(filter) = facets.taxonomy_filter.as_ref().filter(|f| f.is_effective())
                {
                    spec.term_filters.push(TermFilter::by_ids(
                        filter.taxonomy.clone(),
                        filter.term_ids.iter().copied(),
                    ));
                }
            }
        }
    }

    fn apply_ordering(&self, spec: &mut QuerySpec, facets: &FacetConfig, ctx: &RequestContext) {
        let requested = facets.order_direction;

        let sort_key = match facets.order_by {
            OrderBy::EventDate => {
                let ordering = resolve_event_ordering(
                    facets.time_window,
                    ctx.now,
                    requested,
                    &self.events.end_key,
                    DEFAULT_DIRECTION,
                );
                spec.meta_filters.extend(ordering.meta_filters);
                spec.sort_key = SortKey::EventDate {
                    key: self.events.key_for(facets.event_date_field).to_string(),
                };
                spec.sort_direction = ordering.sort_direction;
                return;
            }
            OrderBy::Date => SortKey::Date,
            OrderBy::Modified => SortKey::Modified,
            OrderBy::Title => SortKey::Title,
            OrderBy::MenuOrder => SortKey::MenuOrder,
            OrderBy::CommentCount => SortKey::CommentCount,
            OrderBy::Id => SortKey::Id,
            OrderBy::Random => SortKey::Random {
                seed: random_seed(&facets.item_type, &ctx.day_stamp()),
            },
            OrderBy::ManualOrder if spec.include_ids.is_some() => SortKey::IncludeOrder,
            OrderBy::ManualOrder => SortKey::Date,
            OrderBy::Price => self.numeric_meta(&self.catalog.price_key),
            OrderBy::Popularity => self.numeric_meta(&self.catalog.sales_key),
            OrderBy::Rating => self.numeric_meta(&self.catalog.rating_key),
        };
        spec.sort_key = sort_key;
        spec.sort_direction = requested.unwrap_or(DEFAULT_DIRECTION);
    }

    fn numeric_meta(&self, key: &str) -> SortKey {
        SortKey::Meta {
            key: key.to_string(),
            value_type: ValueType::Numeric,
        }
    }
}

/// Hand-picked ids without duplicates; an empty pick matches nothing.
fn manual_include_list(ids: &[ItemId]) -> Vec<ItemId> {
    let mut seen = BTreeSet::new();
    let picked: Vec<ItemId> = ids
        .iter()
        .copied()
        .filter(|id| !id.is_sentinel() && seen.insert(*id))
        .collect();
    if picked.is_empty() {
        vec![ItemId::NONE]
    } else {
        picked
    }
}

fn apply_exclusions(spec: &mut QuerySpec, facets: &FacetConfig, ctx: &RequestContext) {
    if facets.exclude_current_item {
        if let Some(current) = ctx.current_item_id {
            spec.exclude_ids.insert(current);
        }
    }
    if !facets.uses_archive_context() {
        spec.exclude_ids.extend(facets.exclude_ids.iter().copied());
    }
}

fn apply_pagination(spec: &mut QuerySpec, facets: &FacetConfig, ctx: &RequestContext) {
    if facets.source_kind != SourceKind::Manual && !facets.pagination_enabled {
        spec.page = 1;
        spec.page_size = PageSize::Unbounded;
        return;
    }
    spec.page = if facets.pagination_enabled {
        ctx.page()
    } else {
        1
    };
    spec.page_size = match facets.page_size {
        PageSize::Limited(0) => PageSize::Limited(10),
        other => other,
    };
}

/// Reproducible seed for random ordering: stable within one item type and day.
fn random_seed(item_type: &str, day: &str) -> u64 {
    let mut hasher = blake3::Hasher::new();
    hasher.update(item_type.as_bytes());
    hasher.update(b"\0");
    hasher.update(day.as_bytes());
    let digest = hasher.finalize();
    let mut seed = [0u8; 8];
    seed.copy_from_slice(&digest.as_bytes()[..8]);
    u64::from_le_bytes(seed)
}
