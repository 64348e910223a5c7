//! Facet Configuration Model
//!
//! Strongly-typed, read-only description of how a widget selects its content. Built
//! once per widget instance, either through [`FacetConfig::builder`] or by normalizing
//! loosely-typed widget settings with [`FacetConfig::from_settings`].

mod settings;

use crate::query::{EventDateField, PageSize, SortDirection, TimeWindow};
use crate::types::{ItemId, TermId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Where a widget's items come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// Hand-picked ids
    Manual,
    /// Any stored item of the configured type
    #[default]
    FromRepository,
    /// Whatever collection the current page already represents
    FromArchiveContext,
}

/// Declared ordering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderBy {
    #[default]
    Date,
    Modified,
    Title,
    MenuOrder,
    CommentCount,
    Id,
    Random,
    /// Keep the hand-picked order of a manual source
    ManualOrder,
    Price,
    Popularity,
    Rating,
    /// Order by event date under a time window
    EventDate,
}

/// Restrict to explicit terms of one taxonomy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxonomyFilter {
    pub taxonomy: String,
    #[serde(default)]
    pub term_ids: BTreeSet<TermId>,
}

impl TaxonomyFilter {
    /// A filter only restricts anything with both a taxonomy and at least one term.
    pub fn is_effective(&self) -> bool {
        !self.taxonomy.trim().is_empty() && !self.term_ids.is_empty()
    }
}

/// Normalized widget content configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacetConfig {
    pub source_kind: SourceKind,
    pub item_type: String,
    /// Hand-picked ids for [`SourceKind::Manual`], in display order
    pub manual_ids: Vec<ItemId>,
    pub taxonomy_filter: Option<TaxonomyFilter>,
    pub exclude_current_item: bool,
    pub exclude_ids: BTreeSet<ItemId>,
    pub offset: u32,
    pub order_by: OrderBy,
    /// `None` when the widget never chose a direction explicitly
    pub order_direction: Option<SortDirection>,
    pub time_window: TimeWindow,
    pub event_date_field: EventDateField,
    pub page_size: PageSize,
    pub pagination_enabled: bool,
    pub pagination_window: u32,
}

impl Default for FacetConfig {
    fn default() -> Self {
        Self {
            source_kind: SourceKind::default(),
            item_type: "post".to_string(),
            manual_ids: Vec::new(),
            taxonomy_filter: None,
            exclude_current_item: false,
            exclude_ids: BTreeSet::new(),
            offset: 0,
            order_by: OrderBy::default(),
            order_direction: None,
            time_window: TimeWindow::default(),
            event_date_field: EventDateField::default(),
            page_size: PageSize::Limited(10),
            pagination_enabled: false,
            pagination_window: 5,
        }
    }
}

impl FacetConfig {
    /// Create a new builder starting from the defaults.
    ///
    /// # Example
    /// ```rust
    /// use facetry::facet::{FacetConfig, OrderBy};
    /// use facetry::query::TimeWindow;
    ///
    /// let facets = FacetConfig::builder()
    ///     .item_type("event")
    ///     .order_by(OrderBy::EventDate)
    ///     .time_window(TimeWindow::Upcoming)
    ///     .page_size(6)
    ///     .paginated(true)
    ///     .build();
    /// assert_eq!(facets.item_type, "event");
    /// ```
    pub fn builder() -> FacetConfigBuilder {
        FacetConfigBuilder::default()
    }

    /// Whether this facet is scoped by the page's archive context.
    pub fn uses_archive_context(&self) -> bool {
        self.source_kind == SourceKind::FromArchiveContext
    }
}

/// Fluent construction of [`FacetConfig`]
#[derive(Debug, Default)]
pub struct FacetConfigBuilder {
    config: FacetConfig,
}

impl FacetConfigBuilder {
    pub fn source(mut self, kind: SourceKind) -> Self {
        self.config.source_kind = kind;
        self
    }

    pub fn item_type(mut self, item_type: impl Into<String>) -> Self {
        self.config.item_type = item_type.into();
        self
    }

    /// Switch to a manual source with these ids, keeping their order.
    pub fn manual<I: Into<ItemId>>(mut self, ids: impl IntoIterator<Item = I>) -> Self {
        self.config.source_kind = SourceKind::Manual;
        self.config.manual_ids = ids.into_iter().map(Into::into).collect();
        self
    }

    pub fn taxonomy<T: Into<TermId>>(
        mut self,
        taxonomy: impl Into<String>,
        term_ids: impl IntoIterator<Item = T>,
    ) -> Self {
        self.config.taxonomy_filter = Some(TaxonomyFilter {
            taxonomy: taxonomy.into(),
            term_ids: term_ids.into_iter().map(Into::into).collect(),
        });
        self
    }

    pub fn exclude_current(mut self, exclude: bool) -> Self {
        self.config.exclude_current_item = exclude;
        self
    }

    pub fn exclude<I: Into<ItemId>>(mut self, ids: impl IntoIterator<Item = I>) -> Self {
        self.config.exclude_ids.extend(ids.into_iter().map(Into::into));
        self
    }

    pub fn offset(mut self, offset: u32) -> Self {
        self.config.offset = offset;
        self
    }

    pub fn order_by(mut self, order_by: OrderBy) -> Self {
        self.config.order_by = order_by;
        self
    }

    pub fn direction(mut self, direction: SortDirection) -> Self {
        self.config.order_direction = Some(direction);
        self
    }

    pub fn time_window(mut self, window: TimeWindow) -> Self {
        self.config.time_window = window;
        self
    }

    pub fn event_date_field(mut self, field: EventDateField) -> Self {
        self.config.event_date_field = field;
        self
    }

    /// Items per page; zero falls back to the default of 10.
    pub fn page_size(mut self, size: u32) -> Self {
        self.config.page_size = if size == 0 {
            PageSize::Limited(10)
        } else {
            PageSize::Limited(size)
        };
        self
    }

    pub fn unbounded(mut self) -> Self {
        self.config.page_size = PageSize::Unbounded;
        self
    }

    pub fn paginated(mut self, enabled: bool) -> Self {
        self.config.pagination_enabled = enabled;
        self
    }

    /// Page links around the current page; zero falls back to 5.
    pub fn pagination_window(mut self, window: u32) -> Self {
        self.config.pagination_window = if window == 0 { 5 } else { window };
        self
    }

    pub fn build(self) -> FacetConfig {
        self.config
    }
}
