//! Query compilation: facet configuration plus request context in, [`QuerySpec`] out.
//!
//! Owns the Query Compiler, the query-string driven catalog filter merge and the
//! event time-window rules. Nothing here performs I/O.

pub mod catalog;
pub mod compiler;
pub mod spec;
pub mod time_window;

use serde::{Deserialize, Serialize};

pub use catalog::{apply_query_string_facets, CatalogFilter};
pub use compiler::{compile, QueryCompiler};
pub use spec::{
    Comparator, DateRange, MetaFilter, MetaValue, PageSize, QuerySpec, SortDirection, SortKey,
    TermField, TermFilter, TermOperator, TermSet, ValueType,
};
pub use time_window::{resolve_event_ordering, EventDateField, EventOrdering, TimeWindow};

/// Storage field names used by catalog-style widgets
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Item type the catalog lists
    pub item_type: String,
    /// Taxonomy the `category` parameter filters on
    pub category_taxonomy: String,
    /// Query-string prefix marking a filter-by-attribute parameter
    pub attribute_param_prefix: String,
    /// Namespace prefix of attribute taxonomies
    pub attribute_taxonomy_prefix: String,
    pub price_key: String,
    pub rating_key: String,
    pub stock_status_key: String,
    pub in_stock_value: String,
    pub sales_key: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            item_type: "product".to_string(),
            category_taxonomy: "product_cat".to_string(),
            attribute_param_prefix: "filter_".to_string(),
            attribute_taxonomy_prefix: "pa_".to_string(),
            price_key: "_price".to_string(),
            rating_key: "_wc_average_rating".to_string(),
            stock_status_key: "_stock_status".to_string(),
            in_stock_value: "instock".to_string(),
            sales_key: "total_sales".to_string(),
        }
    }
}

impl CatalogConfig {
    pub fn validate(&self) -> Result<(), String> {
        let required = [
            ("item_type", &self.item_type),
            ("category_taxonomy", &self.category_taxonomy),
            ("attribute_param_prefix", &self.attribute_param_prefix),
            ("price_key", &self.price_key),
            ("rating_key", &self.rating_key),
            ("stock_status_key", &self.stock_status_key),
            ("sales_key", &self.sales_key),
        ];
        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(format!("catalog.{} cannot be empty", name));
            }
        }
        Ok(())
    }
}

/// Metadata keys holding event dates
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventConfig {
    pub start_key: String,
    pub end_key: String,
}

impl Default for EventConfig {
    fn default() -> Self {
        Self {
            start_key: "_event_start_date".to_string(),
            end_key: "_event_end_date".to_string(),
        }
    }
}

impl EventConfig {
    pub fn key_for(&self, field: EventDateField) -> &str {
        match field {
            EventDateField::Start => &self.start_key,
            EventDateField::End => &self.end_key,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.start_key.trim().is_empty() || self.end_key.trim().is_empty() {
            return Err("events.start_key and events.end_key cannot be empty".to_string());
        }
        Ok(())
    }
}
