//! Faceted catalog filter merge.
//!
//! Catalog widgets also honour filters chosen in an external filter UI and carried on
//! the query string. Every rule here only adds to the compiled spec: filters from the
//! compiler are never removed. Categories combine with AND; values within one
//! category combine with OR.

use super::spec::{
    Comparator, MetaFilter, MetaValue, QuerySpec, SortDirection, SortKey, TermFilter,
    TermOperator, ValueType,
};
use super::CatalogConfig;
use crate::context::QueryStringFacets;
use crate::types::ItemId;
use std::collections::BTreeSet;
use tracing::debug;

pub const PARAM_CATEGORY: &str = "category";
pub const PARAM_MIN_PRICE: &str = "minPrice";
pub const PARAM_MAX_PRICE: &str = "maxPrice";
pub const PARAM_RATING: &str = "ratingFilter";
pub const PARAM_IN_STOCK: &str = "inStock";
pub const PARAM_ON_SALE: &str = "onSale";
pub const PARAM_SEARCH: &str = "search";
pub const PARAM_ORDERBY: &str = "orderby";
/// `query_type_<attribute>=and` switches an attribute filter to match-all
pub const QUERY_TYPE_PREFIX: &str = "query_type_";

/// Catalog field names plus the externally known on-sale id set
#[derive(Debug, Clone, Default)]
pub struct CatalogFilter {
    pub config: CatalogConfig,
    pub on_sale_ids: BTreeSet<ItemId>,
}

impl CatalogFilter {
    pub fn new(config: CatalogConfig, on_sale_ids: impl IntoIterator<Item = ItemId>) -> Self {
        Self {
            config,
            on_sale_ids: on_sale_ids.into_iter().collect(),
        }
    }

    /// Merge query-string filters into `spec`.
    pub fn apply(&self, mut spec: QuerySpec, qs: &QueryStringFacets) -> QuerySpec {
        let before = (spec.term_filters.len(), spec.meta_filters.len());

        self.apply_category(&mut spec, qs);
        self.apply_price(&mut spec, qs);
        self.apply_attributes(&mut spec, qs);
        self.apply_rating(&mut spec, qs);
        self.apply_stock(&mut spec, qs);
        self.apply_sale(&mut spec, qs);
        self.apply_search(&mut spec, qs);
        self.apply_orderby(&mut spec, qs);

        debug!(
            added_term_filters = spec.term_filters.len() - before.0,
            added_meta_filters = spec.meta_filters.len() - before.1,
            restricted = spec.include_ids.is_some(),
            "Merged query-string facets"
        );
        spec
    }

    fn apply_category(&self, spec: &mut QuerySpec, qs: &QueryStringFacets) {
        let slugs = qs.list(PARAM_CATEGORY);
        if !slugs.is_empty() {
            spec.term_filters.push(TermFilter::by_slugs(
                self.config.category_taxonomy.clone(),
                slugs,
            ));
        }
    }

    fn apply_price(&self, spec: &mut QuerySpec, qs: &QueryStringFacets) {
        let min = parse_number(qs.first(PARAM_MIN_PRICE));
        let max = parse_number(qs.first(PARAM_MAX_PRICE));
        if min.is_none() && max.is_none() {
            return;
        }
        let min = min.unwrap_or(0.0).max(0.0);
        let max = max.map(|max| max.max(min));
        spec.meta_filters.push(MetaFilter::new(
            self.config.price_key.clone(),
            Comparator::Between,
            MetaValue::Range { min, max },
            ValueType::Numeric,
        ));
    }

    fn apply_attributes(&self, spec: &mut QuerySpec, qs: &QueryStringFacets) {
        let prefix = self.config.attribute_param_prefix.as_str();
        for name in qs.names() {
            let Some(attribute) = name.strip_prefix(prefix).filter(|a| !a.is_empty()) else {
                continue;
            };
            let slugs = qs.list(name);
            if slugs.is_empty() {
                continue;
            }
            let taxonomy = self.attribute_taxonomy(attribute);
            let operator = match qs.first(&format!("{}{}", QUERY_TYPE_PREFIX, attribute)) {
                Some(kind) if kind.eq_ignore_ascii_case("and") => TermOperator::And,
                _ => TermOperator::In,
            };
            spec.term_filters
                .push(TermFilter::by_slugs(taxonomy, slugs).with_operator(operator));
        }
    }

    fn attribute_taxonomy(&self, attribute: &str) -> String {
        let namespace = self.config.attribute_taxonomy_prefix.as_str();
        if attribute.starts_with(namespace) {
            attribute.to_string()
        } else {
            format!("{}{}", namespace, attribute)
        }
    }

    fn apply_rating(&self, spec: &mut QuerySpec, qs: &QueryStringFacets) {
        // several ratings may be ticked at once; the lowest one bounds the result
        let lowest = qs
            .list(PARAM_RATING)
            .iter()
            .filter_map(|raw| parse_number(Some(raw.as_str())))
            .fold(None, |lowest: Option<f64>, rating| {
                Some(lowest.map_or(rating, |l| l.min(rating)))
            });
        if let Some(rating) = lowest {
            spec.meta_filters.push(MetaFilter::new(
                self.config.rating_key.clone(),
                Comparator::Gte,
                MetaValue::Number(rating),
                ValueType::Numeric,
            ));
        }
    }

    fn apply_stock(&self, spec: &mut QuerySpec, qs: &QueryStringFacets) {
        if qs.flag(PARAM_IN_STOCK) {
            spec.meta_filters.push(MetaFilter::new(
                self.config.stock_status_key.clone(),
                Comparator::Eq,
                MetaValue::Text(self.config.in_stock_value.clone()),
                ValueType::Text,
            ));
        }
    }

    fn apply_sale(&self, spec: &mut QuerySpec, qs: &QueryStringFacets) {
        if qs.flag(PARAM_ON_SALE) {
            spec.restrict_to(&self.on_sale_ids);
        }
    }

    fn apply_search(&self, spec: &mut QuerySpec, qs: &QueryStringFacets) {
        if let Some(term) = qs.first(PARAM_SEARCH) {
            spec.search = Some(term.to_string());
        }
    }

    /// Catalog ordering dropdown. Unknown values leave the compiled order alone.
    fn apply_orderby(&self, spec: &mut QuerySpec, qs: &QueryStringFacets) {
        let Some(raw) = qs.first(PARAM_ORDERBY) else {
            return;
        };
        let numeric = |key: &str| SortKey::Meta {
            key: key.to_string(),
            value_type: ValueType::Numeric,
        };
        let (key, direction) = match raw.to_ascii_lowercase().as_str() {
            "menu_order" => (SortKey::MenuOrder, SortDirection::Ascending),
            "popularity" => (numeric(&self.config.sales_key), SortDirection::Descending),
            "rating" => (numeric(&self.config.rating_key), SortDirection::Descending),
            "date" => (SortKey::Date, SortDirection::Descending),
            "price" => (numeric(&self.config.price_key), SortDirection::Ascending),
            "price-desc" => (numeric(&self.config.price_key), SortDirection::Descending),
            _ => return,
        };
        spec.sort_key = key;
        spec.sort_direction = direction;
    }
}

/// Merge query-string filters into `spec` using `filter`'s field names and sale set.
pub fn apply_query_string_facets(
    spec: QuerySpec,
    qs: &QueryStringFacets,
    filter: &CatalogFilter,
) -> QuerySpec {
    filter.apply(spec, qs)
}

fn parse_number(raw: Option<&str>) -> Option<f64> {
    raw?.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}
