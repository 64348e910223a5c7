//! Color resolution for color-kind options.
//!
//! Each tier is a [`ColorSource`]; the resolver asks them in order and the first
//! non-empty answer wins. Nothing found means the configured default gray.

use super::keywords::{self, normalize_text, COLOR_META_KEYS};
use super::{ConfigurableItem, TermMetaSource, VariationConfig, VariationOption};
use crate::types::first_meta_value;
use std::collections::BTreeMap;
use tracing::debug;

/// Everything a tier may consult for one option
pub struct ColorQuery<'a> {
    pub option: &'a VariationOption,
    pub item: &'a ConfigurableItem,
    pub terms: &'a dyn TermMetaSource,
}

/// One tier of the color fallback chain
pub trait ColorSource: Send + Sync {
    fn name(&self) -> &'static str;

    fn lookup(&self, query: &ColorQuery<'_>) -> Option<String>;
}

/// Metadata on the taxonomy term matching the option
#[derive(Debug, Clone)]
pub struct TermMetaColor {
    keys: Vec<String>,
}

impl TermMetaColor {
    pub fn new(keys: Vec<String>) -> Self {
        Self { keys }
    }
}

impl ColorSource for TermMetaColor {
    fn name(&self) -> &'static str {
        "term_meta"
    }

    fn lookup(&self, query: &ColorQuery<'_>) -> Option<String> {
        let taxonomy = taxonomy_of(&query.option.attribute_name);
        let meta = query.terms.term_meta(taxonomy, &query.option.raw_value)?;
        first_meta_value(meta, &self.keys).map(str::to_string)
    }
}

/// Metadata on the variation selecting exactly this option value
#[derive(Debug, Clone)]
pub struct VariationMetaColor {
    keys: Vec<String>,
}

impl VariationMetaColor {
    pub fn new(keys: Vec<String>) -> Self {
        Self { keys }
    }
}

impl ColorSource for VariationMetaColor {
    fn name(&self) -> &'static str {
        "variation_meta"
    }

    fn lookup(&self, query: &ColorQuery<'_>) -> Option<String> {
        query
            .item
            .variations_selecting(query.option)
            .find_map(|variation| first_meta_value(&variation.meta, &self.keys))
            .map(str::to_string)
    }
}

/// Static keyword table keyed by the normalized option text
#[derive(Debug, Clone)]
pub struct KeywordColor {
    table: BTreeMap<String, String>,
}

impl KeywordColor {
    pub fn new(table: BTreeMap<String, String>) -> Self {
        Self { table }
    }
}

impl ColorSource for KeywordColor {
    fn name(&self) -> &'static str {
        "keyword"
    }

    fn lookup(&self, query: &ColorQuery<'_>) -> Option<String> {
        self.table
            .get(&normalize_text(&query.option.raw_value))
            .cloned()
    }
}

/// Ordered color tiers plus the default
pub struct ColorResolver {
    sources: Vec<Box<dyn ColorSource>>,
    default_color: String,
}

impl Default for ColorResolver {
    fn default() -> Self {
        Self::from_config(&VariationConfig::default())
    }
}

impl ColorResolver {
    pub fn new(sources: Vec<Box<dyn ColorSource>>, default_color: impl Into<String>) -> Self {
        Self {
            sources,
            default_color: default_color.into(),
        }
    }

    /// Term metadata, then variation metadata, then the keyword table.
    pub fn from_config(config: &VariationConfig) -> Self {
        let keys = keywords::key_list(&config.color_meta_keys, COLOR_META_KEYS);
        let default_color = if config.default_color.trim().is_empty() {
            keywords::DEFAULT_COLOR.to_string()
        } else {
            config.default_color.trim().to_string()
        };
        let sources: Vec<Box<dyn ColorSource>> = vec![
            Box::new(TermMetaColor::new(keys.clone())),
            Box::new(VariationMetaColor::new(keys)),
            Box::new(KeywordColor::new(keywords::color_table(&config.colors))),
        ];
        Self::new(sources, default_color)
    }

    pub fn default_color(&self) -> &str {
        &self.default_color
    }

    /// Never empty.
    pub fn resolve_color(
        &self,
        option: &VariationOption,
        item: &ConfigurableItem,
        terms: &dyn TermMetaSource,
    ) -> String {
        let query = ColorQuery {
            option,
            item,
            terms,
        };
        for source in &self.sources {
            if let Some(color) = source.lookup(&query) {
                let color = color.trim();
                if !color.is_empty() {
                    debug!(tier = source.name(), value = %option.raw_value, color, "Resolved color");
                    return color.to_string();
                }
            }
        }
        self.default_color.clone()
    }
}

/// Taxonomy of an attribute name given in variation form (`attribute_pa_color`).
pub(crate) fn taxonomy_of(attribute_name: &str) -> &str {
    attribute_name
        .strip_prefix("attribute_")
        .unwrap_or(attribute_name)
}
