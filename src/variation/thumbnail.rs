//! Swatch images for thumbnail-kind options.

use super::color::taxonomy_of;
use super::keywords::{self, IMAGE_META_KEYS};
use super::{ConfigurableItem, TermMetaSource, VariationConfig, VariationOption};
use crate::types::MetaMap;
use serde::{Deserialize, Serialize};

/// Image to draw for an option
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ImageRef {
    /// Media library id
    Attachment(u64),
    Url(String),
}

impl ImageRef {
    /// Positive integers are attachment ids; absolute or root-relative paths are URLs.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        if let Ok(id) = raw.parse::<u64>() {
            return (id > 0).then_some(ImageRef::Attachment(id));
        }
        if raw.starts_with("http://") || raw.starts_with("https://") || raw.starts_with('/') {
            return Some(ImageRef::Url(raw.to_string()));
        }
        None
    }
}

/// Tiers consulted in order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    /// Term metadata under the configured key names
    TermMeta(Vec<String>),
    /// Image of the variation selecting this value, or its metadata
    Variation(Vec<String>),
}

impl ImageSource {
    fn lookup(
        &self,
        option: &VariationOption,
        item: &ConfigurableItem,
        terms: &dyn TermMetaSource,
    ) -> Option<ImageRef> {
        match self {
            ImageSource::TermMeta(keys) => terms
                .term_meta(taxonomy_of(&option.attribute_name), &option.raw_value)
                .and_then(|meta| first_image(meta, keys)),
            ImageSource::Variation(keys) => item.variations_selecting(option).find_map(|v| {
                v.image_id
                    .filter(|id| *id > 0)
                    .map(ImageRef::Attachment)
                    .or_else(|| first_image(&v.meta, keys))
            }),
        }
    }
}

fn first_image(meta: &MetaMap, keys: &[String]) -> Option<ImageRef> {
    keys.iter()
        .filter_map(|key| meta.get(key))
        .find_map(|value| ImageRef::parse(value))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThumbnailResolver {
    sources: Vec<ImageSource>,
}

impl Default for ThumbnailResolver {
    fn default() -> Self {
        Self::from_config(&VariationConfig::default())
    }
}

impl ThumbnailResolver {
    pub fn new(sources: Vec<ImageSource>) -> Self {
        Self { sources }
    }

    pub fn from_config(config: &VariationConfig) -> Self {
        let keys = keywords::key_list(&config.image_meta_keys, IMAGE_META_KEYS);
        Self::new(vec![
            ImageSource::TermMeta(keys.clone()),
            ImageSource::Variation(keys),
        ])
    }

    pub fn resolve(
        &self,
        option: &VariationOption,
        item: &ConfigurableItem,
        terms: &dyn TermMetaSource,
    ) -> Option<ImageRef> {
        self.sources
            .iter()
            .find_map(|source| source.lookup(option, item, terms))
    }
}

/// Resolve with the built-in key names.
pub fn resolve_thumbnail(
    option: &VariationOption,
    item: &ConfigurableItem,
    terms: &dyn TermMetaSource,
) -> Option<ImageRef> {
    ThumbnailResolver::default().resolve(option, item, terms)
}
