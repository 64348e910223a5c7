//! Variation Attribute Resolver
//!
//! Classifies each selectable option of a configurable item into a presentation kind
//! and, for colors and thumbnails, resolves a concrete value through an ordered list
//! of lookup strategies. Runs per materialized item, independent of the query side.

pub mod classify;
pub mod color;
pub mod keywords;
pub mod thumbnail;

use crate::types::{ItemId, MetaMap};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub use classify::{classify, Classifier};
pub use color::{
    ColorQuery, ColorResolver, ColorSource, KeywordColor, TermMetaColor, VariationMetaColor,
};
pub use thumbnail::{resolve_thumbnail, ImageRef, ImageSource, ThumbnailResolver};

/// Presentation kind of an attribute's options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VariationKind {
    Color,
    Thumbnail,
    Text,
}

/// Widget-level choice of presentation kind; `Auto` lets the classifier decide
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KindOverride {
    #[default]
    Auto,
    Color,
    Thumbnail,
    Text,
}

impl KindOverride {
    /// Unknown values read as `Auto`.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "color" | "colour" => KindOverride::Color,
            "image" | "thumbnail" => KindOverride::Thumbnail,
            "text" | "label" | "button" => KindOverride::Text,
            _ => KindOverride::Auto,
        }
    }

    pub fn fixed(&self) -> Option<VariationKind> {
        match self {
            KindOverride::Auto => None,
            KindOverride::Color => Some(VariationKind::Color),
            KindOverride::Thumbnail => Some(VariationKind::Thumbnail),
            KindOverride::Text => Some(VariationKind::Text),
        }
    }
}

/// One selectable value of one attribute
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariationOption {
    pub raw_value: String,
    pub attribute_name: String,
}

impl VariationOption {
    pub fn new(attribute_name: impl Into<String>, raw_value: impl Into<String>) -> Self {
        Self {
            raw_value: raw_value.into(),
            attribute_name: attribute_name.into(),
        }
    }
}

/// Attribute declared on a configurable item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemAttribute {
    /// Machine name, e.g. `pa_color`
    pub name: String,
    /// Human-readable label, e.g. `Warna`
    pub label: String,
    pub options: Vec<String>,
}

/// Concrete purchasable combination of attribute values
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemVariation {
    pub id: ItemId,
    /// Attribute machine name (optionally `attribute_`-prefixed) → selected value
    pub attributes: BTreeMap<String, String>,
    #[serde(default)]
    pub meta: MetaMap,
    #[serde(default)]
    pub image_id: Option<u64>,
}

impl ItemVariation {
    /// Value this variation selects for `attribute`, under either key form.
    pub fn value_for(&self, attribute: &str) -> Option<&str> {
        self.attributes
            .get(attribute)
            .or_else(|| self.attributes.get(&format!("attribute_{}", attribute)))
            .map(String::as_str)
    }

    /// Whether this variation selects `value` for `attribute` (case-insensitive).
    pub fn selects(&self, attribute: &str, value: &str) -> bool {
        self.value_for(attribute)
            .map(|selected| selected.trim().to_lowercase() == value.trim().to_lowercase())
            .unwrap_or(false)
    }
}

/// Item with selectable attributes
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigurableItem {
    pub id: ItemId,
    pub attributes: Vec<ItemAttribute>,
    pub variations: Vec<ItemVariation>,
}

impl ConfigurableItem {
    pub fn variations_selecting<'a>(
        &'a self,
        option: &'a VariationOption,
    ) -> impl Iterator<Item = &'a ItemVariation> + 'a {
        self.variations
            .iter()
            .filter(move |v| v.selects(&option.attribute_name, &option.raw_value))
    }
}

/// Metadata attached to taxonomy terms, looked up by taxonomy and option value
pub trait TermMetaSource {
    fn term_meta(&self, taxonomy: &str, value: &str) -> Option<&MetaMap>;
}

/// In-memory term metadata, indexed by slug and by name
#[derive(Debug, Clone, Default)]
pub struct TermDirectory {
    entries: BTreeMap<(String, String), MetaMap>,
}

impl TermDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, taxonomy: &str, slug: &str, name: &str, meta: MetaMap) {
        for key in [slug, name] {
            let key = key.trim().to_lowercase();
            if !key.is_empty() {
                self.entries
                    .insert((taxonomy.to_string(), key), meta.clone());
            }
        }
    }

    pub fn with_term(mut self, taxonomy: &str, slug: &str, name: &str, meta: MetaMap) -> Self {
        self.insert(taxonomy, slug, name, meta);
        self
    }
}

impl TermMetaSource for TermDirectory {
    fn term_meta(&self, taxonomy: &str, value: &str) -> Option<&MetaMap> {
        self.entries
            .get(&(taxonomy.to_string(), value.trim().to_lowercase()))
    }
}

/// Variation presentation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VariationConfig {
    /// Extra words marking color attributes
    pub color_keywords: Vec<String>,
    pub image_keywords: Vec<String>,
    pub size_keywords: Vec<String>,
    /// Replaces the built-in color key names when non-empty
    pub color_meta_keys: Vec<String>,
    /// Replaces the built-in image key names when non-empty
    pub image_meta_keys: Vec<String>,
    pub default_color: String,
    /// Keyword → hex entries layered over the built-in table
    pub colors: BTreeMap<String, String>,
    /// Attribute machine name → fixed presentation kind
    pub overrides: BTreeMap<String, KindOverride>,
}

impl Default for VariationConfig {
    fn default() -> Self {
        Self {
            color_keywords: Vec::new(),
            image_keywords: Vec::new(),
            size_keywords: Vec::new(),
            color_meta_keys: Vec::new(),
            image_meta_keys: Vec::new(),
            default_color: keywords::DEFAULT_COLOR.to_string(),
            colors: BTreeMap::new(),
            overrides: BTreeMap::new(),
        }
    }
}

impl VariationConfig {
    pub fn validate(&self) -> Result<(), String> {
        if !keywords::is_hex_color(&self.default_color) {
            return Err(format!(
                "variation.default_color '{}' is not a hex color",
                self.default_color
            ));
        }
        for (name, hex) in &self.colors {
            if !keywords::is_hex_color(hex) {
                return Err(format!("variation.colors.{} '{}' is not a hex color", name, hex));
            }
        }
        Ok(())
    }

    pub fn override_for(&self, attribute: &str) -> KindOverride {
        self.overrides.get(attribute).copied().unwrap_or_default()
    }
}

/// Rendered form of one option
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Swatch {
    Color { value: String, color: String },
    Image { value: String, image: ImageRef },
    Label { value: String },
}

/// Presentation of one attribute of an item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributePresentation {
    pub name: String,
    pub label: String,
    pub kind: VariationKind,
    pub swatches: Vec<Swatch>,
}

/// Classifier plus color and thumbnail resolution, built from one configuration
pub struct VariationResolver {
    classifier: Classifier,
    colors: ColorResolver,
    thumbnails: ThumbnailResolver,
    config: VariationConfig,
}

impl VariationResolver {
    pub fn new(config: &VariationConfig) -> Self {
        Self {
            classifier: Classifier::from_config(config),
            colors: ColorResolver::from_config(config),
            thumbnails: ThumbnailResolver::from_config(config),
            config: config.clone(),
        }
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    pub fn colors(&self) -> &ColorResolver {
        &self.colors
    }

    /// Presentation kind of `attribute`, honoring any configured override.
    pub fn kind_of(&self, attribute: &ItemAttribute) -> VariationKind {
        self.classifier.classify(
            &attribute.name,
            &attribute.label,
            self.config.override_for(&attribute.name),
        )
    }

    /// Classify every attribute of `item` and resolve each option's swatch.
    ///
    /// A thumbnail option without any image falls back to a text label.
    pub fn present(
        &self,
        item: &ConfigurableItem,
        terms: &dyn TermMetaSource,
    ) -> Vec<AttributePresentation> {
        item.attributes
            .iter()
            .map(|attribute| {
                let kind = self.kind_of(attribute);
                let swatches = attribute
                    .options
                    .iter()
                    .map(|value| {
                        let option = VariationOption::new(&attribute.name, value);
                        self.swatch(kind, &option, item, terms)
                    })
                    .collect();
                AttributePresentation {
                    name: attribute.name.clone(),
                    label: attribute.label.clone(),
                    kind,
                    swatches,
                }
            })
            .collect()
    }

    fn swatch(
        &self,
        kind: VariationKind,
        option: &VariationOption,
        item: &ConfigurableItem,
        terms: &dyn TermMetaSource,
    ) -> Swatch {
        let value = option.raw_value.clone();
        match kind {
            VariationKind::Color => Swatch::Color {
                color: self.colors.resolve_color(option, item, terms),
                value,
            },
            VariationKind::Thumbnail => match self.thumbnails.resolve(option, item, terms) {
                Some(image) => Swatch::Image { value, image },
                None => Swatch::Label { value },
            },
            VariationKind::Text => Swatch::Label { value },
        }
    }
}
