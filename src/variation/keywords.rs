//! Built-in keyword families, metadata key names and the color table.

use super::VariationConfig;
use std::collections::BTreeMap;
use unicode_normalization::UnicodeNormalization;

pub const COLOR_KEYWORDS: &[&str] = &[
    "color", "colour", "colors", "colours", "warna", "kleur", "farbe", "couleur", "colore",
];

pub const IMAGE_KEYWORDS: &[&str] = &[
    "image", "images", "thumbnail", "thumb", "photo", "picture", "pattern", "motif", "gambar",
    "foto", "corak",
];

pub const SIZE_KEYWORDS: &[&str] = &[
    "size", "sizes", "ukuran", "taille", "grosse", "talla", "maat",
];

/// Key names different swatch tools have used for a term's or variation's color.
pub const COLOR_META_KEYS: &[&str] = &[
    "color",
    "product_attribute_color",
    "swatch_color",
    "_swatch_color",
    "term_color",
    "pa_color",
    "attribute_color",
    "_color",
    "colour",
    "hex_color",
];

/// Key names holding a swatch image (attachment id or URL).
pub const IMAGE_META_KEYS: &[&str] = &[
    "thumbnail_id",
    "image",
    "image_id",
    "swatch_image",
    "_swatch_image",
    "product_attribute_image",
];

pub const DEFAULT_COLOR: &str = "#CCCCCC";

/// Keyword → hex, keys already normalized (see [`normalize_text`]).
const COLOR_TABLE: &[(&str, &str)] = &[
    ("red", "#FF0000"),
    ("merah", "#FF0000"),
    ("blue", "#0000FF"),
    ("biru", "#0000FF"),
    ("light blue", "#ADD8E6"),
    ("biru muda", "#ADD8E6"),
    ("dark blue", "#00008B"),
    ("biru tua", "#00008B"),
    ("navy", "#000080"),
    ("navy blue", "#000080"),
    ("green", "#008000"),
    ("hijau", "#008000"),
    ("olive", "#808000"),
    ("teal", "#008080"),
    ("tosca", "#40E0D0"),
    ("turquoise", "#40E0D0"),
    ("yellow", "#FFFF00"),
    ("kuning", "#FFFF00"),
    ("black", "#000000"),
    ("hitam", "#000000"),
    ("white", "#FFFFFF"),
    ("putih", "#FFFFFF"),
    ("orange", "#FFA500"),
    ("oranye", "#FFA500"),
    ("jingga", "#FFA500"),
    ("purple", "#800080"),
    ("ungu", "#800080"),
    ("violet", "#EE82EE"),
    ("pink", "#FFC0CB"),
    ("merah muda", "#FFC0CB"),
    ("brown", "#8B4513"),
    ("coklat", "#8B4513"),
    ("cokelat", "#8B4513"),
    ("grey", "#808080"),
    ("gray", "#808080"),
    ("abu abu", "#808080"),
    ("maroon", "#800000"),
    ("beige", "#F5F5DC"),
    ("cream", "#FFFDD0"),
    ("krem", "#FFFDD0"),
    ("khaki", "#C3B091"),
    ("gold", "#FFD700"),
    ("emas", "#FFD700"),
    ("silver", "#C0C0C0"),
    ("perak", "#C0C0C0"),
];

/// Canonical form for keyword comparison: NFKC, lowercase, `-`/`_` read as spaces,
/// whitespace collapsed.
pub fn normalize_text(raw: &str) -> String {
    let folded: String = raw
        .nfkc()
        .flat_map(char::to_lowercase)
        .map(|c| if c == '-' || c == '_' { ' ' } else { c })
        .collect();
    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Keyword families consulted by the classifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordFamilies {
    pub color: Vec<String>,
    pub image: Vec<String>,
    pub size: Vec<String>,
}

impl KeywordFamilies {
    pub fn builtin() -> Self {
        let owned = |words: &[&str]| -> Vec<String> { words.iter().map(|w| w.to_string()).collect() };
        Self {
            color: owned(COLOR_KEYWORDS),
            image: owned(IMAGE_KEYWORDS),
            size: owned(SIZE_KEYWORDS),
        }
    }

    /// Built-in families extended with configured extras.
    pub fn from_config(config: &VariationConfig) -> Self {
        let mut families = Self::builtin();
        extend_unique(&mut families.color, &config.color_keywords);
        extend_unique(&mut families.image, &config.image_keywords);
        extend_unique(&mut families.size, &config.size_keywords);
        families
    }
}

fn extend_unique(target: &mut Vec<String>, extra: &[String]) {
    for word in extra {
        let word = word.trim().to_lowercase();
        if !word.is_empty() && !target.contains(&word) {
            target.push(word);
        }
    }
}

/// Built-in color table with configured entries layered on top.
pub fn color_table(overrides: &BTreeMap<String, String>) -> BTreeMap<String, String> {
    let mut table: BTreeMap<String, String> = COLOR_TABLE
        .iter()
        .map(|(name, hex)| (name.to_string(), hex.to_string()))
        .collect();
    for (name, hex) in overrides {
        let name = normalize_text(name);
        if !name.is_empty() && !hex.trim().is_empty() {
            table.insert(name, hex.trim().to_string());
        }
    }
    table
}

/// Configured key list, or the built-in one when nothing is configured.
pub fn key_list(configured: &[String], builtin: &[&str]) -> Vec<String> {
    let configured: Vec<String> = configured
        .iter()
        .map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty())
        .collect();
    if configured.is_empty() {
        builtin.iter().map(|k| k.to_string()).collect()
    } else {
        configured
    }
}

/// `#RGB`, `#RRGGBB` or `#RRGGBBAA`
pub fn is_hex_color(value: &str) -> bool {
    match value.trim().strip_prefix('#') {
        Some(digits) => {
            matches!(digits.len(), 3 | 6 | 8) && digits.chars().all(|c| c.is_ascii_hexdigit())
        }
        None => false,
    }
}
