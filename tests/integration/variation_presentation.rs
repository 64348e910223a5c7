//! Swatch presentation of configurable items

use facetry::config::EngineConfig;
use facetry::types::{ItemId, MetaMap};
use facetry::variation::{
    ConfigurableItem, ImageRef, ItemAttribute, ItemVariation, KindOverride, Swatch,
    TermDirectory, VariationKind, VariationResolver,
};
use std::collections::BTreeMap;

fn meta(pairs: &[(&str, &str)]) -> MetaMap {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn attribute(name: &str, label: &str, options: &[&str]) -> ItemAttribute {
    ItemAttribute {
        name: name.to_string(),
        label: label.to_string(),
        options: options.iter().map(|o| o.to_string()).collect(),
    }
}

fn variation(id: u64, attribute: &str, value: &str, variation_meta: MetaMap, image: Option<u64>) -> ItemVariation {
    let mut attributes = BTreeMap::new();
    attributes.insert(format!("attribute_{}", attribute), value.to_string());
    ItemVariation {
        id: ItemId(id),
        attributes,
        meta: variation_meta,
        image_id: image,
    }
}

fn sample_item() -> ConfigurableItem {
    ConfigurableItem {
        id: ItemId(500),
        attributes: vec![
            attribute("pa_color-accent", "Accent", &["Merah", "Sage", "Ungu Tua"]),
            attribute("pa_corak", "Corak", &["Parang", "Kawung"]),
            attribute("pa_size", "Ukuran", &["M", "L"]),
            attribute("pa_bahan", "Gambar Bahan", &["Katun"]),
        ],
        variations: vec![
            variation(501, "pa_color-accent", "sage", meta(&[("swatch_color", "#9CAF88")]), None),
            variation(502, "pa_corak", "Kawung", MetaMap::new(), Some(88)),
        ],
    }
}

fn terms() -> TermDirectory {
    TermDirectory::new()
        .with_term(
            "pa_color-accent",
            "merah",
            "Merah",
            meta(&[("product_attribute_color", "#D32F2F")]),
        )
        .with_term(
            "pa_corak",
            "parang",
            "Parang",
            meta(&[("swatch_image", "https://cdn.example/parang.jpg")]),
        )
}

#[test]
fn test_full_presentation() {
    let resolver = EngineConfig::default().variation_resolver();
    let presented = resolver.present(&sample_item(), &terms());

    let kinds: Vec<VariationKind> = presented.iter().map(|a| a.kind).collect();
    assert_eq!(
        kinds,
        vec![
            VariationKind::Color,
            VariationKind::Thumbnail,
            VariationKind::Text,
            VariationKind::Thumbnail
        ]
    );

    assert_eq!(
        presented[0].swatches,
        vec![
            Swatch::Color {
                value: "Merah".to_string(),
                color: "#D32F2F".to_string()
            },
            Swatch::Color {
                value: "Sage".to_string(),
                color: "#9CAF88".to_string()
            },
            Swatch::Color {
                value: "Ungu Tua".to_string(),
                color: "#CCCCCC".to_string()
            },
        ]
    );

    assert_eq!(
        presented[1].swatches,
        vec![
            Swatch::Image {
                value: "Parang".to_string(),
                image: ImageRef::Url("https://cdn.example/parang.jpg".to_string())
            },
            Swatch::Image {
                value: "Kawung".to_string(),
                image: ImageRef::Attachment(88)
            },
        ]
    );

    // label-classified thumbnail with no image anywhere degrades to a label
    assert_eq!(
        presented[3].swatches,
        vec![Swatch::Label {
            value: "Katun".to_string()
        }]
    );
}

#[test]
fn test_configured_colors_and_overrides() {
    let mut config = EngineConfig::default();
    config
        .variation
        .colors
        .insert("Ungu Tua".to_string(), "#4B0082".to_string());
    config
        .variation
        .overrides
        .insert("pa_size".to_string(), KindOverride::Color);
    config.variation.default_color = "#EEEEEE".to_string();
    assert!(config.validate().is_ok());

    let resolver = VariationResolver::new(&config.variation);
    let presented = resolver.present(&sample_item(), &terms());

    assert_eq!(
        presented[0].swatches[2],
        Swatch::Color {
            value: "Ungu Tua".to_string(),
            color: "#4B0082".to_string()
        }
    );
    assert_eq!(presented[2].kind, VariationKind::Color);
    assert_eq!(
        presented[2].swatches[0],
        Swatch::Color {
            value: "M".to_string(),
            color: "#EEEEEE".to_string()
        }
    );
}

#[test]
fn test_presentation_serializes_for_templates() {
    let resolver = EngineConfig::default().variation_resolver();
    let presented = resolver.present(&sample_item(), &terms());
    let json = serde_json::to_value(&presented[0]).unwrap();

    assert_eq!(json["kind"], "color");
    assert_eq!(json["swatches"][0]["type"], "color");
    assert_eq!(json["swatches"][0]["color"], "#D32F2F");
}
