//! Integration tests for Configuration System

use crate::integration::test_utils::{fixed_now, shop_executor, with_env};
use facetry::config::{ConfigLoader, EngineConfig, ValidationError};
use facetry::context::{QueryStringFacets, RequestContext};
use facetry::error::EngineError;
use facetry::facet::FacetConfig;
use facetry::resolver::ContentResolver;
use facetry::types::ItemId;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_workspace_and_env_specific_files() {
    let temp_dir = TempDir::new().unwrap();
    let config_dir = temp_dir.path().join("config");
    fs::create_dir_all(&config_dir).unwrap();
    fs::write(
        config_dir.join("config.toml"),
        r#"
[pagination]
default_window = 7
max_page_size = 50

[catalog]
price_key = "price_idr"
"#,
    )
    .unwrap();
    fs::write(
        config_dir.join("staging.toml"),
        r#"
[pagination]
default_window = 3
"#,
    )
    .unwrap();

    let config = with_env(
        &[
            ("FACETRY_ENV", "staging"),
            ("XDG_CONFIG_HOME", temp_dir.path().join("xdg").to_str().unwrap()),
        ],
        || ConfigLoader::load(temp_dir.path()).unwrap(),
    );

    assert_eq!(config.pagination.default_window, 3);
    assert_eq!(config.pagination.max_page_size, 50);
    assert_eq!(config.catalog.price_key, "price_idr");
    assert!(config.validate().is_ok());
}

#[test]
fn test_workspace_file_layers_over_defaults() {
    let temp_dir = TempDir::new().unwrap();
    fs::create_dir_all(temp_dir.path().join("config")).unwrap();
    fs::write(
        temp_dir.path().join("config").join("config.toml"),
        "[events]\nend_key = \"ends_at\"\n",
    )
    .unwrap();

    let config = with_env(
        &[("XDG_CONFIG_HOME", temp_dir.path().join("xdg").to_str().unwrap())],
        || ConfigLoader::load(temp_dir.path()).unwrap(),
    );

    assert_eq!(config.events.end_key, "ends_at");
    assert_eq!(config.events.start_key, "_event_start_date");
}

#[test]
fn test_single_file_keeps_unset_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let config_file = temp_dir.path().join("engine.toml");
    fs::write(
        &config_file,
        "[pagination]\ndefault_window = 7\n\n[catalog]\nprice_key = \"price_idr\"\n",
    )
    .unwrap();

    let config = with_env(&[], || ConfigLoader::load_from_file(&config_file).unwrap());

    assert_eq!(config.pagination.default_window, 7);
    assert_eq!(config.pagination.default_page_size, 10);
    assert_eq!(config.catalog.price_key, "price_idr");
    assert_eq!(config.catalog.rating_key, "_wc_average_rating");
}

#[test]
fn test_global_file_sits_below_workspace() {
    let temp_dir = TempDir::new().unwrap();
    let xdg = temp_dir.path().join("xdg");
    fs::create_dir_all(xdg.join("facetry")).unwrap();
    fs::write(
        xdg.join("facetry").join("config.toml"),
        r##"
[variation]
default_color = "#EEEEEE"

[events]
end_key = "global_end"
"##,
    )
    .unwrap();
    let workspace = temp_dir.path().join("site");
    fs::create_dir_all(workspace.join("config")).unwrap();
    fs::write(
        workspace.join("config").join("config.toml"),
        "[events]\nend_key = \"site_end\"\n",
    )
    .unwrap();

    let config = with_env(&[("XDG_CONFIG_HOME", xdg.to_str().unwrap())], || {
        ConfigLoader::load(&workspace).unwrap()
    });

    assert_eq!(config.variation.default_color, "#EEEEEE");
    assert_eq!(config.events.end_key, "site_end");
}

#[test]
fn test_environment_overrides_files() {
    let temp_dir = TempDir::new().unwrap();
    let config_file = temp_dir.path().join("engine.toml");
    fs::write(&config_file, "[pagination]\ndefault_page_size = 12\n").unwrap();

    let config = with_env(
        &[
            ("FACETRY__PAGINATION__DEFAULT_PAGE_SIZE", "24"),
            ("FACETRY__CATALOG__ITEM_TYPE", "sku"),
        ],
        || ConfigLoader::load_from_file(&config_file).unwrap(),
    );

    assert_eq!(config.pagination.default_page_size, 24);
    assert_eq!(config.catalog.item_type, "sku");
}

#[test]
fn test_invalid_values_are_all_reported() {
    let temp_dir = TempDir::new().unwrap();
    let config_file = temp_dir.path().join("engine.toml");
    fs::write(
        &config_file,
        r##"
[pagination]
default_window = 0

[variation]
default_color = "grey"

[logging]
format = "xml"
"##,
    )
    .unwrap();

    let config = with_env(&[], || ConfigLoader::load_from_file(&config_file).unwrap());
    let errors = config.validate().unwrap_err();

    assert_eq!(errors.len(), 3);
    assert!(matches!(errors[0], ValidationError::Pagination(_)));
    assert!(matches!(errors[1], ValidationError::Variation(_)));
    assert!(matches!(errors[2], ValidationError::Logging(_)));
    assert!(matches!(
        config.ensure_valid(),
        Err(EngineError::ValidationFailed(_))
    ));
}

#[test]
fn test_configured_field_names_reach_the_pipeline() {
    let temp_dir = TempDir::new().unwrap();
    let config_file = temp_dir.path().join("engine.toml");
    fs::write(&config_file, "[catalog]\nrating_key = \"stars\"\n").unwrap();
    let config = with_env(&[], || ConfigLoader::load_from_file(&config_file).unwrap());

    let resolver = ContentResolver::new(shop_executor())
        .with_compiler(config.query_compiler())
        .with_pagination(config.pagination.clone());
    let facets = FacetConfig::builder().item_type("product").build();
    let ctx = RequestContext::new(fixed_now()).with_query(QueryStringFacets::parse("ratingFilter=1"));

    // the shop stores ratings under the default key, so nothing carries "stars"
    let resolved = resolver.resolve_catalog(&facets, &ctx, &config.catalog_filter(Vec::<ItemId>::new()));
    assert!(resolved.is_empty());
}

#[test]
fn test_rendered_toml_loads_back() {
    let temp_dir = TempDir::new().unwrap();
    let mut config = EngineConfig::default();
    config.pagination.default_page_size = 8;
    config
        .variation
        .colors
        .insert("sage green".to_string(), "#9CAF88".to_string());

    let path = temp_dir.path().join("rendered.toml");
    fs::write(&path, config.to_toml().unwrap()).unwrap();

    let loaded = with_env(&[], || ConfigLoader::load_from_file(&path).unwrap());
    assert_eq!(loaded, config);
}
