#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::Harness;
use refgraph_core::errors::RefGraphError;
use refgraph_core::logging_facility::Profile;
use refgraph_core::versions::tag_names;
use refgraph_core::{create_version, Appstructs, EngineConfig, ResourceType};

#[test]
fn test_empty_document_yields_defaults() {
    let config = EngineConfig::from_toml_str("").unwrap();

    assert_eq!(config, EngineConfig::default());
    assert_eq!(config.versions.first_tag, "FIRST");
    assert_eq!(config.versions.last_tag, "LAST");
    assert_eq!(config.versions.autonaming_prefix, "VERSION_");
    assert!(config.auto_update.enabled);
    assert_eq!(config.logging.profile, Profile::Development);
}

#[test]
fn test_partial_sections_keep_other_defaults() {
    let config = EngineConfig::from_toml_str(
        r#"
        [logging]
        profile = "production"
        filter = "refgraph_core=trace"

        [versions]
        autonaming_width = 3

        [auto_update]
        enabled = false
        "#,
    )
    .unwrap();

    assert_eq!(config.logging.profile, Profile::Production);
    assert_eq!(config.logging.filter.as_deref(), Some("refgraph_core=trace"));
    assert_eq!(config.versions.autonaming_width, 3);
    assert_eq!(config.versions.autonaming_prefix, "VERSION_");
    assert!(!config.auto_update.enabled);
    assert_eq!(config.catalog.tag_index, "tag");
}

#[test]
fn test_malformed_toml_is_a_configuration_error() {
    let result = EngineConfig::from_toml_str("[versions\nfirst_tag = ");

    assert!(matches!(result, Err(RefGraphError::Configuration { .. })));
}

#[test]
fn test_mistyped_value_is_a_configuration_error() {
    let result = EngineConfig::from_toml_str("[auto_update]\nenabled = \"yes\"\n");

    assert!(matches!(result, Err(RefGraphError::Configuration { .. })));
}

#[test]
fn test_identical_tag_names_are_rejected() {
    let result = EngineConfig::from_toml_str(
        "[versions]\nfirst_tag = \"TIP\"\nlast_tag = \"TIP\"\n",
    );

    assert!(matches!(result, Err(RefGraphError::Configuration { .. })));
}

#[test]
fn test_prefix_with_path_separator_is_rejected() {
    let result = EngineConfig::from_toml_str("[versions]\nautonaming_prefix = \"v/\"\n");

    assert!(matches!(result, Err(RefGraphError::Configuration { .. })));
}

#[test]
fn test_load_reads_a_file() {
    let path = std::env::temp_dir().join(format!("refgraph-config-{}.toml", std::process::id()));
    std::fs::write(&path, "[versions]\nlast_tag = \"HEAD\"\n").unwrap();

    let config = EngineConfig::load(&path);
    std::fs::remove_file(&path).ok();

    assert_eq!(config.unwrap().versions.last_tag, "HEAD");
}

#[test]
fn test_load_missing_file_is_a_configuration_error() {
    let result = EngineConfig::load("/nonexistent/refgraph/config.toml");

    assert!(matches!(result, Err(RefGraphError::Configuration { .. })));
}

#[test]
fn test_configured_names_drive_versioning() {
    // GIVEN custom tag names and a short autonaming scheme
    let config = EngineConfig::from_toml_str(
        r#"
        [versions]
        autonaming_prefix = "v"
        autonaming_width = 2
        first_tag = "INITIAL"
        last_tag = "HEAD"
        "#,
    )
    .unwrap();
    let mut h = Harness::with_config(config);

    // WHEN an item gets a second version
    let item = h.item("item", ResourceType::Item, Appstructs::new());
    let v1 = h
        .run(|tx| create_version(tx, item.item, &[item.first_version], &Appstructs::new(), &[]))
        .unwrap();

    // THEN tags and version names follow the configuration
    assert_eq!(h.content.node(item.first_version).unwrap().name, "v00");
    assert_eq!(h.content.node(v1).unwrap().name, "v01");
    assert_eq!(h.first(item.item), vec![item.first_version]);
    assert_eq!(h.last(item.item), vec![v1]);
    assert_eq!(tag_names(&h.content, v1), vec!["HEAD".to_string()]);
    assert_eq!(tag_names(&h.content, item.first_version), vec!["INITIAL".to_string()]);
}

#[test]
fn test_configured_tag_index_receives_reindex_requests() {
    let config = EngineConfig::from_toml_str("[catalog]\ntag_index = \"tags_v2\"\n").unwrap();
    let mut h = Harness::with_config(config);

    let item = h.item("item", ResourceType::Item, Appstructs::new());

    assert!(h.catalog.reindexed("tag").is_empty());
    assert!(h.catalog.reindexed("tags_v2").contains(&item.first_version));
}
