//! Integration tests for Settings layered loading.
//!
//! These tests pass an explicit config file; the global config layer is
//! whatever exists on the machine running them, so assertions only cover
//! values the explicit file sets.

use std::fs;

use tempfile::TempDir;

use cfgtree::application::TraversalOrder;
use cfgtree::config::Settings;
use cfgtree::domain::ReportPolicy;

#[test]
fn given_explicit_config_when_load_then_overrides_resolution() {
    // Arrange
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("cfgtree.toml");
    fs::write(
        &path,
        r#"
[resolution]
report = "first"
order = "post"

[output]
show_attributes = false
"#,
    )
    .unwrap();

    // Act
    let settings = Settings::load(Some(&path)).expect("load settings");

    // Assert
    assert_eq!(settings.resolution.report, ReportPolicy::First);
    assert_eq!(settings.resolution.order, TraversalOrder::Post);
    assert!(!settings.output.show_attributes);
}

#[test]
fn given_invalid_policy_when_load_then_config_error() {
    // Arrange
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("cfgtree.toml");
    fs::write(&path, "[resolution]\nreport = \"sometimes\"\n").unwrap();

    // Act
    let result = Settings::load(Some(&path));

    // Assert
    let err = result.unwrap_err();
    assert!(err.to_string().starts_with("config error"), "{}", err);
}

#[test]
fn given_missing_explicit_config_when_load_then_errors() {
    // Arrange
    let dir = TempDir::new().unwrap();

    // Act
    let result = Settings::load(Some(&dir.path().join("absent.toml")));

    // Assert
    assert!(result.is_err());
}
