//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/cfgtree/cfgtree.toml`
//! 3. Explicit config file passed with `--config`
//! 4. Environment variables: `CFGTREE_*` prefix, `__` as section separator

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::{ApplicationError, TraversalOrder};
use crate::domain::ReportPolicy;

/// Resolution behaviour.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ResolutionConfig {
    /// Report every invalid directive of a level (`all`) or stop at the first (`first`)
    pub report: ReportPolicy,
    /// Node visiting order of the traversal driver (`pre` or `post`)
    pub order: TraversalOrder,
}

/// Terminal output.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct OutputConfig {
    /// Print node attributes below each node of a resolved tree
    pub show_attributes: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            show_attributes: true,
        }
    }
}

/// Raw settings for intermediate parsing.
///
/// Every field is optional so a layer only overrides what it specifies.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub resolution: RawResolutionConfig,
    pub output: RawOutputConfig,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawResolutionConfig {
    pub report: Option<ReportPolicy>,
    pub order: Option<TraversalOrder>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawOutputConfig {
    pub show_attributes: Option<bool>,
}

/// Unified configuration for cfgtree.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    pub resolution: ResolutionConfig,
    pub output: OutputConfig,
}

/// Get the XDG config directory for cfgtree.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "cfgtree").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("cfgtree.toml"))
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

/// `CFGTREE_RESOLUTION__REPORT` style variables, read from `vars` when given.
fn env_source(vars: Option<config::Map<String, String>>) -> Environment {
    Environment::with_prefix("CFGTREE")
        .prefix_separator("_")
        .separator("__")
        .source(vars)
}

/// A missing key is `None`, a value of the wrong type is an error.
fn optional<T>(result: Result<T, ConfigError>) -> Result<Option<T>, ApplicationError> {
    match result {
        Ok(val) => Ok(Some(val)),
        Err(ConfigError::NotFound(_)) => Ok(None),
        Err(e) => Err(config_err(e)),
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

fn parse_report(value: &str) -> Result<ReportPolicy, ApplicationError> {
    match value.to_lowercase().as_str() {
        "all" => Ok(ReportPolicy::All),
        "first" => Ok(ReportPolicy::First),
        other => Err(ApplicationError::Config {
            message: format!("resolution.report: expected 'all' or 'first', got '{}'", other),
        }),
    }
}

fn parse_order(value: &str) -> Result<TraversalOrder, ApplicationError> {
    match value.to_lowercase().as_str() {
        "pre" => Ok(TraversalOrder::Pre),
        "post" => Ok(TraversalOrder::Post),
        other => Err(ApplicationError::Config {
            message: format!("resolution.order: expected 'pre' or 'post', got '{}'", other),
        }),
    }
}

impl Settings {
    /// Overlay a raw layer: specified values win, the rest is kept.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            resolution: ResolutionConfig {
                report: overlay.resolution.report.unwrap_or(self.resolution.report),
                order: overlay.resolution.order.unwrap_or(self.resolution.order),
            },
            output: OutputConfig {
                show_attributes: overlay
                    .output
                    .show_attributes
                    .unwrap_or(self.output.show_attributes),
            },
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `explicit` - Optional config file given on the command line; it must exist
    pub fn load(explicit: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                current = current.merge_with(&load_raw_settings(&global_path)?);
            }
        }

        if let Some(path) = explicit {
            current = current.merge_with(&load_raw_settings(path)?);
        }

        Self::apply_env_overrides(current)
    }

    /// Apply CFGTREE_* environment variables as explicit overrides.
    fn apply_env_overrides(settings: Self) -> Result<Self, ApplicationError> {
        Self::apply_overrides(settings, env_source(None))
    }

    /// Apply overrides from an environment source; absent keys keep their value.
    fn apply_overrides(mut settings: Self, source: Environment) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(source)
            .build()
            .map_err(config_err)?;

        if let Some(val) = optional(config.get_string("resolution.report"))? {
            settings.resolution.report = parse_report(&val)?;
        }
        if let Some(val) = optional(config.get_string("resolution.order"))? {
            settings.resolution.order = parse_order(&val)?;
        }
        if let Some(val) = optional(config.get_bool("output.show_attributes"))? {
            settings.output.show_attributes = val;
        }

        Ok(settings)
    }

    /// Render settings as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_partial_overlay_when_merging_then_keeps_unspecified_values() {
        let base = Settings::default();
        let overlay: RawSettings = toml::from_str("[resolution]\norder = \"post\"\n").unwrap();

        let merged = base.merge_with(&overlay);

        assert_eq!(merged.resolution.order, TraversalOrder::Post);
        assert_eq!(merged.resolution.report, ReportPolicy::All);
        assert!(merged.output.show_attributes);
    }

    #[test]
    fn given_env_style_values_when_parsing_then_case_insensitive() {
        assert_eq!(parse_report("FIRST").unwrap(), ReportPolicy::First);
        assert_eq!(parse_order("Post").unwrap(), TraversalOrder::Post);
        assert!(parse_report("some").is_err());
    }

    fn env(vars: &[(&str, &str)]) -> Environment {
        env_source(Some(
            vars.iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        ))
    }

    #[test]
    fn given_env_overrides_when_applying_then_values_replace_defaults() {
        let settings = Settings::apply_overrides(
            Settings::default(),
            env(&[
                ("CFGTREE_RESOLUTION__REPORT", "first"),
                ("CFGTREE_OUTPUT__SHOW_ATTRIBUTES", "false"),
            ]),
        )
        .unwrap();

        assert_eq!(settings.resolution.report, ReportPolicy::First);
        assert_eq!(settings.resolution.order, TraversalOrder::Pre);
        assert!(!settings.output.show_attributes);
    }

    #[test]
    fn given_unparseable_show_attributes_when_applying_then_config_error() {
        let result = Settings::apply_overrides(
            Settings::default(),
            env(&[("CFGTREE_OUTPUT__SHOW_ATTRIBUTES", "maybe")]),
        );

        assert!(matches!(result, Err(ApplicationError::Config { .. })));
    }

    #[test]
    fn given_no_env_vars_when_applying_then_settings_unchanged() {
        let settings = Settings::apply_overrides(Settings::default(), env(&[])).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn given_defaults_when_rendering_then_round_trips_through_toml() {
        let rendered = Settings::default().to_toml().unwrap();
        let parsed: Settings = toml::from_str(&rendered).unwrap();
        assert_eq!(parsed, Settings::default());
    }
}
