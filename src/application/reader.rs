//! Source-format readers producing the mapping a tree is built from.

use std::path::Path;

use serde_yaml::Value as YamlValue;
use tracing::debug;

use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::{Mapping, Value};

/// Parses source text into a top-level mapping.
pub trait Reader: Send + Sync {
    /// File extensions (lowercase, without dot) this reader handles.
    fn file_extensions(&self) -> &'static [&'static str];

    fn parse(&self, path: &Path, content: &str) -> ApplicationResult<Mapping>;
}

/// YAML reader backed by serde_yaml.
#[derive(Debug, Default)]
pub struct YamlReader;

impl Reader for YamlReader {
    fn file_extensions(&self) -> &'static [&'static str] {
        &["yml", "yaml"]
    }

    fn parse(&self, path: &Path, content: &str) -> ApplicationResult<Mapping> {
        let parse_err = |message: String| ApplicationError::Parse {
            path: path.to_path_buf(),
            message,
        };

        let raw: YamlValue = serde_yaml::from_str(content).map_err(|e| parse_err(e.to_string()))?;
        match convert(raw).map_err(parse_err)? {
            Value::Mapping(mapping) if !mapping.is_empty() => {
                debug!("parsed {} top-level entries from {}", mapping.len(), path.display());
                Ok(mapping)
            }
            Value::Mapping(_) | Value::Null => {
                Err(parse_err("Given data is not valid Yaml".to_string()))
            }
            other => Err(parse_err(format!(
                "top level must be a mapping, found {}",
                other.kind()
            ))),
        }
    }
}

/// Picks a reader from the file extension.
pub fn reader_for(path: &Path) -> ApplicationResult<Box<dyn Reader>> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();

    let yaml = YamlReader;
    if yaml.file_extensions().contains(&extension.as_str()) {
        return Ok(Box::new(yaml));
    }
    Err(ApplicationError::UnsupportedFormat(path.to_path_buf()))
}

fn convert(value: YamlValue) -> Result<Value, String> {
    Ok(match value {
        YamlValue::Null => Value::Null,
        YamlValue::Bool(b) => Value::Bool(b),
        YamlValue::Number(n) => match n.as_i64() {
            Some(i) => Value::Integer(i),
            None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
        },
        YamlValue::String(s) => Value::String(s),
        YamlValue::Sequence(items) => Value::Sequence(
            items
                .into_iter()
                .map(convert)
                .collect::<Result<Vec<_>, _>>()?,
        ),
        YamlValue::Mapping(entries) => {
            let mut mapping = Mapping::with_capacity(entries.len());
            for (k, v) in entries {
                mapping.push((convert_key(k)?, convert(v)?));
            }
            Value::Mapping(mapping)
        }
        YamlValue::Tagged(tagged) => convert(tagged.value)?,
    })
}

fn convert_key(key: YamlValue) -> Result<String, String> {
    match key {
        YamlValue::String(s) => Ok(s),
        YamlValue::Number(n) => Ok(n.to_string()),
        YamlValue::Bool(b) => Ok(b.to_string()),
        other => Err(format!("unsupported mapping key: {:?}", other)),
    }
}
