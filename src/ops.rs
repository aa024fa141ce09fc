//! Settings operations behind `config gen` and `config list`.

use std::fmt;
use std::path::PathBuf;

use confique::Config;
use serde::Serialize;

use crate::error::OverlayError;
use crate::overrides::valid_keys;

/// Result of a settings operation. Returned to the caller for display.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigResult {
    /// A generated TOML template.
    Template(String),
    /// Confirmation that a template was written to a file.
    TemplateWritten { path: PathBuf },
    /// Every resolved key with its display value.
    Listing { entries: Vec<(String, String)> },
}

impl fmt::Display for ConfigResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigResult::Template(t) => write!(f, "{t}"),
            ConfigResult::TemplateWritten { path } => {
                write!(f, "Settings template written to {}", path.display())
            }
            ConfigResult::Listing { entries } => {
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        writeln!(f)?;
                    }
                    write!(f, "{key} = {value}")?;
                }
                Ok(())
            }
        }
    }
}

/// Commented TOML template built from the settings struct's doc comments.
pub fn generate_template<C: Config>() -> String {
    confique::toml::template::<C>(confique::toml::FormatOptions::default())
}

/// List all resolved values as dotted key/value pairs, in declaration order.
///
/// Optional keys without a value are shown as `<not set>`.
pub fn list_values<C: Config + Serialize>(settings: &C) -> Result<ConfigResult, OverlayError> {
    let value = toml::Value::try_from(settings).map_err(|e| OverlayError::InvalidValue {
        key: "<list>".into(),
        reason: e.to_string(),
    })?;
    let table = value.as_table().ok_or_else(|| OverlayError::InvalidValue {
        key: "<list>".into(),
        reason: "settings did not serialize to a table".into(),
    })?;

    let entries = valid_keys(&C::META)
        .into_iter()
        .map(|key| {
            let display = match table_get(table, &key) {
                Some(v) => format_value(v),
                None => "<not set>".to_string(),
            };
            (key, display)
        })
        .collect();

    Ok(ConfigResult::Listing { entries })
}

/// Navigate a `toml::Table` by dotted key path (e.g. `"output.style"`).
pub fn table_get<'a>(table: &'a toml::Table, dotted_key: &str) -> Option<&'a toml::Value> {
    let Some((path, leaf)) = dotted_key.rsplit_once('.') else {
        return table.get(dotted_key);
    };
    let mut current = table;
    for segment in path.split('.') {
        current = current.get(segment)?.as_table()?;
    }
    current.get(leaf)
}

fn format_value(value: &toml::Value) -> String {
    match value {
        toml::Value::String(s) => s.clone(),
        toml::Value::Integer(i) => i.to_string(),
        toml::Value::Float(f) => f.to_string(),
        toml::Value::Boolean(b) => b.to_string(),
        other => other.to_string(),
    }
}
