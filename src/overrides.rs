//! Convert dotted-key CLI overrides into a nested `toml::Table`.

use confique::meta::{FieldKind, Meta};
use toml::{Table, Value};

use crate::error::OverlayError;

/// Convert dotted-key overrides into a nested `toml::Table`.
///
/// `("output.style", "canonical")` becomes `{output = {style = "canonical"}}`.
/// If multiple entries target the same key, the last one wins.
pub fn overrides_to_table(entries: &[(String, Value)]) -> Result<Table, OverlayError> {
    let mut table = Table::new();
    for (dotted_key, value) in entries {
        set_nested(&mut table, dotted_key, value.clone())?;
    }
    Ok(table)
}

fn set_nested(table: &mut Table, dotted_key: &str, value: Value) -> Result<(), OverlayError> {
    let Some((path, leaf)) = dotted_key.rsplit_once('.') else {
        table.insert(dotted_key.to_string(), value);
        return Ok(());
    };

    let mut current = table;
    for segment in path.split('.') {
        current = current
            .entry(segment)
            .or_insert_with(|| Value::Table(Table::new()))
            .as_table_mut()
            .ok_or_else(|| OverlayError::InvalidValue {
                key: dotted_key.to_string(),
                reason: format!("'{segment}' is already set to a plain value"),
            })?;
    }
    current.insert(leaf.to_string(), value);
    Ok(())
}

/// All leaf key paths of a confique `Meta` tree, in declaration order.
///
/// Returns dotted paths like `"base"` and `"output.style"`. Section names are
/// not included.
pub fn valid_keys(meta: &Meta) -> Vec<String> {
    let mut keys = Vec::new();
    collect_keys(meta, "", &mut keys);
    keys
}

fn collect_keys(meta: &Meta, prefix: &str, keys: &mut Vec<String>) {
    for field in meta.fields {
        let dotted = if prefix.is_empty() {
            field.name.to_string()
        } else {
            format!("{prefix}.{}", field.name)
        };
        match &field.kind {
            FieldKind::Leaf { .. } => keys.push(dotted),
            FieldKind::Nested { meta, .. } => collect_keys(meta, &dotted, keys),
        }
    }
}
