//! Strict-mode validation: detect unknown keys in settings files.
//!
//! Deserializes into `C::Layer` (all-optional fields) through `serde_ignored`
//! and reports every key the layer does not consume, with the file path and a
//! best-effort line number.

use std::path::Path;

use confique::Config;
use serde::Deserialize;

use crate::error::OverlayError;

/// Fail if `content` contains keys unknown to settings type `C`.
pub fn validate_unknown_keys<C: Config>(content: &str, path: &Path) -> Result<(), OverlayError>
where
    C::Layer: for<'de> Deserialize<'de>,
{
    let mut unknown_keys: Vec<String> = Vec::new();

    let deserializer = toml::Deserializer::new(content);
    let _layer: C::Layer = serde_ignored::deserialize(deserializer, |ignored_path| {
        unknown_keys.push(ignored_path.to_string());
    })
    .map_err(|e| OverlayError::SettingsParse {
        path: path.to_path_buf(),
        source: e,
    })?;

    if unknown_keys.is_empty() {
        return Ok(());
    }

    let errors = unknown_keys
        .into_iter()
        .map(|key| {
            let line = find_key_line(content, &key);
            OverlayError::UnknownKey {
                key,
                path: path.to_path_buf(),
                line,
            }
        })
        .collect();

    Err(OverlayError::UnknownKeys(errors))
}

/// 1-indexed line of a dotted key in TOML text, or 0 if it cannot be found.
///
/// Tracks `[section]` headers and only matches the leaf inside the expected
/// section. Quoted keys and inline tables are not handled.
fn find_key_line(content: &str, dotted_key: &str) -> usize {
    let (section, leaf) = match dotted_key.rsplit_once('.') {
        Some((section, leaf)) => (section.split('.').collect::<Vec<_>>(), leaf),
        None => (Vec::new(), dotted_key),
    };

    let mut current: Vec<&str> = Vec::new();
    for (i, line) in content.lines().enumerate() {
        let trimmed = line.trim();

        if trimmed.starts_with('[') && !trimmed.starts_with("[[") {
            let header = trimmed.trim_start_matches('[').trim_end_matches(']');
            current = header.split('.').map(str::trim).collect();
            continue;
        }

        if current == section
            && let Some(after_key) = trimmed.strip_prefix(leaf)
            && after_key.trim_start().starts_with('=')
        {
            return i + 1;
        }
    }
    0
}
