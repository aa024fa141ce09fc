//! Settings resolution: merge all layers and produce typed settings.
//!
//! Operates on pre-loaded data (`ResolveInput`) with no I/O, so the whole
//! pipeline is testable with synthetic inputs. Steps:
//!
//! 1. Reject unknown keys in each settings file
//! 2. Parse and deep-merge settings files (later overrides earlier)
//! 3. Deep-merge env vars on top
//! 4. Deep-merge CLI overrides on top (highest priority)
//! 5. Deserialize the merged table into `C::Layer`
//! 6. Let confique fill defaults and validate required fields

use std::path::PathBuf;

use confique::Config;
use serde::Deserialize;
use toml::{Table, Value};
use tracing::trace;

use crate::env;
use crate::error::OverlayError;
use crate::overrides;
use crate::validate;

/// All pre-loaded data needed to resolve settings. No I/O happens here.
pub struct ResolveInput {
    /// File contents in precedence order: first = lowest priority, last = highest.
    pub files: Vec<(PathBuf, String)>,
    /// Raw environment variable pairs.
    pub env_vars: Vec<(String, String)>,
    /// Env var prefix (e.g. `"HCLOVERLAY"`). `None` disables the env layer.
    pub env_prefix: Option<String>,
    /// CLI overrides as `(dotted_key, value)` pairs.
    pub cli_overrides: Vec<(String, Value)>,
}

/// Deep-merge `overlay` on top of `base`.
///
/// Tables present on both sides are merged recursively; any other value from
/// `overlay` replaces the one in `base`.
pub fn deep_merge(mut base: Table, overlay: Table) -> Table {
    for (key, overlay_val) in overlay {
        match (base.remove(&key), overlay_val) {
            (Some(Value::Table(base_tbl)), Value::Table(overlay_tbl)) => {
                base.insert(key, Value::Table(deep_merge(base_tbl, overlay_tbl)));
            }
            (_, overlay_val) => {
                base.insert(key, overlay_val);
            }
        }
    }
    base
}

/// Resolve settings from pre-loaded inputs.
pub fn resolve<C: Config>(input: ResolveInput) -> Result<C, OverlayError>
where
    C::Layer: for<'de> Deserialize<'de>,
{
    let mut merged = Table::new();
    for (path, content) in &input.files {
        validate::validate_unknown_keys::<C>(content, path)?;
        let table: Table = toml::from_str(content).map_err(|e| OverlayError::SettingsParse {
            path: path.clone(),
            source: e,
        })?;
        trace!(path = %path.display(), keys = table.len(), "settings file layer");
        merged = deep_merge(merged, table);
    }

    if let Some(prefix) = &input.env_prefix {
        let env_table = env::env_to_table(prefix, input.env_vars);
        trace!(keys = env_table.len(), "env layer");
        merged = deep_merge(merged, env_table);
    }

    if !input.cli_overrides.is_empty() {
        let cli_table = overrides::overrides_to_table(&input.cli_overrides)?;
        merged = deep_merge(merged, cli_table);
    }

    let layer: C::Layer = Value::Table(merged)
        .try_into()
        .map_err(|e: toml::de::Error| OverlayError::InvalidValue {
            key: "<merged>".into(),
            reason: e.to_string(),
        })?;

    C::builder()
        .preloaded(layer)
        .load()
        .map_err(OverlayError::from)
}
