//! Settings file discovery and loading.
//!
//! Each [`SearchPath`] resolves to one directory, checked for
//! `{dir}/{file_name}`. All files found are returned in priority order (first
//! = lowest); the resolve pipeline layers them so later files win. Missing
//! files are skipped. Only real I/O errors (permissions, etc.) propagate.
//!
//! A settings file named explicitly (`--config`) is different: it must exist.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::OverlayError;
use crate::types::SearchPath;

/// Resolve a [`SearchPath`] to a concrete directory.
///
/// `app_name` picks the platform config directory (e.g. `~/.config/{app_name}/`
/// on Linux). Returns `None` when the directory cannot be determined.
pub fn resolve_search_path(sp: &SearchPath, app_name: &str) -> Option<PathBuf> {
    match sp {
        SearchPath::Platform => {
            let proj = directories::ProjectDirs::from("", "", app_name)?;
            Some(proj.config_dir().to_path_buf())
        }
        SearchPath::Cwd => std::env::current_dir().ok(),
        SearchPath::Path(p) => Some(p.clone()),
    }
}

/// Load every settings file found along `search_paths`, lowest priority first.
pub fn load_settings_files(
    search_paths: &[SearchPath],
    file_name: &str,
    app_name: &str,
) -> Result<Vec<(PathBuf, String)>, OverlayError> {
    let mut results = Vec::new();
    for dir in search_paths
        .iter()
        .filter_map(|sp| resolve_search_path(sp, app_name))
    {
        let file_path = dir.join(file_name);
        match std::fs::read_to_string(&file_path) {
            Ok(content) => {
                debug!(path = %file_path.display(), "loaded settings file");
                results.push((file_path, content));
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => continue,
            Err(e) => {
                return Err(OverlayError::Io {
                    path: file_path,
                    source: e,
                });
            }
        }
    }
    Ok(results)
}

/// Load a settings file the user named explicitly.
pub fn load_explicit_file(path: &Path) -> Result<(PathBuf, String), OverlayError> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok((path.to_path_buf(), content)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(OverlayError::MissingConfigFile(path.to_path_buf()))
        }
        Err(e) => Err(OverlayError::Io {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}
