//! Orchestration: parse both documents, patch top-level attributes, merge
//! blocks, render.
//!
//! Nothing is printed or written here. The caller gets the rendered document
//! only when every step succeeded.

use std::path::Path;

use hcl_edit::structure::Body;
use tracing::{debug, info};

use crate::document::Document;
use crate::error::OverlayError;
use crate::merge::{MergeOptions, merge_blocks};
use crate::patch::patch_attributes;
use crate::settings::OverlaySettings;
use crate::types::OutputStyle;

/// Merge `overlay` into `base` in place.
///
/// Top-level attributes are patched strictly: a non-literal overlay attribute
/// fails the run. Then `resource` and `data` blocks are merged.
pub fn merge_bodies(
    base: &mut Body,
    overlay: &Body,
    options: &MergeOptions,
) -> Result<(), OverlayError> {
    patch_attributes(base, overlay, &options.overlay_name)?;
    merge_blocks(base, overlay, options)
}

/// Merge two documents given as text and render the result.
///
/// The overlay is reported under `options.overlay_name` in errors.
pub fn merge_sources(
    base: &str,
    base_name: &str,
    overlay: &str,
    options: &MergeOptions,
    style: OutputStyle,
) -> Result<String, OverlayError> {
    let mut base = Document::parse(base, base_name)?;
    let overlay = Document::parse(overlay, &options.overlay_name)?;
    merge_bodies(&mut base.body, &overlay.body, options)?;
    base.render(style)
}

/// Read the documents named in `settings`, merge them and render the result.
pub fn merge_files(settings: &OverlaySettings) -> Result<String, OverlayError> {
    let base = read_document(&settings.base)?;
    let overlay = read_document(&settings.overlay)?;
    info!(
        base = %settings.base.display(),
        overlay = %settings.overlay.display(),
        "merging documents"
    );
    merge_sources(
        &base,
        &settings.base.display().to_string(),
        &overlay,
        &settings.merge_options(),
        settings.output.style,
    )
}

/// Write the merged document to `path`, creating parent directories.
pub fn write_output(path: &Path, merged: &str) -> Result<(), OverlayError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|e| OverlayError::Io {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }
    debug!(path = %path.display(), "writing merged document");
    std::fs::write(path, merged).map_err(|e| OverlayError::Io {
        path: path.to_path_buf(),
        source: e,
    })
}

fn read_document(path: &Path) -> Result<String, OverlayError> {
    std::fs::read_to_string(path).map_err(|e| OverlayError::Io {
        path: path.to_path_buf(),
        source: e,
    })
}
