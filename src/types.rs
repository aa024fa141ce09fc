//! Small shared types: output and ordering choices, settings discovery
//! locations, and the settings operations exposed on the command line.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// How the merged document is printed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum OutputStyle {
    /// Keep the base document's layout and comments where they were not touched.
    #[default]
    Preserve,
    /// Reprint the whole document in canonical HCL layout. Comments are dropped.
    Canonical,
}

/// Order in which extracted `resource` and `data` blocks are put back.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum BlockOrder {
    /// Order in which each identity key first appeared in the base document.
    #[default]
    Source,
    /// Sorted by identity key.
    Sorted,
}

/// Where to look for settings files.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchPath {
    /// Platform config directory (XDG on Linux, ~/Library/Application Support on macOS).
    Platform,
    /// Current working directory.
    Cwd,
    /// An explicit directory.
    Path(PathBuf),
}

/// A settings operation, independent of any CLI framework.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigAction {
    List,
    Gen { output: Option<PathBuf> },
}
