//! Merge an overlay HCL document into a base document.
//!
//! The base is parsed into a format-preserving model, patched with the
//! overlay, and printed again. Comments and layout of everything the overlay
//! does not touch survive.
//!
//! ```ignore
//! let merged = hcloverlay::merge_sources(
//!     &base_text,
//!     "base.hcl",
//!     &overlay_text,
//!     &MergeOptions::default(),
//!     OutputStyle::Preserve,
//! )?;
//! ```
//!
//! # Merge rules
//!
//! - **Top-level attributes** are set by value. The overlay expression must
//!   evaluate to a literal without any variables or functions in scope; a
//!   reference such as `var.region` fails the whole merge.
//! - **`resource` and `data` blocks** are matched by type and labels. A
//!   matched pair is merged attribute by attribute; nested blocks from the
//!   overlay are appended, not merged. Unmatched overlay blocks are added.
//! - **Every other block** (`variable`, `locals`, `module`, `provider`, ...)
//!   is left as the base has it. Overlay copies are ignored.
//!
//! Inside a merged block, overlay attributes that are not literals are copied
//! verbatim when the base block lacks them. When the base block already has
//! the attribute, its value is kept and a warning is logged.
//!
//! # Settings
//!
//! The `hcloverlay` binary reads [`OverlaySettings`] through layers, lowest
//! priority first:
//!
//! ```text
//! Compiled defaults     #[config(default = ...)]
//!        ↑ overridden by
//! Settings files        hcloverlay.toml in the platform config dir, then cwd
//!        ↑ overridden by
//! --config FILE         must exist
//!        ↑ overridden by
//! Environment vars      HCLOVERLAY__OUTPUT__STYLE=canonical
//!        ↑ overridden by
//! Flags                 --base, --overlay, -o, --style, --order
//! ```
//!
//! `hcloverlay config gen` prints a commented settings template and
//! `hcloverlay config list` shows the resolved values.

pub mod error;
pub mod types;

mod builder;
#[cfg(feature = "clap")]
pub mod cli;
mod document;
mod env;
mod file;
mod literal;
mod merge;
mod ops;
mod overlay;
mod overrides;
mod patch;
mod resolve;
mod settings;
mod validate;

#[cfg(test)]
mod fixtures;

pub use builder::SettingsBuilder;
pub use document::{Document, parse_expression, render_body};
pub use error::OverlayError;
pub use literal::{Literal, evaluate};
pub use merge::{BlockKey, BlockKind, MergeOptions, merge_block_pair, merge_blocks};
pub use ops::ConfigResult;
pub use overlay::{merge_bodies, merge_files, merge_sources, write_output};
pub use patch::patch_attributes;
pub use settings::{MergeSettings, OutputSettings, OverlaySettings};
pub use types::{BlockOrder, ConfigAction, OutputStyle, SearchPath};
