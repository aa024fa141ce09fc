//! Settings for the `hcloverlay` tool.
//!
//! The struct is the single source of truth for which keys exist, their
//! defaults and their documentation. Layering, env var mapping and template
//! generation all derive from it.
//!
//! | Env var                        | Key            |
//! |--------------------------------|----------------|
//! | `HCLOVERLAY__BASE`             | `base`         |
//! | `HCLOVERLAY__OVERLAY`          | `overlay`      |
//! | `HCLOVERLAY__OUTPUT__PATH`     | `output.path`  |
//! | `HCLOVERLAY__OUTPUT__STYLE`    | `output.style` |
//! | `HCLOVERLAY__MERGE__ORDER`     | `merge.order`  |

use std::path::PathBuf;

use confique::Config;
use serde::{Deserialize, Serialize};

use crate::merge::MergeOptions;
use crate::types::{BlockOrder, OutputStyle};

#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct OverlaySettings {
    /// Base document to patch.
    #[config(default = "base.hcl")]
    pub base: PathBuf,

    /// Overlay document supplying overrides and additions.
    #[config(default = "overlay.hcl")]
    pub overlay: PathBuf,

    /// Where and how the merged document is written.
    #[config(nested)]
    pub output: OutputSettings,

    /// Merge behavior.
    #[config(nested)]
    pub merge: MergeSettings,
}

#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct OutputSettings {
    /// Write the merged document to this file instead of stdout.
    pub path: Option<PathBuf>,

    /// "preserve" keeps the base layout and comments, "canonical" reprints everything.
    #[config(default = "preserve")]
    pub style: OutputStyle,
}

#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct MergeSettings {
    /// Order of reassembled resource and data blocks: "source" or "sorted".
    #[config(default = "source")]
    pub order: BlockOrder,
}

impl OverlaySettings {
    pub fn merge_options(&self) -> MergeOptions {
        MergeOptions {
            order: self.merge.order,
            overlay_name: self.overlay.display().to_string(),
        }
    }
}
