//! Block merging: match `resource` and `data` blocks across base and overlay
//! by identity and fold the overlay into the base.
//!
//! Only two block kinds take part. Every other kind (`variable`, `output`,
//! `provider`, `locals`, ...) stays in the base where it is and is never
//! overlaid. Matched blocks get their attributes patched and the overlay's
//! nested blocks appended; nested blocks are not matched by identity, so
//! merging the same pair twice duplicates them.

use std::fmt;

use hcl_edit::structure::{Block, Body, Structure};
use tracing::{debug, trace, warn};

use crate::document::separate;
use crate::error::OverlayError;
use crate::patch::{patch_literal_attributes, set_attribute_raw};
use crate::types::BlockOrder;

/// Knobs for a merge run.
#[derive(Debug, Clone)]
pub struct MergeOptions {
    /// Reassembly order for extracted blocks.
    pub order: BlockOrder,
    /// Name of the overlay document, used in error messages.
    pub overlay_name: String,
}

impl Default for MergeOptions {
    fn default() -> Self {
        MergeOptions {
            order: BlockOrder::default(),
            overlay_name: "overlay".into(),
        }
    }
}

/// Block kinds as far as merging is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Resource,
    Data,
    Locals,
    Other,
}

impl BlockKind {
    pub fn of(block: &Block) -> Self {
        match block.ident.as_str() {
            "resource" => BlockKind::Resource,
            "data" => BlockKind::Data,
            "locals" => BlockKind::Locals,
            _ => BlockKind::Other,
        }
    }

    pub fn is_mergeable(self) -> bool {
        matches!(self, BlockKind::Resource | BlockKind::Data)
    }
}

/// Identity of a block: its type plus its labels joined with `_`.
///
/// `resource "aws_instance" "web"` has the key `("resource", "aws_instance_web")`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BlockKey {
    pub ident: String,
    pub labels: String,
}

impl BlockKey {
    pub fn of(block: &Block) -> Self {
        let labels: Vec<&str> = block.labels.iter().map(|label| label.as_str()).collect();
        BlockKey {
            ident: block.ident.as_str().to_string(),
            labels: labels.join("_"),
        }
    }
}

impl fmt::Display for BlockKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.ident, self.labels)
    }
}

/// Blocks of one kind pulled out of the base, keyed by identity.
///
/// Keeps the order in which keys were first seen. A repeated key replaces the
/// earlier block in place.
#[derive(Debug, Default)]
struct KindIndex {
    entries: Vec<(BlockKey, Block)>,
}

impl KindIndex {
    fn insert(&mut self, key: BlockKey, block: Block) {
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => {
                debug!(key = %key, "duplicate base block, later one wins");
                entry.1 = block;
            }
            None => self.entries.push((key, block)),
        }
    }

    /// Remove the block stored under `key`, returning it with its slot.
    fn take(&mut self, key: &BlockKey) -> Option<(usize, Block)> {
        let position = self.entries.iter().position(|(k, _)| k == key)?;
        let (_, block) = self.entries.remove(position);
        Some((position, block))
    }

    fn into_blocks(mut self, order: BlockOrder) -> impl Iterator<Item = Block> {
        if order == BlockOrder::Sorted {
            self.entries.sort_by(|(a, _), (b, _)| a.cmp(b));
        }
        self.entries.into_iter().map(|(_, block)| block)
    }
}

/// Merge the overlay's top-level `resource` and `data` blocks into `base`.
///
/// 1. Every base block of a mergeable kind is pulled out and indexed by key.
/// 2. Each overlay block of a mergeable kind is merged into the base block with
///    the same key, or appended to `base` when there is none.
/// 3. The indexed blocks are put back at the end, resources first, then data,
///    each preceded by a blank line unless it opens the body.
///
/// On error `base` is left part way through and should be discarded.
pub fn merge_blocks(
    base: &mut Body,
    overlay: &Body,
    options: &MergeOptions,
) -> Result<(), OverlayError> {
    let mut resources = KindIndex::default();
    let mut data = KindIndex::default();

    for block in extract_mergeable(base) {
        let key = BlockKey::of(&block);
        trace!(key = %key, "extracted base block");
        match BlockKind::of(&block) {
            BlockKind::Resource => resources.insert(key, block),
            _ => data.insert(key, block),
        }
    }

    for overlay_block in overlay.blocks() {
        let index = match BlockKind::of(overlay_block) {
            BlockKind::Resource => &mut resources,
            BlockKind::Data => &mut data,
            BlockKind::Locals | BlockKind::Other => continue,
        };
        let key = BlockKey::of(overlay_block);
        match index.take(&key) {
            Some((position, base_block)) => {
                debug!(key = %key, "merging block");
                let merged = merge_block_pair(base_block, overlay_block, options)
                    .map_err(|e| e.in_block(key.to_string()))?;
                index.entries.insert(position, (key, merged));
            }
            None => {
                debug!(key = %key, "adding overlay block");
                base.push(overlay_block.clone());
            }
        }
    }

    for mut block in resources
        .into_blocks(options.order)
        .chain(data.into_blocks(options.order))
    {
        if !base.is_empty() {
            separate(&mut block);
        }
        base.push(block);
    }

    Ok(())
}

/// Remove every `resource` and `data` block from `body`, in document order.
fn extract_mergeable(body: &mut Body) -> Vec<Block> {
    let positions: Vec<usize> = body
        .iter()
        .enumerate()
        .filter_map(|(i, structure)| match structure {
            Structure::Block(block) if BlockKind::of(block).is_mergeable() => Some(i),
            _ => None,
        })
        .collect();

    let mut extracted = Vec::with_capacity(positions.len());
    for position in positions.into_iter().rev() {
        if let Structure::Block(block) = body.remove(position) {
            extracted.push(block);
        }
    }
    extracted.reverse();
    extracted
}

/// Fold `overlay` into `base` and return the merged block.
///
/// - Literal overlay attributes overwrite or extend the base attributes.
/// - Overlay attributes the base lacks are copied as written, which also
///   carries over non-literal ones.
/// - A non-literal overlay attribute the base already has is dropped and the
///   base value kept.
/// - Every nested overlay block is appended after a blank line, without any
///   identity matching.
pub fn merge_block_pair(
    mut base: Block,
    overlay: &Block,
    options: &MergeOptions,
) -> Result<Block, OverlayError> {
    let skipped = patch_literal_attributes(&mut base.body, &overlay.body, &options.overlay_name)?;
    for (attribute, reason) in &skipped {
        if base.body.has_attribute(attribute) {
            warn!(%attribute, %reason, "keeping base value over non-literal overlay attribute");
        }
    }

    for attr in overlay.body.attributes() {
        if base.body.get_attribute(attr.key.as_str()).is_none() {
            set_attribute_raw(&mut base.body, attr);
        }
    }

    for child in overlay.body.blocks() {
        let mut child = child.clone();
        separate(&mut child);
        base.body.push(child);
    }

    Ok(base)
}
