//! Ordered-collection operations over a step's block sequence.
//!
//! Every operation takes a snapshot slice and returns a brand-new `Vec`:
//! the UI re-render and the autosave watcher both detect change by snapshot
//! identity, so in-place mutation is never allowed here. Missing ids are
//! no-ops rather than errors — a render racing a state update must not be
//! able to corrupt or panic the document.

use crate::id::Id;
use crate::model::{Block, BlockData, BlockSettings};

/// Block-level patch. `data` replaces the payload whole — field-level merges
/// are the caller's job (renderers already build the full replacement record).
#[derive(Debug, Clone, Default)]
pub struct BlockPatch {
    pub data: Option<BlockData>,
    pub settings: Option<BlockSettings>,
}

impl BlockPatch {
    pub fn data(data: BlockData) -> Self {
        Self {
            data: Some(data),
            settings: None,
        }
    }

    pub fn settings(settings: BlockSettings) -> Self {
        Self {
            data: None,
            settings: Some(settings),
        }
    }
}

/// Insert `block` immediately after position `index`. `-1` prepends;
/// out-of-range indices clamp to the nearest valid bound.
pub fn insert_after(blocks: &[Block], block: Block, index: isize) -> Vec<Block> {
    let len = blocks.len() as isize;
    let at = (index + 1).clamp(0, len) as usize;
    let mut out = Vec::with_capacity(blocks.len() + 1);
    out.extend_from_slice(&blocks[..at]);
    out.push(block);
    out.extend_from_slice(&blocks[at..]);
    out
}

/// Apply `patch` to the block with `id`. No-op (fresh copy of the input) if
/// the id is not present.
pub fn update_by_id(blocks: &[Block], id: Id, patch: &BlockPatch) -> Vec<Block> {
    blocks
        .iter()
        .map(|b| {
            if b.id != id {
                return b.clone();
            }
            let mut updated = b.clone();
            if let Some(data) = &patch.data {
                updated.data = data.clone();
            }
            if let Some(settings) = &patch.settings {
                updated.settings = settings.clone();
            }
            updated
        })
        .collect()
}

/// Remove the block with `id`. No-op if not found.
pub fn delete_by_id(blocks: &[Block], id: Id) -> Vec<Block> {
    blocks.iter().filter(|b| b.id != id).cloned().collect()
}

/// Clone the block with `id` (fresh id on the clone) and insert the clone
/// immediately after the original. No-op if not found.
pub fn duplicate(blocks: &[Block], id: Id) -> Vec<Block> {
    let mut out = Vec::with_capacity(blocks.len() + 1);
    for b in blocks {
        out.push(b.clone());
        if b.id == id {
            out.push(b.cloned_with_new_id());
        }
    }
    out
}

/// Move the block `from` to the position currently occupied by `to`.
/// Array-move semantics (remove, then reinsert) — not a swap. No-op if
/// either id is missing or they are equal.
pub fn move_by_id(blocks: &[Block], from: Id, to: Id) -> Vec<Block> {
    let mut out: Vec<Block> = blocks.to_vec();
    if from == to {
        return out;
    }
    let (Some(from_idx), Some(to_idx)) = (
        out.iter().position(|b| b.id == from),
        out.iter().position(|b| b.id == to),
    ) else {
        return out;
    };
    let moved = out.remove(from_idx);
    out.insert(to_idx, moved);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BlockKind;
    use pretty_assertions::assert_eq;

    fn labeled(label: &str) -> Block {
        Block::with_data(BlockData::Text {
            content: label.to_string(),
        })
    }

    fn labels(blocks: &[Block]) -> Vec<&str> {
        blocks
            .iter()
            .map(|b| match &b.data {
                BlockData::Text { content } => content.as_str(),
                _ => "?",
            })
            .collect()
    }

    #[test]
    fn insert_after_minus_one_prepends() {
        let blocks = vec![labeled("a"), labeled("b")];
        let out = insert_after(&blocks, labeled("x"), -1);
        assert_eq!(labels(&out), vec!["x", "a", "b"]);
    }

    #[test]
    fn insert_after_last_appends() {
        let blocks = vec![labeled("a"), labeled("b")];
        let out = insert_after(&blocks, labeled("x"), 1);
        assert_eq!(labels(&out), vec!["a", "b", "x"]);
    }

    #[test]
    fn insert_after_out_of_range_clamps() {
        let blocks = vec![labeled("a")];
        let high = insert_after(&blocks, labeled("x"), 99);
        assert_eq!(labels(&high), vec!["a", "x"]);
        let low = insert_after(&blocks, labeled("y"), -42);
        assert_eq!(labels(&low), vec!["y", "a"]);
    }

    #[test]
    fn operations_leave_input_untouched() {
        let blocks = vec![labeled("a"), labeled("b"), labeled("c")];
        let snapshot = blocks.clone();
        let a = blocks[0].id;
        let b = blocks[1].id;

        let _ = insert_after(&blocks, labeled("x"), 0);
        let _ = update_by_id(
            &blocks,
            a,
            &BlockPatch::data(BlockData::Text {
                content: "changed".into(),
            }),
        );
        let _ = delete_by_id(&blocks, a);
        let _ = duplicate(&blocks, b);
        let _ = move_by_id(&blocks, a, b);

        assert_eq!(blocks, snapshot);
    }

    #[test]
    fn update_replaces_data_whole() {
        let blocks = vec![Block::new(BlockKind::Heading)];
        let id = blocks[0].id;
        let out = update_by_id(
            &blocks,
            id,
            &BlockPatch::data(BlockData::Heading {
                content: "Install".into(),
                level: 3,
            }),
        );
        assert_eq!(
            out[0].data,
            BlockData::Heading {
                content: "Install".into(),
                level: 3
            }
        );
        // id and settings survive the patch
        assert_eq!(out[0].id, id);
        assert_eq!(out[0].settings, blocks[0].settings);
    }

    #[test]
    fn update_missing_id_is_noop() {
        let blocks = vec![labeled("a")];
        let out = update_by_id(
            &blocks,
            Id::generate("blk"),
            &BlockPatch::data(BlockData::Text {
                content: "nope".into(),
            }),
        );
        assert_eq!(out, blocks);
    }

    #[test]
    fn delete_missing_id_is_noop() {
        let blocks = vec![labeled("a")];
        let out = delete_by_id(&blocks, Id::generate("blk"));
        assert_eq!(out, blocks);
    }

    #[test]
    fn duplicate_inserts_adjacent_clone_with_new_id() {
        let blocks = vec![labeled("a"), labeled("b")];
        let a = blocks[0].id;
        let out = duplicate(&blocks, a);
        assert_eq!(labels(&out), vec!["a", "a", "b"]);
        assert_ne!(out[1].id, a);
        assert_eq!(out[1].data, out[0].data);
    }

    #[test]
    fn move_is_array_move_not_swap() {
        let blocks = vec![labeled("A"), labeled("B"), labeled("C"), labeled("D")];
        let a = blocks[0].id;
        let c = blocks[2].id;
        let out = move_by_id(&blocks, a, c);
        assert_eq!(labels(&out), vec!["B", "C", "A", "D"]);
    }

    #[test]
    fn move_missing_or_equal_ids_is_noop() {
        let blocks = vec![labeled("a"), labeled("b")];
        let a = blocks[0].id;
        assert_eq!(move_by_id(&blocks, a, a), blocks);
        assert_eq!(move_by_id(&blocks, a, Id::generate("blk")), blocks);
        assert_eq!(move_by_id(&blocks, Id::generate("blk"), a), blocks);
    }
}
