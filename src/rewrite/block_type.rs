//! Block-type conversion for completed line markers.

use serde_json::{Map, Value};

use crate::document::{Block, BlockType};
use crate::selection::Selection;
use crate::state::{ChangeType, EditorState};

/// Convert the selection's start block to `kind` with `text` as its body.
///
/// A multi-block selection collapses into the start block: every block
/// after the start key through the selection's end key is deleted. The
/// start block keeps its key and depth; its per-char styles and entity
/// ranges reset, and `data` merges over its existing metadata, the new
/// entries winning. The selection collapses in the converted block at
/// the original start offset, clamped to the new text. Commits one
/// `change-block-type` history entry.
pub fn change_block_type(
    state: &EditorState,
    kind: BlockType,
    text: &str,
    data: Map<String, Value>,
) -> EditorState {
    let selection = state.selection();
    let start_key = selection.start_key().clone();
    let end_key = selection.end_key().clone();

    let source = state.document();
    let Some(block) = source.block(&start_key) else {
        debug_assert!(false, "selection start key {start_key} not in document");
        return state.clone();
    };
    let depth = block.depth();
    let mut merged = block.data().clone();
    for (name, value) in data {
        merged.insert(name, value);
    }

    let mut doomed = Vec::new();
    if start_key != end_key {
        let mut cursor = source.key_after(&start_key);
        while let Some(next) = cursor {
            doomed.push(next.clone());
            if *next == end_key {
                break;
            }
            cursor = source.key_after(next);
        }
    }

    let mut document = source.clone();
    document.remove_blocks(&doomed);
    document.replace_block(
        Block::new(start_key.clone(), kind, text)
            .with_depth(depth)
            .with_data(merged),
    );

    let offset = selection.start_offset().min(text.chars().count());
    let after = Selection::collapsed(start_key.clone(), offset);

    tracing::debug!(
        target: "markwright::rewrite",
        block = %start_key,
        kind = kind.as_str(),
        removed = doomed.len(),
        "block conversion"
    );

    state.push(document, after, ChangeType::ChangeBlockType)
}
