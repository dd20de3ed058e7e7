//! The document: an ordered sequence of uniquely keyed blocks.

use std::ops::Range;

use serde_json::{Map, Value};

use super::block::{Block, BlockKey, BlockType, InlineStyle, StyleSet};

/// An ordered sequence of [`Block`]s plus the opaque entity table.
///
/// Block keys are unique within a document. Documents attached to an
/// editor-state snapshot are treated as immutable; edits clone the
/// document and mutate the clone before attaching it to a new snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    blocks: Vec<Block>,
    entity_map: Map<String, Value>,
}

impl Document {
    /// Create a document from blocks.
    pub fn new(blocks: Vec<Block>) -> Self {
        debug_assert!(
            {
                let mut keys: Vec<&BlockKey> = blocks.iter().map(Block::key).collect();
                keys.sort_unstable();
                keys.windows(2).all(|pair| pair[0] != pair[1])
            },
            "duplicate block keys"
        );
        Self {
            blocks,
            entity_map: Map::new(),
        }
    }

    /// Set the opaque entity table.
    #[must_use]
    pub fn with_entity_map(mut self, entity_map: Map<String, Value>) -> Self {
        self.entity_map = entity_map;
        self
    }

    /// Create a document from plain text, one unstyled block per line.
    ///
    /// Keys are assigned as `block-0`, `block-1`, ... with the index in
    /// base 32, so documents built from text have predictable keys.
    pub fn from_text(text: &str) -> Self {
        let blocks = text
            .split('\n')
            .enumerate()
            .map(|(index, line)| {
                Block::new(
                    BlockKey::new(format!("block-{}", to_base32(index))),
                    BlockType::Unstyled,
                    line,
                )
            })
            .collect();
        Self::new(blocks)
    }

    /// All blocks in order.
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// The opaque entity table.
    pub const fn entity_map(&self) -> &Map<String, Value> {
        &self.entity_map
    }

    /// Number of blocks.
    pub const fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Returns true if the document has no blocks.
    pub const fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Look up a block by key.
    pub fn block(&self, key: &BlockKey) -> Option<&Block> {
        self.blocks.iter().find(|block| block.key() == key)
    }

    /// The key of the block following the given key.
    pub fn key_after(&self, key: &BlockKey) -> Option<&BlockKey> {
        let index = self.index_of(key)?;
        self.blocks.get(index + 1).map(Block::key)
    }

    /// The key of the block preceding the given key.
    pub fn key_before(&self, key: &BlockKey) -> Option<&BlockKey> {
        let index = self.index_of(key)?;
        self.blocks.get(index.checked_sub(1)?).map(Block::key)
    }

    /// The first block.
    pub fn first_block(&self) -> Option<&Block> {
        self.blocks.first()
    }

    /// The last block.
    pub fn last_block(&self) -> Option<&Block> {
        self.blocks.last()
    }

    /// Remove a char range from a block's text.
    pub fn remove_range(&mut self, key: &BlockKey, range: Range<usize>) {
        if let Some(block) = self.block_mut(key) {
            block.remove_range(range);
        }
    }

    /// Insert text into a block, each inserted char carrying `styles`.
    pub fn insert_text(&mut self, key: &BlockKey, offset: usize, text: &str, styles: &StyleSet) {
        if let Some(block) = self.block_mut(key) {
            block.insert_text(offset, text, styles);
        }
    }

    /// Add a style label to a char range of a block.
    pub fn apply_style(&mut self, key: &BlockKey, range: Range<usize>, style: &InlineStyle) {
        if let Some(block) = self.block_mut(key) {
            block.apply_style(range, style);
        }
    }

    /// Remove all style labels from a char range of a block.
    pub fn clear_styles(&mut self, key: &BlockKey, range: Range<usize>) {
        if let Some(block) = self.block_mut(key) {
            block.clear_styles(range);
        }
    }

    /// Merge entries into a block's metadata map.
    pub fn merge_block_data(&mut self, key: &BlockKey, entries: &Map<String, Value>) {
        if let Some(block) = self.block_mut(key) {
            block.merge_data(entries);
        }
    }

    /// Replace the block with the same key as `block`, keeping its position.
    pub fn replace_block(&mut self, block: Block) {
        if let Some(slot) = self.block_mut(block.key()) {
            *slot = block;
        }
    }

    /// Remove the listed blocks, preserving the order of the rest.
    pub fn remove_blocks(&mut self, keys: &[BlockKey]) {
        self.blocks.retain(|block| !keys.contains(block.key()));
    }

    /// The styles a default (host) insertion at this point would inherit.
    ///
    /// Mirrors ordinary rich-text editor semantics: the character before
    /// the cursor; the first character when the cursor is at offset 0 of a
    /// non-empty block; and for an empty block, the last character of the
    /// nearest preceding non-empty block.
    pub fn styles_for_insertion(&self, key: &BlockKey, offset: usize) -> StyleSet {
        let Some(index) = self.index_of(key) else {
            return StyleSet::new();
        };
        let block = &self.blocks[index];
        if block.is_empty() {
            return self.blocks[..index]
                .iter()
                .rev()
                .find(|b| !b.is_empty())
                .and_then(|b| b.styles_at(b.len() - 1))
                .cloned()
                .unwrap_or_default();
        }
        let at = offset.saturating_sub(1);
        block.styles_at(at).cloned().unwrap_or_default()
    }

    // --- Private helpers ---

    fn index_of(&self, key: &BlockKey) -> Option<usize> {
        self.blocks.iter().position(|block| block.key() == key)
    }

    fn block_mut(&mut self, key: &BlockKey) -> Option<&mut Block> {
        let block = self.blocks.iter_mut().find(|block| block.key() == key);
        debug_assert!(block.is_some(), "unknown block key {key}");
        block
    }
}

/// Lowercase base-32 rendering of an index, `0-9a-v` digits.
fn to_base32(mut n: usize) -> String {
    const DIGITS: &[u8; 32] = b"0123456789abcdefghijklmnopqrstuv";
    if n == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::new();
    while n > 0 {
        digits.push(char::from(DIGITS[n % 32]));
        n /= 32;
    }
    digits.iter().rev().collect()
}
