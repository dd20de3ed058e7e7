//! Raw block records: the external, serializable document representation.
//!
//! The wire shape is an object with an `entityMap` and an ordered list of
//! block records (`key`, `text`, `type`, `depth`, `inlineStyleRanges`,
//! `entityRanges`, `data`), with camelCase field names. Conversion to the
//! in-memory [`Document`] validates the records; conversion back is
//! lossless.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use super::block::{Block, BlockKey, BlockType, EntityRange, InlineStyle};
use super::content::Document;

/// A full document in the external representation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawDocument {
    #[serde(default)]
    pub entity_map: Map<String, Value>,
    pub blocks: Vec<RawBlock>,
}

/// A single block record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawBlock {
    pub key: String,
    pub text: String,
    #[serde(rename = "type")]
    pub block_type: String,
    #[serde(default)]
    pub depth: usize,
    #[serde(default)]
    pub inline_style_ranges: Vec<RawStyleRange>,
    #[serde(default)]
    pub entity_ranges: Vec<RawEntityRange>,
    #[serde(default)]
    pub data: Map<String, Value>,
}

/// A styled run within a block record, in char offsets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawStyleRange {
    pub offset: usize,
    pub length: usize,
    pub style: String,
}

/// An entity run within a block record, carried opaquely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawEntityRange {
    pub offset: usize,
    pub length: usize,
    pub key: u64,
}

/// Validation failures when converting raw records into a [`Document`].
#[derive(Debug, Error)]
pub enum RawError {
    #[error("unknown block type `{0}`")]
    UnknownBlockType(String),

    #[error("duplicate block key `{0}`")]
    DuplicateBlockKey(String),

    #[error("style range {offset}+{length} exceeds length {len} of block `{key}`")]
    StyleRangeOutOfBounds {
        key: String,
        offset: usize,
        length: usize,
        len: usize,
    },

    #[error("document has no blocks")]
    EmptyDocument,
}

impl RawDocument {
    /// Build the external representation of a document.
    pub fn from_document(document: &Document) -> Self {
        let blocks = document
            .blocks()
            .iter()
            .map(|block| RawBlock {
                key: block.key().as_str().to_string(),
                text: block.text().to_string(),
                block_type: block.kind().as_str().to_string(),
                depth: block.depth(),
                inline_style_ranges: block
                    .style_ranges()
                    .into_iter()
                    .map(|styled| RawStyleRange {
                        offset: styled.range.start,
                        length: styled.range.end - styled.range.start,
                        style: styled.style.name().to_string(),
                    })
                    .collect(),
                entity_ranges: block
                    .entity_ranges()
                    .iter()
                    .map(|entity| RawEntityRange {
                        offset: entity.offset,
                        length: entity.length,
                        key: entity.key,
                    })
                    .collect(),
                data: block.data().clone(),
            })
            .collect();
        Self {
            entity_map: document.entity_map().clone(),
            blocks,
        }
    }

    /// Validate the records and build the in-memory document.
    ///
    /// # Errors
    ///
    /// Returns a [`RawError`] when the block list is empty, a block type is
    /// outside the known vocabulary, a key appears twice, or a style range
    /// reaches past its block's text.
    pub fn into_document(self) -> Result<Document, RawError> {
        if self.blocks.is_empty() {
            return Err(RawError::EmptyDocument);
        }

        let mut seen = HashSet::new();
        let mut blocks = Vec::with_capacity(self.blocks.len());
        for record in self.blocks {
            if !seen.insert(record.key.clone()) {
                return Err(RawError::DuplicateBlockKey(record.key));
            }
            let kind = BlockType::parse(&record.block_type)
                .ok_or_else(|| RawError::UnknownBlockType(record.block_type))?;

            let len = record.text.chars().count();
            for styled in &record.inline_style_ranges {
                if styled.offset.saturating_add(styled.length) > len {
                    return Err(RawError::StyleRangeOutOfBounds {
                        key: record.key.clone(),
                        offset: styled.offset,
                        length: styled.length,
                        len,
                    });
                }
            }

            let mut block = Block::new(BlockKey::new(record.key), kind, record.text)
                .with_depth(record.depth)
                .with_data(record.data)
                .with_entity_ranges(
                    record
                        .entity_ranges
                        .iter()
                        .map(|entity| EntityRange {
                            offset: entity.offset,
                            length: entity.length,
                            key: entity.key,
                        })
                        .collect(),
                );
            for styled in &record.inline_style_ranges {
                block.apply_style(
                    styled.offset..styled.offset + styled.length,
                    &InlineStyle::from_name(&styled.style),
                );
            }
            blocks.push(block);
        }

        Ok(Document::new(blocks).with_entity_map(self.entity_map))
    }
}

impl Document {
    /// Build the external representation of this document.
    pub fn to_raw(&self) -> RawDocument {
        RawDocument::from_document(self)
    }

    /// Validate raw records and build a document.
    ///
    /// # Errors
    ///
    /// See [`RawDocument::into_document`].
    pub fn from_raw(raw: RawDocument) -> Result<Self, RawError> {
        raw.into_document()
    }
}
