//! Document model: blocks, per-character styles, and raw interchange.
//!
//! This module handles:
//! - Block storage with per-character inline-style sets
//! - Derived, coalesced style ranges for the external representation
//! - Validation and round-tripping of raw block records

mod block;
mod content;
mod raw;

pub use block::{Block, BlockKey, BlockType, EntityRange, InlineStyle, StyleRange, StyleSet};
pub use content::Document;
pub use raw::{RawBlock, RawDocument, RawEntityRange, RawError, RawStyleRange};
