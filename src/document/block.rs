//! Core block types.

use std::collections::BTreeSet;
use std::fmt;
use std::ops::Range;

use serde_json::{Map, Value};

/// Opaque identifier for a block within a document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockKey(String);

impl BlockKey {
    /// Create a key from any string-like value.
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Get the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BlockKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BlockKey {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

impl From<String> for BlockKey {
    fn from(key: String) -> Self {
        Self(key)
    }
}

/// Kind of a block, mirroring the external block-record vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockType {
    /// Plain paragraph text
    Unstyled,
    /// Level 1 heading
    HeaderOne,
    /// Level 2 heading
    HeaderTwo,
    /// Level 3 heading
    HeaderThree,
    /// Level 4 heading
    HeaderFour,
    /// Level 5 heading
    HeaderFive,
    /// Level 6 heading
    HeaderSix,
    /// Block quote
    Blockquote,
    /// Fenced code block
    CodeBlock,
    /// Bulleted list item
    UnorderedListItem,
    /// Numbered list item
    OrderedListItem,
}

impl BlockType {
    /// The wire name used by the external block-record representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unstyled => "unstyled",
            Self::HeaderOne => "header-one",
            Self::HeaderTwo => "header-two",
            Self::HeaderThree => "header-three",
            Self::HeaderFour => "header-four",
            Self::HeaderFive => "header-five",
            Self::HeaderSix => "header-six",
            Self::Blockquote => "blockquote",
            Self::CodeBlock => "code-block",
            Self::UnorderedListItem => "unordered-list-item",
            Self::OrderedListItem => "ordered-list-item",
        }
    }

    /// Parse a wire name back into a block type.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "unstyled" => Some(Self::Unstyled),
            "header-one" => Some(Self::HeaderOne),
            "header-two" => Some(Self::HeaderTwo),
            "header-three" => Some(Self::HeaderThree),
            "header-four" => Some(Self::HeaderFour),
            "header-five" => Some(Self::HeaderFive),
            "header-six" => Some(Self::HeaderSix),
            "blockquote" => Some(Self::Blockquote),
            "code-block" => Some(Self::CodeBlock),
            "unordered-list-item" => Some(Self::UnorderedListItem),
            "ordered-list-item" => Some(Self::OrderedListItem),
            _ => None,
        }
    }

    /// The heading type for a level between 1 and 6.
    pub const fn header(level: u8) -> Option<Self> {
        match level {
            1 => Some(Self::HeaderOne),
            2 => Some(Self::HeaderTwo),
            3 => Some(Self::HeaderThree),
            4 => Some(Self::HeaderFour),
            5 => Some(Self::HeaderFive),
            6 => Some(Self::HeaderSix),
            _ => None,
        }
    }
}

impl fmt::Display for BlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An inline style label attached to individual characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum InlineStyle {
    Bold,
    Italic,
    Code,
    Strikethrough,
    /// Any label outside the built-in vocabulary, carried verbatim.
    Custom(String),
}

impl InlineStyle {
    /// The wire name used by the external block-record representation.
    pub fn name(&self) -> &str {
        match self {
            Self::Bold => "BOLD",
            Self::Italic => "ITALIC",
            Self::Code => "CODE",
            Self::Strikethrough => "STRIKETHROUGH",
            Self::Custom(name) => name,
        }
    }

    /// Map a wire name to a style; unknown labels become [`InlineStyle::Custom`].
    pub fn from_name(name: &str) -> Self {
        match name {
            "BOLD" => Self::Bold,
            "ITALIC" => Self::Italic,
            "CODE" => Self::Code,
            "STRIKETHROUGH" => Self::Strikethrough,
            other => Self::Custom(other.to_string()),
        }
    }
}

impl fmt::Display for InlineStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The set of styles carried by a single character.
///
/// A `BTreeSet` keeps iteration order deterministic, which in turn keeps
/// derived style ranges and serialized output stable.
pub type StyleSet = BTreeSet<InlineStyle>;

/// A coalesced run of one style over a block's text, in char offsets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleRange {
    pub style: InlineStyle,
    pub range: Range<usize>,
}

/// An entity annotation over a block's text, carried opaquely.
///
/// Entities are not interpreted by this crate; they survive round-trips
/// through the external representation. Edits retarget the offsets so a
/// range stays attached to the chars it annotated: removals shift and
/// trim it, and text inserted inside it splits it, since inserted chars
/// carry no entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityRange {
    pub offset: usize,
    pub length: usize,
    pub key: u64,
}

/// A single line/paragraph unit of the document.
///
/// Styles are stored per character (one [`StyleSet`] for each char of
/// `text`), which keeps range arithmetic exact under insertion and removal.
/// The range-oriented view used by the external representation is derived
/// on demand via [`Block::style_ranges`].
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    key: BlockKey,
    kind: BlockType,
    text: String,
    /// One entry per char of `text`.
    styles: Vec<StyleSet>,
    depth: usize,
    data: Map<String, Value>,
    entity_ranges: Vec<EntityRange>,
}

impl Block {
    /// Create a block with unstyled text.
    pub fn new(key: BlockKey, kind: BlockType, text: impl Into<String>) -> Self {
        let text = text.into();
        let styles = vec![StyleSet::new(); text.chars().count()];
        Self {
            key,
            kind,
            text,
            styles,
            depth: 0,
            data: Map::new(),
            entity_ranges: Vec::new(),
        }
    }

    /// Set the nesting depth.
    #[must_use]
    pub const fn with_depth(mut self, depth: usize) -> Self {
        self.depth = depth;
        self
    }

    /// Set the metadata map.
    #[must_use]
    pub fn with_data(mut self, data: Map<String, Value>) -> Self {
        self.data = data;
        self
    }

    /// Set the opaque entity annotations.
    #[must_use]
    pub fn with_entity_ranges(mut self, entity_ranges: Vec<EntityRange>) -> Self {
        self.entity_ranges = entity_ranges;
        self
    }

    /// The block's key.
    pub const fn key(&self) -> &BlockKey {
        &self.key
    }

    /// The block's kind.
    pub const fn kind(&self) -> BlockType {
        self.kind
    }

    /// The block's text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The nesting depth.
    pub const fn depth(&self) -> usize {
        self.depth
    }

    /// The metadata map.
    pub const fn data(&self) -> &Map<String, Value> {
        &self.data
    }

    /// The opaque entity annotations.
    pub fn entity_ranges(&self) -> &[EntityRange] {
        &self.entity_ranges
    }

    /// Length of the text in chars.
    pub const fn len(&self) -> usize {
        self.styles.len()
    }

    /// Returns true if the block has no text.
    pub const fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }

    /// The style set of the character at a char offset.
    pub fn styles_at(&self, offset: usize) -> Option<&StyleSet> {
        self.styles.get(offset)
    }

    /// Derive the coalesced per-style ranges over the text.
    ///
    /// Adjacent characters carrying the same style label merge into one
    /// range. Ranges are ordered by start offset, then by style, so the
    /// output is deterministic for a given block.
    pub fn style_ranges(&self) -> Vec<StyleRange> {
        let mut ranges = Vec::new();
        let mut open: Vec<(InlineStyle, usize)> = Vec::new();

        for (offset, set) in self.styles.iter().enumerate() {
            open.retain(|(style, start)| {
                if set.contains(style) {
                    true
                } else {
                    ranges.push(StyleRange {
                        style: style.clone(),
                        range: *start..offset,
                    });
                    false
                }
            });
            for style in set {
                if !open.iter().any(|(s, _)| s == style) {
                    open.push((style.clone(), offset));
                }
            }
        }
        for (style, start) in open {
            ranges.push(StyleRange {
                style,
                range: start..self.styles.len(),
            });
        }

        ranges.sort_by(|a, b| {
            a.range
                .start
                .cmp(&b.range.start)
                .then_with(|| a.style.cmp(&b.style))
        });
        ranges
    }

    /// Insert text at a char offset, each inserted char carrying `styles`.
    pub fn insert_text(&mut self, offset: usize, text: &str, styles: &StyleSet) {
        debug_assert!(offset <= self.len(), "insert offset {offset} out of bounds");
        let offset = offset.min(self.len());
        let byte = self.byte_at(offset);
        self.text.insert_str(byte, text);
        let count = text.chars().count();
        self.styles
            .splice(offset..offset, std::iter::repeat_n(styles.clone(), count));
        if count > 0 {
            self.shift_entities_for_insert(offset, count);
        }
    }

    /// Remove a char range of text together with its style metadata.
    ///
    /// The range is clamped to the text length; an empty (or inverted)
    /// range is a no-op. Entity annotations after the removal shift
    /// left; annotations overlapping it lose the removed chars.
    pub fn remove_range(&mut self, range: Range<usize>) {
        let range = self.clamp(range);
        if range.is_empty() {
            return;
        }
        let start = self.byte_at(range.start);
        let end = self.byte_at(range.end);
        self.text.replace_range(start..end, "");
        self.entity_ranges.retain_mut(|entity| {
            let entity_end = entity.offset.saturating_add(entity.length);
            let overlap = entity_end
                .min(range.end)
                .saturating_sub(entity.offset.max(range.start));
            entity.offset -= entity.offset.clamp(range.start, range.end) - range.start;
            entity.length -= overlap;
            entity.length > 0
        });
        self.styles.drain(range);
    }

    /// Add a style label to every character in a char range.
    ///
    /// The range is clamped to the text length.
    pub fn apply_style(&mut self, range: Range<usize>, style: &InlineStyle) {
        let range = self.clamp(range);
        for set in &mut self.styles[range] {
            set.insert(style.clone());
        }
    }

    /// Remove every style label from every character in a char range.
    ///
    /// The range is clamped to the text length.
    pub fn clear_styles(&mut self, range: Range<usize>) {
        let range = self.clamp(range);
        for set in &mut self.styles[range] {
            set.clear();
        }
    }

    /// Merge entries into the metadata map, overwriting existing keys.
    pub fn merge_data(&mut self, entries: &Map<String, Value>) {
        for (key, value) in entries {
            self.data.insert(key.clone(), value.clone());
        }
    }

    // --- Private helpers ---

    /// Retarget entity annotations around `count` chars inserted at `at`.
    fn shift_entities_for_insert(&mut self, at: usize, count: usize) {
        let mut shifted = Vec::with_capacity(self.entity_ranges.len());
        for entity in &self.entity_ranges {
            let entity_end = entity.offset.saturating_add(entity.length);
            if at <= entity.offset {
                shifted.push(EntityRange {
                    offset: entity.offset.saturating_add(count),
                    length: entity.length,
                    key: entity.key,
                });
            } else if at >= entity_end {
                shifted.push(*entity);
            } else {
                // Inserted chars carry no entity, so the range splits
                // around them.
                shifted.push(EntityRange {
                    offset: entity.offset,
                    length: at - entity.offset,
                    key: entity.key,
                });
                shifted.push(EntityRange {
                    offset: at + count,
                    length: entity_end - at,
                    key: entity.key,
                });
            }
        }
        self.entity_ranges = shifted;
    }

    /// Byte offset of a char offset; the text length when past the end.
    fn byte_at(&self, offset: usize) -> usize {
        self.text
            .char_indices()
            .nth(offset)
            .map_or(self.text.len(), |(byte, _)| byte)
    }

    fn clamp(&self, range: Range<usize>) -> Range<usize> {
        debug_assert!(
            range.start <= range.end,
            "inverted range {}..{}",
            range.start,
            range.end
        );
        let end = range.end.min(self.len());
        let start = range.start.min(end);
        start..end
    }
}
