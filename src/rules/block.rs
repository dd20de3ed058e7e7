//! Line-start marker patterns for block conversions.
//!
//! A marker fires when a typed space completes it, so the marker must
//! occupy the entire text before the cursor. Partial prefixes (text
//! after the marker, or the cursor mid-marker) never match.

use serde_json::{Map, Value};

use crate::document::BlockType;

/// A block marker completed by a typed space.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockMatch {
    /// The block type the current block converts to.
    pub kind: BlockType,
    /// Metadata merged into the converted block, e.g. the fence language.
    pub data: Map<String, Value>,
}

impl BlockMatch {
    fn plain(kind: BlockType) -> Self {
        Self {
            kind,
            data: Map::new(),
        }
    }
}

/// Match a marker against the full text before the cursor.
pub fn match_marker(prefix: &str) -> Option<BlockMatch> {
    if prefix.is_empty() {
        return None;
    }

    // Headings: one `#` per level, up to six.
    if prefix.chars().all(|c| c == '#') {
        let level = u8::try_from(prefix.chars().count()).ok()?;
        return BlockType::header(level).map(BlockMatch::plain);
    }

    match prefix {
        ">" => return Some(BlockMatch::plain(BlockType::Blockquote)),
        "*" | "-" => return Some(BlockMatch::plain(BlockType::UnorderedListItem)),
        _ => {}
    }

    // Ordered list: any run of digits followed by a dot.
    if let Some(digits) = prefix.strip_suffix('.') {
        if !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()) {
            return Some(BlockMatch::plain(BlockType::OrderedListItem));
        }
    }

    // Code fence, with an optional language tag.
    if let Some(language) = prefix.strip_prefix("```") {
        if language
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            let mut matched = BlockMatch::plain(BlockType::CodeBlock);
            if !language.is_empty() {
                matched
                    .data
                    .insert("language".to_string(), Value::from(language));
            }
            return Some(matched);
        }
    }

    None
}
