//! Editor state snapshots and undo history.

use std::fmt;
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::document::{BlockKey, Document, StyleSet};
use crate::selection::Selection;

/// Maximum number of history snapshots retained; the oldest fall off.
pub const MAX_UNDO_DEPTH: usize = 32;

/// Label describing why a new snapshot was pushed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeType {
    InsertCharacters,
    ChangeInlineStyle,
    ChangeBlockType,
    ChangeBlockData,
}

impl ChangeType {
    /// The conventional label for this change.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InsertCharacters => "insert-characters",
            Self::ChangeInlineStyle => "change-inline-style",
            Self::ChangeBlockType => "change-block-type",
            Self::ChangeBlockData => "change-block-data",
        }
    }
}

impl fmt::Display for ChangeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One retained point in history.
#[derive(Debug, Clone)]
struct Snapshot {
    document: Arc<Document>,
    selection: Selection,
}

/// An immutable editor snapshot: document, selection, pending style
/// override, and the undo/redo stacks.
///
/// Every mutation produces a new `EditorState`; the previous snapshot is
/// retained on the undo stack (up to [`MAX_UNDO_DEPTH`]). Documents are
/// shared between snapshots via [`Arc`], so cloning a state or stacking
/// history does not deep-copy block data.
#[derive(Debug, Clone)]
pub struct EditorState {
    document: Arc<Document>,
    selection: Selection,
    /// When set, the next insertion carries exactly these styles instead
    /// of inheriting from surrounding text. An empty set means "insert
    /// unstyled".
    style_override: Option<StyleSet>,
    undo_stack: Vec<Snapshot>,
    redo_stack: Vec<Snapshot>,
    last_change: Option<ChangeType>,
}

impl EditorState {
    /// Create a state over a document, cursor at the start.
    ///
    /// A document with no blocks is replaced by a single empty block so
    /// the selection always has somewhere to sit.
    pub fn new(document: Document) -> Self {
        debug_assert!(!document.is_empty(), "editor state needs at least one block");
        let document = if document.is_empty() {
            Document::from_text("")
        } else {
            document
        };
        let selection = document.first_block().map_or_else(
            || Selection::collapsed(BlockKey::new("block-0"), 0),
            |block| Selection::collapsed(block.key().clone(), 0),
        );
        Self {
            document: Arc::new(document),
            selection,
            style_override: None,
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            last_change: None,
        }
    }

    /// Create a state from plain text, one block per line.
    pub fn from_text(text: &str) -> Self {
        Self::new(Document::from_text(text))
    }

    /// The current document.
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// The current selection.
    pub const fn selection(&self) -> &Selection {
        &self.selection
    }

    /// The pending style override, if any.
    pub const fn style_override(&self) -> Option<&StyleSet> {
        self.style_override.as_ref()
    }

    /// The label of the change that produced this snapshot.
    pub const fn last_change_type(&self) -> Option<ChangeType> {
        self.last_change
    }

    /// Number of snapshots available to undo.
    pub const fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    /// Returns true if there is anything to undo.
    pub const fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Returns true if there is anything to redo.
    pub const fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Commit an edited document as the next snapshot.
    ///
    /// The previous snapshot goes onto the undo stack, the redo stack is
    /// cleared, and any pending style override is consumed.
    pub fn push(&self, document: Document, selection: Selection, change: ChangeType) -> Self {
        tracing::debug!(
            target: "markwright::state",
            change = change.as_str(),
            block = %selection.start_key(),
            offset = selection.start_offset(),
            "push"
        );
        let mut undo_stack = self.undo_stack.clone();
        undo_stack.push(Snapshot {
            document: Arc::clone(&self.document),
            selection: self.selection.clone(),
        });
        if undo_stack.len() > MAX_UNDO_DEPTH {
            undo_stack.remove(0);
        }
        Self {
            document: Arc::new(document),
            selection,
            style_override: None,
            undo_stack,
            redo_stack: Vec::new(),
            last_change: Some(change),
        }
    }

    /// Move the selection without recording history.
    ///
    /// Any pending style override is discarded; it belonged to the
    /// insertion point it was created for.
    #[must_use]
    pub fn force_selection(mut self, selection: Selection) -> Self {
        self.selection = selection;
        self.style_override = None;
        self
    }

    /// Set the styles the next insertion must carry.
    #[must_use]
    pub fn with_style_override(mut self, styles: StyleSet) -> Self {
        self.style_override = Some(styles);
        self
    }

    /// Step back to the previous snapshot, if there is one.
    pub fn undo(&self) -> Option<Self> {
        let mut undo_stack = self.undo_stack.clone();
        let snapshot = undo_stack.pop()?;
        tracing::debug!(target: "markwright::state", remaining = undo_stack.len(), "undo");
        let mut redo_stack = self.redo_stack.clone();
        redo_stack.push(Snapshot {
            document: Arc::clone(&self.document),
            selection: self.selection.clone(),
        });
        Some(Self {
            document: snapshot.document,
            selection: snapshot.selection,
            style_override: None,
            undo_stack,
            redo_stack,
            last_change: None,
        })
    }

    /// Step forward again after an undo, if possible.
    pub fn redo(&self) -> Option<Self> {
        let mut redo_stack = self.redo_stack.clone();
        let snapshot = redo_stack.pop()?;
        tracing::debug!(target: "markwright::state", remaining = redo_stack.len(), "redo");
        let mut undo_stack = self.undo_stack.clone();
        undo_stack.push(Snapshot {
            document: Arc::clone(&self.document),
            selection: self.selection.clone(),
        });
        Some(Self {
            document: snapshot.document,
            selection: snapshot.selection,
            style_override: None,
            undo_stack,
            redo_stack,
            last_change: None,
        })
    }

    /// Insert text at the (collapsed) selection, the way a host editor's
    /// default insertion would.
    ///
    /// The inserted characters carry the pending style override when one
    /// is set, otherwise the styles inherited from the surrounding text
    /// (see [`Document::styles_for_insertion`]). Commits one
    /// `insert-characters` snapshot.
    pub fn insert_characters(&self, text: &str) -> Self {
        debug_assert!(
            self.selection.is_collapsed(),
            "insertion requires a collapsed selection"
        );
        let key = self.selection.start_key().clone();
        let offset = self.selection.start_offset();
        let styles = self
            .style_override
            .clone()
            .unwrap_or_else(|| self.document.styles_for_insertion(&key, offset));
        let mut document = (*self.document).clone();
        document.insert_text(&key, offset, text, &styles);
        let after = self.selection.shifted_right(text.chars().count());
        self.push(document, after, ChangeType::InsertCharacters)
    }

    /// Merge entries into the selection's start block metadata.
    ///
    /// Commits one `change-block-data` snapshot; the selection stays
    /// where it was.
    pub fn merge_block_data(&self, entries: &Map<String, Value>) -> Self {
        let key = self.selection.start_key().clone();
        let mut document = (*self.document).clone();
        document.merge_block_data(&key, entries);
        self.push(document, self.selection.clone(), ChangeType::ChangeBlockData)
    }

    /// Collapse the selection at the end of the last block, without
    /// recording history.
    #[must_use]
    pub fn move_selection_to_end(&self) -> Self {
        let selection = self.document.last_block().map_or_else(
            || self.selection.clone(),
            |block| Selection::collapsed(block.key().clone(), block.len()),
        );
        self.clone().force_selection(selection)
    }
}
