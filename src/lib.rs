// Only allow lints that are either transitive-dependency noise or
// genuinely opinionated style choices that don't indicate real issues.
#![allow(
    // Transitive dependency version mismatches we can't control
    clippy::multiple_crate_versions,
    // module_name_repetitions is pure style preference (e.g. rules::BlockMatch)
    clippy::module_name_repetitions
)]

//! # Markwright
//!
//! Live markdown shortcuts for rich-text document editing.
//!
//! Markwright watches keystrokes against an immutable block document and
//! converts completed markdown syntax in place:
//! - Inline spans: `*bold*`, `_italic_`, `` `code` ``, `~~strikethrough~~`
//! - Block markers: `#` headings, `>` quotes, list items, code fences
//! - Style clearing, so finished spans don't bleed into new text
//!
//! ## Architecture
//!
//! Each keystroke flows through one synchronous dispatch:
//! - **Document**: immutable blocks with per-char style sets
//! - **Rules**: recognize completed syntax around the cursor
//! - **Rewrite**: produce the converted document and selection
//! - **State**: snapshot history with undo/redo
//!
//! The host editor calls [`engine::ShortcutEngine::before_input`] before
//! applying a typed character; a `Handled` outcome means the engine
//! committed a rewritten state and the host must drop its default edit.
//!
//! ## Modules
//!
//! - [`document`]: Block document model and raw interchange
//! - [`selection`]: Anchor/focus selection spans
//! - [`state`]: Editor state snapshots and history
//! - [`rules`]: Inline and block pattern matching
//! - [`rewrite`]: Document surgery for matched rules
//! - [`engine`]: Keystroke dispatch

pub mod document;
pub mod engine;
pub mod rewrite;
pub mod rules;
pub mod selection;
pub mod state;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::document::{Block, BlockKey, BlockType, Document, InlineStyle, StyleSet};
    pub use crate::engine::{CommitSink, InputOutcome, ShortcutEngine};
    pub use crate::selection::Selection;
    pub use crate::state::{ChangeType, EditorState};
}
