//! Keystroke dispatch: the host-facing entry point.
//!
//! The host editor forwards each typed character here before applying
//! it. The dispatcher runs the rules in a fixed order:
//! 1. Code blocks swallow everything (NotHandled, no conversions)
//! 2. Style-clearing: typing past the end of a styled span inserts the
//!    char unstyled
//! 3. Block markers completed by a typed space
//! 4. Inline spans completed by the typed character
//!
//! On a handled keystroke the [`CommitSink`] receives the replacement
//! state exactly once and the host must drop its default edit; on
//! NotHandled the host applies the keystroke itself.

use crate::document::{BlockType, StyleSet};
use crate::rewrite;
use crate::rules;
use crate::state::EditorState;

/// Whether the engine consumed a keystroke.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputOutcome {
    /// The engine rewrote the document; the host must not apply its
    /// default edit.
    Handled,
    /// The host should process the keystroke itself.
    NotHandled,
}

impl InputOutcome {
    /// True when the keystroke was consumed.
    pub const fn is_handled(self) -> bool {
        matches!(self, Self::Handled)
    }
}

/// Receives the replacement state for a handled keystroke.
pub trait CommitSink {
    /// Accept the new state. Called exactly once per handled keystroke.
    fn commit(&mut self, state: EditorState);
}

impl<F: FnMut(EditorState)> CommitSink for F {
    fn commit(&mut self, state: EditorState) {
        self(state);
    }
}

/// The markdown shortcut dispatcher.
#[derive(Debug, Clone, Copy)]
pub struct ShortcutEngine;

impl ShortcutEngine {
    /// Dispatch one typed character against the current state.
    pub fn before_input(
        ch: char,
        state: &EditorState,
        sink: &mut impl CommitSink,
    ) -> InputOutcome {
        let selection = state.selection();
        let key = selection.start_key();
        let Some(block) = state.document().block(key) else {
            return InputOutcome::NotHandled;
        };

        // Inside a code block every character is literal.
        if block.kind() == BlockType::CodeBlock {
            tracing::trace!(
                target: "markwright::engine",
                block = %key,
                "code block takes input verbatim"
            );
            return InputOutcome::NotHandled;
        }

        if Self::should_clear_inherited_style(state) {
            tracing::debug!(
                target: "markwright::engine",
                block = %key,
                offset = selection.start_offset(),
                "inserting past a styled span, styles cleared"
            );
            let next = state
                .clone()
                .with_style_override(StyleSet::new())
                .insert_characters(&ch.to_string());
            sink.commit(next);
            return InputOutcome::Handled;
        }

        if ch == ' ' {
            let offset = selection.start_offset();
            let prefix: String = block.text().chars().take(offset).collect();
            if let Some(marker) = rules::match_marker(&prefix) {
                let body: String = block.text().chars().skip(offset).collect();
                let next = rewrite::change_block_type(state, marker.kind, &body, marker.data);
                sink.commit(next);
                return InputOutcome::Handled;
            }
        }

        if selection.is_collapsed() {
            let mut candidate: String =
                block.text().chars().take(selection.start_offset()).collect();
            candidate.push(ch);
            let matched = if ch == ' ' {
                rules::match_terminated_span(&candidate)
            } else {
                rules::match_completed_span(&candidate)
            };
            if let Some((pattern, span)) = matched {
                if let Some(next) = rewrite::apply_inline_style(state, &span, &pattern.style()) {
                    sink.commit(next);
                    return InputOutcome::Handled;
                }
            }
        }

        InputOutcome::NotHandled
    }

    /// Dispatch one character and return the replacement state, if any.
    ///
    /// Convenience over [`Self::before_input`] for hosts that do not
    /// need the sink plumbing.
    pub fn apply(ch: char, state: &EditorState) -> Option<EditorState> {
        let mut committed = None;
        let outcome = Self::before_input(ch, state, &mut |next: EditorState| {
            committed = Some(next);
        });
        debug_assert_eq!(outcome.is_handled(), committed.is_some());
        committed
    }

    /// The style-clearing rule: true when a default insertion would
    /// inherit styling the user has typed past the end of.
    fn should_clear_inherited_style(state: &EditorState) -> bool {
        let selection = state.selection();
        if !selection.is_collapsed() || state.style_override().is_some() {
            return false;
        }
        let key = selection.start_key();
        let offset = selection.start_offset();
        let document = state.document();
        if document.styles_for_insertion(key, offset).is_empty() {
            return false;
        }
        let Some(block) = document.block(key) else {
            return false;
        };
        if block.is_empty() {
            // Styling from a previous block would leak into this one.
            return true;
        }
        if offset == 0 {
            // Leading edge of the block, the host's own semantics apply.
            return false;
        }
        // Trailing edge: fire unless the span continues at the cursor.
        block.styles_at(offset).is_none_or(StyleSet::is_empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Block, BlockKey, Document, InlineStyle, StyleRange};
    use crate::selection::Selection;
    use crate::state::ChangeType;

    fn bold_span_state() -> EditorState {
        // "Some text" with "text" bold, as if just converted.
        let mut block = Block::new(BlockKey::new("block-0"), BlockType::Unstyled, "Some text");
        block.apply_style(5..9, &InlineStyle::Bold);
        EditorState::new(Document::new(vec![block]))
    }

    // --- Inline conversions ---

    #[test]
    fn test_closing_asterisk_converts_to_bold() {
        let state = EditorState::from_text("Some *text").move_selection_to_end();
        let next = ShortcutEngine::apply('*', &state).unwrap();

        let block = &next.document().blocks()[0];
        assert_eq!(block.text(), "Some text");
        assert_eq!(
            block.style_ranges(),
            vec![StyleRange {
                style: InlineStyle::Bold,
                range: 5..9,
            }]
        );
        assert_eq!(next.selection().start_offset(), 9);
        assert_eq!(next.style_override(), Some(&StyleSet::new()));
    }

    #[test]
    fn test_space_converts_terminated_span() {
        let state = EditorState::from_text("an _aside_").move_selection_to_end();
        let next = ShortcutEngine::apply(' ', &state).unwrap();

        let block = &next.document().blocks()[0];
        assert_eq!(block.text(), "an aside ");
        assert_eq!(
            block.style_ranges(),
            vec![StyleRange {
                style: InlineStyle::Italic,
                range: 3..8,
            }]
        );
        assert_eq!(next.selection().start_offset(), 9);
    }

    #[test]
    fn test_plain_typing_is_not_handled() {
        let state = EditorState::from_text("hello").move_selection_to_end();
        assert!(ShortcutEngine::apply('x', &state).is_none());
    }

    #[test]
    fn test_range_selection_skips_inline_rules() {
        let state = EditorState::from_text("Some *text").force_selection(Selection::span(
            BlockKey::new("block-0"),
            0,
            10,
        ));
        assert!(ShortcutEngine::apply('*', &state).is_none());
    }

    // --- Block conversions ---

    #[test]
    fn test_space_converts_heading_marker() {
        let state = EditorState::from_text("#").move_selection_to_end();
        let next = ShortcutEngine::apply(' ', &state).unwrap();

        let block = &next.document().blocks()[0];
        assert_eq!(block.kind(), BlockType::HeaderOne);
        assert_eq!(block.text(), "");
        assert_eq!(next.selection().start_offset(), 0);
        assert_eq!(next.last_change_type(), Some(ChangeType::ChangeBlockType));
    }

    #[test]
    fn test_space_converts_code_fence_with_language() {
        let state = EditorState::from_text("```rust").move_selection_to_end();
        let next = ShortcutEngine::apply(' ', &state).unwrap();

        let block = &next.document().blocks()[0];
        assert_eq!(block.kind(), BlockType::CodeBlock);
        assert_eq!(block.data()["language"], "rust");
    }

    #[test]
    fn test_list_marker_wins_over_inline_rules() {
        let state = EditorState::from_text("*").move_selection_to_end();
        let next = ShortcutEngine::apply(' ', &state).unwrap();
        assert_eq!(
            next.document().blocks()[0].kind(),
            BlockType::UnorderedListItem
        );
    }

    #[test]
    fn test_marker_with_text_after_cursor_keeps_the_tail() {
        let state = EditorState::from_text("1. item").force_selection(Selection::collapsed(
            BlockKey::new("block-0"),
            2,
        ));
        let next = ShortcutEngine::apply(' ', &state).unwrap();

        let block = &next.document().blocks()[0];
        assert_eq!(block.kind(), BlockType::OrderedListItem);
        assert_eq!(block.text(), " item");
        assert_eq!(next.selection().start_offset(), 2);
    }

    // --- Code block gate ---

    #[test]
    fn test_code_block_takes_input_verbatim() {
        let block = Block::new(BlockKey::new("block-0"), BlockType::CodeBlock, "let *x");
        let state = EditorState::new(Document::new(vec![block])).move_selection_to_end();

        assert!(ShortcutEngine::apply('*', &state).is_none());
        assert!(ShortcutEngine::apply(' ', &state).is_none());
    }

    // --- Style clearing ---

    #[test]
    fn test_typing_inside_styled_span_is_not_handled() {
        let state = bold_span_state().force_selection(Selection::collapsed(
            BlockKey::new("block-0"),
            6,
        ));
        assert!(ShortcutEngine::apply('x', &state).is_none());
    }

    #[test]
    fn test_typing_at_trailing_edge_inserts_unstyled() {
        let state = bold_span_state().move_selection_to_end();
        let next = ShortcutEngine::apply('x', &state).unwrap();

        let block = &next.document().blocks()[0];
        assert_eq!(block.text(), "Some textx");
        assert_eq!(
            block.style_ranges(),
            vec![StyleRange {
                style: InlineStyle::Bold,
                range: 5..9,
            }]
        );
        assert_eq!(next.selection().start_offset(), 10);
        assert_eq!(next.last_change_type(), Some(ChangeType::InsertCharacters));
    }

    #[test]
    fn test_typing_at_leading_edge_is_not_handled() {
        let state = bold_span_state().force_selection(Selection::collapsed(
            BlockKey::new("block-0"),
            5,
        ));
        assert!(ShortcutEngine::apply('x', &state).is_none());
    }

    #[test]
    fn test_empty_block_does_not_inherit_styles_from_above() {
        let mut first = Block::new(BlockKey::new("block-0"), BlockType::Unstyled, "bold");
        first.apply_style(0..4, &InlineStyle::Bold);
        let second = Block::new(BlockKey::new("block-1"), BlockType::Unstyled, "");
        let state = EditorState::new(Document::new(vec![first, second]))
            .force_selection(Selection::collapsed(BlockKey::new("block-1"), 0));

        let next = ShortcutEngine::apply('x', &state).unwrap();
        let block = &next.document().blocks()[1];
        assert_eq!(block.text(), "x");
        assert!(block.style_ranges().is_empty());
    }

    #[test]
    fn test_pending_override_suppresses_clearing() {
        let state = bold_span_state()
            .move_selection_to_end()
            .with_style_override(StyleSet::new());
        assert!(ShortcutEngine::apply('x', &state).is_none());
    }

    // --- Commit contract ---

    #[test]
    fn test_commit_fires_once_per_handled_keystroke() {
        let state = EditorState::from_text("Some *text").move_selection_to_end();
        let mut commits = 0;
        let outcome = ShortcutEngine::before_input('*', &state, &mut |_next: EditorState| {
            commits += 1;
        });
        assert_eq!(outcome, InputOutcome::Handled);
        assert_eq!(commits, 1);
    }

    #[test]
    fn test_not_handled_never_commits() {
        let state = EditorState::from_text("hello").move_selection_to_end();
        let mut commits = 0;
        let outcome = ShortcutEngine::before_input('x', &state, &mut |_next: EditorState| {
            commits += 1;
        });
        assert_eq!(outcome, InputOutcome::NotHandled);
        assert_eq!(commits, 0);
        assert!(!outcome.is_handled());
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn dispatch_never_corrupts_the_document(
                text in "[a-z *_`#>~.-]{0,30}",
                cursor in 0..=30usize,
                ch in prop::sample::select(vec!['*', '_', '`', '~', ' ', '.', 'x']),
            ) {
                let len = text.chars().count();
                let state = EditorState::from_text(&text).force_selection(
                    Selection::collapsed(BlockKey::new("block-0"), cursor.min(len)),
                );

                if let Some(next) = ShortcutEngine::apply(ch, &state) {
                    for block in next.document().blocks() {
                        // One style set per char, never more, never fewer.
                        prop_assert!(block.styles_at(block.len()).is_none());
                        if !block.is_empty() {
                            prop_assert!(block.styles_at(block.len() - 1).is_some());
                        }
                        for styled in block.style_ranges() {
                            prop_assert!(styled.range.start < styled.range.end);
                            prop_assert!(styled.range.end <= block.len());
                        }
                    }
                    let selection = next.selection();
                    let block = next.document().block(selection.start_key());
                    prop_assert!(block.is_some_and(|b| selection.start_offset() <= b.len()));
                }
            }
        }
    }
}
