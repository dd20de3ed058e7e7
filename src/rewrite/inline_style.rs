//! Inline style conversion for completed delimiter spans.

use crate::document::{InlineStyle, StyleSet};
use crate::rules::InlineMatch;
use crate::selection::Selection;
use crate::state::{ChangeType, EditorState};

/// Rewrite the selection's start block for a completed inline span.
///
/// The match coordinates come from the candidate string, where the typed
/// character exists only virtually; every range is clamped against the
/// text actually present in the block. Returns `None` when the rewrite
/// declines (the match start already sits inside a code span), leaving
/// the state untouched.
///
/// On success the delimiters (and the terminator, if one was consumed)
/// are removed, the interior is styled, the terminator is re-inserted
/// unstyled, and the selection collapses after it. The committed state
/// carries one `change-inline-style` history entry and an empty pending
/// style override so the next typed character starts clean.
pub fn apply_inline_style(
    state: &EditorState,
    matched: &InlineMatch,
    style: &InlineStyle,
) -> Option<EditorState> {
    let key = state.selection().start_key().clone();
    let block = state.document().block(&key)?;

    let full_len = matched.full_len();
    let term_len = matched.terminator_len();
    debug_assert!(
        full_len >= matched.inner_len() + term_len
            && (full_len - matched.inner_len() - term_len) % 2 == 0,
        "malformed inline match"
    );
    let delim_len = matched.delimiter_len();
    let start = matched.start;
    let end = start + full_len;
    let interior_end = end - 2 * delim_len - term_len;

    // Text already styled as code keeps its literal delimiters, no
    // matter which pattern matched over it.
    if block
        .styles_at(start)
        .is_some_and(|styles| styles.contains(&InlineStyle::Code))
    {
        tracing::trace!(
            target: "markwright::rewrite",
            block = %key,
            offset = start,
            "inline conversion declined inside code span"
        );
        return None;
    }

    let mut document = state.document().clone();

    // A new code span swallows any styling the matched text carried.
    if *style == InlineStyle::Code {
        document.clear_styles(&key, start..end);
    }

    // Strip the closing run first so the leading offsets stay valid,
    // then the opening run. Both ranges clamp to the real text.
    document.remove_range(&key, end - delim_len - term_len..end);
    document.remove_range(&key, start..start + delim_len);

    document.apply_style(&key, start..interior_end, style);

    if let Some(terminator) = &matched.terminator {
        document.insert_text(&key, interior_end, terminator, &StyleSet::new());
    }

    let after = Selection::collapsed(key.clone(), interior_end + term_len);

    tracing::debug!(
        target: "markwright::rewrite",
        block = %key,
        style = %style,
        start,
        end = interior_end,
        "inline conversion"
    );

    Some(
        state
            .push(document, after, ChangeType::ChangeInlineStyle)
            .with_style_override(StyleSet::new()),
    )
}
