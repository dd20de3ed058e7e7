//! Document surgery for matched rules.
//!
//! Each rewriter turns one matched rule into a new [`crate::state::EditorState`]
//! with exactly one history entry:
//! - [`apply_inline_style`]: strip delimiters, style the interior
//! - [`change_block_type`]: replace the block, collapsing multi-block
//!   selections

mod block_type;
mod inline_style;

pub use block_type::change_block_type;
pub use inline_style::apply_inline_style;
