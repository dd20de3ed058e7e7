//! Pattern rules that trigger live conversions.
//!
//! Two families of rules inspect the keystroke before the host editor
//! applies it:
//! - Inline spans: symmetric delimiter pairs completed by the typed
//!   character (or terminated by a typed space)
//! - Block markers: line-start prefixes completed by a typed space
//!
//! Rules only *recognize*; the rewriters in [`crate::rewrite`] perform
//! the actual document surgery.

mod block;
mod inline;

pub use block::{BlockMatch, match_marker};
pub use inline::{InlineMatch, InlinePattern, match_completed_span, match_terminated_span};
