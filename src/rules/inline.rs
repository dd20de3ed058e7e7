//! Inline delimiter patterns and their matcher.
//!
//! Matching runs against a *candidate* string: the block text before the
//! cursor with the freshly typed character appended. A match must end
//! exactly at the end of the candidate, so the typed character is always
//! the one that completed the run.

use crate::document::InlineStyle;

/// A successful inline match, in char offsets into the candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineMatch {
    /// The entire matched run: delimiters, interior, and terminator.
    pub full: String,
    /// The interior text between the delimiters.
    pub inner: String,
    /// The trailing terminator consumed by the match, when present.
    pub terminator: Option<String>,
    /// Where the match starts within the candidate.
    pub start: usize,
}

impl InlineMatch {
    /// Chars in the entire matched run.
    pub fn full_len(&self) -> usize {
        self.full.chars().count()
    }

    /// Chars in the interior text.
    pub fn inner_len(&self) -> usize {
        self.inner.chars().count()
    }

    /// Chars in the terminator, zero when absent.
    pub fn terminator_len(&self) -> usize {
        self.terminator
            .as_ref()
            .map_or(0, |term| term.chars().count())
    }

    /// Chars in one delimiter run, recovered from the component lengths.
    pub fn delimiter_len(&self) -> usize {
        (self.full_len() - self.inner_len() - self.terminator_len()) / 2
    }
}

/// Inline conversion patterns, in match priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InlinePattern {
    Bold,
    Italic,
    Code,
    Strikethrough,
}

impl InlinePattern {
    /// Every pattern, in priority order.
    pub const ALL: [Self; 4] = [Self::Bold, Self::Italic, Self::Code, Self::Strikethrough];

    /// The symmetric delimiter enclosing the interior.
    pub const fn delimiter(self) -> &'static str {
        match self {
            Self::Bold => "*",
            Self::Italic => "_",
            Self::Code => "`",
            Self::Strikethrough => "~~",
        }
    }

    /// The style applied when this pattern fires.
    pub const fn style(self) -> InlineStyle {
        match self {
            Self::Bold => InlineStyle::Bold,
            Self::Italic => InlineStyle::Italic,
            Self::Code => InlineStyle::Code,
            Self::Strikethrough => InlineStyle::Strikethrough,
        }
    }

    /// Whether the opening delimiter must sit at the block start or
    /// after whitespace. Code spans are exempt so they can fire
    /// mid-word (`can`not`` is a legitimate code span).
    const fn needs_leading_boundary(self) -> bool {
        !matches!(self, Self::Code)
    }
}

/// Match a candidate whose final character just completed a closing
/// delimiter run, e.g. `Some *text` plus a typed `*`.
pub fn match_completed_span(candidate: &str) -> Option<(InlinePattern, InlineMatch)> {
    let chars: Vec<char> = candidate.chars().collect();
    InlinePattern::ALL
        .into_iter()
        .find_map(|pattern| span_ending_at(pattern, &chars).map(|m| (pattern, m)))
}

/// Match a candidate whose final character is a freshly typed space
/// right after a complete span, e.g. `Some *text*` plus a typed space.
///
/// The space is captured as the match terminator: it is consumed by the
/// rewrite structurally and re-inserted, unstyled, after the interior.
pub fn match_terminated_span(candidate: &str) -> Option<(InlinePattern, InlineMatch)> {
    let chars: Vec<char> = candidate.chars().collect();
    let (last, rest) = chars.split_last()?;
    if *last != ' ' {
        return None;
    }
    InlinePattern::ALL.into_iter().find_map(|pattern| {
        span_ending_at(pattern, rest).map(|mut m| {
            m.full.push(' ');
            m.terminator = Some(" ".to_string());
            (pattern, m)
        })
    })
}

/// Match one pattern's span ending exactly at the end of `chars`.
///
/// The opening delimiter is the nearest occurrence before the interior;
/// an interior containing the delimiter, an empty interior, or a missing
/// leading boundary all reject the match.
fn span_ending_at(pattern: InlinePattern, chars: &[char]) -> Option<InlineMatch> {
    let delim: Vec<char> = pattern.delimiter().chars().collect();
    let width = delim.len();
    let n = chars.len();
    if n < 2 * width + 1 {
        return None;
    }
    if chars[n - width..] != delim[..] {
        return None;
    }

    let start = (0..n - 2 * width)
        .rev()
        .find(|&s| chars[s..s + width] == delim[..])?;
    if pattern.needs_leading_boundary() && start > 0 && !chars[start - 1].is_whitespace() {
        return None;
    }

    let interior = &chars[start + width..n - width];
    if interior.windows(width).any(|run| run == delim) {
        return None;
    }

    Some(InlineMatch {
        full: chars[start..].iter().collect(),
        inner: interior.iter().collect(),
        terminator: None,
        start,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn completed(candidate: &str) -> Option<(InlinePattern, InlineMatch)> {
        match_completed_span(candidate)
    }

    // --- Closing-delimiter form ---

    #[test]
    fn test_bold_completed_by_closing_asterisk() {
        let (pattern, m) = completed("Some *text*").unwrap();
        assert_eq!(pattern, InlinePattern::Bold);
        assert_eq!(m.full, "*text*");
        assert_eq!(m.inner, "text");
        assert_eq!(m.terminator, None);
        assert_eq!(m.start, 5);
    }

    #[test]
    fn test_italic_uses_underscores() {
        let (pattern, m) = completed("_word_").unwrap();
        assert_eq!(pattern, InlinePattern::Italic);
        assert_eq!(m.inner, "word");
        assert_eq!(m.start, 0);
    }

    #[test]
    fn test_strikethrough_uses_double_tildes() {
        let (pattern, m) = completed("so ~~gone~~").unwrap();
        assert_eq!(pattern, InlinePattern::Strikethrough);
        assert_eq!(m.full, "~~gone~~");
        assert_eq!(m.inner, "gone");
        assert_eq!(m.start, 3);
    }

    #[test]
    fn test_empty_interior_is_no_match() {
        assert!(completed("**").is_none());
        assert!(completed("~~~~").is_none());
    }

    #[test]
    fn test_mid_word_bold_is_rejected() {
        assert!(completed("can*not*").is_none());
    }

    #[test]
    fn test_mid_word_code_is_allowed() {
        let (pattern, m) = completed("can`not`").unwrap();
        assert_eq!(pattern, InlinePattern::Code);
        assert_eq!(m.inner, "not");
        assert_eq!(m.start, 3);
    }

    #[test]
    fn test_opening_is_nearest_preceding_delimiter() {
        let (_, m) = completed("a *b *c*").unwrap();
        assert_eq!(m.start, 5);
        assert_eq!(m.inner, "c");
    }

    #[test]
    fn test_interior_containing_delimiter_is_rejected() {
        // a pre-existing complete span followed by one more asterisk
        assert!(completed("*abc**").is_none());
    }

    #[test]
    fn test_plain_text_does_not_match() {
        assert!(completed("hello").is_none());
        assert!(completed("").is_none());
    }

    #[test]
    fn test_multibyte_interior_offsets_are_char_based() {
        let (_, m) = completed("héllo *wörld*").unwrap();
        assert_eq!(m.start, 6);
        assert_eq!(m.inner, "wörld");
    }

    // --- Boundary-terminator form ---

    #[test]
    fn test_space_after_complete_span_matches_with_terminator() {
        let (pattern, m) = match_terminated_span("Some *text* ").unwrap();
        assert_eq!(pattern, InlinePattern::Bold);
        assert_eq!(m.full, "*text* ");
        assert_eq!(m.inner, "text");
        assert_eq!(m.terminator.as_deref(), Some(" "));
        assert_eq!(m.start, 5);
    }

    #[test]
    fn test_terminated_form_requires_trailing_space() {
        assert!(match_terminated_span("Some *text*").is_none());
    }

    #[test]
    fn test_terminated_form_requires_span_right_before_space() {
        assert!(match_terminated_span("*text* and ").is_none());
    }

    #[test]
    fn test_completed_form_ignores_spans_not_at_end() {
        assert!(completed("*text* and").is_none());
    }

    #[test]
    fn test_delimiter_len_is_recovered_from_component_lengths() {
        let (_, m) = match_terminated_span("so ~~gone~~ ").unwrap();
        assert_eq!(m.full_len(), 9);
        assert_eq!(m.inner_len(), 4);
        assert_eq!(m.terminator_len(), 1);
        assert_eq!(m.delimiter_len(), 2);
    }
}
