// ABOUTME: Text cleaning and token counting shared by every extraction strategy.
// ABOUTME: clean_text collapses whitespace runs, then newline runs, then trims.

use once_cell::sync::Lazy;
use regex::Regex;

// Browser whitespace: Unicode White_Space minus U+0085, plus U+FEFF.
static WHITESPACE_RUN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[[\s\u{FEFF}]--\u{85}]+").unwrap());
static NEWLINE_RUN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n+").unwrap());

/// Normalize extracted text.
///
/// Every whitespace run (newlines included) becomes one space, newline runs
/// become one newline, and the result is trimmed. The newline pass cannot
/// match after the first pass; it stays so the output is pinned to exactly
/// these two substitutions.
pub fn clean_text(text: &str) -> String {
    let spaced = WHITESPACE_RUN_RE.replace_all(text, " ");
    let collapsed = NEWLINE_RUN_RE.replace_all(&spaced, "\n");
    trim_text(&collapsed).to_string()
}

/// Whitespace as browsers see it: U+FEFF counts, U+0085 does not.
pub fn is_space(c: char) -> bool {
    (c.is_whitespace() && c != '\u{85}') || c == '\u{FEFF}'
}

/// Trim leading and trailing whitespace, BOM included.
pub fn trim_text(text: &str) -> &str {
    text.trim_matches(is_space)
}

/// Count whitespace-delimited tokens.
pub fn word_count(text: &str) -> usize {
    text.split(is_space).filter(|token| !token.is_empty()).count()
}

/// Length in UTF-16 code units, the unit page scripts measure text in.
pub fn utf16_len(text: &str) -> usize {
    text.encode_utf16().count()
}
