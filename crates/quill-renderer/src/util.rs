//! Shared utility functions for markdown rendering.

use std::sync::LazyLock;

use pulldown_cmark::{CodeBlockKind, HeadingLevel};
use regex::Regex;

/// One or more characters followed by `%`, greedy up to the last `%`.
static WIDTH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r".+%").expect("invalid width regex"));

/// Split a percentage width marker (e.g. `50%`) out of image alt text.
///
/// The text is split on single whitespace characters and the first token
/// containing a width marker wins. Every occurrence of the marker is then
/// removed from the text and the remainder trimmed. Without a marker the
/// text is returned unchanged.
pub(crate) fn split_width(text: &str) -> (String, Option<String>) {
    let width = text
        .split(is_split_whitespace)
        .find_map(|token| WIDTH_RE.find(token))
        .map(|m| m.as_str().trim().to_owned());

    match width {
        Some(width) => (text.replace(&width, "").trim().to_owned(), Some(width)),
        None => (text.to_owned(), None),
    }
}

/// Whitespace characters that separate alt text tokens.
fn is_split_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\u{0B}' | '\u{0C}' | '\r')
}

/// Extract the language from a code block's fence info string.
///
/// Only the first word counts; indented blocks and empty info have none.
pub(crate) fn fence_language(kind: &CodeBlockKind<'_>) -> Option<String> {
    match kind {
        CodeBlockKind::Fenced(info) => info.split_whitespace().next().map(str::to_owned),
        CodeBlockKind::Indented => None,
    }
}

/// Convert heading level enum to number (1-6).
#[must_use]
pub(crate) fn heading_level_to_num(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}
