//! Render-pass state and shared text helpers.
//!
//! [`HeadingIds`] is the only mutable state an [`HtmlRenderer`](crate::HtmlRenderer)
//! carries. [`TableState`] is used by the document walker to derive cell flags.

use std::sync::LazyLock;

use pulldown_cmark::Alignment;
use regex::Regex;

use crate::renderer::TableCellFlags;

/// Maximal runs of characters outside `[A-Za-z0-9_]`.
static NON_WORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_]+").expect("invalid non-word regex"));

/// Cursor issuing sequential heading ids for one render pass.
///
/// Ids start at 1 and strictly increase. A new pass starts with a new cursor.
#[derive(Debug, Default)]
pub struct HeadingIds {
    last: u64,
}

impl HeadingIds {
    /// Create a cursor that has not issued any id yet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the cursor and return the new id.
    pub fn next_id(&mut self) -> u64 {
        self.last += 1;
        self.last
    }

    /// Number of ids issued so far.
    pub fn issued(&self) -> u64 {
        self.last
    }
}

/// State for tracking table rendering.
#[derive(Default)]
pub(crate) struct TableState {
    /// Whether we're inside the table header row.
    in_head: bool,
    /// Column alignments for current table.
    alignments: Vec<Alignment>,
    /// Current column index in table row.
    cell_index: usize,
    /// Rendered header row, held until the table closes.
    header: String,
}

impl TableState {
    /// Start a new table with column alignments.
    pub(crate) fn start(&mut self, alignments: Vec<Alignment>) {
        self.alignments = alignments;
        self.in_head = false;
        self.cell_index = 0;
        self.header.clear();
    }

    /// Start the table header row.
    pub(crate) fn start_head(&mut self) {
        self.in_head = true;
        self.cell_index = 0;
    }

    /// End the table header row, keeping its rendered HTML.
    pub(crate) fn end_head(&mut self, row: String) {
        self.in_head = false;
        self.header = row;
    }

    /// Start a new table row.
    pub(crate) fn start_row(&mut self) {
        self.cell_index = 0;
    }

    /// Move to the next cell.
    pub(crate) fn next_cell(&mut self) {
        self.cell_index += 1;
    }

    /// Flags for the cell at the current position.
    pub(crate) fn current_cell_flags(&self) -> TableCellFlags {
        let alignment = self
            .alignments
            .get(self.cell_index)
            .copied()
            .unwrap_or(Alignment::None);
        TableCellFlags::from_alignment(self.in_head, alignment)
    }

    /// Take the rendered header row of the current table.
    pub(crate) fn take_header(&mut self) -> String {
        std::mem::take(&mut self.header)
    }
}

/// Convert text to an id-safe slug.
///
/// Lower-cases the text and collapses every maximal run of characters
/// outside `[A-Za-z0-9_]` into a single hyphen. Hyphens left at either end
/// are dropped.
#[must_use]
pub fn slugify(text: &str) -> String {
    let lowered = text.to_lowercase();
    NON_WORD_RE
        .replace_all(&lowered, "-")
        .trim_matches('-')
        .to_owned()
}

/// Escape text for embedding in HTML.
///
/// `&`, `<` and `>` are always escaped. Double and single quotes are escaped
/// only when `quotes` is set.
#[must_use]
pub fn escape(text: &str, quotes: bool) -> String {
    let mut result = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' if quotes => result.push_str("&quot;"),
            '\'' if quotes => result.push_str("&#39;"),
            _ => result.push(c),
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Hello, World!"), "hello-world");
        assert_eq!(slugify("Hello World"), "hello-world");
        assert_eq!(slugify("snake_case stays"), "snake_case-stays");
        assert_eq!(slugify("a -- b"), "a-b");
        assert_eq!(slugify("Version 2.0"), "version-2-0");
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn test_slugify_non_ascii_letters_are_separators() {
        assert_eq!(slugify("Café au lait"), "caf-au-lait");
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape("<script>", false), "&lt;script&gt;");
        assert_eq!(escape("a & b", false), "a &amp; b");
        assert_eq!(escape(r#""quoted""#, false), r#""quoted""#);
        assert_eq!(escape(r#""quoted""#, true), "&quot;quoted&quot;");
        assert_eq!(escape("it's", true), "it&#39;s");
    }

    #[test]
    fn test_heading_ids_increase() {
        let mut ids = HeadingIds::new();
        assert_eq!(ids.issued(), 0);
        assert_eq!(ids.next_id(), 1);
        assert_eq!(ids.next_id(), 2);
        assert_eq!(ids.next_id(), 3);
        assert_eq!(ids.issued(), 3);
    }

    #[test]
    fn test_table_state() {
        let mut state = TableState::default();
        state.start(vec![Alignment::Left, Alignment::None, Alignment::Right]);

        state.start_head();
        let flags = state.current_cell_flags();
        assert!(flags.is_header());
        assert_eq!(flags.align(), Some("left"));

        state.next_cell();
        assert_eq!(state.current_cell_flags().align(), None);

        state.end_head("<tr>\n</tr>\n".to_owned());
        state.start_row();
        state.next_cell();
        state.next_cell();
        let flags = state.current_cell_flags();
        assert!(!flags.is_header());
        assert_eq!(flags.align(), Some("right"));

        assert_eq!(state.take_header(), "<tr>\n</tr>\n");
        assert_eq!(state.take_header(), "");
    }

    #[test]
    fn test_table_state_cell_past_alignments() {
        let mut state = TableState::default();
        state.start(vec![Alignment::Center]);
        state.start_row();
        state.next_cell();
        assert_eq!(state.current_cell_flags().align(), None);
    }
}
