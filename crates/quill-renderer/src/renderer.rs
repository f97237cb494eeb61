//! Renderer capability trait.
//!
//! One operation per markdown construct. Arguments that carry child content
//! are already-rendered HTML; the caller concatenates the returned fragments
//! in document order.
//!
//! Block fragments end with a newline, inline fragments never do. Callers rely
//! on this when concatenating.

use pulldown_cmark::Alignment;

use crate::error::RenderError;
use crate::options::Options;

/// Per-cell table flags, created by the caller for every cell.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TableCellFlags {
    header: bool,
    align: Option<String>,
}

impl TableCellFlags {
    /// Create flags for a header or data cell with an optional alignment.
    ///
    /// The alignment is emitted verbatim; it is not checked against the CSS
    /// `text-align` keywords.
    #[must_use]
    pub fn new(header: bool, align: Option<&str>) -> Self {
        Self {
            header,
            align: align.map(str::to_owned),
        }
    }

    /// Create flags from a parsed column alignment.
    #[must_use]
    pub fn from_alignment(header: bool, alignment: Alignment) -> Self {
        let align = match alignment {
            Alignment::Left => Some("left"),
            Alignment::Center => Some("center"),
            Alignment::Right => Some("right"),
            Alignment::None => None,
        };
        Self::new(header, align)
    }

    /// Whether this is a header cell.
    pub fn is_header(&self) -> bool {
        self.header
    }

    /// Column alignment, if any.
    pub fn align(&self) -> Option<&str> {
        self.align.as_deref()
    }
}

/// Capability interface for rendering markdown constructs into fragments.
///
/// Every operation except [`heading`](Self::heading) is pure given its
/// arguments and [`options`](Self::options). `heading` takes `&mut self`
/// because sequential ids advance a per-pass counter.
pub trait Renderer {
    /// Options this renderer was built with.
    fn options(&self) -> &Options;

    /// Render a code block.
    ///
    /// # Arguments
    ///
    /// * `code` - Block content
    /// * `lang` - Optional language; `math` (any case) selects a display-math container
    /// * `already_escaped` - Whether `code` is already HTML-escaped
    fn code(&self, code: &str, lang: Option<&str>, already_escaped: bool) -> String;

    /// Render a display-math block. Content is embedded verbatim.
    fn math_block(&self, code: &str) -> String;

    /// Render a blockquote around rendered body HTML.
    fn blockquote(&self, body: &str) -> String;

    /// Render raw HTML. Default passes it through unchanged.
    fn html(&self, raw: &str) -> String {
        raw.to_owned()
    }

    /// Render a heading.
    ///
    /// # Arguments
    ///
    /// * `text` - Rendered inline HTML, embedded verbatim
    /// * `level` - Heading level (1-6)
    /// * `raw` - Plain heading text used to derive the slug id
    fn heading(&mut self, text: &str, level: u8, raw: &str) -> Result<String, RenderError>;

    /// Render a horizontal rule.
    fn hr(&self) -> String;

    /// Render an ordered or unordered list around rendered items.
    fn list(&self, body: &str, ordered: bool) -> String;

    /// Render a list item.
    fn listitem(&self, text: &str) -> String;

    /// Render a paragraph.
    fn paragraph(&self, text: &str) -> String;

    /// Render a table from a pre-assembled header row and body rows.
    fn table(&self, header: &str, body: &str) -> String;

    /// Render a table row around rendered cells.
    fn tablerow(&self, content: &str) -> String;

    /// Render a table cell.
    fn tablecell(&self, content: &str, flags: &TableCellFlags) -> String;

    /// Render strong emphasis.
    fn strong(&self, text: &str) -> String;

    /// Render emphasis.
    fn em(&self, text: &str) -> String;

    /// Render an inline code span.
    fn codespan(&self, text: &str) -> String;

    /// Render a hard line break.
    fn br(&self) -> String;

    /// Render a disabled task list checkbox, followed by a separating space.
    fn checkbox(&self, checked: bool) -> String;

    /// Render deleted (struck-through) text.
    fn del(&self, text: &str) -> String;

    /// Render a link.
    fn link(&self, href: &str, title: Option<&str>, text: &str) -> String;

    /// Render an image, extracting a percentage width marker from `text`.
    fn image(&self, href: &str, title: Option<&str>, text: &str) -> String;

    /// Render an anchor tagged for client-side embedding.
    fn oembed(&self, href: &str) -> String;

    /// Render a slideshow marker.
    fn slide(&self, file_no: &str) -> String;

    /// Render a cross-document link marker. Input must start with `#`.
    fn internallink(&self, no_term: &str) -> Result<String, RenderError>;

    /// Render a footnote reference.
    fn footnoteref(&self, key: &str) -> String;

    /// Render the footnote list.
    ///
    /// `notes` are `(key, rendered body)` pairs in output order. Keys must be
    /// escaped the same way [`footnoteref`](Self::footnoteref) escapes them.
    fn footnote(&self, notes: &[(String, String)]) -> String;

    /// Render untrusted text that must not become a link.
    fn nolink(&self, text: &str) -> String;

    /// Render already-escaped text. Default passes it through unchanged.
    fn text(&self, text: &str) -> String {
        text.to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_cell_flags_new() {
        let flags = TableCellFlags::new(true, Some("right"));
        assert!(flags.is_header());
        assert_eq!(flags.align(), Some("right"));

        let flags = TableCellFlags::new(false, None);
        assert!(!flags.is_header());
        assert_eq!(flags.align(), None);
    }

    #[test]
    fn test_table_cell_flags_from_alignment() {
        assert_eq!(
            TableCellFlags::from_alignment(false, Alignment::Center).align(),
            Some("center")
        );
        assert_eq!(
            TableCellFlags::from_alignment(true, Alignment::None),
            TableCellFlags::new(true, None)
        );
    }
}
