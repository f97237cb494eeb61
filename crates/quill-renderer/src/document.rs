//! Document walker driving a [`Renderer`] from `pulldown-cmark` events.
//!
//! Each container opens a frame with its own output buffer. Children render
//! into the innermost frame; when the container closes, the buffered HTML is
//! handed to the matching renderer operation and the returned fragment is
//! appended to the parent frame.

use pulldown_cmark::{Event, Options as ParserOptions, Parser, Tag};

use crate::error::RenderError;
use crate::html::HtmlRenderer;
use crate::options::Options;
use crate::renderer::{Renderer, TableCellFlags};
use crate::state::{TableState, escape};
use crate::util::{fence_language, heading_level_to_num};

/// Result of rendering a document.
#[derive(Clone, Debug)]
pub struct RenderResult {
    /// Rendered HTML, including the footnote list when footnotes are present.
    pub html: String,
    /// Number of headings rendered.
    pub heading_count: usize,
    /// Number of footnote definitions collected.
    pub footnote_count: usize,
}

/// Open container and what to do with its buffer when it closes.
enum Frame {
    Root,
    /// Children are appended to the parent unchanged.
    Transparent,
    Paragraph {
        /// Bytes of the buffer produced by display math.
        math_bytes: usize,
    },
    Heading {
        level: u8,
        raw: String,
    },
    BlockQuote,
    List {
        ordered: bool,
    },
    Item,
    CodeBlock {
        lang: Option<String>,
    },
    FootnoteDefinition {
        key: String,
    },
    Table,
    TableHead,
    TableRow,
    TableCell {
        flags: TableCellFlags,
    },
    Emphasis,
    Strong,
    Strikethrough,
    Link {
        href: String,
        title: Option<String>,
    },
    Image {
        href: String,
        title: Option<String>,
    },
}

struct OpenFrame {
    frame: Frame,
    buf: String,
}

impl OpenFrame {
    fn new(frame: Frame) -> Self {
        Self {
            frame,
            buf: String::new(),
        }
    }
}

/// One render pass over a markdown document.
///
/// Consumed by [`render`](Self::render), so a pass and its renderer's
/// heading-id cursor are never reused.
pub struct Document<R: Renderer> {
    renderer: R,
    stack: Vec<OpenFrame>,
    table: TableState,
    /// Footnote definitions as (escaped key, rendered body) in definition order.
    footnotes: Vec<(String, String)>,
    heading_count: usize,
}

impl<R: Renderer> Document<R> {
    /// Create a render pass driving the given renderer.
    #[must_use]
    pub fn new(renderer: R) -> Self {
        Self {
            renderer,
            stack: vec![OpenFrame::new(Frame::Root)],
            table: TableState::default(),
            footnotes: Vec::new(),
            heading_count: 0,
        }
    }

    /// Get parser options based on the renderer's configuration.
    #[must_use]
    pub fn parser_options(&self) -> ParserOptions {
        let mut options = ParserOptions::empty();
        if self.renderer.options().math {
            options |= ParserOptions::ENABLE_MATH;
        }
        if self.renderer.options().gfm {
            options |= ParserOptions::ENABLE_TABLES
                | ParserOptions::ENABLE_STRIKETHROUGH
                | ParserOptions::ENABLE_FOOTNOTES
                | ParserOptions::ENABLE_TASKLISTS;
        }
        options
    }

    /// Parse and render markdown text using the configured parser options.
    pub fn render_markdown(self, markdown: &str) -> Result<RenderResult, RenderError> {
        let options = self.parser_options();
        self.render(Parser::new_ext(markdown, options))
    }

    /// Render markdown events and return the result.
    pub fn render<'a, I>(mut self, events: I) -> Result<RenderResult, RenderError>
    where
        I: Iterator<Item = Event<'a>>,
    {
        if self.renderer.options().sanitize {
            tracing::debug!("sanitize is set but does not alter rendered output");
        }

        for event in events {
            self.process_event(event)?;
        }
        while self.stack.len() > 1 {
            self.close_frame()?;
        }

        let mut html = self.stack.pop().map(|root| root.buf).unwrap_or_default();
        if !self.footnotes.is_empty() {
            html.push_str(&self.renderer.footnote(&self.footnotes));
        }

        tracing::debug!(
            headings = self.heading_count,
            footnotes = self.footnotes.len(),
            "Render pass completed"
        );

        Ok(RenderResult {
            html,
            heading_count: self.heading_count,
            footnote_count: self.footnotes.len(),
        })
    }

    fn process_event(&mut self, event: Event<'_>) -> Result<(), RenderError> {
        match event {
            Event::Start(tag) => self.start_tag(tag),
            Event::End(_) => return self.close_frame(),
            Event::Text(text) => self.text(&text),
            Event::Code(code) => self.inline_code(&code),
            // Left in source form for client-side typesetting.
            Event::InlineMath(math) => self.text(&format!("${math}$")),
            Event::DisplayMath(math) => self.display_math(&math),
            Event::Html(html) | Event::InlineHtml(html) => {
                let html = self.renderer.html(&html);
                self.push(&html);
            }
            Event::FootnoteReference(label) => {
                let html = self.renderer.footnoteref(&footnote_key(&label));
                self.push(&html);
            }
            Event::SoftBreak => self.soft_break(),
            Event::HardBreak => {
                let html = self.renderer.br();
                self.push(&html);
            }
            Event::Rule => {
                let html = self.renderer.hr();
                self.push(&html);
            }
            Event::TaskListMarker(checked) => {
                let html = self.renderer.checkbox(checked);
                self.push(&html);
            }
        }
        Ok(())
    }

    fn start_tag(&mut self, tag: Tag<'_>) {
        // Image alt text is plain text; nested formatting is flattened.
        let frame = if self.in_image() {
            Frame::Transparent
        } else {
            match tag {
                Tag::Paragraph => Frame::Paragraph { math_bytes: 0 },
                Tag::Heading { level, .. } => Frame::Heading {
                    level: heading_level_to_num(level),
                    raw: String::new(),
                },
                Tag::BlockQuote(_) => Frame::BlockQuote,
                Tag::CodeBlock(kind) => Frame::CodeBlock {
                    lang: fence_language(&kind),
                },
                Tag::List(start) => Frame::List {
                    ordered: start.is_some(),
                },
                Tag::Item => Frame::Item,
                Tag::FootnoteDefinition(label) => Frame::FootnoteDefinition {
                    key: escape(&footnote_key(&label), false),
                },
                Tag::Table(alignments) => {
                    self.table.start(alignments);
                    Frame::Table
                }
                Tag::TableHead => {
                    self.table.start_head();
                    Frame::TableHead
                }
                Tag::TableRow => {
                    self.table.start_row();
                    Frame::TableRow
                }
                Tag::TableCell => Frame::TableCell {
                    flags: self.table.current_cell_flags(),
                },
                Tag::Emphasis => Frame::Emphasis,
                Tag::Strong => Frame::Strong,
                Tag::Strikethrough => Frame::Strikethrough,
                Tag::Link {
                    dest_url, title, ..
                } => Frame::Link {
                    href: dest_url.into_string(),
                    title: non_empty(&title),
                },
                Tag::Image {
                    dest_url, title, ..
                } => Frame::Image {
                    href: dest_url.into_string(),
                    title: non_empty(&title),
                },
                Tag::HtmlBlock
                | Tag::MetadataBlock(_)
                | Tag::DefinitionList
                | Tag::DefinitionListTitle
                | Tag::DefinitionListDefinition
                | Tag::Superscript
                | Tag::Subscript => Frame::Transparent,
            }
        };
        self.stack.push(OpenFrame::new(frame));
    }

    /// Close the innermost frame and hand its buffer to the renderer.
    fn close_frame(&mut self) -> Result<(), RenderError> {
        if self.stack.len() <= 1 {
            return Ok(());
        }
        let Some(OpenFrame { frame, buf }) = self.stack.pop() else {
            return Ok(());
        };

        let html = match frame {
            Frame::Root | Frame::Transparent => buf,
            // A paragraph holding only display math is already block-level.
            Frame::Paragraph { math_bytes } if math_bytes > 0 && math_bytes == buf.len() => buf,
            Frame::Paragraph { .. } => self.renderer.paragraph(&buf),
            Frame::Heading { level, raw } => {
                self.heading_count += 1;
                self.renderer.heading(&buf, level, &raw)?
            }
            Frame::BlockQuote => self.renderer.blockquote(&buf),
            Frame::List { ordered } => self.renderer.list(&buf, ordered),
            Frame::Item => self.renderer.listitem(&buf),
            Frame::CodeBlock { lang } => {
                let code = buf.strip_suffix('\n').unwrap_or(&buf);
                self.renderer.code(code, lang.as_deref(), false)
            }
            Frame::FootnoteDefinition { key } => {
                self.footnotes.push((key, buf));
                return Ok(());
            }
            Frame::Table => {
                let header = self.table.take_header();
                self.renderer.table(&header, &buf)
            }
            Frame::TableHead => {
                let row = self.renderer.tablerow(&buf);
                self.table.end_head(row);
                return Ok(());
            }
            Frame::TableRow => self.renderer.tablerow(&buf),
            Frame::TableCell { flags } => {
                self.table.next_cell();
                self.renderer.tablecell(&buf, &flags)
            }
            Frame::Emphasis => self.renderer.em(&buf),
            Frame::Strong => self.renderer.strong(&buf),
            Frame::Strikethrough => self.renderer.del(&buf),
            Frame::Link { href, title } => self.renderer.link(&href, title.as_deref(), &buf),
            Frame::Image { href, title } => self.renderer.image(&href, title.as_deref(), &buf),
        };

        self.push(&html);
        Ok(())
    }

    fn text(&mut self, text: &str) {
        if let Some(raw) = self.heading_raw() {
            raw.push_str(text);
        }

        if self.in_code_block() {
            self.push(text);
        } else if self.in_image() {
            self.push(&escape(text, true));
        } else {
            let html = self.renderer.text(&escape(text, false));
            self.push(&html);
        }
    }

    fn inline_code(&mut self, code: &str) {
        if let Some(raw) = self.heading_raw() {
            raw.push_str(code);
        }

        if self.in_image() {
            self.push(&escape(code, true));
        } else {
            let html = self.renderer.codespan(&escape(code, false));
            self.push(&html);
        }
    }

    fn soft_break(&mut self) {
        if self.renderer.options().breaks && !self.in_image() {
            let html = self.renderer.br();
            self.push(&html);
        } else {
            self.push("\n");
        }
    }

    fn display_math(&mut self, math: &str) {
        let html = self.renderer.math_block(math.trim_matches(['\r', '\n']));
        if let Some(OpenFrame {
            frame: Frame::Paragraph { math_bytes },
            ..
        }) = self.stack.last_mut()
        {
            *math_bytes += html.len();
        }
        self.push(&html);
    }

    /// Append rendered HTML to the innermost frame.
    fn push(&mut self, html: &str) {
        if let Some(open) = self.stack.last_mut() {
            open.buf.push_str(html);
        }
    }

    /// Raw text buffer of the innermost open heading.
    fn heading_raw(&mut self) -> Option<&mut String> {
        self.stack.iter_mut().rev().find_map(|open| match &mut open.frame {
            Frame::Heading { raw, .. } => Some(raw),
            _ => None,
        })
    }

    fn in_code_block(&self) -> bool {
        matches!(
            self.stack.last(),
            Some(OpenFrame {
                frame: Frame::CodeBlock { .. },
                ..
            })
        )
    }

    fn in_image(&self) -> bool {
        self.stack
            .iter()
            .any(|open| matches!(open.frame, Frame::Image { .. }))
    }
}

/// Key shared by a footnote reference and the definition it resolves to.
///
/// The parser matches labels case-insensitively, so both sides are folded.
fn footnote_key(label: &str) -> String {
    label.to_lowercase()
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_owned())
}

/// Render markdown in a fresh render pass with an [`HtmlRenderer`].
///
/// # Example
///
/// ```
/// use quill_renderer::{Options, render_markdown};
///
/// let options = Options::default().with_header_id_sequential(true);
/// let first = render_markdown("# A\n\n# B", &options).unwrap();
/// let second = render_markdown("# C", &options).unwrap();
/// assert!(first.html.contains(r#"<h1 id="2">B</h1>"#));
/// assert!(second.html.contains(r#"<h1 id="1">C</h1>"#));
/// ```
pub fn render_markdown(markdown: &str, options: &Options) -> Result<RenderResult, RenderError> {
    Document::new(HtmlRenderer::new(options)).render_markdown(markdown)
}
