//! HTML renderer.
//!
//! Produces HTML fragments, switching void elements to their self-closing
//! form when [`Options::xhtml`] is set.

use std::borrow::Cow;

use crate::error::RenderError;
use crate::options::Options;
use crate::renderer::{Renderer, TableCellFlags};
use crate::state::{HeadingIds, escape, slugify};
use crate::util::split_width;

/// Code block language that selects a display-math container.
const MATH_LANG: &str = "math";

/// HTML implementation of [`Renderer`].
///
/// Borrows the pass's [`Options`] and owns its [`HeadingIds`] cursor. Build
/// one renderer per render pass; passes running in parallel each need their
/// own.
#[derive(Debug)]
pub struct HtmlRenderer<'a> {
    options: &'a Options,
    heading_ids: HeadingIds,
}

impl<'a> HtmlRenderer<'a> {
    /// Create a renderer for a new render pass.
    #[must_use]
    pub fn new(options: &'a Options) -> Self {
        Self {
            options,
            heading_ids: HeadingIds::new(),
        }
    }

    /// Sequential heading ids issued so far in this pass.
    pub fn heading_ids(&self) -> &HeadingIds {
        &self.heading_ids
    }

    fn void_close(&self) -> &'static str {
        if self.options.xhtml { "/>" } else { ">" }
    }
}

impl Renderer for HtmlRenderer<'_> {
    fn options(&self) -> &Options {
        self.options
    }

    fn code(&self, code: &str, lang: Option<&str>, already_escaped: bool) -> String {
        let body = if already_escaped {
            Cow::Borrowed(code)
        } else {
            Cow::Owned(escape(code, true))
        };

        match lang {
            Some(lang) if lang.eq_ignore_ascii_case(MATH_LANG) => format!(
                "<div class=\"{}{} hljs\">\n$$\n{code}\n$$</div>\n",
                self.options.lang_prefix,
                escape(lang, true)
            ),
            Some(lang) => format!(
                "<pre><code class=\"{}{} hljs\">{body}\n</code></pre>\n",
                self.options.lang_prefix,
                escape(lang, true)
            ),
            None => format!("<pre><code class=\"hljs\">{body}\n</code></pre>\n"),
        }
    }

    fn math_block(&self, code: &str) -> String {
        format!("<div>\n{code}\n</div>\n")
    }

    fn blockquote(&self, body: &str) -> String {
        format!("<blockquote>\n{body}</blockquote>\n")
    }

    fn heading(&mut self, text: &str, level: u8, raw: &str) -> Result<String, RenderError> {
        if !(1..=6).contains(&level) {
            return Err(RenderError::invalid_argument(
                "heading",
                format!("level must be between 1 and 6, got {level}"),
            ));
        }

        let id = if self.options.header_id_sequential {
            self.heading_ids.next_id().to_string()
        } else {
            slugify(raw)
        };

        Ok(format!(
            "<h{level} id=\"{}{id}\">{text}</h{level}>\n",
            self.options.header_prefix
        ))
    }

    fn hr(&self) -> String {
        format!("<hr{}\n", self.void_close())
    }

    fn list(&self, body: &str, ordered: bool) -> String {
        let tag = if ordered { "ol" } else { "ul" };
        format!("<{tag}>\n{body}</{tag}>\n")
    }

    fn listitem(&self, text: &str) -> String {
        format!("<li>{text}</li>\n")
    }

    fn paragraph(&self, text: &str) -> String {
        format!("<p>{text}</p>\n")
    }

    fn table(&self, header: &str, body: &str) -> String {
        format!("<table>\n<thead>\n{header}</thead>\n<tbody>\n{body}</tbody>\n</table>\n")
    }

    fn tablerow(&self, content: &str) -> String {
        format!("<tr>\n{content}</tr>\n")
    }

    fn tablecell(&self, content: &str, flags: &TableCellFlags) -> String {
        let tag = if flags.is_header() { "th" } else { "td" };
        match flags.align() {
            Some(align) => {
                format!("<{tag} style=\"text-align: {align}\">{content}</{tag}>\n")
            }
            None => format!("<{tag}>{content}</{tag}>\n"),
        }
    }

    fn strong(&self, text: &str) -> String {
        format!("<strong>{text}</strong>")
    }

    fn em(&self, text: &str) -> String {
        format!("<em>{text}</em>")
    }

    fn codespan(&self, text: &str) -> String {
        format!(r#"<code class="hljs">{text}</code>"#)
    }

    fn br(&self) -> String {
        format!("<br{}", self.void_close())
    }

    fn checkbox(&self, checked: bool) -> String {
        let checked = if checked { " checked" } else { "" };
        format!(r#"<input type="checkbox"{checked} disabled{} "#, self.void_close())
    }

    fn del(&self, text: &str) -> String {
        format!("<del>{text}</del>")
    }

    fn link(&self, href: &str, title: Option<&str>, text: &str) -> String {
        if self.options.sanitize {
            tracing::trace!(href, "sanitize is set; link emitted unchanged");
        }

        let title_attr = title.map(|t| format!(r#" title="{t}""#)).unwrap_or_default();
        // Anything starting with "http" counts as external, including "https" and "httpfoo".
        let target_attr = if self.options.link_target_blank && href.starts_with("http") {
            r#" target="_blank""#
        } else {
            ""
        };

        format!(r#"<a href="{href}"{title_attr}{target_attr}>{text}</a>"#)
    }

    fn image(&self, href: &str, title: Option<&str>, text: &str) -> String {
        let (alt, width) = split_width(text);
        let title_attr = title.map(|t| format!(r#" title="{t}""#)).unwrap_or_default();
        let width_attr = width.map(|w| format!(r#" width="{w}""#)).unwrap_or_default();

        format!(
            r#"<img src="{href}" alt="{alt}"{title_attr}{width_attr}{}"#,
            self.void_close()
        )
    }

    fn oembed(&self, href: &str) -> String {
        format!(r#"<a class="oembed" href="{href}">{href}</a>"#)
    }

    fn slide(&self, file_no: &str) -> String {
        format!(r#"<var class="slideshow" id="slide-{file_no}" slide="{file_no}">{file_no}</var>"#)
    }

    fn internallink(&self, no_term: &str) -> Result<String, RenderError> {
        let no = no_term.strip_prefix('#').ok_or_else(|| {
            RenderError::invalid_argument(
                "internallink",
                format!("expected a leading '#' in {no_term:?}"),
            )
        })?;

        Ok(format!(
            r#"<var class="internallink" id="internallink-{no}" internallink="{no}">{no_term}</var>"#
        ))
    }

    fn footnoteref(&self, key: &str) -> String {
        let key = escape(key, false);
        format!(r##"<sup class="footnote-ref" id="fnref-{key}"><a href="#fn-{key}">{key}</a></sup>"##)
    }

    fn footnote(&self, notes: &[(String, String)]) -> String {
        let mut out = String::from(r#"<ol class="footnotes">"#);
        for (key, body) in notes {
            out.push_str(&format!(
                r##"<li id="fn-{key}">{}<a href="#fnref-{key}">&#8617;</a></li>"##,
                body.trim()
            ));
        }
        out.push_str("</ol>");
        out
    }

    fn nolink(&self, text: &str) -> String {
        escape(text, false)
    }
}
