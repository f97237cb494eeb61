//! Render options shared by all operations of a render pass.

/// Immutable rendering switches.
///
/// One value is shared by every call of a render pass. The sequential
/// heading-id counter is deliberately not part of this struct; it lives in
/// [`HeadingIds`](crate::HeadingIds), owned by the renderer.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize), serde(default))]
#[allow(clippy::struct_excessive_bools)]
pub struct Options {
    /// Emit self-closing void elements (`<hr/>`, `<br/>`, `<img .../>`).
    pub xhtml: bool,
    /// Reserved for an external sanitizer. Rendering output does not change
    /// when this is set.
    pub sanitize: bool,
    /// Derive heading ids from a per-pass counter instead of a text slug.
    pub header_id_sequential: bool,
    /// Prefix prepended to every heading id.
    pub header_prefix: String,
    /// Prefix prepended to code block language class names.
    pub lang_prefix: String,
    /// Add `target="_blank"` to links whose target starts with `http`.
    pub link_target_blank: bool,
    /// Enable tables, strikethrough, footnotes and task lists when parsing.
    pub gfm: bool,
    /// Render soft line breaks as `<br>`.
    pub breaks: bool,
    /// Parse `$...$` and `$$...$$` math. Off by default so prose dollar
    /// signs stay plain text.
    pub math: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            xhtml: false,
            sanitize: false,
            header_id_sequential: false,
            header_prefix: String::new(),
            lang_prefix: "lang-".to_owned(),
            link_target_blank: false,
            gfm: true,
            breaks: false,
            math: false,
        }
    }
}

impl Options {
    /// Enable or disable self-closing void elements.
    #[must_use]
    pub fn with_xhtml(mut self, enabled: bool) -> Self {
        self.xhtml = enabled;
        self
    }

    /// Set the (currently inert) sanitize flag.
    #[must_use]
    pub fn with_sanitize(mut self, enabled: bool) -> Self {
        self.sanitize = enabled;
        self
    }

    /// Enable or disable counter-based heading ids.
    #[must_use]
    pub fn with_header_id_sequential(mut self, enabled: bool) -> Self {
        self.header_id_sequential = enabled;
        self
    }

    /// Set the heading id prefix.
    #[must_use]
    pub fn with_header_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.header_prefix = prefix.into();
        self
    }

    /// Set the code block language class prefix.
    #[must_use]
    pub fn with_lang_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.lang_prefix = prefix.into();
        self
    }

    /// Enable or disable `target="_blank"` on external links.
    #[must_use]
    pub fn with_link_target_blank(mut self, enabled: bool) -> Self {
        self.link_target_blank = enabled;
        self
    }

    /// Enable or disable GitHub Flavored Markdown extensions.
    #[must_use]
    pub fn with_gfm(mut self, enabled: bool) -> Self {
        self.gfm = enabled;
        self
    }

    /// Enable or disable rendering soft breaks as `<br>`.
    #[must_use]
    pub fn with_breaks(mut self, enabled: bool) -> Self {
        self.breaks = enabled;
        self
    }

    /// Enable or disable math parsing.
    #[must_use]
    pub fn with_math(mut self, enabled: bool) -> Self {
        self.math = enabled;
        self
    }
}
