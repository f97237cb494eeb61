//! HTML fragment renderer for parsed markdown constructs.
//!
//! This crate provides the [`Renderer`] capability trait, one operation per
//! markdown construct, and its HTML implementation [`HtmlRenderer`]. Every
//! operation returns an HTML fragment meant to be concatenated with its
//! siblings by the caller.
//!
//! # Architecture
//!
//! - [`Options`]: immutable switches shared by every call of a render pass
//! - [`HeadingIds`]: the per-pass cursor behind sequential heading ids
//! - [`HtmlRenderer`]: borrows the options and owns the cursor
//! - [`Document`]: walks `pulldown-cmark` events in document order, hands
//!   already-rendered child HTML to the renderer and collects footnotes
//!
//! Output dialects (HTML vs XHTML void elements) are selected by
//! [`Options::xhtml`], not by separate renderer types.
//!
//! # Example
//!
//! ```
//! use quill_renderer::{Options, render_markdown};
//!
//! let options = Options::default();
//! let result = render_markdown("# Hello\n\n**Bold** text", &options).unwrap();
//! assert_eq!(
//!     result.html,
//!     "<h1 id=\"hello\">Hello</h1>\n<p><strong>Bold</strong> text</p>\n"
//! );
//! ```

mod document;
mod error;
mod html;
mod options;
mod renderer;
mod state;
mod util;

pub use document::{Document, RenderResult, render_markdown};
pub use error::RenderError;
pub use html::HtmlRenderer;
pub use options::Options;
pub use renderer::{Renderer, TableCellFlags};
pub use state::{HeadingIds, escape, slugify};
