//! `quill render` command implementation.

use std::io::Write;
use std::path::{Path, PathBuf};

use clap::Args;
use quill_config::{CliSettings, Config};
use quill_renderer::render_markdown;

use crate::error::CliError;
use crate::output::Output;

/// Input path that reads markdown from stdin.
const STDIN_PATH: &str = "-";

/// Arguments for the render command.
#[derive(Args)]
pub(crate) struct RenderArgs {
    /// Markdown file to render ("-" reads stdin).
    input: PathBuf,

    /// Write HTML to this file instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Path to configuration file (default: auto-discover quill.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Emit self-closing void elements (overrides config).
    #[arg(long)]
    xhtml: bool,

    /// Number headings sequentially instead of slugging their text (overrides config).
    #[arg(long)]
    sequential_ids: bool,

    /// Prefix for heading ids (overrides config).
    #[arg(long)]
    header_prefix: Option<String>,

    /// Prefix for code block language classes (overrides config).
    #[arg(long)]
    lang_prefix: Option<String>,

    /// Open external links in a new tab (overrides config).
    #[arg(long)]
    target_blank: bool,

    /// Render soft line breaks as <br> (overrides config).
    #[arg(long)]
    breaks: bool,

    /// Parse $...$ and $$...$$ math (overrides config).
    #[arg(long)]
    math: bool,

    /// Enable verbose output (debug logs).
    #[arg(short, long)]
    pub verbose: bool,
}

impl RenderArgs {
    /// Execute the render command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails, the input cannot be read,
    /// rendering rejects the document, or the output cannot be written.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = self.cli_settings();
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        if config.render.sanitize {
            output.warning("render.sanitize is set but output is not sanitized");
        }

        let markdown = read_input(&self.input)?;
        tracing::debug!(input = %self.input.display(), bytes = markdown.len(), "Rendering");
        let result = render_markdown(&markdown, &config.render)?;

        match &self.output {
            Some(path) => {
                if let Some(config_path) = &config.config_path {
                    output.info(&format!("Config: {}", config_path.display()));
                }
                std::fs::write(path, &result.html)?;
                output.rendered(path, result.heading_count, result.footnote_count);
            }
            None => {
                let mut stdout = std::io::stdout().lock();
                stdout.write_all(result.html.as_bytes())?;
                stdout.flush()?;
            }
        }

        Ok(())
    }

    /// Build config overrides from flags. Flags only ever switch options on.
    fn cli_settings(&self) -> CliSettings {
        CliSettings {
            xhtml: self.xhtml.then_some(true),
            header_id_sequential: self.sequential_ids.then_some(true),
            header_prefix: self.header_prefix.clone(),
            lang_prefix: self.lang_prefix.clone(),
            link_target_blank: self.target_blank.then_some(true),
            breaks: self.breaks.then_some(true),
            math: self.math.then_some(true),
        }
    }
}

/// Read markdown from a file, or from stdin when the path is `-`.
fn read_input(path: &Path) -> Result<String, CliError> {
    if path == Path::new(STDIN_PATH) {
        Ok(std::io::read_to_string(std::io::stdin())?)
    } else {
        Ok(std::fs::read_to_string(path)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use pretty_assertions::assert_eq;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        args: RenderArgs,
    }

    fn parse(args: &[&str]) -> RenderArgs {
        TestCli::parse_from(std::iter::once("quill").chain(args.iter().copied())).args
    }

    #[test]
    fn test_cli_settings_default_flags_override_nothing() {
        let settings = parse(&["doc.md"]).cli_settings();
        assert_eq!(settings.xhtml, None);
        assert_eq!(settings.header_id_sequential, None);
        assert_eq!(settings.header_prefix, None);
        assert_eq!(settings.lang_prefix, None);
        assert_eq!(settings.link_target_blank, None);
        assert_eq!(settings.breaks, None);
        assert_eq!(settings.math, None);
    }

    #[test]
    fn test_cli_settings_from_flags() {
        let settings = parse(&[
            "doc.md",
            "--xhtml",
            "--sequential-ids",
            "--header-prefix",
            "h-",
            "--target-blank",
            "--math",
        ])
        .cli_settings();
        assert_eq!(settings.xhtml, Some(true));
        assert_eq!(settings.header_id_sequential, Some(true));
        assert_eq!(settings.header_prefix.as_deref(), Some("h-"));
        assert_eq!(settings.link_target_blank, Some(true));
        assert_eq!(settings.breaks, None);
        assert_eq!(settings.math, Some(true));
    }

    #[test]
    fn test_execute_writes_output_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("doc.md");
        let config = dir.path().join("quill.toml");
        let html = dir.path().join("doc.html");
        std::fs::write(&input, "# Title\n\n---\n").unwrap();
        std::fs::write(&config, "[render]\nheader_prefix = \"doc-\"\n").unwrap();

        let args = parse(&[
            input.to_str().unwrap(),
            "--config",
            config.to_str().unwrap(),
            "--output",
            html.to_str().unwrap(),
            "--xhtml",
        ]);
        args.execute().unwrap();

        assert_eq!(
            std::fs::read_to_string(&html).unwrap(),
            "<h1 id=\"doc-title\">Title</h1>\n<hr/>\n"
        );
    }

    #[test]
    fn test_execute_missing_input() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("quill.toml");
        std::fs::write(&config, "").unwrap();
        let missing = dir.path().join("missing.md");

        let args = parse(&[
            missing.to_str().unwrap(),
            "--config",
            config.to_str().unwrap(),
        ]);
        let err = args.execute().unwrap_err();
        assert!(matches!(err, CliError::Io(_)));
    }
}
