//! `rfcmark render` command implementation.

use std::io::Write;
use std::path::PathBuf;

use clap::Args;
use rfcmark_config::{CliSettings, Config};
use rfcmark_renderer::{BibxmlNaming, MarkdownConverter, RenderFlags, RenderResult};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the render command.
#[derive(Args)]
pub(crate) struct RenderArgs {
    /// Markdown document to render.
    input: PathBuf,

    /// Output file (default: stdout).
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Emit a bare fragment without the document wrapper.
    #[arg(long)]
    fragment: bool,

    /// Path to configuration file (default: auto-discover rfcmark.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory prepended to derived reference file names (overrides config).
    #[arg(long, env = "RFCMARK_REFERENCES_DIR")]
    references_dir: Option<String>,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

impl RenderArgs {
    /// Execute the render command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails or the input cannot be read
    /// or the output written.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            standalone: self.fragment.then_some(false),
            references_dir: self.references_dir,
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        if !self.input.exists() {
            return Err(CliError::InputNotFound(self.input));
        }
        let markdown = std::fs::read_to_string(&self.input)?;

        let result = render_document(&config, &markdown);
        tracing::info!(
            input = %self.input.display(),
            bytes = result.xml.len(),
            warnings = result.warnings.len(),
            "Rendered document"
        );

        for warning in &result.warnings {
            output.warning(&format!("Warning: {warning}"));
        }

        match &self.output {
            Some(path) => {
                std::fs::write(path, &result.xml)?;
                output.success(&format!("Wrote {}", path.display()));
            }
            None => {
                let mut stdout = std::io::stdout().lock();
                stdout.write_all(result.xml.as_bytes())?;
                stdout.flush()?;
            }
        }

        if let Some(title) = &result.title {
            output.info(&format!("Title: {title}"));
        }

        Ok(())
    }
}

/// Convert `markdown` with the settings from `config`.
fn render_document(config: &Config, markdown: &str) -> RenderResult {
    let flags = if config.render.standalone {
        RenderFlags::standalone()
    } else {
        RenderFlags::fragment()
    };
    let naming = config
        .references
        .directory
        .as_deref()
        .map_or_else(BibxmlNaming::default, BibxmlNaming::with_directory);

    MarkdownConverter::new()
        .with_flags(flags)
        .with_naming(naming)
        .convert(markdown)
}
