//! `folio render` command implementation.

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use clap::Args;
use folio_config::{CliSettings, Config};

use crate::error::CliError;
use crate::output::Output;
use crate::page::{PageOptions, render_page};

/// Arguments for the render command.
#[derive(Args)]
pub(crate) struct RenderArgs {
    /// Markdown file to convert.
    file: PathBuf,

    /// Write HTML to this file instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Skip code highlighting.
    #[arg(long)]
    no_highlight: bool,

    /// Wrap the fragment in a complete HTML document.
    #[arg(long)]
    standalone: bool,

    /// Path to configuration file (default: auto-discover folio.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl RenderArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let cli_settings = CliSettings {
            highlight: self.no_highlight.then_some(false),
            standalone: self.standalone.then_some(true),
            ..CliSettings::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        let markdown = fs::read_to_string(&self.file)?;
        let html = render_page(&markdown, &PageOptions::from(&config.render));
        tracing::info!(file = %self.file.display(), bytes = html.len(), "Rendered");

        match self.output {
            Some(path) => {
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    fs::create_dir_all(parent)?;
                }
                fs::write(&path, html)?;
                Output::new().success(&format!("Wrote {}", path.display()));
            }
            None => {
                let mut stdout = io::stdout().lock();
                writeln!(stdout, "{html}")?;
            }
        }
        Ok(())
    }
}
