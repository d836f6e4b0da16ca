//! Folio CLI - markdown to HTML with code highlighting.
//!
//! Provides commands for:
//! - `render`: Convert one markdown file to HTML
//! - `build`: Convert every markdown file of a source directory
//! - `tokens`: Print the token stream of a code file

mod commands;
mod error;
mod output;
mod page;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{BuildArgs, RenderArgs, TokensArgs};
use output::Output;

/// Folio - markdown to HTML with code highlighting.
#[derive(Parser)]
#[command(name = "folio", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a markdown file to HTML.
    Render(RenderArgs),
    /// Convert all markdown files under the source directory.
    Build(BuildArgs),
    /// Print the token stream of a code file.
    Tokens(TokensArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    let verbose = matches!(&cli.command, Commands::Build(args) if args.verbose);

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Render(args) => args.execute(),
        Commands::Build(args) => args.execute(),
        Commands::Tokens(args) => args.execute(),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
