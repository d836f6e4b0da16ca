//! `folio tokens` command implementation.

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use clap::Args;
use folio_highlight::{Grammar, Token, tokenize};

use crate::error::CliError;

/// Arguments for the tokens command.
#[derive(Args)]
pub(crate) struct TokensArgs {
    /// Code file to tokenize.
    file: PathBuf,

    /// Print tokens as a JSON array.
    #[arg(long)]
    json: bool,
}

impl TokensArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let code = fs::read_to_string(&self.file)?;
        let tokens = tokenize(&code, Grammar::c_like());
        tracing::info!(file = %self.file.display(), tokens = tokens.len(), "Tokenized");

        let mut stdout = io::stdout().lock();
        write_tokens(&mut stdout, &tokens, self.json)
    }
}

/// Write one `kind<TAB>content` line per token, or a JSON array.
fn write_tokens(out: &mut impl Write, tokens: &[Token<'_>], json: bool) -> Result<(), CliError> {
    if json {
        serde_json::to_writer_pretty(&mut *out, tokens)?;
        writeln!(out)?;
    } else {
        for token in tokens {
            writeln!(out, "{}\t{:?}", token.kind, token.content)?;
        }
    }
    Ok(())
}
