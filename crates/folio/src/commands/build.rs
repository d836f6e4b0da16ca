//! `folio build` command implementation.

use std::fs;
use std::path::{Path, PathBuf};

use clap::Args;
use folio_config::{CliSettings, Config};

use crate::error::CliError;
use crate::output::Output;
use crate::page::{PageOptions, render_page};

/// Arguments for the build command.
#[derive(Args)]
pub(crate) struct BuildArgs {
    /// Path to configuration file (default: auto-discover folio.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Markdown source directory (overrides config).
    #[arg(short, long)]
    source_dir: Option<PathBuf>,

    /// Output directory for generated HTML (overrides config).
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

impl BuildArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            source_dir: self.source_dir.clone(),
            output_dir: self.output_dir.clone(),
            ..CliSettings::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        output.info(&format!(
            "Source: {}",
            config.docs_resolved.source_dir.display()
        ));
        output.info(&format!(
            "Output: {}",
            config.docs_resolved.output_dir.display()
        ));

        let written = build_site(&config)?;
        if written.is_empty() {
            output.warning("No markdown files found");
        } else {
            output.success(&format!(
                "Built {} page(s) to {}",
                written.len(),
                config.docs_resolved.output_dir.display()
            ));
        }
        Ok(())
    }
}

/// Convert every markdown file under the source directory.
///
/// Returns the written HTML paths, relative to the output directory.
fn build_site(config: &Config) -> Result<Vec<PathBuf>, CliError> {
    let source_dir = &config.docs_resolved.source_dir;
    let output_dir = &config.docs_resolved.output_dir;
    if !source_dir.is_dir() {
        return Err(CliError::Validation(format!(
            "Source directory not found: {}",
            source_dir.display()
        )));
    }

    let options = PageOptions::from(&config.render);
    let mut written = Vec::new();

    for rel_path in find_markdown_files(source_dir) {
        let markdown = fs::read_to_string(source_dir.join(&rel_path))?;
        let html = render_page(&markdown, &options);

        let html_path = rel_path.with_extension("html");
        let target = output_dir.join(&html_path);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&target, html)?;
        tracing::info!(source = %rel_path.display(), "Built page");
        written.push(html_path);
    }

    Ok(written)
}

/// Relative paths of all `.md` files under `root`, sorted.
///
/// Hidden files and directories are skipped.
fn find_markdown_files(root: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    scan_directory(root, Path::new(""), &mut files);
    files.sort();
    files
}

fn scan_directory(dir_path: &Path, rel_prefix: &Path, files: &mut Vec<PathBuf>) {
    let entries = match fs::read_dir(dir_path) {
        Ok(entries) => entries,
        Err(err) => {
            tracing::warn!(dir = %dir_path.display(), error = %err, "Cannot read directory");
            return;
        }
    };

    for entry in entries.filter_map(Result::ok) {
        let name = entry.file_name();
        if name.to_string_lossy().starts_with('.') {
            continue;
        }

        let path = entry.path();
        let rel_path = rel_prefix.join(&name);
        if entry.file_type().is_ok_and(|t| t.is_dir()) {
            scan_directory(&path, &rel_path, files);
        } else if path.extension().is_some_and(|e| e == "md") {
            files.push(rel_path);
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn create_project(toml: &str) -> (tempfile::TempDir, Config) {
        let temp_dir = tempfile::tempdir().unwrap();
        let config_path = temp_dir.path().join("folio.toml");
        fs::write(&config_path, toml).unwrap();
        fs::create_dir(temp_dir.path().join("content")).unwrap();
        let config = Config::load(Some(&config_path), None).unwrap();
        (temp_dir, config)
    }

    #[test]
    fn test_find_markdown_files() {
        let temp_dir = tempfile::tempdir().unwrap();
        let root = temp_dir.path();
        fs::create_dir_all(root.join("guide/deep")).unwrap();
        fs::create_dir(root.join(".hidden")).unwrap();
        fs::write(root.join("index.md"), "").unwrap();
        fs::write(root.join("notes.txt"), "").unwrap();
        fs::write(root.join(".draft.md"), "").unwrap();
        fs::write(root.join(".hidden/secret.md"), "").unwrap();
        fs::write(root.join("guide/setup.md"), "").unwrap();
        fs::write(root.join("guide/deep/more.md"), "").unwrap();

        assert_eq!(
            find_markdown_files(root),
            vec![
                PathBuf::from("guide/deep/more.md"),
                PathBuf::from("guide/setup.md"),
                PathBuf::from("index.md"),
            ]
        );
    }

    #[test]
    fn test_find_markdown_files_missing_dir() {
        let temp_dir = tempfile::tempdir().unwrap();
        assert!(find_markdown_files(&temp_dir.path().join("missing")).is_empty());
    }

    #[test]
    fn test_build_site_writes_pages() {
        let (temp_dir, config) = create_project("");
        let content = temp_dir.path().join("content");
        fs::create_dir(content.join("guide")).unwrap();
        fs::write(content.join("index.md"), "# Home").unwrap();
        fs::write(
            content.join("guide/code.md"),
            "```cpp\nreturn 0;\n```",
        )
        .unwrap();

        let written = build_site(&config).unwrap();

        assert_eq!(
            written,
            vec![PathBuf::from("guide/code.html"), PathBuf::from("index.html")]
        );
        let dist = temp_dir.path().join("dist");
        assert_eq!(
            fs::read_to_string(dist.join("index.html")).unwrap(),
            "<h1>Home</h1>"
        );
        assert!(
            fs::read_to_string(dist.join("guide/code.html"))
                .unwrap()
                .contains("<span class=\"token keyword\">return</span>")
        );
    }

    #[test]
    fn test_build_site_standalone_without_highlight() {
        let (temp_dir, config) = create_project(
            "[render]\nhighlight = false\nstandalone = true\ntitle = \"Site\"\n",
        );
        fs::write(
            temp_dir.path().join("content/page.md"),
            "```cpp\nint x;\n```",
        )
        .unwrap();

        build_site(&config).unwrap();

        let html = fs::read_to_string(temp_dir.path().join("dist/page.html")).unwrap();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>Site</title>"));
        assert!(html.contains("<code class=\"language-cpp\">int x;\n</code>"));
        assert!(!html.contains("<span"));
    }

    #[test]
    fn test_build_site_missing_source() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config_path = temp_dir.path().join("folio.toml");
        fs::write(&config_path, "").unwrap();
        let config = Config::load(Some(&config_path), None).unwrap();

        let err = build_site(&config).unwrap_err();

        assert!(matches!(err, CliError::Validation(_)));
        assert!(err.to_string().contains("Source directory not found"));
    }
}
