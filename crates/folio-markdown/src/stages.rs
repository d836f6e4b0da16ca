//! Markdown rewriting stages.
//!
//! Every stage takes the working buffer and returns the rewritten buffer.
//! All stages assume code regions are already replaced by placeholders, so
//! nothing here ever sees the inside of a code block.

use std::fmt::Write;
use std::sync::LazyLock;

use regex::Regex;

use crate::protect::is_placeholder;

static H3_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^### (.*)$").expect("invalid h3 regex"));
static H2_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^## (.*)$").expect("invalid h2 regex"));
static H1_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^# (.*)$").expect("invalid h1 regex"));

// Emphasis spans stay on one line and never start or end with whitespace.
static BOLD_ITALIC_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\*\*\*(\S(?:.*?\S)?)\*\*\*").expect("invalid bold italic regex")
});
static BOLD_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*(\S(?:.*?\S)?)\*\*").expect("invalid bold regex"));
static ITALIC_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*(\S(?:.*?\S)?)\*").expect("invalid italic regex"));

static LINK_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[([^\]\n]+)\]\(([^)\n]+)\)").expect("invalid link regex")
});

static RULE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^---$").expect("invalid rule regex"));

static BLOCKQUOTE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^> (.*)$").expect("invalid blockquote regex"));

static BLANK_LINE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n\s*\n").expect("invalid blank line regex"));

/// Opening tags that mark a block as already rendered.
const BLOCK_TAGS: [&str; 11] = [
    "<h1",
    "<h2",
    "<h3",
    "<h4",
    "<h5",
    "<h6",
    "<ul",
    "<blockquote",
    "<pre",
    "<table",
    "<hr",
];

/// `#`, `##` and `###` line prefixes, longest first.
pub(crate) fn headers(text: &str) -> String {
    let text = H3_PATTERN.replace_all(text, "<h3>${1}</h3>");
    let text = H2_PATTERN.replace_all(&text, "<h2>${1}</h2>");
    H1_PATTERN.replace_all(&text, "<h1>${1}</h1>").into_owned()
}

/// Triple, double, then single asterisks.
pub(crate) fn emphasis(text: &str) -> String {
    let text = BOLD_ITALIC_PATTERN.replace_all(text, "<strong><em>${1}</em></strong>");
    let text = BOLD_PATTERN.replace_all(&text, "<strong>${1}</strong>");
    ITALIC_PATTERN.replace_all(&text, "<em>${1}</em>").into_owned()
}

/// `[label](url)` anchors. The URL is taken as written.
pub(crate) fn links(text: &str) -> String {
    LINK_PATTERN
        .replace_all(text, r#"<a href="${2}">${1}</a>"#)
        .into_owned()
}

/// Pipe tables.
///
/// Each contiguous run of `| ... |` lines becomes one table whose first
/// surviving row is the header. Separator cells are dropped, and a row left
/// without cells disappears.
pub(crate) fn tables(text: &str) -> String {
    let mut lines: Vec<String> = Vec::new();
    let mut rows: Vec<Vec<&str>> = Vec::new();
    let mut in_table = false;

    for line in text.split('\n') {
        if let Some(cells) = table_cells(line) {
            in_table = true;
            if !cells.is_empty() {
                rows.push(cells);
            }
            continue;
        }

        if in_table {
            flush_table(&mut rows, &mut lines);
            in_table = false;
        }
        lines.push(line.to_owned());
    }

    if in_table {
        flush_table(&mut rows, &mut lines);
    }

    lines.join("\n")
}

/// Parse a table line into its rendered cells.
fn table_cells(line: &str) -> Option<Vec<&str>> {
    let trimmed = line.trim();
    let inner = trimmed.strip_prefix('|')?.strip_suffix('|')?;

    Some(
        inner
            .split('|')
            .map(str::trim)
            .filter(|cell| !is_separator_cell(cell))
            .collect(),
    )
}

fn is_separator_cell(cell: &str) -> bool {
    !cell.is_empty() && cell.chars().all(|c| c == '-' || c == ':')
}

fn flush_table(rows: &mut Vec<Vec<&str>>, lines: &mut Vec<String>) {
    let mut rows = rows.drain(..);
    let Some(head) = rows.next() else {
        return;
    };

    let mut html = String::from("<table><thead>");
    push_row(&mut html, &head, "th");
    html.push_str("</thead>");

    let mut body = rows.peekable();
    if body.peek().is_some() {
        html.push_str("<tbody>");
        for row in body {
            push_row(&mut html, &row, "td");
        }
        html.push_str("</tbody>");
    }

    html.push_str("</table>");
    lines.push(html);
}

fn push_row(html: &mut String, cells: &[&str], tag: &str) {
    html.push_str("<tr>");
    for cell in cells {
        write!(html, "<{tag}>{cell}</{tag}>").unwrap();
    }
    html.push_str("</tr>");
}

/// `* ` / `- ` items, grouped into one `<ul>` per contiguous run.
pub(crate) fn lists(text: &str) -> String {
    let mut lines: Vec<String> = Vec::new();
    let mut items: Vec<String> = Vec::new();

    for line in text.split('\n') {
        if let Some(item) = line.strip_prefix("* ").or_else(|| line.strip_prefix("- ")) {
            items.push(list_item(item));
            continue;
        }

        if !items.is_empty() {
            lines.push(format!("<ul>{}</ul>", items.concat()));
            items.clear();
        }
        lines.push(line.to_owned());
    }

    if !items.is_empty() {
        lines.push(format!("<ul>{}</ul>", items.concat()));
    }

    lines.join("\n")
}

fn list_item(text: &str) -> String {
    if let Some(rest) = text.strip_prefix("[ ]") {
        format!(r#"<li><input type="checkbox" disabled>{rest}</li>"#)
    } else if let Some(rest) = text.strip_prefix("[x]") {
        format!(r#"<li><input type="checkbox" checked disabled>{rest}</li>"#)
    } else {
        format!("<li>{text}</li>")
    }
}

/// A line that is exactly `---`.
pub(crate) fn horizontal_rules(text: &str) -> String {
    RULE_PATTERN.replace_all(text, "<hr>").into_owned()
}

/// One `<blockquote>` per `> ` line; consecutive lines are not merged.
pub(crate) fn blockquotes(text: &str) -> String {
    BLOCKQUOTE_PATTERN
        .replace_all(text, "<blockquote>${1}</blockquote>")
        .into_owned()
}

/// Wrap loose text blocks in `<p>`.
///
/// Blocks are separated by blank lines. Blocks that already start with a
/// block-level tag, or that are a single placeholder, are emitted as they
/// are. Empty blocks are dropped.
pub(crate) fn paragraphs(text: &str) -> String {
    BLANK_LINE_PATTERN
        .split(text)
        .map(str::trim)
        .filter(|block| !block.is_empty())
        .map(|block| {
            if BLOCK_TAGS.iter().any(|tag| block.starts_with(tag)) || is_placeholder(block) {
                block.to_owned()
            } else {
                format!("<p>{}</p>", block.replace('\n', "<br>"))
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
