//! The ordered conversion pipeline.

use std::borrow::Cow;

use crate::protect::{self, BlockKind, ProtectedText};
use crate::stages;

/// A named rewriting stage.
///
/// Stages run in declaration order over a buffer in which all code has
/// already been replaced by placeholders.
struct Stage {
    name: &'static str,
    run: fn(&str) -> String,
}

/// Markdown stages between protection and restoration.
///
/// Order matters: emphasis runs longest delimiter first, tables and lists
/// group rows emitted as single lines, and paragraph wrapping must see the
/// block tags produced by everything before it.
const STAGES: &[Stage] = &[
    Stage {
        name: "headers",
        run: stages::headers,
    },
    Stage {
        name: "emphasis",
        run: stages::emphasis,
    },
    Stage {
        name: "links",
        run: stages::links,
    },
    Stage {
        name: "tables",
        run: stages::tables,
    },
    Stage {
        name: "lists",
        run: stages::lists,
    },
    Stage {
        name: "horizontal-rules",
        run: stages::horizontal_rules,
    },
    Stage {
        name: "blockquotes",
        run: stages::blockquotes,
    },
    Stage {
        name: "paragraphs",
        run: stages::paragraphs,
    },
];

const PROTECT_STAGES: [&str; 2] = ["fenced-code", "inline-code"];
const RESTORE_STAGES: [&str; 2] = ["restore-inline-code", "restore-fenced-code"];

/// Names of every pipeline stage, in execution order.
///
/// ```
/// let names: Vec<_> = folio_markdown::stage_names().collect();
/// assert_eq!(names.first(), Some(&"fenced-code"));
/// assert_eq!(names.last(), Some(&"restore-fenced-code"));
/// ```
pub fn stage_names() -> impl Iterator<Item = &'static str> {
    PROTECT_STAGES
        .into_iter()
        .chain(STAGES.iter().map(|stage| stage.name))
        .chain(RESTORE_STAGES)
}

/// Convert markdown text to an HTML fragment.
///
/// Never fails: anything that matches no rule passes through as literal
/// text. Code inside fenced blocks and inline spans is HTML-escaped and
/// never touched by the markdown rules.
///
/// ```
/// use folio_markdown::convert;
///
/// assert_eq!(convert("# Title"), "<h1>Title</h1>");
/// assert_eq!(convert("**bold**"), "<p><strong>bold</strong></p>");
/// assert_eq!(convert(""), "");
/// ```
pub fn convert(markdown: &str) -> String {
    let markdown = normalize_line_endings(markdown);

    let segments = protect::extract_inline(protect::extract_fenced(&markdown));
    let ProtectedText { mut buffer, blocks } = ProtectedText::from_segments(segments);
    tracing::trace!(blocks = blocks.len(), "protected code regions");

    for stage in STAGES {
        buffer = (stage.run)(&buffer);
        tracing::trace!(stage = stage.name, len = buffer.len(), "applied stage");
    }

    let html = protect::restore(&buffer, &blocks, BlockKind::Inline);
    protect::restore(&html, &blocks, BlockKind::Fenced)
}

fn normalize_line_endings(text: &str) -> Cow<'_, str> {
    if text.contains('\r') {
        Cow::Owned(text.replace("\r\n", "\n"))
    } else {
        Cow::Borrowed(text)
    }
}
