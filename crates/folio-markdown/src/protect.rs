//! Code protection for the conversion pipeline.
//!
//! Code regions are cut out of the input before any markdown stage runs. The
//! input is first split into typed [`Segment`]s; only text segments reach the
//! working buffer verbatim, while every code segment becomes a
//! [`ProtectedBlock`] referenced from the buffer by a [`Placeholder`].
//!
//! Placeholders are delimited by the private-use characters `U+E000` and
//! `U+E001`. Those characters are rewritten to numeric character references
//! wherever they occur in user text, so the only sentinels left in the buffer
//! are the ones inserted here.

use std::borrow::Cow;
use std::fmt::{self, Write};
use std::sync::LazyLock;

use regex::{Captures, Regex};

/// Opening sentinel of a placeholder.
const OPEN: char = '\u{E000}';
/// Closing sentinel of a placeholder.
const CLOSE: char = '\u{E001}';

/// Triple-backtick fence. Both fences start a line; the opening line carries
/// an optional info string and the closing line holds nothing else.
static FENCED_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?ms)^```([^`\n]*)\n(.*?)^```[ \t]*$").expect("invalid fence regex")
});

/// Single-backtick span on one line.
static INLINE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"`([^`\n]+)`").expect("invalid inline code regex"));

static PLACEHOLDER_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\x{E000}([FI])(\d+)\x{E001}").expect("invalid placeholder regex")
});

static LONE_PLACEHOLDER_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\x{E000}[FI]\d+\x{E001}$").expect("invalid placeholder regex")
});

/// Kind of protected code region.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum BlockKind {
    /// Triple-backtick fenced block.
    Fenced,
    /// Single-backtick inline span.
    Inline,
}

impl BlockKind {
    fn tag(self) -> char {
        match self {
            Self::Fenced => 'F',
            Self::Inline => 'I',
        }
    }

    fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "F" => Some(Self::Fenced),
            "I" => Some(Self::Inline),
            _ => None,
        }
    }
}

/// A code region removed from the working buffer.
///
/// `content` is HTML-escaped at creation time and never changes afterwards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct ProtectedBlock {
    /// Position in the side table.
    pub index: usize,
    /// Fenced block or inline span.
    pub kind: BlockKind,
    /// Language tag from the opening fence (fenced blocks only).
    pub language: Option<String>,
    /// Escaped code content.
    pub content: String,
}

impl ProtectedBlock {
    /// Placeholder standing in for this block inside the working buffer.
    #[must_use]
    pub(crate) fn placeholder(&self) -> Placeholder {
        Placeholder {
            kind: self.kind,
            index: self.index,
        }
    }

    /// Final HTML for this block.
    #[must_use]
    pub(crate) fn to_html(&self) -> String {
        match (self.kind, &self.language) {
            (BlockKind::Inline, _) => format!("<code>{}</code>", self.content),
            (BlockKind::Fenced, Some(language)) => format!(
                r#"<pre><code class="language-{}">{}</code></pre>"#,
                html_escape::encode_double_quoted_attribute(language),
                self.content
            ),
            (BlockKind::Fenced, None) => format!("<pre><code>{}</code></pre>", self.content),
        }
    }
}

/// Marker embedded in the working buffer in place of a protected block.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Placeholder {
    kind: BlockKind,
    index: usize,
}

impl fmt::Display for Placeholder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{OPEN}{}{}{CLOSE}", self.kind.tag(), self.index)
    }
}

/// A slice of the input classified by the protection passes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Segment<'a> {
    /// Markdown text subject to the rewriting stages.
    Text(&'a str),
    /// Body of a fenced block, with its language tag.
    Fenced {
        language: Option<&'a str>,
        body: &'a str,
    },
    /// Body of an inline code span.
    Inline(&'a str),
}

/// Split the input into text and fenced code segments.
pub(crate) fn extract_fenced(input: &str) -> Vec<Segment<'_>> {
    let mut segments = Vec::new();
    let mut last = 0;

    for caps in FENCED_PATTERN.captures_iter(input) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        push_text(&input[last..whole.start()], &mut segments);
        segments.push(Segment::Fenced {
            language: caps.get(1).and_then(|m| info_language(m.as_str())),
            body: caps.get(2).map_or("", |m| m.as_str()),
        });
        last = whole.end();
    }

    push_text(&input[last..], &mut segments);
    segments
}

/// Split every text segment further into text and inline code segments.
///
/// Fenced segments pass through untouched, so backticks inside a fenced body
/// never start an inline span.
pub(crate) fn extract_inline(segments: Vec<Segment<'_>>) -> Vec<Segment<'_>> {
    let mut out = Vec::with_capacity(segments.len());

    for segment in segments {
        let Segment::Text(text) = segment else {
            out.push(segment);
            continue;
        };

        let mut last = 0;
        for caps in INLINE_PATTERN.captures_iter(text) {
            let (Some(whole), Some(body)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            push_text(&text[last..whole.start()], &mut out);
            out.push(Segment::Inline(body.as_str()));
            last = whole.end();
        }
        push_text(&text[last..], &mut out);
    }

    out
}

/// Language tag of a fence info string: its first word, up to any comma.
fn info_language(info: &str) -> Option<&str> {
    info.split(|c: char| c.is_whitespace() || c == ',')
        .find(|word| !word.is_empty())
}

fn push_text<'a>(text: &'a str, segments: &mut Vec<Segment<'a>>) {
    if !text.is_empty() {
        segments.push(Segment::Text(text));
    }
}

/// Working buffer with its side table of protected blocks.
#[derive(Debug, Default)]
pub(crate) struct ProtectedText {
    pub(crate) buffer: String,
    pub(crate) blocks: Vec<ProtectedBlock>,
}

impl ProtectedText {
    /// Serialize segments into a buffer, escaping code bodies and replacing
    /// them with placeholders.
    pub(crate) fn from_segments(segments: Vec<Segment<'_>>) -> Self {
        let mut protected = Self::default();

        for segment in segments {
            match segment {
                Segment::Text(text) => protected.buffer.push_str(&neutralize(text)),
                Segment::Fenced { language, body } => {
                    protected.push_block(BlockKind::Fenced, language, body);
                }
                Segment::Inline(body) => protected.push_block(BlockKind::Inline, None, body),
            }
        }

        protected
    }

    fn push_block(&mut self, kind: BlockKind, language: Option<&str>, body: &str) {
        let block = ProtectedBlock {
            index: self.blocks.len(),
            kind,
            language: language.map(str::to_owned),
            content: neutralize(&html_escape::encode_quoted_attribute(body)).into_owned(),
        };
        write!(self.buffer, "{}", block.placeholder()).unwrap();
        self.blocks.push(block);
    }
}

/// Rewrite sentinel characters in user text to character references.
fn neutralize(text: &str) -> Cow<'_, str> {
    if text.contains([OPEN, CLOSE]) {
        Cow::Owned(text.replace(OPEN, "&#xE000;").replace(CLOSE, "&#xE001;"))
    } else {
        Cow::Borrowed(text)
    }
}

/// Replace every placeholder of `kind` with the HTML of its block.
pub(crate) fn restore(html: &str, blocks: &[ProtectedBlock], kind: BlockKind) -> String {
    PLACEHOLDER_PATTERN
        .replace_all(html, |caps: &Captures| {
            let block = BlockKind::from_tag(&caps[1])
                .filter(|found| *found == kind)
                .and_then(|_| caps[2].parse::<usize>().ok())
                .and_then(|index| blocks.get(index))
                .filter(|block| block.kind == kind);
            match block {
                Some(block) => block.to_html(),
                None => caps[0].to_owned(),
            }
        })
        .into_owned()
}

/// Whether `block` consists of exactly one placeholder.
pub(crate) fn is_placeholder(block: &str) -> bool {
    LONE_PLACEHOLDER_PATTERN.is_match(block)
}
