//! Lightweight markdown to HTML conversion.
//!
//! [`convert`] rewrites a markdown string into an HTML fragment through an
//! explicit, ordered list of stages:
//!
//! 1. Fenced code and inline code are cut out into protected blocks and
//!    replaced by placeholders, so no later stage can touch code.
//! 2. Headers, emphasis, links, tables, lists, rules and blockquotes are
//!    rewritten line by line.
//! 3. Loose text is wrapped in paragraphs.
//! 4. Inline code, then fenced code, is put back as escaped HTML.
//!
//! This is not a `CommonMark` parser. Lists and blockquotes are single-level,
//! and anything that matches no rule is passed through as literal text.
//!
//! # Example
//!
//! ```
//! let html = folio_markdown::convert("# Notes\n\nSee `main()`.");
//! assert_eq!(html, "<h1>Notes</h1>\n<p>See <code>main()</code>.</p>");
//! ```

mod converter;
mod protect;
mod stages;

pub use converter::{convert, stage_names};
