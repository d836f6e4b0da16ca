//! HTML highlighting of code elements.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::grammar::Grammar;
use crate::tokenizer::tokenize;

/// Class every highlight span carries before its token kind.
pub const TOKEN_CLASS: &str = "token";

static LANGUAGE_CLASS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"language-(\w+)").expect("invalid language class regex"));

/// `<pre><code class="...">` elements. Groups: opening tags, class, body.
static CODE_ELEMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)(<pre(?:\s[^>]*)?>\s*<code\s[^>]*?class="([^"]*)"[^>]*>)(.*?)</code>"#)
        .expect("invalid code element regex")
});

static TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").expect("invalid tag regex"));

/// Language name from a `class` attribute value, if it has `language-<name>`.
///
/// ```
/// assert_eq!(folio_highlight::language_of("block language-cpp"), Some("cpp"));
/// assert_eq!(folio_highlight::language_of("plain"), None);
/// ```
#[must_use]
pub fn language_of(class_attr: &str) -> Option<&str> {
    LANGUAGE_CLASS
        .captures(class_attr)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Wraps classified tokens of code in styling spans.
///
/// The grammar is chosen once per highlighter, never per element: the
/// language name only decides whether an element is highlighted at all.
#[derive(Clone, Debug)]
pub struct Highlighter<'g> {
    grammar: &'g Grammar,
    class_prefix: String,
}

impl Default for Highlighter<'static> {
    fn default() -> Self {
        Self::new(Grammar::c_like())
    }
}

impl<'g> Highlighter<'g> {
    /// Create a highlighter over `grammar` with the [`TOKEN_CLASS`] prefix.
    #[must_use]
    pub fn new(grammar: &'g Grammar) -> Self {
        Self {
            grammar,
            class_prefix: TOKEN_CLASS.to_owned(),
        }
    }

    /// Replace the class written before each token kind.
    #[must_use]
    pub fn with_class_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.class_prefix = prefix.into();
        self
    }

    /// Render plain code as highlighted HTML.
    ///
    /// `text` tokens are written as escaped text; every other token becomes
    /// `<span class="{prefix} {kind}">...</span>`.
    #[must_use]
    pub fn render(&self, code: &str) -> String {
        let mut html = String::with_capacity(code.len() * 2);
        for token in tokenize(code, self.grammar) {
            let content = html_escape::encode_text(token.content);
            if token.is_text() {
                html.push_str(&content);
            } else {
                html.push_str("<span class=\"");
                html.push_str(&self.class_prefix);
                html.push(' ');
                html.push_str(token.kind);
                html.push_str("\">");
                html.push_str(&content);
                html.push_str("</span>");
            }
        }
        html
    }

    /// Highlight the text content of one code element.
    ///
    /// Returns `None` when `class_attr` carries no `language-<name>` class,
    /// in which case the element should be left untouched.
    #[must_use]
    pub fn highlight_element(&self, class_attr: &str, text: &str) -> Option<String> {
        language_of(class_attr)?;
        Some(self.render(text))
    }

    /// Highlight every `<pre><code class="language-...">` element in `html`.
    ///
    /// The element body is read as text content (tags stripped, entities
    /// decoded), so highlighting an already highlighted document yields the
    /// same document. Elements without a language class are left as they
    /// are; nothing else in `html` is modified.
    #[must_use]
    pub fn highlight_all(&self, html: &str) -> String {
        let mut highlighted = 0usize;
        let result = CODE_ELEMENT.replace_all(html, |caps: &Captures| {
            let text = text_content(&caps[3]);
            match self.highlight_element(&caps[2], &text) {
                Some(body) => {
                    highlighted += 1;
                    format!("{}{body}</code>", &caps[1])
                }
                None => caps[0].to_owned(),
            }
        });
        tracing::debug!(elements = highlighted, "highlighted code elements");
        result.into_owned()
    }
}

/// Highlight `text` with the built-in grammar if `class_attr` names a language.
///
/// ```
/// let html = folio_highlight::highlight_element("language-cpp", "int x;");
/// assert_eq!(
///     html.as_deref(),
///     Some(r#"<span class="token keyword">int</span> x<span class="token punctuation">;</span>"#)
/// );
/// assert_eq!(folio_highlight::highlight_element("", "int x;"), None);
/// ```
#[must_use]
pub fn highlight_element(class_attr: &str, text: &str) -> Option<String> {
    Highlighter::default().highlight_element(class_attr, text)
}

/// Highlight every language-tagged code element in `html` with the built-in
/// grammar.
#[must_use]
pub fn highlight_all(html: &str) -> String {
    Highlighter::default().highlight_all(html)
}

fn text_content(inner_html: &str) -> String {
    let stripped = TAG.replace_all(inner_html, "");
    html_escape::decode_html_entities(&stripped).into_owned()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::grammar::Pattern;

    #[test]
    fn test_language_of() {
        assert_eq!(language_of("language-cpp"), Some("cpp"));
        assert_eq!(language_of("x language-c_99 y"), Some("c_99"));
        assert_eq!(language_of("language-"), None);
        assert_eq!(language_of(""), None);
    }

    #[test]
    fn test_render_spans() {
        let html = Highlighter::default().render("return 0;");
        assert_eq!(
            html,
            "<span class=\"token keyword\">return</span> \
             <span class=\"token number\">0</span>\
             <span class=\"token punctuation\">;</span>"
        );
    }

    #[test]
    fn test_render_escapes_content() {
        let html = Highlighter::default().render("a<b & \"s\"");
        assert_eq!(
            html,
            "a<span class=\"token operator\">&lt;</span>b \
             <span class=\"token operator\">&amp;</span> \
             <span class=\"token string\">\"s\"</span>"
        );
    }

    #[test]
    fn test_custom_prefix_and_grammar() {
        let grammar = Grammar::new().with_rule("digit", Pattern::new("[0-9]").unwrap());
        let html = Highlighter::new(&grammar)
            .with_class_prefix("hl")
            .render("a1");
        assert_eq!(html, "a<span class=\"hl digit\">1</span>");
    }

    #[test]
    fn test_highlight_element_requires_language() {
        let highlighter = Highlighter::default();
        assert_eq!(highlighter.highlight_element("wide", "int"), None);
        assert_eq!(
            highlighter.highlight_element("language-python", "int").as_deref(),
            Some("<span class=\"token keyword\">int</span>")
        );
    }

    #[test]
    fn test_highlight_all_decodes_text_content() {
        let html = r#"<pre><code class="language-cpp">a &lt;&lt; b;</code></pre>"#;
        assert_eq!(
            highlight_all(html),
            "<pre><code class=\"language-cpp\">a \
             <span class=\"token operator\">&lt;&lt;</span> b\
             <span class=\"token punctuation\">;</span></code></pre>"
        );
    }

    #[test]
    fn test_highlight_all_skips_untagged_elements() {
        let html = "<p>int</p>\n<pre><code>int x;</code></pre>\n<code>int</code>";
        assert_eq!(highlight_all(html), html);
    }

    #[test]
    fn test_highlight_all_multiple_elements() {
        let html = "<pre><code class=\"language-cpp\">int</code></pre>\n\
                    <p>between</p>\n\
                    <pre><code>plain</code></pre>\n\
                    <pre><code class=\"language-c\">0x1</code></pre>";
        assert_eq!(
            highlight_all(html),
            "<pre><code class=\"language-cpp\"><span class=\"token keyword\">int</span></code></pre>\n\
             <p>between</p>\n\
             <pre><code>plain</code></pre>\n\
             <pre><code class=\"language-c\"><span class=\"token number\">0x1</span></code></pre>"
        );
    }

    #[test]
    fn test_highlight_all_is_idempotent() {
        let html = "<pre><code class=\"language-cpp\">std::vector&lt;int&gt; v; // &amp;\n</code></pre>";
        let once = highlight_all(html);
        assert_eq!(highlight_all(&once), once);
    }

    #[test]
    fn test_highlight_all_multiline_body() {
        let html = "<pre><code class=\"language-cpp\">/* a\nb */\n</code></pre>";
        assert_eq!(
            highlight_all(html),
            "<pre><code class=\"language-cpp\"><span class=\"token comment\">/* a\nb */</span>\n</code></pre>"
        );
    }
}
