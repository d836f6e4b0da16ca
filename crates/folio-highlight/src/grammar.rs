//! Token grammars.
//!
//! A [`Grammar`] is an ordered list of `(kind, pattern)` rules. Registration
//! order only matters for ties: the tokenizer always prefers the longest
//! match and falls back to the first-registered rule among equals.

use std::sync::LazyLock;

use regex::Regex;

/// Pattern anchored at the start of the text it is applied to.
#[derive(Clone, Debug)]
pub struct Pattern {
    regex: Regex,
}

impl Pattern {
    /// Compile a pattern. The source is anchored to the start of the suffix.
    ///
    /// # Errors
    ///
    /// Returns the regex error if `source` is not a valid pattern.
    pub fn new(source: &str) -> Result<Self, regex::Error> {
        let regex = Regex::new(&format!("^(?:{source})"))?;
        Ok(Self { regex })
    }

    /// Length in bytes of the non-empty match at the start of `suffix`.
    ///
    /// Word boundaries are judged against `suffix` alone, so the first
    /// character of `suffix` always counts as the start of the text.
    #[must_use]
    pub fn match_len(&self, suffix: &str) -> Option<usize> {
        self.regex
            .find(suffix)
            .map(|m| m.end())
            .filter(|&len| len > 0)
    }
}

/// Ordered mapping from token kind to pattern.
#[derive(Clone, Debug, Default)]
pub struct Grammar {
    rules: Vec<(String, Pattern)>,
}

impl Grammar {
    /// Create an empty grammar. Every character tokenizes as `text`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a rule.
    #[must_use]
    pub fn with_rule(mut self, kind: impl Into<String>, pattern: Pattern) -> Self {
        self.rules.push((kind.into(), pattern));
        self
    }

    /// Rules in registration order.
    pub fn rules(&self) -> impl Iterator<Item = (&str, &Pattern)> {
        self.rules
            .iter()
            .map(|(kind, pattern)| (kind.as_str(), pattern))
    }

    /// The built-in grammar for C-like languages.
    ///
    /// Covers comments, quoted strings, the C++ keyword set, common standard
    /// library identifiers, decimal/hex/exponent numbers, operators,
    /// punctuation and the `::` namespace separator.
    #[must_use]
    pub fn c_like() -> &'static Grammar {
        &C_LIKE
    }
}

const COMMENT: &str = r"//[^\r\n\x{2028}\x{2029}]*|/\*(?s:.*?)\*/";

const STRING: &str = r#""(?:\\(?:\r\n|(?s:.))|[^"\\\r\n])*"|'(?:\\(?:\r\n|(?s:.))|[^'\\\r\n])*'"#;

const KEYWORDS: &[&str] = &[
    "alignas",
    "alignof",
    "asm",
    "auto",
    "bool",
    "break",
    "case",
    "catch",
    "char",
    "char8_t",
    "char16_t",
    "char32_t",
    "class",
    "const",
    "consteval",
    "constexpr",
    "constinit",
    "const_cast",
    "continue",
    "decltype",
    "default",
    "delete",
    "do",
    "double",
    "dynamic_cast",
    "else",
    "enum",
    "explicit",
    "export",
    "extern",
    "false",
    "float",
    "for",
    "friend",
    "goto",
    "if",
    "inline",
    "int",
    "long",
    "mutable",
    "namespace",
    "new",
    "noexcept",
    "nullptr",
    "operator",
    "private",
    "protected",
    "public",
    "register",
    "reinterpret_cast",
    "return",
    "short",
    "signed",
    "sizeof",
    "static",
    "static_assert",
    "static_cast",
    "struct",
    "switch",
    "template",
    "this",
    "thread_local",
    "throw",
    "true",
    "try",
    "typedef",
    "typeid",
    "typename",
    "union",
    "unsigned",
    "using",
    "virtual",
    "void",
    "volatile",
    "wchar_t",
    "while",
];

const BUILTINS: &[&str] = &[
    "std",
    "cout",
    "cin",
    "endl",
    "cerr",
    "clog",
    "string",
    "vector",
    "map",
    "set",
    "pair",
    "array",
    "list",
    "deque",
    "stack",
    "queue",
    "priority_queue",
    "unordered_map",
    "unordered_set",
    "shared_ptr",
    "unique_ptr",
    "weak_ptr",
    "make_shared",
    "make_unique",
    "move",
    "forward",
    "swap",
    "begin",
    "end",
    "size",
    "empty",
    "push_back",
    "pop_back",
    "push_front",
    "pop_front",
    "insert",
    "erase",
    "clear",
    "find",
    "sort",
    "reverse",
    "fill",
    "copy",
    "transform",
    "accumulate",
    "count",
    "max",
    "min",
    "abs",
    "sqrt",
    "pow",
    "ceil",
    "floor",
    "round",
];

// A leading `.` is never preceded by a word character at the start of the
// suffix, so the fraction-only branch needs no boundary assertion.
const NUMBER: &str =
    r"(?i)\b0x[0-9a-f]+\b|(?:\b[0-9]+(?:\.[0-9]*)?|\.[0-9]+)(?:e[+-]?[0-9]+)?";

const OPERATOR: &str = r"->|<<|>>|[<>]=?|[!=]=?=?|--?|\+\+?|&&?|\|\|?|[?*/%~^&|]";

const PUNCTUATION: &str = r"[{}\[\];(),.]";

const NAMESPACE: &str = "::";

/// Whole-word alternation over a fixed word list.
fn word_list(words: &[&str]) -> String {
    format!(r"\b(?:{})\b", words.join("|"))
}

static C_LIKE: LazyLock<Grammar> = LazyLock::new(|| {
    let rule = |source: &str| Pattern::new(source).expect("invalid built-in grammar pattern");

    Grammar::new()
        .with_rule("comment", rule(COMMENT))
        .with_rule("string", rule(STRING))
        .with_rule("keyword", rule(&word_list(KEYWORDS)))
        .with_rule("builtin", rule(&word_list(BUILTINS)))
        .with_rule("number", rule(NUMBER))
        .with_rule("operator", rule(OPERATOR))
        .with_rule("punctuation", rule(PUNCTUATION))
        .with_rule("namespace", rule(NAMESPACE))
});
