//! Longest-match tokenizer.

use crate::grammar::Grammar;

/// Kind assigned to characters no rule matches.
pub const TEXT_KIND: &str = "text";

/// A labeled slice of the tokenized input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Token<'a> {
    /// Rule name, or [`TEXT_KIND`] for fallback characters.
    pub kind: &'a str,
    /// Matched text.
    pub content: &'a str,
}

impl Token<'_> {
    /// Whether this token is an unmatched fallback character.
    #[must_use]
    pub fn is_text(&self) -> bool {
        self.kind == TEXT_KIND
    }
}

/// Split `text` into tokens using `grammar`.
///
/// At every position each rule is tried against the remaining text. The
/// longest match wins and ties go to the rule registered first. When nothing
/// matches, a single character is emitted as a [`TEXT_KIND`] token, so the
/// scan always advances and the token contents concatenate back to `text`.
///
/// ```
/// use folio_highlight::{Grammar, tokenize};
///
/// let tokens = tokenize("x = 0x1F;", Grammar::c_like());
/// let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
/// assert_eq!(
///     kinds,
///     ["text", "text", "operator", "text", "number", "punctuation"]
/// );
/// ```
pub fn tokenize<'a>(text: &'a str, grammar: &'a Grammar) -> Vec<Token<'a>> {
    let mut tokens = Vec::new();
    let mut pos = 0;

    while let Some(rest) = text.get(pos..).filter(|rest| !rest.is_empty()) {
        let mut best: Option<(&str, usize)> = None;
        for (kind, pattern) in grammar.rules() {
            if let Some(len) = pattern.match_len(rest)
                && best.is_none_or(|(_, best_len)| len > best_len)
            {
                best = Some((kind, len));
            }
        }

        let (kind, len) = best.unwrap_or_else(|| {
            let width = rest.chars().next().map_or(1, char::len_utf8);
            (TEXT_KIND, width)
        });

        tokens.push(Token {
            kind,
            content: &rest[..len],
        });
        pos += len;
    }

    tokens
}
