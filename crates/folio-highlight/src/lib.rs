//! Code tokenizing and HTML syntax highlighting.
//!
//! [`tokenize`] splits code into labeled [`Token`]s against a [`Grammar`],
//! always picking the longest match at the current position. A
//! [`Highlighter`] turns those tokens into `<span class="token KIND">`
//! markup and can rewrite every `<pre><code class="language-...">` element
//! of an HTML document in place.
//!
//! One grammar ships with the crate, [`Grammar::c_like`], and it is used for
//! every language tag.
//!
//! # Example
//!
//! ```
//! let html = r#"<pre><code class="language-cpp">return 1;</code></pre>"#;
//! assert_eq!(
//!     folio_highlight::highlight_all(html),
//!     "<pre><code class=\"language-cpp\">\
//!      <span class=\"token keyword\">return</span> \
//!      <span class=\"token number\">1</span>\
//!      <span class=\"token punctuation\">;</span></code></pre>"
//! );
//! ```

mod grammar;
mod highlight;
mod tokenizer;

pub use grammar::{Grammar, Pattern};
pub use highlight::{
    Highlighter, TOKEN_CLASS, highlight_all, highlight_element, language_of,
};
pub use tokenizer::{TEXT_KIND, Token, tokenize};
