//! Page rendering shared by `render` and `build`.

use std::fmt::Write as _;

use folio_config::RenderConfig;

/// Title used when neither the config nor the document provides one.
const FALLBACK_TITLE: &str = "Document";

/// Options controlling how one markdown document becomes HTML.
#[derive(Debug, Clone, Default)]
pub(crate) struct PageOptions {
    pub highlight: bool,
    pub standalone: bool,
    pub title: Option<String>,
    pub stylesheet: Option<String>,
}

impl From<&RenderConfig> for PageOptions {
    fn from(config: &RenderConfig) -> Self {
        Self {
            highlight: config.highlight,
            standalone: config.standalone,
            title: config.title.clone(),
            stylesheet: config.stylesheet.clone(),
        }
    }
}

/// Convert markdown to HTML, then highlight code and wrap into a document
/// as the options request.
pub(crate) fn render_page(markdown: &str, options: &PageOptions) -> String {
    let mut body = folio_markdown::convert(markdown);
    if options.highlight {
        body = folio_highlight::highlight_all(&body);
    }

    if !options.standalone {
        return body;
    }

    let title = options
        .title
        .as_deref()
        .or_else(|| first_heading(markdown))
        .unwrap_or(FALLBACK_TITLE);
    wrap_document(&body, title, options.stylesheet.as_deref())
}

/// Text of the first `# ` heading line.
fn first_heading(markdown: &str) -> Option<&str> {
    markdown
        .lines()
        .find_map(|line| line.strip_prefix("# "))
        .map(str::trim)
        .filter(|title| !title.is_empty())
}

fn wrap_document(body: &str, title: &str, stylesheet: Option<&str>) -> String {
    let mut html = String::with_capacity(body.len() + 256);
    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    writeln!(html, "<title>{}</title>", html_escape::encode_text(title)).unwrap();
    if let Some(href) = stylesheet {
        writeln!(
            html,
            "<link rel=\"stylesheet\" href=\"{}\">",
            html_escape::encode_double_quoted_attribute(href)
        )
        .unwrap();
    }
    html.push_str("</head>\n<body>\n");
    html.push_str(body);
    html.push_str("\n</body>\n</html>\n");
    html
}
