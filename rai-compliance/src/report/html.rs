//! HTML report generator: standalone documents with embedded CSS, rendered
//! from the Markdown reports.

use pulldown_cmark::{Event, Options, Parser, html};

/// Convert a Markdown report into a complete HTML document.
///
/// Raw HTML in the Markdown (for instance inside a profile description) is
/// emitted as escaped text, never as markup.
pub fn markdown_to_document(title: &str, markdown: &str) -> String {
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"UTF-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n");
    html.push_str(&format!("<title>{}</title>\n", escape_html(title)));
    html.push_str("<style>\n");
    html.push_str(CSS_STYLES);
    html.push_str("</style>\n</head>\n<body>\n<main class=\"report\">\n");

    html.push_str(&markdown_to_html(markdown));

    html.push_str("</main>\n");
    html.push_str("<footer><p>Generated by RAI Toolkit</p></footer>\n");
    html.push_str("</body>\n</html>\n");
    html
}

/// Render a Markdown fragment with table support.
pub fn markdown_to_html(markdown: &str) -> String {
    let mut opts = Options::empty();
    opts.insert(Options::ENABLE_TABLES);
    opts.insert(Options::ENABLE_STRIKETHROUGH);

    let parser = Parser::new_ext(markdown, opts).map(|event| match event {
        Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
        other => other,
    });
    let mut output = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut output, parser);
    output
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

const CSS_STYLES: &str = r#"
body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; max-width: 960px; margin: 0 auto; padding: 20px; color: #333; background: #fafafa; }
h1 { border-bottom: 2px solid #333; padding-bottom: 10px; }
h2 { color: #555; margin-top: 1.6em; }
h3 { color: #666; }
hr { border: none; border-top: 1px solid #ddd; margin: 24px 0; }
table { border-collapse: collapse; width: 100%; margin: 10px 0; background: white; }
th, td { border: 1px solid #ddd; padding: 8px 12px; text-align: left; vertical-align: top; }
th { background: #f5f5f5; }
code { background: #f0f0f0; padding: 1px 4px; border-radius: 3px; }
footer { margin-top: 40px; color: #999; font-size: 0.85em; text-align: center; }
"#;
