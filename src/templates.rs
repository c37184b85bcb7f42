//! Embedded web assets.
//!
//! Assets are embedded at compile time from the `templates/` directory so
//! the binary serves its page without any files on disk.

use serde_json::Value;

use crate::config::Link;

/// Chat page served at `/`
pub const INDEX_HTML: &str = include_str!("../templates/index.html");

/// Placeholder in [`INDEX_HTML`] replaced by the persona name
const NAME_SLOT: &str = "{{name}}";

/// Placeholder for the contact link list
const LINKS_SLOT: &str = "{{links}}";

/// Placeholder inside the page script; replaced by a JS string literal or `null`
const GREETING_SLOT: &str = "{{greeting}}";

/// Render the chat page for a persona.
///
/// Name and links are HTML-escaped. The greeting is embedded as a JSON
/// literal with `<` escaped so it cannot close the script element.
pub fn render_index(name: &str, greeting: Option<&str>, links: &[Link]) -> String {
    let greeting = greeting
        .map(Value::from)
        .unwrap_or(Value::Null)
        .to_string()
        .replace('<', "\\u003c");

    INDEX_HTML
        .replace(NAME_SLOT, &escape_html(name))
        .replace(LINKS_SLOT, &render_links(links))
        .replace(GREETING_SLOT, &greeting)
}

fn render_links(links: &[Link]) -> String {
    if links.is_empty() {
        return String::new();
    }

    let anchors: Vec<String> = links
        .iter()
        .map(|link| {
            format!(
                r#"<a href="{}" target="_blank" rel="noopener">{}</a>"#,
                escape_html(&link.url),
                escape_html(&link.label)
            )
        })
        .collect();
    format!(r#"<nav class="links">{}</nav>"#, anchors.join(""))
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
