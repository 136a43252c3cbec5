//! HTML handling for outbound email bodies.
//!
//! The production sanitizer is an external collaborator; the trait keeps it
//! swappable. The conservative default rewrites anything outside a small tag
//! allow-list, which makes "cleaning changed the body" detectable by a plain
//! string comparison.

use once_cell::sync::Lazy;
use regex::Regex;

/// Allow-listed tags for email bodies.
const ALLOWED_TAGS: &[&str] = &["a", "b", "br", "em", "i", "li", "ol", "p", "strong", "ul"];

static SCRIPT_BLOCK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<(script|style)\b[^>]*>.*?</(script|style)\s*>").unwrap());

static TAG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<\s*(/?)([a-zA-Z][a-zA-Z0-9]*)([^>]*?)(/?)>").unwrap());

static ANY_TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").unwrap());

static HREF_ATTR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"^href="(https?://[^"]*)"$"#).unwrap());

pub trait HtmlSanitizer: Send + Sync {
    fn clean(&self, html: &str) -> String;
}

/// Tag allow-list sanitizer. Idempotent, and an identity function on bodies
/// that are already well formed under the allow-list.
#[derive(Default)]
pub struct ConservativeSanitizer;

impl ConservativeSanitizer {
    pub fn new() -> Self {
        Self
    }
}

impl HtmlSanitizer for ConservativeSanitizer {
    fn clean(&self, html: &str) -> String {
        let without_scripts = SCRIPT_BLOCK_RE.replace_all(html, "");
        TAG_RE
            .replace_all(&without_scripts, |caps: &regex::Captures| {
                let closing = !caps[1].is_empty();
                let name = caps[2].to_lowercase();
                let attrs = caps[3].trim();
                let self_closing = !caps[4].is_empty();

                if !ALLOWED_TAGS.contains(&name.as_str()) {
                    return String::new();
                }
                if closing {
                    return format!("</{}>", name);
                }
                // Attributes are dropped except for a plain https?:// href
                // on anchors.
                if name == "a" {
                    if let Some(href) = HREF_ATTR_RE.captures(attrs) {
                        return format!("<a href=\"{}\">", &href[1]);
                    }
                }
                let slash = if self_closing { "/" } else { "" };
                format!("<{}{}>", name, slash)
            })
            .to_string()
    }
}

/// Derives the plaintext rendering of a cleaned HTML body: line breaks and
/// paragraph boundaries become newlines, remaining tags are stripped.
pub fn render_plaintext(html: &str) -> String {
    let with_breaks = html
        .replace("<br/>", "\n")
        .replace("<br>", "\n")
        .replace("</p><p>", "</p>\n<p>");
    strip_html_tags(&with_breaks)
}

/// Removes all HTML tags, leaving only text content.
pub fn strip_html_tags(html: &str) -> String {
    ANY_TAG_RE.replace_all(html, "").to_string()
}
