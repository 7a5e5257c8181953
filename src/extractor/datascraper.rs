// src/extractor/datascraper.rs

use scraper::Html;

/// Text under these elements never reaches the rendered page.
const HIDDEN_PARENTS: [&str; 5] = ["style", "script", "head", "title", "meta"];

/// Reduces an HTML document to lowercase alphanumeric words separated by
/// single spaces.
pub fn page_text_from_html(body_html: &str) -> String {
    let document = Html::parse_document(body_html);
    let visible = visible_text(&document);
    strip_special_chars(&visible.to_lowercase())
}

/// Joins every visible text node of the document, each trimmed, with single spaces.
///
/// A text node is visible when its direct parent is an element other than
/// the ones in `HIDDEN_PARENTS`. Comments are separate nodes and never match.
pub fn visible_text(document: &Html) -> String {
    let texts = document.tree.root().descendants().filter_map(|node| {
        let text = node.value().as_text()?;
        // Text hanging directly off the document root has no element parent.
        let parent = node.parent()?;
        let element = parent.value().as_element()?;
        if HIDDEN_PARENTS.contains(&element.name()) {
            return None;
        }
        Some(&**text)
    });
    clean_text(texts)
}

fn clean_text<'a>(text_iter: impl Iterator<Item = &'a str>) -> String {
    let mut buffer = String::with_capacity(1024);
    let mut first = true;
    for part in text_iter {
        let trimmed = part.trim();
        if !trimmed.is_empty() {
            if !first {
                buffer.push(' ');
            }
            buffer.push_str(trimmed);
            first = false;
        }
    }
    buffer
}

/// Drops everything but alphanumerics and whitespace, then collapses whitespace runs.
pub fn strip_special_chars(text: &str) -> String {
    let kept: String = text
        .chars()
        .filter_map(|c| {
            if c.is_alphanumeric() {
                Some(c)
            } else if c.is_whitespace() {
                Some(' ')
            } else {
                None
            }
        })
        .collect();
    kept.split_whitespace().collect::<Vec<_>>().join(" ")
}
