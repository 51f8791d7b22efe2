/*!
 * Markup building blocks.
 *
 * Generated descriptions use only bold spans, unordered lists, list items
 * and line breaks. The image block may additionally hold `<img>` elements
 * when URLs are not inlined as text.
 */

use crate::validation::normalize::collapse_whitespace;

pub const LINE_BREAK: &str = "<br/>";

pub const CURRENT_DESCRIPTION_HEADING: &str = "Current Product Description";
pub const NEW_DESCRIPTION_HEADING: &str = "New Product Description";
pub const IMAGES_HEADING: &str = "Product Images";
pub const IMAGE_URLS_HEADING: &str = "Product Images (URL)";
pub const IMAGE_ALT: &str = "Product image";

/// Collapse whitespace and escape text for safe embedding
pub fn escape_text(text: &str) -> String {
    let collapsed = collapse_whitespace(text);
    let mut escaped = String::with_capacity(collapsed.len());
    for c in collapsed.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// `<strong>text</strong>`, text already escaped
pub fn bold(text: &str) -> String {
    format!("<strong>{}</strong>", text)
}

/// Bold heading followed by a line break
pub fn heading(text: &str) -> String {
    format!("{}{}", bold(text), LINE_BREAK)
}

/// Unordered list of already escaped items
pub fn list<I, S>(items: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out = String::from("<ul>");
    for item in items {
        out.push_str("<li>");
        out.push_str(item.as_ref());
        out.push_str("</li>");
    }
    out.push_str("</ul>");
    out
}

/// Heading, list and trailing line break
pub fn section<I, S>(title: &str, items: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    format!("{}{}{}", heading(title), list(items), LINE_BREAK)
}

/// The verbatim old-description block, always placed first.
pub fn old_description_block(old_description: &str) -> String {
    format!(
        "{}{}{}{}",
        heading(CURRENT_DESCRIPTION_HEADING),
        old_description,
        LINE_BREAK,
        LINE_BREAK
    )
}

/// Image list block; empty when there are no usable URLs.
///
/// With `inline_images` the URLs are listed as text, otherwise each item
/// wraps an image element.
pub fn image_block<S: AsRef<str>>(image_urls: &[S], inline_images: bool) -> String {
    let items: Vec<String> = image_urls
        .iter()
        .map(|url| url.as_ref().trim())
        .filter(|url| !url.is_empty())
        .map(|url| {
            if inline_images {
                escape_text(url)
            } else {
                format!(r#"<img src="{}" alt="{}" />"#, escape_text(url), IMAGE_ALT)
            }
        })
        .collect();

    if items.is_empty() {
        return String::new();
    }

    let title = if inline_images { IMAGE_URLS_HEADING } else { IMAGES_HEADING };
    section(title, items)
}
