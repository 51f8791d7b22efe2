/*!
 * Deterministic, model-free description generator.
 *
 * The output is built from fixed blocks and then padded with filler
 * sentences until the length window's minimum is reached:
 * 1. the old description, verbatim, when present
 * 2. a header with title, brand and category
 * 3. static sections (highlights, usage, care, FAQ)
 * 4. the image list
 * 5. filler sentences, cycling through a deduplicated pool
 * 6. truncation to the window's maximum
 *
 * When the pool runs out, every sentence gets an annotation suffix and the
 * pool is deduplicated again, so each cycle is textually distinct from the
 * previous one. Every iteration appends at least a line break, which bounds
 * the loop.
 */

use std::collections::HashSet;

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

use super::markup::{
    bold, escape_text, image_block, old_description_block, section, LINE_BREAK,
    NEW_DESCRIPTION_HEADING,
};
use crate::app_config::ContentConfig;
use crate::catalog::ProductRecord;
use crate::errors::ContentError;
use crate::validation::normalize::{collapse_whitespace, markup_len};
use crate::validation::LengthWindow;

/// Suffix appended to every pool sentence when the pool is exhausted
pub const ANNOTATION_SUFFIX: &str = " (Note: this section should be updated with product data.)";

/// Used only if no filler sentence could be built
pub const GENERIC_FILLER: &str =
    "Product details can be completed using the technical data on the product page.";

/// Pool fragments shorter than this are dropped
const MIN_FILLER_CHARS: usize = 12;

static SENTENCE_END: Lazy<Regex> = Lazy::new(|| Regex::new(r"[.!?]\s+").unwrap());

const STRUCTURAL_SECTIONS: &[(&str, &[&str])] = &[
    (
        "Highlights",
        &[
            "Product information can be clarified using the technical data on the page.",
            "Intended uses and scenarios can be described point by point.",
            "Care and cleaning steps can be adjusted to the material.",
        ],
    ),
    (
        "Usage Scenarios",
        &[
            "It can be considered a practical option for everyday use.",
            "Suitability for different environments can be added here.",
            "Care suggestions can be tailored to how often it is used.",
        ],
    ),
    (
        "Care and Cleaning",
        &[
            "Label instructions take priority where available.",
            "A cleaning method suited to the material should be stated clearly.",
            "Storage conditions can be added for a longer service life.",
        ],
    ),
    (
        "Frequently Asked Questions",
        &[
            "Size selection: compare with the product measurements before choosing.",
            "Package contents: confirm quantity and contents on the product page.",
            "Compatibility: explained through intended use and target user information.",
        ],
    ),
];

/// Model-free generator bound to a length window
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StubGenerator {
    window: LengthWindow,
    inline_images: bool,
}

impl Default for StubGenerator {
    fn default() -> Self {
        Self::new(LengthWindow::default(), false)
    }
}

impl StubGenerator {
    pub fn new(window: LengthWindow, inline_images: bool) -> Self {
        Self {
            window,
            inline_images,
        }
    }

    /// Create a generator from the content configuration
    pub fn from_config(config: &ContentConfig) -> Result<Self, ContentError> {
        Ok(Self::new(
            LengthWindow::new(config.min_chars, config.max_chars)?,
            config.inline_images,
        ))
    }

    pub fn window(&self) -> LengthWindow {
        self.window
    }

    pub fn inline_images(&self) -> bool {
        self.inline_images
    }

    /// Generate markup for `product`. Same input, same output.
    pub fn generate(&self, product: &ProductRecord) -> String {
        let mut markup = String::new();

        if let Some(old_description) = product.old_description() {
            markup.push_str(&old_description_block(old_description));
        }
        markup.push_str(&header_block(product));
        for (title, items) in STRUCTURAL_SECTIONS {
            markup.push_str(&section(title, items.iter()));
        }
        markup.push_str(&image_block(&product.image_urls, self.inline_images));

        let mut len = markup_len(&markup);
        let mut pool = filler_pool(product);
        let mut cursor = 0;
        let mut cycles = 0;

        while len < self.window.min_chars {
            if cursor >= pool.len() {
                pool = annotate(&pool);
                cursor = 0;
                cycles += 1;
            }
            let line = format!("{}{}", escape_text(&pool[cursor]), LINE_BREAK);
            len += markup_len(&line);
            markup.push_str(&line);
            cursor += 1;
        }

        debug!(
            "Stub for '{}': {} chars after {} filler cycle(s)",
            product.title,
            len,
            cycles + 1
        );

        self.window.truncate(markup)
    }
}

fn header_block(product: &ProductRecord) -> String {
    let mut header = format!("{}{}", bold(NEW_DESCRIPTION_HEADING), LINE_BREAK);
    header.push_str(&format!(
        "{} {}{}",
        bold("Product:"),
        escape_text(&product.title),
        LINE_BREAK
    ));
    if let Some(brand) = product.brand() {
        header.push_str(&format!("{} {}{}", bold("Brand:"), escape_text(brand), LINE_BREAK));
    }
    if let Some(category) = product.category_path() {
        header.push_str(&format!(
            "{} {}{}",
            bold("Category:"),
            escape_text(category),
            LINE_BREAK
        ));
    }
    header.push_str(LINE_BREAK);
    header
}

/// Ordered, deduplicated filler sentences for `product`; never empty.
pub fn filler_pool(product: &ProductRecord) -> Vec<String> {
    let title = collapse_whitespace(&product.title);
    let mut blocks = Vec::new();

    if !title.is_empty() {
        blocks.push(format!(
            "The details below for {} can be refined using the information on the product page.",
            title
        ));
    }

    let mut identity = String::new();
    if let Some(brand) = product.brand() {
        identity.push_str(&format!("Brand: {}. ", collapse_whitespace(brand)));
    }
    match product.category_path() {
        Some(category) => identity.push_str(&format!("Category path: {}.", collapse_whitespace(category))),
        None => identity.push_str("Category information can be updated according to the product tree."),
    }
    blocks.push(identity);

    blocks.extend(
        [
            "Product features should be backed by technical data such as material, dimensions, area of use and care steps.",
            "Usage suggestions may differ with user habits and can be explained through example scenarios.",
            "Size information can be given as a table where available; otherwise the measurements can be stated in the text.",
            "Visual elements such as colour, pattern and texture should be described consistently with the product images and name.",
            "Package contents should be stated: single or multiple items, quantity and any accessories.",
            "Care and cleaning steps should be written as short, clear points that suit the material.",
            "Points to watch during use can be listed for safe and correct handling.",
            "Compatibility should be explained where relevant: intended purpose, target user, season or environment.",
            "Storage suggestions can be added, covering folding, keeping and humidity or heat conditions.",
            "A questions section can hold short answers to product-focused questions other than returns and delivery.",
            "The description should spread information across different headings without repeating the same wording.",
            "The text becomes more consistent once it is updated with real product data, and missing fields should be filled from that data.",
        ]
        .into_iter()
        .map(str::to_string),
    );

    let mut pool = dedup_keep_order(blocks.iter().flat_map(|block| sentencize(block)));
    if pool.is_empty() {
        pool.push(GENERIC_FILLER.to_string());
    }
    pool
}

/// Split after `.`, `!` or `?` followed by whitespace, keeping the terminator
fn sentencize(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut start = 0;
    for m in SENTENCE_END.find_iter(text) {
        // terminators are single-byte ASCII
        sentences.push(&text[start..m.start() + 1]);
        start = m.end();
    }
    sentences.push(&text[start..]);

    sentences
        .into_iter()
        .map(collapse_whitespace)
        .filter(|s| s.chars().count() >= MIN_FILLER_CHARS)
        .collect()
}

fn dedup_keep_order<I: IntoIterator<Item = String>>(sentences: I) -> Vec<String> {
    let mut seen = HashSet::new();
    sentences
        .into_iter()
        .filter(|s| seen.insert(collapse_whitespace(s).to_lowercase()))
        .collect()
}

fn annotate(pool: &[String]) -> Vec<String> {
    dedup_keep_order(pool.iter().map(|s| format!("{}{}", s, ANNOTATION_SUFFIX)))
}
