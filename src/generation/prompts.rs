/*!
 * Prompt templates for description generation.
 *
 * The initial prompt encodes the same block order the stub generator uses:
 * old description verbatim, then new content, then images. The extension
 * prompt asks the model to append to an existing draft without editing it.
 */

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use super::markup::{
    image_block, old_description_block, CURRENT_DESCRIPTION_HEADING, NEW_DESCRIPTION_HEADING,
};
use crate::catalog::ProductRecord;
use crate::validation::LengthWindow;

static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{([a-z_]+)\}").unwrap());

/// Fill every `{name}` in `template` in a single pass.
///
/// Substituted text is never rescanned, so braces inside product fields stay
/// literal. Unknown placeholders are left as they are.
fn render(template: &str, values: &[(&str, &str)]) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &Captures| {
            values
                .iter()
                .find(|(name, _)| *name == &caps[1])
                .map(|(_, value)| (*value).to_string())
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

/// Builds prompts for one length window and image mode.
#[derive(Debug, Clone, Copy)]
pub struct PromptBuilder {
    window: LengthWindow,
    inline_images: bool,
}

impl PromptBuilder {
    /// First-pass generation prompt.
    pub const DESCRIPTION_WRITER: &'static str = r#"You are an SEO content generator for marketplace product pages.

OUTPUT RULES (VERY IMPORTANT):
- Output MUST be valid HTML.
- Use ONLY these tags: <strong>, <ul>, <li>, <br/>
- Return ONLY the HTML. No markdown, no explanations.

HARD CONSTRAINTS:
- Do NOT use banned words (a banned-word validator checks the output).
- Avoid exaggerated marketing language.
- Do NOT repeat the same sentence or near-identical sentence structure.
- Each paragraph must add NEW information (no filler).
- Total length MUST be between {min_chars} and {max_chars} characters.

MANDATORY ORDER:
1) If an old description exists, include it FIRST verbatim under the heading "{current_heading}".
2) Then write a NEW SEO description under the heading "{new_heading}".
3) If an image section is provided below, include it at the END exactly as given.

CONTENT PLAN (FOLLOW):
- General product overview (neutral, factual)
- Areas of use and scenarios (many scenarios, all different)
- Key features (bullet list; each bullet different)
- Material, texture and fit (category-relevant; if unknown, write safe general guidance)
- Size and fit guide (avoid absolute claims)
- Care, cleaning and longevity (practical steps)
- Styling and combination ideas (varied, category-specific)
- Gift ideas and user profiles (varied)
- Frequently asked questions (each answer adds new information)

SEO GUIDANCE:
- Use natural synonyms and related phrases instead of repeating the same keywords.
- Use category-specific terms derived from "{category_path}".
- Do not keyword-stuff. Keep it readable.
- Do not over-repeat the product title.

CONTEXT:
Product title: "{title}"
Brand: "{brand}"
Category path: "{category_path}"

OLD DESCRIPTION SECTION (if any). DO NOT MODIFY IT:
{old_section}

IMAGE SECTION (if any):
{images_section}

Now produce the final HTML with the required length and constraints."#;

    /// Follow-up prompt for a draft that came back too short.
    pub const LENGTH_EXTENSION: &'static str = r#"You previously generated HTML but it is too short by approximately {deficit} characters.

RULES:
- Keep the existing HTML exactly as-is at the beginning.
- Append NEW sections and NEW sentences only (no repetition).
- Use ONLY <strong>, <ul>, <li>, <br/> tags.
- Do NOT use banned words.
- Reach a total length between {min_chars} and {max_chars} characters.

EXISTING HTML (DO NOT EDIT, ONLY APPEND):
{existing}

Now return the existing HTML followed by the new, non-repetitive content."#;

    pub fn new(window: LengthWindow, inline_images: bool) -> Self {
        Self {
            window,
            inline_images,
        }
    }

    /// Render the first-pass prompt for `product`
    pub fn initial(&self, product: &ProductRecord) -> String {
        let old_section = product
            .old_description()
            .map(old_description_block)
            .unwrap_or_default();
        let images_section = image_block(&product.image_urls, self.inline_images);

        let min_chars = self.window.min_chars.to_string();
        let max_chars = self.window.max_chars.to_string();

        render(
            Self::DESCRIPTION_WRITER,
            &[
                ("min_chars", min_chars.as_str()),
                ("max_chars", max_chars.as_str()),
                ("current_heading", CURRENT_DESCRIPTION_HEADING),
                ("new_heading", NEW_DESCRIPTION_HEADING),
                ("images_section", images_section.as_str()),
                ("title", product.title.trim()),
                ("brand", product.brand().unwrap_or_default()),
                ("category_path", product.category_path().unwrap_or_default()),
                ("old_section", old_section.as_str()),
            ],
        )
    }

    /// Render the append-only follow-up prompt
    pub fn extension(&self, existing: &str, deficit: usize) -> String {
        let deficit = deficit.to_string();
        let min_chars = self.window.min_chars.to_string();
        let max_chars = self.window.max_chars.to_string();

        render(
            Self::LENGTH_EXTENSION,
            &[
                ("deficit", deficit.as_str()),
                ("min_chars", min_chars.as_str()),
                ("max_chars", max_chars.as_str()),
                ("existing", existing),
            ],
        )
    }
}
