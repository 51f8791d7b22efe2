/*!
 * Common test utilities for the seogen test suite
 */

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use tempfile::TempDir;

use seogen::catalog::ProductRecord;
use seogen::validation::{BannedWordList, LengthWindow, ValidationPolicy, Validator};

/// Route library logs to the test harness; safe to call repeatedly
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Writes a banned-word list with a comment header
pub fn create_banned_words_file(dir: &Path, words: &[&str]) -> Result<PathBuf> {
    let mut content = String::from("# test list\n\n");
    for word in words {
        content.push_str(word);
        content.push('\n');
    }
    create_test_file(dir, "banned_words.txt", &content)
}

/// The reference product used throughout the suite
pub fn basic_tshirt() -> ProductRecord {
    ProductRecord::new("Basic T-Shirt")
        .with_brand("Acme")
        .with_category("Clothing/Tops")
}

/// A product with every optional field filled
pub fn ceramic_mug() -> ProductRecord {
    ProductRecord::new("Ceramic Mug 350 ml")
        .with_brand("Potter & Sons")
        .with_category("Home/Kitchen/Mugs")
        .with_old_description("Hand glazed stoneware mug. Dishwasher safe.")
        .with_image_urls(["https://cdn.example.com/mug-1.jpg", "https://cdn.example.com/mug-2.jpg"])
}

/// Validator with the given window, default repetition limits and word list
pub fn validator(min: usize, max: usize, banned: &[&str]) -> Validator {
    let policy = ValidationPolicy {
        window: LengthWindow::new(min, max).unwrap(),
        ..Default::default()
    };
    Validator::new(BannedWordList::new(banned.iter()), policy)
}

/// Pad `markup` with spaces up to `len` characters
pub fn pad_to(markup: &str, len: usize) -> String {
    let mut padded = markup.to_string();
    while padded.chars().count() < len {
        padded.push(' ');
    }
    padded
}
