/*!
 * Tests for application configuration functionality
 */

use anyhow::Result;
use seogen::app_config::{Config, LogLevel, ModelProvider};

use crate::common;

/// Test configuration save and load round trip
#[test]
fn test_config_saveAndLoad_shouldPreserveValues() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("conf.json");

    let mut config = Config::default();
    config.content.min_chars = 800;
    config.content.max_chars = 1200;
    config.content.inline_images = true;
    config.generation.provider = ModelProvider::Anthropic;
    config.log_level = LogLevel::Debug;
    config.save(&path)?;

    let loaded = Config::from_file(&path)?;
    assert_eq!(loaded.content.min_chars, 800);
    assert_eq!(loaded.content.max_chars, 1200);
    assert!(loaded.content.inline_images);
    assert_eq!(loaded.generation.provider, ModelProvider::Anthropic);
    assert_eq!(loaded.generation.get_model(), "claude-3-5-haiku-latest");
    assert_eq!(loaded.log_level, LogLevel::Debug);
    Ok(())
}

/// Test that a missing file is created with defaults
#[test]
fn test_loadOrCreate_withMissingFile_shouldWriteDefaults() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("fresh.json");

    let config = Config::load_or_create(&path)?;
    assert!(path.exists());
    assert_eq!(config.content.min_chars, 25_000);

    let reloaded = Config::from_file(&path)?;
    assert_eq!(reloaded.content.banned_words_path, config.content.banned_words_path);
    Ok(())
}

#[test]
fn test_fromFile_withInvalidJson_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "broken.json", "{ not json")?;
    assert!(Config::from_file(&path).is_err());
    Ok(())
}

#[test]
fn test_validate_withZeroConcurrency_shouldFail() {
    let mut config = Config::default();
    config.generation.concurrent_requests = 0;
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_withMissingApiKey_shouldStillPass() {
    let config = Config::default();
    assert!(config.generation.api_key.is_empty());
    assert!(config.validate().is_ok());
}

#[test]
fn test_serialize_shouldUseLowercaseEnums() -> Result<()> {
    let json = serde_json::to_value(Config::default())?;
    assert_eq!(json["generation"]["provider"], "openai");
    assert_eq!(json["log_level"], "info");
    Ok(())
}
