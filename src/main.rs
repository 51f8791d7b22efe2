// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info, warn, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};

use seogen::app_config::{self, Config, ModelProvider};
use seogen::catalog::{AttemptLedger, CatalogEntry, ProductRecord};
use seogen::generation::{LlmGenerator, StubGenerator};
use seogen::pipeline::{BatchOptions, DescriptionSource, GenerationPipeline};
use seogen::providers::build_provider;
use seogen::validation::Validator;

/// CLI Wrapper for ModelProvider to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliModelProvider {
    #[value(name = "openai")]
    OpenAI,
    Anthropic,
}

impl From<CliModelProvider> for ModelProvider {
    fn from(cli_provider: CliModelProvider) -> Self {
        match cli_provider {
            CliModelProvider::OpenAI => ModelProvider::OpenAI,
            CliModelProvider::Anthropic => ModelProvider::Anthropic,
        }
    }
}

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate a description for one product
    Generate {
        /// Product record as JSON
        #[arg(value_name = "PRODUCT_JSON")]
        product_path: PathBuf,

        /// Use the stub generator only, no model calls
        #[arg(long)]
        stub: bool,

        /// Write the markup here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Validate a markup file and print the report as JSON
    Validate {
        /// Markup file to check
        #[arg(value_name = "MARKUP_FILE")]
        markup_path: PathBuf,
    },

    /// Generate and validate descriptions for a whole catalog
    Batch {
        /// JSON array of catalog entries
        #[arg(value_name = "CATALOG_JSON")]
        catalog_path: PathBuf,

        /// Only process the first N entries
        #[arg(long)]
        limit: Option<usize>,

        /// Regenerate entries that already passed
        #[arg(short, long)]
        force: bool,

        /// Use the stub generator only, no model calls
        #[arg(long)]
        stub: bool,

        /// Export all recorded attempts as JSON
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Generate shell completions for seogen
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Options shared by every subcommand
#[derive(Args, Debug)]
struct GlobalOptions {
    /// Configuration file path
    #[arg(short, long, global = true, default_value = "conf.json")]
    config: PathBuf,

    /// Minimum markup length
    #[arg(long, global = true, env = "MIN_CHARS")]
    min_chars: Option<usize>,

    /// Maximum markup length
    #[arg(long, global = true, env = "MAX_CHARS")]
    max_chars: Option<usize>,

    /// List image URLs as text instead of image elements (bare flag means true)
    #[arg(
        long,
        global = true,
        env = "INLINE_IMAGES",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true",
        value_name = "BOOL"
    )]
    inline_images: Option<bool>,

    /// Banned-word list path
    #[arg(long, global = true, env = "BANNED_WORDS_PATH")]
    banned_words: Option<String>,

    /// Model provider to use
    #[arg(short, long, global = true, value_enum)]
    provider: Option<CliModelProvider>,

    /// Model name to use for generation
    #[arg(short, long, global = true)]
    model: Option<String>,

    /// Provider API key
    #[arg(long, global = true, env = "LLM_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Set logging level
    #[arg(short, long, global = true, value_enum)]
    log_level: Option<CliLogLevel>,
}

/// seogen - SEO product description generator
///
/// Generates marketplace product descriptions with an LLM, falls back to a
/// deterministic stub when the model is unavailable, and validates every
/// result against a banned-word list, a length window and repetition limits.
#[derive(Parser, Debug)]
#[command(name = "seogen")]
#[command(version)]
#[command(about = "SEO product description generator and validator")]
#[command(long_about = "seogen writes product descriptions with an LLM (or a deterministic stub) and validates them.

EXAMPLES:
    seogen generate product.json                  # Generate with the configured provider
    seogen generate --stub product.json -o out.html
    seogen validate description.html              # Print the validation report
    seogen batch catalog.json --limit 50 -o attempts.json
    seogen -p anthropic -m claude-3-5-haiku-latest batch catalog.json
    seogen completions bash > seogen.bash         # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config. If the config file doesn't exist, a default one
    will be created automatically. MIN_CHARS, MAX_CHARS, INLINE_IMAGES,
    BANNED_WORDS_PATH and LLM_API_KEY override the file.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    global: GlobalOptions,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color and tag for a level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("\x1B[1;31m", "ERROR"),
            Level::Warn => ("\x1B[1;33m", "WARN "),
            Level::Info => ("\x1B[1;32m", "INFO "),
            Level::Debug => ("\x1B[1;36m", "DEBUG"),
            Level::Trace => ("\x1B[1;35m", "TRACE"),
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let (color, tag) = Self::style_for_level(record.level());
            let _ = writeln!(
                std::io::stderr(),
                "{}{} {} {}\x1B[0m",
                color,
                now,
                tag,
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

fn level_filter(level: &app_config::LogLevel) -> LevelFilter {
    match level {
        app_config::LogLevel::Error => LevelFilter::Error,
        app_config::LogLevel::Warn => LevelFilter::Warn,
        app_config::LogLevel::Info => LevelFilter::Info,
        app_config::LogLevel::Debug => LevelFilter::Debug,
        app_config::LogLevel::Trace => LevelFilter::Trace,
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logger starts wide open; the effective level is set once the config is loaded
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    if let Commands::Completions { shell } = cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(shell, &mut cmd, "seogen", &mut std::io::stdout());
        return Ok(());
    }

    let config = load_config(&cli.global)?;

    match cli.command {
        Commands::Generate {
            product_path,
            stub,
            output,
        } => run_generate(&config, &cli.global, &product_path, stub, output.as_deref()).await,
        Commands::Validate { markup_path } => run_validate(&config, &markup_path),
        Commands::Batch {
            catalog_path,
            limit,
            force,
            stub,
            output,
        } => {
            let options = BatchOptions {
                limit,
                force,
                model: cli.global.model.clone(),
            };
            run_batch(&config, &catalog_path, &options, stub, output.as_deref()).await
        }
        Commands::Completions { .. } => Ok(()),
    }
}

/// Load the config file and apply command line and environment overrides
fn load_config(options: &GlobalOptions) -> Result<Config> {
    if let Some(level) = &options.log_level {
        log::set_max_level(level_filter(&level.clone().into()));
    }

    let mut config = Config::load_or_create(&options.config)?;

    if let Some(min_chars) = options.min_chars {
        config.content.min_chars = min_chars;
    }
    if let Some(max_chars) = options.max_chars {
        config.content.max_chars = max_chars;
    }
    if let Some(inline_images) = options.inline_images {
        config.content.inline_images = inline_images;
    }
    if let Some(path) = &options.banned_words {
        config.content.banned_words_path = path.clone();
    }
    if let Some(provider) = &options.provider {
        config.generation.provider = provider.clone().into();
    }
    if let Some(model) = &options.model {
        config.generation.model = model.clone();
    }
    if let Some(api_key) = &options.api_key {
        config.generation.api_key = api_key.clone();
    }
    if let Some(level) = &options.log_level {
        config.log_level = level.clone().into();
    }

    config.validate().context("Configuration validation failed")?;
    log::set_max_level(level_filter(&config.log_level));
    Ok(config)
}

fn build_validator(config: &Config) -> Result<Validator> {
    Validator::from_config(&config.content).with_context(|| {
        format!(
            "Failed to build validator from banned-word list '{}'",
            config.content.banned_words_path
        )
    })
}

fn build_source(config: &Config, stub_only: bool) -> Result<DescriptionSource> {
    if stub_only {
        return Ok(DescriptionSource::Stub(StubGenerator::from_config(&config.content)?));
    }
    let provider = build_provider(&config.generation);
    info!(
        "Using {} - {}",
        config.generation.provider.display_name(),
        config.generation.get_model()
    );
    Ok(DescriptionSource::Model(LlmGenerator::from_config(provider, config)?))
}

fn write_output(path: Option<&Path>, content: &str) -> Result<()> {
    match path {
        Some(path) => fs::write(path, content)
            .with_context(|| format!("Failed to write output file: {}", path.display())),
        None => {
            println!("{}", content);
            Ok(())
        }
    }
}

async fn run_generate(
    config: &Config,
    options: &GlobalOptions,
    product_path: &Path,
    stub_only: bool,
    output: Option<&Path>,
) -> Result<()> {
    let json = fs::read_to_string(product_path)
        .with_context(|| format!("Failed to read product file: {}", product_path.display()))?;
    let product: ProductRecord = serde_json::from_str(&json)
        .with_context(|| format!("Failed to parse product file: {}", product_path.display()))?;

    let validator = build_validator(config)?;
    let outcome = build_source(config, stub_only)?
        .produce(&CatalogEntry::new("cli", product), options.model.as_deref())
        .await;
    if let Some(reason) = outcome.fallback {
        warn!("Model output unavailable ({}); stub description used", reason);
    }

    let report = validator.validate(&outcome.markup);
    if report.ok {
        info!("Description passed validation ({} chars)", report.char_count);
    } else {
        for entry in &report.errors {
            warn!("{}", entry);
        }
    }

    write_output(output, &outcome.markup)
}

fn run_validate(config: &Config, markup_path: &Path) -> Result<()> {
    let markup = fs::read_to_string(markup_path)
        .with_context(|| format!("Failed to read markup file: {}", markup_path.display()))?;
    let report = build_validator(config)?.validate(&markup);
    println!("{}", report.to_json()?);

    if !report.ok {
        error!("Validation failed with {} error(s)", report.errors.len());
        std::process::exit(1);
    }
    Ok(())
}

async fn run_batch(
    config: &Config,
    catalog_path: &Path,
    options: &BatchOptions,
    stub_only: bool,
    output: Option<&Path>,
) -> Result<()> {
    let json = fs::read_to_string(catalog_path)
        .with_context(|| format!("Failed to read catalog file: {}", catalog_path.display()))?;
    let entries: Vec<CatalogEntry> = serde_json::from_str(&json)
        .with_context(|| format!("Failed to parse catalog file: {}", catalog_path.display()))?;
    info!("Loaded {} catalog entries", entries.len());

    let pipeline = GenerationPipeline::new(
        build_source(config, stub_only)?,
        Arc::new(build_validator(config)?),
        Arc::new(AttemptLedger::new()),
    )
    .with_concurrency(config.generation.concurrent_requests);

    let progress_bar = ProgressBar::new(entries.len() as u64);
    let style = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} products ({percent}%) {eta}")
        .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%)"))
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    progress_bar.set_style(style.progress_chars("█▓▒░"));

    let summary = pipeline.run_batch(&entries, options, Some(&progress_bar)).await;
    progress_bar.finish_and_clear();

    info!(
        "Batch done: {} processed, {} skipped, {} passed, {} failed",
        summary.processed, summary.skipped, summary.passed, summary.failed
    );

    if let Some(path) = output {
        let attempts = serde_json::to_string_pretty(&pipeline.ledger().snapshot())
            .context("Failed to serialize attempts")?;
        write_output(Some(path), &attempts)?;
        info!("Attempts written to {}", path.display());
    }
    Ok(())
}
