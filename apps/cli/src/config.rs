//! Command-line options, run configuration and API credentials.

use std::fmt;
use std::path::PathBuf;

use clap::Parser;
use flashcard_core::FilenameTemplate;
use tracing_subscriber::filter::LevelFilter;

use crate::error::{ConfigError, Result};

/// Command-line arguments for easy-anki
#[derive(Parser, Debug, Clone)]
#[command(name = "easy-anki")]
#[command(about = "Build Anki flashcards with images and native-speaker audio from a word list")]
#[command(version)]
pub struct Args {
    /// Comma-separated input table: one word per row, or english,translation[,extra]
    #[arg(long, alias = "input_file", env = "EASY_ANKI_INPUT_FILE")]
    pub input_file: PathBuf,

    /// Directory media is written to, usually Anki's collection.media folder
    #[arg(long, alias = "output_dir", env = "EASY_ANKI_OUTPUT_DIR")]
    pub output_dir: PathBuf,

    /// Anki import file to generate
    #[arg(long, alias = "output_csv_file", env = "EASY_ANKI_OUTPUT_CSV_FILE")]
    pub output_csv_file: PathBuf,

    /// Copy media from this directory instead of downloading it
    #[arg(long, alias = "already_downloaded_media_dir", env = "EASY_ANKI_MEDIA_DIR")]
    pub already_downloaded_media_dir: Option<PathBuf>,

    /// Don't fetch or copy images; image references are still written
    #[arg(long, alias = "disable_image_fetching")]
    pub disable_image_fetching: bool,

    /// Fetch images even when the output directory already has them
    #[arg(long, alias = "override_images")]
    pub override_images: bool,

    /// Language of the english keys
    #[arg(long, default_value = "en", env = "EASY_ANKI_SOURCE_LANGUAGE")]
    pub source_language: String,

    /// Language cards are translated into (Google Translate code)
    #[arg(long, default_value = "iw", env = "EASY_ANKI_TARGET_LANGUAGE")]
    pub target_language: String,

    /// Language pronunciations are looked up in (Forvo code)
    #[arg(long, default_value = "he", env = "EASY_ANKI_AUDIO_LANGUAGE")]
    pub audio_language: String,

    /// Image file name written to the output directory
    #[arg(long, default_value = "{word}.png")]
    pub image_filename: String,

    /// Audio file name written to the output directory
    #[arg(long, default_value = "{word}.mp3")]
    pub audio_filename: String,

    /// Image file name expected in the pre-downloaded media directory
    #[arg(long, default_value = "image_{word}.jpg")]
    pub local_image_filename: String,

    /// Audio file name expected in the pre-downloaded media directory
    #[arg(long, default_value = "pronunciation_he_{word}.mp3")]
    pub local_audio_filename: String,

    /// Maximum number of images fetched at once
    #[arg(long, default_value_t = 16, env = "EASY_ANKI_MAX_CONCURRENT_FETCHES")]
    pub max_concurrent_fetches: usize,

    /// Write a JSON summary of the run to this file
    #[arg(long)]
    pub report_file: Option<PathBuf>,

    /// Log level, e.g. INFO or DEBUG. RUST_LOG takes precedence.
    #[arg(long, default_value = "WARNING")]
    pub log: String,
}

/// Parse a log level name, accepting the long forms WARNING and CRITICAL.
pub fn parse_log_level(level: &str) -> std::result::Result<LevelFilter, ConfigError> {
    match level.to_ascii_lowercase().as_str() {
        "off" => Ok(LevelFilter::OFF),
        "error" | "critical" => Ok(LevelFilter::ERROR),
        "warn" | "warning" => Ok(LevelFilter::WARN),
        "info" => Ok(LevelFilter::INFO),
        "debug" => Ok(LevelFilter::DEBUG),
        "trace" => Ok(LevelFilter::TRACE),
        _ => Err(ConfigError::InvalidLogLevel(level.to_string())),
    }
}

/// Where media comes from.
#[derive(Debug, Clone)]
pub enum MediaSource {
    /// Search and download over the network; misses drop the word.
    Fetch,
    /// Copy from a staging directory; a missing file aborts the run.
    LocalCopy {
        dir: PathBuf,
        image_template: FilenameTemplate,
        audio_template: FilenameTemplate,
    },
}

/// Validated settings for one run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub input_file: PathBuf,
    pub output_dir: PathBuf,
    pub output_csv_file: PathBuf,
    pub media_source: MediaSource,
    pub fetch_images: bool,
    pub override_images: bool,
    pub source_language: String,
    pub target_language: String,
    pub audio_language: String,
    pub image_template: FilenameTemplate,
    pub audio_template: FilenameTemplate,
    pub max_concurrent_fetches: usize,
    pub report_file: Option<PathBuf>,
}

impl RunConfig {
    /// Config with default templates and languages, fetching over the network.
    pub fn new(
        input_file: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
        output_csv_file: impl Into<PathBuf>,
    ) -> Result<Self> {
        Ok(Self {
            input_file: input_file.into(),
            output_dir: output_dir.into(),
            output_csv_file: output_csv_file.into(),
            media_source: MediaSource::Fetch,
            fetch_images: true,
            override_images: false,
            source_language: "en".to_string(),
            target_language: "iw".to_string(),
            audio_language: "he".to_string(),
            image_template: FilenameTemplate::new("{word}.png")?,
            audio_template: FilenameTemplate::new("{word}.mp3")?,
            max_concurrent_fetches: 16,
            report_file: None,
        })
    }

    pub fn from_args(args: &Args) -> Result<Self> {
        if args.max_concurrent_fetches == 0 {
            return Err(ConfigError::Invalid("--max-concurrent-fetches must be at least 1".to_string()).into());
        }

        let media_source = match &args.already_downloaded_media_dir {
            Some(dir) => MediaSource::LocalCopy {
                dir: dir.clone(),
                image_template: FilenameTemplate::new(&args.local_image_filename)?,
                audio_template: FilenameTemplate::new(&args.local_audio_filename)?,
            },
            None => MediaSource::Fetch,
        };

        Ok(Self {
            input_file: args.input_file.clone(),
            output_dir: args.output_dir.clone(),
            output_csv_file: args.output_csv_file.clone(),
            media_source,
            fetch_images: !args.disable_image_fetching,
            override_images: args.override_images,
            source_language: args.source_language.clone(),
            target_language: args.target_language.clone(),
            audio_language: args.audio_language.clone(),
            image_template: FilenameTemplate::new(&args.image_filename)?,
            audio_template: FilenameTemplate::new(&args.audio_filename)?,
            max_concurrent_fetches: args.max_concurrent_fetches,
            report_file: args.report_file.clone(),
        })
    }
}

/// External API credentials, read from the environment.
///
/// Env vars:
/// - GOOGLE_API_KEY: Translation and Custom Search API key
/// - GOOGLE_CSE_ID: Custom Search engine id
/// - FORVO_API_KEY: Forvo API key
#[derive(Clone, Default)]
pub struct Credentials {
    pub google_api_key: Option<String>,
    pub google_cse_id: Option<String>,
    pub forvo_api_key: Option<String>,
}

impl Credentials {
    pub fn from_env() -> Self {
        let var = |name: &str| std::env::var(name).ok().filter(|v| !v.trim().is_empty());
        Self {
            google_api_key: var("GOOGLE_API_KEY"),
            google_cse_id: var("GOOGLE_CSE_ID"),
            forvo_api_key: var("FORVO_API_KEY"),
        }
    }

    pub fn google_api_key(&self) -> std::result::Result<&str, ConfigError> {
        self.google_api_key
            .as_deref()
            .ok_or(ConfigError::MissingCredential("GOOGLE_API_KEY"))
    }

    pub fn google_cse_id(&self) -> std::result::Result<&str, ConfigError> {
        self.google_cse_id
            .as_deref()
            .ok_or(ConfigError::MissingCredential("GOOGLE_CSE_ID"))
    }

    pub fn forvo_api_key(&self) -> std::result::Result<&str, ConfigError> {
        self.forvo_api_key
            .as_deref()
            .ok_or(ConfigError::MissingCredential("FORVO_API_KEY"))
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redact = |v: &Option<String>| if v.is_some() { "<set>" } else { "<unset>" };
        f.debug_struct("Credentials")
            .field("google_api_key", &redact(&self.google_api_key))
            .field("google_cse_id", &redact(&self.google_cse_id))
            .field("forvo_api_key", &redact(&self.forvo_api_key))
            .finish()
    }
}
