//! easy-anki - Main entry point

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use easy_anki::config::{parse_log_level, Args, Credentials, RunConfig};
use easy_anki::pipeline::{self, Collaborators};
use easy_anki::providers::{ForvoPronunciations, GoogleImageSearch, GoogleTranslate};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Parse command-line arguments
    let args = Args::parse();

    // Initialize tracing; RUST_LOG overrides --log
    let level = parse_log_level(&args.log)?;
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.to_string())))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = RunConfig::from_args(&args)?;
    let credentials = Credentials::from_env();
    tracing::debug!("Running with {:?} and {:?}", config, credentials);

    let client = reqwest::Client::builder()
        .user_agent(concat!("easy-anki/", env!("CARGO_PKG_VERSION")))
        .build()
        .context("Failed to build HTTP client")?;

    let collaborators = Collaborators::new(
        GoogleTranslate::new(client.clone(), &credentials),
        GoogleImageSearch::new(client.clone(), &credentials, config.max_concurrent_fetches),
        ForvoPronunciations::new(client, &credentials, config.audio_language.clone()),
    );

    let summary = pipeline::run(&config, &collaborators)
        .await
        .with_context(|| format!("No import file written to {}", config.output_csv_file.display()))?;

    summary.log();
    if let Some(report_file) = &config.report_file {
        summary.write_json(report_file).await?;
    }

    Ok(())
}
