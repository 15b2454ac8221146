//! Payer 277CA ingestion binary
//!
//! Runs one ingestion pass and prints the run report as JSON.
//!
//! # Usage
//!
//! ```bash
//! # Ingest today's files from a local drop
//! EDI_LOCAL_DIRECTORY=/data/payers EDI_DATABASE_URL=postgres://... cargo run --bin payer-277-ingest
//!
//! # Ingest a specific day over SFTP
//! EDI_SFTP_HOST=sftp.payer.example EDI_SFTP_USERNAME=maven EDI_SFTP_PASSWORD=... \
//!     EDI_TARGET_DATE=2024-10-21 cargo run --features sftp --bin payer-277-ingest
//! ```
//!
//! # Environment Variables
//!
//! * `EDI_DATABASE_URL` - PostgreSQL connection string
//! * `EDI_LOCAL_DIRECTORY` / `EDI_SFTP_*` - File source
//! * `EDI_REMOTE_DIRECTORY` - Directory to list (default: /outbound)
//! * `EDI_FILENAME_PATTERN`, `EDI_DATE_INDEX` - File selection
//! * `EDI_TARGET_DATE` - Day to ingest as YYYY-MM-DD (default: today, UTC)
//! * `EDI_LOG_LEVEL`, `EDI_LOG_JSON` - Logging

use std::sync::Arc;

use anyhow::Context;
use chrono::Utc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use domain_accumulation::{ClaimStatusProcessor, TreatmentMappingUpdater};
use edi_ingestion::{EdiIngestionJob, IngestionConfig, IngestionSettings, TracingMetrics};
use infra_db::{create_pool, DatabaseConfig, PgTreatmentMappingRepository};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (useful for local development)
    dotenvy::dotenv().ok();

    let config = IngestionConfig::from_env().context("failed to load EDI_ configuration")?;
    init_tracing(&config.log_level, config.log_json);

    let target_date = config
        .target_date
        .unwrap_or_else(|| Utc::now().date_naive());
    tracing::info!(%target_date, directory = %config.remote_directory, "Starting 277CA ingestion");

    let pool = create_pool(DatabaseConfig::new(&config.database_url))
        .await
        .context("failed to connect to the accumulation database")?;
    let repository = Arc::new(PgTreatmentMappingRepository::new(pool));
    let processor = ClaimStatusProcessor::new(TreatmentMappingUpdater::new(repository));

    let source = config.file_source().await.context("failed to open file source")?;
    let settings = IngestionSettings {
        directory: config.remote_directory.clone(),
        filename_pattern: config.filename_regex()?,
        date_index: config.date_index,
        metric_name: config.metric_name.clone(),
        retry: config.retry_policy(),
    };

    let job = EdiIngestionJob::new(source, Arc::new(TracingMetrics), processor, settings);
    let report = job.run(target_date).await;

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

/// Initializes the tracing subscriber for structured logging
///
/// Logs go to stderr; stdout carries only the report.
fn init_tracing(log_level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_target(true).with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_target(true).with_writer(std::io::stderr))
            .init();
    }
}
