//! Payer 277CA File Ingestion
//!
//! Pulls claim acknowledgment files from a payer drop, parses them, and
//! applies their claim statuses to accumulation treatment mappings.
//!
//! # Flow
//!
//! ```text
//! FileSourcePort::list ─► find_files_to_process ─► download_file (retry)
//!                                                        │
//!            ClaimStatusProcessor ◄── parse_277 ◄────────┘
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! let job = EdiIngestionJob::new(source, metrics, processor, settings);
//! let report = job.run(NaiveDate::from_ymd_opt(2024, 10, 21).unwrap()).await;
//! ```

pub mod adapters;
pub mod config;
pub mod download;
pub mod error;
pub mod job;
pub mod ports;
pub mod selection;

pub use adapters::{InMemoryFileSource, LocalDirectorySource, RecordingMetrics, TracingMetrics};
pub use config::IngestionConfig;
pub use download::{download_file, download_with_retry, DOWNLOAD_FAILURE_TAG};
pub use error::IngestionError;
pub use job::{EdiIngestionJob, FileReport, IngestionReport, IngestionSettings, IngestionState};
pub use ports::{FailureMetrics, FileSourcePort};
pub use selection::{embedded_date, find_files_to_process};
