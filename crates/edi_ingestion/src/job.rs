//! 277CA ingestion job
//!
//! One run lists the payer directory, selects the files dated for the target
//! day, and for each file in order downloads it, parses it, and applies its
//! claim statuses to the treatment mappings. A file that fails to download
//! is recorded and skipped; it never stops the remaining files.

use chrono::{DateTime, NaiveDate, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::{error, info, warn};
use uuid::Uuid;

use core_kernel::RetryPolicy;
use domain_accumulation::{ClaimStatusProcessor, ProcessingSummary};
use domain_edi::parse_277;

use crate::download::download_file;
use crate::ports::{FailureMetrics, FileSourcePort};
use crate::selection::find_files_to_process;

/// Where the job is in handling the directory or a single file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IngestionState {
    Searching,
    FoundCandidates,
    Downloading,
    Downloaded,
    DownloadFailed,
}

impl IngestionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            IngestionState::Searching => "SEARCHING",
            IngestionState::FoundCandidates => "FOUND_CANDIDATES",
            IngestionState::Downloading => "DOWNLOADING",
            IngestionState::Downloaded => "DOWNLOADED",
            IngestionState::DownloadFailed => "DOWNLOAD_FAILED",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, IngestionState::Downloaded | IngestionState::DownloadFailed)
    }
}

impl fmt::Display for IngestionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Static settings for a job
#[derive(Debug, Clone)]
pub struct IngestionSettings {
    pub directory: String,
    pub filename_pattern: Regex,
    pub date_index: usize,
    pub metric_name: String,
    pub retry: RetryPolicy,
}

/// Outcome for one selected file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileReport {
    pub file_name: String,
    pub state: IngestionState,
    /// Present once the file was downloaded and processed
    pub summary: Option<ProcessingSummary>,
}

/// Outcome of one run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestionReport {
    pub run_id: Uuid,
    pub target_date: NaiveDate,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// Last state reached by the directory search
    pub search_state: IngestionState,
    /// Why the directory could not be listed; `None` when listing succeeded
    pub listing_error: Option<String>,
    pub files: Vec<FileReport>,
    /// Totals across every processed file
    pub summary: ProcessingSummary,
}

impl IngestionReport {
    pub fn downloaded(&self) -> usize {
        self.files
            .iter()
            .filter(|f| f.state == IngestionState::Downloaded)
            .count()
    }

    pub fn failed_downloads(&self) -> usize {
        self.files
            .iter()
            .filter(|f| f.state == IngestionState::DownloadFailed)
            .count()
    }
}

/// Ingests a payer's 277CA files for one day
pub struct EdiIngestionJob {
    source: Arc<dyn FileSourcePort>,
    metrics: Arc<dyn FailureMetrics>,
    processor: ClaimStatusProcessor,
    settings: IngestionSettings,
}

impl fmt::Debug for EdiIngestionJob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EdiIngestionJob")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl EdiIngestionJob {
    pub fn new(
        source: Arc<dyn FileSourcePort>,
        metrics: Arc<dyn FailureMetrics>,
        processor: ClaimStatusProcessor,
        settings: IngestionSettings,
    ) -> Self {
        Self {
            source,
            metrics,
            processor,
            settings,
        }
    }

    /// Runs the job for `target_date`
    ///
    /// A listing failure is logged and produces a report with no files and
    /// `listing_error` set.
    pub async fn run(&self, target_date: NaiveDate) -> IngestionReport {
        let run_id = Uuid::new_v4();
        let started_at = Utc::now();
        let mut report = IngestionReport {
            run_id,
            target_date,
            started_at,
            finished_at: started_at,
            search_state: IngestionState::Searching,
            listing_error: None,
            files: Vec::new(),
            summary: ProcessingSummary::default(),
        };

        self.transition(run_id, None, IngestionState::Searching);
        let listing = match self.source.list(&self.settings.directory).await {
            Ok(listing) => listing,
            Err(e) => {
                error!(
                    %run_id,
                    directory = %self.settings.directory,
                    error = %e,
                    "Failed to list payer directory"
                );
                report.listing_error = Some(e.to_string());
                report.finished_at = Utc::now();
                return report;
            }
        };

        let candidates = find_files_to_process(
            &listing,
            &self.settings.filename_pattern,
            target_date,
            self.settings.date_index,
        );
        if candidates.is_empty() {
            warn!(%run_id, %target_date, listed = listing.len(), "No files to process");
            report.finished_at = Utc::now();
            return report;
        }

        report.search_state = IngestionState::FoundCandidates;
        self.transition(run_id, None, IngestionState::FoundCandidates);
        info!(%run_id, count = candidates.len(), files = ?candidates, "Selected files");

        for file_name in candidates {
            let file_report = self.ingest_file(run_id, file_name).await;
            if let Some(summary) = &file_report.summary {
                report.summary.merge(summary);
            }
            report.files.push(file_report);
        }

        report.finished_at = Utc::now();
        info!(
            %run_id,
            files = report.files.len(),
            downloaded = report.downloaded(),
            failed = report.failed_downloads(),
            updated = report.summary.updated,
            "Ingestion run complete"
        );
        report
    }

    async fn ingest_file(&self, run_id: Uuid, file_name: String) -> FileReport {
        self.transition(run_id, Some(&file_name), IngestionState::Downloading);

        let contents = download_file(
            &file_name,
            &self.settings.directory,
            self.source.as_ref(),
            self.metrics.as_ref(),
            &self.settings.metric_name,
            &self.settings.retry,
        )
        .await;

        if contents.is_empty() {
            self.transition(run_id, Some(&file_name), IngestionState::DownloadFailed);
            return FileReport {
                file_name,
                state: IngestionState::DownloadFailed,
                summary: None,
            };
        }

        self.transition(run_id, Some(&file_name), IngestionState::Downloaded);
        let document = parse_277(&contents);
        if document.is_empty() {
            warn!(%run_id, file = %file_name, "Downloaded file contains no 277 data");
        }
        let summary = self.processor.process(&document).await;

        FileReport {
            file_name,
            state: IngestionState::Downloaded,
            summary: Some(summary),
        }
    }

    fn transition(&self, run_id: Uuid, file_name: Option<&str>, state: IngestionState) {
        info!(%run_id, file = file_name, state = %state, "Ingestion state changed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_names() {
        assert_eq!(IngestionState::FoundCandidates.to_string(), "FOUND_CANDIDATES");
        assert_eq!(
            serde_json::to_string(&IngestionState::DownloadFailed).unwrap(),
            "\"DOWNLOAD_FAILED\""
        );
    }

    #[test]
    fn test_terminal_states() {
        assert!(IngestionState::Downloaded.is_terminal());
        assert!(IngestionState::DownloadFailed.is_terminal());
        assert!(!IngestionState::Downloading.is_terminal());
        assert!(!IngestionState::Searching.is_terminal());
    }
}
