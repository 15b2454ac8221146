//! Single-file download
//!
//! A download lands in a scoped temporary directory and is read back as
//! text. Transient transport errors are retried with
//! [`core_kernel::retry_async`]; once retries are exhausted the failure is
//! counted and the caller receives an empty string.

use std::ffi::OsStr;
use std::path::Path;
use tempfile::TempDir;
use tracing::{debug, error, info};

use core_kernel::{retry_async, PortError, RetryPolicy};

use crate::ports::{remote_path, FailureMetrics, FileSourcePort};

/// Tag attached to the failure counter when a download gives up
pub const DOWNLOAD_FAILURE_TAG: &str = "reason:DOWNLOAD_FAILURE";

const FALLBACK_LOCAL_NAME: &str = "download.edi";

/// Downloads `directory/name` with retries
///
/// # Errors
///
/// Returns the last error once the policy is exhausted, or the first
/// non-transient error.
pub async fn download_with_retry(
    name: &str,
    directory: &str,
    source: &dyn FileSourcePort,
    retry: &RetryPolicy,
) -> Result<String, PortError> {
    let remote = remote_path(directory, name);
    let temp_dir = TempDir::new()?;
    let local_name = Path::new(name)
        .file_name()
        .unwrap_or_else(|| OsStr::new(FALLBACK_LOCAL_NAME));
    let local = temp_dir.path().join(local_name);

    let remote_ref = remote.as_str();
    let local_ref = local.as_path();
    retry_async(
        retry,
        move |attempt| {
            debug!(remote_path = remote_ref, attempt, "Downloading file");
            source.get(remote_ref, local_ref)
        },
        PortError::is_transient,
    )
    .await?;

    let contents = tokio::fs::read_to_string(&local).await?;
    Ok(contents)
}

/// Downloads a file, returning its contents or `""` when the download fails
///
/// An empty result means nothing was downloaded; callers must not treat it
/// as an empty file. Each failed call increments `metric_name` exactly once.
pub async fn download_file(
    name: &str,
    directory: &str,
    source: &dyn FileSourcePort,
    metrics: &dyn FailureMetrics,
    metric_name: &str,
    retry: &RetryPolicy,
) -> String {
    match download_with_retry(name, directory, source, retry).await {
        Ok(contents) => {
            info!(file = name, bytes = contents.len(), "Downloaded file");
            contents
        }
        Err(e) => {
            error!(file = name, directory, error = %e, "Failed to download file");
            metrics.increment(metric_name, &[DOWNLOAD_FAILURE_TAG]);
            String::new()
        }
    }
}
