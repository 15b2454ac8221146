//! Ingestion Ports
//!
//! The job consumes two external collaborators: a remote file source that
//! can list a directory and fetch one file, and a counter sink for failure
//! metrics.
//!
//! # Adapters
//!
//! - `FileSourcePort`: `LocalDirectorySource`, `InMemoryFileSource`, and
//!   `SftpFileSource` (feature `sftp`)
//! - `FailureMetrics`: `TracingMetrics` and `RecordingMetrics`

use async_trait::async_trait;
use std::path::Path;

use core_kernel::{DomainPort, PortError};

/// A directory of payer files
#[async_trait]
pub trait FileSourcePort: DomainPort {
    /// Lists the file names in a directory
    async fn list(&self, directory: &str) -> Result<Vec<String>, PortError>;

    /// Copies `remote_path` to `local_path`
    ///
    /// Transport failures should be reported as `PortError::Io` or
    /// `PortError::Connection` so that callers retry them.
    async fn get(&self, remote_path: &str, local_path: &Path) -> Result<(), PortError>;
}

/// Counter sink for ingestion failures
pub trait FailureMetrics: DomainPort {
    /// Increments the named counter once
    fn increment(&self, name: &str, tags: &[&str]);
}

/// Joins a remote directory and a file name with `/`
pub fn remote_path(directory: &str, name: &str) -> String {
    if directory.is_empty() {
        return name.to_string();
    }
    format!("{}/{}", directory.trim_end_matches('/'), name)
}
