//! Local directory file source
//!
//! Serves payer files from a directory on disk, for environments where the
//! SFTP drop is mounted or synced locally.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::debug;

use core_kernel::{DomainPort, PortError};

use crate::ports::FileSourcePort;

/// File source rooted at a local directory
///
/// Remote paths are resolved relative to the root; a leading `/` is ignored.
#[derive(Debug, Clone)]
pub struct LocalDirectorySource {
    root: PathBuf,
}

impl LocalDirectorySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &str) -> PathBuf {
        self.root.join(path.trim_start_matches('/'))
    }
}

impl DomainPort for LocalDirectorySource {}

#[async_trait]
impl FileSourcePort for LocalDirectorySource {
    async fn list(&self, directory: &str) -> Result<Vec<String>, PortError> {
        let path = self.resolve(directory);
        let mut entries = tokio::fs::read_dir(&path).await?;

        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            if !entry.file_type().await?.is_file() {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                names.push(name.to_string());
            }
        }

        debug!(directory = %path.display(), count = names.len(), "Listed local directory");
        Ok(names)
    }

    async fn get(&self, remote_path: &str, local_path: &Path) -> Result<(), PortError> {
        let source = self.resolve(remote_path);
        let bytes = tokio::fs::copy(&source, local_path).await?;

        debug!(source = %source.display(), bytes, "Copied local file");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_list_skips_directories() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("outbound")).unwrap();
        std::fs::write(dir.path().join("outbound/a.277"), "ISA~").unwrap();
        std::fs::create_dir(dir.path().join("outbound/archive")).unwrap();

        let source = LocalDirectorySource::new(dir.path());
        let names = source.list("/outbound").await.unwrap();

        assert_eq!(names, vec!["a.277".to_string()]);
    }

    #[tokio::test]
    async fn test_get_copies_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.277"), "ST*277~").unwrap();
        let target = dir.path().join("copy.277");

        let source = LocalDirectorySource::new(dir.path());
        source.get("a.277", &target).await.unwrap();

        assert_eq!(std::fs::read_to_string(target).unwrap(), "ST*277~");
    }

    #[tokio::test]
    async fn test_missing_file_is_transient_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let source = LocalDirectorySource::new(dir.path());

        let error = source
            .get("missing.277", &dir.path().join("out"))
            .await
            .unwrap_err();
        assert!(matches!(error, PortError::Io { .. }));
        assert!(error.is_transient());
    }
}
