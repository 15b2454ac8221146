//! In-memory file source
//!
//! Holds file contents keyed by directory and name. Failures can be injected
//! per file to exercise the retry path.

use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::Mutex;

use core_kernel::{DomainPort, PortError};

use crate::ports::{remote_path, FileSourcePort};

#[derive(Debug, Default)]
struct State {
    directories: BTreeMap<String, BTreeMap<String, String>>,
    failures_remaining: HashMap<String, u32>,
    get_calls: HashMap<String, u32>,
}

/// File source backed by in-memory contents
#[derive(Debug, Default)]
pub struct InMemoryFileSource {
    state: Mutex<State>,
}

impl InMemoryFileSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a file to a directory
    pub fn with_file(self, directory: &str, name: &str, contents: impl Into<String>) -> Self {
        self.lock()
            .directories
            .entry(directory.to_string())
            .or_default()
            .insert(name.to_string(), contents.into());
        self
    }

    /// Makes the next `times` downloads of a path fail with an I/O error
    pub fn failing(self, directory: &str, name: &str, times: u32) -> Self {
        self.lock()
            .failures_remaining
            .insert(remote_path(directory, name), times);
        self
    }

    /// Number of download attempts made for a remote path
    pub fn get_calls(&self, remote_path: &str) -> u32 {
        self.lock().get_calls.get(remote_path).copied().unwrap_or(0)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn contents(&self, path: &str) -> Result<String, PortError> {
        let mut state = self.lock();
        *state.get_calls.entry(path.to_string()).or_default() += 1;

        if let Some(remaining) = state.failures_remaining.get_mut(path) {
            if *remaining > 0 {
                *remaining -= 1;
                return Err(PortError::io(format!("injected failure downloading {}", path)));
            }
        }

        state
            .directories
            .iter()
            .find_map(|(directory, files)| {
                files
                    .iter()
                    .find(|(name, _)| remote_path(directory, name) == path)
                    .map(|(_, contents)| contents.clone())
            })
            .ok_or_else(|| PortError::io(format!("no such file: {}", path)))
    }
}

impl DomainPort for InMemoryFileSource {}

#[async_trait]
impl FileSourcePort for InMemoryFileSource {
    async fn list(&self, directory: &str) -> Result<Vec<String>, PortError> {
        self.lock()
            .directories
            .get(directory)
            .map(|files| files.keys().cloned().collect())
            .ok_or_else(|| PortError::not_found("Directory", directory))
    }

    async fn get(&self, remote_path: &str, local_path: &Path) -> Result<(), PortError> {
        let contents = self.contents(remote_path)?;
        tokio::fs::write(local_path, contents).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_injected_failures_are_consumed() {
        let source = InMemoryFileSource::new()
            .with_file("/out", "a.277", "ST~")
            .failing("/out", "a.277", 1);
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("a.277");

        assert!(source.get("/out/a.277", &target).await.is_err());
        source.get("/out/a.277", &target).await.unwrap();

        assert_eq!(source.get_calls("/out/a.277"), 2);
        assert_eq!(std::fs::read_to_string(target).unwrap(), "ST~");
    }

    #[tokio::test]
    async fn test_unknown_directory_is_not_found() {
        let source = InMemoryFileSource::new();
        assert!(source.list("/missing").await.unwrap_err().is_not_found());
    }
}
