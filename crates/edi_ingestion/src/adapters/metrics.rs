//! Failure metric adapters

use std::sync::Mutex;
use tracing::warn;

use core_kernel::DomainPort;

use crate::ports::FailureMetrics;

/// Emits each increment as a structured `tracing` event
///
/// Log-based metric pipelines pick these up by the `metrics` target.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingMetrics;

impl DomainPort for TracingMetrics {}

impl FailureMetrics for TracingMetrics {
    fn increment(&self, name: &str, tags: &[&str]) {
        warn!(target: "metrics", metric = name, tags = ?tags, value = 1u64, "counter increment");
    }
}

/// A recorded counter increment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricIncrement {
    pub name: String,
    pub tags: Vec<String>,
}

/// Records increments in memory
#[derive(Debug, Default)]
pub struct RecordingMetrics {
    increments: Mutex<Vec<MetricIncrement>>,
}

impl RecordingMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every increment recorded so far, in order
    pub fn increments(&self) -> Vec<MetricIncrement> {
        self.increments
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Number of increments of the named counter
    pub fn count(&self, name: &str) -> usize {
        self.increments().iter().filter(|i| i.name == name).count()
    }
}

impl DomainPort for RecordingMetrics {}

impl FailureMetrics for RecordingMetrics {
    fn increment(&self, name: &str, tags: &[&str]) {
        self.increments
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(MetricIncrement {
                name: name.to_string(),
                tags: tags.iter().map(|t| t.to_string()).collect(),
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_metrics() {
        let metrics = RecordingMetrics::new();
        metrics.increment("edi.download", &["reason:DOWNLOAD_FAILURE"]);
        metrics.increment("other", &[]);

        assert_eq!(metrics.count("edi.download"), 1);
        assert_eq!(metrics.increments()[0].tags, vec!["reason:DOWNLOAD_FAILURE".to_string()]);
    }
}
