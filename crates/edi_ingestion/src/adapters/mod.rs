//! File source and metrics adapters

pub mod local;
pub mod memory;
pub mod metrics;
#[cfg(feature = "sftp")]
pub mod sftp;

pub use local::LocalDirectorySource;
pub use memory::InMemoryFileSource;
pub use metrics::{RecordingMetrics, TracingMetrics};
#[cfg(feature = "sftp")]
pub use sftp::{SftpAuth, SftpFileSource, SftpSettings};
