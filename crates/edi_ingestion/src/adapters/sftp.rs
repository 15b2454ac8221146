//! SFTP file source
//!
//! Connects to the payer's SFTP drop with `ssh2`. The library is blocking, so
//! every call runs on the blocking thread pool. One session is opened per
//! source and held for the lifetime of the job.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use ssh2::{Session, Sftp};
use std::net::TcpStream;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use core_kernel::{DomainPort, PortError};

use crate::ports::FileSourcePort;

/// How to authenticate the SFTP session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SftpAuth {
    Password(String),
    PrivateKey { path: PathBuf, passphrase: Option<String> },
}

/// SFTP connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SftpSettings {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub auth: SftpAuth,
    pub timeout: Duration,
}

/// File source backed by an SFTP session
pub struct SftpFileSource {
    // Keeps the transport alive for `sftp`
    _session: Session,
    sftp: Arc<Sftp>,
    host: String,
}

impl std::fmt::Debug for SftpFileSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SftpFileSource").field("host", &self.host).finish_non_exhaustive()
    }
}

impl SftpFileSource {
    /// Opens and authenticates a session
    ///
    /// # Errors
    ///
    /// Returns `PortError::Connection` if the host is unreachable or the
    /// handshake fails, and `PortError::Unauthorized` if authentication is
    /// rejected.
    pub async fn connect(settings: SftpSettings) -> Result<Self, PortError> {
        tokio::task::spawn_blocking(move || Self::connect_blocking(settings))
            .await
            .map_err(|e| PortError::internal(format!("SFTP connect task failed: {}", e)))?
    }

    fn connect_blocking(settings: SftpSettings) -> Result<Self, PortError> {
        let address = format!("{}:{}", settings.host, settings.port);
        let tcp = TcpStream::connect(&address).map_err(|e| PortError::Connection {
            message: format!("failed to reach {}", address),
            source: Some(Box::new(e)),
        })?;

        let mut session = Session::new().map_err(connection_error)?;
        session.set_timeout(u32::try_from(settings.timeout.as_millis()).unwrap_or(u32::MAX));
        session.set_tcp_stream(tcp);
        session.handshake().map_err(connection_error)?;

        let auth_result = match &settings.auth {
            SftpAuth::Password(password) => session.userauth_password(&settings.username, password),
            SftpAuth::PrivateKey { path, passphrase } => session.userauth_pubkey_file(
                &settings.username,
                None,
                path,
                passphrase.as_deref(),
            ),
        };
        auth_result.map_err(|e| PortError::Unauthorized {
            message: format!("SFTP authentication failed for {}: {}", settings.username, e),
        })?;

        let sftp = session.sftp().map_err(connection_error)?;
        info!(host = %settings.host, port = settings.port, "SFTP session established");

        Ok(Self {
            _session: session,
            sftp: Arc::new(sftp),
            host: settings.host,
        })
    }
}

fn connection_error(error: ssh2::Error) -> PortError {
    PortError::Connection {
        message: error.to_string(),
        source: Some(Box::new(error)),
    }
}

fn io_error(error: ssh2::Error) -> PortError {
    PortError::from(std::io::Error::from(error))
}

impl DomainPort for SftpFileSource {}

#[async_trait]
impl FileSourcePort for SftpFileSource {
    async fn list(&self, directory: &str) -> Result<Vec<String>, PortError> {
        let sftp = Arc::clone(&self.sftp);
        let directory = directory.to_string();

        tokio::task::spawn_blocking(move || -> Result<Vec<String>, PortError> {
            let entries = sftp.readdir(Path::new(&directory)).map_err(io_error)?;
            let names: Vec<String> = entries
                .into_iter()
                .filter(|(_, stat)| stat.is_file())
                .filter_map(|(path, _)| {
                    path.file_name()
                        .and_then(|name| name.to_str())
                        .map(str::to_string)
                })
                .collect();
            debug!(directory = %directory, count = names.len(), "Listed SFTP directory");
            Ok(names)
        })
        .await
        .map_err(|e| PortError::internal(format!("SFTP list task failed: {}", e)))?
    }

    async fn get(&self, remote_path: &str, local_path: &Path) -> Result<(), PortError> {
        let sftp = Arc::clone(&self.sftp);
        let remote_path = remote_path.to_string();
        let local_path = local_path.to_path_buf();

        tokio::task::spawn_blocking(move || -> Result<(), PortError> {
            let mut remote = sftp.open(Path::new(&remote_path)).map_err(io_error)?;
            let mut local = std::fs::File::create(&local_path)?;
            let bytes = std::io::copy(&mut remote, &mut local)?;
            debug!(remote_path = %remote_path, bytes, "Downloaded SFTP file");
            Ok(())
        })
        .await
        .map_err(|e| PortError::internal(format!("SFTP get task failed: {}", e)))?
    }
}
