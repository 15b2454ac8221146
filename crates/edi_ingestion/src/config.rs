//! Ingestion job configuration
//!
//! Loaded from `EDI_`-prefixed environment variables (a `.env` file is
//! honoured by the binary), e.g. `EDI_DATABASE_URL`, `EDI_REMOTE_DIRECTORY`,
//! `EDI_FILENAME_PATTERN`, `EDI_SFTP_HOST`.

use chrono::NaiveDate;
use regex::Regex;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

use core_kernel::RetryPolicy;

use crate::adapters::LocalDirectorySource;
use crate::error::IngestionError;
use crate::ports::FileSourcePort;

/// Ingestion job configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct IngestionConfig {
    /// PostgreSQL connection string for the mapping table
    pub database_url: String,
    /// Serve files from this local directory instead of SFTP
    pub local_directory: Option<String>,
    pub sftp_host: Option<String>,
    pub sftp_port: u16,
    pub sftp_username: Option<String>,
    pub sftp_password: Option<String>,
    pub sftp_private_key_path: Option<String>,
    pub sftp_timeout_secs: u64,
    /// Directory listed on the file source
    pub remote_directory: String,
    /// Regex matched against file names
    pub filename_pattern: String,
    /// Capture group of `filename_pattern` holding the `YYYYMMDD` date
    pub date_index: usize,
    /// Defaults to today (UTC) when absent
    pub target_date: Option<NaiveDate>,
    /// Counter incremented on download failure
    pub metric_name: String,
    pub retry_attempts: u32,
    pub retry_multiplier_ms: u64,
    pub retry_max_delay_secs: u64,
    /// Log level: trace, debug, info, warn, error
    pub log_level: String,
    /// Emit JSON logs
    pub log_json: bool,
}

impl Default for IngestionConfig {
    fn default() -> Self {
        Self {
            database_url: "postgres://localhost/accumulation".to_string(),
            local_directory: None,
            sftp_host: None,
            sftp_port: 22,
            sftp_username: None,
            sftp_password: None,
            sftp_private_key_path: None,
            sftp_timeout_secs: 30,
            remote_directory: "/outbound".to_string(),
            filename_pattern: r"^277-AETNA60054-(\d{8})(\d{8})-(\d{3})\.277$".to_string(),
            date_index: 1,
            target_date: None,
            metric_name: "payer_accumulation.277.download.failure".to_string(),
            retry_attempts: 3,
            retry_multiplier_ms: 1_000,
            retry_max_delay_secs: 60,
            log_level: "info".to_string(),
            log_json: false,
        }
    }
}

impl IngestionConfig {
    /// Loads configuration from environment
    pub fn from_env() -> Result<Self, IngestionError> {
        Self::from_source(config::Environment::with_prefix("EDI"))
    }

    /// Loads configuration from any `config` source
    pub fn from_source<S>(source: S) -> Result<Self, IngestionError>
    where
        S: config::Source + Send + Sync + 'static,
    {
        let config: Self = config::Config::builder()
            .add_source(source)
            .build()?
            .try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the pattern compiles and contains the date group
    pub fn validate(&self) -> Result<(), IngestionError> {
        self.filename_regex()?;
        if self.retry_attempts == 0 {
            return Err(IngestionError::invalid_config("retry_attempts must be at least 1"));
        }
        Ok(())
    }

    /// Compiles `filename_pattern`
    pub fn filename_regex(&self) -> Result<Regex, IngestionError> {
        let regex = Regex::new(&self.filename_pattern)?;
        // Group 0 is the whole match
        let groups = regex.captures_len() - 1;
        if self.date_index == 0 || self.date_index > groups {
            return Err(IngestionError::InvalidDateIndex {
                date_index: self.date_index,
                groups,
            });
        }
        Ok(regex)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.retry_attempts,
            Duration::from_millis(self.retry_multiplier_ms),
            Duration::from_secs(self.retry_max_delay_secs),
        )
    }

    /// Builds the configured file source
    ///
    /// A local directory takes precedence over SFTP settings.
    pub async fn file_source(&self) -> Result<Arc<dyn FileSourcePort>, IngestionError> {
        if let Some(directory) = &self.local_directory {
            return Ok(Arc::new(LocalDirectorySource::new(directory)));
        }
        match &self.sftp_host {
            Some(host) => self.sftp_source(host).await,
            None => Err(IngestionError::invalid_config(
                "either local_directory or sftp_host must be set",
            )),
        }
    }

    #[cfg(feature = "sftp")]
    async fn sftp_source(&self, host: &str) -> Result<Arc<dyn FileSourcePort>, IngestionError> {
        use crate::adapters::{SftpAuth, SftpFileSource, SftpSettings};

        let username = self
            .sftp_username
            .clone()
            .ok_or_else(|| IngestionError::invalid_config("sftp_username is required"))?;
        let auth = match (&self.sftp_private_key_path, &self.sftp_password) {
            (Some(path), passphrase) => SftpAuth::PrivateKey {
                path: path.into(),
                passphrase: passphrase.clone(),
            },
            (None, Some(password)) => SftpAuth::Password(password.clone()),
            (None, None) => {
                return Err(IngestionError::invalid_config(
                    "sftp_password or sftp_private_key_path is required",
                ))
            }
        };

        let source = SftpFileSource::connect(SftpSettings {
            host: host.to_string(),
            port: self.sftp_port,
            username,
            auth,
            timeout: Duration::from_secs(self.sftp_timeout_secs),
        })
        .await?;
        Ok(Arc::new(source))
    }

    #[cfg(not(feature = "sftp"))]
    async fn sftp_source(&self, host: &str) -> Result<Arc<dyn FileSourcePort>, IngestionError> {
        Err(IngestionError::invalid_config(format!(
            "sftp_host {} is set but this build lacks the `sftp` feature",
            host
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(pairs: &[(&str, &str)]) -> config::Environment {
        let map = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        config::Environment::with_prefix("EDI").source(Some(map))
    }

    #[test]
    fn test_defaults() {
        let config = IngestionConfig::from_source(env(&[])).unwrap();

        assert_eq!(config.date_index, 1);
        assert_eq!(config.retry_policy(), RetryPolicy::default());
        assert!(config.target_date.is_none());
    }

    #[test]
    fn test_overrides_from_environment() {
        let config = IngestionConfig::from_source(env(&[
            ("EDI_LOCAL_DIRECTORY", "/data/payers"),
            ("EDI_REMOTE_DIRECTORY", "aetna"),
            ("EDI_TARGET_DATE", "2024-10-21"),
            ("EDI_RETRY_ATTEMPTS", "5"),
        ]))
        .unwrap();

        assert_eq!(config.local_directory.as_deref(), Some("/data/payers"));
        assert_eq!(config.remote_directory, "aetna");
        assert_eq!(config.target_date, NaiveDate::from_ymd_opt(2024, 10, 21));
        assert_eq!(config.retry_policy().max_attempts, 5);
    }

    #[test]
    fn test_date_index_must_exist() {
        let config = IngestionConfig {
            filename_pattern: r"^X-(\d{8})\.277$".to_string(),
            date_index: 2,
            ..Default::default()
        };

        let error = config.validate().unwrap_err();
        assert!(matches!(error, IngestionError::InvalidDateIndex { date_index: 2, groups: 1 }));
    }

    #[test]
    fn test_invalid_pattern() {
        let config = IngestionConfig {
            filename_pattern: "(".to_string(),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(IngestionError::InvalidPattern(_))));
    }

    #[tokio::test]
    async fn test_missing_file_source_is_rejected() {
        let result = IngestionConfig::default().file_source().await;
        assert!(matches!(result, Err(IngestionError::InvalidConfig(_))));
    }
}
