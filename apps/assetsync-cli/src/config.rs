//! Command-line and environment configuration.
//!
//! Every API setting can come from a flag or from the environment; a `.env`
//! file in the working directory is loaded before parsing.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use assetsync_directory::{ApiToken, DirectoryConfig};
use chrono::Local;
use clap::{Args, Parser};

use crate::error::{CliError, CliResult};

/// Connection settings shared by both programs.
#[derive(Args, Clone)]
pub struct ApiArgs {
    /// Base URL of the asset-management API, e.g. https://assets.example.com/api/v1
    #[arg(long = "api-url", env = "API_URL")]
    pub api_url: Option<String>,

    /// Bearer token for the API
    #[arg(long = "api-token", env = "API_TOKEN", hide_env_values = true)]
    pub api_token: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long = "timeout-secs", env = "API_TIMEOUT_SECS", default_value_t = 30)]
    pub timeout_secs: u64,
}

impl ApiArgs {
    /// Build the client configuration, failing if URL or token is unset.
    pub fn directory_config(&self) -> CliResult<DirectoryConfig> {
        let url = self
            .api_url
            .as_deref()
            .ok_or_else(|| CliError::Config("API_URL is not set".to_string()))?;
        let token = self
            .api_token
            .as_deref()
            .ok_or_else(|| CliError::Config("API_TOKEN is not set".to_string()))?;

        Ok(DirectoryConfig::new(url, ApiToken::new(token))
            .with_timeout(Duration::from_secs(self.timeout_secs)))
    }
}

impl fmt::Debug for ApiArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiArgs")
            .field("api_url", &self.api_url)
            .field("api_token", &self.api_token.as_ref().map(|_| "[REDACTED]"))
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// Create or reassign hardware assets from a CSV file
#[derive(Parser, Debug, Clone)]
#[command(name = "asset-import")]
#[command(version, about, long_about = None)]
pub struct AssetImportArgs {
    #[command(flatten)]
    pub api: ApiArgs,

    /// Input CSV file
    #[arg(short = 'i', long = "input", default_value = "asset_template.csv")]
    pub input: PathBuf,

    /// Results CSV file [default: asset_import_results_<timestamp>.csv]
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Log file [default: asset_import_<timestamp>.log]
    #[arg(long = "log-file")]
    pub log_file: Option<PathBuf>,

    /// Remember category, model, status and location ids for the whole run
    #[arg(long = "cache-lookups")]
    pub cache_lookups: bool,

    /// Enable debug logging
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

impl AssetImportArgs {
    pub fn output_path(&self, stamp: &str) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| PathBuf::from(format!("asset_import_results_{stamp}.csv")))
    }

    pub fn log_path(&self, stamp: &str) -> PathBuf {
        self.log_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(format!("asset_import_{stamp}.log")))
    }
}

/// Create or update user accounts from a CSV file
#[derive(Parser, Debug, Clone)]
#[command(name = "user-import")]
#[command(version, about, long_about = None)]
pub struct UserImportArgs {
    #[command(flatten)]
    pub api: ApiArgs,

    /// Input CSV file
    #[arg(short = 'i', long = "input", default_value = "user_template.csv")]
    pub input: PathBuf,

    /// Results CSV file. Holds generated passwords in plain text.
    #[arg(short = 'o', long = "output", default_value = "generated_passwords.csv")]
    pub output: PathBuf,

    /// Also write the log to this file
    #[arg(long = "log-file")]
    pub log_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

/// Local time as `YYYYmmdd_HHMMSS`, used in default file names.
pub fn run_stamp() -> String {
    Local::now().format("%Y%m%d_%H%M%S").to_string()
}
