use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_AWS_CLI: &str = "aws";
pub const DEFAULT_REGION: &str = "us-east-1";
pub const DEFAULT_COMMAND_TIMEOUT_SECS: u64 = 120;

/// Optional settings, as read from the JSON config file or the command line
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credentials_file: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kubeconfig: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aws_cli: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command_timeout_secs: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flash_secret: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to determine home directory")]
    NoHomeDir,

    #[error("command_timeout_secs must be greater than zero")]
    ZeroTimeout,
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let content = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Fill every unset field from `fallback`
    pub fn or(self, fallback: Config) -> Config {
        Config {
            credentials_file: self.credentials_file.or(fallback.credentials_file),
            kubeconfig: self.kubeconfig.or(fallback.kubeconfig),
            aws_cli: self.aws_cli.or(fallback.aws_cli),
            region: self.region.or(fallback.region),
            command_timeout_secs: self.command_timeout_secs.or(fallback.command_timeout_secs),
            flash_secret: self.flash_secret.or(fallback.flash_secret),
        }
    }
}

/// Settings with every default applied; built once at startup
#[derive(Debug, Clone)]
pub struct Settings {
    pub credentials_file: PathBuf,
    pub kubeconfig: PathBuf,
    pub aws_cli: String,
    pub region: String,
    pub command_timeout: Duration,
    pub flash_secret: String,
}

impl Settings {
    pub fn resolve(config: Config) -> Result<Self, ConfigError> {
        let credentials_file = match config.credentials_file {
            Some(path) => path,
            None => default_credentials_path()?,
        };
        let kubeconfig = match config.kubeconfig {
            Some(path) => path,
            None => default_kubeconfig_path()?,
        };

        let timeout_secs = config
            .command_timeout_secs
            .unwrap_or(DEFAULT_COMMAND_TIMEOUT_SECS);
        if timeout_secs == 0 {
            return Err(ConfigError::ZeroTimeout);
        }

        Ok(Self {
            credentials_file,
            kubeconfig,
            aws_cli: config.aws_cli.unwrap_or_else(|| DEFAULT_AWS_CLI.to_string()),
            region: config.region.unwrap_or_else(|| DEFAULT_REGION.to_string()),
            command_timeout: Duration::from_secs(timeout_secs),
            flash_secret: config
                .flash_secret
                .unwrap_or_else(|| uuid::Uuid::new_v4().simple().to_string()),
        })
    }
}

/// `~/.aws/credentials`
pub fn default_credentials_path() -> Result<PathBuf, ConfigError> {
    dirs::home_dir()
        .map(|home| home.join(".aws").join("credentials"))
        .ok_or(ConfigError::NoHomeDir)
}

/// `~/.kube/config`
pub fn default_kubeconfig_path() -> Result<PathBuf, ConfigError> {
    dirs::home_dir()
        .map(|home| home.join(".kube").join("config"))
        .ok_or(ConfigError::NoHomeDir)
}
