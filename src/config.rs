//! Configuration
//!
//! Optional JSON file. Every field has a default, so an empty object or a
//! missing default file both yield a usable configuration.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{LtfsCmdError, Result};

const APP_DIR: &str = "ltfscmd";
const CONFIG_FILE: &str = "config.json";
const MAPPING_FILE: &str = "mappings.json";

pub const DEFAULT_LOG_DIR: &str = r"C:\ProgramData\Hewlett-Packard\LTFS";
pub const DEFAULT_WORK_DIR: &str = r"C:\tmp\LTFS";
pub const DEFAULT_SERVICE_NAME: &str = "LTFS";
pub const DEFAULT_SERVICE_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// LTFS log directory written into new mappings
    pub log_dir: PathBuf,
    /// LTFS working directory written into new mappings
    pub work_dir: PathBuf,
    /// Present files not cached on disk as offline
    pub show_offline: bool,
    /// Name of the filesystem service
    pub service_name: String,
    /// How long to wait for the service to reach a requested state
    pub service_timeout_secs: u64,
    /// Mapping store location; defaults under the local data directory
    pub mapping_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_dir: PathBuf::from(DEFAULT_LOG_DIR),
            work_dir: PathBuf::from(DEFAULT_WORK_DIR),
            show_offline: true,
            service_name: DEFAULT_SERVICE_NAME.to_string(),
            service_timeout_secs: DEFAULT_SERVICE_TIMEOUT_SECS,
            mapping_file: None,
        }
    }
}

impl Config {
    /// Load `path` if given (it must exist), else the default location if present.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::from_file(&path),
                _ => {
                    debug!("No configuration file, using defaults");
                    Ok(Self::default())
                }
            },
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from {}", path.display());

        let content = fs::read_to_string(path).map_err(|e| {
            LtfsCmdError::config(format!("Cannot read {}: {}", path.display(), e))
        })?;

        let config: Config = serde_json::from_str(&content).map_err(|e| {
            LtfsCmdError::config(format!("Cannot parse {}: {}", path.display(), e))
        })?;

        config.validate()?;
        Ok(config)
    }

    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
    }

    pub fn mapping_file(&self) -> PathBuf {
        self.mapping_file.clone().unwrap_or_else(|| {
            dirs::data_local_dir()
                .map(|dir| dir.join(APP_DIR))
                .unwrap_or_default()
                .join(MAPPING_FILE)
        })
    }

    fn validate(&self) -> Result<()> {
        if self.service_name.trim().is_empty() {
            return Err(LtfsCmdError::config("service_name must not be empty"));
        }
        if self.service_timeout_secs == 0 {
            return Err(LtfsCmdError::config("service_timeout_secs must be positive"));
        }
        Ok(())
    }
}
