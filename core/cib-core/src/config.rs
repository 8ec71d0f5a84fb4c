//! Configuration loading for crm-ops.
//!
//! The config file is optional JSON:
//!
//! ```json
//! { "cib_file": "/var/lib/pacemaker/cib/cib.xml", "color": false }
//! ```
//!
//! Its location is `$CRM_OPS_CONFIG`, falling back to
//! `<config dir>/crm-ops/config.json`.

use fs_err as fs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::error::{CibError, Result};
use crate::source::{CibSource, DEFAULT_CIBADMIN};

/// Environment variable that overrides the config file location.
pub const CONFIG_ENV: &str = "CRM_OPS_CONFIG";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Read the CIB from this file instead of querying the cluster.
    pub cib_file: Option<PathBuf>,
    pub cibadmin_path: PathBuf,
    pub cibadmin_args: Vec<String>,
    /// Colourise table output.
    pub color: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cib_file: None,
            cibadmin_path: PathBuf::from(DEFAULT_CIBADMIN),
            cibadmin_args: vec!["--query".to_string()],
            color: true,
        }
    }
}

impl Config {
    /// The document source this config selects; a file wins over the command.
    pub fn source(&self) -> CibSource {
        match &self.cib_file {
            Some(path) => CibSource::File(path.clone()),
            None => CibSource::Command {
                program: self.cibadmin_path.clone(),
                args: self.cibadmin_args.clone(),
            },
        }
    }
}

/// Returns the path of the config file.
pub fn config_path() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os(CONFIG_ENV).filter(|p| !p.is_empty()) {
        return Some(PathBuf::from(path));
    }
    dirs::config_dir().map(|d| d.join("crm-ops").join("config.json"))
}

/// Loads the config, returning defaults if the file is missing or unreadable.
pub fn load_config() -> Config {
    let Some(path) = config_path() else {
        return Config::default();
    };
    if !path.exists() {
        return Config::default();
    }

    load_config_from(&path).unwrap_or_else(|err| {
        warn!(error = %err, "Ignoring config file; using defaults");
        Config::default()
    })
}

/// Loads the config from an explicit path.
pub fn load_config_from(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path).map_err(|source| CibError::Io {
        context: "reading config file".to_string(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|err| CibError::ConfigMalformed {
        path: path.to_path_buf(),
        details: err.to_string(),
    })
}
