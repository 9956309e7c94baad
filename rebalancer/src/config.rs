//! TOML configuration loading and validation.
//!
//! Every section is optional; an empty file (or no file at all) gives a file
//! cache under the user's home directory, the default ETF map, and an audit
//! trail in `./logs`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use yajirobe::{AssetClass, EtfMap};

use crate::error::{Error, Result};

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub cache: CacheConfig,
    /// Stock code -> asset class, for ETFs allocated together with a fund
    #[serde(default = "default_etf")]
    pub etf: BTreeMap<String, AssetClass>,
    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_etf() -> BTreeMap<String, AssetClass> {
    EtfMap::default()
        .iter()
        .map(|(code, class)| (code.to_string(), class))
        .collect()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache: CacheConfig::default(),
            etf: default_etf(),
            logging: LoggingConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    #[serde(default = "default_backend")]
    pub backend: CacheBackend,
    /// Root directory of the file cache; defaults to [`default_cache_dir`]
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackend {
    File,
    Memory,
}

fn default_backend() -> CacheBackend {
    CacheBackend::File
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            dir: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_dir")]
    pub dir: String,
    #[serde(default = "default_audit_file")]
    pub audit_file: String,
    #[serde(default = "default_true")]
    pub enabled: bool,
}

fn default_log_dir() -> String {
    "./logs".into()
}
fn default_audit_file() -> String {
    "audit.jsonl".into()
}
fn default_true() -> bool {
    true
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            dir: default_log_dir(),
            audit_file: default_audit_file(),
            enabled: default_true(),
        }
    }
}

impl Config {
    /// Load config from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| Error::ConfigRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_toml(&contents)
    }

    /// Parse and validate from a TOML string.
    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate config invariants.
    fn validate(&self) -> Result<()> {
        if self.etf.keys().any(|code| code.trim().is_empty()) {
            return Err(Error::Config("etf codes must not be empty".into()));
        }
        if let Some(dir) = &self.cache.dir {
            if dir.as_os_str().is_empty() {
                return Err(Error::Config("cache dir must not be empty".into()));
            }
        }
        if self.logging.enabled && self.logging.audit_file.is_empty() {
            return Err(Error::Config("audit_file must not be empty".into()));
        }
        Ok(())
    }

    /// ETF map handed to the engine.
    pub fn etf_map(&self) -> EtfMap {
        self.etf.iter().map(|(code, &class)| (code.clone(), class)).collect()
    }

    /// Root directory of the file cache.
    pub fn cache_dir(&self) -> Result<PathBuf> {
        match &self.cache.dir {
            Some(dir) => Ok(dir.clone()),
            None => default_cache_dir(),
        }
    }

    /// Full path to the audit log file.
    pub fn audit_path(&self) -> PathBuf {
        Path::new(&self.logging.dir).join(&self.logging.audit_file)
    }
}

/// `%APPDATA%\yajirobe` on Windows, `$HOME/.yajirobe` elsewhere.
pub fn default_cache_dir() -> Result<PathBuf> {
    let (var, leaf) = if cfg!(windows) {
        ("APPDATA", "yajirobe")
    } else {
        ("HOME", ".yajirobe")
    };
    match std::env::var_os(var) {
        Some(base) if !base.is_empty() => Ok(PathBuf::from(base).join(leaf)),
        _ => Err(Error::Config(format!("{var} is not defined"))),
    }
}
