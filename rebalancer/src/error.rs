//! Error types for the rebalancer.

use std::path::PathBuf;

/// All errors that can occur while loading inputs, resolving fund metadata,
/// or writing the audit trail.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    #[error("failed to read config file {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("target file error: {0}")]
    Target(String),

    #[error("failed to read target file {path}: {source}")]
    TargetRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("holdings file error: {0}")]
    Holdings(String),

    #[error("failed to read holdings file {path}: {source}")]
    HoldingsRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid holding: {0}")]
    InvalidHolding(#[from] yajirobe::HoldingError),

    #[error("failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("fund info cache error: {0}")]
    Cache(String),

    #[error("fund info cache I/O on {path}: {source}")]
    CacheIo {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("no fund info for {0}: not cached and no category given")]
    FundInfoMissing(String),

    #[error("contribution must be a positive amount, got {0}")]
    Contribution(f64),

    #[error("audit log error: {0}")]
    Audit(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
