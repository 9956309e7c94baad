//! Fund metadata cache.
//!
//! Resolving a fund's asset class means looking up its category on the
//! broker's site, so resolved [`FundInfo`] records are cached. Two backends:
//! an in-memory map for tests and one-off runs, and a directory of JSON files
//! that survives between runs.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use log::debug;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use yajirobe::AssetClass;

use crate::error::{Error, Result};

/// Resolved metadata for one fund.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FundInfo {
    pub code: String,
    pub class: AssetClass,
    pub name: String,
}

/// Produces the fund info for a code the cache does not hold.
pub type Finder<'a> = dyn FnMut(&str) -> Result<FundInfo> + 'a;

/// Key-value store for [`FundInfo`], keyed by fund code.
pub trait FundInfoCache {
    /// Cached info for `code`, or `None` on a miss.
    fn get(&self, code: &str) -> Result<Option<FundInfo>>;

    /// Store `info` under `info.code`, replacing any previous entry.
    fn set(&mut self, info: &FundInfo) -> Result<()>;

    /// Cached info for `code`; on a miss, run `finder`, store its result,
    /// then return it. A failing finder stores nothing.
    fn get_or_find(&mut self, code: &str, finder: &mut Finder<'_>) -> Result<FundInfo> {
        if let Some(info) = self.get(code)? {
            return Ok(info);
        }
        let info = finder(code)?;
        self.set(&info)?;
        Ok(info)
    }
}

/// Cache held in process memory.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: FxHashMap<String, FundInfo>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FundInfoCache for MemoryCache {
    fn get(&self, code: &str) -> Result<Option<FundInfo>> {
        Ok(self.entries.get(code).cloned())
    }

    fn set(&mut self, info: &FundInfo) -> Result<()> {
        self.entries.insert(info.code.clone(), info.clone());
        Ok(())
    }
}

/// Cache stored as one JSON file per fund under `<root>/cache/funds/`.
#[derive(Debug, Clone)]
pub struct FileCache {
    root: PathBuf,
}

/// Strip every character outside `[A-Za-z0-9.]` so a code is a safe file name.
pub fn escape_key(key: &str) -> String {
    key.chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '.')
        .collect()
}

impl FileCache {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory holding the fund entries.
    pub fn funds_dir(&self) -> PathBuf {
        self.root.join("cache").join("funds")
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.funds_dir().join(key)
    }

    fn io_error(path: &Path, source: std::io::Error) -> Error {
        Error::CacheIo {
            path: path.to_path_buf(),
            source,
        }
    }
}

impl FundInfoCache for FileCache {
    fn get(&self, code: &str) -> Result<Option<FundInfo>> {
        let key = escape_key(code);
        if key.is_empty() {
            return Ok(None);
        }
        let path = self.entry_path(&key);

        let data = match fs::read_to_string(&path) {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("cache miss: {code}");
                return Ok(None);
            }
            Err(e) => return Err(Self::io_error(&path, e)),
        };

        debug!("cache hit: {code}");
        let info: FundInfo = serde_json::from_str(&data)?;
        Ok(Some(info))
    }

    fn set(&mut self, info: &FundInfo) -> Result<()> {
        let key = escape_key(&info.code);
        if key.is_empty() {
            return Err(Error::Cache(format!(
                "code {:?} has no usable characters",
                info.code
            )));
        }

        let dir = self.funds_dir();
        fs::create_dir_all(&dir).map_err(|e| Self::io_error(&dir, e))?;

        let path = self.entry_path(&key);
        let json = serde_json::to_string(info)?;
        fs::write(&path, json).map_err(|e| Self::io_error(&path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(code: &str) -> FundInfo {
        FundInfo {
            code: code.into(),
            class: AssetClass::InternationalStocks,
            name: "TestFund".into(),
        }
    }

    #[test]
    fn escape_key_strips_path_characters() {
        assert_eq!(escape_key("0331418A"), "0331418A");
        assert_eq!(escape_key("../etc/passwd"), "..etcpasswd");
        assert_eq!(escape_key("a b/c.d"), "abc.d");
        assert_eq!(escape_key("//"), "");
    }

    #[test]
    fn memory_get_set() {
        let mut cache = MemoryCache::new();
        assert_eq!(cache.get("12345").unwrap(), None);
        cache.set(&info("12345")).unwrap();
        assert_eq!(cache.get("12345").unwrap(), Some(info("12345")));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn get_or_find_calls_finder_once() {
        let mut cache = MemoryCache::new();
        let mut calls = 0;
        let mut finder = |code: &str| -> Result<FundInfo> {
            calls += 1;
            Ok(info(code))
        };

        let first = cache.get_or_find("12345", &mut finder).unwrap();
        let second = cache.get_or_find("12345", &mut finder).unwrap();
        assert_eq!(first, second);
        assert_eq!(calls, 1);
    }

    #[test]
    fn failing_finder_stores_nothing() {
        let mut cache = MemoryCache::new();
        let result = cache.get_or_find("12345", &mut |code: &str| {
            Err(Error::FundInfoMissing(code.into()))
        });
        assert!(matches!(result, Err(Error::FundInfoMissing(_))));
        assert!(cache.is_empty());
    }

    #[test]
    fn file_get_missing_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FileCache::new(dir.path());
        assert_eq!(cache.get("12345").unwrap(), None);
        assert_eq!(cache.get("").unwrap(), None);
    }

    #[test]
    fn file_set_then_get() {
        let dir = tempfile::tempdir().unwrap();
        let mut cache = FileCache::new(dir.path());
        cache.set(&info("12345")).unwrap();

        assert!(cache.funds_dir().join("12345").exists());
        assert_eq!(cache.get("12345").unwrap(), Some(info("12345")));

        // A second handle on the same directory sees the entry.
        let reopened = FileCache::new(dir.path());
        assert_eq!(reopened.get("12345").unwrap(), Some(info("12345")));
    }

    #[test]
    fn file_get_or_find_persists() {
        let dir = tempfile::tempdir().unwrap();
        let mut cache = FileCache::new(dir.path());
        let found = cache
            .get_or_find("0331418A", &mut |code: &str| Ok(info(code)))
            .unwrap();
        assert_eq!(found.code, "0331418A");
        assert!(cache.funds_dir().join("0331418A").exists());
    }

    #[test]
    fn file_set_rejects_unusable_code() {
        let dir = tempfile::tempdir().unwrap();
        let mut cache = FileCache::new(dir.path());
        assert!(matches!(cache.set(&info("//")), Err(Error::Cache(_))));
    }

    #[test]
    fn file_get_corrupt_entry_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FileCache::new(dir.path());
        fs::create_dir_all(cache.funds_dir()).unwrap();
        fs::write(cache.funds_dir().join("12345"), "not json").unwrap();
        assert!(matches!(cache.get("12345"), Err(Error::Json(_))));
    }
}
