//! Residue metadata cache.
//!
//! Lookups are explicit: `get` reports present or absent, and a miss is filled
//! with `insert_if_absent`, so two runs racing on the same entry both succeed
//! and the first write wins.
use crate::error::{Error, Result};
use crate::metadata::{ResidueRecord, ResidueSource};
use std::collections::HashMap;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

pub trait ResidueCache {
    fn get(&self, entry_name: &str) -> Result<Option<Vec<ResidueRecord>>>;
    /// Returns true if this call stored the entry.
    fn insert_if_absent(&self, entry_name: &str, records: &[ResidueRecord]) -> Result<bool>;
}

/// One JSON file per entry.
#[derive(Debug, Clone)]
pub struct DirectoryCache {
    dir: PathBuf,
}

impl DirectoryCache {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(DirectoryCache { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn entry_path(&self, entry_name: &str) -> PathBuf {
        let file: String = entry_name
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '_' || c == '-' { c } else { '_' })
            .collect();
        self.dir.join(format!("{file}.json"))
    }
}

impl ResidueCache for DirectoryCache {
    fn get(&self, entry_name: &str) -> Result<Option<Vec<ResidueRecord>>> {
        match fs::read_to_string(self.entry_path(entry_name)) {
            Ok(text) => Ok(Some(serde_json::from_str(&text)?)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn insert_if_absent(&self, entry_name: &str, records: &[ResidueRecord]) -> Result<bool> {
        let path = self.entry_path(entry_name);
        if path.exists() {
            return Ok(false);
        }
        let mut temp = tempfile::NamedTempFile::new_in(&self.dir)?;
        temp.write_all(serde_json::to_string(records)?.as_bytes())?;
        match temp.persist_noclobber(&path) {
            Ok(_) => Ok(true),
            Err(e) if e.error.kind() == ErrorKind::AlreadyExists => Ok(false),
            Err(e) => Err(Error::Cache { path, source: e.error }),
        }
    }
}

#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<String, Vec<ResidueRecord>>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ResidueCache for MemoryCache {
    fn get(&self, entry_name: &str) -> Result<Option<Vec<ResidueRecord>>> {
        let entries = self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        Ok(entries.get(entry_name).cloned())
    }

    fn insert_if_absent(&self, entry_name: &str, records: &[ResidueRecord]) -> Result<bool> {
        let mut entries = self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if entries.contains_key(entry_name) {
            return Ok(false);
        }
        entries.insert(entry_name.to_string(), records.to_vec());
        Ok(true)
    }
}

/// A residue source consulted only on cache misses.
pub struct CachedResidueSource<S, C> {
    source: S,
    cache: C,
}

impl<S: ResidueSource, C: ResidueCache> CachedResidueSource<S, C> {
    pub fn new(source: S, cache: C) -> Self {
        CachedResidueSource { source, cache }
    }

    pub fn cache(&self) -> &C {
        &self.cache
    }
}

impl<S: ResidueSource, C: ResidueCache> ResidueSource for CachedResidueSource<S, C> {
    fn residues(&self, entry_name: &str) -> Result<Vec<ResidueRecord>> {
        if let Some(records) = self.cache.get(entry_name)? {
            log::debug!("using cached residues for {entry_name}");
            return Ok(records);
        }
        let records = self.source.residues(entry_name)?;
        self.cache.insert_if_absent(entry_name, &records)?;
        Ok(records)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use ligdyn_test_data::TestFile;
    use std::cell::Cell;

    /// Serves the fixture for `test_human` and counts calls.
    #[derive(Default)]
    pub(crate) struct FixtureSource {
        pub(crate) calls: Cell<usize>,
    }

    impl ResidueSource for FixtureSource {
        fn residues(&self, entry_name: &str) -> Result<Vec<ResidueRecord>> {
            self.calls.set(self.calls.get() + 1);
            if entry_name != "test_human" {
                return Err(Error::Metadata {
                    entry: entry_name.to_string(),
                    details: "HTTP 404 Not Found".to_string(),
                });
            }
            Ok(serde_json::from_slice(TestFile::gpcrdb_residues().bytes())?)
        }
    }

    #[test]
    fn test_directory_cache_insert_if_absent() {
        let dir = tempfile::tempdir().unwrap();
        let cache = DirectoryCache::new(dir.path().join("gpcrdb")).unwrap();
        let records: Vec<ResidueRecord> = serde_json::from_slice(TestFile::gpcrdb_residues().bytes()).unwrap();

        assert!(cache.get("test_human").unwrap().is_none());
        assert!(cache.insert_if_absent("test_human", &records).unwrap());
        assert!(!cache.insert_if_absent("test_human", &records[..1]).unwrap());
        assert_eq!(cache.get("test_human").unwrap().unwrap(), records);

        // no temp files left behind
        assert_eq!(fs::read_dir(cache.dir()).unwrap().count(), 1);
    }

    #[test]
    fn test_cached_source_fetches_once() {
        let cached = CachedResidueSource::new(FixtureSource::default(), MemoryCache::new());
        assert_eq!(cached.residues("test_human").unwrap().len(), 20);
        assert_eq!(cached.residues("test_human").unwrap().len(), 20);
        assert_eq!(cached.source.calls.get(), 1);

        assert!(cached.residues("missing_human").is_err());
        assert!(cached.cache().get("missing_human").unwrap().is_none());
    }
}
