use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use super::error::LoadError;
use super::loader::load_file;
use super::model::Dataset;

// ---------------------------------------------------------------------------
// Source identity
// ---------------------------------------------------------------------------

/// Identity of a source file: rewritten files get a new key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceKey {
    pub path: PathBuf,
    pub len: u64,
    pub modified: Option<SystemTime>,
}

impl SourceKey {
    pub fn of(path: &Path) -> Result<Self, LoadError> {
        let path = path.canonicalize().map_err(|e| LoadError::io(path, e))?;
        let meta = std::fs::metadata(&path).map_err(|e| LoadError::io(&path, e))?;
        Ok(SourceKey {
            len: meta.len(),
            modified: meta.modified().ok(),
            path,
        })
    }
}

struct CacheEntry {
    key: SourceKey,
    required_columns: Vec<String>,
    dataset: Arc<Dataset>,
}

// ---------------------------------------------------------------------------
// DatasetCache
// ---------------------------------------------------------------------------

/// Load-once store of parsed datasets, keyed by source identity.
///
/// Owned by the application state; entries only go away through
/// [`invalidate`](Self::invalidate) / [`clear`](Self::clear) or when the file
/// on disk changes.
#[derive(Default)]
pub struct DatasetCache {
    entries: HashMap<PathBuf, CacheEntry>,
}

impl DatasetCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached dataset for `path`, parsing the file only when it
    /// has not been seen, has changed on disk, or is requested with a
    /// different set of required columns.
    pub fn get_or_load(
        &mut self,
        path: &Path,
        required_columns: &[String],
    ) -> Result<Arc<Dataset>, LoadError> {
        let key = SourceKey::of(path)?;

        if let Some(entry) = self.entries.get(&key.path) {
            if entry.key == key && entry.required_columns == required_columns {
                log::debug!("Cache hit for {}", key.path.display());
                return Ok(Arc::clone(&entry.dataset));
            }
        }

        log::debug!("Cache miss for {}", key.path.display());
        let dataset = Arc::new(load_file(&key.path, required_columns)?);
        self.entries.insert(
            key.path.clone(),
            CacheEntry {
                key,
                required_columns: required_columns.to_vec(),
                dataset: Arc::clone(&dataset),
            },
        );
        Ok(dataset)
    }

    /// Drop the entry for `path`. Returns whether one was cached.
    pub fn invalidate(&mut self, path: &Path) -> bool {
        let canonical = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
        self.entries.remove(&canonical).is_some()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_csv(path: &Path, content: &str) {
        let mut file = std::fs::File::create(path).unwrap();
        write!(file, "{}", content).unwrap();
    }

    #[test]
    fn second_load_returns_the_cached_dataset() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("responses.csv");
        write_csv(&path, "A,B\nX,p\n");

        let mut cache = DatasetCache::new();
        let first = cache.get_or_load(&path, &[]).unwrap();
        let second = cache.get_or_load(&path, &[]).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn invalidate_forces_a_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("responses.csv");
        write_csv(&path, "A,B\nX,p\n");

        let mut cache = DatasetCache::new();
        let first = cache.get_or_load(&path, &[]).unwrap();
        assert!(cache.invalidate(&path));
        assert!(cache.is_empty());
        let second = cache.get_or_load(&path, &[]).unwrap();
        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(first, second);
    }

    #[test]
    fn clear_drops_every_entry() {
        let dir = tempfile::tempdir().unwrap();
        let first_path = dir.path().join("a.csv");
        let second_path = dir.path().join("b.csv");
        write_csv(&first_path, "A\nX\n");
        write_csv(&second_path, "A\nY\n");

        let mut cache = DatasetCache::new();
        let first = cache.get_or_load(&first_path, &[]).unwrap();
        cache.get_or_load(&second_path, &[]).unwrap();
        assert_eq!(cache.len(), 2);

        cache.clear();
        assert!(cache.is_empty());
        let reloaded = cache.get_or_load(&first_path, &[]).unwrap();
        assert!(!Arc::ptr_eq(&first, &reloaded));
    }

    #[test]
    fn rewritten_file_is_reloaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("responses.csv");
        write_csv(&path, "A,B\nX,p\n");

        let mut cache = DatasetCache::new();
        let first = cache.get_or_load(&path, &[]).unwrap();
        write_csv(&path, "A,B\nX,p\nY,q\n");
        let second = cache.get_or_load(&path, &[]).unwrap();
        assert_eq!(first.len(), 1);
        assert_eq!(second.len(), 2);
    }

    #[test]
    fn failed_load_is_not_cached() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("responses.csv");
        write_csv(&path, "A\nX\n");

        let mut cache = DatasetCache::new();
        let err = cache.get_or_load(&path, &["B".to_string()]).unwrap_err();
        assert!(matches!(err, LoadError::MissingColumn { .. }));
        assert!(cache.is_empty());
    }

    #[test]
    fn missing_file_is_file_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let mut cache = DatasetCache::new();
        let err = cache.get_or_load(&dir.path().join("gone.csv"), &[]).unwrap_err();
        assert!(matches!(err, LoadError::FileNotFound { .. }));
    }
}
