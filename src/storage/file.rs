use crate::error::app_error::AppError;
use crate::storage::KeyValueStore;
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, warn};

/// Key-value store persisted as a flat JSON object. Every write rewrites the
/// whole file through a temporary sibling and a rename.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl FileStore {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, AppError> {
        let path = path.into();
        let entries = match fs::read(&path) {
            Ok(bytes) if bytes.is_empty() => BTreeMap::new(),
            Ok(bytes) => match serde_json::from_slice(&bytes) {
                Ok(entries) => entries,
                Err(e) => {
                    // A corrupt file only costs the saved session.
                    warn!(path = %path.display(), error = %e, "discarding unreadable session file");
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(AppError::storage(format!("Failed to read {}", path.display()), e)),
        };

        debug!(path = %path.display(), keys = entries.len(), "opened session file");

        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn update<F>(&self, change: F) -> Result<(), AppError>
    where
        F: FnOnce(&mut BTreeMap<String, String>) -> bool,
    {
        let mut entries = self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if !change(&mut entries) {
            return Ok(());
        }

        let bytes = serde_json::to_vec_pretty(&*entries)?;
        let tmp_path = self.path.with_extension("tmp");
        fs::write(&tmp_path, bytes).map_err(|e| AppError::storage(format!("Failed to write {}", tmp_path.display()), e))?;
        fs::rename(&tmp_path, &self.path).map_err(|e| AppError::storage(format!("Failed to replace {}", self.path.display()), e))?;

        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, AppError> {
        let entries = self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), AppError> {
        self.update(|entries| entries.insert(key.to_string(), value.to_string()).as_deref() != Some(value))
    }

    fn remove(&self, key: &str) -> Result<(), AppError> {
        self.update(|entries| entries.remove(key).is_some())
    }
}
