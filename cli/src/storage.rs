//! Directory-backed local storage for the offline cache and drafts.
//!
//! Each key is one file, `{dir}/{key}.json`. Keys produced by
//! `floorplan::persist` are already filename-safe (`intramap_building_{id}`).

#[cfg(test)]
#[path = "storage_test.rs"]
mod storage_test;

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use floorplan::persist::{LocalStorage, PersistError};
use tracing::{debug, warn};

#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl LocalStorage for FileStorage {
    fn get(&self, key: &str) -> Option<String> {
        match std::fs::read_to_string(self.path_for(key)) {
            Ok(value) => Some(value),
            Err(e) if e.kind() == ErrorKind::NotFound => None,
            Err(e) => {
                warn!(key, error = %e, "cache read failed");
                None
            }
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PersistError> {
        std::fs::create_dir_all(&self.dir).map_err(|e| PersistError::Storage(e.to_string()))?;
        std::fs::write(self.path_for(key), value).map_err(|e| PersistError::Storage(e.to_string()))?;
        debug!(key, dir = %self.dir.display(), "cache entry written");
        Ok(())
    }

    fn remove(&mut self, key: &str) {
        match std::fs::remove_file(self.path_for(key)) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => warn!(key, error = %e, "cache entry removal failed"),
        }
    }
}
