//! Persistence adapter helpers shared by every client of the building API.
//!
//! DESIGN
//! ======
//! Remote I/O lives in the callers (the CLI uses `reqwest`, a browser host
//! would use `fetch`). This module owns everything around it that must behave
//! the same everywhere: the local-storage keys, the draft and offline-cache
//! round trips, the `?building=` URL contract, and the remote-then-cache
//! fallback applied after a single load attempt.
//!
//! ERROR HANDLING
//! ==============
//! `PersistError` keeps "not found" distinct from transport failures so callers
//! can word their notices differently. Cache writes are best effort: a failed
//! write is logged and the load still succeeds.

#[cfg(test)]
#[path = "persist_test.rs"]
mod persist_test;

use std::collections::HashMap;

use tracing::{info, warn};

use crate::consts::{CACHE_KEY_PREFIX, DEMO_BUILDING_ID, DRAFT_KEY, WELCOME_KEY};
use crate::doc::Building;
use crate::error::DocumentError;
use crate::slug::{is_valid_building_id, sanitize_building_id};

/// Errors surfaced by persistence operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PersistError {
    #[error("invalid building id: {0}")]
    InvalidId(String),
    #[error("invalid building data: {0}")]
    Validation(String),
    #[error("Building not found")]
    NotFound(String),
    #[error("network error: {0}")]
    Transport(String),
    #[error("server error ({status}): {message}")]
    Server { status: u16, message: String },
    #[error("local storage error: {0}")]
    Storage(String),
}

impl From<DocumentError> for PersistError {
    fn from(e: DocumentError) -> Self {
        Self::Validation(e.to_string())
    }
}

// =============================================================================
// LOCAL STORAGE
// =============================================================================

/// String key-value storage local to one client.
pub trait LocalStorage {
    fn get(&self, key: &str) -> Option<String>;

    /// # Errors
    ///
    /// Returns `PersistError::Storage` when the value cannot be written.
    fn set(&mut self, key: &str, value: &str) -> Result<(), PersistError>;

    fn remove(&mut self, key: &str);
}

/// In-memory storage for tests and short-lived sessions.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl LocalStorage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PersistError> {
        self.entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&mut self, key: &str) {
        self.entries.remove(key);
    }
}

/// Offline-cache key for a building id.
#[must_use]
pub fn cache_key(building_id: &str) -> String {
    format!("{CACHE_KEY_PREFIX}{building_id}")
}

// =============================================================================
// DRAFT / CACHE / WELCOME
// =============================================================================

/// Write the editor draft.
///
/// # Errors
///
/// Returns `Validation` if the document cannot be serialized and `Storage` if
/// the write fails.
pub fn save_draft(storage: &mut dyn LocalStorage, building: &Building) -> Result<(), PersistError> {
    storage.set(DRAFT_KEY, &building.to_json()?)
}

/// Read the editor draft, if one exists.
///
/// # Errors
///
/// Returns `Validation` when a draft exists but does not parse.
pub fn load_draft(storage: &dyn LocalStorage) -> Result<Option<Building>, PersistError> {
    match storage.get(DRAFT_KEY) {
        Some(raw) => Ok(Some(Building::from_draft_json(&raw)?)),
        None => Ok(None),
    }
}

/// Store a copy of a loaded or saved building for offline use. Best effort.
///
/// The entry is keyed by the id it was requested or saved under, not the
/// document's own `buildingId`, so `cached_building` finds it again.
pub fn cache_building(storage: &mut dyn LocalStorage, building_id: &str, building: &Building) {
    let json = match building.to_json() {
        Ok(json) => json,
        Err(e) => {
            warn!(building_id, error = %e, "failed to serialize building for cache");
            return;
        }
    };
    if let Err(e) = storage.set(&cache_key(building_id), &json) {
        warn!(building_id, error = %e, "failed to cache building");
    }
}

/// The cached copy of a building, if present and parseable.
#[must_use]
pub fn cached_building(storage: &dyn LocalStorage, building_id: &str) -> Option<Building> {
    let raw = storage.get(&cache_key(building_id))?;
    match Building::from_json(&raw) {
        Ok(building) => Some(building),
        Err(e) => {
            warn!(building_id, error = %e, "discarding unreadable cached building");
            None
        }
    }
}

#[must_use]
pub fn welcome_dismissed(storage: &dyn LocalStorage) -> bool {
    storage.get(WELCOME_KEY).is_some_and(|v| v == "true")
}

/// # Errors
///
/// Returns `Storage` if the flag cannot be written.
pub fn dismiss_welcome(storage: &mut dyn LocalStorage) -> Result<(), PersistError> {
    storage.set(WELCOME_KEY, "true")
}

// =============================================================================
// URL CONTRACT
// =============================================================================

/// What a viewer or editor should load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadTarget {
    /// The bundled demo document.
    Demo,
    /// A stored building by sanitized id.
    Remote(String),
}

impl LoadTarget {
    /// Classify a raw id (sanitized first).
    ///
    /// # Errors
    ///
    /// Returns `InvalidId` when nothing usable remains after sanitizing.
    pub fn from_id(raw: &str) -> Result<Self, PersistError> {
        let id = sanitize_building_id(raw);
        if id == DEMO_BUILDING_ID {
            return Ok(Self::Demo);
        }
        if !is_valid_building_id(&id) {
            return Err(PersistError::InvalidId(raw.to_owned()));
        }
        Ok(Self::Remote(id))
    }

    /// Read the `building` parameter of a URL query string (with or without `?`).
    ///
    /// # Errors
    ///
    /// Returns `InvalidId` when the parameter is missing or unusable.
    pub fn from_query(query: &str) -> Result<Self, PersistError> {
        let raw = query
            .trim_start_matches('?')
            .split('&')
            .filter_map(|pair| pair.split_once('='))
            .find_map(|(key, value)| (key == "building").then_some(value))
            .filter(|value| !value.is_empty())
            .ok_or_else(|| PersistError::InvalidId("No building ID provided in URL".into()))?;
        Self::from_id(raw)
    }

    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::Demo => DEMO_BUILDING_ID,
            Self::Remote(id) => id,
        }
    }
}

/// Shareable viewer link for a building.
#[must_use]
pub fn viewer_url(origin: &str, building_id: &str) -> String {
    format!(
        "{}/viewer.html?building={}",
        origin.trim_end_matches('/'),
        sanitize_building_id(building_id)
    )
}

// =============================================================================
// LOAD FALLBACK
// =============================================================================

/// Where a loaded document came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadSource {
    Remote,
    Cache,
    Demo,
}

/// Apply the offline fallback to the outcome of one remote load attempt.
///
/// On success the document is cached and returned. On failure the cached copy
/// is returned when one exists; otherwise the original error.
///
/// # Errors
///
/// Returns the remote error when there is no usable cached copy.
pub fn resolve_load(
    building_id: &str,
    remote: Result<Building, PersistError>,
    storage: &mut dyn LocalStorage,
) -> Result<(Building, LoadSource), PersistError> {
    match remote {
        Ok(building) => {
            cache_building(storage, building_id, &building);
            Ok((building, LoadSource::Remote))
        }
        Err(e) => {
            warn!(building_id, error = %e, "remote load failed, trying offline cache");
            match cached_building(storage, building_id) {
                Some(building) => {
                    info!(building_id, "loaded from offline cache");
                    Ok((building, LoadSource::Cache))
                }
                None => Err(e),
            }
        }
    }
}
