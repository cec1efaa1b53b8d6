//! Building service: validate, stamp, store and list building documents.
//!
//! DESIGN
//! ======
//! Documents are stored under `building:{id}` as the exact JSON text the
//! server produced after stamping, so a later `GET` returns them verbatim.
//! The service touches only the top-level `buildingId`, `createdAt` and
//! `updatedAt` fields; everything else in the body is kept as sent, including
//! fields this server does not know about.
//!
//! ERROR HANDLING
//! ==============
//! Bad ids and bad bodies are rejected before any storage I/O. Storage errors
//! are logged here and propagated as `BuildingError::Store`.

#[cfg(test)]
#[path = "building_test.rs"]
mod building_test;

use floorplan::doc::{check_required_fields, now_iso};
use floorplan::slug::is_valid_building_id;
use serde::Serialize;
use serde_json::Value;
use tracing::{error, info};

use super::store::{BuildingStore, EntryMeta, StoreError};

/// Key prefix for stored building documents.
pub const KEY_PREFIX: &str = "building:";

/// Listing name used when a stored entry carries no name.
pub const UNKNOWN_NAME: &str = "Unknown";

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum BuildingError {
    #[error("invalid building id: {0:?}")]
    InvalidId(String),
    #[error("invalid building data: {0}")]
    InvalidData(String),
    #[error("building not found: {0}")]
    NotFound(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// One row of `GET /api/buildings`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildingSummary {
    pub building_id: String,
    pub name: String,
    pub updated_at: Option<String>,
}

#[must_use]
pub fn storage_key(building_id: &str) -> String {
    format!("{KEY_PREFIX}{building_id}")
}

fn check_id(building_id: &str) -> Result<(), BuildingError> {
    if is_valid_building_id(building_id) {
        Ok(())
    } else {
        Err(BuildingError::InvalidId(building_id.to_owned()))
    }
}

// =============================================================================
// SAVE / LOAD / LIST
// =============================================================================

/// Validate and store a building document posted as raw JSON text.
///
/// Sets `buildingId` from the path, stamps `updatedAt`, fills `createdAt`
/// when it is missing or empty, and returns the stamped document.
///
/// # Errors
///
/// `InvalidId` for a malformed id, `InvalidData` when the body is not JSON or
/// lacks `version`, `name` or `floors`, `Store` when the write fails.
pub async fn save_building(store: &dyn BuildingStore, building_id: &str, body: &[u8]) -> Result<Value, BuildingError> {
    check_id(building_id)?;

    let mut document: Value =
        serde_json::from_slice(body).map_err(|e| BuildingError::InvalidData(e.to_string()))?;
    check_required_fields(&document).map_err(|e| BuildingError::InvalidData(e.to_string()))?;

    let now = now_iso();
    let name = document.get("name").and_then(Value::as_str).map(str::to_owned);
    if let Some(fields) = document.as_object_mut() {
        fields.insert("buildingId".into(), Value::String(building_id.to_owned()));
        fields.insert("updatedAt".into(), Value::String(now.clone()));
        let has_created = fields
            .get("createdAt")
            .and_then(Value::as_str)
            .is_some_and(|s| !s.is_empty());
        if !has_created {
            fields.insert("createdAt".into(), Value::String(now.clone()));
        }
    }

    let text = serde_json::to_string(&document).map_err(|e| BuildingError::InvalidData(e.to_string()))?;
    let metadata = EntryMeta { name, updated_at: Some(now) };
    store
        .put(&storage_key(building_id), text, metadata)
        .await
        .inspect_err(|e| error!(%building_id, error = %e, "save building failed"))?;

    info!(%building_id, "building saved");
    Ok(document)
}

/// Fetch the stored document text for `building_id`.
///
/// # Errors
///
/// `InvalidId` for a malformed id, `NotFound` when nothing is stored,
/// `Store` when the read fails.
pub async fn load_building(store: &dyn BuildingStore, building_id: &str) -> Result<String, BuildingError> {
    check_id(building_id)?;

    store
        .get(&storage_key(building_id))
        .await
        .inspect_err(|e| error!(%building_id, error = %e, "load building failed"))?
        .ok_or_else(|| BuildingError::NotFound(building_id.to_owned()))
}

/// Summaries of every stored building, from metadata only.
///
/// # Errors
///
/// `Store` when the listing fails.
pub async fn list_buildings(store: &dyn BuildingStore) -> Result<Vec<BuildingSummary>, BuildingError> {
    let keys = store
        .list(KEY_PREFIX)
        .await
        .inspect_err(|e| error!(error = %e, "list buildings failed"))?;

    Ok(keys
        .into_iter()
        .map(|listed| {
            let building_id = listed.key.strip_prefix(KEY_PREFIX).unwrap_or(&listed.key).to_owned();
            let name = listed
                .metadata
                .name
                .filter(|n| !n.is_empty())
                .unwrap_or_else(|| UNKNOWN_NAME.to_owned());
            let updated_at = listed.metadata.updated_at.filter(|u| !u.is_empty());
            BuildingSummary { building_id, name, updated_at }
        })
        .collect())
}
