//! The bundled demo building served under the reserved id `sample`.

#[cfg(test)]
#[path = "demo_test.rs"]
mod demo_test;

use crate::doc::Building;
use crate::error::DocumentError;

/// Raw JSON of the demo document, shared with the server's static assets.
pub const DEMO_BUILDING_JSON: &str = include_str!("../../public/data/demo-building.json");

/// Parse the bundled demo document.
///
/// # Errors
///
/// Returns `DocumentError` if the bundled asset fails validation.
pub fn demo_building() -> Result<Building, DocumentError> {
    Building::from_json(DEMO_BUILDING_JSON)
}
