//! Building persistence routes.
//!
//! Every failure is answered with `{ "success": false, "error": "..." }` and the
//! status chosen by [`building_error_to_status`].

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::http::header::CONTENT_TYPE;
use axum::response::{IntoResponse, Json, Response};
use serde_json::{Value, json};

use crate::services::building::{self, BuildingError};
use crate::state::AppState;

#[cfg(test)]
#[path = "buildings_test.rs"]
mod tests;

const SAVE_INVALID_ID: &str = "Invalid building ID. Use lowercase alphanumeric characters and hyphens only.";
const LOAD_INVALID_ID: &str = "Invalid building ID";
const INVALID_DATA: &str = "Invalid building data. Must include version, name, and floors.";
const NOT_FOUND: &str = "Building not found";
const SAVED: &str = "Building saved successfully";

#[derive(Debug, Clone, Copy)]
enum Operation {
    Save,
    Load,
    List,
}

impl Operation {
    fn invalid_id_message(self) -> &'static str {
        match self {
            Self::Save => SAVE_INVALID_ID,
            Self::Load | Self::List => LOAD_INVALID_ID,
        }
    }

    fn failure_prefix(self) -> &'static str {
        match self {
            Self::Save => "Failed to save building",
            Self::Load => "Failed to load building",
            Self::List => "Failed to list buildings",
        }
    }
}

/// Error response body for the building API.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn new(operation: Operation, err: BuildingError) -> Self {
        let message = match &err {
            BuildingError::InvalidId(_) => operation.invalid_id_message().to_owned(),
            BuildingError::InvalidData(_) => INVALID_DATA.to_owned(),
            BuildingError::NotFound(_) => NOT_FOUND.to_owned(),
            BuildingError::Store(e) => format!("{}: {e}", operation.failure_prefix()),
        };
        Self { status: building_error_to_status(&err), message }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "success": false, "error": self.message }))).into_response()
    }
}

pub(crate) fn building_error_to_status(err: &BuildingError) -> StatusCode {
    match err {
        BuildingError::InvalidId(_) | BuildingError::InvalidData(_) => StatusCode::BAD_REQUEST,
        BuildingError::NotFound(_) => StatusCode::NOT_FOUND,
        BuildingError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// `POST /api/buildings/:id`: validate, stamp and store a building document.
pub async fn save_building(
    State(state): State<AppState>,
    Path(building_id): Path<String>,
    body: Bytes,
) -> Result<Json<Value>, ApiError> {
    building::save_building(state.store.as_ref(), &building_id, &body)
        .await
        .map_err(|e| ApiError::new(Operation::Save, e))?;

    Ok(Json(json!({
        "success": true,
        "buildingId": building_id,
        "message": SAVED,
    })))
}

/// `GET /api/buildings/:id`: the stored document, verbatim.
pub async fn get_building(
    State(state): State<AppState>,
    Path(building_id): Path<String>,
) -> Result<Response, ApiError> {
    let raw = building::load_building(state.store.as_ref(), &building_id)
        .await
        .map_err(|e| ApiError::new(Operation::Load, e))?;

    Ok(([(CONTENT_TYPE, "application/json")], raw).into_response())
}

/// `GET /api/buildings`: id, name and last update of every stored building.
pub async fn list_buildings(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let buildings = building::list_buildings(state.store.as_ref())
        .await
        .map_err(|e| ApiError::new(Operation::List, e))?;

    Ok(Json(json!({
        "success": true,
        "count": buildings.len(),
        "buildings": buildings,
    })))
}
