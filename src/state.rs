//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor. It
//! holds the building store behind a trait object so the memory and
//! `PostgreSQL` backends are interchangeable at startup.

use std::sync::Arc;

use crate::services::store::BuildingStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn BuildingStore>,
}

impl AppState {
    #[must_use]
    pub fn new(store: Arc<dyn BuildingStore>) -> Self {
        Self { store }
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================
