//! Domain services used by the HTTP routes.
//!
//! ARCHITECTURE
//! ============
//! Service modules own validation and storage concerns so route handlers can
//! stay focused on protocol translation.

pub mod building;
pub mod store;
