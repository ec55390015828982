//! Test fixtures for route-engine.
//!
//! Provides realistic test data including:
//! - Real Portland, OR locations (from OpenStreetMap)
//! - Canned directions-service replies

pub mod portland_locations;
pub mod replies;

pub use portland_locations::*;
