//! LifeSaver Match - blood compatibility and nearest-facility matching
//!
//! This library provides the matching engine used by the LifeSaver donation
//! platform: a frozen blood-group compatibility table, donor need
//! recommendations, and approximate-distance ranking of hospitals and blood
//! centers with a city-name fallback.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{compatible_recipients, nearest_facilities, Matcher, STANDARD_TABLE};
pub use crate::models::{BloodGroup, Compatibility, Facility, LocationQuery, RankedFacility};
