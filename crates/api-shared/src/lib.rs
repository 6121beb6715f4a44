//! # API Shared
//!
//! Shared wire definitions for the patient records APIs.
//!
//! Contains:
//! - Request/response bodies (`types` module)
//! - Shared services like `HealthService`
//!
//! Used by `patients-core`, `api-rest` and the CLI so that every surface agrees on the JSON shape
//! of a patient.

pub mod health;
pub mod types;

pub use health::HealthService;
pub use types::*;
