//! # API REST
//!
//! REST API implementation for the patient records service.
//!
//! Handles:
//! - HTTP endpoints with axum (`/patients`, `/patients/{id}`, `/health`)
//! - Method guarding with `Allow` headers on unsupported verbs
//! - Mapping core errors to status codes and JSON bodies
//! - OpenAPI/Swagger documentation
//!
//! Uses `patients-core` for all validation and persistence.

#![warn(rust_2018_idioms)]

pub mod body;
pub mod error;
pub mod method_guard;
pub mod patients;
pub mod router;

pub use body::PatientBody;
pub use error::ApiError;
pub use router::{build_router, ApiDoc, AppState};
