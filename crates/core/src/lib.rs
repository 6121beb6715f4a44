//! # Patients Core
//!
//! Core business logic for the patient records service.
//!
//! This crate contains pure data operations:
//! - Validation and normalisation of patient payloads
//! - JSON encoding of nested values into flat storage columns, and decoding back
//! - The [`PatientStore`] storage seam and its SQLite implementation
//!
//! **No API concerns**: HTTP servers, status codes and routing belong in `api-rest`.

pub mod codec;
pub mod config;
pub mod constants;
pub mod error;
pub mod patient;
pub mod record;
pub mod repositories;
pub mod text;
pub mod validation;

pub use api_shared;
pub use config::CoreConfig;
pub use constants::DEFAULT_DATABASE_PATH;
pub use error::{PatientError, PatientResult, StorageError, StorageResult, ValidationError};
pub use patient::PatientService;
pub use record::{PatientColumns, PatientDetails, PatientId, PatientRecord, PhoneNumbers};
pub use repositories::{PatientStore, SqlitePatientStore};
pub use text::RequiredText;
