/// Structural rule a patient payload failed.
///
/// The display strings are returned verbatim to HTTP clients.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Required fields are missing")]
    MissingRequiredFields,
    #[error("At least one address is required")]
    AddressRequired,
    #[error("Required address fields are missing")]
    AddressFieldsMissing,
    #[error("Keys in additional_fields cannot be empty")]
    EmptyAdditionalFieldKey,
    #[error("Keys in additional_fields must be unique")]
    DuplicateAdditionalFieldKey,
    #[error("Invalid patient id: {0}")]
    InvalidPatientId(String),
}

/// Failure raised by the persistence layer.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("migration failed at version {version}: {reason}")]
    Migration { version: i64, reason: String },
    #[error("database connection unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, thiserror::Error)]
pub enum PatientError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("failed to serialize patient column: {0}")]
    Serialization(serde_json::Error),
    #[error("failed to deserialize patient column: {0}")]
    Deserialization(serde_json::Error),
}

pub type PatientResult<T> = std::result::Result<T, PatientError>;
pub type StorageResult<T> = std::result::Result<T, StorageError>;
