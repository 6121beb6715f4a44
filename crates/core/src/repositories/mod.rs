//! Patient persistence.
//!
//! [`PatientStore`] is the seam between the service and the relational store. Services hold an
//! `Arc<dyn PatientStore>` handed in at construction, so tests can substitute a fake and there is
//! no process-wide handle.

pub mod sqlite;

use crate::error::StorageResult;
use crate::record::{PatientColumns, PatientId};
use api_shared::PatientRow;
use async_trait::async_trait;

pub use sqlite::SqlitePatientStore;

/// Single-table patient storage. Each method issues exactly one statement.
#[async_trait]
pub trait PatientStore: Send + Sync {
    /// Every stored row, ordered by id.
    async fn list(&self) -> StorageResult<Vec<PatientRow>>;

    /// Inserts a row and returns the storage-assigned id.
    async fn insert(&self, columns: PatientColumns) -> StorageResult<PatientId>;

    /// Replaces all mutable columns of `id`. Returns the number of rows affected.
    async fn update(&self, id: PatientId, columns: PatientColumns) -> StorageResult<usize>;

    /// Hard-deletes `id`. Returns the number of rows affected.
    async fn delete(&self, id: PatientId) -> StorageResult<usize>;
}
