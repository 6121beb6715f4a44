//! Patient service.
//!
//! Wires validation, column encoding and the injected [`PatientStore`] together. Contains no HTTP
//! concerns: callers decide how errors become responses.

use crate::error::PatientResult;
use crate::record::PatientId;
use crate::repositories::PatientStore;
use crate::validation::{validate_new_patient, validate_patient_update};
use api_shared::{PatientPayload, PatientRow};
use std::sync::Arc;

/// Pure patient data operations - no API concerns
#[derive(Clone)]
pub struct PatientService {
    store: Arc<dyn PatientStore>,
}

impl PatientService {
    /// Creates a service over the given store.
    pub fn new(store: Arc<dyn PatientStore>) -> Self {
        Self { store }
    }

    /// Lists every stored patient row, JSON columns left encoded.
    ///
    /// # Errors
    ///
    /// Returns `PatientError::Storage` if the read fails.
    pub async fn list_patients(&self) -> PatientResult<Vec<PatientRow>> {
        Ok(self.store.list().await?)
    }

    /// Validates and inserts a new patient.
    ///
    /// # Returns
    ///
    /// The storage-assigned identifier.
    ///
    /// # Errors
    ///
    /// Returns a `PatientError` if:
    /// - the payload fails validation (storage is not touched),
    /// - a nested value cannot be encoded,
    /// - the insert fails.
    pub async fn create_patient(&self, payload: &PatientPayload) -> PatientResult<PatientId> {
        let details = validate_new_patient(payload)?;
        let columns = details.to_columns()?;

        let id = self.store.insert(columns).await?;
        tracing::info!(patient_id = %id, "created patient");
        Ok(id)
    }

    /// Validates and replaces every mutable column of `id`.
    ///
    /// Addresses and additional fields are replaced wholesale. Updating an id that does not
    /// exist is not an error; it is logged and reported as success.
    ///
    /// # Errors
    ///
    /// Returns a `PatientError` if:
    /// - the payload fails validation (storage is not touched),
    /// - a nested value cannot be encoded,
    /// - the update fails.
    pub async fn update_patient(
        &self,
        id: PatientId,
        payload: &PatientPayload,
    ) -> PatientResult<()> {
        let details = validate_patient_update(payload)?;
        let columns = details.to_columns()?;

        let changed = self.store.update(id, columns).await?;
        if changed == 0 {
            tracing::warn!(patient_id = %id, "update matched no patient");
        } else {
            tracing::info!(patient_id = %id, "updated patient");
        }
        Ok(())
    }

    /// Hard-deletes `id`. Deleting an id that does not exist is logged and reported as success.
    ///
    /// # Errors
    ///
    /// Returns `PatientError::Storage` if the delete fails.
    pub async fn delete_patient(&self, id: PatientId) -> PatientResult<()> {
        let changed = self.store.delete(id).await?;
        if changed == 0 {
            tracing::warn!(patient_id = %id, "delete matched no patient");
        } else {
            tracing::info!(patient_id = %id, "deleted patient");
        }
        Ok(())
    }
}
