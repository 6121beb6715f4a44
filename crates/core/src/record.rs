//! Patient domain types.
//!
//! - [`PatientDetails`] is a payload that passed validation and is ready to be flattened.
//! - [`PatientColumns`] is the flat storage shape, with nested values already JSON-encoded.
//! - [`PatientRecord`] is a stored row with its JSON columns decoded back into typed values.

use crate::codec;
use crate::error::{PatientResult, ValidationError};
use crate::text::RequiredText;
use api_shared::{AdditionalFields, Address, PatientRow};
use std::fmt;
use std::str::FromStr;

/// Storage-assigned patient identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PatientId(i64);

impl PatientId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn get(self) -> i64 {
        self.0
    }

    /// Parses a path segment into an identifier.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::InvalidPatientId` carrying the raw input if it is not an integer.
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        raw.trim()
            .parse::<i64>()
            .map(Self)
            .map_err(|_| ValidationError::InvalidPatientId(raw.to_string()))
    }
}

impl FromStr for PatientId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for PatientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Primary and secondary contact numbers.
///
/// Stored as a JSON array: primary first, then secondary, omitting absent numbers.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PhoneNumbers {
    pub primary: Option<String>,
    pub secondary: Option<String>,
}

impl PhoneNumbers {
    /// Builds from payload fields, dropping blank numbers.
    pub fn from_fields(primary: Option<&str>, secondary: Option<&str>) -> Self {
        let keep = |n: Option<&str>| {
            n.map(str::trim)
                .filter(|n| !n.is_empty())
                .map(str::to_string)
        };
        Self {
            primary: keep(primary),
            secondary: keep(secondary),
        }
    }

    /// Numbers in storage order.
    pub fn to_list(&self) -> Vec<String> {
        self.primary
            .iter()
            .chain(self.secondary.iter())
            .cloned()
            .collect()
    }

    pub fn from_list(list: Vec<String>) -> Self {
        let mut numbers = list.into_iter();
        Self {
            primary: numbers.next(),
            secondary: numbers.next(),
        }
    }
}

/// A validated patient, ready to persist.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PatientDetails {
    pub first_name: RequiredText,
    pub middle_name: String,
    pub last_name: RequiredText,
    pub date_of_birth: RequiredText,
    pub status: RequiredText,
    pub addresses: Vec<Address>,
    pub phone_numbers: PhoneNumbers,
    pub additional_fields: AdditionalFields,
}

impl PatientDetails {
    /// Flattens nested values into their JSON column representation.
    ///
    /// # Errors
    ///
    /// Returns `PatientError::Serialization` if a nested value cannot be encoded.
    pub fn to_columns(&self) -> PatientResult<PatientColumns> {
        Ok(PatientColumns {
            first_name: self.first_name.as_str().to_string(),
            middle_name: self.middle_name.clone(),
            last_name: self.last_name.as_str().to_string(),
            date_of_birth: self.date_of_birth.as_str().to_string(),
            status: self.status.as_str().to_string(),
            addresses: codec::encode_addresses(&self.addresses)?,
            phone_numbers: codec::encode_phone_numbers(&self.phone_numbers)?,
            additional_fields: codec::encode_additional_fields(&self.additional_fields)?,
        })
    }
}

/// Every mutable column of the `patients` table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PatientColumns {
    pub first_name: String,
    pub middle_name: String,
    pub last_name: String,
    pub date_of_birth: String,
    pub status: String,
    pub addresses: String,
    pub phone_numbers: String,
    pub additional_fields: String,
}

/// A stored patient with its JSON columns decoded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PatientRecord {
    pub id: PatientId,
    pub first_name: String,
    pub middle_name: String,
    pub last_name: String,
    pub date_of_birth: String,
    pub status: String,
    pub addresses: Vec<Address>,
    pub phone_numbers: PhoneNumbers,
    pub additional_fields: AdditionalFields,
}

impl PatientRecord {
    /// Decodes a raw row.
    ///
    /// # Errors
    ///
    /// Returns `PatientError::Deserialization` if any JSON column is malformed.
    pub fn from_row(row: &PatientRow) -> PatientResult<Self> {
        Ok(Self {
            id: PatientId::new(row.id),
            first_name: row.first_name.clone(),
            middle_name: row.middle_name.clone(),
            last_name: row.last_name.clone(),
            date_of_birth: row.date_of_birth.clone(),
            status: row.status.clone(),
            addresses: codec::decode_addresses(&row.addresses)?,
            phone_numbers: codec::decode_phone_numbers(&row.phone_numbers)?,
            additional_fields: codec::decode_additional_fields(&row.additional_fields)?,
        })
    }

    /// Display name: first, middle (when present), last.
    pub fn full_name(&self) -> String {
        [&self.first_name, &self.middle_name, &self.last_name]
            .iter()
            .filter(|part| !part.is_empty())
            .map(|part| part.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patient_id_parses_integers_only() {
        assert_eq!(PatientId::parse("42").expect("valid id"), PatientId::new(42));
        assert_eq!(
            PatientId::parse("1; DROP TABLE patients"),
            Err(ValidationError::InvalidPatientId(
                "1; DROP TABLE patients".into()
            ))
        );
    }

    #[test]
    fn phone_numbers_skip_blank_entries() {
        let numbers = PhoneNumbers::from_fields(Some(" "), Some("555-0100"));
        assert_eq!(numbers.primary, None);
        assert_eq!(numbers.to_list(), vec!["555-0100".to_string()]);
    }

    #[test]
    fn phone_numbers_list_keeps_primary_first() {
        let numbers = PhoneNumbers::from_fields(Some("652-234-2311"), Some("555-0100"));
        let list = numbers.to_list();
        assert_eq!(list, vec!["652-234-2311", "555-0100"]);
        assert_eq!(PhoneNumbers::from_list(list), numbers);
    }

    #[test]
    fn full_name_skips_empty_middle_name() {
        let row = PatientRow {
            id: 1,
            first_name: "Jane".into(),
            middle_name: "".into(),
            last_name: "Doe".into(),
            date_of_birth: "1992-02-02".into(),
            status: "Active".into(),
            addresses: "[]".into(),
            phone_numbers: "[]".into(),
            additional_fields: "{}".into(),
        };
        let record = PatientRecord::from_row(&row).expect("decode row");
        assert_eq!(record.full_name(), "Jane Doe");
    }
}
