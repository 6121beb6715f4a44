//! JSON encode/decode helpers for the nested patient columns.
//!
//! `addresses`, `phone_numbers` and `additional_fields` are stored as JSON text. Empty column text
//! (legacy rows) decodes to the empty value rather than failing.

use crate::error::{PatientError, PatientResult};
use crate::record::PhoneNumbers;
use api_shared::{AdditionalFields, Address};
use serde::de::DeserializeOwned;

pub fn encode_addresses(addresses: &[Address]) -> PatientResult<String> {
    serde_json::to_string(addresses).map_err(PatientError::Serialization)
}

pub fn encode_phone_numbers(numbers: &PhoneNumbers) -> PatientResult<String> {
    serde_json::to_string(&numbers.to_list()).map_err(PatientError::Serialization)
}

pub fn encode_additional_fields(fields: &AdditionalFields) -> PatientResult<String> {
    serde_json::to_string(fields).map_err(PatientError::Serialization)
}

pub fn decode_addresses(raw: &str) -> PatientResult<Vec<Address>> {
    decode_or_default(raw)
}

pub fn decode_phone_numbers(raw: &str) -> PatientResult<PhoneNumbers> {
    decode_or_default::<Vec<String>>(raw).map(PhoneNumbers::from_list)
}

pub fn decode_additional_fields(raw: &str) -> PatientResult<AdditionalFields> {
    decode_or_default(raw)
}

fn decode_or_default<T>(raw: &str) -> PatientResult<T>
where
    T: DeserializeOwned + Default,
{
    let raw = raw.trim();
    if raw.is_empty() || raw == "null" {
        return Ok(T::default());
    }
    serde_json::from_str(raw).map_err(PatientError::Deserialization)
}
