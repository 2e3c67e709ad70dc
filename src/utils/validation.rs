//! Validation utilities
//!
//! Field validators for the KYC/statutory formats used across the booking
//! wizard, plus the ordered field -> message error map the wizard guards
//! produce.

use lazy_static::lazy_static;
use regex::Regex;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use validator::ValidationError;

lazy_static! {
    static ref GSTIN_RE: Regex =
        Regex::new(r"^[0-9]{2}[A-Z]{5}[0-9]{4}[A-Z]{1}[1-9A-Z]{1}[Z]{1}[0-9A-Z]{1}$").unwrap();
    static ref MOBILE_RE: Regex = Regex::new(r"^[6-9]\d{9}$").unwrap();
    static ref PAN_RE: Regex = Regex::new(r"^[A-Z]{5}[0-9]{4}[A-Z]{1}$").unwrap();
    static ref AADHAR_RE: Regex = Regex::new(r"^\d{12}$").unwrap();
    static ref PINCODE_RE: Regex = Regex::new(r"^\d{6}$").unwrap();
}

fn pattern_error(code: &'static str, value: &str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.add_param("value".into(), &value.to_string());
    error
}

/// Validate a 15-character GSTIN
pub fn validate_gstin(value: &str) -> Result<(), ValidationError> {
    if !GSTIN_RE.is_match(value) {
        return Err(pattern_error("gstin", value));
    }
    Ok(())
}

/// Validate an Indian mobile number (10 digits, leading 6-9)
pub fn validate_mobile(value: &str) -> Result<(), ValidationError> {
    if !MOBILE_RE.is_match(value) {
        return Err(pattern_error("mobile", value));
    }
    Ok(())
}

/// Validate a PAN card number
pub fn validate_pan(value: &str) -> Result<(), ValidationError> {
    if !PAN_RE.is_match(value) {
        return Err(pattern_error("pan", value));
    }
    Ok(())
}

/// Validate a 12-digit Aadhar number
pub fn validate_aadhar(value: &str) -> Result<(), ValidationError> {
    if !AADHAR_RE.is_match(value) {
        return Err(pattern_error("aadhar", value));
    }
    Ok(())
}

/// Validate a 6-digit pincode
pub fn validate_pincode(value: &str) -> Result<(), ValidationError> {
    if !PINCODE_RE.is_match(value) {
        return Err(pattern_error("pincode", value));
    }
    Ok(())
}

/// Ordered map of field name -> error message.
///
/// Insertion order is preserved so the first invalid field (in form order)
/// can be indicated to the user. Serializes as a JSON object.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FieldErrors {
    entries: Vec<(&'static str, String)>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an error for a field. The first message per field wins.
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        if self.get(field).is_none() {
            self.entries.push((field, message.into()));
        }
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, m)| m.as_str())
    }

    /// First erroring field in form order
    pub fn first(&self) -> Option<(&'static str, &str)> {
        self.entries.first().map(|(f, m)| (*f, m.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> + '_ {
        self.entries.iter().map(|(f, m)| (*f, m.as_str()))
    }

    /// Merge another error map after this one, preserving order
    pub fn extend(&mut self, other: FieldErrors) {
        for (field, message) in other.entries {
            self.add(field, message);
        }
    }
}

impl Serialize for FieldErrors {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (field, message) in &self.entries {
            map.serialize_entry(field, message)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_gstin() {
        assert!(validate_gstin("27AAAAP0267H2ZN").is_ok());
        // Wrong length
        assert!(validate_gstin("27AAAAP0267H2Z").is_err());
        // Wrong pattern
        assert!(validate_gstin("AAAAAA0267H2ZN1").is_err());
    }

    #[test]
    fn test_validate_mobile() {
        assert!(validate_mobile("9876543210").is_ok());
        // Leading digit below 6
        assert!(validate_mobile("1234567890").is_err());
        // Wrong length
        assert!(validate_mobile("98765432").is_err());
    }

    #[test]
    fn test_validate_pan() {
        assert!(validate_pan("ABCDE1234F").is_ok());
        assert!(validate_pan("abcde1234f").is_err());
        assert!(validate_pan("ABCD1234EF").is_err());
    }

    #[test]
    fn test_validate_aadhar() {
        assert!(validate_aadhar("123456789012").is_ok());
        assert!(validate_aadhar("12345678901").is_err());
        assert!(validate_aadhar("12345678901a").is_err());
    }

    #[test]
    fn test_validate_pincode() {
        assert!(validate_pincode("413001").is_ok());
        assert!(validate_pincode("4130011").is_err());
        assert!(validate_pincode("41300").is_err());
    }

    #[test]
    fn test_field_errors_preserve_order() {
        let mut errors = FieldErrors::new();
        errors.add("model_id", "Model is required");
        errors.add("branch", "Branch is required");
        errors.add("model_id", "overwritten message must not win");

        assert_eq!(errors.len(), 2);
        assert_eq!(errors.first(), Some(("model_id", "Model is required")));
        assert_eq!(errors.get("branch"), Some("Branch is required"));
    }

    #[test]
    fn test_field_errors_serialize_as_object() {
        let mut errors = FieldErrors::new();
        errors.add("gstin", "Invalid GSTIN");
        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(json["gstin"], "Invalid GSTIN");
    }
}
