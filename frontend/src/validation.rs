//! Client-side validation of discharge records and enrichment values.
//!
//! Every check returns `Ok(())` or the message shown under the offending
//! field. [`validate_record`] gathers all violations of a form into a
//! field → message map so the editor can render them inline.
//!
//! # Rules
//!
//! - `date` is required, strictly `MM-DD-YYYY`, and a real calendar day
//! - `phone_number` is optional but needs at least six digits when given
//! - `name` and `epic_id` are required
//! - boolean enrichment values are `"true"` or `"false"`
//! - text enrichment values are at most 255 characters

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::{ENRICHMENT_PLACEHOLDER, MAX_ENRICHMENT_TEXT_LEN, MIN_PHONE_DIGITS};
use crate::types::{
    DischargeField, DischargeRecord, EnrichmentKind, EnrichmentType, EnrichmentValue, FieldErrors,
};

static DATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(0[1-9]|1[0-2])-(0[1-9]|[12]\d|3[01])-(\d{4})$").expect("valid date regex")
});

/// Validate a `MM-DD-YYYY` date string.
///
/// # Example
/// ```
/// use discharge_review::validation::validate_date;
///
/// assert!(validate_date("02-29-2024").is_ok());
/// assert!(validate_date("02-29-2023").is_err());
/// ```
pub fn validate_date(value: &str) -> Result<(), String> {
    if value.is_empty() {
        return Err("Date is required.".to_string());
    }

    let caps = DATE_RE
        .captures(value)
        .ok_or_else(|| "Date must be in MM-DD-YYYY format.".to_string())?;

    let month: u32 = caps[1].parse().unwrap_or(0);
    let day: u32 = caps[2].parse().unwrap_or(0);
    let year: i32 = caps[3].parse().unwrap_or(0);

    NaiveDate::from_ymd_opt(year, month, day)
        .map(|_| ())
        .ok_or_else(|| "Invalid date.".to_string())
}

/// Validate an optional phone number by its digit count.
pub fn validate_phone(value: &str) -> Result<(), String> {
    if value.is_empty() {
        return Ok(());
    }

    let digits = value.chars().filter(|c| c.is_ascii_digit()).count();
    if digits < MIN_PHONE_DIGITS {
        return Err(format!(
            "Phone number must contain at least {} digits if provided.",
            MIN_PHONE_DIGITS
        ));
    }
    Ok(())
}

/// Validate a required field.
pub fn validate_required(field: DischargeField, value: &str) -> Result<(), String> {
    if value.is_empty() {
        return Err(format!("{} is required.", field.label()));
    }
    Ok(())
}

/// True when an enrichment value carries user input.
///
/// Empty strings and the select placeholder mean "not set".
pub fn has_enrichment_value(value: &str) -> bool {
    !value.is_empty() && value != ENRICHMENT_PLACEHOLDER
}

/// Validate one enrichment value against its type.
///
/// Unset values are always accepted.
pub fn validate_enrichment(etype: &EnrichmentType, value: &str) -> Result<(), String> {
    if !has_enrichment_value(value) {
        return Ok(());
    }

    match etype.kind() {
        EnrichmentKind::Boolean => {
            if value != "true" && value != "false" {
                return Err(format!("{} must be true or false.", etype.type_name));
            }
        }
        EnrichmentKind::Text => {
            if value.chars().count() > MAX_ENRICHMENT_TEXT_LEN {
                return Err(format!(
                    "{} must be at most {} characters.",
                    etype.type_name, MAX_ENRICHMENT_TEXT_LEN
                ));
            }
        }
    }
    Ok(())
}

/// Error key of an enrichment row.
pub fn enrichment_error_key(enrichment_type_id: &str) -> String {
    format!("enrichment_{}", enrichment_type_id)
}

/// Validate a whole edit form.
///
/// Returns every violation; an empty map means the form may be submitted.
pub fn validate_record(
    record: &DischargeRecord,
    catalog: &[EnrichmentType],
    enrichment: &[EnrichmentValue],
) -> FieldErrors {
    let mut errors = FieldErrors::new();

    if let Err(msg) = validate_date(&record.date) {
        errors.insert(DischargeField::Date.key().to_string(), msg);
    }
    if let Err(msg) = validate_phone(&record.phone_number) {
        errors.insert(DischargeField::PhoneNumber.key().to_string(), msg);
    }
    for field in [DischargeField::Name, DischargeField::EpicId] {
        if let Err(msg) = validate_required(field, record.field(field)) {
            errors.insert(field.key().to_string(), msg);
        }
    }

    for etype in catalog {
        let Some(row) = enrichment
            .iter()
            .find(|e| e.enrichment_type_id == etype.enrichment_type_id)
        else {
            continue;
        };
        if let Err(msg) = validate_enrichment(etype, row.value()) {
            errors.insert(enrichment_error_key(&etype.enrichment_type_id), msg);
        }
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    fn etype(id: &str, kind: EnrichmentKind) -> EnrichmentType {
        EnrichmentType {
            enrichment_type_id: id.to_string(),
            type_name: format!("Type {}", id),
            description: String::new(),
            kind: Some(kind),
        }
    }

    fn valid_record() -> DischargeRecord {
        DischargeRecord {
            temp_discharge_id: "d1".to_string(),
            name: "Jane Roe".to_string(),
            epic_id: "E100".to_string(),
            date: "03-15-2024".to_string(),
            ..DischargeRecord::default()
        }
    }

    #[test]
    fn test_date_leap_years() {
        assert_eq!(validate_date("02-29-2023"), Err("Invalid date.".to_string()));
        assert!(validate_date("02-29-2024").is_ok());
        assert_eq!(validate_date("02-30-2024"), Err("Invalid date.".to_string()));
    }

    #[test]
    fn test_date_format() {
        assert_eq!(
            validate_date("13-01-2024"),
            Err("Date must be in MM-DD-YYYY format.".to_string())
        );
        assert!(validate_date("2024-03-01").is_err());
        assert!(validate_date("3-1-2024").is_err());
        assert!(validate_date("03-01-2024 ").is_err());
        assert_eq!(validate_date(""), Err("Date is required.".to_string()));
    }

    #[test]
    fn test_phone() {
        assert!(validate_phone("12345").is_err());
        assert!(validate_phone("(123) 456-7890").is_ok());
        assert!(validate_phone("").is_ok());
        assert!(validate_phone("12-34-56").is_ok());
    }

    #[test]
    fn test_boolean_enrichment() {
        let flag = etype("b", EnrichmentKind::Boolean);
        assert_eq!(
            validate_enrichment(&flag, "maybe"),
            Err("Type b must be true or false.".to_string())
        );
        assert!(validate_enrichment(&flag, "true").is_ok());
        assert!(validate_enrichment(&flag, "false").is_ok());
        assert!(validate_enrichment(&flag, "").is_ok());
        assert!(validate_enrichment(&flag, ENRICHMENT_PLACEHOLDER).is_ok());
    }

    #[test]
    fn test_text_enrichment_length() {
        let notes = etype("t", EnrichmentKind::Text);
        assert!(validate_enrichment(&notes, &"a".repeat(255)).is_ok());
        assert!(validate_enrichment(&notes, &"a".repeat(256)).is_err());
    }

    #[test]
    fn test_record_collects_all_errors() {
        let record = DischargeRecord {
            temp_discharge_id: "d1".to_string(),
            phone_number: "123".to_string(),
            ..DischargeRecord::default()
        };
        let catalog = vec![etype("b", EnrichmentKind::Boolean)];
        let rows = vec![EnrichmentValue {
            enrichment_type_id: "b".to_string(),
            enrichment_value: Some("maybe".to_string()),
            ..EnrichmentValue::default()
        }];

        let errors = validate_record(&record, &catalog, &rows);
        assert_eq!(errors.len(), 5);
        assert_eq!(errors["date"], "Date is required.");
        assert_eq!(errors["name"], "name is required.");
        assert_eq!(errors["epic_id"], "epic id is required.");
        assert!(errors.contains_key("phone_number"));
        assert!(errors.contains_key("enrichment_b"));
    }

    #[test]
    fn test_valid_record_is_idempotent() {
        let record = valid_record();
        let catalog = vec![etype("t", EnrichmentKind::Text)];
        let rows = vec![EnrichmentValue::placeholder("d1", &catalog[0])];

        assert!(validate_record(&record, &catalog, &rows).is_empty());
        assert!(validate_record(&record, &catalog, &rows).is_empty());
    }
}
