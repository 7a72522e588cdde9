//! Editor state: one discharge record merged with the enrichment catalog.

use crate::types::{
    DischargeDetail, DischargeField, DischargeRecord, DischargeUpdate, EnrichmentType,
    EnrichmentUpdate, EnrichmentValue, FieldErrors,
};
use crate::validation::{has_enrichment_value, validate_record};

/// The edit form of one discharge record.
///
/// `rows` is aligned with `catalog`: row `i` holds the value of catalog
/// type `i`, so every type is represented exactly once.
#[derive(Clone, Debug, PartialEq)]
pub struct EditorForm {
    record: DischargeRecord,
    catalog: Vec<EnrichmentType>,
    rows: Vec<EnrichmentValue>,
    errors: FieldErrors,
}

impl EditorForm {
    /// Merge a fetched record with the full catalog.
    ///
    /// Catalog types without a stored value get an empty placeholder;
    /// stored values of types missing from the catalog are dropped.
    pub fn merge(catalog: Vec<EnrichmentType>, detail: DischargeDetail) -> Self {
        let DischargeDetail {
            discharge_data: record,
            enrichment_data: mut existing,
        } = detail;

        let rows = catalog
            .iter()
            .map(|etype| {
                match existing
                    .iter()
                    .position(|v| v.enrichment_type_id == etype.enrichment_type_id)
                {
                    Some(idx) => {
                        let mut value = existing.swap_remove(idx);
                        value.type_name.get_or_insert_with(|| etype.type_name.clone());
                        value.description.get_or_insert_with(|| etype.description.clone());
                        value
                    }
                    None => EnrichmentValue::placeholder(&record.temp_discharge_id, etype),
                }
            })
            .collect();

        Self {
            record,
            catalog,
            rows,
            errors: FieldErrors::new(),
        }
    }

    pub fn record(&self) -> &DischargeRecord {
        &self.record
    }

    /// Catalog types paired with their current values.
    pub fn enrichment_rows(&self) -> impl Iterator<Item = (&EnrichmentType, &EnrichmentValue)> {
        self.catalog.iter().zip(self.rows.iter())
    }

    /// Update a top-level record field.
    pub fn set_field(&mut self, field: DischargeField, value: String) {
        self.record.set_field(field, value);
    }

    /// Update the enrichment value of one type. Unknown types are ignored.
    pub fn set_enrichment(&mut self, enrichment_type_id: &str, value: String) -> bool {
        match self
            .rows
            .iter_mut()
            .find(|r| r.enrichment_type_id == enrichment_type_id)
        {
            Some(row) => {
                row.enrichment_value = Some(value);
                true
            }
            None => false,
        }
    }

    pub fn enrichment_value(&self, enrichment_type_id: &str) -> &str {
        self.rows
            .iter()
            .find(|r| r.enrichment_type_id == enrichment_type_id)
            .map(EnrichmentValue::value)
            .unwrap_or("")
    }

    /// Run validation, remember the errors, and report whether the form is valid.
    pub fn validate(&mut self) -> bool {
        self.errors = validate_record(&self.record, &self.catalog, &self.rows);
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn error(&self, key: &str) -> Option<&str> {
        self.errors.get(key).map(String::as_str)
    }

    /// Body of the update request: the record plus every set enrichment value.
    pub fn payload(&self) -> DischargeUpdate {
        DischargeUpdate {
            discharge_data: self.record.clone(),
            enrichment_data: self
                .rows
                .iter()
                .filter(|r| has_enrichment_value(r.value()))
                .map(|r| EnrichmentUpdate {
                    enrichment_type_id: r.enrichment_type_id.clone(),
                    enrichment_value: r.value().to_string(),
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ENRICHMENT_PLACEHOLDER;
    use crate::types::EnrichmentKind;

    fn etype(id: &str, kind: EnrichmentKind) -> EnrichmentType {
        EnrichmentType {
            enrichment_type_id: id.to_string(),
            type_name: format!("Name {}", id),
            description: format!("Describes {}", id),
            kind: Some(kind),
        }
    }

    fn catalog() -> Vec<EnrichmentType> {
        vec![
            etype("A", EnrichmentKind::Text),
            etype("B", EnrichmentKind::Boolean),
            etype("C", EnrichmentKind::Text),
        ]
    }

    fn detail() -> DischargeDetail {
        DischargeDetail {
            discharge_data: DischargeRecord {
                temp_discharge_id: "d1".to_string(),
                name: "Jane Roe".to_string(),
                epic_id: "E100".to_string(),
                date: "03-15-2024".to_string(),
                phone_number: "(555) 123-4567".to_string(),
                ..DischargeRecord::default()
            },
            enrichment_data: vec![EnrichmentValue {
                enrichment_data_id: "e1".to_string(),
                temp_discharge_id: "d1".to_string(),
                enrichment_type_id: "B".to_string(),
                enrichment_value: Some("true".to_string()),
                ..EnrichmentValue::default()
            }],
        }
    }

    #[test]
    fn test_merge_fills_every_catalog_type() {
        let form = EditorForm::merge(catalog(), detail());
        let rows: Vec<_> = form.enrichment_rows().collect();
        assert_eq!(rows.len(), 3);

        let (a_type, a) = rows[0];
        assert_eq!(a_type.enrichment_type_id, "A");
        assert_eq!(a.enrichment_type_id, "A");
        assert_eq!(a.value(), "");
        assert_eq!(a.type_name.as_deref(), Some("Name A"));
        assert_eq!(a.description.as_deref(), Some("Describes A"));
        assert_eq!(a.temp_discharge_id, "d1");

        let (_, b) = rows[1];
        assert_eq!(b.enrichment_data_id, "e1");
        assert_eq!(b.value(), "true");
        assert_eq!(b.type_name.as_deref(), Some("Name B"));

        let (_, c) = rows[2];
        assert_eq!(c.value(), "");
        assert_eq!(c.description.as_deref(), Some("Describes C"));
    }

    #[test]
    fn test_payload_sends_only_set_values() {
        let mut form = EditorForm::merge(catalog(), detail());
        form.set_enrichment("A", "Follow up in two weeks".to_string());
        form.set_enrichment("C", ENRICHMENT_PLACEHOLDER.to_string());

        let payload = form.payload();
        assert_eq!(payload.enrichment_data.len(), 2);
        assert_eq!(payload.enrichment_data[0].enrichment_type_id, "A");
        assert_eq!(payload.enrichment_data[1].enrichment_value, "true");

        let json = serde_json::to_value(&payload).unwrap();
        assert!(json.get("dischargeData").is_some());
        assert_eq!(json["enrichmentData"][1]["enrichment_type_id"], "B");
    }

    #[test]
    fn test_cleared_hospital_is_sent() {
        let mut with_hospital = detail();
        with_hospital.discharge_data.hospital_name = Some("General".to_string());
        let mut form = EditorForm::merge(catalog(), with_hospital);

        form.set_field(DischargeField::HospitalName, String::new());
        let json = serde_json::to_value(form.payload()).unwrap();
        assert_eq!(json["dischargeData"]["hospital_name"], "");
    }

    #[test]
    fn test_untouched_null_hospital_round_trips() {
        let form = EditorForm::merge(catalog(), detail());
        let json = serde_json::to_value(form.payload()).unwrap();
        let discharge = json["dischargeData"].as_object().unwrap();
        assert!(discharge.contains_key("hospital_name"));
        assert!(discharge["hospital_name"].is_null());
    }

    #[test]
    fn test_edit_paths_are_separate() {
        let mut form = EditorForm::merge(catalog(), detail());
        form.set_field(DischargeField::Insurance, "Acme".to_string());
        assert!(form.set_enrichment("B", "false".to_string()));
        assert!(!form.set_enrichment("Z", "x".to_string()));

        assert_eq!(form.record().insurance, "Acme");
        assert_eq!(form.enrichment_value("B"), "false");
        assert_eq!(form.enrichment_value("A"), "");
    }

    #[test]
    fn test_validate_reports_and_blocks() {
        let mut form = EditorForm::merge(catalog(), detail());
        form.set_field(DischargeField::Date, "02-30-2024".to_string());
        form.set_enrichment("B", "maybe".to_string());

        assert!(!form.validate());
        assert_eq!(form.error("date"), Some("Invalid date."));
        assert_eq!(form.error("enrichment_B"), Some("Name B must be true or false."));

        form.set_field(DischargeField::Date, "02-29-2024".to_string());
        form.set_enrichment("B", "true".to_string());
        assert!(form.validate());
        assert!(form.errors().is_empty());
    }

    #[test]
    fn test_reopening_unchanged_form_is_clean() {
        let mut first = EditorForm::merge(catalog(), detail());
        assert!(first.validate());

        // Simulate a save and a fresh load of the same data
        let mut reopened = EditorForm::merge(catalog(), detail());
        assert!(reopened.validate());
        assert_eq!(first.errors(), reopened.errors());
        assert_eq!(first.payload(), reopened.payload());
    }
}
