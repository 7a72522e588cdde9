//! Common types used across the frontend application.
//!
//! This module centralizes the wire types of the review API and the
//! application error type.
//!
//! # Categories
//!
//! - **Upload Types** - Import catalog and extraction results
//! - **Listing Types** - Imported file summaries
//! - **Review Types** - Raw file metadata, discharge records, enrichment
//! - **Update Types** - Payload sent by the editor
//! - **Error Types** - Frontend error handling

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::config::LEGACY_BOOLEAN_ENRICHMENT_TYPES;

/// Deserialize a nullable string column as an empty string.
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

// =============================================================================
// Upload Types
// =============================================================================

/// An entry of the import-type catalog offered by the uploader.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ImportType {
    pub id: String,
    pub name: String,
}

/// One discharge row extracted from an uploaded PDF.
///
/// Extraction is best effort, so every field may be missing.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractedRow {
    pub name: Option<String>,
    pub epic_id: Option<String>,
    pub phone_number: Option<String>,
    pub attending_physician: Option<String>,
    pub date: Option<String>,
    pub primary_care_provider: Option<String>,
    pub insurance: Option<String>,
    pub disposition: Option<String>,
    pub hospital: Option<String>,
}

/// Successful response of `POST /upload-pdf`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UploadResponse {
    /// Rows extracted from the PDF
    #[serde(default)]
    pub data: Vec<ExtractedRow>,
    /// Identifier of the stored raw file
    pub raw_data_id: String,
    /// Informational server message
    #[serde(default)]
    pub message: Option<String>,
}

// =============================================================================
// Listing Types
// =============================================================================

/// A row of `GET /raw-data`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ImportedFileSummary {
    pub raw_data_id: String,
    pub source_file_name: String,
    pub created_at: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub type_name: String,
    /// Server-computed review summary ("All records reviewed", ...)
    #[serde(default, deserialize_with = "null_as_empty")]
    pub status: String,
}

// =============================================================================
// Review Types
// =============================================================================

/// Metadata and payload of an imported file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawData {
    pub file_name: String,
    #[serde(default)]
    pub uploaded_by: Option<String>,
    #[serde(default)]
    pub ingest_timestamp: Option<String>,
    /// PDF bytes, hex encoded, optionally prefixed with `\x`
    #[serde(default)]
    pub raw_content: Option<String>,
    #[serde(default)]
    pub import_type: Option<String>,
}

/// Lifecycle status of a discharge record.
///
/// Anything other than `Approved` or `Rejected` (including a null column)
/// is pending. The raw server value is kept so that it round-trips
/// unchanged through the editor.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "Option<String>")]
pub enum DischargeStatus {
    Pending(Option<String>),
    Approved,
    Rejected,
}

impl DischargeStatus {
    /// Label shown to reviewers.
    pub fn label(&self) -> &str {
        match self {
            DischargeStatus::Approved => "Approved",
            DischargeStatus::Rejected => "Rejected",
            DischargeStatus::Pending(Some(raw)) if !raw.is_empty() => raw,
            DischargeStatus::Pending(_) => "Pending",
        }
    }

    pub fn is_approved(&self) -> bool {
        matches!(self, DischargeStatus::Approved)
    }
}

impl Default for DischargeStatus {
    fn default() -> Self {
        DischargeStatus::Pending(None)
    }
}

impl From<Option<String>> for DischargeStatus {
    fn from(raw: Option<String>) -> Self {
        match raw.as_deref() {
            Some("Approved") => DischargeStatus::Approved,
            Some("Rejected") => DischargeStatus::Rejected,
            _ => DischargeStatus::Pending(raw),
        }
    }
}

impl From<DischargeStatus> for Option<String> {
    fn from(status: DischargeStatus) -> Self {
        match status {
            DischargeStatus::Approved => Some("Approved".to_string()),
            DischargeStatus::Rejected => Some("Rejected".to_string()),
            DischargeStatus::Pending(raw) => raw,
        }
    }
}

/// A temporary discharge record awaiting review.
///
/// Columns this client does not model are kept in `extra` and written
/// back untouched on update.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DischargeRecord {
    pub temp_discharge_id: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub epic_id: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub phone_number: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub attending_physician: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub date: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub primary_care_provider: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub insurance: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub disposition: String,
    #[serde(default)]
    pub status: DischargeStatus,
    /// Always serialized: the update endpoint only writes keys it receives
    #[serde(default)]
    pub hospital_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_data_id: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// The top-level record fields the editor exposes, in display order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DischargeField {
    Name,
    EpicId,
    PhoneNumber,
    AttendingPhysician,
    Date,
    PrimaryCareProvider,
    Insurance,
    Disposition,
    HospitalName,
}

impl DischargeField {
    pub const EDITABLE: [DischargeField; 9] = [
        DischargeField::Name,
        DischargeField::EpicId,
        DischargeField::PhoneNumber,
        DischargeField::AttendingPhysician,
        DischargeField::Date,
        DischargeField::PrimaryCareProvider,
        DischargeField::Insurance,
        DischargeField::Disposition,
        DischargeField::HospitalName,
    ];

    /// Wire name, also used as the validation error key.
    pub fn key(self) -> &'static str {
        match self {
            DischargeField::Name => "name",
            DischargeField::EpicId => "epic_id",
            DischargeField::PhoneNumber => "phone_number",
            DischargeField::AttendingPhysician => "attending_physician",
            DischargeField::Date => "date",
            DischargeField::PrimaryCareProvider => "primary_care_provider",
            DischargeField::Insurance => "insurance",
            DischargeField::Disposition => "disposition",
            DischargeField::HospitalName => "hospital_name",
        }
    }

    /// Human label: the wire name with underscores as spaces.
    pub fn label(self) -> String {
        self.key().replace('_', " ")
    }

    pub fn is_required(self) -> bool {
        matches!(self, DischargeField::Name | DischargeField::EpicId)
    }
}

impl DischargeRecord {
    /// Current value of an editable field.
    pub fn field(&self, field: DischargeField) -> &str {
        match field {
            DischargeField::Name => &self.name,
            DischargeField::EpicId => &self.epic_id,
            DischargeField::PhoneNumber => &self.phone_number,
            DischargeField::AttendingPhysician => &self.attending_physician,
            DischargeField::Date => &self.date,
            DischargeField::PrimaryCareProvider => &self.primary_care_provider,
            DischargeField::Insurance => &self.insurance,
            DischargeField::Disposition => &self.disposition,
            DischargeField::HospitalName => self.hospital_name.as_deref().unwrap_or(""),
        }
    }

    /// Overwrite an editable field.
    pub fn set_field(&mut self, field: DischargeField, value: String) {
        match field {
            DischargeField::Name => self.name = value,
            DischargeField::EpicId => self.epic_id = value,
            DischargeField::PhoneNumber => self.phone_number = value,
            DischargeField::AttendingPhysician => self.attending_physician = value,
            DischargeField::Date => self.date = value,
            DischargeField::PrimaryCareProvider => self.primary_care_provider = value,
            DischargeField::Insurance => self.insurance = value,
            DischargeField::Disposition => self.disposition = value,
            DischargeField::HospitalName => self.hospital_name = Some(value),
        }
    }
}

/// How an enrichment value is entered and validated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnrichmentKind {
    Boolean,
    Text,
}

/// Definition of an enrichment field, from `GET /api/enrichment-types`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnrichmentType {
    pub enrichment_type_id: String,
    pub type_name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,
    /// Absent on catalogs that predate the attribute
    #[serde(default)]
    pub kind: Option<EnrichmentKind>,
}

impl EnrichmentType {
    /// Effective kind, falling back to the legacy boolean identifiers.
    pub fn kind(&self) -> EnrichmentKind {
        match self.kind {
            Some(kind) => kind,
            None if LEGACY_BOOLEAN_ENRICHMENT_TYPES.contains(&self.enrichment_type_id.as_str()) => {
                EnrichmentKind::Boolean
            }
            None => EnrichmentKind::Text,
        }
    }
}

/// Envelope of `GET /api/enrichment-types`.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichmentCatalog {
    pub enrichment_types: Vec<EnrichmentType>,
}

/// A value of one enrichment type for one discharge record.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EnrichmentValue {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub enrichment_data_id: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub temp_discharge_id: String,
    pub enrichment_type_id: String,
    /// The review endpoint names this `enrichment_type_name`
    #[serde(default, alias = "enrichment_type_name")]
    pub type_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub enrichment_value: Option<String>,
    #[serde(default)]
    pub approved_at: Option<String>,
    #[serde(default)]
    pub approved_by: Option<String>,
    #[serde(default)]
    pub created_by: Option<String>,
    #[serde(default)]
    pub updated_by: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl EnrichmentValue {
    /// Empty value standing in for a catalog type the record lacks.
    pub fn placeholder(record_id: &str, etype: &EnrichmentType) -> Self {
        Self {
            temp_discharge_id: record_id.to_string(),
            enrichment_type_id: etype.enrichment_type_id.clone(),
            type_name: Some(etype.type_name.clone()),
            description: Some(etype.description.clone()),
            enrichment_value: Some(String::new()),
            ..Self::default()
        }
    }

    pub fn value(&self) -> &str {
        self.enrichment_value.as_deref().unwrap_or("")
    }
}

/// Response of `GET /review/{raw_data_id}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewData {
    #[serde(default)]
    pub raw_data: Option<RawData>,
    #[serde(default)]
    pub temporary_discharge: Vec<DischargeRecord>,
    #[serde(default)]
    pub enrichment_data: Vec<EnrichmentValue>,
}

impl ReviewData {
    /// Enrichment values belonging to one record.
    pub fn enrichment_for<'a>(
        &'a self,
        record_id: &'a str,
    ) -> impl Iterator<Item = &'a EnrichmentValue> + 'a {
        self.enrichment_data
            .iter()
            .filter(move |e| e.temp_discharge_id == record_id)
    }
}

/// Response of `GET /api/temp-discharge/{id}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DischargeDetail {
    pub discharge_data: DischargeRecord,
    #[serde(default)]
    pub enrichment_data: Vec<EnrichmentValue>,
}

// =============================================================================
// Update Types
// =============================================================================

/// An enrichment value as sent by the editor.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnrichmentUpdate {
    pub enrichment_type_id: String,
    pub enrichment_value: String,
}

/// Body of `PUT /api/temp-discharge/{id}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DischargeUpdate {
    pub discharge_data: DischargeRecord,
    pub enrichment_data: Vec<EnrichmentUpdate>,
}

// =============================================================================
// Error Types
// =============================================================================

/// Field name → message, as produced by local validation or the server.
pub type FieldErrors = BTreeMap<String, String>;

/// Frontend application errors.
///
/// Unified error type for all frontend operations.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum AppError {
    /// Transport failure or unreadable response.
    #[error("Network error: {0}")]
    Network(String),
    /// The server rejected specific fields.
    #[error("Validation failed on {} field(s)", .0.len())]
    FieldErrors(FieldErrors),
    /// The server reported a single error message.
    #[error("{message}")]
    Server { status: u16, message: String },
    /// A non-2xx response without a usable error body.
    #[error("HTTP {status} {status_text}")]
    Http { status: u16, status_text: String },
    /// A payload could not be decoded.
    #[error("Decode error: {0}")]
    Decode(String),
    /// A browser API call failed.
    #[error("Browser error: {0}")]
    Browser(String),
}

impl AppError {
    /// Server-provided message, if the server sent one.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            AppError::Server { message, .. } => Some(message),
            _ => None,
        }
    }
}

/// Result type alias for frontend operations.
pub type AppResult<T> = Result<T, AppError>;
