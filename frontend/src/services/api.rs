//! HTTP client for the discharge review API.
//!
//! Every endpoint of the backend has one method on [`ApiClient`]. Non-2xx
//! responses are turned into [`AppError`] by [`classify_failure`]:
//! a body with an `errors` object becomes field errors, a body with an
//! `error` string becomes a server message, and anything else only keeps
//! the status.

use std::collections::BTreeMap;

use gloo_net::http::{Request, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use web_sys::{File, FormData};

use crate::config::API_BASE_URL;
use crate::state::{DateRange, ReviewAction};
use crate::types::{
    AppError, AppResult, DischargeDetail, DischargeUpdate, EnrichmentCatalog, EnrichmentType,
    FieldErrors, ImportType, ImportedFileSummary, ReviewData, UploadResponse,
};

/// Error envelope used by every endpoint.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    errors: Option<BTreeMap<String, Value>>,
}

/// Convert a failed response into an [`AppError`].
pub fn classify_failure(status: u16, status_text: &str, body: &str) -> AppError {
    let parsed: ErrorBody = serde_json::from_str(body).unwrap_or_default();

    if let Some(errors) = parsed.errors.filter(|e| !e.is_empty()) {
        let fields: FieldErrors = errors
            .into_iter()
            .map(|(field, msg)| {
                let msg = match msg {
                    Value::String(s) => s,
                    other => other.to_string(),
                };
                (field, msg)
            })
            .collect();
        return AppError::FieldErrors(fields);
    }

    match parsed.error.filter(|e| !e.is_empty()) {
        Some(message) => AppError::Server { status, message },
        None => AppError::Http {
            status,
            status_text: status_text.to_string(),
        },
    }
}

/// Interpret the body of `POST /upload-pdf`.
///
/// The server may report an error inside a 2xx response.
pub fn parse_upload_body(status: u16, body: &str) -> AppResult<UploadResponse> {
    let value: Value = serde_json::from_str(body)
        .map_err(|e| AppError::Decode(format!("Failed to parse upload response: {}", e)))?;

    if let Some(error) = value.get("error").and_then(Value::as_str) {
        return Err(AppError::Server {
            status,
            message: error.to_string(),
        });
    }

    serde_json::from_value(value)
        .map_err(|e| AppError::Decode(format!("Failed to parse upload response: {}", e)))
}

/// Path of the approve/reject endpoint for one record.
pub fn action_path(action: ReviewAction, record_id: &str) -> String {
    format!("/api/{}/{}", action.verb(), record_id)
}

/// Client bound to one API base URL.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiClient {
    base_url: String,
}

impl Default for ApiClient {
    fn default() -> Self {
        Self::new(API_BASE_URL)
    }
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url }
    }

    /// Absolute URL of an API path.
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// `GET /import-types`
    pub async fn import_types(&self) -> AppResult<Vec<ImportType>> {
        let request = build(Request::get(&self.url("/import-types")).build())?;
        read_json(send(request).await?).await
    }

    /// `POST /upload-pdf` as multipart (`file`, `import_type_id`).
    pub async fn upload_pdf(&self, file: &File, import_type_id: &str) -> AppResult<UploadResponse> {
        let form_data = FormData::new()
            .map_err(|e| AppError::Browser(format!("Failed to create FormData: {:?}", e)))?;
        form_data
            .append_with_blob("file", file)
            .map_err(|e| AppError::Browser(format!("Failed to append file: {:?}", e)))?;
        form_data
            .append_with_str("import_type_id", import_type_id)
            .map_err(|e| AppError::Browser(format!("Failed to append import type: {:?}", e)))?;

        log::info!("📤 Uploading {} ({} bytes)", file.name(), file.size());
        let request = build(Request::post(&self.url("/upload-pdf")).body(form_data))?;
        let response = send(request).await?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AppError::Network(format!("Failed to read response: {}", e)))?;
        parse_upload_body(status, &body)
    }

    /// `GET /raw-data?start_date&end_date`
    pub async fn imported_files(&self, range: &DateRange) -> AppResult<Vec<ImportedFileSummary>> {
        let params = range.query_params();
        let request = build(
            Request::get(&self.url("/raw-data"))
                .query(params.iter().map(|(k, v)| (*k, v.as_str())))
                .build(),
        )?;
        read_json(send(request).await?).await
    }

    /// `GET /review/{raw_data_id}`
    pub async fn review(&self, raw_data_id: &str) -> AppResult<ReviewData> {
        let url = self.url(&format!("/review/{}", raw_data_id));
        let request = build(Request::get(&url).build())?;
        read_json(send(request).await?).await
    }

    /// `GET /api/enrichment-types`
    pub async fn enrichment_types(&self) -> AppResult<Vec<EnrichmentType>> {
        let request = build(Request::get(&self.url("/api/enrichment-types")).build())?;
        let catalog: EnrichmentCatalog = read_json(send(request).await?).await?;
        Ok(catalog.enrichment_types)
    }

    /// `GET /api/temp-discharge/{id}`
    pub async fn discharge(&self, temp_discharge_id: &str) -> AppResult<DischargeDetail> {
        let url = self.url(&format!("/api/temp-discharge/{}", temp_discharge_id));
        let request = build(Request::get(&url).build())?;
        read_json(send(request).await?).await
    }

    /// `PUT /api/temp-discharge/{id}`
    pub async fn update_discharge(
        &self,
        temp_discharge_id: &str,
        update: &DischargeUpdate,
    ) -> AppResult<()> {
        let url = self.url(&format!("/api/temp-discharge/{}", temp_discharge_id));
        log::debug!(
            "Payload to update: {}",
            serde_json::to_string(update).unwrap_or_default()
        );
        let request = build(Request::put(&url).json(update))?;
        send(request).await.map(|_| ())
    }

    /// `POST /api/approve/{id}` or `POST /api/reject/{id}`
    pub async fn review_action(&self, action: ReviewAction, temp_discharge_id: &str) -> AppResult<()> {
        let url = self.url(&action_path(action, temp_discharge_id));
        log::info!("Calling endpoint: {}", url);
        let request = build(Request::post(&url).build())?;
        send(request).await.map(|_| ())
    }
}

fn build(request: Result<Request, gloo_net::Error>) -> AppResult<Request> {
    request.map_err(|e| AppError::Network(format!("Failed to build request: {}", e)))
}

async fn send(request: Request) -> AppResult<Response> {
    let response = request
        .send()
        .await
        .map_err(|e| AppError::Network(format!("HTTP request failed: {}", e)))?;

    if !response.ok() {
        let status = response.status();
        let status_text = response.status_text();
        let body = response.text().await.unwrap_or_default();
        return Err(classify_failure(status, &status_text, &body));
    }
    Ok(response)
}

async fn read_json<T: DeserializeOwned>(response: Response) -> AppResult<T> {
    response
        .json::<T>()
        .await
        .map_err(|e| AppError::Decode(format!("Failed to parse response: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_errors_classified() {
        let body = r#"{"errors": {"name": "Name is required.", "date": "Date is required."}}"#;
        match classify_failure(400, "BAD REQUEST", body) {
            AppError::FieldErrors(fields) => {
                assert_eq!(fields.len(), 2);
                assert_eq!(fields["name"], "Name is required.");
            }
            other => panic!("expected field errors, got {:?}", other),
        }
    }

    #[test]
    fn test_single_error_classified() {
        let err = classify_failure(404, "NOT FOUND", r#"{"error": "Discharge record not found."}"#);
        assert_eq!(
            err,
            AppError::Server {
                status: 404,
                message: "Discharge record not found.".to_string()
            }
        );
    }

    #[test]
    fn test_unstructured_body_keeps_only_status() {
        let err = classify_failure(500, "INTERNAL SERVER ERROR", "<html>boom</html>");
        assert_eq!(
            err,
            AppError::Http {
                status: 500,
                status_text: "INTERNAL SERVER ERROR".to_string()
            }
        );
        assert_eq!(err.server_message(), None);
        assert_eq!(classify_failure(500, "", "").server_message(), None);
        assert_eq!(classify_failure(400, "", r#"{"error": ""}"#).server_message(), None);
        // An empty errors object is not a field error
        assert!(matches!(
            classify_failure(400, "", r#"{"errors": {}, "error": "bad"}"#),
            AppError::Server { .. }
        ));
    }

    #[test]
    fn test_upload_body() {
        let ok = parse_upload_body(
            200,
            r#"{
                "message": "File uploaded and processed successfully",
                "data": [{"name": "Jane Roe", "epic_id": "E100", "hospital": "General"}],
                "raw_data_id": "5b0c6a4e-1d5f-4c4b-9a53-0c1e2b3d4f50"
            }"#,
        )
        .unwrap();
        assert_eq!(ok.data.len(), 1);
        assert_eq!(ok.data[0].hospital.as_deref(), Some("General"));
        assert_eq!(ok.data[0].phone_number, None);

        let err = parse_upload_body(200, r#"{"error": "No file selected for uploading"}"#).unwrap_err();
        assert_eq!(err.server_message(), Some("No file selected for uploading"));

        assert!(matches!(parse_upload_body(200, "not json"), Err(AppError::Decode(_))));
    }

    #[test]
    fn test_urls() {
        let client = ApiClient::new("http://localhost:5000/");
        assert_eq!(client.url("/import-types"), "http://localhost:5000/import-types");
        assert_eq!(action_path(ReviewAction::Approve, "d1"), "/api/approve/d1");
        assert_eq!(action_path(ReviewAction::Reject, "d1"), "/api/reject/d1");
    }
}
