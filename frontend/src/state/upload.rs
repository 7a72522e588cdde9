//! Uploader state.

use crate::types::{AppError, AppResult, ExtractedRow, UploadResponse};

const UPLOAD_FALLBACK: &str = "Failed to upload and process the PDF.";

/// Local state of the upload screen.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct UploadState {
    pub uploading: bool,
    pub message: Option<String>,
    pub error: Option<String>,
    pub rows: Option<Vec<ExtractedRow>>,
    pub raw_data_id: Option<String>,
}

impl UploadState {
    /// A new file was chosen: forget the previous upload.
    pub fn file_selected(&mut self) {
        self.error = None;
        self.message = None;
        self.rows = None;
        self.raw_data_id = None;
    }

    /// Check preconditions and enter the uploading state.
    ///
    /// Returns `false` (with an error set) when the upload must not start.
    pub fn begin(&mut self, has_file: bool, import_type_id: &str) -> bool {
        if !has_file {
            self.error = Some("Please select a PDF file first.".to_string());
            return false;
        }
        if import_type_id.is_empty() {
            self.error = Some("Please select an import type.".to_string());
            return false;
        }

        self.uploading = true;
        self.message = None;
        self.error = None;
        self.rows = None;
        self.raw_data_id = None;
        true
    }

    /// Apply the upload result.
    pub fn finish(&mut self, result: AppResult<UploadResponse>) {
        self.uploading = false;
        match result {
            Ok(response) => {
                self.rows = Some(response.data);
                self.raw_data_id = Some(response.raw_data_id);
                self.message = Some("PDF uploaded and processed successfully!".to_string());
            }
            Err(e) => {
                log::error!("❌ Upload failed: {}", e);
                let message = match &e {
                    AppError::Server { message, .. } if !message.is_empty() => message.clone(),
                    _ => UPLOAD_FALLBACK.to_string(),
                };
                self.error = Some(message);
                self.rows = None;
            }
        }
    }

    /// "Review Now" is available once the server returned an identifier.
    pub fn can_review(&self) -> bool {
        self.raw_data_id.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::classify_failure;

    fn response() -> UploadResponse {
        UploadResponse {
            data: vec![ExtractedRow {
                name: Some("Jane Roe".to_string()),
                ..ExtractedRow::default()
            }],
            raw_data_id: "r1".to_string(),
            message: None,
        }
    }

    #[test]
    fn test_requires_file_and_type() {
        let mut state = UploadState::default();
        assert!(!state.begin(false, "t1"));
        assert_eq!(state.error.as_deref(), Some("Please select a PDF file first."));
        assert!(!state.uploading);

        assert!(!state.begin(true, ""));
        assert_eq!(state.error.as_deref(), Some("Please select an import type."));

        assert!(state.begin(true, "t1"));
        assert!(state.uploading);
        assert!(state.error.is_none());
    }

    #[test]
    fn test_success_enables_review() {
        let mut state = UploadState::default();
        assert!(state.begin(true, "t1"));
        assert!(!state.can_review());

        state.finish(Ok(response()));
        assert!(!state.uploading);
        assert!(state.can_review());
        assert_eq!(state.rows.as_ref().map(Vec::len), Some(1));
        assert!(state.message.is_some());
    }

    #[test]
    fn test_failure_surfaces_server_message() {
        let mut state = UploadState::default();
        state.begin(true, "t1");
        state.finish(Err(AppError::Server {
            status: 400,
            message: "No import type selected".to_string(),
        }));
        assert_eq!(state.error.as_deref(), Some("No import type selected"));
        assert!(state.rows.is_none());

        state.begin(true, "t1");
        state.finish(Err(AppError::Network("connection refused".to_string())));
        assert_eq!(state.error.as_deref(), Some(UPLOAD_FALLBACK));
    }

    #[test]
    fn test_bare_status_failure_uses_fallback() {
        let mut state = UploadState::default();
        state.begin(true, "t1");
        state.finish(Err(classify_failure(500, "INTERNAL SERVER ERROR", "<html>boom</html>")));
        assert_eq!(state.error.as_deref(), Some(UPLOAD_FALLBACK));
    }

    #[test]
    fn test_failed_retry_forgets_previous_upload() {
        let mut state = UploadState::default();
        state.begin(true, "t1");
        state.finish(Ok(response()));
        assert!(state.can_review());

        assert!(state.begin(true, "t1"));
        assert!(!state.can_review());
        state.finish(Err(AppError::Network("connection refused".to_string())));
        assert!(!state.can_review());
        assert_eq!(state.raw_data_id, None);
    }

    #[test]
    fn test_new_file_clears_previous_upload() {
        let mut state = UploadState::default();
        state.begin(true, "t1");
        state.finish(Ok(response()));

        state.file_selected();
        assert!(!state.can_review());
        assert!(state.rows.is_none());
        assert!(state.message.is_none());
    }
}
