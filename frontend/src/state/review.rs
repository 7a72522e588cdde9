//! Reviewer state: the approve/reject confirmation flow.
//!
//! One session holds the review data of an imported file and at most one
//! pending action. The flow is
//!
//! ```text
//! Idle ──request──▶ Confirming ──confirm──▶ Submitting ──ok──▶ Idle
//!   ▲                  │   ▲                     │
//!   └──────cancel──────┘   └───────error─────────┘
//! ```
//!
//! A failed submission returns to `Confirming` with an explanatory modal
//! text; nothing is retried automatically.

use std::collections::BTreeMap;
use std::fmt;

use crate::types::{
    AppError, AppResult, DischargeRecord, DischargeStatus, EnrichmentValue, FieldErrors, ReviewData,
};

/// A reviewer decision on one discharge record.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReviewAction {
    Approve,
    Reject,
}

impl ReviewAction {
    /// Verb used in prompts and endpoint paths.
    pub fn verb(self) -> &'static str {
        match self {
            ReviewAction::Approve => "approve",
            ReviewAction::Reject => "reject",
        }
    }

    /// Status the record ends up in when the action succeeds.
    pub fn resulting_status(self) -> DischargeStatus {
        match self {
            ReviewAction::Approve => DischargeStatus::Approved,
            ReviewAction::Reject => DischargeStatus::Rejected,
        }
    }
}

impl fmt::Display for ReviewAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.verb())
    }
}

/// The action awaiting confirmation or completion.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingAction {
    pub action: ReviewAction,
    pub record_id: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Phase {
    Idle,
    Confirming(PendingAction),
    Submitting(PendingAction),
}

/// Result of resolving a submitted action.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ActionOutcome {
    /// The server accepted the action.
    Completed(PendingAction),
    /// The server refused; the modal explains why.
    Failed,
    /// No action was in flight.
    Ignored,
}

/// Everything one record card displays.
///
/// Compared by value so a card only re-renders when its own record,
/// enrichment or errors change.
#[derive(Clone, Debug, PartialEq)]
pub struct RecordCard {
    pub record: DischargeRecord,
    pub enrichment: Vec<EnrichmentValue>,
    pub errors: Option<FieldErrors>,
}

/// State of the review screen once its data has loaded.
#[derive(Clone, Debug, PartialEq)]
pub struct ReviewSession {
    data: ReviewData,
    phase: Phase,
    modal_text: String,
    record_errors: BTreeMap<String, FieldErrors>,
}

impl ReviewSession {
    pub fn new(data: ReviewData) -> Self {
        Self {
            data,
            phase: Phase::Idle,
            modal_text: String::new(),
            record_errors: BTreeMap::new(),
        }
    }

    pub fn data(&self) -> &ReviewData {
        &self.data
    }

    /// Swap in freshly fetched data, keeping the modal and errors.
    pub fn replace_data(&mut self, data: ReviewData) {
        self.data = data;
    }

    /// Open the confirmation modal for `action` on `record_id`.
    ///
    /// Refused while another action is being submitted, for unknown
    /// records, and for records already approved.
    pub fn request(&mut self, action: ReviewAction, record_id: &str) -> bool {
        if self.is_submitting() {
            return false;
        }
        let actionable = self
            .data
            .temporary_discharge
            .iter()
            .any(|r| r.temp_discharge_id == record_id && !r.status.is_approved());
        if !actionable {
            return false;
        }

        self.modal_text = format!(
            "Are you sure you want to {} this discharge? This cannot be undone.",
            action
        );
        self.record_errors.remove(record_id);
        self.phase = Phase::Confirming(PendingAction {
            action,
            record_id: record_id.to_string(),
        });
        true
    }

    /// Close the modal. Ignored while a submission is in flight.
    pub fn cancel(&mut self) {
        if !self.is_submitting() {
            self.phase = Phase::Idle;
        }
    }

    /// Confirm the pending action; returns what must be sent.
    pub fn confirm(&mut self) -> Option<PendingAction> {
        match &self.phase {
            Phase::Confirming(pending) => {
                let pending = pending.clone();
                self.phase = Phase::Submitting(pending.clone());
                Some(pending)
            }
            _ => None,
        }
    }

    /// Apply the server's answer to the submitted action.
    pub fn resolve(&mut self, result: AppResult<()>) -> ActionOutcome {
        let pending = match &self.phase {
            Phase::Submitting(pending) => pending.clone(),
            _ => return ActionOutcome::Ignored,
        };

        match result {
            Ok(()) => {
                if let Some(record) = self
                    .data
                    .temporary_discharge
                    .iter_mut()
                    .find(|r| r.temp_discharge_id == pending.record_id)
                {
                    record.status = pending.action.resulting_status();
                }
                self.record_errors.remove(&pending.record_id);
                self.phase = Phase::Idle;
                ActionOutcome::Completed(pending)
            }
            Err(e) => {
                log::error!("❌ Error trying to {} record {}: {}", pending.action, pending.record_id, e);
                self.modal_text = match e {
                    AppError::FieldErrors(errors) => {
                        self.record_errors.insert(pending.record_id.clone(), errors);
                        "Validation errors occurred. Please correct the fields and try again."
                            .to_string()
                    }
                    AppError::Server { message, .. } => {
                        format!("Failed to {} the record: {}", pending.action, message)
                    }
                    _ => format!(
                        "An unexpected error occurred while trying to {} the record.",
                        pending.action
                    ),
                };
                self.phase = Phase::Confirming(pending);
                ActionOutcome::Failed
            }
        }
    }

    pub fn modal_visible(&self) -> bool {
        !matches!(self.phase, Phase::Idle)
    }

    pub fn modal_text(&self) -> &str {
        &self.modal_text
    }

    pub fn is_submitting(&self) -> bool {
        matches!(self.phase, Phase::Submitting(_))
    }

    pub fn pending(&self) -> Option<&PendingAction> {
        match &self.phase {
            Phase::Confirming(p) | Phase::Submitting(p) => Some(p),
            Phase::Idle => None,
        }
    }

    /// Identifiers of the records, in display order.
    pub fn record_ids(&self) -> Vec<String> {
        self.data
            .temporary_discharge
            .iter()
            .map(|r| r.temp_discharge_id.clone())
            .collect()
    }

    /// Card contents of one record.
    pub fn card(&self, record_id: &str) -> Option<RecordCard> {
        let record = self
            .data
            .temporary_discharge
            .iter()
            .find(|r| r.temp_discharge_id == record_id)?;
        Some(RecordCard {
            record: record.clone(),
            enrichment: self.data.enrichment_for(record_id).cloned().collect(),
            errors: self.errors_for(record_id).cloned(),
        })
    }

    /// Server validation errors attached to one record.
    pub fn errors_for(&self, record_id: &str) -> Option<&FieldErrors> {
        self.record_errors.get(record_id).filter(|e| !e.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::classify_failure;

    fn record(id: &str) -> DischargeRecord {
        DischargeRecord {
            temp_discharge_id: id.to_string(),
            name: format!("Patient {}", id),
            ..DischargeRecord::default()
        }
    }

    fn session() -> ReviewSession {
        ReviewSession::new(ReviewData {
            raw_data: None,
            temporary_discharge: vec![record("a"), record("b")],
            enrichment_data: Vec::new(),
        })
    }

    fn status_of<'a>(session: &'a ReviewSession, id: &str) -> &'a DischargeStatus {
        &session
            .data()
            .temporary_discharge
            .iter()
            .find(|r| r.temp_discharge_id == id)
            .unwrap()
            .status
    }

    #[test]
    fn test_approve_success() {
        let mut s = session();
        assert!(s.request(ReviewAction::Approve, "a"));
        assert!(s.modal_visible());
        assert!(s.modal_text().contains("approve this discharge"));

        let pending = s.confirm().unwrap();
        assert_eq!(pending.record_id, "a");
        assert!(s.is_submitting());

        assert_eq!(s.resolve(Ok(())), ActionOutcome::Completed(pending));
        assert_eq!(status_of(&s, "a"), &DischargeStatus::Approved);
        assert!(!s.modal_visible());
        // Approved records accept no further actions
        assert!(!s.request(ReviewAction::Reject, "a"));
    }

    #[test]
    fn test_field_errors_stay_on_their_record() {
        let mut s = session();
        s.request(ReviewAction::Approve, "b");
        s.confirm();

        let mut errors = FieldErrors::new();
        errors.insert("phone_number".to_string(), "Invalid phone number format.".to_string());
        assert_eq!(s.resolve(Err(AppError::FieldErrors(errors.clone()))), ActionOutcome::Failed);

        assert_eq!(status_of(&s, "b"), &DischargeStatus::Pending(None));
        assert_eq!(s.errors_for("b"), Some(&errors));
        assert_eq!(s.errors_for("a"), None);
        assert!(s.modal_visible());
        assert!(!s.is_submitting());
        assert!(s.modal_text().starts_with("Validation errors occurred"));

        // Re-opening the action clears that record's errors
        s.cancel();
        assert!(s.request(ReviewAction::Approve, "b"));
        assert_eq!(s.errors_for("b"), None);
    }

    #[test]
    fn test_server_error_leaves_status() {
        let mut s = session();
        s.request(ReviewAction::Reject, "a");
        s.confirm();
        s.resolve(Err(AppError::Server {
            status: 500,
            message: "Failed to reject record".to_string(),
        }));

        assert_eq!(s.modal_text(), "Failed to reject the record: Failed to reject record");
        assert_eq!(status_of(&s, "a"), &DischargeStatus::Pending(None));

        s.confirm();
        s.resolve(Err(AppError::Network("offline".to_string())));
        assert_eq!(
            s.modal_text(),
            "An unexpected error occurred while trying to reject the record."
        );
    }

    #[test]
    fn test_bare_status_failure_is_unexpected() {
        let mut s = session();
        s.request(ReviewAction::Approve, "a");
        s.confirm();
        let outcome = s.resolve(Err(classify_failure(
            500,
            "INTERNAL SERVER ERROR",
            "<html>boom</html>",
        )));

        assert_eq!(outcome, ActionOutcome::Failed);
        assert_eq!(
            s.modal_text(),
            "An unexpected error occurred while trying to approve the record."
        );
        assert_eq!(status_of(&s, "a"), &DischargeStatus::Pending(None));
    }

    #[test]
    fn test_single_action_in_flight() {
        let mut s = session();
        s.request(ReviewAction::Approve, "a");
        s.confirm();

        assert!(!s.request(ReviewAction::Approve, "b"));
        s.cancel();
        assert!(s.is_submitting());
        assert_eq!(s.pending().unwrap().record_id, "a");
        assert_eq!(s.confirm(), None);
    }

    #[test]
    fn test_cards_change_only_with_their_record() {
        let mut s = session();
        assert_eq!(s.record_ids(), vec!["a".to_string(), "b".to_string()]);
        let a_before = s.card("a").unwrap();
        let b_before = s.card("b").unwrap();

        // Opening and cancelling the modal touches no card
        s.request(ReviewAction::Approve, "b");
        assert_eq!(s.card("a").unwrap(), a_before);
        assert_eq!(s.card("b").unwrap(), b_before);
        s.cancel();

        s.request(ReviewAction::Approve, "b");
        s.confirm();
        let mut errors = FieldErrors::new();
        errors.insert("date".to_string(), "Date is required.".to_string());
        s.resolve(Err(AppError::FieldErrors(errors.clone())));

        assert_eq!(s.card("a").unwrap(), a_before);
        assert_eq!(s.card("b").unwrap().errors, Some(errors));
        assert!(s.card("missing").is_none());
    }

    #[test]
    fn test_resolve_without_submission_is_ignored() {
        let mut s = session();
        assert_eq!(s.resolve(Ok(())), ActionOutcome::Ignored);
        assert!(!s.request(ReviewAction::Approve, "missing"));
    }
}
