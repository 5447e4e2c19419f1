use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::status::ApprovalStatus;
use crate::errors::DomainError;

/// Approval state embedded in every approvable record.
///
/// Provenance fields are written only by the transition methods, never by
/// direct field edits.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApprovalState {
    pub status: ApprovalStatus,
    pub requires_approval: bool,
    pub comments: Option<String>,
    pub rejection_reason: Option<String>,
    pub approved_by: Option<String>,
    pub approved_on: Option<DateTime<Utc>>,
    pub rejected_by: Option<String>,
    pub rejected_on: Option<DateTime<Utc>>,
}

impl ApprovalState {
    pub fn new(requires_approval: bool) -> Self {
        Self {
            status: ApprovalStatus::Pending,
            requires_approval,
            comments: None,
            rejection_reason: None,
            approved_by: None,
            approved_on: None,
            rejected_by: None,
            rejected_on: None,
        }
    }

    /// Records exempt from approval behave as if always approved.
    pub fn exempt() -> Self {
        Self::new(false)
    }

    pub fn apply_approve(&mut self, actor: &str, comments: Option<&str>) {
        self.status = ApprovalStatus::Approved;
        self.comments = comments.map(str::to_owned);
        self.approved_by = Some(actor.to_owned());
        self.approved_on = Some(Utc::now());
        self.rejected_by = None;
        self.rejected_on = None;
        self.rejection_reason = None;
    }

    pub fn apply_reject(&mut self, actor: &str, reason: &str) -> Result<(), DomainError> {
        if reason.trim().is_empty() {
            return Err(DomainError::MissingRejectionReason);
        }
        self.status = ApprovalStatus::Rejected;
        self.rejection_reason = Some(reason.to_owned());
        self.rejected_by = Some(actor.to_owned());
        self.rejected_on = Some(Utc::now());
        self.approved_by = None;
        self.approved_on = None;
        self.comments = None;
        Ok(())
    }

    /// Unconditionally returns the record to `Pending` and clears all
    /// provenance. Idempotent.
    pub fn apply_reset(&mut self) {
        self.status = ApprovalStatus::Pending;
        self.comments = None;
        self.rejection_reason = None;
        self.approved_by = None;
        self.approved_on = None;
        self.rejected_by = None;
        self.rejected_on = None;
    }
}

impl Default for ApprovalState {
    fn default() -> Self {
        Self::new(true)
    }
}

#[cfg(test)]
mod tests {
    use super::ApprovalState;
    use crate::domain::status::ApprovalStatus;

    #[test]
    fn new_state_defaults_to_pending() {
        let state = ApprovalState::new(true);
        assert_eq!(state.status, ApprovalStatus::Pending);
        assert!(state.approved_by.is_none());
        assert!(state.rejection_reason.is_none());
    }

    #[test]
    fn approve_records_provenance_and_comments() {
        let mut state = ApprovalState::new(true);
        state.apply_approve("manager:lena", Some("looks good"));

        assert_eq!(state.status, ApprovalStatus::Approved);
        assert_eq!(state.comments.as_deref(), Some("looks good"));
        assert_eq!(state.approved_by.as_deref(), Some("manager:lena"));
        assert!(state.approved_on.is_some());
    }

    #[test]
    fn reject_requires_non_blank_reason() {
        let mut state = ApprovalState::new(true);
        assert!(state.apply_reject("manager:lena", "").is_err());
        assert!(state.apply_reject("manager:lena", "   ").is_err());
        assert_eq!(state.status, ApprovalStatus::Pending);
        assert!(state.rejection_reason.is_none());
    }

    #[test]
    fn reject_records_reason_and_provenance() {
        let mut state = ApprovalState::new(true);
        state.apply_reject("manager:lena", "missing tenant signature").expect("reject");

        assert_eq!(state.status, ApprovalStatus::Rejected);
        assert_eq!(state.rejection_reason.as_deref(), Some("missing tenant signature"));
        assert!(state.rejected_on.is_some());
    }

    #[test]
    fn approve_then_reset_clears_all_provenance() {
        let mut state = ApprovalState::new(true);
        state.apply_approve("manager:lena", Some("ok"));
        state.apply_reset();

        assert_eq!(state.status, ApprovalStatus::Pending);
        assert!(state.comments.is_none());
        assert!(state.approved_by.is_none());
        assert!(state.approved_on.is_none());
    }

    #[test]
    fn reset_is_idempotent() {
        let mut state = ApprovalState::new(true);
        state.apply_reject("manager:lena", "duplicate voucher").expect("reject");
        state.apply_reset();
        let after_first = state.clone();
        state.apply_reset();
        assert_eq!(state, after_first);
    }

    #[test]
    fn reapproving_a_rejected_record_replaces_rejection_provenance() {
        let mut state = ApprovalState::new(true);
        state.apply_reject("manager:lena", "wrong amount").expect("reject");
        state.apply_approve("admin:omar", None);

        assert_eq!(state.status, ApprovalStatus::Approved);
        assert!(state.rejection_reason.is_none());
        assert!(state.rejected_by.is_none());
    }
}
