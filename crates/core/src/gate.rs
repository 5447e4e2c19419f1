//! Approval status gate: guard predicates for ordinary mutation and the
//! eligibility rules for the privileged approve/reject/reset transitions.
//!
//! Every check here is a pure function of a record snapshot. The backend
//! re-enforces the same rules authoritatively; the gate exists to refuse
//! doomed calls before they leave the process and to keep the user-facing
//! message uniform across all four approvable entity types.

use serde::{Deserialize, Serialize};

use crate::domain::approval::ApprovalState;
use crate::domain::invoice::ContractInvoice;
use crate::domain::status::{ApprovalStatus, EntityType};
use crate::errors::{ApprovalError, DomainError, GuardError};

/// Caller identity, passed explicitly into every gate call.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthContext {
    pub actor: String,
    pub role: Role,
}

impl AuthContext {
    pub fn new(actor: impl Into<String>, role: Role) -> Self {
        Self { actor: actor.into(), role }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Manager,
    Staff,
    Viewer,
}

impl Role {
    /// Only managers and admins may drive approval transitions.
    pub fn can_transition_approval(&self) -> bool {
        matches!(self, Self::Admin | Self::Manager)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Manager => "manager",
            Self::Staff => "staff",
            Self::Viewer => "viewer",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "manager" => Ok(Self::Manager),
            "staff" => Ok(Self::Staff),
            "viewer" => Ok(Self::Viewer),
            other => Err(DomainError::UnknownStatus { field: "role", value: other.to_owned() }),
        }
    }
}

/// Implemented by every record family that carries an approval workflow.
pub trait Approvable {
    fn approval_state(&self) -> &ApprovalState;
    fn entity_type(&self) -> EntityType;

    /// Whether posting locks the record against edits. Only invoices fold
    /// this into edit eligibility; every other entity checks approval
    /// status alone.
    fn edit_locked_by_posting(&self) -> bool {
        false
    }

    /// Entity-specific veto on deletion, independent of approval state.
    fn delete_veto(&self) -> Option<String> {
        None
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MutationKind {
    Edit,
    Delete,
}

/// A record exempt from approval is always editable. Otherwise an Approved
/// record is immutable until an explicit reset returns it to Pending.
pub fn can_edit<R: Approvable + ?Sized>(record: &R) -> bool {
    let state = record.approval_state();
    if !state.requires_approval {
        return true;
    }
    state.status != ApprovalStatus::Approved && !record.edit_locked_by_posting()
}

pub fn can_delete<R: Approvable + ?Sized>(record: &R) -> bool {
    can_edit(record) && record.delete_veto().is_none()
}

/// Intercepts a mutating operation before any network call is made.
pub fn guard_mutation<R: Approvable + ?Sized>(
    record: &R,
    operation: MutationKind,
) -> Result<(), GuardError> {
    match operation {
        MutationKind::Edit => {
            if can_edit(record) {
                Ok(())
            } else {
                Err(protected(record, "edit"))
            }
        }
        MutationKind::Delete => {
            if let Some(veto) = record.delete_veto() {
                return Err(GuardError::Protected { reason: veto });
            }
            if can_edit(record) {
                Ok(())
            } else {
                Err(protected(record, "delete"))
            }
        }
    }
}

fn protected<R: Approvable + ?Sized>(record: &R, verb: &str) -> GuardError {
    if record.edit_locked_by_posting() {
        GuardError::Protected {
            reason: format!("Cannot {verb} posted records; reverse the posting first"),
        }
    } else {
        GuardError::Protected {
            reason: format!("Cannot {verb} approved records; reset approval status first"),
        }
    }
}

pub fn authorize_transition(ctx: &AuthContext) -> Result<(), ApprovalError> {
    if ctx.role.can_transition_approval() {
        Ok(())
    } else {
        Err(ApprovalError::Unauthorized { role: ctx.role })
    }
}

pub fn validate_rejection_reason(reason: &str) -> Result<(), ApprovalError> {
    if reason.trim().is_empty() {
        return Err(DomainError::MissingRejectionReason.into());
    }
    Ok(())
}

/// Posting an invoice to the ledger requires prior approval and is a
/// one-shot operation.
pub fn can_post(invoice: &ContractInvoice) -> bool {
    invoice.approval.status == ApprovalStatus::Approved && !invoice.is_posted
}

/// Reversal is the only way back out of a posted ledger entry.
pub fn validate_reversal(invoice: &ContractInvoice, reason: &str) -> Result<(), ApprovalError> {
    if !invoice.is_posted {
        return Err(ApprovalError::Validation(
            "only posted invoices can be reversed".to_owned(),
        ));
    }
    if reason.trim().is_empty() {
        return Err(DomainError::MissingReversalReason.into());
    }
    Ok(())
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BulkAction {
    Approve,
    Reject,
}

impl std::fmt::Display for BulkAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Approve => "approve",
            Self::Reject => "reject",
        })
    }
}

impl std::str::FromStr for BulkAction {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "approve" => Ok(Self::Approve),
            "reject" => Ok(Self::Reject),
            other => Err(DomainError::UnknownStatus { field: "action", value: other.to_owned() }),
        }
    }
}

/// Status snapshot of a record as most recently fetched. Staleness is a
/// known race; the backend is the only authority that can reject a stale
/// transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusSnapshot {
    pub id: i64,
    pub status: ApprovalStatus,
}

/// The bulk plan after eligibility filtering. Skipped ids were not in
/// `Pending` state; they are neither successes nor failures.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BulkPlan {
    pub eligible: Vec<i64>,
    pub skipped: Vec<i64>,
}

pub fn partition_eligible(snapshots: &[StatusSnapshot]) -> BulkPlan {
    let mut plan = BulkPlan::default();
    for snapshot in snapshots {
        if snapshot.status == ApprovalStatus::Pending {
            plan.eligible.push(snapshot.id);
        } else {
            plan.skipped.push(snapshot.id);
        }
    }
    plan
}
