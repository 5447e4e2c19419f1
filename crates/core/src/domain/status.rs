use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// Approval tri-state gating mutation of an otherwise-editable record.
/// Orthogonal to the business lifecycle status of the record.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ApprovalStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl ApprovalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Approved => "Approved",
            Self::Rejected => "Rejected",
        }
    }

    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        match raw.trim() {
            "Pending" => Ok(Self::Pending),
            "Approved" => Ok(Self::Approved),
            "Rejected" => Ok(Self::Rejected),
            other => Err(DomainError::UnknownStatus {
                field: "approvalStatus",
                value: other.to_owned(),
            }),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContractStatus {
    Draft,
    Pending,
    Active,
    Expired,
    Cancelled,
    Completed,
    Terminated,
}

impl ContractStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "Draft",
            Self::Pending => "Pending",
            Self::Active => "Active",
            Self::Expired => "Expired",
            Self::Cancelled => "Cancelled",
            Self::Completed => "Completed",
            Self::Terminated => "Terminated",
        }
    }

    /// Deletion of live or closed contracts is blocked independently of
    /// approval state.
    pub fn blocks_delete(&self) -> bool {
        matches!(self, Self::Active | Self::Completed)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum InvoiceStatus {
    Draft,
    Issued,
    Paid,
    Cancelled,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum VoucherStatus {
    Draft,
    Pending,
    Posted,
    Rejected,
    Reversed,
}

/// The four record families that carry an approval workflow.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EntityType {
    Contract,
    ContractInvoice,
    ContractTermination,
    PettyCashVoucher,
}

impl EntityType {
    /// Resource segment in the envelope endpoint path.
    pub fn resource(&self) -> &'static str {
        match self {
            Self::Contract => "contracts",
            Self::ContractInvoice => "contract-invoices",
            Self::ContractTermination => "contract-terminations",
            Self::PettyCashVoucher => "petty-cash-vouchers",
        }
    }

    pub fn approved_event(&self) -> &'static str {
        match self {
            Self::Contract => "contract.approved",
            Self::ContractInvoice => "contract_invoice.approved",
            Self::ContractTermination => "contract_termination.approved",
            Self::PettyCashVoucher => "petty_cash_voucher.approved",
        }
    }

    pub fn rejected_event(&self) -> &'static str {
        match self {
            Self::Contract => "contract.rejected",
            Self::ContractInvoice => "contract_invoice.rejected",
            Self::ContractTermination => "contract_termination.rejected",
            Self::PettyCashVoucher => "petty_cash_voucher.rejected",
        }
    }
}

impl std::fmt::Display for EntityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.resource())
    }
}

impl std::str::FromStr for EntityType {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "contract" | "contracts" => Ok(Self::Contract),
            "invoice" | "contract-invoice" | "contract-invoices" => Ok(Self::ContractInvoice),
            "termination" | "contract-termination" | "contract-terminations" => {
                Ok(Self::ContractTermination)
            }
            "voucher" | "petty-cash-voucher" | "petty-cash-vouchers" => Ok(Self::PettyCashVoucher),
            other => Err(DomainError::UnknownStatus { field: "entityType", value: other.to_owned() }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ApprovalStatus, ContractStatus, EntityType};

    #[test]
    fn approval_status_round_trips_through_wire_strings() {
        for status in [ApprovalStatus::Pending, ApprovalStatus::Approved, ApprovalStatus::Rejected]
        {
            assert_eq!(ApprovalStatus::parse(status.as_str()).expect("parse"), status);
        }
    }

    #[test]
    fn unknown_approval_status_is_rejected() {
        assert!(ApprovalStatus::parse("Escalated").is_err());
    }

    #[test]
    fn active_and_completed_contracts_block_delete() {
        assert!(ContractStatus::Active.blocks_delete());
        assert!(ContractStatus::Completed.blocks_delete());
        assert!(!ContractStatus::Draft.blocks_delete());
        assert!(!ContractStatus::Terminated.blocks_delete());
    }

    #[test]
    fn entity_type_parses_short_and_resource_forms() {
        assert_eq!("contract".parse::<EntityType>().expect("parse"), EntityType::Contract);
        assert_eq!(
            "petty-cash-vouchers".parse::<EntityType>().expect("parse"),
            EntityType::PettyCashVoucher
        );
        assert!("tenancy".parse::<EntityType>().is_err());
    }

    #[test]
    fn trigger_event_names_are_distinct_per_entity() {
        let names: std::collections::HashSet<&str> = [
            EntityType::Contract,
            EntityType::ContractInvoice,
            EntityType::ContractTermination,
            EntityType::PettyCashVoucher,
        ]
        .iter()
        .flat_map(|e| [e.approved_event(), e.rejected_event()])
        .collect();
        assert_eq!(names.len(), 8);
    }
}
