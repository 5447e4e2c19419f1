use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::approval::ApprovalState;
use crate::domain::contract::ContractId;
use crate::domain::status::{EntityType, InvoiceStatus};
use crate::gate::Approvable;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContractInvoiceId(pub i64);

/// An invoice raised against a contract.
///
/// Posting commits the invoice to the accounting ledger. A posted invoice is
/// never editable; the only way back is an explicit reversal with a reason.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractInvoice {
    pub id: ContractInvoiceId,
    pub contract_id: ContractId,
    pub invoice_number: String,
    pub status: InvoiceStatus,
    pub amount: Decimal,
    pub tax_amount: Decimal,
    pub currency: String,
    pub due_date: NaiveDate,
    pub is_posted: bool,
    pub posted_by: Option<String>,
    pub posted_on: Option<DateTime<Utc>>,
    pub reversal_reason: Option<String>,
    pub approval: ApprovalState,
    pub deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Approvable for ContractInvoice {
    fn approval_state(&self) -> &ApprovalState {
        &self.approval
    }

    fn entity_type(&self) -> EntityType {
        EntityType::ContractInvoice
    }

    fn edit_locked_by_posting(&self) -> bool {
        self.is_posted
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use chrono::{NaiveDate, Utc};
    use rust_decimal::Decimal;

    use super::{ContractInvoice, ContractInvoiceId};
    use crate::domain::approval::ApprovalState;
    use crate::domain::contract::ContractId;
    use crate::domain::status::InvoiceStatus;

    pub(crate) fn invoice(posted: bool) -> ContractInvoice {
        let now = Utc::now();
        ContractInvoice {
            id: ContractInvoiceId(9001),
            contract_id: ContractId(42),
            invoice_number: "INV-2026-9001".to_owned(),
            status: InvoiceStatus::Issued,
            amount: Decimal::new(1_250_000, 2),
            tax_amount: Decimal::new(62_500, 2),
            currency: "AED".to_owned(),
            due_date: NaiveDate::from_ymd_opt(2026, 3, 31).expect("date"),
            is_posted: posted,
            posted_by: posted.then(|| "system".to_owned()),
            posted_on: posted.then(Utc::now),
            reversal_reason: None,
            approval: ApprovalState::new(true),
            deleted: false,
            created_at: now,
            updated_at: now,
        }
    }
}
