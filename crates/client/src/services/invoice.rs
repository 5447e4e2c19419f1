use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use leasedesk_core::domain::invoice::{ContractInvoice, ContractInvoiceId};
use leasedesk_core::errors::ApprovalError;
use leasedesk_core::gate::{can_post, guard_mutation, validate_reversal, MutationKind};

use crate::client::EnvelopeClient;

mod modes {
    pub const UPDATE: u16 = 2;
    pub const DELETE: u16 = 3;
    pub const GET: u16 = 4;
    pub const LIST: u16 = 5;
    pub const POST: u16 = 21;
    pub const REVERSE: u16 = 22;
}

const RESOURCE: &str = "contract-invoices";

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceSummary {
    pub id: i64,
    pub invoice_number: String,
    pub amount: Decimal,
    pub approval_status: String,
    pub is_posted: bool,
}

#[derive(Clone)]
pub struct InvoiceService {
    envelope: EnvelopeClient,
}

impl InvoiceService {
    pub fn new(envelope: EnvelopeClient) -> Self {
        Self { envelope }
    }

    pub async fn get(&self, id: ContractInvoiceId) -> Result<ContractInvoice, ApprovalError> {
        let envelope = self.envelope.execute(RESOURCE, modes::GET, json!({"id": id.0})).await?;
        envelope.data_as().map_err(ApprovalError::from)
    }

    pub async fn list_for_contract(
        &self,
        contract_id: i64,
    ) -> Result<Vec<InvoiceSummary>, ApprovalError> {
        let envelope = self
            .envelope
            .execute(RESOURCE, modes::LIST, json!({"contractId": contract_id}))
            .await?;
        envelope.rows("invoices").map_err(ApprovalError::from)
    }

    pub async fn update_amount(
        &self,
        record: &ContractInvoice,
        amount: Decimal,
    ) -> Result<(), ApprovalError> {
        guard_mutation(record, MutationKind::Edit)?;
        let params = json!({"id": record.id.0, "amount": amount});
        self.envelope.execute(RESOURCE, modes::UPDATE, params).await?;
        Ok(())
    }

    pub async fn delete(&self, record: &ContractInvoice) -> Result<(), ApprovalError> {
        guard_mutation(record, MutationKind::Delete)?;
        self.envelope.execute(RESOURCE, modes::DELETE, json!({"id": record.id.0})).await?;
        Ok(())
    }

    /// Commits the invoice to the accounting ledger. Requires prior
    /// approval; irreversible except through `reverse`.
    pub async fn post(&self, record: &ContractInvoice, actor: &str) -> Result<(), ApprovalError> {
        if !can_post(record) {
            return Err(ApprovalError::Validation(if record.is_posted {
                "invoice is already posted".into()
            } else {
                "invoice must be approved before posting".into()
            }));
        }

        let params = json!({"id": record.id.0, "postedBy": actor});
        self.envelope.execute(RESOURCE, modes::POST, params).await?;
        info!(invoice_id = record.id.0, actor, "invoice posted to ledger");
        Ok(())
    }

    pub async fn reverse(
        &self,
        record: &ContractInvoice,
        actor: &str,
        reason: &str,
    ) -> Result<(), ApprovalError> {
        validate_reversal(record, reason)?;
        let params =
            json!({"id": record.id.0, "reversedBy": actor, "reversalReason": reason});
        self.envelope.execute(RESOURCE, modes::REVERSE, params).await?;
        info!(invoice_id = record.id.0, actor, "invoice posting reversed");
        Ok(())
    }
}
