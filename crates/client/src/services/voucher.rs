use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;

use leasedesk_core::domain::voucher::{PettyCashVoucher, PettyCashVoucherId};
use leasedesk_core::errors::ApprovalError;
use leasedesk_core::gate::{guard_mutation, MutationKind};

use crate::client::{ClientError, EnvelopeClient};

mod modes {
    pub const CREATE: u16 = 1;
    pub const UPDATE: u16 = 2;
    pub const DELETE: u16 = 3;
    pub const GET: u16 = 4;
    pub const LIST: u16 = 5;
}

const RESOURCE: &str = "petty-cash-vouchers";

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VoucherSummary {
    pub id: i64,
    pub voucher_number: String,
    pub amount: Decimal,
    pub status: String,
    pub approval_status: String,
}

#[derive(Clone)]
pub struct VoucherService {
    envelope: EnvelopeClient,
}

impl VoucherService {
    pub fn new(envelope: EnvelopeClient) -> Self {
        Self { envelope }
    }

    pub async fn create(
        &self,
        description: &str,
        amount: Decimal,
        currency: &str,
        cost_center: Option<&str>,
    ) -> Result<PettyCashVoucherId, ApprovalError> {
        if description.trim().is_empty() {
            return Err(ApprovalError::Validation("voucher description must not be blank".into()));
        }
        if amount <= Decimal::ZERO {
            return Err(ApprovalError::Validation("voucher amount must be positive".into()));
        }

        let params = json!({
            "description": description,
            "amount": amount,
            "currency": currency,
            "costCenter": cost_center,
        });
        let envelope = self.envelope.execute(RESOURCE, modes::CREATE, params).await?;
        let id = envelope
            .new_record_id()
            .ok_or_else(|| ClientError::Decode("create response carried no NewVoucherID".into()))
            .map_err(ApprovalError::from)?;
        Ok(PettyCashVoucherId(id))
    }

    pub async fn get(&self, id: PettyCashVoucherId) -> Result<PettyCashVoucher, ApprovalError> {
        let envelope = self.envelope.execute(RESOURCE, modes::GET, json!({"id": id.0})).await?;
        envelope.data_as().map_err(ApprovalError::from)
    }

    pub async fn list(&self, cost_center: Option<&str>) -> Result<Vec<VoucherSummary>, ApprovalError> {
        let envelope = self
            .envelope
            .execute(RESOURCE, modes::LIST, json!({"costCenter": cost_center}))
            .await?;
        envelope.rows("vouchers").map_err(ApprovalError::from)
    }

    pub async fn update_amount(
        &self,
        record: &PettyCashVoucher,
        amount: Decimal,
    ) -> Result<(), ApprovalError> {
        guard_mutation(record, MutationKind::Edit)?;
        let params = json!({"id": record.id.0, "amount": amount});
        self.envelope.execute(RESOURCE, modes::UPDATE, params).await?;
        Ok(())
    }

    pub async fn delete(&self, record: &PettyCashVoucher) -> Result<(), ApprovalError> {
        guard_mutation(record, MutationKind::Delete)?;
        self.envelope.execute(RESOURCE, modes::DELETE, json!({"id": record.id.0})).await?;
        Ok(())
    }
}
