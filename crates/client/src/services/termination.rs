use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde_json::json;

use leasedesk_core::domain::termination::{ContractTermination, ContractTerminationId};
use leasedesk_core::errors::ApprovalError;
use leasedesk_core::gate::{guard_mutation, MutationKind};

use crate::client::{ClientError, EnvelopeClient};

mod modes {
    pub const CREATE: u16 = 1;
    pub const UPDATE: u16 = 2;
    pub const DELETE: u16 = 3;
    pub const GET: u16 = 4;
}

const RESOURCE: &str = "contract-terminations";

#[derive(Clone)]
pub struct TerminationService {
    envelope: EnvelopeClient,
}

impl TerminationService {
    pub fn new(envelope: EnvelopeClient) -> Self {
        Self { envelope }
    }

    pub async fn create(
        &self,
        contract_id: i64,
        termination_date: NaiveDate,
        reason: &str,
        settlement_amount: Decimal,
    ) -> Result<ContractTerminationId, ApprovalError> {
        if reason.trim().is_empty() {
            return Err(ApprovalError::Validation("termination reason must not be blank".into()));
        }

        let params = json!({
            "contractId": contract_id,
            "terminationDate": termination_date,
            "reason": reason,
            "settlementAmount": settlement_amount,
        });
        let envelope = self.envelope.execute(RESOURCE, modes::CREATE, params).await?;
        let id = envelope
            .new_record_id()
            .ok_or_else(|| {
                ClientError::Decode("create response carried no NewTerminationID".into())
            })
            .map_err(ApprovalError::from)?;
        Ok(ContractTerminationId(id))
    }

    pub async fn get(
        &self,
        id: ContractTerminationId,
    ) -> Result<ContractTermination, ApprovalError> {
        let envelope = self.envelope.execute(RESOURCE, modes::GET, json!({"id": id.0})).await?;
        envelope.data_as().map_err(ApprovalError::from)
    }

    pub async fn update_settlement(
        &self,
        record: &ContractTermination,
        settlement_amount: Decimal,
    ) -> Result<(), ApprovalError> {
        guard_mutation(record, MutationKind::Edit)?;
        let params = json!({"id": record.id.0, "settlementAmount": settlement_amount});
        self.envelope.execute(RESOURCE, modes::UPDATE, params).await?;
        Ok(())
    }

    pub async fn delete(&self, record: &ContractTermination) -> Result<(), ApprovalError> {
        guard_mutation(record, MutationKind::Delete)?;
        self.envelope.execute(RESOURCE, modes::DELETE, json!({"id": record.id.0})).await?;
        Ok(())
    }
}
