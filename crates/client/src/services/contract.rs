use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, warn};

use leasedesk_core::domain::contract::{AdditionalCharge, Contract, ContractId, ContractUnit};
use leasedesk_core::domain::status::EntityType;
use leasedesk_core::errors::ApprovalError;
use leasedesk_core::gate::{guard_mutation, MutationKind};
use leasedesk_core::notify::{NotificationEvent, NotificationSink};

use crate::client::{ClientError, EnvelopeClient};

mod modes {
    pub const CREATE: u16 = 1;
    pub const UPDATE: u16 = 2;
    pub const DELETE: u16 = 3;
    pub const GET: u16 = 4;
    pub const LIST: u16 = 5;
    pub const RENEW: u16 = 6;
    pub const ADD_UNIT: u16 = 7;
    pub const REMOVE_UNIT: u16 = 8;
    pub const ADD_CHARGE: u16 = 9;
}

const RESOURCE: &str = "contracts";
const RENEWED_EVENT: &str = "contract.renewed";

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewContract {
    pub contract_number: String,
    pub customer_id: i64,
    pub rent_amount: Decimal,
    pub currency: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl NewContract {
    fn validate(&self) -> Result<(), ApprovalError> {
        if self.contract_number.trim().is_empty() {
            return Err(ApprovalError::Validation("contract number must not be blank".into()));
        }
        if self.currency.trim().is_empty() {
            return Err(ApprovalError::Validation("currency must not be blank".into()));
        }
        if self.end_date <= self.start_date {
            return Err(ApprovalError::Validation(
                "contract end date must fall after the start date".into(),
            ));
        }
        if self.rent_amount.is_sign_negative() {
            return Err(ApprovalError::Validation("rent amount must not be negative".into()));
        }
        Ok(())
    }
}

#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractChanges {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rent_amount: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ContractSummary {
    pub id: i64,
    pub contract_number: String,
    pub customer_name: String,
    pub status: String,
    pub rent_amount: Decimal,
    pub approval_status: String,
}

#[derive(Clone)]
pub struct ContractService {
    envelope: EnvelopeClient,
}

impl ContractService {
    pub fn new(envelope: EnvelopeClient) -> Self {
        Self { envelope }
    }

    pub async fn create(&self, contract: NewContract) -> Result<ContractId, ApprovalError> {
        contract.validate()?;
        let params = serde_json::to_value(&contract)
            .map_err(|e| ApprovalError::Validation(e.to_string()))?;

        let envelope = self.envelope.execute(RESOURCE, modes::CREATE, params).await?;
        let id = envelope
            .new_record_id()
            .ok_or_else(|| ClientError::Decode("create response carried no NewContractID".into()))
            .map_err(ApprovalError::from)?;
        Ok(ContractId(id))
    }

    pub async fn get(&self, id: ContractId) -> Result<Contract, ApprovalError> {
        let envelope =
            self.envelope.execute(RESOURCE, modes::GET, json!({"id": id.0})).await?;
        envelope.data_as().map_err(ApprovalError::from)
    }

    pub async fn list(&self) -> Result<Vec<ContractSummary>, ApprovalError> {
        let envelope = self.envelope.execute(RESOURCE, modes::LIST, json!({})).await?;
        envelope.rows("contracts").map_err(ApprovalError::from)
    }

    /// Ordinary field edits; refused locally while the contract is
    /// Approved.
    pub async fn update(
        &self,
        record: &Contract,
        changes: ContractChanges,
    ) -> Result<(), ApprovalError> {
        guard_mutation(record, MutationKind::Edit)?;
        let params = json!({"id": record.id.0, "changes": changes});
        self.envelope.execute(RESOURCE, modes::UPDATE, params).await?;
        Ok(())
    }

    /// Soft delete; records are never physically removed.
    pub async fn delete(&self, record: &Contract) -> Result<(), ApprovalError> {
        guard_mutation(record, MutationKind::Delete)?;
        self.envelope.execute(RESOURCE, modes::DELETE, json!({"id": record.id.0})).await?;
        Ok(())
    }

    pub async fn add_unit(&self, record: &Contract, unit: &ContractUnit) -> Result<(), ApprovalError> {
        guard_mutation(record, MutationKind::Edit)?;
        let params = json!({"id": record.id.0, "unit": unit});
        self.envelope.execute(RESOURCE, modes::ADD_UNIT, params).await?;
        Ok(())
    }

    pub async fn remove_unit(
        &self,
        record: &Contract,
        unit_code: &str,
    ) -> Result<(), ApprovalError> {
        guard_mutation(record, MutationKind::Edit)?;
        let params = json!({"id": record.id.0, "unitCode": unit_code});
        self.envelope.execute(RESOURCE, modes::REMOVE_UNIT, params).await?;
        Ok(())
    }

    pub async fn add_charge(
        &self,
        record: &Contract,
        charge: &AdditionalCharge,
    ) -> Result<(), ApprovalError> {
        guard_mutation(record, MutationKind::Edit)?;
        let params = json!({"id": record.id.0, "charge": charge});
        self.envelope.execute(RESOURCE, modes::ADD_CHARGE, params).await?;
        Ok(())
    }

    /// Extends the contract term. Fires the renewal notification once the
    /// backend confirms.
    pub async fn renew(
        &self,
        record: &Contract,
        new_end_date: NaiveDate,
        sink: &dyn NotificationSink,
    ) -> Result<(), ApprovalError> {
        if new_end_date <= record.end_date {
            return Err(ApprovalError::Validation(
                "renewal must extend the contract end date".into(),
            ));
        }

        let params = json!({"id": record.id.0, "newEndDate": new_end_date});
        self.envelope.execute(RESOURCE, modes::RENEW, params).await?;
        info!(contract_id = record.id.0, %new_end_date, "contract renewed");

        let event = NotificationEvent::custom(RENEWED_EVENT, EntityType::Contract, record.id.0)
            .with_variable("contractNumber", record.contract_number.clone())
            .with_variable("newEndDate", new_end_date.to_string());
        if let Err(error) = sink.deliver(event).await {
            warn!(contract_id = record.id.0, %error, "renewal notification failed");
        }
        Ok(())
    }
}
