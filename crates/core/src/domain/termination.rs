use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::approval::ApprovalState;
use crate::domain::contract::ContractId;
use crate::domain::status::EntityType;
use crate::gate::Approvable;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContractTerminationId(pub i64);

/// Early termination of a contract, with the settlement owed either way.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractTermination {
    pub id: ContractTerminationId,
    pub contract_id: ContractId,
    pub termination_date: NaiveDate,
    pub reason: String,
    pub settlement_amount: Decimal,
    pub approval: ApprovalState,
    pub deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Approvable for ContractTermination {
    fn approval_state(&self) -> &ApprovalState {
        &self.approval
    }

    fn entity_type(&self) -> EntityType {
        EntityType::ContractTermination
    }
}
