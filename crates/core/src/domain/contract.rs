use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::approval::ApprovalState;
use crate::domain::customer::CustomerId;
use crate::domain::status::{ContractStatus, EntityType};
use crate::gate::Approvable;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContractId(pub i64);

/// A leased unit attached to a contract.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractUnit {
    pub unit_code: String,
    pub monthly_rent: Decimal,
}

/// A recurring charge on top of the base rent (maintenance, parking, ...).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdditionalCharge {
    pub description: String,
    pub amount: Decimal,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contract {
    pub id: ContractId,
    pub contract_number: String,
    pub customer_id: CustomerId,
    pub status: ContractStatus,
    pub rent_amount: Decimal,
    pub currency: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub units: Vec<ContractUnit>,
    pub charges: Vec<AdditionalCharge>,
    pub approval: ApprovalState,
    pub deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Approvable for Contract {
    fn approval_state(&self) -> &ApprovalState {
        &self.approval
    }

    fn entity_type(&self) -> EntityType {
        EntityType::Contract
    }

    fn delete_veto(&self) -> Option<String> {
        if self.status.blocks_delete() {
            Some(format!(
                "Cannot delete a contract in `{}` status",
                self.status.as_str()
            ))
        } else {
            None
        }
    }
}
