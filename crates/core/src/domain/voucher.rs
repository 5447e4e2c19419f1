use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::approval::ApprovalState;
use crate::domain::status::{EntityType, VoucherStatus};
use crate::gate::Approvable;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PettyCashVoucherId(pub i64);

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PettyCashVoucher {
    pub id: PettyCashVoucherId,
    pub voucher_number: String,
    pub status: VoucherStatus,
    pub amount: Decimal,
    pub currency: String,
    pub description: String,
    pub cost_center: Option<String>,
    pub approval: ApprovalState,
    pub deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Approvable for PettyCashVoucher {
    fn approval_state(&self) -> &ApprovalState {
        &self.approval
    }

    fn entity_type(&self) -> EntityType {
        EntityType::PettyCashVoucher
    }
}
