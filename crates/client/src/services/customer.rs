use serde::Serialize;
use serde_json::json;

use leasedesk_core::domain::customer::{Customer, CustomerId};
use leasedesk_core::errors::ApprovalError;

use crate::client::{ClientError, EnvelopeClient};

mod modes {
    pub const CREATE: u16 = 1;
    pub const UPDATE: u16 = 2;
    pub const DELETE: u16 = 3;
    pub const GET: u16 = 4;
    pub const LIST: u16 = 5;
}

const RESOURCE: &str = "customers";

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCustomer {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub tax_number: Option<String>,
}

/// Customers carry no approval workflow, so no mutation guard applies.
#[derive(Clone)]
pub struct CustomerService {
    envelope: EnvelopeClient,
}

impl CustomerService {
    pub fn new(envelope: EnvelopeClient) -> Self {
        Self { envelope }
    }

    pub async fn create(&self, customer: NewCustomer) -> Result<CustomerId, ApprovalError> {
        if customer.name.trim().is_empty() {
            return Err(ApprovalError::Validation("customer name must not be blank".into()));
        }

        let params = serde_json::to_value(&customer)
            .map_err(|e| ApprovalError::Validation(e.to_string()))?;
        let envelope = self.envelope.execute(RESOURCE, modes::CREATE, params).await?;
        let id = envelope
            .new_record_id()
            .ok_or_else(|| ClientError::Decode("create response carried no NewCustomerID".into()))
            .map_err(ApprovalError::from)?;
        Ok(CustomerId(id))
    }

    pub async fn get(&self, id: CustomerId) -> Result<Customer, ApprovalError> {
        let envelope = self.envelope.execute(RESOURCE, modes::GET, json!({"id": id.0})).await?;
        envelope.data_as().map_err(ApprovalError::from)
    }

    pub async fn list(&self) -> Result<Vec<Customer>, ApprovalError> {
        let envelope = self.envelope.execute(RESOURCE, modes::LIST, json!({})).await?;
        envelope.rows("customers").map_err(ApprovalError::from)
    }

    pub async fn update(&self, id: CustomerId, customer: NewCustomer) -> Result<(), ApprovalError> {
        let mut params = serde_json::to_value(&customer)
            .map_err(|e| ApprovalError::Validation(e.to_string()))?;
        params["id"] = json!(id.0);
        self.envelope.execute(RESOURCE, modes::UPDATE, params).await?;
        Ok(())
    }

    pub async fn delete(&self, id: CustomerId) -> Result<(), ApprovalError> {
        self.envelope.execute(RESOURCE, modes::DELETE, json!({"id": id.0})).await?;
        Ok(())
    }
}
