use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::status::EntityType;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecipientKind {
    To,
    Cc,
    Bcc,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipient {
    pub email: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: RecipientKind,
}

impl Recipient {
    pub fn to(email: impl Into<String>, name: impl Into<String>) -> Self {
        Self { email: email.into(), name: name.into(), kind: RecipientKind::To }
    }
}

/// Event handed to the external email-integration service after a
/// successful approve or reject. Template resolution and delivery are the
/// integration's concern; this side only guarantees the event fires exactly
/// once per successful transition and never on failure or reset.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationEvent {
    pub trigger_event: String,
    pub entity_type: EntityType,
    pub entity_id: i64,
    pub variables: BTreeMap<String, String>,
    pub recipients: Vec<Recipient>,
}

impl NotificationEvent {
    pub fn approved(entity_type: EntityType, entity_id: i64) -> Self {
        Self::new(entity_type.approved_event(), entity_type, entity_id)
    }

    pub fn rejected(entity_type: EntityType, entity_id: i64) -> Self {
        Self::new(entity_type.rejected_event(), entity_type, entity_id)
    }

    /// For trigger events outside the approve/reject pair (status change,
    /// renewal).
    pub fn custom(trigger_event: &str, entity_type: EntityType, entity_id: i64) -> Self {
        Self::new(trigger_event, entity_type, entity_id)
    }

    fn new(trigger_event: &str, entity_type: EntityType, entity_id: i64) -> Self {
        Self {
            trigger_event: trigger_event.to_owned(),
            entity_type,
            entity_id,
            variables: BTreeMap::new(),
            recipients: Vec::new(),
        }
    }

    pub fn with_variable(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.variables.insert(key.into(), value.into());
        self
    }

    pub fn with_recipient(mut self, recipient: Recipient) -> Self {
        self.recipients.push(recipient);
        self
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum NotifyError {
    #[error("notification delivery failed: {0}")]
    Delivery(String),
}

#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn deliver(&self, event: NotificationEvent) -> Result<(), NotifyError>;
}

/// Test double capturing delivered events in order.
#[derive(Clone, Default)]
pub struct InMemoryNotificationSink {
    events: Arc<Mutex<Vec<NotificationEvent>>>,
}

impl InMemoryNotificationSink {
    pub fn events(&self) -> Vec<NotificationEvent> {
        match self.events.lock() {
            Ok(events) => events.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

#[async_trait]
impl NotificationSink for InMemoryNotificationSink {
    async fn deliver(&self, event: NotificationEvent) -> Result<(), NotifyError> {
        match self.events.lock() {
            Ok(mut events) => events.push(event),
            Err(poisoned) => poisoned.into_inner().push(event),
        }
        Ok(())
    }
}
