pub mod config;
pub mod domain;
pub mod errors;
pub mod gate;
pub mod notify;

pub use config::{AppConfig, ConfigError, ConfigOverrides, LoadOptions, LogFormat};
pub use domain::approval::ApprovalState;
pub use domain::contract::{AdditionalCharge, Contract, ContractId, ContractUnit};
pub use domain::customer::{Customer, CustomerId};
pub use domain::invoice::{ContractInvoice, ContractInvoiceId};
pub use domain::status::{
    ApprovalStatus, ContractStatus, EntityType, InvoiceStatus, VoucherStatus,
};
pub use domain::termination::{ContractTermination, ContractTerminationId};
pub use domain::voucher::{PettyCashVoucher, PettyCashVoucherId};
pub use errors::{ApprovalError, DomainError, GuardError};
pub use gate::{
    authorize_transition, can_delete, can_edit, can_post, guard_mutation, partition_eligible,
    validate_rejection_reason, validate_reversal, Approvable, AuthContext, BulkAction, BulkPlan,
    MutationKind, Role, StatusSnapshot,
};
pub use notify::{
    InMemoryNotificationSink, NotificationEvent, NotificationSink, NotifyError, Recipient,
    RecipientKind,
};
