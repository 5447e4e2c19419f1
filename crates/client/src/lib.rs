//! HTTP client for the lease back-office API.
//!
//! The backend exposes one POST endpoint per resource that multiplexes
//! operations through a numeric mode field. This crate keeps that wire
//! shape confined to [`envelope`] and [`client`]; everything above speaks
//! typed requests and responses. Mutation guards and approval
//! authorization run locally before any network call, and the backend
//! re-enforces the same rules authoritatively.

pub mod client;
pub mod envelope;
pub mod export;
pub mod report;
pub mod services;
pub mod workflow;

pub use client::{ClientError, EnvelopeClient};
pub use envelope::{ModeRequest, WireEnvelope};
pub use report::{ReportArtifact, ReportClient};
pub use services::{
    ApprovalEndpoint, ApprovalTransport, ContractService, CustomerService, InvoiceService,
    LookupService, PendingApproval, TerminationService, VoucherService,
};
pub use workflow::{ApprovalWorkflow, BulkFailure, BulkOutcome};
