pub mod approval;
pub mod contract;
pub mod customer;
pub mod invoice;
pub mod status;
pub mod termination;
pub mod voucher;
