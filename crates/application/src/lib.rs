//! Application services and ports.

#![forbid(unsafe_code)]

mod purge_service;
mod suppression_ports;

pub use purge_service::{
    DeletionOutcome, DeletionStatus, PurgePlan, PurgeReport, PurgeRequest, PurgeService,
};
pub use suppression_ports::SuppressionGateway;
