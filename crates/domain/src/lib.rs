//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod limit;
mod suppression;

pub use limit::DeletionLimit;
pub use suppression::Suppression;
