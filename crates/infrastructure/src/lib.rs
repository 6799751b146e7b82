//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod http_suppression_gateway;

pub use http_suppression_gateway::HttpSuppressionGateway;
