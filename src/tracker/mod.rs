//! Server roster tracking, status recording and uptime aggregation.
//!
//! A tracked server is identified by the stable GUID published in the
//! roster. Each update cycle reconciles the roster into persisted server
//! records, probes every listed server and appends one status sample per
//! server. Uptime rollups are computed on demand from those samples. The
//! module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
