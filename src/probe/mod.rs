//! Liveness probing for game servers that speak the fixed UDP login
//! handshake.
//!
//! The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]: the handshake payload, probe targets,
//!   probe reports and liveness classification
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]: the UDP prober and a scripted
//!   prober for deterministic runs
//! - Orchestration services in [`services`]: the retry policy

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
