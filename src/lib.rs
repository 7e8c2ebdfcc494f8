//! Server tracker: liveness probing and uptime history for UDP game servers.
//!
//! The crate probes servers that speak one fixed UDP login handshake, keeps
//! a persisted server set in step with an externally published roster,
//! appends a status sample per server per update cycle and rolls the
//! resulting history up into per-day uptime and round-trip time figures.
//!
//! # Architecture
//!
//! Each bounded context follows hexagonal architecture:
//!
//! - **Domain**: value types and invariants with no I/O
//! - **Ports**: async trait seams for probing, persistence and roster input
//! - **Adapters**: UDP, SQLite, in-memory and file-backed implementations
//! - **Services**: orchestration over the ports
//!
//! # Modules
//!
//! - [`probe`]: the handshake, single-attempt probing and the retry policy
//! - [`tracker`]: reconciliation, status recording, sweeps and uptime rollups
//! - [`settings`]: layered configuration
//! - [`telemetry`]: tracing subscriber setup

pub mod probe;
pub mod settings;
pub mod telemetry;
pub mod tracker;
