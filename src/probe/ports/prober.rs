//! Prober port for single handshake attempts.

use crate::probe::domain::{ProbeReport, ProbeTarget};
use async_trait::async_trait;
use std::time::Duration;

/// Performs one liveness handshake against a target.
///
/// Implementations never fail: every transport or protocol problem is
/// reported through [`ProbeReport::failure`]. The call must return within
/// roughly `timeout` per network phase.
#[async_trait]
pub trait Prober: Send + Sync {
    /// Sends the handshake to `target` and classifies the reply.
    async fn probe(&self, target: &ProbeTarget, timeout: Duration) -> ProbeReport;
}
