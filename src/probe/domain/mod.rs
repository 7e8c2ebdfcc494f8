//! Domain model for UDP liveness probes.
//!
//! Probe results are plain values: a failed probe is data, not an error that
//! unwinds the caller.

mod classification;
mod error;
mod packet;
mod report;
mod target;

pub use classification::LivenessClass;
pub use error::{NetworkError, ParseProbeTargetError, ProbeFailure, ProbePhase};
pub use packet::{ACCEPTED_REPLY_LENGTHS, FAKE_LOGIN_PACKET, MAX_REPLY_SIZE, is_accepted_reply};
pub use report::ProbeReport;
pub use target::ProbeTarget;
