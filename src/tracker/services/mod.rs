//! Service layer for roster reconciliation, status recording and uptime
//! rollups.

mod cycle;
mod error;
mod reconciler;
mod recorder;
mod sweep;
mod uptime;

pub use cycle::{CycleError, CycleReport, UpdateCycle};
pub use error::{TrackerServiceError, TrackerServiceResult};
pub use reconciler::RosterReconciler;
pub use recorder::{RecordingFailure, RecordingReport, StatusRecorder};
pub use sweep::{RosterSweep, SweepResult};
pub use uptime::UptimeAggregator;
