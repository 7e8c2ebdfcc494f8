//! Port contracts for liveness probing.

mod prober;

pub use prober::Prober;
