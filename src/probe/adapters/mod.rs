//! Adapter implementations for the prober port.

mod scripted;
mod udp;

pub use scripted::ScriptedProber;
pub use udp::UdpProber;
