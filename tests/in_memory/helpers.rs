//! Shared fixtures for in-memory integration tests.

use crate::test_helpers::{FixedClock, at_secs};
use rstest::fixture;
use server_tracker::probe::domain::ProbeTarget;
use server_tracker::tracker::adapters::memory::InMemoryTrackerStore;
use std::sync::Arc;
use tokio::net::UdpSocket;
use tokio::task::JoinHandle;

/// Provides an empty shared store.
#[fixture]
pub fn store() -> Arc<InMemoryTrackerStore> {
    Arc::new(InMemoryTrackerStore::new())
}

/// Clock fixed at `seconds` past the epoch.
pub fn clock_at(seconds: i64) -> Arc<FixedClock> {
    Arc::new(FixedClock::at(at_secs(seconds)))
}

/// Binds a loopback UDP server that answers every datagram with
/// `reply_length` bytes until the returned handle is aborted.
pub async fn spawn_responder(reply_length: usize) -> (ProbeTarget, JoinHandle<()>) {
    let socket = UdpSocket::bind("127.0.0.1:0")
        .await
        .expect("responder should bind");
    let port = socket
        .local_addr()
        .expect("responder should have an address")
        .port();
    let handle = tokio::spawn(async move {
        let mut buffer = [0_u8; 512];
        let reply = vec![0x5A_u8; reply_length];
        while let Ok((_, peer)) = socket.recv_from(&mut buffer).await {
            if socket.send_to(&reply, peer).await.is_err() {
                break;
            }
        }
    });
    (ProbeTarget::new("127.0.0.1", port), handle)
}

/// Returns a loopback UDP port with nothing listening on it.
pub fn silent_port() -> u16 {
    let socket = std::net::UdpSocket::bind("127.0.0.1:0").expect("bind probe port");
    socket.local_addr().expect("local address").port()
}
