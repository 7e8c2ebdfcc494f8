//! UDP prober speaking the fixed login handshake.

use crate::probe::{
    domain::{
        FAKE_LOGIN_PACKET, MAX_REPLY_SIZE, NetworkError, ProbeFailure, ProbePhase, ProbeReport,
        ProbeTarget, is_accepted_reply,
    },
    ports::Prober,
};
use async_trait::async_trait;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};
use std::time::{Duration, Instant};
use tokio::net::{UdpSocket, lookup_host};
use tokio::time;
use tracing::debug;

/// Prober that sends [`FAKE_LOGIN_PACKET`] over UDP and waits for one reply.
///
/// Each attempt uses a fresh ephemeral socket that is dropped when the
/// attempt ends, whether it succeeded or timed out.
#[derive(Debug, Clone, Copy, Default)]
pub struct UdpProber;

impl UdpProber {
    /// Creates a UDP prober.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    async fn exchange(target: &ProbeTarget, timeout: Duration) -> Result<usize, NetworkError> {
        let remote = resolve(target, timeout).await?;
        let local = if remote.is_ipv4() {
            SocketAddr::from((Ipv4Addr::UNSPECIFIED, 0))
        } else {
            SocketAddr::from((Ipv6Addr::UNSPECIFIED, 0))
        };

        let socket = UdpSocket::bind(local)
            .await
            .map_err(|err| NetworkError::from_io(ProbePhase::Bind, &err))?;
        socket
            .connect(remote)
            .await
            .map_err(|err| NetworkError::from_io(ProbePhase::Connect, &err))?;

        time::timeout(timeout, socket.send(&FAKE_LOGIN_PACKET))
            .await
            .map_err(|_| NetworkError::Timeout {
                phase: ProbePhase::Send,
            })?
            .map_err(|err| NetworkError::from_io(ProbePhase::Send, &err))?;

        let mut reply = [0_u8; MAX_REPLY_SIZE];
        let received = time::timeout(timeout, socket.recv(&mut reply))
            .await
            .map_err(|_| NetworkError::Timeout {
                phase: ProbePhase::Receive,
            })?
            .map_err(|err| NetworkError::from_io(ProbePhase::Receive, &err))?;

        Ok(received)
    }
}

#[async_trait]
impl Prober for UdpProber {
    async fn probe(&self, target: &ProbeTarget, timeout: Duration) -> ProbeReport {
        let started = Instant::now();
        let result = Self::exchange(target, timeout).await;
        let rtt = started.elapsed();

        match result {
            Ok(received) if is_accepted_reply(received) => {
                debug!(%target, received, rtt_ms = rtt.as_millis(), "probe reply accepted");
                ProbeReport::up(rtt)
            }
            Ok(received) => {
                debug!(%target, received, "probe reply has unexpected length");
                ProbeReport::failed(rtt, ProbeFailure::ProtocolMismatch { received })
            }
            Err(err) => {
                debug!(%target, error = %err, "probe failed");
                ProbeReport::failed(rtt, err)
            }
        }
    }
}

async fn resolve(target: &ProbeTarget, timeout: Duration) -> Result<SocketAddr, NetworkError> {
    let mut addresses = time::timeout(timeout, lookup_host((target.host(), target.port())))
        .await
        .map_err(|_| NetworkError::Timeout {
            phase: ProbePhase::Resolve,
        })?
        .map_err(|err| NetworkError::from_io(ProbePhase::Resolve, &err))?;

    addresses.next().ok_or_else(|| NetworkError::NoAddress {
        host: target.host().to_owned(),
    })
}
