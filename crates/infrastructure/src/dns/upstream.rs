//! UDP forwarding to the host's upstream nameserver.
//!
//! The query is relayed in wire form and the response returned
//! verbatim; no rewriting happens here. Both directions sit under the
//! same fixed timeout so one slow upstream cannot stall the resolver.

use harbor_dns_domain::DomainError;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};
use std::time::Duration;
use tokio::net::UdpSocket;
use tokio::time::timeout;
use tracing::{debug, warn};

/// Maximum UDP DNS response size with EDNS(0).
const MAX_UDP_RESPONSE_SIZE: usize = 4096;

#[derive(Debug, Clone)]
pub struct UdpUpstream {
    server_addr: SocketAddr,
    timeout: Duration,
}

impl UdpUpstream {
    pub fn new(server_addr: SocketAddr, timeout: Duration) -> Self {
        Self {
            server_addr,
            timeout,
        }
    }

    pub fn server_addr(&self) -> SocketAddr {
        self.server_addr
    }

    /// Send one query and return the raw response bytes.
    pub async fn forward(&self, query: &[u8]) -> Result<Vec<u8>, DomainError> {
        let bind_addr: SocketAddr = if self.server_addr.is_ipv4() {
            (Ipv4Addr::UNSPECIFIED, 0).into()
        } else {
            (Ipv6Addr::UNSPECIFIED, 0).into()
        };
        let socket = UdpSocket::bind(bind_addr)
            .await
            .map_err(|e| DomainError::IoError(format!("Failed to bind UDP socket: {e}")))?;

        timeout(self.timeout, socket.send_to(query, self.server_addr))
            .await
            .map_err(|_| DomainError::UpstreamTimeout)?
            .map_err(|e| {
                DomainError::UpstreamError(format!(
                    "Failed to send query to {}: {e}",
                    self.server_addr
                ))
            })?;

        let mut buf = vec![0u8; MAX_UDP_RESPONSE_SIZE];
        let (received, from_addr) = timeout(self.timeout, socket.recv_from(&mut buf))
            .await
            .map_err(|_| DomainError::UpstreamTimeout)?
            .map_err(|e| {
                DomainError::UpstreamError(format!(
                    "Failed to receive response from {}: {e}",
                    self.server_addr
                ))
            })?;

        if from_addr.ip() != self.server_addr.ip() {
            warn!(
                expected = %self.server_addr,
                received_from = %from_addr,
                "UDP response from unexpected source"
            );
        }

        buf.truncate(received);
        debug!(
            server = %self.server_addr,
            bytes = received,
            "Upstream response received"
        );
        Ok(buf)
    }
}
