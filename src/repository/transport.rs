use rootwalk_proto::buffer::BytePacketBuffer;
use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};
use std::time::{Duration, Instant};
use tokio::net::UdpSocket;

const DNS_PORT: u16 = 53;

#[derive(Debug, serde::Deserialize)]
pub struct Config {
    /// seconds to wait for a reply before giving up on a server
    #[serde(default = "Config::default_timeout")]
    timeout: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            timeout: Self::default_timeout(),
        }
    }
}

impl Config {
    fn default_timeout() -> u64 {
        3
    }
}

impl Config {
    pub fn build(self) -> UdpExchangeService {
        UdpExchangeService {
            timeout: Duration::from_secs(self.timeout),
        }
    }
}

/// One completed upstream round trip.
pub struct Exchange {
    pub buffer: BytePacketBuffer,
    pub size: usize,
    pub rtt: Duration,
}

/// A single datagram out, at most a single datagram back. Whether another
/// server should be tried is the caller's decision.
#[async_trait::async_trait]
pub trait ExchangeService {
    async fn exchange(&self, server: Ipv4Addr, query: &[u8]) -> Option<Exchange>;
}

pub struct UdpExchangeService {
    timeout: Duration,
}

impl UdpExchangeService {
    async fn try_exchange(
        &self,
        server: Ipv4Addr,
        query: &[u8],
    ) -> std::io::Result<Option<(BytePacketBuffer, usize)>> {
        // fresh endpoint per call, released on every exit path
        let socket = UdpSocket::bind(SocketAddr::from((Ipv4Addr::UNSPECIFIED, 0))).await?;
        socket
            .send_to(query, SocketAddrV4::new(server, DNS_PORT))
            .await?;

        let mut response = BytePacketBuffer::default();
        match tokio::time::timeout(self.timeout, socket.recv_from(&mut response.buf)).await {
            Ok(Ok((size, _))) => Ok(Some((response, size))),
            Ok(Err(error)) => Err(error),
            Err(_) => Ok(None),
        }
    }
}

#[async_trait::async_trait]
impl ExchangeService for UdpExchangeService {
    #[tracing::instrument(skip(self, query))]
    async fn exchange(&self, server: Ipv4Addr, query: &[u8]) -> Option<Exchange> {
        let started = Instant::now();
        match self.try_exchange(server, query).await {
            Ok(Some((buffer, size))) => {
                let rtt = started.elapsed();
                tracing::debug!("received {size} bytes from {server} in {rtt:?}");
                Some(Exchange { buffer, size, rtt })
            }
            Ok(None) => {
                tracing::debug!("no reply from {server} within {:?}", self.timeout);
                None
            }
            Err(error) => {
                tracing::debug!("exchange with {server} failed: {error:?}");
                None
            }
        }
    }
}

#[cfg(test)]
pub use mock::MockExchangeService;
