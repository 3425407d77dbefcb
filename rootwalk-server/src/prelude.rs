use std::net::SocketAddr;

/// Maximum size of a DNS datagram over UDP; longer payloads are truncated
/// by the receive call, matching classic DNS behavior.
pub const DATAGRAM_SIZE: usize = 512;

pub struct Message {
    pub address: SocketAddr,
    pub buffer: [u8; DATAGRAM_SIZE],
    pub size: usize,
}
