pub mod reader;
pub mod writer;

pub use reader::ReaderError;
pub use writer::WriterError;

/// Maximum size of a DNS datagram on the UDP path.
pub const DATAGRAM_SIZE: usize = 512;

/// Size of the fixed message header.
pub const HEADER_SIZE: usize = 12;

pub struct BytePacketBuffer {
    pub buf: [u8; DATAGRAM_SIZE],
    pub pos: usize,
}

impl Default for BytePacketBuffer {
    /// This gives us a fresh buffer for holding the packet contents, and a
    /// field for keeping track of where we are.
    fn default() -> Self {
        BytePacketBuffer {
            buf: [0; DATAGRAM_SIZE],
            pos: 0,
        }
    }
}

impl BytePacketBuffer {
    /// Wraps an already received datagram, cursor at the start.
    pub fn new(buf: [u8; DATAGRAM_SIZE]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Current position within buffer
    pub fn pos(&self) -> usize {
        self.pos
    }
}
