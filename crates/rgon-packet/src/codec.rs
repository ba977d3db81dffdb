use bytes::{Buf, BufMut, BytesMut};

use crate::error::{PacketError, Result};

/// Width of every integer field on the wire.
pub const INT_SIZE: usize = 4;

/// Request id + mode, the fixed part of the payload after the size field.
pub const HEADER_SIZE: usize = 2 * INT_SIZE;

/// Smallest legal declared size: header plus two empty strings.
pub const MIN_PACKET_SIZE: i32 = 10;

/// Largest legal declared size.
pub const MAX_PACKET_SIZE: i32 = 8202;

/// Reply packets declared smaller than this are taken to be the last fragment.
pub const END_PACKET_SIZE: i32 = 2500;

/// Request id the server returns in an auth response when the password is wrong.
pub const AUTH_FAILED_ID: i32 = -1;

/// Little-endian bytes of `i`.
pub fn pack_int(i: i32) -> [u8; INT_SIZE] {
    i.to_le_bytes()
}

/// Integer from little-endian bytes.
pub fn unpack_int(bytes: [u8; INT_SIZE]) -> i32 {
    i32::from_le_bytes(bytes)
}

/// `s` followed by a single zero byte.
pub fn to_asciiz(s: &str) -> Vec<u8> {
    let mut buf = Vec::with_capacity(s.len() + 1);
    buf.extend_from_slice(s.as_bytes());
    buf.push(0);
    buf
}

/// Parse one null-terminated string from the front of `buf`.
///
/// Returns the text before the first zero byte and that byte's index. When
/// there is no terminator the whole buffer comes back with `None`; callers
/// should treat that as running off the end of the input.
pub fn from_asciiz(buf: &[u8]) -> (String, Option<usize>) {
    match buf.iter().position(|&b| b == 0) {
        Some(end) => (String::from_utf8_lossy(&buf[..end]).into_owned(), Some(end)),
        None => (String::from_utf8_lossy(buf).into_owned(), None),
    }
}

/// One packet of the RCON exchange.
///
/// Built fresh for every send and receive and never modified afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    size: i32,
    request_id: i32,
    mode: i32,
    body: String,
    body2: String,
}

impl Packet {
    /// Create an outgoing packet with an empty second string.
    pub fn new(request_id: i32, mode: i32, body: impl Into<String>) -> Self {
        Self::with_bodies(request_id, mode, body, String::new())
    }

    /// Create a packet with both strings set.
    pub fn with_bodies(
        request_id: i32,
        mode: i32,
        body: impl Into<String>,
        body2: impl Into<String>,
    ) -> Self {
        let body = body.into();
        let body2 = body2.into();
        let size = HEADER_SIZE + body.len() + 1 + body2.len() + 1;
        Self {
            size: i32::try_from(size).unwrap_or(i32::MAX),
            request_id,
            mode,
            body,
            body2,
        }
    }

    /// Declared size: everything after the size field.
    pub fn size(&self) -> i32 {
        self.size
    }

    pub fn request_id(&self) -> i32 {
        self.request_id
    }

    pub fn mode(&self) -> i32 {
        self.mode
    }

    /// The first string, which carries command text and reply output.
    pub fn body(&self) -> &str {
        &self.body
    }

    /// The second string, conventionally empty.
    pub fn body2(&self) -> &str {
        &self.body2
    }

    /// True when both strings are empty.
    pub fn is_empty(&self) -> bool {
        self.body.is_empty() && self.body2.is_empty()
    }

    /// Bytes on the wire including the size field.
    pub fn wire_size(&self) -> usize {
        INT_SIZE + HEADER_SIZE + self.body.len() + 1 + self.body2.len() + 1
    }
}

/// Encode a packet into the wire format.
///
/// ```text
/// ┌───────────┬────────────┬──────────┬──────────────┬──────────────┐
/// │ Size      │ Request id │ Mode     │ Body         │ Body2        │
/// │ (4B LE)   │ (4B LE)    │ (4B LE)  │ bytes + 0x00 │ bytes + 0x00 │
/// └───────────┴────────────┴──────────┴──────────────┴──────────────┘
/// ```
pub fn encode_packet(packet: &Packet, dst: &mut BytesMut) {
    dst.reserve(packet.wire_size());
    dst.put_i32_le(packet.size);
    dst.put_i32_le(packet.request_id);
    dst.put_i32_le(packet.mode);
    dst.put_slice(&to_asciiz(&packet.body));
    dst.put_slice(&to_asciiz(&packet.body2));
}

/// Assemble a packet from the `size` bytes that followed its size tag.
///
/// A missing terminator on either string is tolerated: the text runs to the
/// end of the payload and any remaining string is empty.
pub fn decode_packet(size: i32, payload: &[u8]) -> Result<Packet> {
    if payload.len() < HEADER_SIZE {
        return Err(PacketError::SizeUnderflow {
            size,
            min: MIN_PACKET_SIZE,
        });
    }

    let mut header = &payload[..HEADER_SIZE];
    let request_id = header.get_i32_le();
    let mode = header.get_i32_le();

    let strings = &payload[HEADER_SIZE..];
    let (body, end) = from_asciiz(strings);
    let body2 = match end {
        Some(end) => from_asciiz(&strings[end + 1..]).0,
        None => String::new(),
    };

    Ok(Packet {
        size,
        request_id,
        mode,
        body,
        body2,
    })
}
