//! Size-prefixed packet framing for the RCON protocol.
//!
//! Every packet on the wire is:
//! - a 4-byte little-endian size (bytes that follow the size field)
//! - a 4-byte little-endian request id
//! - a 4-byte little-endian mode
//! - two null-terminated strings, the second conventionally empty
//!
//! There is no end-of-reply marker; the session layer decides when a
//! multi-packet reply is over.

pub mod codec;
pub mod error;
pub mod mode;
pub mod reader;
pub mod writer;

pub use codec::{
    decode_packet, encode_packet, from_asciiz, pack_int, to_asciiz, unpack_int, Packet,
    AUTH_FAILED_ID, END_PACKET_SIZE, HEADER_SIZE, INT_SIZE, MAX_PACKET_SIZE, MIN_PACKET_SIZE,
};
pub use error::{PacketError, Result};
pub use mode::{
    mode_name, Direction, SERVERDATA_AUTH, SERVERDATA_AUTH_RESPONSE, SERVERDATA_EXECCOMMAND,
    SERVERDATA_RESPONSE_VALUE,
};
pub use reader::read_packet;
pub use writer::write_packet;
