use std::io::{ErrorKind, Read};

use tracing::trace;

use crate::codec::{decode_packet, unpack_int, Packet, INT_SIZE, MAX_PACKET_SIZE, MIN_PACKET_SIZE};
use crate::error::{PacketError, Result};
use crate::mode::{mode_name, Direction};

/// Read one complete packet from `src` (blocking).
///
/// Partial reads are accumulated until the declared size is satisfied. The
/// declared size is bounds-checked before anything is allocated for it.
///
/// Returns `Err(PacketError::ConnectionClosed)` when the stream ends before
/// or inside the packet payload.
pub fn read_packet<R: Read>(src: &mut R) -> Result<Packet> {
    let mut tag = [0u8; INT_SIZE];
    match read_full(src, &mut tag, 0, INT_SIZE)? {
        0 => return Err(PacketError::ConnectionClosed),
        INT_SIZE => {}
        read => return Err(PacketError::SizeTagUnreadable { read }),
    }

    let size = unpack_int(tag);
    if size > MAX_PACKET_SIZE {
        return Err(PacketError::SizeOverflow {
            size,
            max: MAX_PACKET_SIZE,
        });
    }
    if size < MIN_PACKET_SIZE {
        return Err(PacketError::SizeUnderflow {
            size,
            min: MIN_PACKET_SIZE,
        });
    }

    let len = size as usize;
    let mut payload = vec![0u8; len];
    if read_full(src, &mut payload, INT_SIZE, INT_SIZE + len)? != len {
        return Err(PacketError::ConnectionClosed);
    }

    let packet = decode_packet(size, &payload)?;
    trace!(
        size,
        request_id = packet.request_id(),
        mode = mode_name(packet.mode(), Direction::Incoming),
        "received packet"
    );
    Ok(packet)
}

/// Fill `buf` from `src`, stopping early only at end of stream.
///
/// `consumed` counts packet bytes already read before `buf`. A deadline that
/// expires once any byte of the packet is in hand is [`PacketError::Truncated`].
fn read_full<R: Read>(
    src: &mut R,
    buf: &mut [u8],
    consumed: usize,
    expected: usize,
) -> Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match src.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) if is_deadline(&err) && consumed + filled > 0 => {
                return Err(PacketError::Truncated {
                    read: consumed + filled,
                    expected,
                })
            }
            Err(err) => return Err(PacketError::Io(err)),
        }
    }
    Ok(filled)
}

fn is_deadline(err: &std::io::Error) -> bool {
    matches!(err.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut)
}
