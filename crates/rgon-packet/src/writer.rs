use std::io::{ErrorKind, Write};

use bytes::BytesMut;
use tracing::trace;

use crate::codec::{encode_packet, Packet, MAX_PACKET_SIZE};
use crate::error::{PacketError, Result};
use crate::mode::{mode_name, Direction};

/// Write one complete packet to `sink` (blocking).
///
/// The packet is encoded into a single buffer and written until the sink has
/// taken all of it. A sink that stops accepting bytes (a zero-length write)
/// leaves the stream mid-packet, which is reported as
/// [`PacketError::ShortWrite`].
pub fn write_packet<W: Write>(packet: &Packet, sink: &mut W) -> Result<()> {
    if packet.size() > MAX_PACKET_SIZE {
        return Err(PacketError::SizeOverflow {
            size: packet.size(),
            max: MAX_PACKET_SIZE,
        });
    }

    let mut buf = BytesMut::with_capacity(packet.wire_size());
    encode_packet(packet, &mut buf);

    let mut offset = 0usize;
    while offset < buf.len() {
        match sink.write(&buf[offset..]) {
            Ok(0) => {
                return Err(PacketError::ShortWrite {
                    written: offset,
                    expected: buf.len(),
                })
            }
            Ok(n) => offset += n,
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => return Err(PacketError::Io(err)),
        }
    }

    loop {
        match sink.flush() {
            Ok(()) => break,
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => return Err(PacketError::Io(err)),
        }
    }

    trace!(
        size = packet.size(),
        request_id = packet.request_id(),
        mode = mode_name(packet.mode(), Direction::Outgoing),
        "sent packet"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::mode::{SERVERDATA_AUTH, SERVERDATA_EXECCOMMAND};
    use crate::reader::read_packet;

    #[test]
    fn write_single_packet() {
        let mut sink = Cursor::new(Vec::<u8>::new());
        let packet = Packet::new(1, SERVERDATA_AUTH, "secret");
        write_packet(&packet, &mut sink).unwrap();

        let bytes = sink.into_inner();
        assert_eq!(bytes.len(), packet.wire_size());
        assert_eq!(read_packet(&mut Cursor::new(bytes)).unwrap(), packet);
    }

    #[test]
    #[cfg(unix)]
    fn write_then_read_over_socket_pair() {
        let (mut left, mut right) = std::os::unix::net::UnixStream::pair().unwrap();
        let packet = Packet::new(42, SERVERDATA_EXECCOMMAND, "echo \"quoted; text\"");

        write_packet(&packet, &mut left).unwrap();
        assert_eq!(read_packet(&mut right).unwrap(), packet);
    }

    #[test]
    fn partial_writes_are_continued() {
        let mut sink = Trickle {
            per_call: 6,
            capacity: usize::MAX,
            inner: Vec::new(),
        };
        let packet = Packet::new(1, SERVERDATA_EXECCOMMAND, "x".repeat(8000));
        write_packet(&packet, &mut sink).unwrap();

        assert_eq!(sink.inner.len(), packet.wire_size());
        assert_eq!(read_packet(&mut Cursor::new(sink.inner)).unwrap(), packet);
    }

    #[test]
    fn sink_that_stops_accepting_is_short_write() {
        let mut sink = Trickle {
            per_call: 4,
            capacity: 6,
            inner: Vec::new(),
        };
        let err = write_packet(&Packet::new(1, SERVERDATA_EXECCOMMAND, "status"), &mut sink)
            .unwrap_err();
        assert!(matches!(
            err,
            PacketError::ShortWrite {
                written: 6,
                expected: 20
            }
        ));
    }

    #[test]
    fn zero_length_write_is_short() {
        let mut sink = Trickle {
            per_call: 8,
            capacity: 0,
            inner: Vec::new(),
        };
        let err = write_packet(&Packet::new(1, SERVERDATA_AUTH, ""), &mut sink).unwrap_err();
        assert!(matches!(err, PacketError::ShortWrite { written: 0, .. }));
    }

    #[test]
    fn oversized_command_rejected_before_writing() {
        let mut sink = Cursor::new(Vec::<u8>::new());
        let packet = Packet::new(1, SERVERDATA_EXECCOMMAND, "x".repeat(9000));
        let err = write_packet(&packet, &mut sink).unwrap_err();

        assert!(matches!(err, PacketError::SizeOverflow { .. }));
        assert!(sink.into_inner().is_empty());
    }

    #[test]
    fn io_error_propagates_unchanged() {
        let packet = Packet::new(1, SERVERDATA_AUTH, "pw");
        let err = write_packet(&packet, &mut BrokenPipe).unwrap_err();
        assert!(matches!(err, PacketError::Io(e) if e.kind() == ErrorKind::BrokenPipe));
    }

    #[test]
    fn interrupted_write_retries() {
        let mut sink = InterruptedOnce {
            interrupted: false,
            inner: Vec::new(),
        };
        let packet = Packet::new(5, SERVERDATA_EXECCOMMAND, "users");
        write_packet(&packet, &mut sink).unwrap();
        assert_eq!(sink.inner.len(), packet.wire_size());
    }

    /// Takes at most `per_call` bytes per write and `capacity` bytes overall.
    struct Trickle {
        per_call: usize,
        capacity: usize,
        inner: Vec<u8>,
    }

    impl Write for Trickle {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            let room = self.capacity.saturating_sub(self.inner.len());
            let n = buf.len().min(self.per_call).min(room);
            self.inner.extend_from_slice(&buf[..n]);
            Ok(n)
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::from(ErrorKind::BrokenPipe))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    struct InterruptedOnce {
        interrupted: bool,
        inner: Vec<u8>,
    }

    impl Write for InterruptedOnce {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            if !self.interrupted {
                self.interrupted = true;
                return Err(std::io::Error::from(ErrorKind::Interrupted));
            }
            self.inner.write(buf)
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }
}
