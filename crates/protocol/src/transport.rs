//! Timed byte channel the protocol runs over.

use std::io::{ErrorKind, Read, Write};

/// A byte channel with a read timeout.
///
/// Every `std::io::Read + Write` is a transport, which covers open serial
/// ports as well as in-memory doubles.
pub trait Transport {
    /// Write all bytes.
    fn send(&mut self, bytes: &[u8]) -> std::io::Result<()>;

    /// Read one byte; `None` when the read timed out.
    fn recv_byte(&mut self) -> std::io::Result<Option<u8>>;
}

impl<T: Read + Write + ?Sized> Transport for T {
    fn send(&mut self, bytes: &[u8]) -> std::io::Result<()> {
        self.write_all(bytes)?;
        self.flush()
    }

    fn recv_byte(&mut self) -> std::io::Result<Option<u8>> {
        let mut buf = [0u8; 1];
        loop {
            match self.read(&mut buf) {
                Ok(1) => return Ok(Some(buf[0])),
                // Nothing arrived within the port timeout.
                Ok(_) => return Ok(None),
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) if matches!(e.kind(), ErrorKind::TimedOut | ErrorKind::WouldBlock) => {
                    return Ok(None);
                }
                Err(e) => return Err(e),
            }
        }
    }
}
