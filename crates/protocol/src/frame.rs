//! Byte framing for commands and data transfers.

use crate::control::{COMMAND_END, COMMAND_START, END_OF_DATA, START_OF_DATA, START_OF_PACKET};
use crate::error::{ProtocolError, Result};

/// Largest payload carried by one packet unless configured otherwise.
pub const DEFAULT_PACKET_SIZE: usize = 8192;

/// Frame a command name: `COMMAND_START`, ASCII name, `COMMAND_END`.
///
/// Names must be non-empty printable ASCII so they cannot collide with
/// control bytes.
pub fn command_frame(name: &str) -> Result<Vec<u8>> {
    if name.is_empty() || !name.bytes().all(|b| (0x20..=0x7e).contains(&b)) {
        return Err(ProtocolError::InvalidCommandName(name.to_string()));
    }

    let mut frame = Vec::with_capacity(name.len() + 2);
    frame.push(COMMAND_START);
    frame.extend_from_slice(name.as_bytes());
    frame.push(COMMAND_END);
    Ok(frame)
}

/// `START_OF_DATA` followed by the total size as a big-endian `u32`.
pub fn data_header(total: usize) -> Result<[u8; 5]> {
    let size = u32::try_from(total).map_err(|_| ProtocolError::PayloadTooLarge(total))?;
    let [b0, b1, b2, b3] = size.to_be_bytes();
    Ok([START_OF_DATA, b0, b1, b2, b3])
}

/// `START_OF_PACKET` followed by the packet size as a big-endian `u16`.
pub fn packet_header(len: usize) -> Result<[u8; 3]> {
    let size = u16::try_from(len).map_err(|_| ProtocolError::InvalidPacketSize(len))?;
    let [hi, lo] = size.to_be_bytes();
    Ok([START_OF_PACKET, hi, lo])
}

/// The end-of-data marker.
pub fn end_of_data() -> [u8; 1] {
    [END_OF_DATA]
}

/// Packet sizes must fit the `u16` length field and be non-zero.
pub fn check_packet_size(packet_size: usize) -> Result<()> {
    if packet_size == 0 || packet_size > usize::from(u16::MAX) {
        return Err(ProtocolError::InvalidPacketSize(packet_size));
    }
    Ok(())
}

/// Validate a packet size and split `data` into packets of at most that size.
pub fn chunks(data: &[u8], packet_size: usize) -> Result<std::slice::Chunks<'_, u8>> {
    check_packet_size(packet_size)?;
    Ok(data.chunks(packet_size))
}
