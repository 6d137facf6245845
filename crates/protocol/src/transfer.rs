//! Host-to-device data transfer.
//!
//! ```text
//! host:   14 [size:u32be]          15 [len:u16be] [payload] ...   16
//! device:                  17                               17       17
//! ```

use crate::control::ACK;
use crate::error::{ProtocolError, Result, Stage};
use crate::frame;
use crate::transport::Transport;

/// Progress of a running transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    /// Bytes acknowledged so far
    pub sent: usize,
    /// Total bytes in the transfer
    pub total: usize,
    /// Packets acknowledged so far
    pub packets: usize,
}

/// Outcome of a completed transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize)]
pub struct TransferSummary {
    /// Payload bytes delivered
    pub bytes: usize,
    /// Packets delivered
    pub packets: usize,
}

/// Send `data` to the device, waiting for an ACK after the header, every
/// packet, and the end marker.
pub fn send_data<T, F>(
    transport: &mut T,
    data: &[u8],
    packet_size: usize,
    mut on_progress: F,
) -> Result<TransferSummary>
where
    T: Transport + ?Sized,
    F: FnMut(Progress),
{
    let packets = frame::chunks(data, packet_size)?;
    let total = data.len();

    transport.send(&frame::data_header(total)?)?;
    expect_ack(transport, Stage::Header)?;
    tracing::debug!(total, packet_size, "Data header acknowledged");

    let mut sent = 0;
    let mut count = 0;
    for (index, packet) in packets.enumerate() {
        transport.send(&frame::packet_header(packet.len())?)?;
        transport.send(packet)?;
        tracing::debug!(index, len = packet.len(), "Sending packet of data");

        expect_ack(transport, Stage::Packet { index })?;

        sent += packet.len();
        count += 1;
        on_progress(Progress {
            sent,
            total,
            packets: count,
        });
    }

    transport.send(&frame::end_of_data())?;
    expect_ack(transport, Stage::End)?;

    Ok(TransferSummary {
        bytes: sent,
        packets: count,
    })
}

fn expect_ack<T: Transport + ?Sized>(transport: &mut T, stage: Stage) -> Result<()> {
    match transport.recv_byte()? {
        Some(ACK) => Ok(()),
        Some(byte) => {
            tracing::warn!(%stage, byte, "Expecting ACK but got another byte instead");
            Err(ProtocolError::Rejected { stage, byte })
        }
        None => Err(ProtocolError::Timeout { stage }),
    }
}
