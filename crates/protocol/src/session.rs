//! Command exchange with the device.
//!
//! The host frames a command name, the device answers with
//! `COMMAND_RESPONSE_BEGIN`, one or more status bytes (possibly asking for a
//! data transfer first), free text, and `COMMAND_RESPONSE_END`.

use crate::control::{COMMAND_RESPONSE_BEGIN, COMMAND_RESPONSE_END, NAK, Status};
use crate::error::{ProtocolError, Result, Stage};
use crate::frame::{self, DEFAULT_PACKET_SIZE};
use crate::transfer::{self, Progress, TransferSummary};
use crate::transport::Transport;
use serde::Serialize;

/// Command that uploads a snapshot into the picoFace.
pub const SNAPSHOT_UPLOAD: &str = "snapupload";

/// Final status reported by the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Success,
    Failure,
}

/// Result of one command exchange.
#[derive(Debug, Clone, Serialize)]
pub struct CommandReport {
    /// Command name sent
    pub command: String,
    /// Status reported by the device
    pub outcome: Outcome,
    /// Text the device sent before `COMMAND_RESPONSE_END`
    pub message: String,
    /// Totals across all transfers the device requested
    pub transferred: TransferSummary,
    /// Number of times the device asked for the payload
    pub transfers: usize,
}

impl CommandReport {
    /// Whether the device reported success
    pub fn succeeded(&self) -> bool {
        self.outcome == Outcome::Success
    }
}

/// Runs commands over a transport.
pub struct Session<'a, T: Transport + ?Sized> {
    transport: &'a mut T,
    packet_size: usize,
}

impl<'a, T: Transport + ?Sized> Session<'a, T> {
    pub fn new(transport: &'a mut T) -> Self {
        Self {
            transport,
            packet_size: DEFAULT_PACKET_SIZE,
        }
    }

    /// Use a different packet size for data transfers.
    pub fn with_packet_size(mut self, packet_size: usize) -> Self {
        self.packet_size = packet_size;
        self
    }

    /// Upload a snapshot with the `snapupload` command.
    pub fn upload_snapshot<F>(&mut self, data: &[u8], on_progress: F) -> Result<CommandReport>
    where
        F: FnMut(Progress),
    {
        self.run_command(SNAPSHOT_UPLOAD, Some(data), on_progress)
    }

    /// Send `name` and drive the exchange to `COMMAND_RESPONSE_END`.
    ///
    /// `payload` is sent each time the device asks for data.
    pub fn run_command<F>(
        &mut self,
        name: &str,
        payload: Option<&[u8]>,
        mut on_progress: F,
    ) -> Result<CommandReport>
    where
        F: FnMut(Progress),
    {
        let command = frame::command_frame(name)?;
        if let Some(data) = payload {
            // Fail before touching the device if the payload cannot be framed.
            frame::data_header(data.len())?;
            frame::check_packet_size(self.packet_size)?;
        }

        tracing::debug!(command = name, "Sending command");
        self.transport.send(&command)?;

        self.await_response_begin()?;

        let mut transferred = TransferSummary::default();
        let mut transfers = 0;
        let outcome = loop {
            let byte = self.read(Stage::Status)?;
            match Status::from_byte(byte) {
                Some(Status::ReceiveData) => {
                    let Some(data) = payload else {
                        self.transport.send(&[NAK])?;
                        return Err(ProtocolError::NoPayload);
                    };
                    let summary = transfer::send_data(
                        &mut *self.transport,
                        data,
                        self.packet_size,
                        &mut on_progress,
                    )?;
                    transferred.bytes += summary.bytes;
                    transferred.packets += summary.packets;
                    transfers += 1;
                }
                Some(Status::SendData) => {
                    self.transport.send(&[NAK])?;
                    tracing::warn!(command = name, "Unexpected COMMAND_SEND_DATA");
                    return Err(ProtocolError::UnsupportedSendData);
                }
                Some(Status::Success) => break Outcome::Success,
                Some(Status::Failure) => break Outcome::Failure,
                None => tracing::trace!(byte, "Ignoring byte while waiting for status"),
            }
        };

        let message = self.read_message()?;
        tracing::debug!(command = name, ?outcome, %message, "Command finished");

        Ok(CommandReport {
            command: name.to_string(),
            outcome,
            message,
            transferred,
            transfers,
        })
    }

    fn await_response_begin(&mut self) -> Result<()> {
        loop {
            let byte = self.read(Stage::ResponseBegin)?;
            if byte == COMMAND_RESPONSE_BEGIN {
                return Ok(());
            }
            tracing::trace!(byte, "Discarding byte before response");
        }
    }

    fn read_message(&mut self) -> Result<String> {
        let mut text = Vec::new();
        loop {
            let byte = self.read(Stage::ResponseText)?;
            if byte == COMMAND_RESPONSE_END {
                return Ok(String::from_utf8_lossy(&text).into_owned());
            }
            text.push(byte);
        }
    }

    fn read(&mut self, stage: Stage) -> Result<u8> {
        self.transport
            .recv_byte()?
            .ok_or(ProtocolError::Timeout { stage })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::{
        COMMAND_FAILURE, COMMAND_RECEIVE_DATA, COMMAND_SEND_DATA, COMMAND_SUCCESS,
    };
    use crate::testing::{FakeDevice, Reply};

    fn response(status: u8, text: &[u8]) -> Vec<u8> {
        let mut bytes = vec![status];
        bytes.extend_from_slice(text);
        bytes.push(COMMAND_RESPONSE_END);
        bytes
    }

    #[test]
    fn test_upload_snapshot_success() {
        let snapshot = vec![0xAAu8; 49_179];
        let mut device = FakeDevice::accepting();

        let report = Session::new(&mut device)
            .upload_snapshot(&snapshot, |_| {})
            .unwrap();

        assert!(report.succeeded());
        assert_eq!(report.command, "snapupload");
        assert_eq!(report.message, "Loaded");
        assert_eq!(report.transferred.bytes, 49_179);
        assert_eq!(report.transferred.packets, 7);
        assert_eq!(report.transfers, 1);
        assert_eq!(device.commands(), &["snapupload".to_string()]);
        assert_eq!(device.declared_total(), Some(49_179));
        assert_eq!(device.received_payload(), snapshot);
    }

    #[test]
    fn test_chatter_before_response_is_skipped() {
        let mut reply = b"booting...\r\n".to_vec();
        reply.extend_from_slice(&[COMMAND_RESPONSE_BEGIN, 0x00, COMMAND_RECEIVE_DATA]);
        let mut device = FakeDevice::accepting().with_command_reply(&reply);

        let report = Session::new(&mut device).upload_snapshot(b"snap", |_| {}).unwrap();
        assert!(report.succeeded());
        assert_eq!(device.received_payload(), b"snap");
    }

    #[test]
    fn test_device_failure_is_reported_not_raised() {
        let mut device = FakeDevice::accepting()
            .with_after_transfer(&response(COMMAND_FAILURE, b"Unsupported snapshot"));

        let report = Session::new(&mut device).upload_snapshot(b"bad", |_| {}).unwrap();

        assert!(!report.succeeded());
        assert_eq!(report.outcome, Outcome::Failure);
        assert_eq!(report.message, "Unsupported snapshot");
    }

    #[test]
    fn test_command_without_transfer() {
        let mut reply = vec![COMMAND_RESPONSE_BEGIN];
        reply.extend(response(COMMAND_SUCCESS, b"v1.2"));
        let mut device = FakeDevice::accepting().with_command_reply(&reply);

        let report = Session::new(&mut device).run_command("version", None, |_| {}).unwrap();

        assert!(report.succeeded());
        assert_eq!(report.message, "v1.2");
        assert_eq!(report.transfers, 0);
        assert_eq!(device.written(), b"\x04version\x05");
    }

    #[test]
    fn test_send_data_request_is_refused_with_nak() {
        let mut device = FakeDevice::accepting()
            .with_command_reply(&[COMMAND_RESPONSE_BEGIN, COMMAND_SEND_DATA]);

        let err = Session::new(&mut device).upload_snapshot(b"x", |_| {}).unwrap_err();

        assert!(matches!(err, ProtocolError::UnsupportedSendData));
        assert_eq!(device.written().last(), Some(&NAK));
    }

    #[test]
    fn test_receive_data_without_payload_is_refused() {
        let mut device = FakeDevice::accepting();

        let err = Session::new(&mut device).run_command("snapupload", None, |_| {}).unwrap_err();

        assert!(matches!(err, ProtocolError::NoPayload));
        assert_eq!(device.written().last(), Some(&NAK));
    }

    #[test]
    fn test_no_response_times_out() {
        let mut device = FakeDevice::accepting().with_command_reply(&[]);

        let err = Session::new(&mut device).upload_snapshot(b"x", |_| {}).unwrap_err();
        assert!(matches!(err, ProtocolError::Timeout { stage: Stage::ResponseBegin }));
    }

    #[test]
    fn test_missing_response_end_times_out() {
        let mut device = FakeDevice::accepting().with_after_transfer(&[COMMAND_SUCCESS, b'O', b'K']);

        let err = Session::new(&mut device).upload_snapshot(b"x", |_| {}).unwrap_err();
        assert!(matches!(err, ProtocolError::Timeout { stage: Stage::ResponseText }));
    }

    #[test]
    fn test_missing_status_times_out() {
        let mut device = FakeDevice::accepting().with_after_transfer(&[]);

        let err = Session::new(&mut device).upload_snapshot(b"x", |_| {}).unwrap_err();
        assert!(matches!(err, ProtocolError::Timeout { stage: Stage::Status }));
    }

    #[test]
    fn test_rejected_packet_aborts_command() {
        let mut device = FakeDevice::accepting().with_packet_reply(0, Reply::Byte(NAK));

        let err = Session::new(&mut device).upload_snapshot(b"x", |_| {}).unwrap_err();
        assert!(err.is_nak());
    }

    #[test]
    fn test_custom_packet_size_and_progress() {
        let mut device = FakeDevice::accepting();
        let mut last = None;

        let report = Session::new(&mut device)
            .with_packet_size(1000)
            .upload_snapshot(&[1u8; 2500], |p| last = Some(p))
            .unwrap();

        assert_eq!(report.transferred.packets, 3);
        assert_eq!(device.packet_sizes(), vec![1000, 1000, 500]);
        assert_eq!(last, Some(Progress { sent: 2500, total: 2500, packets: 3 }));
    }

    #[test]
    fn test_invalid_packet_size_checked_before_sending() {
        let mut device = FakeDevice::accepting();

        let err = Session::new(&mut device)
            .with_packet_size(0)
            .upload_snapshot(b"x", |_| {})
            .unwrap_err();

        assert!(matches!(err, ProtocolError::InvalidPacketSize(0)));
        assert!(device.written().is_empty());
    }
}
