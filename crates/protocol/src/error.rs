//! Error types for the protocol crate.

use std::fmt;
use thiserror::Error;

/// Result type alias for protocol operations.
pub type Result<T> = std::result::Result<T, ProtocolError>;

/// Point in an exchange at which the device stopped cooperating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case", tag = "stage")]
pub enum Stage {
    /// Waiting for the response to start
    ResponseBegin,
    /// Waiting for a status byte
    Status,
    /// Reading the response text
    ResponseText,
    /// Waiting for the ACK of the data header
    Header,
    /// Waiting for the ACK of a data packet
    Packet {
        /// Zero-based packet number
        index: usize,
    },
    /// Waiting for the ACK of the end-of-data marker
    End,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::ResponseBegin => write!(f, "waiting for response"),
            Stage::Status => write!(f, "waiting for command status"),
            Stage::ResponseText => write!(f, "reading response text"),
            Stage::Header => write!(f, "data header"),
            Stage::Packet { index } => write!(f, "data packet {}", index),
            Stage::End => write!(f, "end of data"),
        }
    }
}

/// Errors that can occur while talking to a picoFace.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// Transport failure
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Device did not answer in time
    #[error("Timed out ({stage})")]
    Timeout {
        /// Where the exchange stalled
        stage: Stage,
    },

    /// Device answered with something other than ACK
    #[error("Expected ACK but got {byte:#04x} ({stage})")]
    Rejected {
        /// Where the exchange was rejected
        stage: Stage,
        /// Byte received instead of ACK
        byte: u8,
    },

    /// Device asked for data but the command carries none
    #[error("Device requested data but none was supplied")]
    NoPayload,

    /// Device offered to send data to the host
    #[error("Device attempted to send data to the host, which is not supported")]
    UnsupportedSendData,

    /// Command name cannot be framed
    #[error("Invalid command name: {0:?}")]
    InvalidCommandName(String),

    /// Payload does not fit the 32-bit size field
    #[error("Payload of {0} bytes exceeds the 4 GiB limit")]
    PayloadTooLarge(usize),

    /// Packet size outside 1..=65535
    #[error("Invalid packet size {0}; must be between 1 and 65535")]
    InvalidPacketSize(usize),
}

impl ProtocolError {
    /// Whether the device explicitly refused with NAK
    pub fn is_nak(&self) -> bool {
        matches!(self, ProtocolError::Rejected { byte, .. } if *byte == crate::control::NAK)
    }
}
