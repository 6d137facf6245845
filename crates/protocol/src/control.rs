//! Control bytes of the picoFace serial protocol.

/// Begins a command name (host to device)
pub const COMMAND_START: u8 = 0x04;
/// Ends a command name (host to device)
pub const COMMAND_END: u8 = 0x05;
/// Begins the command response
pub const COMMAND_RESPONSE_BEGIN: u8 = 0x06;
/// Device wants the host to send data
pub const COMMAND_RECEIVE_DATA: u8 = 0x07;
/// Device wants to send data to the host
pub const COMMAND_SEND_DATA: u8 = 0x08;
/// Command succeeded
pub const COMMAND_SUCCESS: u8 = 0x09;
/// Command failed
pub const COMMAND_FAILURE: u8 = 0x10;
/// Ends the response text
pub const COMMAND_RESPONSE_END: u8 = 0x11;
/// Data header, followed by a big-endian `u32` total size
pub const START_OF_DATA: u8 = 0x14;
/// Packet header, followed by a big-endian `u16` size and the payload
pub const START_OF_PACKET: u8 = 0x15;
/// Marks the end of a data transfer
pub const END_OF_DATA: u8 = 0x16;
/// Positive acknowledgement
pub const ACK: u8 = 0x17;
/// Negative acknowledgement
pub const NAK: u8 = 0x18;

/// Status bytes the device sends between response begin and end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Device is ready to receive the payload
    ReceiveData,
    /// Device wants to send a payload
    SendData,
    /// Command succeeded
    Success,
    /// Command failed
    Failure,
}

impl Status {
    /// Decode a status byte; anything else is `None`
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            COMMAND_RECEIVE_DATA => Some(Status::ReceiveData),
            COMMAND_SEND_DATA => Some(Status::SendData),
            COMMAND_SUCCESS => Some(Status::Success),
            COMMAND_FAILURE => Some(Status::Failure),
            _ => None,
        }
    }
}
