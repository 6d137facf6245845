//! Host side of the picoFace USB serial protocol.
//!
//! This crate provides:
//! - Control byte constants and status decoding
//! - Command and data framing
//! - Packetised data transfer with per-packet acknowledgement
//! - A command session that uploads snapshots
//!
//! It works over any [`Transport`], so the same code drives a serial port
//! or an in-memory double.
//!
//! # Example
//!
//! ```rust,no_run
//! use picoface_protocol::Session;
//! # fn port() -> std::fs::File { unimplemented!() }
//!
//! let mut port = port();
//! let snapshot = std::fs::read("manic.z80").unwrap();
//! let report = Session::new(&mut port).upload_snapshot(&snapshot, |_| {}).unwrap();
//! println!("{:?}: {}", report.outcome, report.message);
//! ```

pub mod control;
mod error;
pub mod frame;
mod session;
mod transfer;
mod transport;

#[cfg(test)]
mod testing;

pub use error::{ProtocolError, Result, Stage};
pub use frame::DEFAULT_PACKET_SIZE;
pub use session::{CommandReport, Outcome, SNAPSHOT_UPLOAD, Session};
pub use transfer::{Progress, TransferSummary, send_data};
pub use transport::Transport;
