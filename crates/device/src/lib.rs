//! Serial port discovery and connection for the picoFace
//!
//! - **Discovery**: enumerate ports and pick the picoFace among them
//! - **Connection**: open a port with the configured line settings
//! - **Loader**: upload a snapshot over an open connection

pub mod connection;
pub mod discovery;
pub mod loader;

pub use connection::Connection;
pub use discovery::{DeviceInfo, PortKind, list_ports, select_port};
pub use loader::Loader;
