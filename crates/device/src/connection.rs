//! Open serial connection to a picoFace.

use picoface_core::config::DeviceConfig;
use picoface_core::retry::{RetryConfig, retry};
use picoface_core::{Error, ErrorCode, Result};
use serialport::SerialPort;
use std::io::{self, Read, Write};
use std::time::Duration;

/// An open, configured serial port.
///
/// Implements `Read + Write`, so it can be handed straight to a
/// `picoface_protocol::Session`.
pub struct Connection {
    port_name: String,
    port: Box<dyn SerialPort>,
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("port_name", &self.port_name)
            .finish_non_exhaustive()
    }
}

impl Connection {
    /// Open `port_name` with the line settings from `config`.
    ///
    /// Transient failures (device still enumerating, port busy) are retried
    /// `open_retries` times; permission problems are not.
    pub fn open(port_name: &str, config: &DeviceConfig) -> Result<Self> {
        let policy = if config.open_retries <= 1 {
            RetryConfig::no_retry()
        } else {
            RetryConfig::with_attempts(config.open_retries)
        };
        let result = retry(
            &policy,
            |e: &Error| e.code != ErrorCode::DeviceAccessDenied,
            || open_once(port_name, config),
        )?;

        tracing::info!(
            port = port_name,
            baud_rate = config.baud_rate,
            attempts = result.attempts,
            "Opened serial port"
        );

        Ok(Self {
            port_name: port_name.to_string(),
            port: result.value,
        })
    }

    pub fn port_name(&self) -> &str {
        &self.port_name
    }
}

fn open_once(port_name: &str, config: &DeviceConfig) -> Result<Box<dyn SerialPort>> {
    let mut port = serialport::new(port_name, config.baud_rate)
        .timeout(Duration::from_millis(config.timeout_ms))
        .open()
        .map_err(|e| open_error(port_name, e))?;

    // The picoFace only talks once the host asserts the control lines.
    port.write_data_terminal_ready(config.dtr)
        .map_err(|e| open_error(port_name, e))?;
    port.write_request_to_send(config.rts)
        .map_err(|e| open_error(port_name, e))?;

    Ok(port)
}

fn open_error(port_name: &str, err: serialport::Error) -> Error {
    let denied = matches!(err.kind(), serialport::ErrorKind::Io(io::ErrorKind::PermissionDenied))
        || err.description.to_lowercase().contains("permission denied");

    if denied {
        return Error::device_access_denied(port_name).with_source(err);
    }

    let code = match err.kind() {
        serialport::ErrorKind::NoDevice
        | serialport::ErrorKind::Io(io::ErrorKind::NotFound) => ErrorCode::DeviceNotFound,
        serialport::ErrorKind::InvalidInput => ErrorCode::InvalidInput,
        _ => ErrorCode::DeviceError,
    };
    Error::new(code, format!("Failed to open {}: {}", port_name, err.description))
        .with_suggestion("Check the picoFace is connected; `picoface-loader ports` lists detected ports")
        .with_source(err)
}

impl Read for Connection {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.port.read(buf)
    }
}

impl Write for Connection {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.port.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.port.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permission_denied_is_access_denied() {
        let err = open_error(
            "/dev/ttyACM0",
            serialport::Error::new(
                serialport::ErrorKind::Io(io::ErrorKind::PermissionDenied),
                "Permission denied",
            ),
        );
        assert_eq!(err.code, ErrorCode::DeviceAccessDenied);
        assert!(err.suggestion.unwrap().contains("dialout"));
    }

    #[test]
    fn test_missing_device() {
        let err = open_error(
            "/dev/ttyACM7",
            serialport::Error::new(serialport::ErrorKind::NoDevice, "No such file or directory"),
        );
        assert_eq!(err.code, ErrorCode::DeviceNotFound);
        assert!(err.message.contains("/dev/ttyACM7"));
    }

    #[test]
    fn test_open_nonexistent_port_fails_without_retrying_forever() {
        let config = DeviceConfig {
            open_retries: 1,
            ..DeviceConfig::default()
        };
        let err = Connection::open("/nonexistent/picoface-port", &config).unwrap_err();
        assert_ne!(err.code, ErrorCode::DeviceAccessDenied);
        assert!(err.message.contains("/nonexistent/picoface-port"));
    }
}
