//! Structured error handling with context and recovery suggestions
//!
//! This module provides error types with:
//! - Error codes for programmatic handling
//! - Detailed error context
//! - Recovery suggestions shown to the user
//! - Serializable error reports for `--format json`

use picoface_protocol::ProtocolError;
use picoface_snapshots::SnapshotError;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Error codes for programmatic error handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // General errors (1xxx)
    Unknown = 1000,
    Internal = 1001,
    InvalidInput = 1004,

    // IO errors (2xxx)
    IoError = 2000,
    FileNotFound = 2001,
    PermissionDenied = 2002,

    // Configuration errors (3xxx)
    ConfigError = 3000,
    ConfigNotFound = 3001,
    ConfigParseError = 3002,
    ConfigValidationError = 3003,

    // Device errors (4xxx)
    DeviceError = 4000,
    DeviceNotFound = 4001,
    DeviceBusy = 4002,
    DeviceAccessDenied = 4003,

    // Protocol errors (5xxx)
    ProtocolError = 5000,
    ProtocolTimeout = 5001,
    TransferRejected = 5002,
    UnexpectedResponse = 5003,
    CommandFailed = 5004,

    // Archive errors (6xxx)
    ArchiveError = 6000,
    ArchiveNotFound = 6001,
    InvalidArchive = 6002,
    SnapshotNotFound = 6003,
}

impl ErrorCode {
    /// Get the numeric code
    pub fn code(&self) -> u32 {
        *self as u32
    }

    /// Get a human-readable category
    pub fn category(&self) -> &'static str {
        match self.code() / 1000 {
            1 => "General",
            2 => "IO",
            3 => "Configuration",
            4 => "Device",
            5 => "Protocol",
            6 => "Archive",
            _ => "Unknown",
        }
    }

    /// Process exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self.code() / 1000 {
            3 => exit_codes::CONFIG_ERROR,
            4 => exit_codes::DEVICE_ERROR,
            5 => exit_codes::PROTOCOL_ERROR,
            _ => exit_codes::FAILURE,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{:04}", self.code())
    }
}

/// Main error type with rich context
#[derive(Error, Debug)]
pub struct Error {
    /// Error code for programmatic handling
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    /// Additional context
    pub context: Option<String>,
    /// Recovery suggestion
    pub suggestion: Option<String>,
    /// Source error
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(ctx) = &self.context {
            write!(f, "\n  Context: {}", ctx)?;
        }
        if let Some(suggestion) = &self.suggestion {
            write!(f, "\n  Suggestion: {}", suggestion)?;
        }
        Ok(())
    }
}

impl Error {
    /// Create a new error
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            context: None,
            suggestion: None,
            source: None,
        }
    }

    /// Add context to the error
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Add a recovery suggestion
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add a source error
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Convert to a serializable report
    pub fn to_report(&self) -> ErrorReport {
        ErrorReport {
            code: self.code,
            code_str: self.code.to_string(),
            category: self.code.category().to_string(),
            message: self.message.clone(),
            context: self.context.clone(),
            suggestion: self.suggestion.clone(),
            source: self.source.as_ref().map(|e| e.to_string()),
        }
    }

    // Convenience constructors

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, message)
    }

    pub fn file_not_found(path: impl AsRef<std::path::Path>) -> Self {
        Self::new(
            ErrorCode::FileNotFound,
            format!("File not found: {}", path.as_ref().display()),
        )
        .with_suggestion("Check that the file exists and you have read permissions")
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigError, message)
    }

    pub fn config_not_found(path: impl AsRef<std::path::Path>) -> Self {
        Self::new(
            ErrorCode::ConfigNotFound,
            format!("Configuration file not found: {}", path.as_ref().display()),
        )
        .with_suggestion("Create a .picoface.toml file or use --config to specify a path")
    }

    pub fn config_invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigValidationError, message)
    }

    pub fn device(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::DeviceError, message)
    }

    pub fn device_not_found() -> Self {
        Self::new(ErrorCode::DeviceNotFound, "No picoFace device found")
            .with_suggestion(
                "Connect the picoFace over USB, or pass --port (see `picoface-loader ports`)",
            )
    }

    pub fn device_access_denied(port: &str) -> Self {
        Self::new(
            ErrorCode::DeviceAccessDenied,
            format!("Permission denied opening {}", port),
        )
        .with_suggestion(
            "Add your user to the group owning the port (often `dialout`) or install a udev rule",
        )
    }

    pub fn command_failed(command: &str, message: &str) -> Self {
        let err = Self::new(
            ErrorCode::CommandFailed,
            format!("Device reported failure for '{}'", command),
        );
        if message.trim().is_empty() {
            err
        } else {
            err.with_context(message.trim().to_string())
        }
    }

    pub fn archive_not_found() -> Self {
        Self::new(ErrorCode::ArchiveNotFound, "No snapshot archive found")
            .with_suggestion(
                "Pass --archive, set [library] archive in the config, or place snaps.zip in the current directory",
            )
    }

    /// Exit code to use when this error terminates the process
    pub fn exit_code(&self) -> i32 {
        self.code.exit_code()
    }
}

/// Serializable error report for logging and JSON output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorReport {
    pub code: ErrorCode,
    pub code_str: String,
    pub category: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Exit codes for CLI commands
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const FAILURE: i32 = 1;
    pub const CONFIG_ERROR: i32 = 3;
    pub const DEVICE_ERROR: i32 = 4;
    pub const PROTOCOL_ERROR: i32 = 5;
}

// Implement From for common error types

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        let code = match err.kind() {
            std::io::ErrorKind::NotFound => ErrorCode::FileNotFound,
            std::io::ErrorKind::PermissionDenied => ErrorCode::PermissionDenied,
            _ => ErrorCode::IoError,
        };
        Error::new(code, err.to_string()).with_source(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::new(ErrorCode::Internal, format!("JSON error: {}", err)).with_source(err)
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::new(ErrorCode::ConfigParseError, format!("TOML parse error: {}", err))
            .with_source(err)
    }
}

impl From<ProtocolError> for Error {
    fn from(err: ProtocolError) -> Self {
        let code = match &err {
            // The transport is the serial line; losing it is a device fault
            ProtocolError::Io(_) => ErrorCode::DeviceError,
            ProtocolError::Timeout { .. } => ErrorCode::ProtocolTimeout,
            ProtocolError::Rejected { .. } => ErrorCode::TransferRejected,
            ProtocolError::NoPayload | ProtocolError::UnsupportedSendData => {
                ErrorCode::UnexpectedResponse
            }
            ProtocolError::InvalidCommandName(_)
            | ProtocolError::PayloadTooLarge(_)
            | ProtocolError::InvalidPacketSize(_) => ErrorCode::InvalidInput,
        };
        let suggestion = match code {
            ErrorCode::ProtocolTimeout => {
                Some("Check the picoFace is powered and not busy, then retry")
            }
            ErrorCode::TransferRejected => Some("Retry the upload; reconnect the device if it persists"),
            ErrorCode::DeviceError => Some("Check the USB cable and that the picoFace is still connected"),
            _ => None,
        };
        let mut error = Error::new(code, err.to_string());
        if let Some(suggestion) = suggestion {
            error = error.with_suggestion(suggestion);
        }
        error.with_source(err)
    }
}

impl From<SnapshotError> for Error {
    fn from(err: SnapshotError) -> Self {
        let code = match &err {
            SnapshotError::ArchiveNotFound(_) => ErrorCode::ArchiveNotFound,
            SnapshotError::InvalidArchive { .. } => ErrorCode::InvalidArchive,
            SnapshotError::EntryNotFound(_) => ErrorCode::SnapshotNotFound,
            SnapshotError::Io(_) => ErrorCode::IoError,
        };
        let suggestion = match code {
            ErrorCode::SnapshotNotFound => {
                Some("Run `picoface-loader list` or `search` to see available snapshots")
            }
            ErrorCode::InvalidArchive => Some("Check the archive is a valid zip file"),
            _ => None,
        };
        let mut error = Error::new(code, err.to_string());
        if let Some(suggestion) = suggestion {
            error = error.with_suggestion(suggestion);
        }
        error.with_source(err)
    }
}

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    fn context(self, context: impl Into<String>) -> Result<T>;
    fn with_suggestion(self, suggestion: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }

    fn with_suggestion(self, suggestion: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_suggestion(suggestion))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use picoface_protocol::Stage;

    #[test]
    fn test_error_code_display() {
        assert_eq!(ErrorCode::FileNotFound.to_string(), "E2001");
        assert_eq!(ErrorCode::DeviceNotFound.to_string(), "E4001");
    }

    #[test]
    fn test_error_code_category() {
        assert_eq!(ErrorCode::IoError.category(), "IO");
        assert_eq!(ErrorCode::DeviceError.category(), "Device");
        assert_eq!(ErrorCode::CommandFailed.category(), "Protocol");
        assert_eq!(ErrorCode::SnapshotNotFound.category(), "Archive");
    }

    #[test]
    fn test_exit_codes_follow_category() {
        assert_eq!(ErrorCode::ConfigParseError.exit_code(), exit_codes::CONFIG_ERROR);
        assert_eq!(ErrorCode::DeviceAccessDenied.exit_code(), exit_codes::DEVICE_ERROR);
        assert_eq!(ErrorCode::ProtocolTimeout.exit_code(), exit_codes::PROTOCOL_ERROR);
        assert_eq!(ErrorCode::ArchiveNotFound.exit_code(), exit_codes::FAILURE);
    }

    #[test]
    fn test_error_with_context() {
        let err = Error::file_not_found("/path/to/file").with_context("While loading snapshot");

        assert_eq!(err.code, ErrorCode::FileNotFound);
        assert!(err.context.is_some());
        assert!(err.suggestion.is_some());
    }

    #[test]
    fn test_protocol_timeout_maps_to_timeout_code() {
        let err: Error = ProtocolError::Timeout {
            stage: Stage::ResponseBegin,
        }
        .into();
        assert_eq!(err.code, ErrorCode::ProtocolTimeout);
        assert!(err.suggestion.is_some());
        assert!(err.source.is_some());
    }

    #[test]
    fn test_serial_io_failure_is_a_device_error() {
        let err: Error = ProtocolError::Io(std::io::ErrorKind::BrokenPipe.into()).into();
        assert_eq!(err.code, ErrorCode::DeviceError);
        assert_eq!(err.exit_code(), exit_codes::DEVICE_ERROR);
    }

    #[test]
    fn test_missing_entry_maps_to_snapshot_not_found() {
        let err: Error = SnapshotError::EntryNotFound("manic.z80".into()).into();
        assert_eq!(err.code, ErrorCode::SnapshotNotFound);
        assert!(err.message.contains("manic.z80"));
    }

    #[test]
    fn test_command_failed_keeps_device_message() {
        let err = Error::command_failed("snapupload", "bad snapshot\n");
        assert_eq!(err.code, ErrorCode::CommandFailed);
        assert_eq!(err.context.as_deref(), Some("bad snapshot"));

        let bare = Error::command_failed("snapupload", "   ");
        assert!(bare.context.is_none());
    }

    #[test]
    fn test_error_report_serialization() {
        let err = Error::device("Port vanished").with_context("During upload");

        let report = err.to_report();
        let json = serde_json::to_string(&report).unwrap();

        assert!(json.contains("E4000"));
        assert!(json.contains("Device"));
        assert!(!json.contains("suggestion"));
    }
}
