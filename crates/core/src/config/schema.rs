//! Configuration schema definitions

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration schema
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ConfigSchema {
    #[serde(default)]
    pub device: DeviceConfig,

    #[serde(default)]
    pub transfer: TransferConfig,

    #[serde(default)]
    pub library: LibraryConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ConfigSchema {
    /// Check values that would otherwise fail deep inside a transfer
    pub fn validate(&self) -> Result<()> {
        if self.device.baud_rate == 0 {
            return Err(Error::config_invalid("device.baud_rate must be greater than zero"));
        }
        if self.device.timeout_ms == 0 {
            return Err(Error::config_invalid("device.timeout_ms must be greater than zero"));
        }
        if self.transfer.packet_size == 0 || self.transfer.packet_size > usize::from(u16::MAX) {
            return Err(Error::config_invalid(format!(
                "transfer.packet_size must be between 1 and {}, got {}",
                u16::MAX,
                self.transfer.packet_size
            )));
        }
        if self.library.extensions.is_empty() {
            return Err(Error::config_invalid("library.extensions must not be empty"));
        }
        // A blank suffix would match every entry in the archive
        if self.library.extensions.iter().any(|e| e.trim().is_empty()) {
            return Err(Error::config_invalid(
                "library.extensions must not contain empty entries",
            ));
        }
        Ok(())
    }
}

/// Serial device selection and line settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceConfig {
    /// Explicit port (e.g. `/dev/ttyACM0`, `COM3`); auto-detected when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<String>,

    /// Only auto-select USB ports with this vendor id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vid: Option<u16>,

    /// Only auto-select USB ports with this product id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pid: Option<u16>,

    #[serde(default = "default_baud_rate")]
    pub baud_rate: u32,

    /// Per read/write timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Assert DTR after opening
    #[serde(default = "default_true")]
    pub dtr: bool,

    /// Assert RTS after opening
    #[serde(default = "default_true")]
    pub rts: bool,

    /// Attempts made to open the port before giving up
    #[serde(default = "default_open_retries")]
    pub open_retries: u32,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            port: None,
            vid: None,
            pid: None,
            baud_rate: default_baud_rate(),
            timeout_ms: default_timeout_ms(),
            dtr: true,
            rts: true,
            open_retries: default_open_retries(),
        }
    }
}

fn default_baud_rate() -> u32 {
    115_200
}

fn default_timeout_ms() -> u64 {
    2000
}

fn default_true() -> bool {
    true
}

fn default_open_retries() -> u32 {
    3
}

/// Data transfer settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferConfig {
    /// Maximum payload bytes per packet
    #[serde(default = "default_packet_size")]
    pub packet_size: usize,
}

impl Default for TransferConfig {
    fn default() -> Self {
        Self {
            packet_size: default_packet_size(),
        }
    }
}

fn default_packet_size() -> usize {
    picoface_protocol::DEFAULT_PACKET_SIZE
}

/// Snapshot library settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LibraryConfig {
    /// Snapshot archive; searched in standard locations when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub archive: Option<PathBuf>,

    /// Entry name suffixes treated as snapshots
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            archive: None,
            extensions: default_extensions(),
        }
    }
}

fn default_extensions() -> Vec<String> {
    picoface_snapshots::DEFAULT_EXTENSIONS
        .iter()
        .map(|s| (*s).to_string())
        .collect()
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter level when `RUST_LOG` is unset
    #[serde(default = "default_level")]
    pub level: String,

    /// Also write logs to `picoface-loader.log` in this directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_dir: Option<PathBuf>,

    #[serde(default)]
    pub show_target: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            log_dir: None,
            show_target: false,
        }
    }
}

fn default_level() -> String {
    "warn".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let schema = ConfigSchema::default();
        assert!(schema.validate().is_ok());
        assert_eq!(schema.device.timeout_ms, 2000);
        assert_eq!(schema.transfer.packet_size, 8192);
        assert_eq!(schema.library.extensions, vec![".z80".to_string()]);
        assert!(schema.device.dtr && schema.device.rts);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let schema: ConfigSchema = toml::from_str(
            r#"
            [device]
            port = "/dev/ttyACM1"
            vid = 0x2e8a
            "#,
        )
        .unwrap();

        assert_eq!(schema.device.port.as_deref(), Some("/dev/ttyACM1"));
        assert_eq!(schema.device.vid, Some(0x2e8a));
        assert_eq!(schema.device.baud_rate, 115_200);
        assert_eq!(schema.transfer.packet_size, 8192);
    }

    #[test]
    fn test_packet_size_out_of_range() {
        let mut schema = ConfigSchema::default();
        schema.transfer.packet_size = 70_000;
        assert!(schema.validate().is_err());

        schema.transfer.packet_size = 0;
        assert!(schema.validate().is_err());

        schema.transfer.packet_size = 65_535;
        assert!(schema.validate().is_ok());
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let mut schema = ConfigSchema::default();
        schema.device.timeout_ms = 0;
        let err = schema.validate().unwrap_err();
        assert_eq!(err.code, crate::ErrorCode::ConfigValidationError);
    }

    #[test]
    fn test_empty_extensions_rejected() {
        let mut schema = ConfigSchema::default();
        schema.library.extensions.clear();
        assert!(schema.validate().is_err());
    }

    #[test]
    fn test_blank_extension_rejected() {
        let mut schema = ConfigSchema::default();
        schema.library.extensions = vec![".z80".to_string(), String::new()];
        let err = schema.validate().unwrap_err();
        assert_eq!(err.code, crate::ErrorCode::ConfigValidationError);
        assert!(err.message.contains("empty entries"));

        schema.library.extensions = vec!["  ".to_string()];
        assert!(schema.validate().is_err());
    }
}
