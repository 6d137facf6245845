//! Core utilities for the picoFace snapshot loader
//!
//! This crate provides the functionality shared by the loader crates:
//!
//! - **Error handling**: structured errors with codes, context, and recovery suggestions
//! - **Configuration**: TOML-based configuration with validation
//! - **Retry**: backoff for opening a device that is still enumerating
//! - **Paths**: standard locations for the config file and snapshot archive
//!
//! # Example
//!
//! ```rust,no_run
//! use picoface_core::{config::Config, paths};
//!
//! let config = Config::load(None).expect("invalid configuration");
//! let archive = paths::resolve_archive(None, config.schema.library.archive.as_deref());
//! ```

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod paths;
pub mod retry;

pub use error::{Error, ErrorCode, Result, ResultExt};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::{Config, ConfigSchema, DeviceConfig};
    pub use crate::error::{exit_codes, Error, ErrorCode, Result, ResultExt};
    pub use crate::retry::{retry, RetryConfig};
}
