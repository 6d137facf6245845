//! Terminal helpers for the picoFace loader
//!
//! - Output format selection and status lines
//! - Byte-level transfer progress bars

#![warn(missing_docs)]

pub mod output;
pub mod progress;

pub use output::{OutputFormat, Status};
