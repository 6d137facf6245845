//! Configuration loading and schema definitions
//!
//! Settings come from a TOML file; anything omitted takes its default.

mod loader;
mod schema;

pub use loader::Config;
pub use schema::*;
