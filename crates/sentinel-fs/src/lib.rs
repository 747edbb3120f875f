//! Filesystem primitives for Sentinel
//!
//! Provides normalized path handling, streaming SHA-256 checksums, and
//! atomic I/O operations shared by the engine and the CLI.

pub mod checksum;
pub mod clock;
pub mod error;
pub mod io;
pub mod path;

pub use error::{Error, Result};
