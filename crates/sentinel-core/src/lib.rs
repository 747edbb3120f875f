//! Sentinel integrity engine
//!
//! Captures trusted snapshots of a directory tree, persists them as a
//! tamper-evident baseline, and classifies drift between a baseline and a
//! fresh snapshot. Report rendering consumes the engine's results; the CLI
//! layer binds everything into operations with a stable exit-code contract.

pub mod baseline;
pub mod compare;
pub mod error;
pub mod ignore;
pub mod reports;
pub mod snapshot;
pub mod types;

pub use baseline::{BaselineStore, LoadedBaseline};
pub use compare::compare;
pub use error::{Error, Result};
pub use ignore::IgnoreSet;
pub use snapshot::build_snapshot;
pub use types::{FileEntry, FileMap, ScanResult, ScanStats};
