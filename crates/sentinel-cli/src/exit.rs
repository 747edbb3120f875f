//! Stable exit-code contract
//!
//! These codes gate CI pipelines and must not shift between releases.

use sentinel_core::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Operation completed without reportable drift.
    Ok,
    /// Missing or invalid arguments, non-existent target, conflicting flags.
    Usage,
    /// Integrity changes detected in a mode that signals them.
    ChangesDetected,
    /// No baseline document exists yet.
    BaselineMissing,
    /// The baseline's recorded root differs from the requested target.
    TargetMismatch,
    /// I/O failure, tamper-guard failure, failed persist or import.
    OperationFailed,
}

impl ExitCode {
    pub fn code(self) -> i32 {
        match self {
            Self::Ok => 0,
            Self::Usage => 1,
            Self::ChangesDetected => 2,
            Self::BaselineMissing => 3,
            Self::TargetMismatch => 4,
            Self::OperationFailed => 5,
        }
    }

    /// Map a baseline load failure onto the contract: a purely absent
    /// baseline is distinguishable from one that cannot be trusted.
    pub fn from_baseline_error(err: &Error) -> Self {
        if err.is_baseline_missing() {
            Self::BaselineMissing
        } else {
            Self::OperationFailed
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn codes_are_stable() {
        assert_eq!(ExitCode::Ok.code(), 0);
        assert_eq!(ExitCode::Usage.code(), 1);
        assert_eq!(ExitCode::ChangesDetected.code(), 2);
        assert_eq!(ExitCode::BaselineMissing.code(), 3);
        assert_eq!(ExitCode::TargetMismatch.code(), 4);
        assert_eq!(ExitCode::OperationFailed.code(), 5);
    }

    #[test]
    fn baseline_errors_map_to_contract() {
        let missing = Error::BaselineMissing {
            path: PathBuf::from("/x"),
        };
        assert_eq!(
            ExitCode::from_baseline_error(&missing),
            ExitCode::BaselineMissing
        );
        assert_eq!(
            ExitCode::from_baseline_error(&Error::SealMismatch),
            ExitCode::OperationFailed
        );
    }
}
