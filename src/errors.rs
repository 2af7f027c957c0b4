//! Typed error definitions for course_tidy.
//! Provides a small set of well-known failure modes for better logs and tests.

use std::path::PathBuf;
use thiserror::Error;

use crate::pipeline::PassId;

#[derive(Debug, Error)]
pub enum TidyError {
    #[error("Root folder not found: {0}")]
    RootNotFound(PathBuf),

    #[error("Root is not a directory: {0}")]
    RootNotDirectory(PathBuf),

    #[error("Permission denied on {path}: {context}")]
    PermissionDenied { path: PathBuf, context: String },

    #[error("Not a zip file or it is corrupted: {path}: {reason}")]
    CorruptArchive { path: PathBuf, reason: String },

    #[error("No title tag found in {0}")]
    MissingTitle(PathBuf),

    #[error("Destination already exists: {dest} (source {src} left unrenamed)")]
    RenameCollision { src: PathBuf, dest: PathBuf },

    #[error("Pass '{pass}' must run after '{requires}'")]
    PassOrder { pass: PassId, requires: PassId },

    #[error("Unknown pass name: {0}")]
    UnknownPass(String),

    #[error("Pass 'tag-units' needs a unit suffix (set <unit_suffix> or --unit-suffix)")]
    MissingUnitSuffix,

    #[error("Operation interrupted by user")]
    Interrupted,
}

impl TidyError {
    /// Stable numeric code for structured logs.
    pub fn code(&self) -> u16 {
        match self {
            TidyError::RootNotFound(_) => 10,
            TidyError::RootNotDirectory(_) => 11,
            TidyError::PermissionDenied { .. } => 12,
            TidyError::CorruptArchive { .. } => 20,
            TidyError::MissingTitle(_) => 30,
            TidyError::RenameCollision { .. } => 31,
            TidyError::PassOrder { .. } => 40,
            TidyError::UnknownPass(_) => 41,
            TidyError::MissingUnitSuffix => 42,
            TidyError::Interrupted => 130,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_distinct_per_kind() {
        let errs = [
            TidyError::RootNotFound(PathBuf::from("/x")),
            TidyError::RootNotDirectory(PathBuf::from("/x")),
            TidyError::MissingTitle(PathBuf::from("/x/a.html")),
            TidyError::UnknownPass("bogus".into()),
            TidyError::Interrupted,
        ];
        let mut codes: Vec<u16> = errs.iter().map(TidyError::code).collect();
        codes.dedup();
        assert_eq!(codes.len(), errs.len());
    }

    #[test]
    fn pass_order_message_names_both_passes() {
        let e = TidyError::PassOrder {
            pass: PassId::Compact,
            requires: PassId::PromoteCompleted,
        };
        let msg = e.to_string();
        assert!(msg.contains("compact"));
        assert!(msg.contains("promote-completed"));
    }
}
