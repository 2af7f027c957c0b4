//! Tree-rewrite passes.
//!
//! Each pass takes the root folder explicitly, completes a full walk before
//! returning, and records every action in a `Report`. Per-item failures are
//! recorded and skipped; only a failure to read the root itself or a shutdown
//! request ends a pass early.

pub mod archive;
pub mod compact;
pub mod crawford;
pub mod index;
pub mod markers;
pub mod metadata;
pub mod promote;
pub mod prune;
pub mod rename;
pub mod sweep;
pub mod tag;

use anyhow::Result;

use crate::errors::TidyError;
use crate::shutdown;

/// Bail out between items once Ctrl-C was pressed.
pub(crate) fn check_shutdown() -> Result<()> {
    if shutdown::is_requested() {
        return Err(TidyError::Interrupted.into());
    }
    Ok(())
}

pub(crate) fn is_interrupted(e: &anyhow::Error) -> bool {
    matches!(e.downcast_ref::<TidyError>(), Some(TidyError::Interrupted))
}
