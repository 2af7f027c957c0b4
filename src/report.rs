//! Per-pass action ledger.
//!
//! Every pass records what it did (or refused to do) into a `Report`. Recording
//! also emits the matching `tracing` event so the console/log stream and the
//! ledger never drift apart. Consumers should rely on the ledger, not on the
//! wording of log lines.

use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

/// What happened to a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Archive expanded and removed.
    Expanded,
    /// Folder or file deleted.
    Deleted,
    /// Unit folder removed as irrelevant.
    Pruned,
    /// Entry moved to a new parent.
    Moved,
    /// Entry renamed within its parent.
    Renamed,
    /// File written (directory index).
    Written,
    /// Per-item problem that was skipped on purpose.
    Skipped,
    /// Per-item I/O failure.
    Failed,
}

impl Action {
    /// Whether the action changed the tree.
    pub fn is_change(self) -> bool {
        !matches!(self, Action::Skipped | Action::Failed)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Action::Expanded => "expanded",
            Action::Deleted => "deleted",
            Action::Pruned => "pruned",
            Action::Moved => "moved",
            Action::Renamed => "renamed",
            Action::Written => "written",
            Action::Skipped => "skipped",
            Action::Failed => "failed",
        })
    }
}

/// One ledger line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub action: Action,
    pub path: PathBuf,
    pub dest: Option<PathBuf>,
    pub detail: Option<String>,
}

#[derive(Debug, Default, Clone)]
pub struct Report {
    events: Vec<Event>,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a change that has a single subject path.
    pub fn record(&mut self, action: Action, path: impl Into<PathBuf>) {
        let path = path.into();
        info!(%action, path = %path.display(), "{action} '{}'", path.display());
        self.events.push(Event {
            action,
            path,
            dest: None,
            detail: None,
        });
    }

    /// Record a move or rename from `path` to `dest`.
    pub fn record_move(&mut self, action: Action, path: impl Into<PathBuf>, dest: impl Into<PathBuf>) {
        let (path, dest) = (path.into(), dest.into());
        info!(%action, src = %path.display(), dest = %dest.display(), "{action} '{}' -> '{}'", path.display(), dest.display());
        self.events.push(Event {
            action,
            path,
            dest: Some(dest),
            detail: None,
        });
    }

    /// Record a deliberately skipped item (corrupt archive, missing title, collision...).
    pub fn skip(&mut self, path: impl Into<PathBuf>, detail: impl Into<String>) {
        let (path, detail) = (path.into(), detail.into());
        warn!(path = %path.display(), "skipping: {detail}");
        self.events.push(Event {
            action: Action::Skipped,
            path,
            dest: None,
            detail: Some(detail),
        });
    }

    /// Record an item left untouched because acting on it would lose data or
    /// guess (missing title, rename collision). Logged at error level.
    pub fn refuse(&mut self, path: impl Into<PathBuf>, detail: impl Into<String>) {
        let (path, detail) = (path.into(), detail.into());
        error!(path = %path.display(), "{detail}");
        self.events.push(Event {
            action: Action::Skipped,
            path,
            dest: None,
            detail: Some(detail),
        });
    }

    /// Record a per-item failure; the walk carries on.
    pub fn fail(&mut self, path: impl Into<PathBuf>, err: &anyhow::Error) {
        let path = path.into();
        let detail = format!("{err:#}");
        error!(path = %path.display(), error = %detail, "item failed");
        self.events.push(Event {
            action: Action::Failed,
            path,
            dest: None,
            detail: Some(detail),
        });
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn count(&self, action: Action) -> usize {
        self.events.iter().filter(|e| e.action == action).count()
    }

    /// Number of tree mutations recorded.
    pub fn changes(&self) -> usize {
        self.events.iter().filter(|e| e.action.is_change()).count()
    }

    /// Subject paths of every event with the given action.
    pub fn paths(&self, action: Action) -> impl Iterator<Item = &Path> {
        self.events
            .iter()
            .filter(move |e| e.action == action)
            .map(|e| e.path.as_path())
    }

    pub fn merge(&mut self, other: Report) {
        self.events.extend(other.events);
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn changes_excludes_skips_and_failures() {
        let mut r = Report::new();
        r.record(Action::Deleted, "/a");
        r.record_move(Action::Moved, "/b", "/c");
        r.skip("/d", "corrupt");
        r.fail("/e", &anyhow::anyhow!("boom"));
        assert_eq!(r.changes(), 2);
        assert_eq!(r.count(Action::Skipped), 1);
        assert_eq!(r.count(Action::Failed), 1);
        assert_eq!(r.paths(Action::Moved).collect::<Vec<_>>(), vec![Path::new("/b")]);
    }

    #[test]
    fn merge_appends_in_order() {
        let mut a = Report::new();
        a.record(Action::Deleted, "/one");
        let mut b = Report::new();
        b.record(Action::Pruned, "/two");
        a.merge(b);
        let actions: Vec<_> = a.events().iter().map(|e| e.action).collect();
        assert_eq!(actions, vec![Action::Deleted, Action::Pruned]);
    }
}
