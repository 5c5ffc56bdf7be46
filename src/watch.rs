//! Filesystem watcher feeding refresh events into the main loop.
//!
//! Changes under the project root are debounced and forwarded as
//! [`Event::FsChange`]; the main loop answers with a snapshot refresh, which
//! re-runs the key-set reconciliation. Noise directories are filtered out,
//! and a flood of events collapses into a single root-level change.

use std::path::{Path, PathBuf};
use std::time::Duration;

use notify_debouncer_mini::{new_debouncer, DebouncedEventKind};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::event::Event;

/// Directory names that never warrant a refresh.
pub const DEFAULT_IGNORE_PATTERNS: &[&str] = &[
    ".git",
    "node_modules",
    "__pycache__",
    "venv",
    ".venv",
    "target",
];

/// Events per debounce window above which the batch collapses to a single
/// root change.
pub const DEFAULT_FLOOD_THRESHOLD: usize = 100;

/// Watcher over the project root. Dropping it stops watching.
pub struct FsWatcher {
    _debouncer: notify_debouncer_mini::Debouncer<notify::RecommendedWatcher>,
}

impl FsWatcher {
    /// Watch `root` recursively, sending debounced change batches through
    /// `event_tx`. Paths inside ignored directories are dropped.
    pub fn new(
        root: &Path,
        debounce: Duration,
        ignore_patterns: Vec<String>,
        flood_threshold: usize,
        event_tx: mpsc::UnboundedSender<Event>,
    ) -> notify::Result<Self> {
        let root_path = root.to_path_buf();

        let mut debouncer = new_debouncer(
            debounce,
            move |result: Result<Vec<notify_debouncer_mini::DebouncedEvent>, notify::Error>| {
                let events = match result {
                    Ok(events) => events,
                    Err(e) => {
                        warn!("filesystem watcher error: {e}");
                        return;
                    }
                };

                let paths: Vec<PathBuf> = events
                    .into_iter()
                    .filter(|e| e.kind == DebouncedEventKind::Any)
                    .map(|e| e.path)
                    .filter(|p| !is_ignored(p, &ignore_patterns))
                    .collect();

                if paths.is_empty() {
                    return;
                }

                let batch = if paths.len() > flood_threshold {
                    debug!(
                        "collapsing {} filesystem events into a root refresh",
                        paths.len()
                    );
                    vec![root_path.clone()]
                } else {
                    paths
                };

                let _ = event_tx.send(Event::FsChange(batch));
            },
        )?;

        debouncer
            .watcher()
            .watch(root, notify::RecursiveMode::Recursive)?;

        Ok(Self {
            _debouncer: debouncer,
        })
    }
}

/// A path is ignored when any of its components equals an ignore pattern.
pub fn is_ignored(path: &Path, patterns: &[String]) -> bool {
    path.components().any(|component| {
        matches!(
            component,
            std::path::Component::Normal(name)
                if patterns.iter().any(|p| name.to_string_lossy() == *p)
        )
    })
}
