//! File system watcher for watch mode

use crate::loader::RESULT_FILENAME;
use notify::{Config, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver};
use std::time::Duration;

const DEBOUNCE_MS: u64 = 300;

/// Watches a result directory and emits changed inputs of the report
pub struct ResultWatcher {
    _watcher: RecommendedWatcher,
    receiver: Receiver<notify::Result<notify::Event>>,
    inputs: ReportInputs,
}

/// The paths whose changes feed into the report
#[derive(Debug, Clone)]
struct ReportInputs {
    result_file: PathBuf,
    logs_dir: PathBuf,
    /// Files the export itself writes
    ignored: Vec<PathBuf>,
}

fn is_create_or_modify(kind: &EventKind) -> bool {
    matches!(kind, EventKind::Create(_) | EventKind::Modify(_))
}

/// Event paths are reported under the canonical watched root, so compare in that form.
/// Files that do not exist yet are resolved through their parent.
fn canonical(p: &Path) -> PathBuf {
    if let Ok(c) = p.canonicalize() {
        return c;
    }
    match (p.parent(), p.file_name()) {
        (Some(parent), Some(name)) => {
            let parent = if parent.as_os_str().is_empty() {
                Path::new(".")
            } else {
                parent
            };
            parent
                .canonicalize()
                .map(|c| c.join(name))
                .unwrap_or_else(|_| p.to_path_buf())
        }
        _ => p.to_path_buf(),
    }
}

impl ResultWatcher {
    /// Start watching `root` recursively. `logs_dir` is relative to `root`;
    /// the result document defaults to `root/result.json`.
    pub fn watch(root: &Path, logs_dir: &str) -> notify::Result<Self> {
        let (tx, rx) = channel();
        let mut watcher = RecommendedWatcher::new(
            move |res| {
                let _ = tx.send(res);
            },
            Config::default().with_poll_interval(Duration::from_millis(DEBOUNCE_MS)),
        )?;
        let root = canonical(root);
        watcher.watch(&root, RecursiveMode::Recursive)?;

        Ok(Self {
            _watcher: watcher,
            receiver: rx,
            inputs: ReportInputs {
                result_file: root.join(RESULT_FILENAME),
                logs_dir: root.join(logs_dir),
                ignored: Vec::new(),
            },
        })
    }

    /// Track a result document other than `result.json`
    pub fn with_result_file(mut self, path: &Path) -> Self {
        self.inputs.result_file = canonical(path);
        self
    }

    /// Never report changes to `path`, e.g. the exported page
    pub fn ignoring(mut self, path: &Path) -> Self {
        self.inputs.ignored.push(canonical(path));
        self
    }

    /// Whether a changed path feeds into the report
    pub fn is_report_input(&self, p: &Path) -> bool {
        self.inputs.accepts(p)
    }

    /// Wait for the next batch of changes (debounced). Blocks until at least one change, then drains for DEBOUNCE_MS.
    pub fn next_changes(&self) -> Vec<PathBuf> {
        let mut all = HashSet::new();

        // Wait for first event (with timeout so we can react to shutdown)
        match self.receiver.recv_timeout(Duration::from_secs(3600)) {
            Ok(Ok(event)) => all.extend(self.inputs.paths_from_event(&event)),
            Ok(Err(e)) => {
                log::warn!("watch error: {}", e);
                return vec![];
            }
            Err(_) => return vec![],
        }

        // Debounce: collect further events for a short time
        std::thread::sleep(Duration::from_millis(DEBOUNCE_MS));
        while let Ok(ev) = self.receiver.try_recv() {
            if let Ok(event) = ev {
                all.extend(self.inputs.paths_from_event(&event));
            }
        }

        let mut paths: Vec<PathBuf> = all.into_iter().collect();
        paths.sort();
        paths
    }
}

impl ReportInputs {
    fn accepts(&self, p: &Path) -> bool {
        if self.ignored.iter().any(|i| i == p) {
            return false;
        }
        p == self.result_file || (p.starts_with(&self.logs_dir) && p != self.logs_dir)
    }

    fn paths_from_event(&self, event: &notify::Event) -> Vec<PathBuf> {
        if !is_create_or_modify(&event.kind) {
            return vec![];
        }
        event
            .paths
            .iter()
            .filter(|p| self.accepts(p))
            .cloned()
            .collect()
    }
}
