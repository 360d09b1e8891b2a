//! Locating and reading a result directory: `result.json` plus captured logs

use crate::{LogEntry, Report};
use chrono::{DateTime, Local};
use globset::GlobSet;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use thiserror::Error;
use walkdir::WalkDir;

pub const RESULT_FILENAME: &str = "result.json";

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("result directory not found: {}", .0.display())]
    MissingResultDir(PathBuf),

    #[error("no result.json in {}", .0.display())]
    MissingResult(PathBuf),

    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid result document {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Compiled include/ignore patterns for log collection
#[derive(Debug, Clone)]
pub struct LogFilter {
    include: GlobSet,
    ignore: GlobSet,
}

impl LogFilter {
    pub fn new(include: GlobSet, ignore: GlobSet) -> Self {
        Self { include, ignore }
    }

    pub fn matches(&self, relative: &Path) -> bool {
        self.include.is_match(relative) && !self.ignore.is_match(relative)
    }
}

/// A directory holding one run's result document
#[derive(Debug, Clone)]
pub struct ResultDir {
    root: PathBuf,
    result_file: PathBuf,
}

impl ResultDir {
    /// Accepts either a directory containing `result.json` or the path of a
    /// result document itself, whatever its name. Logs and relative outputs
    /// resolve against the document's directory.
    pub fn open(path: &Path) -> Result<Self, LoadError> {
        if path.is_file() {
            let root = match path.parent() {
                Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
                _ => PathBuf::from("."),
            };
            return Ok(Self {
                root,
                result_file: path.to_path_buf(),
            });
        }
        if !path.is_dir() {
            return Err(LoadError::MissingResultDir(path.to_path_buf()));
        }

        let result_file = path.join(RESULT_FILENAME);
        if !result_file.is_file() {
            return Err(LoadError::MissingResult(path.to_path_buf()));
        }
        Ok(Self {
            root: path.to_path_buf(),
            result_file,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn result_file(&self) -> &Path {
        &self.result_file
    }

    /// Parse the result document. When it carries no logs, logs are collected
    /// from `logs_dir` (relative to the root) through `filter`.
    pub fn load(&self, logs_dir: &str, filter: &LogFilter) -> Result<Report, LoadError> {
        let path = self.result_file.clone();
        let content = fs::read_to_string(&path).map_err(|source| LoadError::Io {
            path: path.clone(),
            source,
        })?;
        let mut report =
            Report::from_json(&content).map_err(|source| LoadError::Json { path, source })?;

        if report.logs.is_empty() {
            report.logs = collect_logs(&self.root.join(logs_dir), filter);
            log::debug!("collected {} log file(s)", report.logs.len());
        }
        Ok(report)
    }
}

fn stamp_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\d{14}").expect("valid regex"))
}

/// Read every matching file under `dir`, sorted by relative path.
/// A missing directory yields no logs; unreadable files are skipped.
pub fn collect_logs(dir: &Path, filter: &LogFilter) -> Vec<LogEntry> {
    if !dir.is_dir() {
        return Vec::new();
    }

    let mut logs: Vec<LogEntry> = WalkDir::new(dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter_map(|entry| {
            let path = entry.path();
            let relative = path.strip_prefix(dir).ok()?;
            if !filter.matches(relative) {
                return None;
            }
            let content = match fs::read(path) {
                Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
                Err(e) => {
                    log::warn!("skipping log {}: {}", path.display(), e);
                    return None;
                }
            };
            let name = relative.to_string_lossy().replace('\\', "/");
            Some(LogEntry {
                timestamp: log_timestamp(&name, path),
                name,
                content,
            })
        })
        .collect();

    logs.sort_by(|a, b| a.name.cmp(&b.name));
    logs
}

/// First 14-digit run in the file name, else the file's modification time
fn log_timestamp(name: &str, path: &Path) -> Option<String> {
    if let Some(m) = stamp_regex().find(name) {
        return Some(m.as_str().to_string());
    }
    let modified = fs::metadata(path).and_then(|m| m.modified()).ok()?;
    let local: DateTime<Local> = modified.into();
    Some(local.format("%Y%m%d%H%M%S").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{log_filter, LogsConfig};
    use tempfile::TempDir;

    fn default_filter() -> LogFilter {
        log_filter(&LogsConfig::default()).unwrap()
    }

    #[test]
    fn test_open_missing_dir() {
        let err = ResultDir::open(Path::new("/definitely/not/here")).unwrap_err();
        assert!(matches!(err, LoadError::MissingResultDir(_)));
    }

    #[test]
    fn test_open_dir_without_result() {
        let dir = TempDir::new().unwrap();
        let err = ResultDir::open(dir.path()).unwrap_err();
        assert!(matches!(err, LoadError::MissingResult(_)));
    }

    #[test]
    fn test_open_accepts_result_file_path() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(RESULT_FILENAME), "{}").unwrap();
        let rd = ResultDir::open(&dir.path().join(RESULT_FILENAME)).unwrap();
        assert_eq!(rd.root(), dir.path());
    }

    #[test]
    fn test_open_keeps_differently_named_document() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(RESULT_FILENAME), r#"{"executionInfo": {"executionId": "default"}}"#)
            .unwrap();
        let other = dir.path().join("nightly.json");
        fs::write(&other, r#"{"executionInfo": {"executionId": "nightly"}}"#).unwrap();

        let rd = ResultDir::open(&other).unwrap();
        assert_eq!(rd.root(), dir.path());
        assert_eq!(rd.result_file(), other.as_path());
        let report = rd.load("logs", &default_filter()).unwrap();
        let id = report.execution_info.execution_id.unwrap();
        assert_eq!(id.as_str(), "nightly");
    }

    #[test]
    fn test_invalid_json_reports_path() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(RESULT_FILENAME), "{not json").unwrap();
        let rd = ResultDir::open(dir.path()).unwrap();
        let err = rd.load("logs", &default_filter()).unwrap_err();
        assert!(matches!(err, LoadError::Json { .. }));
        assert!(err.to_string().contains(RESULT_FILENAME));
    }

    #[test]
    fn test_logs_collected_sorted_with_name_timestamps() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(RESULT_FILENAME), "{}").unwrap();
        let logs = dir.path().join("logs");
        fs::create_dir_all(&logs).unwrap();
        fs::write(logs.join("worker_20240101130000.log"), "w").unwrap();
        fs::write(logs.join("api_20240101140000.log"), "a").unwrap();
        fs::write(logs.join("notes.txt"), "ignored").unwrap();

        let report = ResultDir::open(dir.path())
            .unwrap()
            .load("logs", &default_filter())
            .unwrap();
        let names: Vec<&str> = report.logs.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["api_20240101140000.log", "worker_20240101130000.log"]);
        assert_eq!(report.logs[0].timestamp.as_deref(), Some("20240101140000"));
        assert_eq!(report.logs[1].content, "w");
    }

    #[test]
    fn test_embedded_logs_take_precedence() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(RESULT_FILENAME),
            r#"{"logs": [{"name": "embedded.log", "timestamp": "20240101120000", "content": "x"}]}"#,
        )
        .unwrap();
        fs::create_dir_all(dir.path().join("logs")).unwrap();
        fs::write(dir.path().join("logs/disk.log"), "y").unwrap();

        let report = ResultDir::open(dir.path())
            .unwrap()
            .load("logs", &default_filter())
            .unwrap();
        assert_eq!(report.logs.len(), 1);
        assert_eq!(report.logs[0].name, "embedded.log");
    }

    #[test]
    fn test_mtime_timestamp_fallback() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("plain.log"), "z").unwrap();
        let logs = collect_logs(dir.path(), &default_filter());
        let ts = logs[0].timestamp.as_deref().unwrap();
        assert_eq!(ts.len(), 14);
        assert!(ts.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_ignore_patterns() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("keep.log"), "").unwrap();
        fs::write(dir.path().join("trace.log"), "").unwrap();
        let filter = log_filter(&LogsConfig {
            ignore: vec!["trace.log".into()],
            ..LogsConfig::default()
        })
        .unwrap();
        let logs = collect_logs(dir.path(), &filter);
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].name, "keep.log");
    }
}
