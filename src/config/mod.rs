//! Configuration loading for Runlens

mod schema;

pub use schema::{Config, LogsConfig, DEFAULT_LOGS_DIR, DEFAULT_LOG_PATTERN, DEFAULT_OUTPUT, DEFAULT_TITLE};

use crate::loader::LogFilter;
use anyhow::{Context, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILENAME: &str = ".runlensrc.json";

/// Find and load config file with extends resolution. Searches current directory then parents.
pub fn load_config(work_dir: &Path, custom_path: Option<&Path>) -> Result<Config> {
    let path = if let Some(p) = custom_path {
        let path = if p.is_absolute() {
            p.to_path_buf()
        } else {
            work_dir.join(p)
        };
        if path.exists() {
            Some(path)
        } else {
            anyhow::bail!("Config file not found: {}", path.display());
        }
    } else {
        find_config_in_parents(work_dir)?
    };

    match path {
        Some(path) => {
            log::debug!("loading config from {}", path.display());
            load_config_with_extends(&path, &mut HashSet::new())
        }
        None => Ok(Config::default()),
    }
}

/// Load a config file and resolve extends chain
fn load_config_with_extends(config_path: &Path, visited: &mut HashSet<PathBuf>) -> Result<Config> {
    // Prevent circular extends
    let canonical = config_path
        .canonicalize()
        .unwrap_or_else(|_| config_path.to_path_buf());
    if visited.contains(&canonical) {
        anyhow::bail!(
            "Circular extends detected in config: {}",
            config_path.display()
        );
    }
    visited.insert(canonical);

    let content = fs::read_to_string(config_path)
        .with_context(|| format!("Failed to read config: {}", config_path.display()))?;
    let mut config: Config = serde_json::from_str(&content)
        .with_context(|| format!("Invalid JSON in config: {}", config_path.display()))?;

    if let Some(extends) = config.extends.take() {
        let base_config = resolve_extends(config_path, &extends, visited)?;
        config.merge_from(base_config);
    }

    Ok(config)
}

/// Resolve an extends reference relative to the config that names it
fn resolve_extends(
    config_path: &Path,
    extends: &str,
    visited: &mut HashSet<PathBuf>,
) -> Result<Config> {
    let config_dir = config_path.parent().unwrap_or(Path::new("."));

    let extends_path = if Path::new(extends).is_absolute() {
        PathBuf::from(extends)
    } else {
        config_dir.join(extends)
    };

    // Ensure it has .json extension
    let extends_path = if extends_path.extension().is_none() {
        extends_path.with_extension("json")
    } else {
        extends_path
    };

    if !extends_path.exists() {
        anyhow::bail!(
            "Extended config not found: {} (referenced from {})",
            extends_path.display(),
            config_path.display()
        );
    }

    load_config_with_extends(&extends_path, visited)
}

/// Search for .runlensrc.json in directory and its parents
fn find_config_in_parents(mut dir: &Path) -> Result<Option<PathBuf>> {
    loop {
        let candidate = dir.join(CONFIG_FILENAME);
        if candidate.exists() {
            return Ok(Some(candidate));
        }
        dir = match dir.parent() {
            Some(p) => p,
            None => return Ok(None),
        };
    }
}

/// Build a GlobSet from patterns for path matching
pub fn build_glob_set(patterns: &[&str]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern).with_context(|| format!("Invalid glob pattern: {}", pattern))?;
        builder.add(glob);
    }
    builder.build().map_err(|e| anyhow::anyhow!("{}", e))
}

/// Compile the include/ignore patterns of a logs section
pub fn log_filter(logs: &LogsConfig) -> Result<LogFilter> {
    let ignore: Vec<&str> = logs.ignore.iter().map(|s| s.as_str()).collect();
    Ok(LogFilter::new(
        build_glob_set(&logs.include_patterns())?,
        build_glob_set(&ignore)?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_no_config_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = load_config(dir.path(), None).unwrap();
        assert_eq!(config.output(), DEFAULT_OUTPUT);
    }

    #[test]
    fn test_config_found_in_parent() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(CONFIG_FILENAME), r#"{"title": "From parent"}"#).unwrap();
        let nested = dir.path().join("runs").join("2024");
        fs::create_dir_all(&nested).unwrap();
        let config = load_config(&nested, None).unwrap();
        assert_eq!(config.title(), "From parent");
    }

    #[test]
    fn test_missing_custom_config_errors() {
        let dir = TempDir::new().unwrap();
        let err = load_config(dir.path(), Some(Path::new("nope.json"))).unwrap_err();
        assert!(err.to_string().contains("Config file not found"));
    }

    #[test]
    fn test_config_extends() {
        let dir = TempDir::new().unwrap();

        let base_path = dir.path().join("base.json");
        let mut base_file = fs::File::create(&base_path).unwrap();
        writeln!(
            base_file,
            r#"{{
                "title": "Base title",
                "failOnFailure": true,
                "logs": {{ "dir": "captured", "ignore": ["**/trace.log"] }}
            }}"#
        )
        .unwrap();

        let child_path = dir.path().join(CONFIG_FILENAME);
        let mut child_file = fs::File::create(&child_path).unwrap();
        writeln!(
            child_file,
            r#"{{
                "extends": "./base",
                "title": "Child title"
            }}"#
        )
        .unwrap();

        let config = load_config(dir.path(), None).unwrap();

        assert_eq!(config.title(), "Child title");
        assert!(config.fail_on_failure());
        assert_eq!(config.logs.dir(), "captured");
        assert!(config.logs.ignore.contains(&"**/trace.log".to_string()));
    }

    #[test]
    fn test_circular_extends_detected() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.json"), r#"{"extends": "./b.json"}"#).unwrap();
        fs::write(dir.path().join("b.json"), r#"{"extends": "./a.json"}"#).unwrap();
        let err = load_config(dir.path(), Some(Path::new("a.json"))).unwrap_err();
        assert!(err.to_string().contains("Circular extends"));
    }

    #[test]
    fn test_invalid_glob_rejected() {
        assert!(build_glob_set(&["[unclosed"]).is_err());
        assert!(build_glob_set(&["**/*.log"]).is_ok());
    }
}
