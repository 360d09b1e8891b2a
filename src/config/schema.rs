//! Config schema and deserialization

use serde::Deserialize;

pub const DEFAULT_TITLE: &str = "Test Execution Report";
pub const DEFAULT_OUTPUT: &str = "report.html";
pub const DEFAULT_LOGS_DIR: &str = "logs";
pub const DEFAULT_LOG_PATTERN: &str = "**/*.log";

/// Where captured logs are collected from when the result document has none
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct LogsConfig {
    /// Directory relative to the result directory (default: `logs`)
    #[serde(default)]
    pub dir: Option<String>,

    /// Glob patterns of files to include, relative to the logs directory
    #[serde(default)]
    pub include: Vec<String>,

    /// Glob patterns of files to skip
    #[serde(default)]
    pub ignore: Vec<String>,
}

impl LogsConfig {
    pub fn dir(&self) -> &str {
        self.dir.as_deref().unwrap_or(DEFAULT_LOGS_DIR)
    }

    pub fn include_patterns(&self) -> Vec<&str> {
        if self.include.is_empty() {
            vec![DEFAULT_LOG_PATTERN]
        } else {
            self.include.iter().map(|s| s.as_str()).collect()
        }
    }
}

/// Root config structure for .runlensrc.json
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Extend another config file (path relative to this config)
    #[serde(default)]
    pub extends: Option<String>,

    /// Page title of the exported report
    #[serde(default)]
    pub title: Option<String>,

    /// Output file, relative to the result directory (default: report.html)
    #[serde(default)]
    pub output: Option<String>,

    #[serde(default)]
    pub logs: LogsConfig,

    /// Exit 1 when the run's execution status is not a pass
    #[serde(default)]
    pub fail_on_failure: Option<bool>,
}

impl Config {
    /// Merge CLI overrides into config. CLI values take precedence.
    pub fn merge_with_cli(
        mut self,
        cli_title: Option<String>,
        cli_output: Option<String>,
        cli_fail_on_failure: bool,
    ) -> Self {
        if cli_title.is_some() {
            self.title = cli_title;
        }
        if cli_output.is_some() {
            self.output = cli_output;
        }
        if cli_fail_on_failure {
            self.fail_on_failure = Some(true);
        }
        self
    }

    /// Merge another config into this one (for extends)
    pub fn merge_from(&mut self, base: Config) {
        // Base values are overridden by this config's values
        if self.extends.is_none() {
            self.extends = base.extends;
        }
        if self.title.is_none() {
            self.title = base.title;
        }
        if self.output.is_none() {
            self.output = base.output;
        }
        if self.fail_on_failure.is_none() {
            self.fail_on_failure = base.fail_on_failure;
        }
        if self.logs.dir.is_none() {
            self.logs.dir = base.logs.dir;
        }
        if self.logs.include.is_empty() {
            self.logs.include = base.logs.include;
        }

        // Ignore patterns accumulate
        let mut all_ignores = base.logs.ignore;
        all_ignores.append(&mut self.logs.ignore);
        self.logs.ignore = all_ignores;
    }

    pub fn title(&self) -> &str {
        self.title.as_deref().unwrap_or(DEFAULT_TITLE)
    }

    pub fn output(&self) -> &str {
        self.output.as_deref().unwrap_or(DEFAULT_OUTPUT)
    }

    pub fn fail_on_failure(&self) -> bool {
        self.fail_on_failure.unwrap_or(false)
    }
}
