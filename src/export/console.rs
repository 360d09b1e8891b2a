//! Console reporter with colored output

use super::{run_status, CategoryTotals};
use crate::format::{format_log_timestamp, format_timestamp, status_label};
use crate::{Category, Report, Status};
use colored::{ColoredString, Colorize};

/// Reporter for terminal output
pub struct ConsoleReporter {
    /// Whether to show verbose output
    verbose: bool,
}

impl ConsoleReporter {
    pub fn new() -> Self {
        Self { verbose: false }
    }

    /// Also list failing tests and log names
    pub fn verbose(mut self) -> Self {
        self.verbose = true;
        self
    }

    /// Print the full summary
    pub fn report(&self, report: &Report) {
        print!("{}", self.render(report));
    }

    /// Print a single line
    pub fn report_quiet(&self, report: &Report) {
        println!("{}", self.render_quiet(report));
    }

    pub fn render_quiet(&self, report: &Report) -> String {
        let exec = &report.execution_info;
        let id = exec
            .execution_id
            .as_ref()
            .map(|s| s.as_str())
            .unwrap_or("-");
        let (passed, failed) = Category::ALL.iter().fold((0, 0), |(p, f), &c| {
            let t = CategoryTotals::of(report, c);
            (p + t.passed, f + t.failed)
        });
        format!(
            "{}: {} ({} passed, {} failed)",
            id,
            self.colorize_status(run_status(report)),
            passed,
            failed
        )
    }

    pub fn render(&self, report: &Report) -> String {
        let exec = &report.execution_info;
        let mut out = String::new();
        out.push('\n');
        out.push_str(&format!(
            "{}\n",
            format!(
                "Test Execution: {}",
                exec.execution_id.as_ref().map(|s| s.as_str()).unwrap_or("-")
            )
            .bold()
        ));
        out.push_str(&format!(
            "   Status: {}\n",
            self.colorize_status(run_status(report)).bold()
        ));
        out.push_str(&format!(
            "   Started: {} | Ended: {}\n",
            format_timestamp(exec.execution_start_time.as_deref()),
            format_timestamp(exec.execution_end_time.as_deref())
        ));
        if let Some(env) = &exec.environment {
            out.push_str(&format!("   Environment: {}\n", env));
        }
        out.push('\n');

        out.push_str(&format!("   {}\n", "Categories:".bold()));
        for category in Category::ALL {
            let t = CategoryTotals::of(report, category);
            let failed = format!("{} failed", t.failed);
            out.push_str(&format!(
                "   {:<12} {:>3} tests  {}  {}\n",
                category.label(),
                t.total,
                format!("{} passed", t.passed).green(),
                if t.failed > 0 { failed.red() } else { failed.dimmed() }
            ));
        }

        if self.verbose {
            self.push_failures(report, &mut out);
            if !report.logs.is_empty() {
                out.push_str(&format!("\n   {}\n", "Logs:".bold()));
                for log in &report.logs {
                    out.push_str(&format!(
                        "   {} {}\n",
                        log.name,
                        format!("({})", format_log_timestamp(log.timestamp.as_deref())).dimmed()
                    ));
                }
            }
        }
        out.push('\n');
        out
    }

    fn push_failures(&self, report: &Report, out: &mut String) {
        let failures: Vec<(Category, &str)> = Category::ALL
            .iter()
            .flat_map(|&c| {
                report
                    .tests(c)
                    .iter()
                    .filter(|t| !t.status().is_pass())
                    .map(move |t| (c, t.name.as_deref().unwrap_or("")))
            })
            .collect();
        if failures.is_empty() {
            return;
        }
        out.push_str(&format!("\n   {}\n", "Failed tests:".bold()));
        for (category, name) in failures {
            out.push_str(&format!(
                "   {} {} {}\n",
                "✗".red(),
                format!("[{}]", category.label()).dimmed(),
                name
            ));
        }
    }

    fn colorize_status(&self, status: Status) -> ColoredString {
        match status {
            Status::Pass => status_label(status).green(),
            Status::Fail => status_label(status).red(),
        }
    }
}

impl Default for ConsoleReporter {
    fn default() -> Self {
        Self::new()
    }
}
