//! Output formats for a loaded report

mod console;
mod html;
mod json;

pub use console::ConsoleReporter;
pub use html::HtmlExporter;
pub use json::JsonReporter;

use crate::{Category, Report, Status};
use serde::Serialize;

/// Pass/fail totals for one category, counted from the test list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CategoryTotals {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
}

impl CategoryTotals {
    pub fn of(report: &Report, category: Category) -> Self {
        let tests = report.tests(category);
        let passed = tests.iter().filter(|t| t.status().is_pass()).count();
        Self {
            total: tests.len(),
            passed,
            failed: tests.len() - passed,
        }
    }
}

/// Overall run status as recorded in the execution metadata
pub fn run_status(report: &Report) -> Status {
    Status::from_code(report.execution_info.execution_status.as_deref())
}
