//! JSON reporter for machine-readable output

use super::{run_status, CategoryTotals};
use crate::format::status_label;
use crate::{Category, Report};
use serde::Serialize;
use std::collections::BTreeMap;

/// Reporter for JSON output
pub struct JsonReporter {
    /// Whether to pretty-print JSON
    pretty: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonSummary<'a> {
    execution_id: Option<&'a str>,
    status: &'static str,
    categories: BTreeMap<&'static str, CategoryTotals>,
    logs: Vec<&'a str>,
}

impl JsonReporter {
    pub fn new() -> Self {
        Self { pretty: false }
    }

    /// Enable pretty-printing
    pub fn pretty(mut self) -> Self {
        self.pretty = true;
        self
    }

    pub fn report(&self, report: &Report) -> String {
        let summary = JsonSummary {
            execution_id: report.execution_info.execution_id.as_ref().map(|s| s.as_str()),
            status: status_label(run_status(report)),
            categories: Category::ALL
                .iter()
                .map(|&c| (c.key(), CategoryTotals::of(report, c)))
                .collect(),
            logs: report.logs.iter().map(|l| l.name.as_str()).collect(),
        };

        if self.pretty {
            serde_json::to_string_pretty(&summary).unwrap_or_else(|_| "{}".to_string())
        } else {
            serde_json::to_string(&summary).unwrap_or_else(|_| "{}".to_string())
        }
    }
}

impl Default for JsonReporter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_summary_has_expected_keys() {
        let report = Report::from_json(
            r#"{
                "executionInfo": {"executionId": 17, "executionStatus": "P"},
                "tests": {"pytestBdd": [{"testStatus": "P"}], "unittest": [{"testStatus": "F"}]},
                "logs": [{"name": "a.log"}, {"name": "b.log"}]
            }"#,
        )
        .unwrap();
        let json = JsonReporter::new().pretty().report(&report);
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed["executionId"], "17");
        assert_eq!(parsed["status"], "Pass");
        assert_eq!(parsed["categories"]["pytestBdd"]["passed"], 1);
        assert_eq!(parsed["categories"]["unittest"]["failed"], 1);
        assert_eq!(parsed["categories"]["pytest"]["total"], 0);
        assert_eq!(parsed["logs"], serde_json::json!(["a.log", "b.log"]));
    }

    #[test]
    fn test_missing_execution_id_is_null() {
        let json = JsonReporter::new().report(&Report::default());
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(parsed["executionId"].is_null());
        assert_eq!(parsed["status"], "Fail");
    }
}
