//! Summary panel: fixed scalar fields populated once from report metadata

use crate::format::{format_bool, format_status, format_timestamp, status_class};
use crate::{Report, Scalar, Status};

/// Fixed output locations of the summary panel
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SummaryField {
    TestCount,
    PytestCount,
    PytestBddCount,
    UnittestCount,
    ExecutionId,
    ExecutionStatus,
    ExecutionStartTime,
    ExecutionEndTime,
    ExecutionDuration,
    TotalPassed,
    TotalFailed,
    IsParallel,
    Browser,
    ExecutionTags,
    Environment,
    User,
}

impl SummaryField {
    pub const ALL: [SummaryField; 16] = [
        SummaryField::TestCount,
        SummaryField::PytestCount,
        SummaryField::PytestBddCount,
        SummaryField::UnittestCount,
        SummaryField::ExecutionId,
        SummaryField::ExecutionStatus,
        SummaryField::ExecutionStartTime,
        SummaryField::ExecutionEndTime,
        SummaryField::ExecutionDuration,
        SummaryField::TotalPassed,
        SummaryField::TotalFailed,
        SummaryField::IsParallel,
        SummaryField::Browser,
        SummaryField::ExecutionTags,
        SummaryField::Environment,
        SummaryField::User,
    ];

    /// Element id of the insertion point
    pub fn id(self) -> &'static str {
        match self {
            SummaryField::TestCount => "testCount",
            SummaryField::PytestCount => "pytestCount",
            SummaryField::PytestBddCount => "pytestBddCount",
            SummaryField::UnittestCount => "unittestCount",
            SummaryField::ExecutionId => "executionId",
            SummaryField::ExecutionStatus => "executionStatus",
            SummaryField::ExecutionStartTime => "executionStartTime",
            SummaryField::ExecutionEndTime => "executionEndTime",
            SummaryField::ExecutionDuration => "executionDuration",
            SummaryField::TotalPassed => "totalPassed",
            SummaryField::TotalFailed => "totalFailed",
            SummaryField::IsParallel => "isParallel",
            SummaryField::Browser => "browser",
            SummaryField::ExecutionTags => "executionTags",
            SummaryField::Environment => "environment",
            SummaryField::User => "user",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SummaryField::TestCount => "Total Tests",
            SummaryField::PytestCount => "Pytest",
            SummaryField::PytestBddCount => "Pytest-BDD",
            SummaryField::UnittestCount => "Unittest",
            SummaryField::ExecutionId => "Execution ID",
            SummaryField::ExecutionStatus => "Status",
            SummaryField::ExecutionStartTime => "Start Time",
            SummaryField::ExecutionEndTime => "End Time",
            SummaryField::ExecutionDuration => "Duration",
            SummaryField::TotalPassed => "Passed",
            SummaryField::TotalFailed => "Failed",
            SummaryField::IsParallel => "Parallel",
            SummaryField::Browser => "Browser",
            SummaryField::ExecutionTags => "Tags",
            SummaryField::Environment => "Environment",
            SummaryField::User => "User",
        }
    }
}

/// Text for one field, plus an optional style class
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FieldValue {
    pub text: String,
    pub class: Option<&'static str>,
}

impl FieldValue {
    fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            class: None,
        }
    }
}

fn scalar(value: Option<&Scalar>) -> FieldValue {
    FieldValue::plain(value.map(|s| s.as_str().to_string()).unwrap_or_default())
}

fn count(value: Option<u64>) -> FieldValue {
    FieldValue::plain(value.map(|n| n.to_string()).unwrap_or_default())
}

/// Compute the value of one field. Each field is independent of the others.
pub fn field_value(report: &Report, field: SummaryField) -> FieldValue {
    let collection = &report.collection_info;
    let exec = &report.execution_info;
    match field {
        SummaryField::TestCount => count(collection.test_count),
        SummaryField::PytestCount => count(collection.pytest_count),
        SummaryField::PytestBddCount => count(collection.pytest_bdd_count),
        SummaryField::UnittestCount => count(collection.unittest_count),
        SummaryField::ExecutionId => scalar(exec.execution_id.as_ref()),
        SummaryField::ExecutionStatus => {
            let code = exec.execution_status.as_deref();
            FieldValue {
                text: format_status(code).to_string(),
                class: Some(status_class(Status::from_code(code))),
            }
        }
        SummaryField::ExecutionStartTime => {
            FieldValue::plain(format_timestamp(exec.execution_start_time.as_deref()))
        }
        SummaryField::ExecutionEndTime => {
            FieldValue::plain(format_timestamp(exec.execution_end_time.as_deref()))
        }
        SummaryField::ExecutionDuration => scalar(exec.execution_duration.as_ref()),
        SummaryField::TotalPassed => scalar(exec.total_passed.as_ref()),
        SummaryField::TotalFailed => scalar(exec.total_failed.as_ref()),
        SummaryField::IsParallel => FieldValue::plain(format_bool(exec.is_parallel)),
        SummaryField::Browser => scalar(exec.browser.as_ref()),
        SummaryField::ExecutionTags => scalar(exec.execution_tags.as_ref()),
        SummaryField::Environment => scalar(exec.environment.as_ref()),
        SummaryField::User => scalar(exec.user.as_ref()),
    }
}

/// Every fixed field, in panel order
pub fn summary_fields(report: &Report) -> Vec<(SummaryField, FieldValue)> {
    SummaryField::ALL
        .iter()
        .map(|&f| (f, field_value(report, f)))
        .collect()
}

/// Component name/version pairs, sorted by name
pub fn component_versions(report: &Report) -> Vec<(String, String)> {
    report
        .execution_info
        .framework_versions
        .iter()
        .map(|(name, version)| (name.clone(), version.as_str().to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Report {
        Report::from_json(
            r#"{
                "collectionInfo": {"testCount": 5, "pytestCount": 3, "pytestBddCount": 2, "unittestCount": 0},
                "executionInfo": {
                    "executionId": "run-42",
                    "executionStatus": "F",
                    "executionStartTime": "2024-01-01T12:00:00.000",
                    "executionEndTime": "2024-01-01T12:30:00.000",
                    "executionDuration": "30 minutes",
                    "totalPassed": 4,
                    "totalFailed": 1,
                    "isParallel": true,
                    "frameworkVersions": {"core": "1.2.0", "api": "0.9.1"},
                    "browser": "chrome",
                    "executionTags": ["smoke", "nightly"],
                    "environment": "qa",
                    "user": "ci"
                }
            }"#,
        )
        .unwrap()
    }

    fn get(fields: &[(SummaryField, FieldValue)], field: SummaryField) -> &FieldValue {
        &fields.iter().find(|(f, _)| *f == field).unwrap().1
    }

    #[test]
    fn test_summary_populates_every_field() {
        let fields = summary_fields(&sample());
        assert_eq!(fields.len(), SummaryField::ALL.len());
        assert_eq!(get(&fields, SummaryField::TestCount).text, "5");
        assert_eq!(get(&fields, SummaryField::UnittestCount).text, "0");
        assert_eq!(get(&fields, SummaryField::ExecutionId).text, "run-42");
        assert_eq!(get(&fields, SummaryField::ExecutionStartTime).text, "January 1, 2024, 12:00 PM");
        assert_eq!(get(&fields, SummaryField::TotalFailed).text, "1");
        assert_eq!(get(&fields, SummaryField::IsParallel).text, "True");
        assert_eq!(get(&fields, SummaryField::ExecutionTags).text, "smoke, nightly");
    }

    #[test]
    fn test_status_field_carries_class() {
        let fields = summary_fields(&sample());
        let status = get(&fields, SummaryField::ExecutionStatus);
        assert_eq!(status.text, "Fail");
        assert_eq!(status.class, Some("fail"));
    }

    #[test]
    fn test_missing_fields_render_empty() {
        let fields = summary_fields(&Report::default());
        assert_eq!(get(&fields, SummaryField::ExecutionId).text, "");
        assert_eq!(get(&fields, SummaryField::ExecutionStartTime).text, "");
        assert_eq!(get(&fields, SummaryField::ExecutionStatus).text, "Fail");
        assert_eq!(get(&fields, SummaryField::IsParallel).text, "False");
    }

    #[test]
    fn test_component_versions_sorted() {
        let versions = component_versions(&sample());
        assert_eq!(
            versions,
            vec![
                ("api".to_string(), "0.9.1".to_string()),
                ("core".to_string(), "1.2.0".to_string()),
            ]
        );
    }
}
