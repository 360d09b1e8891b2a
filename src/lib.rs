//! Runlens: interactive viewer for collected test-execution reports
//!
//! This library reads a finished run's `result.json` (suites, tests, steps,
//! assertions, exceptions and captured logs) and renders it into a navigable
//! document: a summary panel, per-category test trees and a log viewer.

pub mod config;
pub mod export;
pub mod format;
pub mod loader;
pub mod render;
pub mod view;
pub mod watcher;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// The full test-execution result document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    /// Counts of collected tests per category
    #[serde(default, deserialize_with = "null_as_default")]
    pub collection_info: CollectionInfo,
    /// Run-level metadata
    #[serde(default, deserialize_with = "null_as_default")]
    pub execution_info: ExecutionInfo,
    /// Test nodes grouped by category, in document order
    #[serde(default, deserialize_with = "null_as_default")]
    pub tests: TestsByCategory,
    /// Captured log streams
    #[serde(default, deserialize_with = "null_as_default")]
    pub logs: Vec<LogEntry>,
}

impl Report {
    /// Parse a report document
    pub fn from_json(content: &str) -> serde_json::Result<Self> {
        serde_json::from_str(content)
    }

    /// Tests recorded for a category (empty when the category is absent)
    pub fn tests(&self, category: Category) -> &[Test] {
        self.tests.get(category).unwrap_or(&[])
    }
}

/// Test-organization grouping. Declaration order is the auto-select preference order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "pytestBdd")]
    Bdd,
    #[serde(rename = "pytest")]
    Pytest,
    #[serde(rename = "unittest")]
    Unittest,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Bdd, Category::Pytest, Category::Unittest];

    /// Key used in the document and in DOM ids
    pub fn key(self) -> &'static str {
        match self {
            Category::Bdd => "pytestBdd",
            Category::Pytest => "pytest",
            Category::Unittest => "unittest",
        }
    }

    /// Button label without the count
    pub fn label(self) -> &'static str {
        match self {
            Category::Bdd => "Pytest-BDD",
            Category::Pytest => "Pytest",
            Category::Unittest => "Unittest",
        }
    }

    /// Only BDD tests carry a feature/scenario descriptor
    pub fn has_scenarios(self) -> bool {
        matches!(self, Category::Bdd)
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.key() == key)
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Pass/fail outcome. Any code other than `P` is a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Pass,
    Fail,
}

impl Status {
    pub fn from_code(code: Option<&str>) -> Self {
        match code {
            Some("P") => Status::Pass,
            _ => Status::Fail,
        }
    }

    pub fn is_pass(self) -> bool {
        self == Status::Pass
    }
}

/// Collected test counts, as recorded by the collector
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionInfo {
    #[serde(default, deserialize_with = "lenient_count")]
    pub test_count: Option<u64>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub pytest_bdd_count: Option<u64>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub pytest_count: Option<u64>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub unittest_count: Option<u64>,
}

impl CollectionInfo {
    /// Recorded count for a category. Not reconciled against the test lists.
    pub fn count(&self, category: Category) -> Option<u64> {
        match category {
            Category::Bdd => self.pytest_bdd_count,
            Category::Pytest => self.pytest_count,
            Category::Unittest => self.unittest_count,
        }
    }
}

/// Run-level metadata
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionInfo {
    #[serde(default)]
    pub execution_id: Option<Scalar>,
    /// Status code (`P` for pass)
    #[serde(default, deserialize_with = "lenient_text")]
    pub execution_status: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub execution_start_time: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub execution_end_time: Option<String>,
    /// Human-readable duration
    #[serde(default)]
    pub execution_duration: Option<Scalar>,
    #[serde(default)]
    pub total_passed: Option<Scalar>,
    #[serde(default)]
    pub total_failed: Option<Scalar>,
    #[serde(default, deserialize_with = "deserialize_truthy")]
    pub is_parallel: bool,
    /// Component name -> version
    #[serde(default, deserialize_with = "null_as_default")]
    pub framework_versions: BTreeMap<String, Scalar>,
    #[serde(default)]
    pub browser: Option<Scalar>,
    #[serde(default)]
    pub execution_tags: Option<Scalar>,
    #[serde(default)]
    pub environment: Option<Scalar>,
    #[serde(default)]
    pub user: Option<Scalar>,
}

/// Tests grouped by category
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestsByCategory {
    #[serde(default)]
    pub pytest_bdd: Option<Vec<Test>>,
    #[serde(default)]
    pub pytest: Option<Vec<Test>>,
    #[serde(default)]
    pub unittest: Option<Vec<Test>>,
}

impl TestsByCategory {
    pub fn get(&self, category: Category) -> Option<&[Test]> {
        match category {
            Category::Bdd => self.pytest_bdd.as_deref(),
            Category::Pytest => self.pytest.as_deref(),
            Category::Unittest => self.unittest.as_deref(),
        }
    }
}

/// A single test case
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Test {
    #[serde(default, deserialize_with = "lenient_text")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub test_status: Option<String>,
    #[serde(default)]
    pub duration: Option<Scalar>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<Scalar>,
    /// Present only for BDD tests
    #[serde(default)]
    pub scenario: Option<Scenario>,
    #[serde(default)]
    pub steps: Option<Vec<Step>>,
    #[serde(default)]
    pub evidence: Option<Evidence>,
}

impl Test {
    pub fn status(&self) -> Status {
        Status::from_code(self.test_status.as_deref())
    }

    /// Exceptions raised outside of any step
    pub fn test_exceptions(&self) -> impl Iterator<Item = &Exception> {
        phase_filtered(self.evidence.as_ref(), Phase::Test)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scenario {
    #[serde(default, deserialize_with = "lenient_text")]
    pub feature_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub scenario_name: Option<String>,
}

/// A step inside a test
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Step {
    #[serde(default, deserialize_with = "lenient_text")]
    pub step_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub step_status: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub step_start_time: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub step_end_time: Option<String>,
    #[serde(default)]
    pub step_duration: Option<Scalar>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub screenshot: Option<String>,
    #[serde(default)]
    pub evidence: Option<Evidence>,
    #[serde(default)]
    pub asserts: Option<Vec<Assertion>>,
}

impl Step {
    pub fn status(&self) -> Status {
        Status::from_code(self.step_status.as_deref())
    }

    /// Exceptions raised while the step was running
    pub fn step_exceptions(&self) -> impl Iterator<Item = &Exception> {
        phase_filtered(self.evidence.as_ref(), Phase::Step)
    }
}

/// Evidence attached to a test or step
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Evidence {
    #[serde(default, deserialize_with = "null_as_default")]
    pub exceptions: Vec<Exception>,
}

fn phase_filtered(evidence: Option<&Evidence>, phase: Phase) -> impl Iterator<Item = &Exception> {
    evidence
        .into_iter()
        .flat_map(|e| e.exceptions.iter())
        .filter(move |e| e.phase == phase)
}

/// An assertion, verification or sub-step recorded inside a step
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assertion {
    #[serde(rename = "type", default)]
    pub kind: AssertionKind,
    #[serde(default, deserialize_with = "lenient_text")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub status: Option<String>,
    #[serde(default)]
    pub expected: Option<Scalar>,
    #[serde(default)]
    pub actual: Option<Scalar>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub screenshot: Option<String>,
}

impl Assertion {
    pub fn status(&self) -> Status {
        Status::from_code(self.status.as_deref())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AssertionKind {
    #[default]
    Assert,
    Verify,
    /// Sub-step recorded with the same shape as an assertion
    #[serde(rename = "step")]
    SubStep,
    Other,
}

impl<'de> Deserialize<'de> for AssertionKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(AssertionKind::from_value(&value))
    }
}

impl AssertionKind {
    /// Unknown tags and non-string values read as `Other`; null as the default
    fn from_value(value: &Value) -> Self {
        match value {
            Value::Null => AssertionKind::Assert,
            Value::String(s) => match s.as_str() {
                "assert" => AssertionKind::Assert,
                "verify" => AssertionKind::Verify,
                "step" => AssertionKind::SubStep,
                _ => AssertionKind::Other,
            },
            _ => AssertionKind::Other,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AssertionKind::Verify => "Verify",
            AssertionKind::SubStep => "Sub Step",
            AssertionKind::Assert | AssertionKind::Other => "Assert",
        }
    }
}

/// An exception captured during the run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Exception {
    #[serde(rename = "type", default, deserialize_with = "lenient_text")]
    pub kind: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub message: Option<Scalar>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub stack_trace: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub screenshot: Option<String>,
    #[serde(default)]
    pub phase: Phase,
}

/// Which container an exception belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Test,
    Step,
    #[default]
    Other,
}

impl<'de> Deserialize<'de> for Phase {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(match value.as_str() {
            Some("test") => Phase::Test,
            Some("step") => Phase::Step,
            _ => Phase::Other,
        })
    }
}

/// A captured log stream
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LogEntry {
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    /// `YYYYMMDDHHMMSS`
    #[serde(default, deserialize_with = "lenient_text")]
    pub timestamp: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub content: String,
}

/// Display-only value that accepts any JSON shape
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Scalar(String);

impl Scalar {
    pub fn new(s: impl Into<String>) -> Self {
        Scalar(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn from_value(value: &Value) -> Self {
        match value {
            Value::Null => Scalar::default(),
            Value::Bool(b) => Scalar(b.to_string()),
            Value::Number(n) => Scalar(n.to_string()),
            Value::String(s) => Scalar(s.clone()),
            Value::Array(items) => Scalar(
                items
                    .iter()
                    .map(|i| Scalar::from_value(i).0)
                    .collect::<Vec<_>>()
                    .join(", "),
            ),
            Value::Object(_) => Scalar(value.to_string()),
        }
    }
}

impl<'de> Deserialize<'de> for Scalar {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(Scalar::from_value(&value))
    }
}

impl std::fmt::Display for Scalar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Scalar(s.to_string())
    }
}

/// Text field that also accepts numbers, booleans and nested values. `null` reads as absent.
fn lenient_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(Scalar::from_value(&other).0),
    })
}

fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(lenient_text(deserializer)?.unwrap_or_default())
}

/// Counts that are not a non-negative integer are treated as unrecorded
fn lenient_count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u64>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(value.as_u64())
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Reads a flag the way a browser would evaluate it for truthiness
fn deserialize_truthy<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Null => false,
        Value::Bool(b) => b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(false),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    })
}
