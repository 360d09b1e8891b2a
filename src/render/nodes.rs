//! One renderer per node kind: exception, assertion, step, test

use super::{collapsible, escape, escape_opt, Fragment, NodePath};
use crate::format::{format_timestamp, screenshot_src};
use crate::{Assertion, Exception, Scalar, Step, Test};

fn scalar(value: Option<&Scalar>) -> String {
    escape_opt(value.map(Scalar::as_str))
}

fn render_screenshot(path: &str, alt: &str) -> String {
    let src = escape(&screenshot_src(path));
    format!(
        r#"<img src="{src}" alt="{alt}" data-open="{src}" title="Click to expand">"#,
        src = src,
        alt = alt
    )
}

/// Type, timestamp and message always; stack trace and screenshot when recorded
pub fn render_exception(exception: &Exception) -> Fragment {
    let stack = exception
        .stack_trace
        .as_deref()
        .filter(|s| !s.is_empty())
        .map(|s| {
            format!(
                "<div class=\"exception-stack\">\n<strong>Stack Trace:</strong>\n<pre>{}</pre>\n</div>\n",
                escape(s)
            )
        })
        .unwrap_or_default();

    let screenshot = exception
        .screenshot
        .as_deref()
        .filter(|s| !s.is_empty())
        .map(|s| {
            format!(
                "<div class=\"screenshot\">\n{}\n</div>\n",
                render_screenshot(s, "Exception Screenshot")
            )
        })
        .unwrap_or_default();

    Fragment::new(format!(
        r#"<div class="exception-details">
<div class="exception-header">
<span class="exception-type">{kind}</span>
<span class="exception-timestamp">{timestamp}</span>
</div>
<div class="details-and-screenshot">
<div class="details">
<div class="exception-message">
<strong>Message:</strong>
<pre>{message}</pre>
</div>
{stack}</div>
{screenshot}</div>
</div>
"#,
        kind = escape_opt(exception.kind.as_deref()),
        timestamp = escape(&format_timestamp(exception.timestamp.as_deref())),
        message = scalar(exception.message.as_ref()),
        stack = stack,
        screenshot = screenshot,
    ))
}

fn render_exception_block<'a>(
    class: &str,
    heading: &str,
    exceptions: impl Iterator<Item = &'a Exception>,
) -> String {
    let rendered: Fragment = exceptions.map(render_exception).collect();
    if rendered.is_empty() {
        return String::new();
    }
    format!(
        "<div class=\"{}\">\n<h4>{}</h4>\n{}</div>\n",
        class, heading, rendered
    )
}

fn screenshot_cell(path: Option<&str>) -> String {
    path.filter(|s| !s.is_empty())
        .map(|s| render_screenshot(s, "Screenshot"))
        .unwrap_or_default()
}

/// Expected vs actual side by side, labelled by kind
pub fn render_assertion(assertion: &Assertion, path: &NodePath) -> Fragment {
    let title = format!(
        "<p><strong>{}:</strong> {}</p>",
        assertion.kind.label(),
        escape_opt(assertion.name.as_deref())
    );
    let body = format!(
        r#"<div class="details-and-screenshot">
<div class="details">
<p><strong>Expected:</strong> {expected}</p>
<p><strong>Actual:</strong> {actual}</p>
</div>
<div class="screenshot">{screenshot}</div>
</div>"#,
        expected = scalar(assertion.expected.as_ref()),
        actual = scalar(assertion.actual.as_ref()),
        screenshot = screenshot_cell(assertion.screenshot.as_deref()),
    );
    Fragment::new(collapsible(
        "assertion",
        path,
        &title,
        assertion.status(),
        &body,
    ))
}

/// Timing, screenshot, step-phase exceptions, then assertions in order
pub fn render_step(step: &Step, path: &NodePath) -> Fragment {
    let title = format!("<h4>Step: {}</h4>", escape_opt(step.step_name.as_deref()));

    let assertions: Fragment = step
        .asserts
        .iter()
        .flatten()
        .enumerate()
        .map(|(i, a)| render_assertion(a, &path.assertion(i)))
        .collect();

    let body = format!(
        r#"<div class="details-and-screenshot">
<div class="details">
<p><strong>Start Time:</strong> {start}</p>
<p><strong>End Time:</strong> {end}</p>
<p><strong>Duration:</strong> {duration}</p>
</div>
<div class="screenshot">{screenshot}</div>
</div>
{exceptions}{assertions}"#,
        start = escape(&format_timestamp(step.step_start_time.as_deref())),
        end = escape(&format_timestamp(step.step_end_time.as_deref())),
        duration = scalar(step.step_duration.as_ref()),
        screenshot = screenshot_cell(step.screenshot.as_deref()),
        exceptions = render_exception_block("step-exceptions", "Step Exceptions", step.step_exceptions()),
        assertions = assertions,
    );
    Fragment::new(collapsible("step", path, &title, step.status(), &body))
}

/// Duration, tags, scenario (BDD only), test-phase exceptions, then steps in order
pub fn render_test(test: &Test, path: &NodePath) -> Fragment {
    let title = format!("<h3>Test: {}</h3>", escape_opt(test.name.as_deref()));

    let tags = test
        .tags
        .iter()
        .map(|t| escape(t.as_str()))
        .collect::<Vec<_>>()
        .join(", ");

    let scenario = if path.category.has_scenarios() {
        let s = test.scenario.as_ref();
        format!(
            "<p><strong>Feature:</strong> {}</p>\n<p><strong>Scenario:</strong> {}</p>\n",
            escape_opt(s.and_then(|s| s.feature_name.as_deref())),
            escape_opt(s.and_then(|s| s.scenario_name.as_deref())),
        )
    } else {
        String::new()
    };

    let steps: Fragment = test
        .steps
        .iter()
        .flatten()
        .enumerate()
        .map(|(i, s)| render_step(s, &path.step(i)))
        .collect();

    let body = format!(
        "<p><strong>Duration:</strong> {duration}</p>\n<p><strong>Tags:</strong> {tags}</p>\n{scenario}{exceptions}{steps}",
        duration = scalar(test.duration.as_ref()),
        tags = tags,
        scenario = scenario,
        exceptions = render_exception_block("test-exceptions", "Test Exceptions", test.test_exceptions()),
        steps = steps,
    );
    Fragment::new(collapsible("test-details", path, &title, test.status(), &body))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AssertionKind, Category, Evidence, Phase, Scenario};

    fn exception(kind: &str, phase: Phase) -> Exception {
        Exception {
            kind: Some(kind.to_string()),
            timestamp: Some("2024-01-01T10:00:00".into()),
            message: Some("boom".into()),
            stack_trace: None,
            screenshot: None,
            phase,
        }
    }

    #[test]
    fn test_exception_optional_sections() {
        let plain = render_exception(&exception("ValueError", Phase::Test));
        assert!(plain.as_str().contains("ValueError"));
        assert!(plain.as_str().contains("<pre>boom</pre>"));
        assert!(!plain.as_str().contains("Stack Trace"));
        assert!(!plain.as_str().contains("<img"));

        let mut full = exception("ValueError", Phase::Test);
        full.stack_trace = Some("line 1\nline 2".into());
        full.screenshot = Some(r"C:\shots\err.png".into());
        let html = render_exception(&full);
        assert!(html.as_str().contains("Stack Trace"));
        assert!(html.as_str().contains(r#"src="screenshots/err.png""#));
        assert!(html.as_str().contains(r#"data-open="screenshots/err.png""#));
    }

    #[test]
    fn test_assertion_labels() {
        let path = NodePath::test(Category::Pytest, 0).step(0).assertion(0);
        for (kind, label) in [
            (AssertionKind::Assert, "Assert"),
            (AssertionKind::Verify, "Verify"),
            (AssertionKind::SubStep, "Sub Step"),
        ] {
            let a = Assertion {
                kind,
                name: Some("title matches".into()),
                status: Some("P".into()),
                expected: Some("Home".into()),
                actual: Some("Home".into()),
                screenshot: None,
            };
            let html = render_assertion(&a, &path);
            assert!(html.as_str().contains(&format!("<strong>{}:</strong> title matches", label)));
            assert!(html.as_str().contains("<strong>Expected:</strong> Home"));
            assert!(html.as_str().contains("status-indicator pass"));
        }
    }

    #[test]
    fn test_step_shows_only_step_exceptions() {
        let step = Step {
            step_name: Some("open page".into()),
            step_status: Some("F".into()),
            evidence: Some(Evidence {
                exceptions: vec![exception("StepErr", Phase::Step), exception("TestErr", Phase::Test)],
            }),
            ..Step::default()
        };
        let html = render_step(&step, &NodePath::test(Category::Pytest, 0).step(0));
        assert!(html.as_str().contains("StepErr"));
        assert!(!html.as_str().contains("TestErr"));
        assert!(html.as_str().contains("Step Exceptions"));
    }

    #[test]
    fn test_test_shows_only_test_exceptions() {
        let test = Test {
            name: Some("login".into()),
            test_status: Some("F".into()),
            evidence: Some(Evidence {
                exceptions: vec![exception("StepErr", Phase::Step), exception("TestErr", Phase::Test)],
            }),
            ..Test::default()
        };
        let html = render_test(&test, &NodePath::test(Category::Pytest, 0));
        assert!(html.as_str().contains("TestErr"));
        assert!(!html.as_str().contains("StepErr"));
    }

    #[test]
    fn test_scenario_only_for_bdd() {
        let test = Test {
            name: Some("checkout".into()),
            scenario: Some(Scenario {
                feature_name: Some("Cart".into()),
                scenario_name: Some("Pay by card".into()),
            }),
            ..Test::default()
        };
        let bdd = render_test(&test, &NodePath::test(Category::Bdd, 0));
        assert!(bdd.as_str().contains("<strong>Feature:</strong> Cart"));
        assert!(bdd.as_str().contains("<strong>Scenario:</strong> Pay by card"));

        let plain = render_test(&test, &NodePath::test(Category::Unittest, 0));
        assert!(!plain.as_str().contains("Feature:"));
    }

    #[test]
    fn test_missing_optionals_render_empty() {
        let html = render_test(&Test::default(), &NodePath::test(Category::Bdd, 0));
        assert!(html.as_str().contains("<h3>Test: </h3>"));
        assert!(html.as_str().contains("status-indicator fail"));
        assert!(!html.as_str().contains("class=\"step\""));
        assert!(!html.as_str().contains("Test Exceptions"));
    }

    #[test]
    fn test_text_is_escaped() {
        let test = Test {
            name: Some("<script>alert(1)</script>".into()),
            ..Test::default()
        };
        let html = render_test(&test, &NodePath::test(Category::Pytest, 0));
        assert!(!html.as_str().contains("<script>"));
        assert!(html.as_str().contains("&lt;script&gt;"));
    }

    #[test]
    fn test_children_in_document_order() {
        let step = |name: &str| Step {
            step_name: Some(name.into()),
            ..Step::default()
        };
        let test = Test {
            steps: Some(vec![step("first"), step("second"), step("third")]),
            ..Test::default()
        };
        let html = render_test(&test, &NodePath::test(Category::Pytest, 0)).into_string();
        let a = html.find("Step: first").unwrap();
        let b = html.find("Step: second").unwrap();
        let c = html.find("Step: third").unwrap();
        assert!(a < b && b < c);
        assert!(html.contains("id=\"node-pytest-0-2\""));
    }
}
