//! Tree assembly: one category's tests concatenated into a single fragment

use super::{render_test, Fragment, NodePath};
use crate::{Category, Report};

/// A category rendered in full, with the collapsible nodes it contains
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedCategory {
    pub category: Category,
    pub fragment: Fragment,
    /// Every test, step and assertion path, in document order
    pub nodes: Vec<NodePath>,
}

/// Render every test of a category in document order.
/// Returns `None` when the category is absent or has no tests.
pub fn render_category(report: &Report, category: Category) -> Option<RenderedCategory> {
    let tests = report.tests(category);
    if tests.is_empty() {
        return None;
    }

    let mut nodes = Vec::new();
    let fragment: Fragment = tests
        .iter()
        .enumerate()
        .map(|(i, test)| {
            let path = NodePath::test(category, i);
            nodes.push(path);
            for (j, step) in test.steps.iter().flatten().enumerate() {
                let step_path = path.step(j);
                nodes.push(step_path);
                for k in 0..step.asserts.as_ref().map_or(0, Vec::len) {
                    nodes.push(step_path.assertion(k));
                }
            }
            render_test(test, &path)
        })
        .collect();

    log::debug!(
        "rendered {} with {} tests, {} collapsible nodes",
        category.key(),
        tests.len(),
        nodes.len()
    );

    Some(RenderedCategory {
        category,
        fragment,
        nodes,
    })
}
