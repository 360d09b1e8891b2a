//! Markup rendering for report nodes
//!
//! Every function here is pure: the same input always yields byte-identical
//! markup, and optional fields that are absent render as empty sections.

pub mod logs;
pub mod nodes;
pub mod summary;
pub mod tree;

pub use logs::{log_options, log_window_document, LogOption, LOG_WINDOW_FEATURES, LOG_WINDOW_PARTS};
pub use nodes::{render_assertion, render_exception, render_step, render_test};
pub use summary::{component_versions, summary_fields, FieldValue, SummaryField};
pub use tree::{render_category, RenderedCategory};

use crate::format::{status_class, status_label};
use crate::{Category, Status};

/// Glyph shown on a collapsed header
pub const COLLAPSED_GLYPH: char = '▼';
/// Glyph shown on an expanded header
pub const EXPANDED_GLYPH: char = '▲';

/// An immutable piece of markup, ready to be swapped into a container
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fragment(String);

impl Fragment {
    pub fn new(markup: String) -> Self {
        Fragment(markup)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<Fragment> for Fragment {
    fn from_iter<I: IntoIterator<Item = Fragment>>(iter: I) -> Self {
        let mut out = String::new();
        for f in iter {
            out.push_str(&f.0);
        }
        Fragment(out)
    }
}

impl std::fmt::Display for Fragment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Stable identity of a collapsible node: category + test/step/assertion indices
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodePath {
    pub category: Category,
    pub test: usize,
    pub step: Option<usize>,
    pub assertion: Option<usize>,
}

/// Which collapsible node a path points at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Test,
    Step,
    Assertion,
}

impl NodePath {
    pub fn test(category: Category, test: usize) -> Self {
        Self {
            category,
            test,
            step: None,
            assertion: None,
        }
    }

    pub fn step(mut self, step: usize) -> Self {
        self.step = Some(step);
        self.assertion = None;
        self
    }

    /// Only meaningful on a step path
    pub fn assertion(mut self, assertion: usize) -> Self {
        self.assertion = Some(assertion);
        self
    }

    pub fn kind(&self) -> NodeKind {
        match (self.step, self.assertion) {
            (Some(_), Some(_)) => NodeKind::Assertion,
            (Some(_), None) => NodeKind::Step,
            _ => NodeKind::Test,
        }
    }

    /// DOM id, e.g. `node-pytest-0-2-1`
    pub fn dom_id(&self) -> String {
        let mut id = format!("node-{}-{}", self.category.key(), self.test);
        if let Some(s) = self.step {
            id.push_str(&format!("-{}", s));
            if let Some(a) = self.assertion {
                id.push_str(&format!("-{}", a));
            }
        }
        id
    }
}

impl std::fmt::Display for NodePath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.dom_id())
    }
}

/// Escape text for element content and attribute values
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

pub(crate) fn escape_opt(s: Option<&str>) -> String {
    s.map(escape).unwrap_or_default()
}

/// The shared header + body shell for tests, steps and assertions.
/// `title` is markup; everything else is generated here.
pub(crate) fn collapsible(
    class: &str,
    path: &NodePath,
    title: &str,
    status: Status,
    body: &str,
) -> String {
    format!(
        r#"<div class="{class}" id="{id}">
<div class="collapsible-header" data-node="{id}">
<span class="toggle-indicator">{glyph}</span>
{title}
<span class="status-indicator {status_class}">{status}</span>
</div>
<div class="collapsible-body">
{body}
</div>
</div>
"#,
        class = class,
        id = path.dom_id(),
        glyph = COLLAPSED_GLYPH,
        title = title,
        status_class = status_class(status),
        status = status_label(status),
        body = body,
    )
}
