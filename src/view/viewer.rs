//! Viewer: drives a `Surface` from a report in response to user events

use super::{Controller, Expansion, LogScroll, NewView, Surface};
use crate::render::{
    component_versions, log_options, log_window_document, render_category, summary_fields,
    NodePath, LOG_WINDOW_FEATURES,
};
use crate::{Category, LogEntry, Report};

/// Owns the host surface and all transient UI state. The report is borrowed
/// and never modified.
pub struct Viewer<'r, S: Surface> {
    report: &'r Report,
    surface: S,
    controller: Controller,
    active: Option<Category>,
    selected_log: Option<usize>,
}

impl<'r, S: Surface> Viewer<'r, S> {
    pub fn new(report: &'r Report, surface: S) -> Self {
        Self {
            report,
            surface,
            controller: Controller::new(),
            active: None,
            selected_log: None,
        }
    }

    /// Populate the summary, set up the category buttons, render the preferred
    /// category and set up the log viewer
    pub fn start(&mut self) {
        self.render_summary();
        self.setup_categories();
        self.setup_logs();
    }

    fn render_summary(&mut self) {
        for (field, value) in summary_fields(self.report) {
            self.surface.set_field(field, value);
        }
        self.surface.set_versions(component_versions(self.report));
    }

    fn setup_categories(&mut self) {
        for category in Category::ALL {
            let count = self.report.collection_info.count(category);
            let label = format!(
                "{} ({})",
                category.label(),
                count.map(|n| n.to_string()).unwrap_or_default()
            );
            let enabled = self.is_enabled(category);
            self.surface.set_category_button(category, label, enabled);
        }

        match self.preferred_category() {
            Some(category) => {
                self.show_category(category);
            }
            None => log::debug!("no category has tests; nothing rendered"),
        }
    }

    /// First category, in preference order, that actually has tests
    pub fn preferred_category(&self) -> Option<Category> {
        Category::ALL
            .into_iter()
            .find(|&c| !self.report.tests(c).is_empty())
    }

    /// Buttons are disabled only when the recorded count is exactly zero
    pub fn is_enabled(&self, category: Category) -> bool {
        self.report.collection_info.count(category) != Some(0)
    }

    /// Category button click. Disabled buttons do nothing. Returns whether
    /// the container was replaced.
    pub fn click_category(&mut self, category: Category) -> bool {
        if !self.is_enabled(category) {
            return false;
        }
        self.show_category(category)
    }

    fn show_category(&mut self, category: Category) -> bool {
        let Some(rendered) = render_category(self.report, category) else {
            return false;
        };
        self.surface.replace_details(rendered.fragment);
        self.controller.attach(&rendered.nodes);
        self.surface.set_active_category(category);
        self.active = Some(category);
        true
    }

    /// Header click on a rendered node
    pub fn click_header(&mut self, path: &NodePath) -> Option<Expansion> {
        self.controller.toggle(path)
    }

    pub fn expansion(&self, path: &NodePath) -> Option<Expansion> {
        self.controller.state(path)
    }

    pub fn active_category(&self) -> Option<Category> {
        self.active
    }

    fn setup_logs(&mut self) {
        let logs = &self.report.logs;
        if logs.is_empty() {
            self.surface.hide_logs();
            return;
        }
        self.surface.set_log_options(log_options(logs));
        self.selected_log = Some(0);
        self.surface.show_log(&logs[0].content, LogScroll::Top);
    }

    /// Selector change. Unknown names leave the display unchanged.
    pub fn select_log(&mut self, name: &str) -> bool {
        let Some(index) = self.report.logs.iter().position(|l| l.name == name) else {
            return false;
        };
        self.selected_log = Some(index);
        self.surface
            .show_log(&self.report.logs[index].content, LogScroll::End);
        true
    }

    pub fn selected_log(&self) -> Option<&'r LogEntry> {
        self.selected_log.and_then(|i| self.report.logs.get(i))
    }

    /// Reopen the selected log in its own window
    pub fn open_log_window(&self) -> Option<NewView> {
        self.selected_log()
            .map(|entry| NewView::Document {
                markup: log_window_document(entry),
                features: LOG_WINDOW_FEATURES,
            })
    }

    /// Screenshot thumbnail click
    pub fn open_image(&self, src: &str) -> NewView {
        NewView::Navigate(src.to_string())
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn into_surface(self) -> S {
        self.surface
    }
}
