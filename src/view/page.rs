//! In-memory host page

use super::{LogScroll, Surface};
use crate::render::{FieldValue, Fragment, LogOption, SummaryField};
use crate::Category;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryButton {
    pub label: String,
    pub enabled: bool,
}

/// Records what each insertion point currently shows
#[derive(Debug, Default)]
pub struct Page {
    pub fields: BTreeMap<SummaryField, FieldValue>,
    pub versions: Vec<(String, String)>,
    pub buttons: BTreeMap<Category, CategoryButton>,
    pub active_category: Option<Category>,
    pub details: Fragment,
    /// How many times the details container has been replaced
    pub replacements: usize,
    pub logs_hidden: bool,
    pub log_options: Vec<LogOption>,
    pub log_content: Option<String>,
    pub log_scroll: LogScroll,
}

impl Page {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(&self, field: SummaryField) -> Option<&FieldValue> {
        self.fields.get(&field)
    }

    pub fn button(&self, category: Category) -> Option<&CategoryButton> {
        self.buttons.get(&category)
    }
}

impl Surface for Page {
    fn set_field(&mut self, field: SummaryField, value: FieldValue) {
        self.fields.insert(field, value);
    }

    fn set_versions(&mut self, versions: Vec<(String, String)>) {
        self.versions = versions;
    }

    fn set_category_button(&mut self, category: Category, label: String, enabled: bool) {
        self.buttons.insert(category, CategoryButton { label, enabled });
    }

    fn set_active_category(&mut self, category: Category) {
        self.active_category = Some(category);
    }

    fn replace_details(&mut self, fragment: Fragment) {
        self.details = fragment;
        self.replacements += 1;
    }

    fn hide_logs(&mut self) {
        self.logs_hidden = true;
    }

    fn set_log_options(&mut self, options: Vec<LogOption>) {
        self.log_options = options;
    }

    fn show_log(&mut self, content: &str, scroll: LogScroll) {
        self.log_content = Some(content.to_string());
        self.log_scroll = scroll;
    }
}
