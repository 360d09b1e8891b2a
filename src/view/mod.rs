//! Interaction layer: the host page contract and the viewer state machine

mod controller;
mod page;
mod viewer;

pub use controller::{Controller, Expansion};
pub use page::{CategoryButton, Page};
pub use viewer::Viewer;

use crate::render::{FieldValue, Fragment, LogOption, SummaryField};
use crate::Category;

/// Where the log content area is scrolled after an update
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogScroll {
    #[default]
    Top,
    End,
}

/// The named insertion points a host page exposes
pub trait Surface {
    fn set_field(&mut self, field: SummaryField, value: FieldValue);
    fn set_versions(&mut self, versions: Vec<(String, String)>);
    fn set_category_button(&mut self, category: Category, label: String, enabled: bool);
    /// Mark `category` as the active tab
    fn set_active_category(&mut self, category: Category);
    /// Replace the whole content of the test-details container in one step
    fn replace_details(&mut self, fragment: Fragment);
    fn hide_logs(&mut self);
    fn set_log_options(&mut self, options: Vec<LogOption>);
    fn show_log(&mut self, content: &str, scroll: LogScroll);
}

/// A secondary view opened from the report
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NewView {
    /// A blank window written with self-contained markup
    Document {
        markup: String,
        /// Window features passed when opening, e.g. its size
        features: &'static str,
    },
    /// Direct navigation to a resource
    Navigate(String),
}
