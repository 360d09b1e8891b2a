//! Log viewer markup: selector options and the standalone log window

use super::escape;
use crate::format::format_log_timestamp;
use crate::LogEntry;

/// Standalone log window, split around the title and the content
pub const LOG_WINDOW_PARTS: [&str; 3] = [
    "<html>\n<head>\n<title>Log Viewer - ",
    r#"</title>
<style>
body{margin:0;padding:20px;font-family:monospace;background:#f5f5f5}
pre{white-space:pre-wrap;margin:0;background:white;padding:20px;border-radius:4px;box-shadow:0 2px 4px rgba(0,0,0,.1)}
</style>
</head>
<body>
<pre>"#,
    "</pre>\n</body>\n</html>\n",
];

/// Window features the log view is opened with
pub const LOG_WINDOW_FEATURES: &str = "width=1000,height=800";

/// One entry of the log selector
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogOption {
    /// Log name, used to look the entry up on selection
    pub value: String,
    /// `name (formatted timestamp)`
    pub label: String,
}

pub fn log_options(logs: &[LogEntry]) -> Vec<LogOption> {
    logs.iter()
        .map(|log| LogOption {
            value: log.name.clone(),
            label: format!(
                "{} ({})",
                log.name,
                format_log_timestamp(log.timestamp.as_deref())
            ),
        })
        .collect()
}

/// Self-contained document showing one log, independent of the report's stylesheet
pub fn log_window_document(entry: &LogEntry) -> String {
    let [head, middle, tail] = LOG_WINDOW_PARTS;
    let mut doc = String::with_capacity(head.len() + middle.len() + tail.len() + entry.content.len());
    doc.push_str(head);
    doc.push_str(&escape(&entry.name));
    doc.push_str(middle);
    doc.push_str(&escape(&entry.content));
    doc.push_str(tail);
    doc
}
