//! Display formatting for raw report fields

use crate::Status;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use regex::Regex;
use std::sync::OnceLock;

/// Directory screenshots are copied into, next to the report
pub const SCREENSHOT_DIR: &str = "screenshots";

const LONG_FORMAT: &str = "%B %-d, %Y, %I:%M %p";
const SHORT_FORMAT: &str = "%-m/%-d/%Y, %-I:%M:%S %p";

const NAIVE_LAYOUTS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

fn digit_timestamp() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(\d{4})(\d{2})(\d{2})(\d{2})(\d{2})(\d{2})$").expect("valid regex")
    })
}

/// Rewrite a `YYYYMMDDHHMMSS` stamp as `YYYY-MM-DDTHH:MM:SS`; other input is returned as-is
pub fn normalize_timestamp(raw: &str) -> String {
    digit_timestamp()
        .replace(raw.trim(), "$1-$2-$3T$4:$5:$6")
        .into_owned()
}

/// Parse any accepted timestamp form into a wall-clock time
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let normalized = normalize_timestamp(raw);
    let s = normalized.as_str();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_local());
    }
    for layout in NAIVE_LAYOUTS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, layout) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

fn format_with(raw: Option<&str>, layout: &str) -> String {
    match raw {
        None => String::new(),
        Some(raw) => match parse_timestamp(raw) {
            Some(dt) => dt.format(layout).to_string(),
            None => raw.to_string(),
        },
    }
}

/// Long date + time, e.g. `January 1, 2024, 12:00 PM`. Unparseable input passes through.
pub fn format_timestamp(raw: Option<&str>) -> String {
    format_with(raw, LONG_FORMAT)
}

/// Compact date + time used in the log selector, e.g. `1/1/2024, 12:00:00 PM`
pub fn format_log_timestamp(raw: Option<&str>) -> String {
    format_with(raw, SHORT_FORMAT)
}

/// `Pass` for code `P`, `Fail` for anything else (including no code)
pub fn format_status(code: Option<&str>) -> &'static str {
    status_label(Status::from_code(code))
}

pub fn status_label(status: Status) -> &'static str {
    match status {
        Status::Pass => "Pass",
        Status::Fail => "Fail",
    }
}

/// Stylesheet class for a status
pub fn status_class(status: Status) -> &'static str {
    match status {
        Status::Pass => "pass",
        Status::Fail => "fail",
    }
}

pub fn format_bool(flag: bool) -> &'static str {
    if flag {
        "True"
    } else {
        "False"
    }
}

/// Last path component, splitting on both `/` and `\`
pub fn basename(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}

/// Image source for a captured screenshot path
pub fn screenshot_src(path: &str) -> String {
    format!("{}/{}", SCREENSHOT_DIR, basename(path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_digit_timestamp() {
        assert_eq!(normalize_timestamp("20240101120000"), "2024-01-01T12:00:00");
        assert_eq!(normalize_timestamp("2024-01-01T12:00:00"), "2024-01-01T12:00:00");
        assert_eq!(normalize_timestamp("2024010112000"), "2024010112000");
    }

    #[test]
    fn test_format_iso_timestamp() {
        assert_eq!(
            format_timestamp(Some("2024-03-05T14:07:09.123")),
            "March 5, 2024, 02:07 PM"
        );
        assert_eq!(
            format_timestamp(Some("2024-03-05 09:30:00")),
            "March 5, 2024, 09:30 AM"
        );
    }

    #[test]
    fn test_format_timestamp_without_seconds() {
        assert_eq!(
            format_timestamp(Some("2024-01-01T12:00")),
            "January 1, 2024, 12:00 PM"
        );
        assert_eq!(
            format_log_timestamp(Some("2024-01-01 13:05")),
            "1/1/2024, 1:05:00 PM"
        );
    }

    #[test]
    fn test_format_rfc3339_keeps_recorded_wall_clock() {
        assert_eq!(
            format_timestamp(Some("2024-03-05T14:07:09+02:00")),
            "March 5, 2024, 02:07 PM"
        );
    }

    #[test]
    fn test_format_digit_timestamp() {
        assert_eq!(
            format_timestamp(Some("20240101120000")),
            "January 1, 2024, 12:00 PM"
        );
        assert_eq!(
            format_log_timestamp(Some("20240101130000")),
            "1/1/2024, 1:00:00 PM"
        );
    }

    #[test]
    fn test_format_unparseable_passes_through() {
        assert_eq!(format_timestamp(Some("yesterday")), "yesterday");
        assert_eq!(format_timestamp(Some("")), "");
        assert_eq!(format_timestamp(None), "");
        assert_eq!(format_log_timestamp(Some("99999999999999")), "99999999999999");
    }

    #[test]
    fn test_format_status() {
        assert_eq!(format_status(Some("P")), "Pass");
        assert_eq!(format_status(Some("F")), "Fail");
        assert_eq!(format_status(Some("E")), "Fail");
        assert_eq!(format_status(Some("")), "Fail");
        assert_eq!(format_status(None), "Fail");
    }

    #[test]
    fn test_basename_both_separators() {
        assert_eq!(basename(r"C:\run\shots\step1.png"), "step1.png");
        assert_eq!(basename("/run/shots/step1.png"), "step1.png");
        assert_eq!(basename(r"mixed/dir\step2.png"), "step2.png");
        assert_eq!(basename("plain.png"), "plain.png");
    }

    #[test]
    fn test_screenshot_src() {
        assert_eq!(screenshot_src(r"C:\run\shots\step1.png"), "screenshots/step1.png");
        assert_eq!(screenshot_src("/run/shots/step1.png"), "screenshots/step1.png");
    }

    #[test]
    fn test_format_bool() {
        assert_eq!(format_bool(true), "True");
        assert_eq!(format_bool(false), "False");
    }
}

#[cfg(test)]
mod proptest_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn status_is_total(code in ".*") {
            let label = format_status(Some(&code));
            if code == "P" {
                prop_assert_eq!(label, "Pass");
            } else {
                prop_assert_eq!(label, "Fail");
            }
        }

        #[test]
        fn basename_has_no_separators(path in r"[a-zA-Z0-9_ ./\\:-]{0,40}") {
            let name = basename(&path);
            prop_assert!(!name.contains('/'));
            prop_assert!(!name.contains('\\'));
            prop_assert!(path.ends_with(name));
        }

        #[test]
        fn format_timestamp_never_panics(raw in ".{0,30}") {
            let _ = format_timestamp(Some(&raw));
            let _ = format_log_timestamp(Some(&raw));
        }
    }
}
