//! Run identifiers and timestamp formatting

use chrono::{DateTime, Local, TimeZone};

/// Timestamp suitable for run identifiers and report file stems:
/// `YYYYMMDD_HHMMSS_mmm` in local time.
///
/// Millisecond granularity is enough for human-readable filenames;
/// uniqueness under concurrent invocations is not guaranteed.
pub fn run_id() -> String {
    let now = Local::now();
    format!(
        "{}_{:03}",
        now.format("%Y%m%d_%H%M%S"),
        now.timestamp_subsec_millis()
    )
}

/// Human-readable local time for summaries and report bodies.
pub fn now_display() -> String {
    Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Format an epoch-seconds value as `YYYY-MM-DD HH:MM:SS` local time.
///
/// Returns `None` for non-positive values, which mark unknown mtimes.
pub fn format_epoch(secs: i64) -> Option<String> {
    if secs <= 0 {
        return None;
    }
    match Local.timestamp_opt(secs, 0) {
        chrono::LocalResult::Single(dt) => Some(format_local(dt)),
        _ => None,
    }
}

fn format_local(dt: DateTime<Local>) -> String {
    dt.format("%Y-%m-%d %H:%M:%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_id_shape() {
        let id = run_id();
        // YYYYMMDD_HHMMSS_mmm
        assert_eq!(id.len(), 19);
        let bytes = id.as_bytes();
        assert_eq!(bytes[8], b'_');
        assert_eq!(bytes[15], b'_');
        assert!(id.chars().filter(|c| *c != '_').all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn unknown_mtime_has_no_rendering() {
        assert_eq!(format_epoch(0), None);
        assert_eq!(format_epoch(-5), None);
    }

    #[test]
    fn positive_epoch_renders() {
        let rendered = format_epoch(86_400 * 365).unwrap();
        assert_eq!(rendered.len(), 19);
        assert!(rendered.contains(':'));
    }
}
