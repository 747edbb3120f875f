//! CSV scan report
//!
//! One flat table: a summary block, the sorted change rows, and the
//! advisor narrative, all under a shared
//! `section,type,path,size,mtime,sha256,note` header.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::reports::advice::{advisor_narrative, advisor_status};
use crate::reports::change_rows;
use crate::types::ScanResult;

/// Write the CSV report into `dir`, returning the written path.
pub fn write_csv(result: &ScanResult, scan_id: &str, dir: &Path) -> Result<PathBuf> {
    let path = dir.join(format!("sentinel_integrity_csv_report_{scan_id}.csv"));

    let narrative = advisor_narrative(result);
    let status = if advisor_status(result) == "clean" {
        "CLEAN"
    } else {
        "CHANGES_DETECTED"
    };

    let mut out = String::new();
    let _ = writeln!(out, "section,type,path,size,mtime,sha256,note");
    write_row(&mut out, "summary", "status", "", 0, "", "", status);
    write_row(&mut out, "summary", "scanned", "", result.stats.scanned as u64, "", "", "");
    write_row(&mut out, "summary", "added", "", result.stats.added as u64, "", "", "");
    write_row(&mut out, "summary", "modified", "", result.stats.modified as u64, "", "", "");
    write_row(&mut out, "summary", "deleted", "", result.stats.deleted as u64, "", "", "");
    write_row(
        &mut out,
        "summary",
        "duration_seconds",
        "",
        0,
        "",
        "",
        &format!("{:.3}", result.stats.duration),
    );

    for row in change_rows(result) {
        let mtime = if row.mtime == "-" { "" } else { row.mtime.as_str() };
        write_row(&mut out, "change", row.status, &row.path, row.size, mtime, &row.hash, "");
    }

    write_row(&mut out, "advisor", "summary", "", 0, "", "", &narrative.summary);
    write_row(&mut out, "advisor", "risk_level", "", 0, "", "", &narrative.risk_level);
    for line in &narrative.whys {
        write_row(&mut out, "advisor", "why", "", 0, "", "", line);
    }
    for line in &narrative.what_matters {
        write_row(&mut out, "advisor", "what_matters", "", 0, "", "", line);
    }
    for line in &narrative.teaching {
        write_row(&mut out, "advisor", "teaching", "", 0, "", "", line);
    }
    for line in &narrative.next_steps {
        write_row(&mut out, "advisor", "next_step", "", 0, "", "", line);
    }

    std::fs::write(&path, out).map_err(|e| Error::io(&path, e))?;
    Ok(path)
}

#[allow(clippy::too_many_arguments)]
fn write_row(
    out: &mut String,
    section: &str,
    kind: &str,
    path: &str,
    size: u64,
    mtime: &str,
    hash: &str,
    note: &str,
) {
    let _ = writeln!(
        out,
        "{},{},{},{},{},{},{}",
        escape_csv(section),
        escape_csv(kind),
        escape_csv(path),
        size,
        escape_csv(mtime),
        escape_csv(hash),
        escape_csv(note),
    );
}

fn escape_csv(value: &str) -> String {
    let needs_quotes = value
        .chars()
        .any(|c| matches!(c, '"' | ',' | '\n' | '\r'));
    if !needs_quotes {
        return value.to_string();
    }
    format!("\"{}\"", value.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{FileEntry, ScanResult};

    #[test]
    fn quoting_only_when_needed() {
        assert_eq!(escape_csv("plain"), "plain");
        assert_eq!(escape_csv("a,b"), "\"a,b\"");
        assert_eq!(escape_csv("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn report_has_header_summary_and_changes() {
        let dir = tempfile::tempdir().unwrap();
        let mut result = ScanResult::default();
        result.deleted.insert(
            "/t/gone, with comma".into(),
            FileEntry {
                path: "/t/gone, with comma".into(),
                hash: "d".repeat(64),
                size: 2,
                mtime: 0,
            },
        );
        result.stats.deleted = 1;

        let path = write_csv(&result, "id", dir.path()).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("section,type,path,size,mtime,sha256,note"));
        assert!(text.contains("summary,status,,0,,,CHANGES_DETECTED"));
        assert!(text.contains("change,DELETED,\"/t/gone, with comma\""));
    }
}
