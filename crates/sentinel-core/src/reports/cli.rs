//! Plain-text scan report with an ASCII change table

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::reports::advice::{advisor_narrative, advisor_status};
use crate::reports::{change_rows, ChangeRow, TOOL_NAME, TOOL_VERSION};
use crate::types::ScanResult;

/// Write the plain-text report into `dir`, returning the written path.
pub fn write_cli(result: &ScanResult, scan_id: &str, dir: &Path) -> Result<PathBuf> {
    let path = dir.join(format!("scan_{scan_id}.txt"));

    let status = if advisor_status(result) == "clean" {
        "CLEAN"
    } else {
        "CHANGES_DETECTED"
    };
    let narrative = advisor_narrative(result);

    let mut out = String::new();
    let _ = writeln!(out, "{TOOL_NAME} {TOOL_VERSION} - CLI Scan Report");
    let _ = writeln!(out, "==================================\n");
    let _ = writeln!(out, "Scanned Files : {}", result.stats.scanned);
    let _ = writeln!(out, "New Files     : {}", result.stats.added);
    let _ = writeln!(out, "Modified      : {}", result.stats.modified);
    let _ = writeln!(out, "Deleted       : {}", result.stats.deleted);
    let _ = writeln!(out, "Duration      : {:.3} sec", result.stats.duration);
    let _ = writeln!(out, "Status        : {status}\n");
    let _ = writeln!(out, "Risk Level    : {}\n", narrative.risk_level);

    let _ = writeln!(out, "Change Table (ASCII)");
    let _ = writeln!(out, "--------------------");
    let rows = change_rows(result);
    if rows.is_empty() {
        let _ = writeln!(out, "No changed files detected.");
    } else {
        write_ascii_table(&mut out, &rows);
    }

    let _ = writeln!(out, "\nAdvisor");
    let _ = writeln!(out, "-------");
    let _ = writeln!(out, " Summary:");
    let _ = writeln!(out, "  > {}", narrative.summary);
    write_section(&mut out, " Why this matters:", &narrative.whys);
    write_section(&mut out, " What matters now:", &narrative.what_matters);
    write_section(&mut out, " Teaching notes:", &narrative.teaching);
    write_section(&mut out, " Suggested next steps:", &narrative.next_steps);

    std::fs::write(&path, out).map_err(|e| Error::io(&path, e))?;
    Ok(path)
}

fn write_section(out: &mut String, title: &str, lines: &[String]) {
    if lines.is_empty() {
        return;
    }
    let _ = writeln!(out, "{title}");
    for line in lines {
        let _ = writeln!(out, "  - {line}");
    }
}

fn write_ascii_table(out: &mut String, rows: &[ChangeRow]) {
    let mut status_w = "STATUS".len();
    let mut size_w = "SIZE".len();
    let mut mtime_w = "MTIME".len();
    let mut path_w = "PATH".len();
    let mut hash_w = "SHA256".len();

    for row in rows {
        status_w = status_w.max(row.status.len());
        size_w = size_w.max(row.size.to_string().len());
        mtime_w = mtime_w.max(row.mtime.len());
        path_w = path_w.max(row.path.len());
        hash_w = hash_w.max(row.hash.len());
    }

    let rule = format!(
        "+{}+{}+{}+{}+{}+",
        "-".repeat(status_w + 2),
        "-".repeat(size_w + 2),
        "-".repeat(mtime_w + 2),
        "-".repeat(path_w + 2),
        "-".repeat(hash_w + 2),
    );

    let _ = writeln!(out, "{rule}");
    let _ = writeln!(
        out,
        "| {:<status_w$} | {:>size_w$} | {:<mtime_w$} | {:<path_w$} | {:<hash_w$} |",
        "STATUS", "SIZE", "MTIME", "PATH", "SHA256",
    );
    let _ = writeln!(out, "{rule}");
    for row in rows {
        let _ = writeln!(
            out,
            "| {:<status_w$} | {:>size_w$} | {:<mtime_w$} | {:<path_w$} | {:<hash_w$} |",
            row.status, row.size, row.mtime, row.path, row.hash,
        );
    }
    let _ = writeln!(out, "{rule}");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{FileEntry, ScanResult};

    #[test]
    fn report_carries_status_and_table() {
        let dir = tempfile::tempdir().unwrap();
        let mut result = ScanResult::default();
        result.added.insert(
            "/t/new.bin".into(),
            FileEntry {
                path: "/t/new.bin".into(),
                hash: "b".repeat(64),
                size: 10,
                mtime: 0,
            },
        );
        result.stats.added = 1;
        result.stats.scanned = 1;

        let path = write_cli(&result, "20240101_000000_000", dir.path()).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("Status        : CHANGES_DETECTED"));
        assert!(text.contains("| NEW"));
        assert!(text.contains("/t/new.bin"));
    }

    #[test]
    fn clean_report_has_no_table() {
        let dir = tempfile::tempdir().unwrap();
        let result = ScanResult::default();
        let path = write_cli(&result, "id", dir.path()).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("No changed files detected."));
        assert!(text.contains("Status        : CLEAN"));
    }
}
