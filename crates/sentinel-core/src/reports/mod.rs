//! Report renderers
//!
//! Each renderer consumes a [`ScanResult`](crate::types::ScanResult) and
//! writes one self-contained artifact into its format's directory,
//! returning the written path. Renderers are independent of the engine:
//! they can fail without affecting the operation that produced the result.
//!
//! Ordering is deterministic: change rows are sorted by path ascending,
//! ties broken by status label, so two reports from the same result are
//! byte-comparable.

pub mod advice;
pub mod cli;
pub mod csv;
pub mod html;
pub mod json;

use crate::types::{FileEntry, FileMap, ScanResult};

pub(crate) const TOOL_NAME: &str = "Sentinel";
pub(crate) const TOOL_VERSION: &str = env!("CARGO_PKG_VERSION");

/// One row of the change tables shared by the CLI, HTML, and CSV reports.
#[derive(Debug, Clone)]
pub(crate) struct ChangeRow {
    pub status: &'static str,
    pub path: String,
    pub hash: String,
    pub mtime: String,
    pub size: u64,
}

/// Flatten the three drift maps into rows sorted by path, then status.
pub(crate) fn change_rows(result: &ScanResult) -> Vec<ChangeRow> {
    fn collect(files: &FileMap, status: &'static str, rows: &mut Vec<ChangeRow>) {
        for entry in files.values() {
            rows.push(ChangeRow {
                status,
                path: entry.path.clone(),
                hash: entry.hash.clone(),
                mtime: format_mtime(entry),
                size: entry.size,
            });
        }
    }

    let mut rows =
        Vec::with_capacity(result.added.len() + result.modified.len() + result.deleted.len());
    collect(&result.added, "NEW", &mut rows);
    collect(&result.modified, "MODIFIED", &mut rows);
    collect(&result.deleted, "DELETED", &mut rows);
    rows.sort_by(|left, right| {
        left.path
            .cmp(&right.path)
            .then_with(|| left.status.cmp(right.status))
    });
    rows
}

fn format_mtime(entry: &FileEntry) -> String {
    sentinel_fs::clock::format_epoch(entry.mtime).unwrap_or_else(|| "-".to_string())
}

/// Paths from a map, sorted ascending.
pub(crate) fn sorted_paths(files: &FileMap) -> Vec<&str> {
    // BTreeMap iteration is already ordered by key.
    files.keys().map(String::as_str).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ScanStats;

    fn entry(path: &str) -> FileEntry {
        FileEntry {
            path: path.to_string(),
            hash: "f".repeat(64),
            size: 3,
            mtime: 0,
        }
    }

    #[test]
    fn rows_sort_by_path_then_status() {
        let mut result = ScanResult {
            stats: ScanStats::default(),
            ..ScanResult::default()
        };
        result.added.insert("/t/z".into(), entry("/t/z"));
        result.deleted.insert("/t/a".into(), entry("/t/a"));
        result.modified.insert("/t/m".into(), entry("/t/m"));

        let rows = change_rows(&result);
        let order: Vec<&str> = rows.iter().map(|r| r.path.as_str()).collect();
        assert_eq!(order, vec!["/t/a", "/t/m", "/t/z"]);
    }

    #[test]
    fn unknown_mtime_renders_as_dash() {
        assert_eq!(format_mtime(&entry("/t/x")), "-");
    }
}
