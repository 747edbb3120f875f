//! JSON scan report

use std::path::{Path, PathBuf};

use serde_json::json;

use crate::error::{Error, Result};
use crate::reports::advice::{advisor_narrative, advisor_status};
use crate::reports::{sorted_paths, TOOL_VERSION};
use crate::types::ScanResult;

/// Write the JSON report into `dir`, returning the written path.
pub fn write_json(result: &ScanResult, scan_id: &str, dir: &Path) -> Result<PathBuf> {
    let path = dir.join(format!("scan_{scan_id}.json"));

    let narrative = advisor_narrative(result);
    let document = json!({
        "version": TOOL_VERSION,
        "status": advisor_status(result),
        "stats": {
            "scanned": result.stats.scanned,
            "added": result.stats.added,
            "modified": result.stats.modified,
            "deleted": result.stats.deleted,
            "duration": result.stats.duration,
        },
        "new": sorted_paths(&result.added),
        "modified": sorted_paths(&result.modified),
        "deleted": sorted_paths(&result.deleted),
        "advisor": {
            "summary": narrative.summary,
            "risk_level": narrative.risk_level,
            "whys": narrative.whys,
            "what_matters": narrative.what_matters,
            "teaching": narrative.teaching,
            "next_steps": narrative.next_steps,
        },
    });

    let rendered = serde_json::to_string_pretty(&document)
        .map_err(|e| Error::io(&path, std::io::Error::other(e)))?;
    std::fs::write(&path, rendered).map_err(|e| Error::io(&path, e))?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{FileEntry, ScanResult};

    #[test]
    fn report_parses_back_with_expected_fields() {
        let dir = tempfile::tempdir().unwrap();
        let mut result = ScanResult::default();
        for path in ["/t/b", "/t/a"] {
            result.added.insert(
                path.into(),
                FileEntry {
                    path: path.into(),
                    hash: "c".repeat(64),
                    size: 1,
                    mtime: 0,
                },
            );
        }
        result.stats.added = 2;
        result.stats.scanned = 2;

        let path = write_json(&result, "id", dir.path()).unwrap();
        let parsed: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();

        assert_eq!(parsed["status"], "changes_detected");
        assert_eq!(parsed["stats"]["added"], 2);
        // paths are sorted ascending
        assert_eq!(parsed["new"][0], "/t/a");
        assert_eq!(parsed["new"][1], "/t/b");
        assert!(parsed["advisor"]["risk_level"].is_string());
    }
}
