//! Drift classification between a baseline and a current snapshot

use crate::types::{FileMap, ScanResult};

/// Classify every path into added, modified, deleted, or unchanged.
///
/// A file is modified when its hash or size differs. When
/// `consider_mtime` is set, an mtime difference also counts, but only
/// when both sides carry a nonzero mtime: legacy baselines store zero for
/// every entry, and a one-sided zero must not flag the whole tree.
pub fn compare(baseline: &FileMap, current: &FileMap, consider_mtime: bool) -> ScanResult {
    let mut result = ScanResult {
        current: current.clone(),
        ..ScanResult::default()
    };
    result.stats.scanned = current.len();

    for (path, entry) in current {
        let Some(old) = baseline.get(path) else {
            result.added.insert(path.clone(), entry.clone());
            continue;
        };

        let mtime_changed = consider_mtime
            && old.mtime != 0
            && entry.mtime != 0
            && old.mtime != entry.mtime;
        if old.hash != entry.hash || old.size != entry.size || mtime_changed {
            result.modified.insert(path.clone(), entry.clone());
        }
    }

    for (path, entry) in baseline {
        if !current.contains_key(path) {
            result.deleted.insert(path.clone(), entry.clone());
        }
    }

    result.stats.added = result.added.len();
    result.stats.modified = result.modified.len();
    result.stats.deleted = result.deleted.len();
    result
}
