//! Parallel snapshot builder
//!
//! Walks a target directory, filters through the ignore rules, and hashes
//! every surviving regular file. Hashing is embarrassingly parallel:
//! workers pull indices from a shared cursor and merge thread-local
//! batches into the snapshot under one mutex acquisition per batch, so the
//! resulting map is content-determined regardless of interleaving.

use std::panic::{self, AssertUnwindSafe};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::{Instant, SystemTime};

use sentinel_fs::checksum;
use sentinel_fs::path::normalize;

use crate::ignore::IgnoreSet;
use crate::types::{FileEntry, FileMap, ScanStats};

/// Below this many files the hashing loop stays sequential; thread startup
/// would cost more than it saves.
const PARALLEL_THRESHOLD: usize = 64;

/// A file that survived traversal and filtering, waiting to be hashed.
#[derive(Debug)]
struct PendingFile {
    path: String,
    size: u64,
    mtime: i64,
}

/// Build a snapshot of every regular file under `target`.
///
/// The target must exist; callers validate that. Files whose metadata
/// cannot be read, that match the ignore rules, or that fail to hash are
/// dropped from the snapshot. Returns the map and the stats for this
/// build (`scanned` and `duration` filled; drift counters zero).
pub fn build_snapshot(target: &Path, ignore: &IgnoreSet) -> (FileMap, ScanStats) {
    let start = Instant::now();

    let mut pending = Vec::with_capacity(4096);
    collect_files(target, target, ignore, &mut pending);

    let current = hash_pending(pending);

    let stats = ScanStats {
        scanned: current.len(),
        duration: start.elapsed().as_secs_f64(),
        ..ScanStats::default()
    };
    (current, stats)
}

/// Depth-first traversal. Entries whose status cannot be read are skipped;
/// permission problems on a subtree are not fatal to the snapshot.
fn collect_files(dir: &Path, root: &Path, ignore: &IgnoreSet, pending: &mut Vec<PendingFile>) {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) => {
            tracing::debug!(dir = %dir.display(), error = %err, "skipping unreadable directory");
            return;
        }
    };

    for entry in entries.flatten() {
        let Ok(file_type) = entry.file_type() else {
            continue;
        };
        let entry_path = entry.path();

        if file_type.is_dir() {
            collect_files(&entry_path, root, ignore, pending);
            continue;
        }
        if !file_type.is_file() {
            // Symlinks and special files are not tracked.
            continue;
        }

        let absolute = normalize(&entry_path);
        let relative = entry_path
            .strip_prefix(root)
            .map(|rel| rel.to_string_lossy().replace('\\', "/"))
            .unwrap_or_else(|_| {
                entry_path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default()
            });

        if ignore.matches(&absolute) || ignore.matches(&relative) {
            continue;
        }

        let Ok(metadata) = entry.metadata() else {
            continue;
        };
        let mtime = metadata
            .modified()
            .ok()
            .and_then(|t| t.duration_since(SystemTime::UNIX_EPOCH).ok())
            .map(|d| d.as_secs() as i64)
            .unwrap_or(0);

        pending.push(PendingFile {
            path: absolute,
            size: metadata.len(),
            mtime,
        });
    }
}

fn hash_pending(pending: Vec<PendingFile>) -> FileMap {
    if pending.is_empty() {
        return FileMap::new();
    }

    let workers = pending
        .len()
        .min(
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1),
        )
        .max(1);

    if workers <= 1 || pending.len() < PARALLEL_THRESHOLD {
        let mut current = FileMap::new();
        for item in &pending {
            if let Some(entry) = hash_one(item) {
                current.insert(entry.path.clone(), entry);
            }
        }
        return current;
    }

    let cursor = AtomicUsize::new(0);
    let shared = Mutex::new(FileMap::new());

    std::thread::scope(|scope| {
        for _ in 0..workers {
            scope.spawn(|| {
                let mut batch = Vec::with_capacity(64);
                loop {
                    let index = cursor.fetch_add(1, Ordering::Relaxed);
                    let Some(item) = pending.get(index) else {
                        break;
                    };
                    if let Some(entry) = hash_one(item) {
                        batch.push(entry);
                    }
                }
                if !batch.is_empty() {
                    let mut guard = match shared.lock() {
                        Ok(guard) => guard,
                        Err(poisoned) => poisoned.into_inner(),
                    };
                    for entry in batch {
                        guard.insert(entry.path.clone(), entry);
                    }
                }
            });
        }
    });

    match shared.into_inner() {
        Ok(map) => map,
        Err(poisoned) => poisoned.into_inner(),
    }
}

/// Hash one pending file. A panic inside hashing degrades to a dropped
/// entry rather than tearing down the worker pool.
fn hash_one(item: &PendingFile) -> Option<FileEntry> {
    let digest = panic::catch_unwind(AssertUnwindSafe(|| {
        checksum::sha256_file(Path::new(&item.path))
    }))
    .ok()
    .flatten();

    let hash = match digest {
        Some(hash) => hash,
        None => {
            tracing::debug!(path = %item.path, "dropping unreadable file from snapshot");
            return None;
        }
    };

    Some(FileEntry {
        path: item.path.clone(),
        hash,
        size: item.size,
        mtime: item.mtime,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn worker_count_never_exceeds_worklist() {
        // The clamp logic lives inline; exercise the sequential path with a
        // single file and make sure nothing is lost.
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("only.txt"), "x").unwrap();
        let ignore = IgnoreSet::from_rules(Vec::<&str>::new());
        let (map, stats) = build_snapshot(dir.path(), &ignore);
        assert_eq!(map.len(), 1);
        assert_eq!(stats.scanned, 1);
    }
}
