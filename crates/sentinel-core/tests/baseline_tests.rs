//! Baseline store: round-trips, seal protocol, import rollback

use sentinel_core::baseline::MISSING_SEAL_WARNING;
use sentinel_core::{BaselineStore, Error, FileEntry, FileMap};
use tempfile::TempDir;

fn store_in(dir: &TempDir) -> BaselineStore {
    BaselineStore::new(
        dir.path().join(".sentinel-baseline"),
        dir.path().join(".sentinel-baseline.seal"),
    )
}

fn sample_map() -> FileMap {
    let mut map = FileMap::new();
    for (path, hash, size, mtime) in [
        ("/data/x/a.txt", "1a", 6u64, 1_700_000_000i64),
        ("/data/x/b.txt", "2b", 5, 1_700_000_100),
        ("/data/x/sub/c.bin", "3c", 1024, 0),
    ] {
        map.insert(
            path.to_string(),
            FileEntry {
                path: path.to_string(),
                hash: hash.repeat(32),
                size,
                mtime,
            },
        );
    }
    map
}

#[test]
fn save_then_load_round_trips() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    let map = sample_map();

    store.save(&map, "/data/x").unwrap();
    assert!(store.document_path().exists());
    assert!(store.seal_path().exists());

    let loaded = store.load().unwrap();
    assert_eq!(loaded.root, "/data/x");
    assert_eq!(loaded.entries, map);
    assert_eq!(loaded.warning, None);
}

#[test]
fn missing_document_is_baseline_missing() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    let err = store.load().unwrap_err();
    assert!(err.is_baseline_missing());
}

#[test]
fn missing_seal_loads_with_warning() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    store.save(&sample_map(), "/data/x").unwrap();
    std::fs::remove_file(store.seal_path()).unwrap();

    let loaded = store.load().unwrap();
    assert_eq!(loaded.warning.as_deref(), Some(MISSING_SEAL_WARNING));
    assert_eq!(loaded.entries.len(), 3);
}

#[test]
fn flipping_one_document_byte_trips_the_tamper_guard() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    store.save(&sample_map(), "/data/x").unwrap();

    let mut bytes = std::fs::read(store.document_path()).unwrap();
    let last = bytes.len() - 2;
    bytes[last] ^= 0x01;
    std::fs::write(store.document_path(), &bytes).unwrap();

    let err = store.load().unwrap_err();
    assert!(matches!(err, Error::SealMismatch));
    assert!(err.to_string().contains("seal digest mismatch"));
}

#[test]
fn reseal_after_mutation_passes() {
    // The seal assumes its own integrity: an attacker who can rewrite the
    // seal to match a mutated document is not detected.
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    store.save(&sample_map(), "/data/x").unwrap();

    let mut text = std::fs::read_to_string(store.document_path()).unwrap();
    text.push_str("file\t/data/x/injected\tffff\t1\t0\n");
    std::fs::write(store.document_path(), &text).unwrap();

    let new_digest = sentinel_fs::checksum::sha256_hex(text.as_bytes());
    let seal = std::fs::read_to_string(store.seal_path()).unwrap();
    let resealed: String = seal
        .lines()
        .map(|line| {
            if line.starts_with("digest\t") {
                format!("digest\t{new_digest}\n")
            } else {
                format!("{line}\n")
            }
        })
        .collect();
    std::fs::write(store.seal_path(), resealed).unwrap();

    let loaded = store.load().unwrap();
    assert!(loaded.entries.contains_key("/data/x/injected"));
}

#[test]
fn seal_fields_accept_any_order() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    store.save(&sample_map(), "/data/x").unwrap();

    let seal = std::fs::read_to_string(store.seal_path()).unwrap();
    let mut lines: Vec<&str> = seal.lines().collect();
    lines.reverse();
    std::fs::write(store.seal_path(), lines.join("\n")).unwrap();

    assert!(store.load().is_ok());
}

#[test]
fn seal_without_digest_field_is_invalid() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    store.save(&sample_map(), "/data/x").unwrap();
    std::fs::write(store.seal_path(), "# seal\nalgorithm\tSHA256\n").unwrap();

    let err = store.load().unwrap_err();
    assert!(matches!(err, Error::SealInvalid { .. }));
}

#[test]
fn legacy_rows_load_with_zero_mtime() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    std::fs::write(
        store.document_path(),
        "/old/a.bin|100|aaaa\n/old/b.bin|200|bbbb\n",
    )
    .unwrap();

    let loaded = store.load().unwrap();
    assert_eq!(loaded.entries.len(), 2);
    assert!(loaded.entries.values().all(|e| e.mtime == 0));
    assert_eq!(loaded.entries["/old/a.bin"].size, 100);
    assert_eq!(loaded.entries["/old/a.bin"].hash, "aaaa");
    // legacy documents predate the root header
    assert_eq!(loaded.root, "");
}

#[test]
fn empty_document_fails_as_invalid() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    std::fs::write(store.document_path(), "# only comments\n\n").unwrap();

    let err = store.load().unwrap_err();
    assert!(matches!(err, Error::BaselineInvalid { .. }));
}

#[test]
fn unknown_lines_are_skipped_on_load() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    let doc = "# Sentinel baseline v2\n\
               root\t/data/x\n\
               generated\t20240101_000000_000\n\
               some future directive\n\
               file\t/data/x/a\tabcd\t10\t5\n";
    std::fs::write(store.document_path(), doc).unwrap();

    let loaded = store.load().unwrap();
    assert_eq!(loaded.entries.len(), 1);
    assert_eq!(loaded.root, "/data/x");
}

#[cfg(unix)]
#[test]
fn saved_files_are_owner_only() {
    use std::os::unix::fs::PermissionsExt;
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    store.save(&sample_map(), "/data/x").unwrap();

    for path in [store.document_path(), store.seal_path()] {
        let mode = std::fs::metadata(path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600, "{}", path.display());
    }
}

#[test]
fn import_replaces_and_reseals() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    store.save(&sample_map(), "/data/x").unwrap();

    // Candidate from another machine: valid document, no seal travels with it.
    let other = TempDir::new().unwrap();
    let donor = BaselineStore::new(
        other.path().join("donor"),
        other.path().join("donor.seal"),
    );
    let mut donor_map = FileMap::new();
    donor_map.insert(
        "/data/y/only.txt".to_string(),
        FileEntry {
            path: "/data/y/only.txt".to_string(),
            hash: "9".repeat(64),
            size: 1,
            mtime: 42,
        },
    );
    donor.save(&donor_map, "/data/y").unwrap();

    let loaded = store.import(donor.document_path()).unwrap();
    assert_eq!(loaded.root, "/data/y");

    // Fresh seal matches the re-saved document.
    let reloaded = store.load().unwrap();
    assert_eq!(reloaded.entries, donor_map);
    assert_eq!(reloaded.warning, None);

    // Backups removed after success.
    assert!(!store
        .document_path()
        .with_file_name(".sentinel-baseline.bak")
        .exists());
    assert!(!store
        .seal_path()
        .with_file_name(".sentinel-baseline.seal.bak")
        .exists());
}

#[test]
fn failed_import_restores_previous_baseline() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    let original = sample_map();
    store.save(&original, "/data/x").unwrap();

    let bad = dir.path().join("garbage");
    std::fs::write(&bad, "# nothing real here\n").unwrap();

    let err = store.import(&bad).unwrap_err();
    assert!(matches!(err, Error::BaselineInvalid { .. }));

    // Document and seal both come back: the restored baseline still
    // verifies without a missing-seal warning.
    let restored = store.load().unwrap();
    assert_eq!(restored.entries, original);
    assert_eq!(restored.root, "/data/x");
    assert_eq!(restored.warning, None);
}

#[test]
fn failed_first_import_leaves_no_baseline_behind() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);

    let bad = dir.path().join("garbage");
    std::fs::write(&bad, "# nothing real here\n").unwrap();

    assert!(store.import(&bad).is_err());
    assert!(!store.document_path().exists());
}

#[test]
fn export_refuses_without_document_and_copies_bytes() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    let dest = dir.path().join("exported");

    assert!(store.export(&dest).unwrap_err().is_baseline_missing());

    store.save(&sample_map(), "/data/x").unwrap();
    store.export(&dest).unwrap();
    assert_eq!(
        std::fs::read(&dest).unwrap(),
        std::fs::read(store.document_path()).unwrap()
    );
}
