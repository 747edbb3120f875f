//! Tamper-evident baseline store
//!
//! The baseline is a line-oriented UTF-8 document listing every tracked
//! file, sealed by a companion file carrying a SHA-256 digest of the exact
//! document bytes. Loading verifies the seal before any entry is trusted;
//! saving regenerates both atomically with owner-only permissions where
//! the host supports it.
//!
//! Document format:
//!
//! ```text
//! # Sentinel baseline v2
//! root<TAB><normalized-root>
//! generated<TAB><timestamp>
//! file<TAB><path><TAB><hash><TAB><size><TAB><mtime>
//! ```
//!
//! Legacy `path|size|hash` rows are accepted on read (mtime becomes 0).
//! Unknown lines are skipped silently.

use std::fs;
use std::path::{Path, PathBuf};

use sentinel_fs::checksum::sha256_hex;
use sentinel_fs::{clock, io};

use crate::error::{Error, Result};
use crate::types::{FileEntry, FileMap};

const DOCUMENT_HEADER: &str = "# Sentinel baseline v2";
const SEAL_HEADER: &str = "# Sentinel baseline seal v1";
const SEAL_ALGORITHM: &str = "SHA256";

/// Warning surfaced when a baseline loads without a seal.
pub const MISSING_SEAL_WARNING: &str =
    "baseline seal is missing; re-run update to enable tamper guard";

/// A successfully loaded and verified baseline.
#[derive(Debug, Clone)]
pub struct LoadedBaseline {
    pub entries: FileMap,
    /// Normalized target path recorded when the baseline was created.
    pub root: String,
    /// Non-fatal condition observed during load, e.g. a missing seal.
    pub warning: Option<String>,
}

/// Reads and writes one baseline document and its seal.
#[derive(Debug, Clone)]
pub struct BaselineStore {
    document: PathBuf,
    seal: PathBuf,
}

impl BaselineStore {
    pub fn new(document: impl Into<PathBuf>, seal: impl Into<PathBuf>) -> Self {
        Self {
            document: document.into(),
            seal: seal.into(),
        }
    }

    pub fn document_path(&self) -> &Path {
        &self.document
    }

    pub fn seal_path(&self) -> &Path {
        &self.seal
    }

    pub fn document_exists(&self) -> bool {
        self.document.exists()
    }

    /// Persist a snapshot as the new baseline.
    ///
    /// Writes the document, seals the exact written bytes, and tightens
    /// permissions on both files. Failure anywhere is fatal to the save.
    pub fn save(&self, entries: &FileMap, root: &str) -> Result<()> {
        if let Some(parent) = self.document.parent() {
            fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
        }

        let document = encode_document(entries, root);
        fs::write(&self.document, &document).map_err(|e| Error::io(&self.document, e))?;
        io::tighten_permissions(&self.document);

        let seal = format!(
            "{SEAL_HEADER}\nalgorithm\t{SEAL_ALGORITHM}\ncreated\t{}\ndigest\t{}\n",
            clock::run_id(),
            sha256_hex(document.as_bytes()),
        );
        fs::write(&self.seal, seal).map_err(|e| Error::io(&self.seal, e))?;
        io::tighten_permissions(&self.seal);

        Ok(())
    }

    /// Load the baseline, verifying the seal first.
    ///
    /// A missing document is [`Error::BaselineMissing`]. A missing seal
    /// downgrades to a warning on the returned value; a present seal whose
    /// digest mismatches the document is [`Error::SealMismatch`] and the
    /// entries must not be trusted.
    pub fn load(&self) -> Result<LoadedBaseline> {
        let document = match fs::read(&self.document) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(Error::BaselineMissing {
                    path: self.document.clone(),
                })
            }
            Err(e) => return Err(Error::io(&self.document, e)),
        };

        let warning = self.verify_seal(&document)?;

        let text = String::from_utf8_lossy(&document);
        let (entries, root, seen_content) = decode_document(&text);
        if !seen_content {
            return Err(Error::BaselineInvalid {
                path: self.document.clone(),
            });
        }

        Ok(LoadedBaseline {
            entries,
            root,
            warning,
        })
    }

    /// Replace the current baseline with a candidate document.
    ///
    /// The current document and seal are backed up to `<path>.bak` first.
    /// The candidate is copied in, its stale seal cleared, loaded,
    /// verified, and re-saved with a fresh seal; any failure restores the
    /// previous state. Backups are deleted only once the replacement is
    /// verified.
    pub fn import(&self, candidate: &Path) -> Result<LoadedBaseline> {
        let backup = backup_path(&self.document);
        let seal_backup = backup_path(&self.seal);
        let had_existing = self.document.exists();
        let had_seal = self.seal.exists();

        if had_existing {
            fs::copy(&self.document, &backup).map_err(|e| Error::io(&backup, e))?;
        }
        if had_seal {
            fs::copy(&self.seal, &seal_backup).map_err(|e| Error::io(&seal_backup, e))?;
        }
        if let Some(parent) = self.document.parent() {
            fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
        }
        fs::copy(candidate, &self.document).map_err(|e| Error::io(&self.document, e))?;
        // The old seal matches the old document, not the candidate; the
        // candidate gets a fresh seal from save() once it verifies.
        if had_seal {
            let _ = fs::remove_file(&self.seal);
        }

        let loaded = match self.load() {
            Ok(loaded) => loaded,
            Err(e) => {
                self.rollback(&backup, had_existing, &seal_backup, had_seal);
                return Err(e);
            }
        };

        if let Err(e) = self.save(&loaded.entries, &loaded.root) {
            self.rollback(&backup, had_existing, &seal_backup, had_seal);
            return Err(e);
        }

        if had_existing {
            let _ = fs::remove_file(&backup);
        }
        if had_seal {
            let _ = fs::remove_file(&seal_backup);
        }
        Ok(loaded)
    }

    /// Copy the baseline document to an external destination.
    pub fn export(&self, destination: &Path) -> Result<()> {
        if !self.document.exists() {
            return Err(Error::BaselineMissing {
                path: self.document.clone(),
            });
        }
        if let Some(parent) = destination.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
            }
        }
        fs::copy(&self.document, destination).map_err(|e| Error::io(destination, e))?;
        Ok(())
    }

    /// Check the seal against the document bytes. Returns a warning when
    /// no seal exists; the missing-seal case stays loadable so baselines
    /// written before sealing existed keep working.
    fn verify_seal(&self, document: &[u8]) -> Result<Option<String>> {
        let seal_text = match fs::read_to_string(&self.seal) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Some(MISSING_SEAL_WARNING.to_string()));
            }
            Err(e) => return Err(Error::io(&self.seal, e)),
        };

        let expected = seal_text
            .lines()
            .find_map(|line| line.strip_prefix("digest\t"))
            .map(str::trim)
            .filter(|digest| !digest.is_empty())
            .ok_or_else(|| Error::SealInvalid {
                path: self.seal.clone(),
            })?;

        if sha256_hex(document) != expected {
            return Err(Error::SealMismatch);
        }
        Ok(None)
    }

    fn rollback(&self, backup: &Path, had_existing: bool, seal_backup: &Path, had_seal: bool) {
        if had_existing {
            let _ = fs::copy(backup, &self.document);
            let _ = fs::remove_file(backup);
        } else {
            // Nothing to restore: leave no half-imported document behind.
            let _ = fs::remove_file(&self.document);
        }
        if had_seal {
            let _ = fs::copy(seal_backup, &self.seal);
            let _ = fs::remove_file(seal_backup);
        } else {
            let _ = fs::remove_file(&self.seal);
        }
    }
}

fn backup_path(document: &Path) -> PathBuf {
    let mut name = document.as_os_str().to_os_string();
    name.push(".bak");
    PathBuf::from(name)
}

fn encode_document(entries: &FileMap, root: &str) -> String {
    let mut out = String::with_capacity(64 + entries.len() * 128);
    out.push_str(DOCUMENT_HEADER);
    out.push('\n');
    out.push_str(&format!("root\t{root}\n"));
    out.push_str(&format!("generated\t{}\n", clock::run_id()));
    for entry in entries.values() {
        out.push_str(&format!(
            "file\t{}\t{}\t{}\t{}\n",
            entry.path, entry.hash, entry.size, entry.mtime
        ));
    }
    out
}

/// Parse a document into entries. Returns the map, the recorded root, and
/// whether any meaningful content was seen at all.
fn decode_document(text: &str) -> (FileMap, String, bool) {
    let mut entries = FileMap::new();
    let mut root = String::new();
    let mut seen_content = false;

    for line in text.lines() {
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if let Some(value) = line.strip_prefix("root\t") {
            root = value.to_string();
            seen_content = true;
            continue;
        }
        if line.strip_prefix("generated\t").is_some() {
            seen_content = true;
            continue;
        }

        let row = line.strip_prefix("file\t").unwrap_or(line);
        if let Some(entry) = parse_entry(row) {
            entries.insert(entry.path.clone(), entry);
            seen_content = true;
        }
    }

    (entries, root, seen_content)
}

fn parse_entry(row: &str) -> Option<FileEntry> {
    let fields: Vec<&str> = row.split('\t').collect();
    if fields.len() == 4 {
        return Some(FileEntry {
            path: fields[0].to_string(),
            hash: fields[1].to_string(),
            size: fields[2].parse().ok()?,
            mtime: fields[3].parse().ok()?,
        });
    }

    // Legacy "path|size|hash" rows carry no mtime.
    let mut parts = row.splitn(3, '|');
    let path = parts.next()?;
    let size = parts.next()?;
    let hash = parts.next()?;
    Some(FileEntry {
        path: path.to_string(),
        hash: hash.to_string(),
        size: size.parse().ok()?,
        mtime: 0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_row_round_trips() {
        let entry = parse_entry("/a/b.txt\tdeadbeef\t42\t1700000000").unwrap();
        assert_eq!(entry.path, "/a/b.txt");
        assert_eq!(entry.hash, "deadbeef");
        assert_eq!(entry.size, 42);
        assert_eq!(entry.mtime, 1_700_000_000);
    }

    #[test]
    fn legacy_row_parses_with_zero_mtime() {
        let entry = parse_entry("/old/file.bin|1024|cafebabe").unwrap();
        assert_eq!(entry.path, "/old/file.bin");
        assert_eq!(entry.size, 1024);
        assert_eq!(entry.hash, "cafebabe");
        assert_eq!(entry.mtime, 0);
    }

    #[test]
    fn malformed_rows_are_rejected() {
        assert!(parse_entry("just some text").is_none());
        assert!(parse_entry("/p\thash\tnot-a-number\t0").is_none());
        assert!(parse_entry("/p|not-a-number|hash").is_none());
    }

    #[test]
    fn decode_skips_unknown_lines() {
        let text = "# Sentinel baseline v2\nroot\t/data/x\nnoise line\nfile\t/data/x/a\tabc\t1\t2\n";
        let (entries, root, seen) = decode_document(text);
        assert!(seen);
        assert_eq!(root, "/data/x");
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn decode_of_comment_only_document_sees_nothing() {
        let (_, _, seen) = decode_document("# header\n\n# more\n");
        assert!(!seen);
    }
}
