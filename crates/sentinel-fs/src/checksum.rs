//! SHA-256 checksum utilities
//!
//! Streams file contents through the hasher in fixed-size chunks so that
//! arbitrarily large files never have to fit in memory. Digests are
//! 64-character lowercase hex strings; `None` signals an unreadable file
//! and is never a legitimate digest.

use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// SHA-256 of zero bytes. Returned for empty inputs without running the hasher.
pub const EMPTY_SHA256: &str =
    "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";

/// Read buffer size for streaming.
const CHUNK_SIZE: usize = 64 * 1024;

/// Compute the SHA-256 digest of a file, detecting its size from metadata.
///
/// Returns `None` on any I/O failure.
pub fn sha256_file(path: &Path) -> Option<String> {
    let size = std::fs::metadata(path).ok()?.len();
    sha256_file_sized(path, size)
}

/// Compute the SHA-256 digest of a file whose size the caller asserts.
///
/// Reads at most `expected_size` bytes. Returns `None` if the file yields
/// fewer or more bytes than asserted, or on any I/O failure.
pub fn sha256_file_sized(path: &Path, expected_size: u64) -> Option<String> {
    if expected_size == 0 {
        // Still require the file to open and actually be empty.
        let mut file = File::open(path).ok()?;
        let mut probe = [0u8; 1];
        return match file.read(&mut probe) {
            Ok(0) => Some(EMPTY_SHA256.to_string()),
            _ => None,
        };
    }

    let mut file = File::open(path).ok()?;
    let mut hasher = Sha256::new();
    let mut buf = vec![0u8; CHUNK_SIZE];
    let mut remaining = expected_size;

    while remaining > 0 {
        let want = CHUNK_SIZE.min(remaining.try_into().unwrap_or(CHUNK_SIZE));
        let read = file.read(&mut buf[..want]).ok()?;
        if read == 0 {
            break;
        }
        hasher.update(&buf[..read]);
        remaining -= read as u64;
    }

    if remaining != 0 {
        return None;
    }
    // A file longer than asserted is treated the same as a short read.
    let mut probe = [0u8; 1];
    match file.read(&mut probe) {
        Ok(0) => Some(format!("{:x}", hasher.finalize())),
        _ => None,
    }
}

/// Compute the SHA-256 digest of an in-memory buffer.
pub fn sha256_hex(bytes: &[u8]) -> String {
    if bytes.is_empty() {
        return EMPTY_SHA256.to_string();
    }
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}
