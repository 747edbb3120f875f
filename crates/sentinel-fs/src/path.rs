//! Normalized path handling for cross-platform identity
//!
//! Paths are compared and persisted in forward-slash form. Two references
//! to the same file must normalize to byte-identical strings, which is
//! what makes paths usable as map keys across runs.

use std::path::{Component, Path, PathBuf};

/// Normalize a path to a forward-slash string.
///
/// Canonicalizes when the path exists; otherwise cleans the path
/// lexically so the output is still deterministic. Unicode is preserved.
pub fn normalize(path: &Path) -> String {
    match dunce::canonicalize(path) {
        Ok(canonical) => to_display(&canonical),
        Err(_) => to_display(&lexical_clean(path)),
    }
}

/// Render a path with forward slashes, without touching the filesystem.
pub fn to_display(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Resolve `.` and `..` components textually, without filesystem access.
fn lexical_clean(path: &Path) -> PathBuf {
    let mut cleaned = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !cleaned.pop() {
                    cleaned.push(Component::ParentDir);
                }
            }
            other => cleaned.push(other),
        }
    }
    if cleaned.as_os_str().is_empty() {
        cleaned.push(".");
    }
    cleaned
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_folds_separators() {
        assert_eq!(to_display(Path::new("a\\b\\c.txt")), "a/b/c.txt");
        assert_eq!(to_display(Path::new("plain/already")), "plain/already");
    }

    #[test]
    fn lexical_clean_resolves_dot_components() {
        assert_eq!(lexical_clean(Path::new("a/./b/../c")), PathBuf::from("a/c"));
        assert_eq!(lexical_clean(Path::new("./x")), PathBuf::from("x"));
        assert_eq!(lexical_clean(Path::new(".")), PathBuf::from("."));
        assert_eq!(lexical_clean(Path::new("../up")), PathBuf::from("../up"));
    }

    #[test]
    fn two_spellings_of_one_file_normalize_identically() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("f.txt");
        std::fs::write(&file, "x").unwrap();

        let direct = normalize(&file);
        let dotted = normalize(&dir.path().join(".").join("f.txt"));
        assert_eq!(direct, dotted);
        assert!(!direct.contains('\\'));
    }

    #[test]
    fn missing_path_still_normalizes_deterministically() {
        let a = normalize(Path::new("/no/such/./dir/../file"));
        let b = normalize(Path::new("/no/such/file"));
        assert_eq!(a, b);
    }
}
