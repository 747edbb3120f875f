//! Wildcard exclusion rules
//!
//! Rules come from a plaintext ignore file: one pattern per line, `#`
//! comments and blank lines skipped, trailing separators preserved. A rule
//! without `*` matches any path containing it as a substring; a rule with
//! `*` is split on `*` and all non-empty tokens must occur in order, with
//! the first token anchored to the start unless the pattern begins with
//! `*`, and the last anchored to the end unless it ends with `*`.
//!
//! Matching is pure: evaluating the same candidate twice always yields the
//! same answer.

use std::path::Path;

/// An evaluated set of exclusion rules.
#[derive(Debug, Clone)]
pub struct IgnoreSet {
    rules: Vec<String>,
}

/// Rules that always apply, keeping Sentinel's own output tree out of its
/// snapshots. Candidates are separator-folded before matching, so one
/// forward-slash spelling covers both separator conventions.
const BUILTIN_RULES: &[&str] = &["sentinel-logs/"];

impl IgnoreSet {
    /// Load rules from the primary ignore file, falling back to a secondary
    /// location when the primary is absent. Built-in rules are always
    /// prepended.
    pub fn load(primary: &Path, fallback: &Path) -> Self {
        let mut rules: Vec<String> = BUILTIN_RULES.iter().map(|r| fold(r)).collect();

        let contents = std::fs::read_to_string(primary)
            .or_else(|_| std::fs::read_to_string(fallback))
            .unwrap_or_default();
        rules.extend(parse_rules(&contents));

        Self { rules }
    }

    /// Build a set from in-memory rule lines. Built-in rules are prepended
    /// the same way `load` does.
    pub fn from_rules<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut rules: Vec<String> = BUILTIN_RULES.iter().map(|r| fold(r)).collect();
        for line in lines {
            let trimmed = line.as_ref().trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            rules.push(fold(trimmed));
        }
        Self { rules }
    }

    /// Whether any rule matches the candidate path.
    pub fn matches(&self, candidate: &str) -> bool {
        let folded = fold(candidate);
        self.rules
            .iter()
            .any(|rule| wildcard_match(&folded, rule))
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

fn parse_rules(contents: &str) -> Vec<String> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(fold)
        .collect()
}

/// Fold a path or rule into comparison form: forward slashes, and lower
/// case on platforms whose filesystems are case-insensitive.
fn fold(text: &str) -> String {
    let slashed = text.replace('\\', "/");
    #[cfg(windows)]
    {
        slashed.to_lowercase()
    }
    #[cfg(not(windows))]
    slashed
}

fn wildcard_match(text: &str, pattern: &str) -> bool {
    if !pattern.contains('*') {
        return text.contains(pattern);
    }

    let mut search_from = 0;
    let mut first = true;
    let mut last_token = "";

    for token in pattern.split('*') {
        if token.is_empty() {
            continue;
        }
        let found = match text[search_from..].find(token) {
            Some(offset) => search_from + offset,
            None => return false,
        };
        if first && !pattern.starts_with('*') && found != 0 {
            return false;
        }
        search_from = found + token.len();
        last_token = token;
        first = false;
    }

    if !pattern.ends_with('*') && !last_token.is_empty() {
        return text.ends_with(last_token);
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(rules: &[&str]) -> IgnoreSet {
        IgnoreSet::from_rules(rules.iter().copied())
    }

    #[test]
    fn builtin_excludes_own_output_tree() {
        let rules = IgnoreSet::from_rules(Vec::<&str>::new());
        assert!(rules.matches("/opt/sentinel-logs/data/.sentinel-baseline"));
        assert!(rules.matches("C:\\tools\\sentinel-logs\\reports\\x.json"));
        assert!(!rules.matches("/opt/project/src/main.rs"));
    }

    #[test]
    fn comments_and_blanks_are_skipped() {
        let rules = IgnoreSet::from_rules(["# comment", "", "   ", "build/"]);
        // builtins + one real rule
        assert_eq!(rules.len(), BUILTIN_RULES.len() + 1);
        assert!(rules.matches("/p/build/out.o"));
    }

    #[test]
    fn plain_rule_is_substring_match() {
        let rules = set(&["node_modules"]);
        assert!(rules.matches("/a/node_modules/left-pad/index.js"));
        assert!(rules.matches("relative/node_modules"));
        assert!(!rules.matches("/a/nodemodules/x"));
    }

    #[test]
    fn star_suffix_pattern_anchors_start() {
        let rules = set(&["build/*"]);
        assert!(rules.matches("build/obj/a.o"));
        // first token is anchored: may not appear mid-path
        assert!(!rules.matches("src/build/obj/a.o"));
    }

    #[test]
    fn star_prefix_pattern_anchors_end() {
        let rules = set(&["*.log"]);
        assert!(rules.matches("/var/tmp/run.log"));
        assert!(!rules.matches("/var/tmp/run.log.1"));
    }

    #[test]
    fn interior_star_requires_ordered_tokens() {
        let rules = set(&["src/*.tmp"]);
        assert!(rules.matches("src/cache/x.tmp"));
        assert!(!rules.matches("x.tmp"));
        assert!(!rules.matches("src/cache/x.tmp.bak"));
    }

    #[test]
    fn lone_star_matches_everything() {
        let rules = set(&["*"]);
        assert!(rules.matches("anything/at/all"));
        assert!(rules.matches(""));
    }

    #[test]
    fn matching_is_idempotent() {
        let rules = set(&["*.o", "vendor/", "a*z"]);
        for candidate in ["x/y.o", "vendor/lib.rs", "abcz", "clean.rs"] {
            assert_eq!(rules.matches(candidate), rules.matches(candidate));
        }
    }

    #[test]
    fn load_prefers_primary_then_fallback() {
        let dir = tempfile::tempdir().unwrap();
        let primary = dir.path().join(".sentinelignore");
        let fallback = dir.path().join("fallback-ignore");
        std::fs::write(&fallback, "from_fallback\n").unwrap();

        let rules = IgnoreSet::load(&primary, &fallback);
        assert!(rules.matches("x/from_fallback/y"));

        std::fs::write(&primary, "from_primary\n").unwrap();
        let rules = IgnoreSet::load(&primary, &fallback);
        assert!(rules.matches("x/from_primary/y"));
        assert!(!rules.matches("x/from_fallback/y"));
    }
}
