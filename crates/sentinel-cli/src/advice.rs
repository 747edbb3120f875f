//! Operation-level guidance blocks

use colored::Colorize;
use sentinel_core::ScanResult;

use crate::commands::scan::ScanMode;

pub fn build_init_advice(scanned_files: usize) -> Vec<String> {
    if scanned_files == 0 {
        return vec![
            "The baseline was created, but no files were tracked.".into(),
            "Verify the target path and ignore rules before your next scan.".into(),
            "Run list-baseline to confirm expected entries are present.".into(),
        ];
    }
    vec![
        format!("The baseline was recorded with {scanned_files} file(s)."),
        "This snapshot is now your trusted reference for future checks.".into(),
        "Keep this baseline only if the current system state is known-good.".into(),
        "Run status regularly for lightweight integrity checks.".into(),
    ]
}

pub fn build_scan_advice(
    result: &ScanResult,
    mode: ScanMode,
    baseline_refreshed: bool,
) -> Vec<String> {
    let mut advice = Vec::new();
    if !result.has_changes() {
        advice.push("No integrity drift was detected in this cycle.".into());
        advice.push("The current files match your trusted baseline.".into());
        advice.push("Continue routine monitoring at your normal cadence.".into());
        if matches!(mode, ScanMode::Status | ScanMode::Verify) {
            advice
                .push("This clean result can be used as a confidence signal in CI workflows.".into());
        }
        return advice;
    }

    advice.push("Integrity drift was detected and should be reviewed.".into());
    let stats = result.stats;
    if stats.added > 0 {
        advice.push(format!(
            "{} new file(s) were found, so confirm they were expected.",
            stats.added
        ));
    }
    if stats.modified > 0 {
        advice.push(format!(
            "{} file(s) were modified, so verify them against approved changes.",
            stats.modified
        ));
    }
    if stats.deleted > 0 {
        advice.push(format!(
            "{} file(s) were deleted, so confirm the deletions were intentional.",
            stats.deleted
        ));
    }

    if mode == ScanMode::Status {
        advice.push("Status mode is optimized for quick automation checks.".into());
    }
    if mode == ScanMode::Verify {
        advice.push("Verify mode is useful before a baseline refresh in controlled rollouts.".into());
    }
    if baseline_refreshed {
        advice.push("The baseline was refreshed, so keep your change approval records.".into());
    } else {
        advice.push("If these changes are approved, run update to align the baseline.".into());
    }
    advice
}

pub fn build_watch_advice(
    any_changes: bool,
    cycles: u32,
    interval_seconds: u64,
    fail_fast: bool,
) -> Vec<String> {
    let mut advice = Vec::new();
    if any_changes {
        advice.push("Watch mode detected integrity drift during monitoring.".into());
        advice.push("This suggests active file-state changes occurred on the host.".into());
    } else {
        advice.push("Watch mode completed without detecting integrity drift.".into());
        advice.push("Repeated clean checks increase confidence in file-state stability.".into());
    }
    advice.push(format!(
        "This run used {cycles} cycle(s) at a {interval_seconds}-second interval."
    ));
    if fail_fast {
        advice.push("Fail-fast stopped at the first alert, which suits strict CI/CD gates.".into());
    } else {
        advice.push(
            "Tune interval and cycles to match your change velocity and risk profile.".into(),
        );
    }
    advice
}

pub fn build_doctor_advice(pass: usize, warn: usize, fail: usize) -> Vec<String> {
    let mut advice = Vec::new();
    if fail == 0 && warn == 0 {
        advice.push("All environment checks passed.".into());
        advice.push("Healthy storage and logging paths reduce monitoring blind spots.".into());
    } else if fail == 0 {
        advice.push("No hard failures were found, but warnings were detected.".into());
        advice.push("Review warnings early so they do not become reliability issues.".into());
    } else {
        advice.push("One or more critical health checks failed.".into());
        advice.push("Scan results may be incomplete until these failures are resolved.".into());
    }
    advice.push(format!("Doctor summary: {pass} pass, {warn} warn, {fail} fail."));
    advice.push("Run doctor after upgrades, path changes, or permission updates.".into());
    advice
}

pub fn print_advice(lines: &[String]) {
    if lines.is_empty() {
        return;
    }
    println!("\n{}", "Guidance".cyan());
    for line in lines {
        println!("{} {line}", "  >".dimmed());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sentinel_core::{FileEntry, ScanResult};

    fn drifted() -> ScanResult {
        let mut result = ScanResult::default();
        result.modified.insert(
            "/t/a".into(),
            FileEntry {
                path: "/t/a".into(),
                hash: "a".repeat(64),
                size: 1,
                mtime: 0,
            },
        );
        result.stats.modified = 1;
        result
    }

    #[test]
    fn empty_init_gets_a_pointed_warning() {
        let advice = build_init_advice(0);
        assert!(advice[0].contains("no files were tracked"));
    }

    #[test]
    fn drift_advice_mentions_update_unless_refreshed() {
        let advice = build_scan_advice(&drifted(), ScanMode::Scan, false);
        assert!(advice.iter().any(|l| l.contains("run update")));

        let advice = build_scan_advice(&drifted(), ScanMode::Update, true);
        assert!(advice.iter().any(|l| l.contains("refreshed")));
    }

    #[test]
    fn clean_status_advice_mentions_ci() {
        let advice = build_scan_advice(&ScanResult::default(), ScanMode::Status, false);
        assert!(advice.iter().any(|l| l.contains("CI")));
    }
}
