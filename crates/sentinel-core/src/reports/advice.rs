//! Advisor narrative shared by every report format
//!
//! Turns raw drift counters into operator guidance: a one-line summary, a
//! coarse risk level, and short lists of reasoning and follow-up lines.

use crate::types::ScanResult;

/// Narrative blocks embedded in reports.
#[derive(Debug, Clone, Default)]
pub struct AdvisorNarrative {
    pub summary: String,
    pub risk_level: String,
    pub whys: Vec<String>,
    pub what_matters: Vec<String>,
    pub teaching: Vec<String>,
    pub next_steps: Vec<String>,
}

/// Machine-friendly status label for a result.
pub fn advisor_status(result: &ScanResult) -> &'static str {
    if result.has_changes() {
        "changes_detected"
    } else {
        "clean"
    }
}

/// Build the narrative for a scan result.
pub fn advisor_narrative(result: &ScanResult) -> AdvisorNarrative {
    let mut narrative = AdvisorNarrative::default();

    if !result.has_changes() {
        narrative.summary = "No integrity drift detected in this snapshot.".into();
        narrative.risk_level = "low".into();
        narrative
            .whys
            .push("Current hashes and metadata align with your trusted baseline.".into());
        narrative
            .what_matters
            .push("Stable state means your baseline remains reliable for this cycle.".into());
        narrative
            .teaching
            .push("Continue periodic scans to maintain confidence over time.".into());
        narrative
            .teaching
            .push("A clean scan is one signal; keep patch and access reviews in place.".into());
        narrative
            .next_steps
            .push("Keep scheduled status checks in CI or task automation.".into());
        narrative
            .next_steps
            .push("Re-run doctor after environment, permission, or storage changes.".into());
        return narrative;
    }

    narrative.summary =
        "Integrity drift detected. Review these changes before trusting the new state.".into();

    let stats = result.stats;
    let total = stats.added + stats.modified + stats.deleted;
    narrative.risk_level = if stats.deleted > 0 || stats.modified >= 5 || total >= 10 {
        "high".into()
    } else {
        "medium".into()
    };

    if stats.added > 0 {
        narrative.whys.push(format!(
            "{} new file(s) appeared. New binaries or scripts can be expected deployments or unauthorized drops.",
            stats.added
        ));
        narrative.what_matters.push(
            "Validate added files by source, signer, owner, and expected deployment record."
                .into(),
        );
    }
    if stats.modified > 0 {
        narrative.whys.push(format!(
            "{} file(s) changed. Modifications can alter runtime behavior and trust assumptions.",
            stats.modified
        ));
        narrative.what_matters.push(
            "Cross-check modified files against approved patches or maintenance windows.".into(),
        );
    }
    if stats.deleted > 0 {
        narrative.whys.push(format!(
            "{} file(s) were removed. Unexpected deletion can hide traces or disable controls.",
            stats.deleted
        ));
        narrative.what_matters.push(
            "Confirm deletions were intentional and documented by authorized operators.".into(),
        );
    }

    narrative.teaching.push(
        "Start triage with least expected paths first, then validate known deployment paths."
            .into(),
    );
    narrative.teaching.push(
        "If every change is approved, run update to align the baseline with the new trusted state."
            .into(),
    );
    narrative.teaching.push(
        "If uncertain, keep the current baseline and investigate before accepting drift.".into(),
    );
    narrative.next_steps.push(
        "Check change tickets, deployment logs, and operator approvals for changed paths.".into(),
    );
    narrative.next_steps.push(
        "Prioritize startup paths, executable files, and security-sensitive directories.".into(),
    );
    narrative.next_steps.push(
        "Escalate immediately if drift is unexpected and cannot be explained quickly.".into(),
    );
    narrative
}
