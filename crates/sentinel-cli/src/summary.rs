//! End-of-operation summary block

use sentinel_core::ScanStats;
use sentinel_fs::clock;

use crate::context::OutputPaths;

const RULE: &str = "------------------------------------------------------------";

pub fn print_summary(target: &str, stats: &ScanStats, outputs: &OutputPaths, baseline_ok: bool) {
    println!("{RULE}");
    println!("Sentinel Scan Summary");
    println!("{RULE}");
    println!("Scan Time        : {}", clock::now_display());
    println!("Target Directory : {target}");
    println!("Files Scanned    : {}", stats.scanned);
    println!();
    println!("New Files        : {}", stats.added);
    println!("Modified Files   : {}", stats.modified);
    println!("Deleted Files    : {}", stats.deleted);
    println!();
    println!("Scan Duration    : {:.2} seconds", stats.duration);
    println!("{RULE}");
    println!();
    println!("Output Locations:");
    println!("  CLI Report  : {}", outputs.cli_report);
    println!("  HTML Report : {}", outputs.html_report);
    println!("  JSON Report : {}", outputs.json_report);
    println!("  CSV Report  : {}", outputs.csv_report);
    println!("  Log File    : {}", outputs.log_file);
    println!("  Baseline    : {}", outputs.baseline);
    println!();

    if !baseline_ok {
        println!("Status: Baseline integrity issue detected.");
        println!("Recommended Actions:");
        println!("  * Reinitialize the baseline using init");
        println!("  * Ensure the baseline file is stored securely");
        return;
    }

    if stats.added == 0 && stats.modified == 0 && stats.deleted == 0 {
        println!("Status: No integrity changes detected.");
        println!("Recommended Actions:");
        println!("  * No action required");
        println!("  * Continue routine monitoring");
    } else {
        println!("Status: Integrity changes detected.");
        println!("Recommended Actions:");
        println!("  * Review reports for affected files");
        println!("  * Verify changes were intentional");
        println!("  * Update the baseline if changes are legitimate");
    }
}
