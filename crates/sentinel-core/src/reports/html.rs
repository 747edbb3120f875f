//! Self-contained HTML scan report

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use sentinel_fs::clock;

use crate::error::{Error, Result};
use crate::reports::advice::{advisor_narrative, advisor_status, AdvisorNarrative};
use crate::reports::{TOOL_NAME, TOOL_VERSION};
use crate::types::{FileMap, ScanResult};

const STYLE: &str = r#"
    body { font-family: -apple-system, 'Segoe UI', Roboto, sans-serif;
           margin: 0; background: #f4f5f7; color: #1d2433; }
    header { background: #1d2433; color: #fff; padding: 20px 32px; }
    header h1 { margin: 0; font-size: 20px; }
    header p { margin: 4px 0 0; color: #9aa5b5; font-size: 13px; }
    main { padding: 24px 32px; max-width: 1200px; }
    .tiles { display: flex; gap: 16px; flex-wrap: wrap; margin-bottom: 24px; }
    .tile { background: #fff; border-radius: 8px; padding: 14px 20px;
            min-width: 120px; box-shadow: 0 1px 2px rgba(0,0,0,.08); }
    .tile .label { font-size: 12px; color: #68778d; text-transform: uppercase; }
    .tile .value { font-size: 24px; font-weight: 600; }
    .panel { background: #fff; border-radius: 8px; margin-bottom: 20px;
             box-shadow: 0 1px 2px rgba(0,0,0,.08); overflow: hidden; }
    .panel-head { display: flex; align-items: center; gap: 12px;
                  padding: 12px 20px; border-bottom: 1px solid #e6e9ef; }
    .panel-head h2 { margin: 0; font-size: 15px; }
    .count { background: #eef1f6; border-radius: 10px; padding: 2px 10px;
             font-size: 12px; }
    .empty { color: #68778d; padding: 12px 20px; }
    table { width: 100%; border-collapse: collapse; font-size: 13px; }
    th, td { text-align: left; padding: 8px 20px;
             border-bottom: 1px solid #eef1f6; }
    td.hash { font-family: ui-monospace, monospace; font-size: 12px; }
    .risk-low { color: #1b7f4d; } .risk-medium { color: #b26a00; }
    .risk-high { color: #c0392b; }
    ul { margin: 8px 0; }
"#;

/// Write the HTML report into `dir`, returning the written path.
pub fn write_html(result: &ScanResult, scan_id: &str, dir: &Path) -> Result<PathBuf> {
    let path = dir.join(format!("scan_{scan_id}.html"));

    let narrative = advisor_narrative(result);
    let status = if advisor_status(result) == "clean" {
        "CLEAN"
    } else {
        "CHANGES DETECTED"
    };

    let mut out = String::with_capacity(16 * 1024);
    let _ = writeln!(out, "<!DOCTYPE html>");
    let _ = writeln!(out, "<html lang='en'>");
    let _ = writeln!(out, "<head>");
    let _ = writeln!(out, "  <meta charset='utf-8'>");
    let _ = writeln!(out, "  <title>{TOOL_NAME} Scan Report</title>");
    let _ = writeln!(out, "  <style>{STYLE}</style>");
    let _ = writeln!(out, "</head>");
    let _ = writeln!(out, "<body>");
    let _ = writeln!(out, "  <header>");
    let _ = writeln!(
        out,
        "    <h1>{TOOL_NAME} {TOOL_VERSION} - Integrity Scan Report</h1>"
    );
    let _ = writeln!(
        out,
        "    <p>Generated {} · Status: {status}</p>",
        escape_html(&clock::now_display())
    );
    let _ = writeln!(out, "  </header>");
    let _ = writeln!(out, "  <main>");

    let _ = writeln!(out, "    <div class='tiles'>");
    for (label, value) in [
        ("Scanned", result.stats.scanned),
        ("New", result.stats.added),
        ("Modified", result.stats.modified),
        ("Deleted", result.stats.deleted),
    ] {
        let _ = writeln!(
            out,
            "      <div class='tile'><div class='label'>{label}</div><div class='value'>{value}</div></div>"
        );
    }
    let _ = writeln!(
        out,
        "      <div class='tile'><div class='label'>Duration</div><div class='value'>{:.3}s</div></div>",
        result.stats.duration
    );
    let _ = writeln!(out, "    </div>");

    write_change_panel(&mut out, "New Files", &result.added);
    write_change_panel(&mut out, "Modified Files", &result.modified);
    write_change_panel(&mut out, "Deleted Files", &result.deleted);
    write_advisor_panel(&mut out, &narrative);

    let _ = writeln!(out, "  </main>");
    let _ = writeln!(out, "</body>");
    let _ = writeln!(out, "</html>");

    std::fs::write(&path, out).map_err(|e| Error::io(&path, e))?;
    Ok(path)
}

fn write_change_panel(out: &mut String, title: &str, files: &FileMap) {
    let _ = writeln!(out, "    <section class='panel'>");
    let _ = writeln!(out, "      <div class='panel-head'>");
    let _ = writeln!(out, "        <h2>{}</h2>", escape_html(title));
    let _ = writeln!(out, "        <span class='count'>{}</span>", files.len());
    let _ = writeln!(out, "      </div>");

    if files.is_empty() {
        let _ = writeln!(
            out,
            "      <p class='empty'>No entries in this category for this scan.</p>"
        );
        let _ = writeln!(out, "    </section>");
        return;
    }

    let _ = writeln!(out, "      <table>");
    let _ = writeln!(
        out,
        "        <thead><tr><th>Path</th><th>Size (bytes)</th><th>Modified Time</th><th>SHA-256</th></tr></thead>"
    );
    let _ = writeln!(out, "        <tbody>");
    for entry in files.values() {
        let mtime = sentinel_fs::clock::format_epoch(entry.mtime).unwrap_or_else(|| "-".into());
        let _ = writeln!(
            out,
            "          <tr><td>{}</td><td>{}</td><td>{}</td><td class='hash'>{}</td></tr>",
            escape_html(&entry.path),
            entry.size,
            escape_html(&mtime),
            escape_html(&entry.hash),
        );
    }
    let _ = writeln!(out, "        </tbody>");
    let _ = writeln!(out, "      </table>");
    let _ = writeln!(out, "    </section>");
}

fn write_advisor_panel(out: &mut String, narrative: &AdvisorNarrative) {
    let risk_class = match narrative.risk_level.as_str() {
        "high" => "risk-high",
        "medium" => "risk-medium",
        _ => "risk-low",
    };

    let _ = writeln!(out, "    <section class='panel'>");
    let _ = writeln!(out, "      <div class='panel-head'>");
    let _ = writeln!(out, "        <h2>Advisor</h2>");
    let _ = writeln!(
        out,
        "        <span class='count {risk_class}'>risk: {}</span>",
        escape_html(&narrative.risk_level)
    );
    let _ = writeln!(out, "      </div>");
    let _ = writeln!(
        out,
        "      <p class='empty'>{}</p>",
        escape_html(&narrative.summary)
    );
    for (title, lines) in [
        ("Why this matters", &narrative.whys),
        ("What matters now", &narrative.what_matters),
        ("Teaching notes", &narrative.teaching),
        ("Suggested next steps", &narrative.next_steps),
    ] {
        if lines.is_empty() {
            continue;
        }
        let _ = writeln!(out, "      <div class='panel-head'><h2>{title}</h2></div>");
        let _ = writeln!(out, "      <ul>");
        for line in lines {
            let _ = writeln!(out, "        <li>{}</li>", escape_html(line));
        }
        let _ = writeln!(out, "      </ul>");
    }
    let _ = writeln!(out, "    </section>");
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{FileEntry, ScanResult};

    #[test]
    fn escapes_markup_in_paths() {
        let dir = tempfile::tempdir().unwrap();
        let hostile = "/t/<script>alert(1)</script>";
        let mut result = ScanResult::default();
        result.added.insert(
            hostile.into(),
            FileEntry {
                path: hostile.into(),
                hash: "e".repeat(64),
                size: 1,
                mtime: 0,
            },
        );
        result.stats.added = 1;

        let path = write_html(&result, "id", dir.path()).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(!text.contains("<script>alert"));
        assert!(text.contains("&lt;script&gt;"));
    }

    #[test]
    fn report_is_a_complete_page() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_html(&ScanResult::default(), "id", dir.path()).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("<!DOCTYPE html>"));
        assert!(text.contains("</html>"));
        assert!(text.contains("CLEAN"));
    }
}
