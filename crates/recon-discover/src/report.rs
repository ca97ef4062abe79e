//! Report rendering and persistence.

use std::fmt::Write as _;
use std::path::Path;

use chrono::Local;

use recon_core::Report;

use crate::config::ReportFormat;
use crate::error::Result;

const RULE_WIDTH: usize = 60;
const TARGET_RULE_WIDTH: usize = 40;

/// Render the plain-text report.
pub fn render_text(report: &Report) -> String {
    let heavy = "=".repeat(RULE_WIDTH);
    let light = "-".repeat(RULE_WIDTH);
    let mut out = String::new();

    // Writing into a String cannot fail.
    let _ = writeln!(out, "Web Reconnaissance Results for {}", report.target);
    let _ = writeln!(
        out,
        "Generated on {}",
        report
            .generated_at
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M:%S")
    );
    let _ = writeln!(out, "{heavy}\n");

    let _ = writeln!(out, "Subdomains:\n{light}");
    if report.subdomains.is_empty() {
        out.push_str("No subdomains found\n");
    } else {
        for subdomain in &report.subdomains {
            let _ = writeln!(out, "{subdomain}");
        }
    }

    let _ = writeln!(out, "\n{heavy}\n");

    let _ = writeln!(out, "Open Ports:\n{light}");
    if report.scan_results.is_empty() {
        out.push_str("No open ports found on any target\n");
    } else {
        for (target, ports) in &report.scan_results {
            let _ = writeln!(out, "\nTarget: {target}\n{}", "-".repeat(TARGET_RULE_WIDTH));
            if ports.is_empty() {
                out.push_str("No open ports found\n");
            }
            for port in ports {
                let _ = writeln!(out, "{port}");
            }
        }
    }

    out
}

pub fn render(report: &Report, format: ReportFormat) -> Result<String> {
    match format {
        ReportFormat::Text => Ok(render_text(report)),
        ReportFormat::Json => Ok(serde_json::to_string_pretty(report)?),
    }
}

/// Write the rendered report to `path`.
pub fn write_report(report: &Report, path: &Path, format: ReportFormat) -> Result<()> {
    let rendered = render(report, format)?;
    std::fs::write(path, rendered)?;
    tracing::info!(path = %path.display(), format = ?format, "Results saved");
    Ok(())
}
