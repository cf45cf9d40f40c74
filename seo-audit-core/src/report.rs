// Report model and renderers (text, JSON, CSV, HTML)

use crate::markup::{self, escape_csv_field, escape_html, html_to_lines, html_to_plain_text};
use chrono::{DateTime, Utc};
use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

pub const AUDIT_FAILED_ID: &str = "audit-failed";
pub const CSV_HEADER: &str = "Test,Extra Info,Details";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    Ok,
    Warning,
    Error,
    Info,
}

impl CheckStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckStatus::Ok => "ok",
            CheckStatus::Warning => "warning",
            CheckStatus::Error => "error",
            CheckStatus::Info => "info",
        }
    }
}

impl std::fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of the report. `details` is HTML markup built from escaped text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportItem {
    pub check_id: String,
    pub test: String,
    pub status: CheckStatus,
    pub extra_info: String,
    pub details: String,
}

impl ReportItem {
    pub fn new(
        check_id: impl Into<String>,
        test: impl Into<String>,
        status: CheckStatus,
        extra_info: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            check_id: check_id.into(),
            test: test.into(),
            status,
            extra_info: extra_info.into(),
            details: details.into(),
        }
    }

    /// The single item a run produces when the page itself could not be fetched.
    pub fn audit_failed(url: &str, reason: &str) -> Self {
        Self::new(
            AUDIT_FAILED_ID,
            "Audit Failed",
            CheckStatus::Error,
            "Could not fetch the page",
            format!(
                "{}{}",
                markup::labeled("URL", url),
                markup::labeled("Error", reason)
            ),
        )
    }

    /// Used by document checks when there is no parsed document to inspect.
    pub fn no_document(check_id: &str, test: &str) -> Self {
        Self::new(
            check_id,
            test,
            CheckStatus::Info,
            "No document",
            markup::para("The page returned no parseable HTML, so nothing was found."),
        )
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCounts {
    pub ok: usize,
    pub warning: usize,
    pub error: usize,
    pub info: usize,
}

impl StatusCounts {
    pub fn total(&self) -> usize {
        self.ok + self.warning + self.error + self.info
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditReport {
    pub run_id: String,
    pub generation: u64,
    pub url: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// True when the page fetch failed and `items` holds only the failure item
    pub failed: bool,
    pub items: Vec<ReportItem>,
}

impl AuditReport {
    pub fn status_counts(&self) -> StatusCounts {
        let mut counts = StatusCounts::default();
        for item in &self.items {
            match item.status {
                CheckStatus::Ok => counts.ok += 1,
                CheckStatus::Warning => counts.warning += 1,
                CheckStatus::Error => counts.error += 1,
                CheckStatus::Info => counts.info += 1,
            }
        }
        counts
    }

    pub fn item(&self, check_id: &str) -> Option<&ReportItem> {
        self.items.iter().find(|i| i.check_id == check_id)
    }

    pub fn duration_ms(&self) -> i64 {
        (self.finished_at - self.started_at).num_milliseconds()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportFormat {
    Text,
    Json,
    Csv,
    Html,
}

impl ReportFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Some(ReportFormat::Text),
            "json" => Some(ReportFormat::Json),
            "csv" => Some(ReportFormat::Csv),
            "html" | "htm" => Some(ReportFormat::Html),
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ReportFormat::Text => "txt",
            ReportFormat::Json => "json",
            ReportFormat::Csv => "csv",
            ReportFormat::Html => "html",
        }
    }

    pub fn default_file_name(&self) -> String {
        format!("seo-audit-report.{}", self.extension())
    }
}

const HEAVY_RULE: &str =
    "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━";
const LIGHT_RULE: &str =
    "────────────────────────────────────────────────────────────────────────────────";

fn status_tag(status: CheckStatus, color: bool) -> String {
    let tag = format!("[{}]", status.as_str().to_uppercase());
    let padded = format!("{:<9}", tag);
    if !color {
        return padded;
    }
    match status {
        CheckStatus::Ok => padded.green().bold().to_string(),
        CheckStatus::Warning => padded.yellow().bold().to_string(),
        CheckStatus::Error => padded.red().bold().to_string(),
        CheckStatus::Info => padded.cyan().to_string(),
    }
}

/// Human-readable report. `color` adds ANSI styling for terminals.
pub fn generate_text_report(report: &AuditReport, color: bool) -> String {
    let mut out = String::new();

    out.push_str(HEAVY_RULE);
    out.push('\n');
    out.push_str("                           SEO AUDIT PRO REPORT\n");
    out.push_str(HEAVY_RULE);
    out.push_str("\n\n");

    out.push_str(&format!("URL:          {}\n", report.url));
    out.push_str(&format!("Run ID:       {}\n", report.run_id));
    out.push_str(&format!(
        "Audit Date:   {}\n",
        report.started_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    out.push_str(&format!("Duration:     {} ms\n", report.duration_ms()));

    let counts = report.status_counts();
    out.push_str(&format!(
        "Checks:       {} ({} ok, {} warning, {} error, {} info)\n\n",
        counts.total(),
        counts.ok,
        counts.warning,
        counts.error,
        counts.info
    ));

    out.push_str(HEAVY_RULE);
    out.push('\n');
    out.push_str(if report.failed { "AUDIT FAILED\n" } else { "RESULTS\n" });
    out.push_str(HEAVY_RULE);
    out.push_str("\n\n");

    for (idx, item) in report.items.iter().enumerate() {
        let title = if color {
            item.test.bold().to_string()
        } else {
            item.test.clone()
        };
        out.push_str(&format!(
            "{} [{}] {}\n",
            status_tag(item.status, color),
            idx + 1,
            title
        ));
        out.push_str(&format!("          {}\n", item.extra_info));
        for line in html_to_lines(&item.details) {
            out.push_str("            ");
            out.push_str(&line);
            out.push('\n');
        }
        out.push_str(LIGHT_RULE);
        out.push('\n');
    }

    out.push_str("\nGenerated by SEO Audit Pro\n");
    out
}

pub fn generate_json_report(report: &AuditReport) -> Result<String, serde_json::Error> {
    let counts = report.status_counts();
    let json_report = serde_json::json!({
        "report": {
            "metadata": {
                "generator": "SEO Audit Pro",
                "version": env!("CARGO_PKG_VERSION"),
                "generated_at": Utc::now().to_rfc3339(),
                "format": "json"
            },
            "run": {
                "id": report.run_id,
                "generation": report.generation,
                "url": report.url,
                "started_at": report.started_at.to_rfc3339(),
                "finished_at": report.finished_at.to_rfc3339(),
                "duration_ms": report.duration_ms(),
                "failed": report.failed
            },
            "summary": {
                "total_checks": counts.total(),
                "status_breakdown": counts
            },
            "items": report.items
        }
    });

    serde_json::to_string_pretty(&json_report)
}

/// CSV export: `Test,Extra Info,Details` header, details flattened to plain
/// text, rows joined with `\n`.
pub fn generate_csv_report(report: &AuditReport) -> String {
    let mut rows = Vec::with_capacity(report.items.len() + 1);
    rows.push(CSV_HEADER.to_string());

    for item in &report.items {
        rows.push(
            [
                escape_csv_field(&item.test),
                escape_csv_field(&item.extra_info),
                escape_csv_field(&html_to_plain_text(&item.details)),
            ]
            .join(","),
        );
    }

    rows.join("\n")
}

const HTML_STYLE: &str = "body{font-family:system-ui,sans-serif;max-width:960px;margin:2rem auto;padding:0 1rem;color:#1f2937}\
h1{color:#ea580c}table{border-collapse:collapse;width:100%}\
th,td{border:1px solid #e5e7eb;padding:.5rem;vertical-align:top;text-align:left}\
pre{white-space:pre-wrap;background:#f9fafb;padding:.5rem}\
.ok{color:#16a34a}.warning{color:#ca8a04}.error{color:#dc2626}.info{color:#2563eb}";

/// Standalone HTML page with the details markup embedded as-is.
pub fn generate_html_report(report: &AuditReport) -> String {
    let counts = report.status_counts();
    let mut out = String::new();

    out.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    out.push_str(&format!(
        "<title>SEO Audit Report: {}</title>\n",
        escape_html(&report.url)
    ));
    out.push_str(&format!("<style>{}</style>\n</head>\n<body>\n", HTML_STYLE));
    out.push_str("<h1>SEO Audit Pro Report</h1>\n");
    out.push_str(&markup::labeled("URL", &report.url));
    out.push_str(&markup::labeled(
        "Audit Date",
        &report.started_at.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
    ));
    out.push_str(&markup::labeled(
        "Summary",
        &format!(
            "{} ok, {} warning, {} error, {} info",
            counts.ok, counts.warning, counts.error, counts.info
        ),
    ));
    out.push_str("\n<table>\n<thead><tr><th>Test</th><th>Status</th><th>Extra Info</th><th>Details</th></tr></thead>\n<tbody>\n");

    for item in &report.items {
        out.push_str(&format!(
            "<tr id=\"{id}\"><td>{test}</td><td class=\"{status}\">{status}</td><td>{extra}</td><td>{details}</td></tr>\n",
            id = escape_html(&item.check_id),
            test = escape_html(&item.test),
            status = item.status.as_str(),
            extra = escape_html(&item.extra_info),
            details = item.details,
        ));
    }

    out.push_str("</tbody>\n</table>\n<p>Generated by SEO Audit Pro</p>\n</body>\n</html>\n");
    out
}

pub fn render_report(report: &AuditReport, format: ReportFormat, color: bool) -> Result<String, serde_json::Error> {
    Ok(match format {
        ReportFormat::Text => generate_text_report(report, color),
        ReportFormat::Json => generate_json_report(report)?,
        ReportFormat::Csv => generate_csv_report(report),
        ReportFormat::Html => generate_html_report(report),
    })
}

/// Where a report lands: a directory gets the format's default file name.
pub fn resolve_output_path(path: &Path, format: ReportFormat) -> PathBuf {
    if path.is_dir() {
        path.join(format.default_file_name())
    } else {
        path.to_path_buf()
    }
}

pub fn save_report(content: &str, path: &Path) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(content.as_bytes())?;
    Ok(())
}
