// Tests for report export: CSV quoting, plain-text flattening, saving

use chrono::Utc;
use seo_audit_core::markup::html_to_plain_text;
use seo_audit_core::report::{
    CSV_HEADER, generate_csv_report, render_report, resolve_output_path, save_report,
};
use seo_audit_core::{AuditReport, CheckStatus, ReportFormat, ReportItem};
use std::fs;
use tempfile::TempDir;

fn report_with(items: Vec<ReportItem>) -> AuditReport {
    let now = Utc::now();
    AuditReport {
        run_id: "test-run".to_string(),
        generation: 1,
        url: "https://example.com/".to_string(),
        started_at: now,
        finished_at: now,
        failed: false,
        items,
    }
}

/// Minimal RFC 4180 reader, enough to check what the exporter writes.
fn parse_csv(input: &str) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    let mut row = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        match (c, in_quotes) {
            ('"', true) if chars.peek() == Some(&'"') => {
                field.push('"');
                chars.next();
            }
            ('"', true) => in_quotes = false,
            ('"', false) => in_quotes = true,
            (',', false) => row.push(std::mem::take(&mut field)),
            ('\n', false) => {
                row.push(std::mem::take(&mut field));
                rows.push(std::mem::take(&mut row));
            }
            (c, _) => field.push(c),
        }
    }
    row.push(field);
    rows.push(row);
    rows
}

// ============================================================================
// CSV Export
// ============================================================================

#[test]
fn test_csv_header_and_row_count() {
    let report = report_with(vec![
        ReportItem::new("h1", "H1 Headings", CheckStatus::Ok, "Number of H1 Headings found: 1", "<p>Hi</p>"),
        ReportItem::new("h2", "H2 Headings", CheckStatus::Info, "Number of H2 Headings found: 0", ""),
    ]);

    let csv = generate_csv_report(&report);
    let lines: Vec<&str> = csv.split('\n').collect();
    assert_eq!(lines[0], CSV_HEADER);
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[1], "H1 Headings,Number of H1 Headings found: 1,Hi");
    assert!(!csv.ends_with('\n'));
}

#[test]
fn test_csv_escapes_comma_and_quote_and_round_trips() {
    let details = r#"<p>Title: "Cats, Dogs &amp; Birds"</p><ul><li>one,   two</li></ul>"#;
    let report = report_with(vec![ReportItem::new(
        "meta-title",
        "Meta Title Tag",
        CheckStatus::Warning,
        "Title is too long (61 characters)",
        details,
    )]);

    let csv = generate_csv_report(&report);
    let row = csv.split('\n').nth(1).unwrap();
    assert!(row.ends_with(r#","Title: ""Cats, Dogs & Birds"" one, two""#));

    let parsed = parse_csv(&csv);
    assert_eq!(parsed.len(), 2);
    assert_eq!(parsed[0], vec!["Test", "Extra Info", "Details"]);
    assert_eq!(parsed[1][0], "Meta Title Tag");
    assert_eq!(parsed[1][1], "Title is too long (61 characters)");
    assert_eq!(parsed[1][2], html_to_plain_text(details));
    assert_eq!(parsed[1][2], r#"Title: "Cats, Dogs & Birds" one, two"#);
}

#[test]
fn test_csv_flattens_multiline_details_to_one_line() {
    let report = report_with(vec![ReportItem::new(
        "robots-txt-check",
        "robots.txt Check",
        CheckStatus::Ok,
        "robots.txt found",
        "<pre>User-agent: *\nDisallow: /admin\n</pre>",
    )]);

    let csv = generate_csv_report(&report);
    assert_eq!(csv.lines().count(), 2);
    assert!(csv.ends_with("User-agent: * Disallow: /admin"));
}

// ============================================================================
// Rendering and Saving
// ============================================================================

#[test]
fn test_render_every_format() {
    let report = report_with(vec![ReportItem::audit_failed("https://example.com/", "timed out")]);

    for format in [ReportFormat::Text, ReportFormat::Json, ReportFormat::Csv, ReportFormat::Html] {
        let rendered = render_report(&report, format, false).unwrap();
        assert!(rendered.contains("Audit Failed"), "{:?}", format);
    }
}

#[test]
fn test_save_report_into_directory_uses_default_name() {
    let dir = TempDir::new().unwrap();
    let path = resolve_output_path(dir.path(), ReportFormat::Csv);
    assert_eq!(path, dir.path().join("seo-audit-report.csv"));

    let report = report_with(vec![]);
    save_report(&generate_csv_report(&report), &path).unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap(), CSV_HEADER);
}

#[test]
fn test_resolve_output_path_keeps_file_paths() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("custom.json");
    assert_eq!(resolve_output_path(&file, ReportFormat::Json), file);
}
