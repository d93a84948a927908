use crate::analyzer::Analysis;
use crate::error::AnalyzerError;
use chrono::{DateTime, Utc};
use colored::Colorize;
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Width of the address column in console tables.
const ADDRESS_COLUMN_WIDTH: usize = 20;
const ENDPOINT_COLUMN_WIDTH: usize = 40;

/// Export rows, including the blank separator rows, end in CRLF.
const ROW_TERMINATOR: &[u8] = b"\r\n";

const SEPARATOR: &str = "════════════════════════════════════════════════════════════";

/// One row of an address-keyed table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AddressCount {
    pub address: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EndpointCount {
    pub endpoint: String,
    pub count: usize,
}

/// The three result sets in their final, ordered form.
#[derive(Debug, Serialize)]
pub struct Report {
    pub generated_at: DateTime<Utc>,
    pub failed_login_threshold: u64,
    pub total_lines: usize,
    pub lines_with_address: usize,
    pub requests_per_address: Vec<AddressCount>,
    /// `None` when no line carried a quoted HTTP request.
    pub most_accessed_endpoint: Option<EndpointCount>,
    /// Ordered by count descending, then address ascending.
    pub suspicious_activity: Vec<AddressCount>,
}

impl Report {
    pub fn assemble(analysis: &Analysis, threshold: u64) -> Self {
        let requests_per_address = analysis
            .requests_per_address
            .iter()
            .map(|(address, count)| AddressCount {
                address: address.clone(),
                count: *count,
            })
            .collect();

        let most_accessed_endpoint = analysis
            .most_accessed_endpoint()
            .ok()
            .map(|(endpoint, count)| EndpointCount {
                endpoint: endpoint.to_string(),
                count,
            });

        let mut suspicious_activity: Vec<AddressCount> = analysis
            .suspicious(threshold)
            .into_iter()
            .map(|(address, count)| AddressCount { address, count })
            .collect();
        suspicious_activity
            .sort_unstable_by(|a, b| b.count.cmp(&a.count).then(a.address.cmp(&b.address)));

        Self {
            generated_at: Utc::now(),
            failed_login_threshold: threshold,
            total_lines: analysis.total_lines,
            lines_with_address: analysis.lines_with_address,
            requests_per_address,
            most_accessed_endpoint,
            suspicious_activity,
        }
    }
}

// ─── Console view ────────────────────────────────────────────────────────────

pub fn render_banner(report: &Report, source: &Path, w: &mut dyn Write) -> std::io::Result<()> {
    writeln!(w, "{}", SEPARATOR.cyan().bold())?;
    writeln!(w, "  {}", "ACCESS LOG ANALYSIS".white().bold())?;
    writeln!(w, "{}", SEPARATOR.cyan().bold())?;
    writeln!(w, "  Source    : {}", source.display().to_string().yellow())?;
    writeln!(
        w,
        "  Lines     : {} ({} with an address)",
        report.total_lines, report.lines_with_address
    )?;
    writeln!(w, "  Threshold : {} failed logins", report.failed_login_threshold)?;
    writeln!(
        w,
        "  Generated : {}",
        report.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    )?;
    Ok(())
}

pub fn render_requests(report: &Report, w: &mut dyn Write) -> std::io::Result<()> {
    writeln!(w, "{}", "Requests per IP:".cyan().bold())?;
    writeln!(w, "{}Request Count", pad_column("IP Address", ADDRESS_COLUMN_WIDTH))?;
    for row in &report.requests_per_address {
        writeln!(w, "{}{}", pad_column(&row.address, ADDRESS_COLUMN_WIDTH), row.count)?;
    }
    Ok(())
}

pub fn render_most_accessed(report: &Report, w: &mut dyn Write) -> std::io::Result<()> {
    writeln!(w, "{}", "Most Frequently Accessed Endpoint:".cyan().bold())?;
    writeln!(w, "{}Access Count", pad_column("Endpoint", ENDPOINT_COLUMN_WIDTH))?;
    match &report.most_accessed_endpoint {
        Some(found) => writeln!(
            w,
            "{}{}",
            pad_column(&found.endpoint, ENDPOINT_COLUMN_WIDTH),
            found.count
        ),
        None => writeln!(w, "{}", AnalyzerError::EmptyResult.to_string().yellow()),
    }
}

pub fn render_suspicious(report: &Report, w: &mut dyn Write) -> std::io::Result<()> {
    writeln!(w, "{}", "Suspicious Activity Detected:".cyan().bold())?;
    writeln!(
        w,
        "{}Failed Login Attempts",
        pad_column("IP Address", ADDRESS_COLUMN_WIDTH)
    )?;
    if report.suspicious_activity.is_empty() {
        writeln!(
            w,
            "{} No IPs exceeded {} failed logins.",
            "✓".green(),
            report.failed_login_threshold
        )?;
    }
    for row in &report.suspicious_activity {
        writeln!(w, "{}{}", pad_column(&row.address, ADDRESS_COLUMN_WIDTH), row.count)?;
    }
    Ok(())
}

/// All three sections, separated by blank lines.
pub fn render_all(report: &Report, w: &mut dyn Write) -> std::io::Result<()> {
    render_requests(report, w)?;
    writeln!(w)?;
    render_most_accessed(report, w)?;
    writeln!(w)?;
    render_suspicious(report, w)
}

/// Left-align `value` in a column of `width` characters, truncating if longer.
fn pad_column(value: &str, width: usize) -> String {
    let truncated: String = value.chars().take(width).collect();
    format!("{truncated:<width$}")
}

// ─── Export view ─────────────────────────────────────────────────────────────

/// One titled block of the CSV export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSection {
    pub title: &'static str,
    pub header: [&'static str; 2],
    pub rows: Vec<[String; 2]>,
}

/// The export layout: requests, most accessed endpoint, suspicious activity.
pub fn export_sections(report: &Report) -> Vec<ExportSection> {
    let requests = ExportSection {
        title: "Requests per IP",
        header: ["IP Address", "Request Count"],
        rows: report
            .requests_per_address
            .iter()
            .map(|row| [row.address.clone(), row.count.to_string()])
            .collect(),
    };

    let endpoint = ExportSection {
        title: "Most Accessed Endpoint",
        header: ["Endpoint", "Access Count"],
        rows: report
            .most_accessed_endpoint
            .iter()
            .map(|found| [found.endpoint.clone(), found.count.to_string()])
            .collect(),
    };

    let suspicious = ExportSection {
        title: "Suspicious Activity",
        header: ["IP Address", "Failed Login Count"],
        rows: report
            .suspicious_activity
            .iter()
            .map(|row| [row.address.clone(), row.count.to_string()])
            .collect(),
    };

    vec![requests, endpoint, suspicious]
}

/// Write the CSV export. Sections are separated by one empty row.
pub fn write_csv<W: Write>(report: &Report, mut out: W) -> Result<(), AnalyzerError> {
    for (i, section) in export_sections(report).iter().enumerate() {
        if i > 0 {
            out.write_all(ROW_TERMINATOR)?;
        }
        write_section(section, &mut out)?;
    }
    out.flush()?;
    Ok(())
}

fn write_section<W: Write>(section: &ExportSection, out: &mut W) -> Result<(), AnalyzerError> {
    // Title rows have one field, data rows two.
    let mut writer = csv::WriterBuilder::new()
        .flexible(true)
        .terminator(csv::Terminator::CRLF)
        .from_writer(out);
    writer.write_record([section.title])?;
    writer.write_record(section.header)?;
    for row in &section.rows {
        writer.write_record(row)?;
    }
    writer.flush()?;
    Ok(())
}

/// Write the CSV export to `path`, replacing any existing file.
pub fn export_csv(report: &Report, path: &Path) -> Result<(), AnalyzerError> {
    let file = File::create(path)?;
    write_csv(report, BufWriter::new(file))?;
    tracing::info!(path = %path.display(), "csv export written");
    Ok(())
}

/// Export the full report as pretty JSON.
pub fn export_json(report: &Report, path: &Path) -> Result<(), AnalyzerError> {
    let json = serde_json::to_string_pretty(report)?;
    std::fs::write(path, json)?;
    tracing::info!(path = %path.display(), "json summary written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_lines() -> Vec<&'static str> {
        vec![
            r#"10.0.0.1 - - "POST /login HTTP/1.1" 401 0"#,
            r#"10.0.0.1 - - "POST /login HTTP/1.1" 401 0"#,
            r#"10.0.0.3 - - "POST /login HTTP/1.1" 401 0"#,
            r#"10.0.0.3 - - "POST /login HTTP/1.1" 401 0"#,
            r#"10.0.0.2 - - "GET /home HTTP/1.1" 200 0"#,
            r#"10.0.0.1 - - "GET /home HTTP/1.1" 200 0"#,
            r#"10.0.0.2 - - "GET /home HTTP/1.1" 200 0"#,
        ]
    }

    fn report_for(lines: &[&str], threshold: u64) -> Report {
        Report::assemble(&Analysis::from_lines(lines), threshold)
    }

    fn csv_string(report: &Report) -> String {
        let mut buf = Vec::new();
        write_csv(report, &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn csv_layout_matches_export_contract() {
        let report = report_for(&sample_lines(), 1);
        let expected = "Requests per IP\r\n\
                        IP Address,Request Count\r\n\
                        10.0.0.1,3\r\n\
                        10.0.0.3,2\r\n\
                        10.0.0.2,2\r\n\
                        \r\n\
                        Most Accessed Endpoint\r\n\
                        Endpoint,Access Count\r\n\
                        /login,4\r\n\
                        \r\n\
                        Suspicious Activity\r\n\
                        IP Address,Failed Login Count\r\n\
                        10.0.0.1,2\r\n\
                        10.0.0.3,2\r\n";
        assert_eq!(csv_string(&report), expected);
    }

    #[test]
    fn csv_worked_example_bytes() {
        let lines = [
            r#"10.0.0.1 - - "GET /a HTTP/1.1" 401 0"#,
            r#"10.0.0.1 - - "GET /a HTTP/1.1" 401 0"#,
            r#"10.0.0.2 - - "GET /b HTTP/1.1" 200 0"#,
        ];
        let mut buf = Vec::new();
        write_csv(&report_for(&lines, 1), &mut buf).unwrap();
        let expected: &[u8] = b"Requests per IP\r\nIP Address,Request Count\r\n\
            10.0.0.1,2\r\n10.0.0.2,1\r\n\r\n\
            Most Accessed Endpoint\r\nEndpoint,Access Count\r\n/a,2\r\n\r\n\
            Suspicious Activity\r\nIP Address,Failed Login Count\r\n10.0.0.1,2\r\n";
        assert_eq!(buf, expected);
        assert!(!buf.windows(2).any(|w| w[1] == b'\n' && w[0] != b'\r'), "bare LF in export");
    }

    #[test]
    fn csv_omits_suspicious_rows_when_none() {
        let report = report_for(&sample_lines(), 10);
        let csv = csv_string(&report);
        assert!(csv.ends_with("Suspicious Activity\r\nIP Address,Failed Login Count\r\n"));
    }

    #[test]
    fn csv_for_empty_log_keeps_titles_and_headers() {
        let report = report_for(&[], 10);
        assert_eq!(
            csv_string(&report),
            "Requests per IP\r\nIP Address,Request Count\r\n\r\n\
             Most Accessed Endpoint\r\nEndpoint,Access Count\r\n\r\n\
             Suspicious Activity\r\nIP Address,Failed Login Count\r\n"
        );
    }

    #[test]
    fn csv_export_is_idempotent() {
        let lines = sample_lines();
        let first = csv_string(&report_for(&lines, 1));
        let second = csv_string(&report_for(&lines, 1));
        assert_eq!(first, second);
    }

    #[test]
    fn suspicious_sorted_by_count_then_address() {
        let mut lines = sample_lines();
        lines.push(r#"10.0.0.3 - - "POST /login HTTP/1.1" 401 0"#);
        let report = report_for(&lines, 0);
        let order: Vec<&str> = report
            .suspicious_activity
            .iter()
            .map(|row| row.address.as_str())
            .collect();
        assert_eq!(order, vec!["10.0.0.3", "10.0.0.1"]);
    }

    #[test]
    fn console_requests_table_pads_addresses() {
        let report = report_for(&sample_lines(), 1);
        let mut buf = Vec::new();
        render_requests(&report, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("Requests per IP:"));
        assert!(text.contains("IP Address          Request Count"));
        assert!(text.contains("10.0.0.1            3"));
    }

    #[test]
    fn console_reports_no_data_for_missing_endpoint() {
        let report = report_for(&["10.0.0.1 no request here"], 10);
        let mut buf = Vec::new();
        render_most_accessed(&report, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("Endpoint                                Access Count"));
        assert!(text.contains("no data available"));
    }

    #[test]
    fn console_all_sections_present() {
        let report = report_for(&sample_lines(), 1);
        let mut buf = Vec::new();
        render_all(&report, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("Endpoint                                Access Count"));
        assert!(text.contains("/login                                  4"));
        assert!(text.contains("Suspicious Activity Detected:"));
        assert!(text.contains("10.0.0.3            2"));
    }

    #[test]
    fn pad_column_truncates_long_values() {
        assert_eq!(pad_column("1.2.3.4", 10), "1.2.3.4   ");
        assert_eq!(pad_column("abcdefghijklmnopqrstuvwxyz", 20), "abcdefghijklmnopqrst");
    }

    #[test]
    fn export_files_are_written() {
        let dir = tempfile::tempdir().unwrap();
        let report = report_for(&sample_lines(), 1);

        let csv_path = dir.path().join("out.csv");
        export_csv(&report, &csv_path).unwrap();
        let written = std::fs::read_to_string(&csv_path).unwrap();
        assert_eq!(written, csv_string(&report));

        let json_path = dir.path().join("out.json");
        export_json(&report, &json_path).unwrap();
        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&json_path).unwrap()).unwrap();
        assert_eq!(value["failed_login_threshold"], 1);
        assert_eq!(value["most_accessed_endpoint"]["endpoint"], "/login");
        assert_eq!(value["suspicious_activity"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn export_to_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let report = report_for(&sample_lines(), 1);
        let err = export_csv(&report, &dir.path().join("nope").join("out.csv")).unwrap_err();
        assert!(matches!(err, AnalyzerError::Io(_)));
    }
}
