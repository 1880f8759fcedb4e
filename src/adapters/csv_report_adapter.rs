//! CSV writer for computed stop levels.
//!
//! One row per processed bar, followed by a `next` row carrying the preview
//! stop for the following session (EP/AF columns left empty).

use crate::domain::error::PsarStopError;
use crate::domain::trail::TrailResult;
use crate::ports::report_port::ReportPort;
use std::io::Write;

const HEADER: [&str; 7] = ["date", "high", "low", "ep", "af", "sar", "ext_low"];

#[derive(Debug, Default)]
pub struct CsvReportAdapter;

impl CsvReportAdapter {
    pub fn new() -> Self {
        Self
    }

    /// Writes the report to any sink; `write` wraps this with a file.
    pub fn write_to<W: Write>(&self, result: &TrailResult, sink: W) -> Result<(), PsarStopError> {
        let mut wtr = csv::Writer::from_writer(sink);
        wtr.write_record(HEADER).map_err(report_err)?;

        for row in &result.rows {
            wtr.write_record([
                row.date.to_string(),
                format!("{:.4}", row.high),
                format!("{:.4}", row.low),
                format!("{:.4}", row.ep),
                format!("{:.2}", row.af),
                format!("{:.4}", row.sar),
                format!("{:.4}", row.ext_low),
            ])
            .map_err(report_err)?;
        }

        if let Some(next) = &result.next {
            wtr.write_record([
                "next".to_string(),
                String::new(),
                String::new(),
                String::new(),
                String::new(),
                format!("{:.4}", next.sar),
                String::new(),
            ])
            .map_err(report_err)?;
        }

        wtr.flush()?;
        Ok(())
    }
}

fn report_err(e: csv::Error) -> PsarStopError {
    PsarStopError::Report {
        reason: format!("CSV write error: {}", e),
    }
}

impl ReportPort for CsvReportAdapter {
    fn write(&self, result: &TrailResult, output_path: &str) -> Result<(), PsarStopError> {
        let file = std::fs::File::create(output_path).map_err(|e| PsarStopError::Report {
            reason: format!("failed to create {}: {}", output_path, e),
        })?;
        self.write_to(result, file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::psar::NextSession;
    use crate::domain::trail::PeriodRow;
    use chrono::NaiveDate;

    fn sample_result() -> TrailResult {
        let date = NaiveDate::from_ymd_opt(2021, 1, 8).unwrap();
        TrailResult {
            rows: vec![PeriodRow {
                date,
                high: 44.12,
                low: 42.09,
                ep: 44.12,
                af: 0.02,
                sar: 42.05,
                ext_low: 42.05,
            }],
            entry_index: Some(0),
            stop_hit: None,
            next: Some(NextSession {
                after: date,
                sar: 42.05,
            }),
        }
    }

    #[test]
    fn writes_header_rows_and_next() {
        let mut buf = Vec::new();
        CsvReportAdapter::new()
            .write_to(&sample_result(), &mut buf)
            .unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "date,high,low,ep,af,sar,ext_low");
        assert_eq!(
            lines[1],
            "2021-01-08,44.1200,42.0900,44.1200,0.02,42.0500,42.0500"
        );
        assert_eq!(lines[2], "next,,,,,42.0500,");
    }

    #[test]
    fn no_next_row_without_preview() {
        let mut result = sample_result();
        result.next = None;
        let mut buf = Vec::new();
        CsvReportAdapter::new().write_to(&result, &mut buf).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap().lines().count(), 2);
    }

    #[test]
    fn write_creates_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("stops.csv");
        CsvReportAdapter::new()
            .write(&sample_result(), path.to_str().unwrap())
            .unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("date,high,low"));
    }

    #[test]
    fn write_to_missing_directory_fails() {
        let result = CsvReportAdapter::new().write(&sample_result(), "/nonexistent/dir/out.csv");
        assert!(matches!(result, Err(PsarStopError::Report { .. })));
    }
}
