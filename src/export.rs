//! Session log export.

use std::io::Write;

use anyhow::{Context, Result};
use clap::ValueEnum;

use crate::session::SessionRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, strum_macros::Display)]
#[strum(serialize_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Json,
    Csv,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
        }
    }
}

pub fn export<W: Write>(format: ExportFormat, records: &[SessionRecord], writer: W) -> Result<()> {
    match format {
        ExportFormat::Json => export_json(records, writer),
        ExportFormat::Csv => export_csv(records, writer),
    }
}

/// Pretty-printed JSON array with camelCase field names.
pub fn export_json<W: Write>(records: &[SessionRecord], mut writer: W) -> Result<()> {
    serde_json::to_writer_pretty(&mut writer, records).context("failed to write JSON export")?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

/// Header row plus one row per session. Timestamps are RFC 3339.
pub fn export_csv<W: Write>(records: &[SessionRecord], writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    if records.is_empty() {
        wtr.write_record(CSV_HEADER)?;
    }
    for record in records {
        wtr.serialize(record)
            .with_context(|| format!("failed to write session {}", record.id))?;
    }
    wtr.flush()?;
    Ok(())
}

const CSV_HEADER: [&str; 13] = [
    "id",
    "startedAt",
    "endedAt",
    "status",
    "plannedTotalSeconds",
    "plannedStudySeconds",
    "plannedBreakSeconds",
    "activeStudySeconds",
    "activeBreakSeconds",
    "totalActiveSeconds",
    "pausedTotalSeconds",
    "topic",
    "mode",
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SessionStatus;
    use chrono::{TimeZone, Utc};

    fn record(id: &str, topic: &str) -> SessionRecord {
        let started = Utc.with_ymd_and_hms(2024, 1, 5, 9, 0, 0).unwrap();
        SessionRecord {
            id: id.into(),
            started_at: started,
            ended_at: started + chrono::Duration::minutes(30),
            status: SessionStatus::Completed,
            planned_total_seconds: 1800,
            planned_study_seconds: 1500,
            planned_break_seconds: 300,
            active_study_seconds: 1500,
            active_break_seconds: 300,
            total_active_seconds: 1800,
            paused_total_seconds: 0,
            topic: topic.into(),
            mode: "Pomodoro".into(),
        }
    }

    #[test]
    fn json_export_is_a_camel_case_array() {
        let mut buf = Vec::new();
        export_json(&[record("a", "Math"), record("b", "Art")], &mut buf).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        let arr = value.as_array().unwrap();
        assert_eq!(arr.len(), 2);
        assert_eq!(arr[0]["activeStudySeconds"], 1500);
        assert_eq!(arr[1]["topic"], "Art");
        assert_eq!(arr[0]["status"], "completed");
    }

    #[test]
    fn csv_export_has_header_and_rows() {
        let mut buf = Vec::new();
        export_csv(&[record("a", "Math, advanced")], &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next().unwrap(), CSV_HEADER.join(","));
        let row = lines.next().unwrap();
        assert!(row.starts_with("a,2024-01-05T09:00:00Z,"));
        assert!(row.contains("\"Math, advanced\""));
        assert!(lines.next().is_none());
    }

    #[test]
    fn empty_csv_export_still_has_header() {
        let mut buf = Vec::new();
        export_csv(&[], &mut buf).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap().trim_end(), CSV_HEADER.join(","));
    }

    #[test]
    fn format_dispatch() {
        let mut buf = Vec::new();
        export(ExportFormat::Json, &[], &mut buf).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap().trim(), "[]");
        assert_eq!(ExportFormat::Csv.extension(), "csv");
    }
}
