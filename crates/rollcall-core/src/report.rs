//! Admin report: password gate, daily filter, CSV and JSON export.

use crate::service::{RecordTable, ServiceError};
use crate::types::{AttendanceRecord, REPORT_COLUMNS};
use chrono::NaiveDate;
use std::io::Write;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AdminError {
    #[error("invalid password")]
    InvalidPassword,
    #[error(transparent)]
    Service(#[from] ServiceError),
    #[error("csv export failed: {0}")]
    Csv(#[from] csv::Error),
    #[error("json export failed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

/// Plain comparison against the shared admin password.
pub fn check_password(supplied: &str, expected: &str) -> Result<(), AdminError> {
    if supplied == expected {
        Ok(())
    } else {
        tracing::warn!("admin login rejected");
        Err(AdminError::InvalidPassword)
    }
}

/// Keep only records whose `TimeStamp` falls on `date`.
pub fn records_for_date(records: Vec<AttendanceRecord>, date: NaiveDate) -> Vec<AttendanceRecord> {
    let prefix = date.format("%Y-%m-%d").to_string();
    records.into_iter().filter(|r| r.is_on(&prefix)).collect()
}

/// File name for a day's CSV export: `attendance_{date}.csv`.
pub fn report_filename(date: NaiveDate) -> String {
    format!("attendance_{}.csv", date.format("%Y-%m-%d"))
}

/// A day's attendance, loaded from a full table scan.
#[derive(Debug, Clone)]
pub struct DailyReport {
    pub date: NaiveDate,
    pub records: Vec<AttendanceRecord>,
}

impl DailyReport {
    /// Scan `table_name` and keep the rows for `date`.
    pub async fn load<T: RecordTable>(
        table: &T,
        table_name: &str,
        date: NaiveDate,
    ) -> Result<Self, AdminError> {
        let all = table.scan_records(table_name).await?;
        let scanned = all.len();
        let records = records_for_date(all, date);
        tracing::info!(table = table_name, %date, scanned, kept = records.len(), "loaded daily report");
        Ok(Self { date, records })
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn filename(&self) -> String {
        report_filename(self.date)
    }

    /// Write a header row and one row per record.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<(), AdminError> {
        let mut wtr = csv::Writer::from_writer(writer);
        wtr.write_record(REPORT_COLUMNS)?;
        for record in &self.records {
            wtr.write_record(record.report_row())?;
        }
        wtr.flush()?;
        Ok(())
    }

    pub fn write_json<W: Write>(&self, writer: W) -> Result<(), AdminError> {
        serde_json::to_writer_pretty(writer, &self.records)?;
        Ok(())
    }

    /// Fixed-width text table for terminal display.
    pub fn render_table(&self) -> String {
        let mut widths = REPORT_COLUMNS.map(str::len);
        for record in &self.records {
            for (w, cell) in widths.iter_mut().zip(record.report_row()) {
                *w = (*w).max(cell.chars().count());
            }
        }

        let mut out = String::new();
        push_row(&mut out, REPORT_COLUMNS, &widths);
        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        push_row(&mut out, rule.iter().map(String::as_str), &widths);
        for record in &self.records {
            push_row(&mut out, record.report_row(), &widths);
        }
        out
    }
}

fn push_row<'a>(out: &mut String, cells: impl IntoIterator<Item = &'a str>, widths: &[usize]) {
    let line: Vec<String> = cells
        .into_iter()
        .zip(widths)
        .map(|(cell, &w)| format!("{cell:<w$}"))
        .collect();
    out.push_str(line.join("  ").trim_end());
    out.push('\n');
}
