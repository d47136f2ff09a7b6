//! Attendance recorder: one table item per recognition.

use crate::service::RecordTable;
use crate::types::{image_url, AttendanceRecord, STATUS_PRESENT};
use chrono::{Local, NaiveDateTime};

/// Format of `TimeStamp`: local ISO-8601 with microseconds, no offset.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

pub struct AttendanceRecorder<T> {
    table: T,
    table_name: String,
    department: String,
    year_passout: String,
}

impl<T: RecordTable> AttendanceRecorder<T> {
    pub fn new(
        table: T,
        table_name: impl Into<String>,
        department: impl Into<String>,
        year_passout: impl Into<String>,
    ) -> Self {
        Self {
            table,
            table_name: table_name.into(),
            department: department.into(),
            year_passout: year_passout.into(),
        }
    }

    /// Build a fresh record for `name` seen in `bucket/candidate_key` at `at`.
    pub fn build_record(
        &self,
        name: &str,
        bucket: &str,
        candidate_key: &str,
        at: NaiveDateTime,
    ) -> AttendanceRecord {
        AttendanceRecord {
            record_id: uuid::Uuid::new_v4().to_string(),
            student_name: name.to_string(),
            timestamp: at.format(TIMESTAMP_FORMAT).to_string(),
            status: STATUS_PRESENT.to_string(),
            image_url: image_url(bucket, candidate_key),
            department: self.department.clone(),
            year_passout: self.year_passout.clone(),
        }
    }

    /// Write one attendance record. Returns `false` if the put failed.
    ///
    /// Every call writes a new item; nothing deduplicates repeat sightings.
    pub async fn record(&self, name: &str, bucket: &str, candidate_key: &str) -> bool {
        let record = self.build_record(name, bucket, candidate_key, Local::now().naive_local());
        match self.table.put_record(&self.table_name, &record).await {
            Ok(()) => {
                tracing::info!(
                    name,
                    record_id = %record.record_id,
                    table = %self.table_name,
                    "attendance marked"
                );
                true
            }
            Err(e) => {
                tracing::error!(error = %e, name, "failed to mark attendance");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeCloud;
    use crate::types::parse_image_url;
    use chrono::NaiveDate;

    fn recorder(cloud: &FakeCloud) -> AttendanceRecorder<&FakeCloud> {
        AttendanceRecorder::new(cloud, "AttendanceTable", "CSE - AIML", "2022-2026")
    }

    #[tokio::test]
    async fn test_repeated_calls_create_distinct_records() {
        let cloud = FakeCloud::default();
        let rec = recorder(&cloud);
        assert!(rec.record("alice", "bucket", "unknown/tmp1.jpg").await);
        assert!(rec.record("alice", "bucket", "unknown/tmp1.jpg").await);

        let records = cloud.records.borrow();
        assert_eq!(records.len(), 2);
        assert_ne!(records[0].record_id, records[1].record_id);
        assert!(records.iter().all(|r| r.student_name == "alice"));
    }

    #[tokio::test]
    async fn test_record_fields() {
        let cloud = FakeCloud::default();
        assert!(recorder(&cloud).record("bob", "faces", "unknown/tmpx.jpg").await);

        let records = cloud.records.borrow();
        let r = &records[0];
        assert_eq!(r.status, "Present");
        assert_eq!(r.department, "CSE - AIML");
        assert_eq!(r.year_passout, "2022-2026");
        assert_eq!(r.image_url, "https://faces.s3.amazonaws.com/unknown/tmpx.jpg");
        assert!(uuid::Uuid::parse_str(&r.record_id).is_ok());
        assert!(NaiveDateTime::parse_from_str(&r.timestamp, TIMESTAMP_FORMAT).is_ok());
    }

    #[tokio::test]
    async fn test_put_failure_returns_false() {
        let cloud = FakeCloud {
            fail_put_item: true,
            ..FakeCloud::default()
        };
        assert!(!recorder(&cloud).record("alice", "bucket", "unknown/tmp1.jpg").await);
    }

    #[test]
    fn test_build_record_url_round_trips() {
        let cloud = FakeCloud::default();
        let at = NaiveDate::from_ymd_opt(2026, 10, 19)
            .unwrap()
            .and_hms_micro_opt(9, 5, 7, 42)
            .unwrap();
        let r = recorder(&cloud).build_record("carol", "my.bucket", "unknown/tmpq.jpg", at);
        assert_eq!(r.timestamp, "2026-10-19T09:05:07.000042");
        assert_eq!(
            parse_image_url(&r.image_url),
            Some(("my.bucket".to_string(), "unknown/tmpq.jpg".to_string()))
        );
    }
}
