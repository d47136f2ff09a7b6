use aws_sdk_dynamodb::error::DisplayErrorContext;
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client;
use rollcall_core::{AttendanceRecord, RecordTable, ServiceError};
use std::collections::HashMap;
use tracing::instrument;

type Item = HashMap<String, AttributeValue>;

/// DynamoDB-backed [`RecordTable`]. Every attribute is stored as a string.
#[derive(Clone)]
pub struct DynamoRecordTable {
    client: Client,
}

impl DynamoRecordTable {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

impl RecordTable for DynamoRecordTable {
    #[instrument(skip(self, record), fields(record_id = %record.record_id))]
    async fn put_record(&self, table: &str, record: &AttendanceRecord) -> Result<(), ServiceError> {
        self.client
            .put_item()
            .table_name(table)
            .set_item(Some(record_to_item(record)))
            .send()
            .await
            .map_err(|e| ServiceError::PutItem {
                table: table.to_string(),
                message: DisplayErrorContext(&e).to_string(),
            })?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn scan_records(&self, table: &str) -> Result<Vec<AttendanceRecord>, ServiceError> {
        let mut records = Vec::new();
        let mut start_key: Option<Item> = None;
        let mut pages = 0usize;

        loop {
            let response = self
                .client
                .scan()
                .table_name(table)
                .set_exclusive_start_key(start_key.take())
                .send()
                .await
                .map_err(|e| ServiceError::Scan {
                    table: table.to_string(),
                    message: DisplayErrorContext(&e).to_string(),
                })?;
            pages += 1;

            for item in response.items() {
                records.push(item_to_record(item).map_err(|message| {
                    ServiceError::MalformedItem {
                        table: table.to_string(),
                        message,
                    }
                })?);
            }

            match response.last_evaluated_key() {
                Some(key) if !key.is_empty() => start_key = Some(key.clone()),
                _ => break,
            }
        }

        tracing::debug!(table, pages, count = records.len(), "scan complete");
        Ok(records)
    }
}

pub fn record_to_item(record: &AttendanceRecord) -> Item {
    [
        ("RecordID", &record.record_id),
        ("StudentName", &record.student_name),
        ("TimeStamp", &record.timestamp),
        ("Status", &record.status),
        ("ImageURL", &record.image_url),
        ("Department", &record.department),
        ("Year-PassOut", &record.year_passout),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), AttributeValue::S(v.clone())))
    .collect()
}

/// Parse a scanned item. `RecordID`, `StudentName` and `TimeStamp` are
/// required; the rest default to empty strings.
pub fn item_to_record(item: &Item) -> Result<AttendanceRecord, String> {
    let optional = |name: &str| -> Result<String, String> {
        match item.get(name) {
            None => Ok(String::new()),
            Some(AttributeValue::S(s)) => Ok(s.clone()),
            Some(other) => Err(format!("attribute {name} is not a string: {other:?}")),
        }
    };
    let required = |name: &str| -> Result<String, String> {
        if item.contains_key(name) {
            optional(name)
        } else {
            Err(format!("missing attribute {name}"))
        }
    };

    Ok(AttendanceRecord {
        record_id: required("RecordID")?,
        student_name: required("StudentName")?,
        timestamp: required("TimeStamp")?,
        status: optional("Status")?,
        image_url: optional("ImageURL")?,
        department: optional("Department")?,
        year_passout: optional("Year-PassOut")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> AttendanceRecord {
        AttendanceRecord {
            record_id: "0b6f2a8e-4d1c-4f57-9a36-2f1f5d2c7e10".into(),
            student_name: "alice".into(),
            timestamp: "2026-10-19T09:00:00.000000".into(),
            status: "Present".into(),
            image_url: "https://bucket.s3.amazonaws.com/unknown/tmp1.jpg".into(),
            department: "CSE - AIML".into(),
            year_passout: "2022-2026".into(),
        }
    }

    #[test]
    fn test_item_attribute_names() {
        let item = record_to_item(&record());
        assert_eq!(item.len(), 7);
        assert_eq!(
            item.get("Year-PassOut"),
            Some(&AttributeValue::S("2022-2026".into()))
        );
        assert_eq!(item.get("Status"), Some(&AttributeValue::S("Present".into())));
    }

    #[test]
    fn test_item_parses_back() {
        let item = record_to_item(&record());
        assert_eq!(item_to_record(&item).unwrap(), record());
    }

    #[test]
    fn test_missing_required_attribute() {
        let mut item = record_to_item(&record());
        item.remove("TimeStamp");
        let err = item_to_record(&item).unwrap_err();
        assert!(err.contains("TimeStamp"));
    }

    #[test]
    fn test_missing_optional_attribute_defaults() {
        let mut item = record_to_item(&record());
        item.remove("Department");
        assert_eq!(item_to_record(&item).unwrap().department, "");
    }

    #[test]
    fn test_non_string_attribute_rejected() {
        let mut item = record_to_item(&record());
        item.insert("StudentName".into(), AttributeValue::N("7".into()));
        assert!(item_to_record(&item).is_err());
    }
}
