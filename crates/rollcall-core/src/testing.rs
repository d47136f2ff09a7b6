//! In-memory service fakes for unit tests.

use crate::service::{FaceComparator, ObjectStore, RecordTable, ServiceError};
use crate::types::{AttendanceRecord, FaceMatch};
use std::cell::RefCell;
use std::collections::HashSet;

#[derive(Default)]
pub struct FakeCloud {
    /// Object keys in listing order.
    pub objects: RefCell<Vec<String>>,
    /// Reference keys whose face matches every candidate.
    pub matching: HashSet<String>,
    /// Reference key whose comparison fails with a service error.
    pub failing: Option<String>,
    pub fail_put_object: bool,
    pub fail_list: bool,
    pub fail_put_item: bool,
    /// Every `(source, target, threshold)` passed to `compare_faces`.
    pub compared: RefCell<Vec<(String, String, f32)>>,
    pub records: RefCell<Vec<AttendanceRecord>>,
}

impl FakeCloud {
    pub fn with_references(keys: &[&str]) -> Self {
        Self {
            objects: RefCell::new(keys.iter().map(|k| k.to_string()).collect()),
            ..Self::default()
        }
    }

    pub fn matching(mut self, key: &str) -> Self {
        self.matching.insert(key.to_string());
        self
    }
}

impl ObjectStore for FakeCloud {
    async fn put_object(&self, _bucket: &str, key: &str, _data: Vec<u8>) -> Result<(), ServiceError> {
        if self.fail_put_object {
            return Err(ServiceError::PutObject {
                key: key.to_string(),
                message: "connection reset".into(),
            });
        }
        self.objects.borrow_mut().push(key.to_string());
        Ok(())
    }

    async fn list_objects(&self, _bucket: &str, prefix: &str) -> Result<Vec<String>, ServiceError> {
        if self.fail_list {
            return Err(ServiceError::ListObjects {
                prefix: prefix.to_string(),
                message: "access denied".into(),
            });
        }
        Ok(self
            .objects
            .borrow()
            .iter()
            .filter(|k| k.starts_with(prefix))
            .cloned()
            .collect())
    }
}

impl FaceComparator for FakeCloud {
    async fn compare_faces(
        &self,
        _bucket: &str,
        source_key: &str,
        target_key: &str,
        threshold: f32,
    ) -> Result<Vec<FaceMatch>, ServiceError> {
        self.compared
            .borrow_mut()
            .push((source_key.to_string(), target_key.to_string(), threshold));
        if self.failing.as_deref() == Some(source_key) {
            return Err(ServiceError::CompareFaces {
                source_key: source_key.to_string(),
                target_key: target_key.to_string(),
                message: "InvalidParameterException".into(),
            });
        }
        if self.matching.contains(source_key) {
            Ok(vec![FaceMatch {
                similarity: Some(99.1),
            }])
        } else {
            Ok(Vec::new())
        }
    }
}

impl RecordTable for FakeCloud {
    async fn put_record(&self, table: &str, record: &AttendanceRecord) -> Result<(), ServiceError> {
        if self.fail_put_item {
            return Err(ServiceError::PutItem {
                table: table.to_string(),
                message: "ResourceNotFoundException".into(),
            });
        }
        self.records.borrow_mut().push(record.clone());
        Ok(())
    }

    async fn scan_records(&self, _table: &str) -> Result<Vec<AttendanceRecord>, ServiceError> {
        Ok(self.records.borrow().clone())
    }
}
