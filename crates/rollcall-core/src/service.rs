//! Seams to the managed cloud services.
//!
//! The components in this crate only talk to these traits; `rollcall-aws`
//! provides the S3, Rekognition and DynamoDB implementations.

#![allow(async_fn_in_trait)]

use crate::types::{AttendanceRecord, FaceMatch};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("put object {key} failed: {message}")]
    PutObject { key: String, message: String },
    #[error("list objects under {prefix} failed: {message}")]
    ListObjects { prefix: String, message: String },
    #[error("compare faces {source_key} -> {target_key} failed: {message}")]
    CompareFaces {
        source_key: String,
        target_key: String,
        message: String,
    },
    #[error("put item into {table} failed: {message}")]
    PutItem { table: String, message: String },
    #[error("scan of {table} failed: {message}")]
    Scan { table: String, message: String },
    #[error("malformed item in {table}: {message}")]
    MalformedItem { table: String, message: String },
}

/// Blob storage holding reference and candidate images.
pub trait ObjectStore {
    async fn put_object(&self, bucket: &str, key: &str, data: Vec<u8>) -> Result<(), ServiceError>;

    /// Every key under `prefix`, in the order the store lists them.
    async fn list_objects(&self, bucket: &str, prefix: &str) -> Result<Vec<String>, ServiceError>;
}

/// Pairwise face comparison between two stored images.
pub trait FaceComparator {
    /// Matches of the source face found in the target image at or above
    /// `threshold` percent similarity. Empty means no match.
    async fn compare_faces(
        &self,
        bucket: &str,
        source_key: &str,
        target_key: &str,
        threshold: f32,
    ) -> Result<Vec<FaceMatch>, ServiceError>;
}

/// Key-value table of attendance records.
pub trait RecordTable {
    async fn put_record(&self, table: &str, record: &AttendanceRecord) -> Result<(), ServiceError>;

    /// Full scan, no server-side filtering.
    async fn scan_records(&self, table: &str) -> Result<Vec<AttendanceRecord>, ServiceError>;
}

impl<T: ObjectStore> ObjectStore for &T {
    async fn put_object(&self, bucket: &str, key: &str, data: Vec<u8>) -> Result<(), ServiceError> {
        (**self).put_object(bucket, key, data).await
    }

    async fn list_objects(&self, bucket: &str, prefix: &str) -> Result<Vec<String>, ServiceError> {
        (**self).list_objects(bucket, prefix).await
    }
}

impl<T: FaceComparator> FaceComparator for &T {
    async fn compare_faces(
        &self,
        bucket: &str,
        source_key: &str,
        target_key: &str,
        threshold: f32,
    ) -> Result<Vec<FaceMatch>, ServiceError> {
        (**self)
            .compare_faces(bucket, source_key, target_key, threshold)
            .await
    }
}

impl<T: RecordTable> RecordTable for &T {
    async fn put_record(&self, table: &str, record: &AttendanceRecord) -> Result<(), ServiceError> {
        (**self).put_record(table, record).await
    }

    async fn scan_records(&self, table: &str) -> Result<Vec<AttendanceRecord>, ServiceError> {
        (**self).scan_records(table).await
    }
}
