use serde::{Deserialize, Serialize};

/// Status written on every attendance record.
pub const STATUS_PRESENT: &str = "Present";

/// Column order of the admin report and its CSV export.
pub const REPORT_COLUMNS: [&str; 7] = [
    "StudentName",
    "TimeStamp",
    "Status",
    "ImageURL",
    "RecordID",
    "Department",
    "Year-PassOut",
];

const S3_HOST_SUFFIX: &str = ".s3.amazonaws.com/";

/// One attendance entry, stored as a single item keyed by `RecordID`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    #[serde(rename = "RecordID")]
    pub record_id: String,
    #[serde(rename = "StudentName")]
    pub student_name: String,
    /// Local creation time, ISO-8601 without offset.
    #[serde(rename = "TimeStamp")]
    pub timestamp: String,
    #[serde(rename = "Status")]
    pub status: String,
    #[serde(rename = "ImageURL")]
    pub image_url: String,
    #[serde(rename = "Department")]
    pub department: String,
    #[serde(rename = "Year-PassOut")]
    pub year_passout: String,
}

impl AttendanceRecord {
    /// Field values in [`REPORT_COLUMNS`] order.
    pub fn report_row(&self) -> [&str; 7] {
        [
            &self.student_name,
            &self.timestamp,
            &self.status,
            &self.image_url,
            &self.record_id,
            &self.department,
            &self.year_passout,
        ]
    }

    /// True if the record was created on the given ISO date (`YYYY-MM-DD`).
    pub fn is_on(&self, iso_date: &str) -> bool {
        self.timestamp.starts_with(iso_date)
    }
}

/// One face match reported by the comparison service.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaceMatch {
    /// Similarity score in percent (0–100), when the service reports one.
    pub similarity: Option<f32>,
}

/// Compose an object key as `{folder}/{filename}`.
pub fn object_key(folder: &str, filename: &str) -> String {
    format!("{}/{}", folder.trim_end_matches('/'), filename)
}

/// Public URL of an object, as stored in `ImageURL`.
pub fn image_url(bucket: &str, key: &str) -> String {
    format!("https://{bucket}{S3_HOST_SUFFIX}{key}")
}

/// Split an `ImageURL` back into `(bucket, key)`.
pub fn parse_image_url(url: &str) -> Option<(String, String)> {
    let rest = url.strip_prefix("https://")?;
    let (bucket, key) = rest.split_once(S3_HOST_SUFFIX)?;
    if bucket.is_empty() || key.is_empty() {
        return None;
    }
    Some((bucket.to_string(), key.to_string()))
}

/// Person name encoded in a reference image key.
///
/// `known_faces/alice.jpg` → `alice`. Everything from the first `.` of the
/// base filename onward is dropped, so `bob.smith.png` → `bob`.
pub fn reference_name(key: &str) -> Option<String> {
    let base = key.rsplit('/').next()?;
    let name = base.split('.').next()?;
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}
