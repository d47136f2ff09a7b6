//! Upload → match → record, stopping at the first step that comes back empty.

use crate::gateway::ObjectGateway;
use crate::matcher::FaceMatcher;
use crate::recorder::AttendanceRecorder;
use crate::service::{FaceComparator, ObjectStore, RecordTable};

/// Result of running one candidate image through the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineOutcome {
    /// The upload failed; no comparison was attempted.
    NotUploaded,
    /// Uploaded, but no reference matched (or matching failed).
    Unrecognized { key: String },
    /// A reference matched. `recorded` is false if the table write failed.
    Recognized {
        key: String,
        name: String,
        recorded: bool,
    },
}

impl PipelineOutcome {
    pub fn recognized_name(&self) -> Option<&str> {
        match self {
            PipelineOutcome::Recognized { name, .. } => Some(name.as_str()),
            _ => None,
        }
    }
}

pub struct AttendancePipeline<S, C, T> {
    gateway: ObjectGateway<S>,
    matcher: FaceMatcher<S, C>,
    recorder: AttendanceRecorder<T>,
    bucket: String,
    unknown_folder: String,
}

impl<S, C, T> AttendancePipeline<S, C, T>
where
    S: ObjectStore,
    C: FaceComparator,
    T: RecordTable,
{
    pub fn new(
        store: S,
        matcher: FaceMatcher<S, C>,
        recorder: AttendanceRecorder<T>,
        bucket: impl Into<String>,
        unknown_folder: impl Into<String>,
    ) -> Self {
        Self {
            gateway: ObjectGateway::new(store),
            matcher,
            recorder,
            bucket: bucket.into(),
            unknown_folder: unknown_folder.into(),
        }
    }

    /// Run a captured image through upload, match and record.
    pub async fn run(&self, image: Vec<u8>, filename: &str) -> PipelineOutcome {
        let Some(key) = self
            .gateway
            .upload(image, filename, &self.bucket, &self.unknown_folder)
            .await
        else {
            return PipelineOutcome::NotUploaded;
        };

        let Some(name) = self.matcher.find_match(&self.bucket, &key).await else {
            return PipelineOutcome::Unrecognized { key };
        };

        let recorded = self.recorder.record(&name, &self.bucket, &key).await;
        PipelineOutcome::Recognized {
            key,
            name,
            recorded,
        }
    }
}
