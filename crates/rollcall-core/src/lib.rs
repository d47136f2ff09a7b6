//! rollcall-core: attendance pipeline over managed cloud services.
//!
//! Uploads captured candidate images, matches them against enrolled
//! reference faces one by one, and records attendance in a key-value table.
//! The cloud services sit behind the traits in [`service`].

pub mod config;
pub mod gateway;
pub mod matcher;
pub mod pipeline;
pub mod recorder;
pub mod report;
pub mod service;
pub mod types;

#[cfg(test)]
mod testing;

pub use config::Settings;
pub use gateway::ObjectGateway;
pub use matcher::FaceMatcher;
pub use pipeline::{AttendancePipeline, PipelineOutcome};
pub use recorder::AttendanceRecorder;
pub use report::{AdminError, DailyReport};
pub use service::{FaceComparator, ObjectStore, RecordTable, ServiceError};
pub use types::{AttendanceRecord, FaceMatch};
