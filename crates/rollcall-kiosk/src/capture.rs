use crate::controller::{CaptureHandler, CaptureOutcome};
use rollcall_core::service::{FaceComparator, ObjectStore, RecordTable};
use rollcall_core::AttendancePipeline;
use rollcall_hw::{Frame, FrameError};
use std::path::{Path, PathBuf};
use tokio::runtime::Handle;

/// Saves each captured frame as a uniquely named JPEG and runs it through
/// the attendance pipeline on the calling thread.
pub struct PipelineCapture<S, C, T> {
    pipeline: AttendancePipeline<S, C, T>,
    runtime: Handle,
    capture_dir: PathBuf,
}

impl<S, C, T> PipelineCapture<S, C, T>
where
    S: ObjectStore,
    C: FaceComparator,
    T: RecordTable,
{
    /// `runtime` must not be driving the calling thread; the pipeline is
    /// run with [`Handle::block_on`].
    pub fn new(pipeline: AttendancePipeline<S, C, T>, runtime: Handle, capture_dir: PathBuf) -> Self {
        Self {
            pipeline,
            runtime,
            capture_dir,
        }
    }
}

impl<S, C, T> CaptureHandler for PipelineCapture<S, C, T>
where
    S: ObjectStore,
    C: FaceComparator,
    T: RecordTable,
{
    fn handle_capture(&mut self, frame: &Frame) -> CaptureOutcome {
        let (image_path, jpeg) = match persist_frame(frame, &self.capture_dir) {
            Ok(saved) => saved,
            Err(e) => {
                tracing::error!(error = %e, "failed to save captured frame");
                return CaptureOutcome::SaveFailed(e.to_string());
            }
        };

        let filename = image_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        tracing::info!(path = %image_path.display(), bytes = jpeg.len(), "frame saved");

        let result = self.runtime.block_on(self.pipeline.run(jpeg, &filename));
        CaptureOutcome::Processed { image_path, result }
    }
}

/// Encode `frame` as JPEG into a new `tmp*.jpg` file under `dir`.
///
/// The file is kept after return. Returns its path and the encoded bytes.
pub fn persist_frame(frame: &Frame, dir: &Path) -> Result<(PathBuf, Vec<u8>), FrameError> {
    let jpeg = frame.encode_jpeg()?;
    let file = tempfile::Builder::new()
        .prefix("tmp")
        .suffix(".jpg")
        .tempfile_in(dir)?;
    std::fs::write(file.path(), &jpeg)?;
    let (_, path) = file.keep().map_err(|e| FrameError::Io(e.error))?;
    Ok((path, jpeg))
}
