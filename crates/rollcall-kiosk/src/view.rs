use crate::controller::{CaptureOutcome, KioskState, KioskView};
use rollcall_core::PipelineOutcome;
use rollcall_hw::Frame;
use std::io::Write;

/// Plain terminal rendering of the kiosk on stdout.
///
/// Live frames are summarized on a single status line that is rewritten in
/// place.
pub struct TerminalView<W: Write> {
    out: W,
    live_line: bool,
}

impl TerminalView<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write> TerminalView<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            live_line: false,
        }
    }

    pub fn instructions(&mut self) {
        self.line(
            "Commands:\n  start    activate the webcam\n  capture  take a snapshot and mark attendance\n  reset    clear the current result\n  quit     exit",
        );
    }

    fn line(&mut self, text: &str) {
        if self.live_line {
            let _ = writeln!(self.out);
            self.live_line = false;
        }
        let _ = writeln!(self.out, "{text}");
        let _ = self.out.flush();
    }
}

impl<W: Write> KioskView for TerminalView<W> {
    fn show_frame(&mut self, frame: &Frame) {
        let hint = if frame.is_dark() { "  (too dark)" } else { "" };
        let _ = write!(
            self.out,
            "\r[live] frame {:>6}  {}x{}  brightness {:>5.1}{hint}   ",
            frame.sequence,
            frame.width,
            frame.height,
            frame.avg_brightness()
        );
        let _ = self.out.flush();
        self.live_line = true;
    }

    fn warn(&mut self, message: &str) {
        self.line(&format!("WARNING: {message}"));
    }

    fn show_state(&mut self, state: &KioskState) {
        let text = describe(state);
        self.line(&text);
    }
}

/// Operator-facing description of a state.
pub fn describe(state: &KioskState) -> String {
    match state {
        KioskState::Idle => "Camera not started.".to_string(),
        KioskState::Streaming => "Camera live. Type 'capture' to take a snapshot.".to_string(),
        KioskState::Captured(CaptureOutcome::SaveFailed(e)) => {
            format!("Could not save the captured image: {e}")
        }
        KioskState::Captured(CaptureOutcome::Processed { image_path, result }) => {
            let saved = format!("Captured image: {}", image_path.display());
            let verdict = match result {
                PipelineOutcome::Recognized {
                    name,
                    recorded: true,
                    ..
                } => format!("Attendance marked for {name}"),
                PipelineOutcome::Recognized {
                    name,
                    recorded: false,
                    ..
                } => format!("Recognized {name}, but the attendance record could not be written."),
                PipelineOutcome::Unrecognized { .. } => "Face not recognized.".to_string(),
                PipelineOutcome::NotUploaded => {
                    "Upload failed; face not recognized.".to_string()
                }
            };
            format!("{saved}\n{verdict}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn captured(result: PipelineOutcome) -> KioskState {
        KioskState::Captured(CaptureOutcome::Processed {
            image_path: PathBuf::from("/tmp/tmpab12.jpg"),
            result,
        })
    }

    #[test]
    fn test_describe_recognized() {
        let text = describe(&captured(PipelineOutcome::Recognized {
            key: "unknown/tmpab12.jpg".into(),
            name: "alice".into(),
            recorded: true,
        }));
        assert!(text.contains("/tmp/tmpab12.jpg"));
        assert!(text.ends_with("Attendance marked for alice"));
    }

    #[test]
    fn test_describe_unrecognized() {
        let text = describe(&captured(PipelineOutcome::Unrecognized {
            key: "unknown/tmpab12.jpg".into(),
        }));
        assert!(text.ends_with("Face not recognized."));
    }

    #[test]
    fn test_live_line_is_terminated_before_messages() {
        let mut view = TerminalView::new(Vec::new());
        let frame = Frame {
            data: vec![200u8; 2 * 2 * 3],
            width: 2,
            height: 2,
            timestamp: std::time::Instant::now(),
            sequence: 7,
        };
        view.show_frame(&frame);
        view.warn("Unable to access webcam");
        let text = String::from_utf8(view.out).unwrap();
        assert!(text.starts_with("\r[live] frame      7  2x2"));
        assert!(text.contains("   \nWARNING: Unable to access webcam\n"));
    }
}
