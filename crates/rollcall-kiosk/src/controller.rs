//! Capture controller: Idle → Streaming → Captured → Idle.
//!
//! The whole interaction runs on one thread. While streaming, the loop reads
//! a frame, shows it, and polls the command channel without blocking; a
//! capture runs the attendance pipeline inline before the next command is
//! looked at.

use crate::commands::Command;
use rollcall_core::PipelineOutcome;
use rollcall_hw::{Frame, FrameSource};
use std::path::PathBuf;
use std::sync::mpsc::{Receiver, TryRecvError};

/// What happened to a captured frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureOutcome {
    /// The frame could not be written to disk; nothing was uploaded.
    SaveFailed(String),
    Processed {
        image_path: PathBuf,
        result: PipelineOutcome,
    },
}

impl CaptureOutcome {
    pub fn recognized_name(&self) -> Option<&str> {
        match self {
            CaptureOutcome::Processed { result, .. } => result.recognized_name(),
            CaptureOutcome::SaveFailed(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KioskState {
    Idle,
    Streaming,
    /// Terminal until the next Reset or Start.
    Captured(CaptureOutcome),
}

/// Persists a captured frame and runs it through recognition.
pub trait CaptureHandler {
    fn handle_capture(&mut self, frame: &Frame) -> CaptureOutcome;
}

/// Where frames, warnings and state changes are shown to the operator.
pub trait KioskView {
    fn show_frame(&mut self, frame: &Frame);
    fn warn(&mut self, message: &str);
    fn show_state(&mut self, state: &KioskState);
}

pub struct Controller<S, H, V> {
    source: S,
    handler: H,
    view: V,
    state: KioskState,
}

impl<S: FrameSource, H: CaptureHandler, V: KioskView> Controller<S, H, V> {
    pub fn new(source: S, handler: H, view: V) -> Self {
        Self {
            source,
            handler,
            view,
            state: KioskState::Idle,
        }
    }

    pub fn state(&self) -> &KioskState {
        &self.state
    }

    /// Process commands until Quit or the channel closes.
    pub fn run(&mut self, commands: &Receiver<Command>) {
        self.view.show_state(&self.state);
        while let Ok(cmd) = commands.recv() {
            if !self.handle(cmd, commands) {
                break;
            }
        }
        self.source.release();
        tracing::info!("controller stopped");
    }

    /// Apply one command. Returns `false` when the kiosk should stop.
    ///
    /// `Start` does not return until the stream ends, pulling later commands
    /// from `commands` while it runs.
    pub fn handle(&mut self, cmd: Command, commands: &Receiver<Command>) -> bool {
        tracing::debug!(?cmd, state = ?self.state, "command");
        match cmd {
            Command::Quit => false,
            Command::Start => {
                self.set_state(KioskState::Idle);
                self.stream(commands)
            }
            Command::Capture => {
                tracing::debug!("capture ignored: camera not streaming");
                true
            }
            Command::Reset => {
                self.set_state(KioskState::Idle);
                true
            }
        }
    }

    fn stream(&mut self, commands: &Receiver<Command>) -> bool {
        if let Err(e) = self.source.open() {
            tracing::warn!(error = %e, "camera open failed");
            self.view.warn(&format!("Unable to access webcam: {e}"));
            return true;
        }
        self.set_state(KioskState::Streaming);

        loop {
            let frame = match self.source.read_frame() {
                Ok(f) => f,
                Err(e) => {
                    tracing::warn!(error = %e, "frame read failed");
                    self.view.warn(&format!("Unable to access webcam: {e}"));
                    self.source.release();
                    self.set_state(KioskState::Idle);
                    return true;
                }
            };
            self.view.show_frame(&frame);

            match commands.try_recv() {
                Ok(Command::Capture) => {
                    self.source.release();
                    let outcome = self.handler.handle_capture(&frame);
                    tracing::info!(name = ?outcome.recognized_name(), "capture complete");
                    self.set_state(KioskState::Captured(outcome));
                    return true;
                }
                Ok(Command::Reset) => {
                    self.source.release();
                    self.set_state(KioskState::Idle);
                    return true;
                }
                Ok(Command::Start) | Err(TryRecvError::Empty) => {}
                Ok(Command::Quit) | Err(TryRecvError::Disconnected) => {
                    self.source.release();
                    self.set_state(KioskState::Idle);
                    return false;
                }
            }
        }
    }

    fn set_state(&mut self, state: KioskState) {
        self.state = state;
        self.view.show_state(&self.state);
    }
}
