//! rollcall-hw: camera capture for the attendance kiosk.
//!
//! Provides V4L2-based webcam access and conversion of raw buffers to RGB
//! frames that can be encoded as JPEG for upload.

pub mod camera;
pub mod frame;

pub use camera::{Camera, CameraError, DeviceInfo, FrameSource, PixelFormat, V4lSource};
pub use frame::{Frame, FrameError};
