// SPDX-License-Identifier: MPL-2.0

//! Scan source abstraction
//!
//! The scan source (reader) captures frames and decodes symbols. The
//! viewfinder never owns it: it keeps a `Weak` handle, pushes preview and
//! scan-region updates into it, and listens to its lifecycle events.
//!
//! ```text
//! ┌──────────────────────┐  ReaderEvent (any thread)  ┌──────────────────┐
//! │ ScanSource           │ ─────────────────────────▶ │ UI update loop   │
//! │ (capture + decode)   │                            │ (ViewfinderView) │
//! │                      │ ◀───────────────────────── │                  │
//! └──────────────────────┘  preview frame, region,    └──────────────────┘
//!                           video orientation
//! ```

pub mod simulated;

pub use simulated::{SimulatedReader, SimulationSettings};

use crate::geometry::{CameraDimensions, NormalizedRect};
use crate::orientation::VideoOrientation;
use cosmic::iced::Rectangle;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};

/// Sender half the scan source reports lifecycle events on
///
/// Unbounded so capture threads never block on the UI.
pub type LifecycleSender = UnboundedSender<ReaderEvent>;

/// Receiver half drained by the UI update loop
pub type LifecycleReceiver = UnboundedReceiver<ReaderEvent>;

/// Result of one decode attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanResult {
    /// Decoded payload
    pub value: String,
    /// Whether the payload was accepted by the consumer's validator
    pub valid: bool,
}

/// Notifications from the scan source
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReaderEvent {
    /// Capture session started
    DidStartScanning,
    /// Capture session stopped
    DidStopScanning,
    /// Capture format changed; `None` if the source could not determine it
    CameraInputDimensions(Option<CameraDimensions>),
    /// A symbol was decoded
    ScanCompleted(ScanResult),
}

/// Orientation capabilities of the preview connection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreviewConnection {
    /// Whether the connection can rotate its video
    pub supports_video_orientation: bool,
    /// Orientation currently applied
    pub video_orientation: VideoOrientation,
}

/// Camera capture and decode collaborator
///
/// Implementations use interior mutability; every method takes `&self` so
/// the source can be shared between its capture thread and the UI.
pub trait ScanSource: Send + Sync {
    /// Start the capture session
    fn start_scanning(&self);

    /// Stop the capture session
    fn stop_scanning(&self);

    /// Whether a capture session is running
    fn is_running(&self) -> bool;

    /// Register or clear the lifecycle listener
    fn set_lifecycle_listener(&self, listener: Option<LifecycleSender>);

    /// Preview connection, if a session is configured
    fn preview_connection(&self) -> Option<PreviewConnection>;

    /// Rotate the preview connection's video
    fn set_video_orientation(&self, orientation: VideoOrientation);

    /// Restrict decoding to a region of the capture frame
    fn set_rect_of_interest(&self, rect: NormalizedRect);

    /// Frame of the preview surface inside the camera view
    fn set_preview_frame(&self, frame: Rectangle);

    /// Switch between front and back camera
    fn switch_device_input(&self);

    /// Toggle the torch
    fn toggle_torch(&self);
}
