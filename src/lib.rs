// SPDX-License-Identifier: MPL-2.0

//! Viewfinder - a code-scanning camera viewfinder for the COSMIC desktop
//!
//! The viewfinder shows a camera preview, outlines the scan region with a
//! dashed rounded rectangle that flashes green or red on scan results, and
//! offers cancel, switch-camera and torch controls. Capturing and decoding
//! are left to a [`reader::ScanSource`].
//!
//! # Architecture
//!
//! - [`viewfinder`]: Container state, layout and the iced widget
//! - [`overlay`]: Scan-region outline and highlight state
//! - [`reader`]: Scan source contract and a simulated source
//! - [`geometry`]: Aspect fill and region-of-interest math
//! - [`orientation`]: Device to video orientation mapping
//! - [`config`]: User configuration handling
//! - [`app`]: Demo application
//!
//! # Example
//!
//! ```ignore
//! let reader: Arc<dyn ScanSource> = Arc::new(SimulatedReader::default());
//! let mut view = ViewfinderView::new();
//! view.setup_components(ViewfinderBuilder::new(reader).show_torch_button(true))?;
//! ```

pub mod app;
pub mod config;
pub mod constants;
pub mod errors;
pub mod geometry;
pub mod i18n;
pub mod orientation;
pub mod overlay;
pub mod reader;
pub mod viewfinder;

// Re-export commonly used types
pub use app::{AppModel, Message};
pub use config::Config;
pub use errors::{ViewfinderError, ViewfinderResult};
pub use geometry::{CameraDimensions, NormalizedRect};
pub use overlay::{HighlightState, OverlayColors, ReaderOverlay, ViewfinderOverlay};
pub use reader::{ReaderEvent, ScanResult, ScanSource, SimulatedReader};
pub use viewfinder::{BorderReset, ResetPolicy, ViewfinderBuilder, ViewfinderView};
