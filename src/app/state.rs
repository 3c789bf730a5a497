// SPDX-License-Identifier: MPL-2.0

//! Application state types

use crate::config::Config;
use crate::reader::{ReaderEvent, ScanResult, SimulatedReader};
use crate::viewfinder::{BorderReset, ViewfinderView};
use cosmic::cosmic_config;
use cosmic::iced::Size;
use cosmic::widget::about::About;
use std::sync::Arc;

/// The context page to display in the context drawer.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum ContextPage {
    #[default]
    About,
    Settings,
}

/// Scan session status shown under the viewfinder
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ScanStatus {
    #[default]
    Waiting,
    Scanned(ScanResult),
    Stopped,
}

/// Application model holding the viewfinder and its scan source
pub struct AppModel {
    /// Application state managed by the COSMIC runtime
    pub core: cosmic::Core,
    /// Display a context drawer with the designated page if defined.
    pub context_page: ContextPage,
    /// About page information
    pub about: About,
    /// Configuration data that persists between application runs.
    pub config: Config,
    /// Config handler for saving settings
    pub config_handler: Option<cosmic_config::Config>,
    /// Scan source the viewfinder is attached to
    pub reader: Arc<SimulatedReader>,
    pub viewfinder: ViewfinderView,
    /// Bumped whenever the viewfinder is rebuilt, restarting the event subscription
    pub session: u64,
    pub status: ScanStatus,
    /// Theme dropdown labels
    pub theme_dropdown_options: Vec<String>,
}

/// Messages emitted by the application and its widgets.
#[derive(Debug, Clone)]
pub enum Message {
    // ===== UI Navigation =====
    /// Open external URL (repository, etc.)
    LaunchUrl(String),
    /// Toggle context drawer page (About, Settings)
    ToggleContextPage(ContextPage),

    // ===== Viewfinder =====
    /// Event from the scan source, marshalled onto the UI loop
    Reader(ReaderEvent),
    /// The viewfinder container was laid out at a new size
    ContainerResized(Size),
    /// The window changed size; used to derive the device orientation
    WindowResized(Size),
    Cancel,
    SwitchCamera,
    ToggleTorch,
    /// A highlight reset timer expired
    ResetBorder(BorderReset),
    /// Start a new capture session after cancel
    RestartScanning,

    // ===== Settings =====
    /// Configuration updated externally or through settings
    UpdateConfig(Config),
    SetAppTheme(usize),
    ToggleCancelButton(bool),
    ToggleSwitchCameraButton(bool),
    ToggleTorchButton(bool),
    ToggleOverlay(bool),
}
