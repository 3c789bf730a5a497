// SPDX-License-Identifier: GPL-3.0-only

//! Message update handling
//!
//! The main `update()` function dispatches to focused handler methods.
//! Reader events arrive here from the event subscription, so every
//! viewfinder mutation happens on the update loop.

use crate::app::state::{AppModel, ContextPage, Message, ScanStatus};
use crate::config::{AppTheme, Config};
use crate::orientation::DeviceOrientation;
use crate::reader::{ReaderEvent, ScanSource};
use crate::viewfinder::{BorderReset, reset_after};
use cosmic::Task;
use cosmic::cosmic_config::CosmicConfigEntry;
use cosmic::iced::Size;
use tracing::{debug, error, info, warn};

impl AppModel {
    /// Main message handler - routes messages to appropriate handler methods.
    pub fn update(&mut self, message: Message) -> Task<cosmic::Action<Message>> {
        match message {
            // ===== UI Navigation =====
            Message::LaunchUrl(url) => self.handle_launch_url(url),
            Message::ToggleContextPage(page) => self.handle_toggle_context_page(page),

            // ===== Viewfinder =====
            Message::Reader(event) => self.handle_reader_event(event),
            Message::ContainerResized(size) => {
                debug!(width = size.width, height = size.height, "Viewfinder resized");
                self.viewfinder.set_bounds(size);
                Task::none()
            }
            Message::WindowResized(size) => self.handle_window_resized(size),
            Message::Cancel => {
                if let Err(err) = self.viewfinder.cancel() {
                    warn!(%err, "Cancel failed");
                }
                Task::none()
            }
            Message::SwitchCamera => {
                if let Err(err) = self.viewfinder.switch_camera() {
                    warn!(%err, "Switch camera failed");
                }
                Task::none()
            }
            Message::ToggleTorch => {
                if let Err(err) = self.viewfinder.toggle_torch() {
                    warn!(%err, "Toggle torch failed");
                }
                Task::none()
            }
            Message::ResetBorder(ticket) => {
                self.viewfinder.reset_border(ticket);
                Task::none()
            }
            Message::RestartScanning => {
                self.reader.start_scanning();
                Task::none()
            }

            // ===== Settings =====
            Message::UpdateConfig(config) => self.handle_update_config(config),
            Message::SetAppTheme(index) => self.handle_set_app_theme(index),
            Message::ToggleCancelButton(show) => self.update_config(|c| c.show_cancel_button = show),
            Message::ToggleSwitchCameraButton(show) => {
                self.update_config(|c| c.show_switch_camera_button = show)
            }
            Message::ToggleTorchButton(show) => self.update_config(|c| c.show_torch_button = show),
            Message::ToggleOverlay(show) => self.update_config(|c| c.show_overlay_view = show),
        }
    }

    /// Deliver `ticket` back to the update loop once its delay has passed
    pub(crate) fn reset_task(ticket: BorderReset) -> Task<cosmic::Action<Message>> {
        Task::perform(reset_after(ticket), |ticket| {
            cosmic::Action::App(Message::ResetBorder(ticket))
        })
    }

    fn handle_reader_event(&mut self, event: ReaderEvent) -> Task<cosmic::Action<Message>> {
        match &event {
            ReaderEvent::DidStartScanning => self.status = ScanStatus::Waiting,
            ReaderEvent::DidStopScanning => self.status = ScanStatus::Stopped,
            ReaderEvent::ScanCompleted(result) => self.status = ScanStatus::Scanned(result.clone()),
            ReaderEvent::CameraInputDimensions(_) => {}
        }

        match self.viewfinder.handle_event(event) {
            Ok(Some(ticket)) => Self::reset_task(ticket),
            Ok(None) => Task::none(),
            Err(err) => {
                error!(%err, "Failed to handle reader event");
                Task::none()
            }
        }
    }

    fn handle_window_resized(&mut self, size: Size) -> Task<cosmic::Action<Message>> {
        let orientation = DeviceOrientation::from_window_size(size);
        if orientation != self.viewfinder.device_orientation() {
            let applied = self.viewfinder.set_needs_update_orientation(orientation);
            debug!(?orientation, ?applied, "Device orientation changed");
        }
        Task::none()
    }

    pub(crate) fn handle_launch_url(&self, url: String) -> Task<cosmic::Action<Message>> {
        if let Err(err) = open::that_detached(&url) {
            error!(url = %url, error = %err, "Failed to open URL");
        }
        Task::none()
    }

    pub(crate) fn handle_toggle_context_page(
        &mut self,
        context_page: ContextPage,
    ) -> Task<cosmic::Action<Message>> {
        if self.context_page == context_page {
            self.core.window.show_context = !self.core.window.show_context;
        } else {
            self.context_page = context_page;
            self.core.window.show_context = true;
        }
        Task::none()
    }

    pub(crate) fn handle_update_config(&mut self, config: Config) -> Task<cosmic::Action<Message>> {
        if config == self.config {
            return Task::none();
        }
        info!("UpdateConfig received");

        let theme_changed = config.app_theme != self.config.app_theme;
        self.config = config;

        // The viewfinder is configured once, so settings changes rebuild it
        self.rebuild_viewfinder();

        if theme_changed {
            cosmic::command::set_theme(self.config.app_theme.theme())
        } else {
            Task::none()
        }
    }

    pub(crate) fn handle_set_app_theme(&mut self, index: usize) -> Task<cosmic::Action<Message>> {
        let app_theme = match index {
            0 => AppTheme::System,
            1 => AppTheme::Dark,
            2 => AppTheme::Light,
            _ => return Task::none(),
        };

        info!(?app_theme, "Setting application theme");
        self.config.app_theme = app_theme;
        self.save_config();

        cosmic::command::set_theme(app_theme.theme())
    }

    /// Apply a settings change, persist it and rebuild the viewfinder
    fn update_config(&mut self, change: impl FnOnce(&mut Config)) -> Task<cosmic::Action<Message>> {
        let mut config = self.config.clone();
        change(&mut config);
        if config == self.config {
            return Task::none();
        }

        self.config = config;
        self.save_config();
        self.rebuild_viewfinder();
        Task::none()
    }

    fn save_config(&self) {
        if let Some(handler) = self.config_handler.as_ref()
            && let Err(err) = self.config.write_entry(handler)
        {
            error!(?err, "Failed to save config");
        }
    }
}
