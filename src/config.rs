// SPDX-License-Identifier: GPL-3.0-only

use crate::constants::{BORDER_RESET_DELAY, simulation};
use crate::geometry::{CameraDimensions, NormalizedRect};
use crate::orientation::InterfaceOrientations;
use crate::overlay::OverlayColors;
use crate::reader::{ScanSource, SimulationSettings};
use crate::viewfinder::{ResetPolicy, ViewfinderBuilder};
use cosmic::cosmic_config::{self, CosmicConfigEntry, cosmic_config_derive::CosmicConfigEntry};
use cosmic::iced::Color;
use cosmic::{Theme, theme};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

/// Application theme preference
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub enum AppTheme {
    /// Follow system theme (dark or light based on system setting)
    #[default]
    System,
    /// Always use dark theme
    Dark,
    /// Always use light theme
    Light,
}

impl AppTheme {
    /// Get the COSMIC theme for this app theme preference
    pub fn theme(&self) -> Theme {
        match self {
            Self::Dark => {
                let mut theme = theme::system_dark();
                theme.theme_type.prefer_dark(Some(true));
                theme
            }
            Self::Light => {
                let mut theme = theme::system_light();
                theme.theme_type.prefer_dark(Some(false));
                theme
            }
            Self::System => theme::system_preference(),
        }
    }
}

/// 8-bit RGBA color as stored in the config file
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }
}

impl From<Rgba8> for Color {
    fn from(color: Rgba8) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, f32::from(color.a) / 255.0)
    }
}

#[derive(Debug, Clone, CosmicConfigEntry, PartialEq, Serialize, Deserialize)]
#[version = 1]
pub struct Config {
    /// Application theme preference (System, Dark, Light)
    pub app_theme: AppTheme,
    /// Outline color while waiting for a code
    pub default_color: Rgba8,
    /// Outline color after a valid code
    pub highlight_valid_color: Rgba8,
    /// Outline color after a rejected code
    pub highlight_wrong_color: Rgba8,
    pub show_cancel_button: bool,
    pub show_switch_camera_button: bool,
    pub show_torch_button: bool,
    pub show_overlay_view: bool,
    /// Scan region as fractions of the overlay; `None` outlines the whole preview
    pub rect_of_interest: Option<NormalizedRect>,
    /// How long a highlight stays before reverting, in milliseconds
    pub reset_delay_ms: u64,
    pub reset_policy: ResetPolicy,
    pub supported_orientations: InterfaceOrientations,
    /// Capture format reported by the simulated reader; `None` reports no format
    pub simulated_resolution: Option<CameraDimensions>,
    /// Interval between simulated scan results in milliseconds; 0 disables results
    pub simulated_result_interval_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        let (width, height) = simulation::DEFAULT_RESOLUTION;
        Self {
            app_theme: AppTheme::default(),
            default_color: Rgba8::opaque(255, 255, 255),
            highlight_valid_color: Rgba8::opaque(0, 255, 0),
            highlight_wrong_color: Rgba8::opaque(255, 0, 0),
            show_cancel_button: true,
            show_switch_camera_button: true,
            show_torch_button: false,
            show_overlay_view: true,
            rect_of_interest: None,
            reset_delay_ms: BORDER_RESET_DELAY.as_millis() as u64,
            reset_policy: ResetPolicy::default(),
            supported_orientations: InterfaceOrientations::default(),
            simulated_resolution: Some(CameraDimensions::new(width, height)),
            simulated_result_interval_ms: simulation::RESULT_INTERVAL.as_millis() as u64,
        }
    }
}

impl Config {
    pub fn overlay_colors(&self) -> OverlayColors {
        OverlayColors {
            default_color: self.default_color.into(),
            highlight_valid_color: self.highlight_valid_color.into(),
            highlight_wrong_color: self.highlight_wrong_color.into(),
        }
    }

    pub fn reset_delay(&self) -> Duration {
        Duration::from_millis(self.reset_delay_ms)
    }

    /// Settings for the demo's simulated reader
    pub fn simulation_settings(&self) -> SimulationSettings {
        SimulationSettings {
            dimensions: self.simulated_resolution,
            result_interval: (self.simulated_result_interval_ms > 0)
                .then(|| Duration::from_millis(self.simulated_result_interval_ms)),
            ..Default::default()
        }
    }

    /// Viewfinder configuration for `reader`
    ///
    /// An invalid stored region is dropped rather than failing setup.
    pub fn builder(&self, reader: Arc<dyn ScanSource>) -> ViewfinderBuilder {
        let mut builder = ViewfinderBuilder::new(reader)
            .show_cancel_button(self.show_cancel_button)
            .show_switch_camera_button(self.show_switch_camera_button)
            .show_torch_button(self.show_torch_button)
            .show_overlay_view(self.show_overlay_view)
            .colors(self.overlay_colors())
            .reset_delay(self.reset_delay())
            .reset_policy(self.reset_policy)
            .supported_orientations(self.supported_orientations);

        match self.rect_of_interest.map(|rect| rect.validate().map(|_| rect)) {
            Some(Ok(rect)) => builder = builder.rect_of_interest(rect),
            Some(Err(err)) => tracing::warn!(%err, "Ignoring invalid region of interest"),
            None => {}
        }

        builder
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::SimulatedReader;

    #[test]
    fn test_rgba8_to_color() {
        let color: Color = Rgba8 {
            r: 255,
            g: 0,
            b: 0,
            a: 0,
        }
        .into();
        assert_eq!(color.r, 1.0);
        assert_eq!(color.g, 0.0);
        assert_eq!(color.a, 0.0);
    }

    #[test]
    fn test_simulation_settings_interval() {
        let mut config = Config::default();
        assert_eq!(
            config.simulation_settings().result_interval,
            Some(Duration::from_secs(3))
        );

        config.simulated_result_interval_ms = 0;
        assert_eq!(config.simulation_settings().result_interval, None);
    }

    #[test]
    fn test_builder_drops_invalid_region() {
        let config = Config {
            rect_of_interest: Some(NormalizedRect {
                x: 0.8,
                y: 0.0,
                width: 0.5,
                height: 1.0,
            }),
            ..Default::default()
        };
        let builder = config.builder(Arc::new(SimulatedReader::default()));
        assert!(builder.rect_of_interest.is_none());
    }

    #[test]
    fn test_builder_carries_flags() {
        let config = Config {
            show_torch_button: true,
            show_cancel_button: false,
            reset_delay_ms: 250,
            reset_policy: ResetPolicy::Independent,
            ..Default::default()
        };
        let builder = config.builder(Arc::new(SimulatedReader::default()));
        assert!(builder.reader.is_some());
        assert!(builder.show_torch_button);
        assert!(!builder.show_cancel_button);
        assert_eq!(builder.reset_delay, Duration::from_millis(250));
        assert_eq!(builder.reset_policy, ResetPolicy::Independent);
    }
}
