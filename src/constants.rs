// SPDX-License-Identifier: GPL-3.0-only

//! Application-wide constants

use std::time::Duration;

/// Overlay indicator drawing constants
pub mod overlay {
    /// Corner radius of the scan-region rectangle
    pub const CORNER_RADIUS: f32 = 5.0;

    /// Stroke width of the scan-region rectangle
    pub const LINE_WIDTH: f32 = 3.0;

    /// Dash pattern as (painted length, gap length)
    pub const DASH_PATTERN: [f32; 2] = [7.0, 7.0];

    /// Offset into the dash pattern where each edge starts
    pub const DASH_PHASE: f32 = 0.0;
}

/// Control layout constants
///
/// The cancel button occupies a strip along the bottom edge. The switch-camera
/// and torch buttons sit in the top corners.
pub mod ui {
    /// Height of the bottom strip reserved for the cancel button
    pub const CANCEL_STRIP_HEIGHT: f32 = 40.0;

    /// Width of the corner buttons (switch camera, torch)
    pub const CORNER_BUTTON_WIDTH: f32 = 70.0;

    /// Height of the corner buttons (switch camera, torch)
    pub const CORNER_BUTTON_HEIGHT: f32 = 50.0;

    /// Standard spacing between a control and the container edge
    pub const STANDARD_SPACING: f32 = 8.0;

    /// Icon size inside the corner buttons
    pub const CORNER_ICON_SIZE: u16 = 28;

    /// Overlay button/container background transparency (0.0 = transparent, 1.0 = opaque)
    pub const OVERLAY_BACKGROUND_ALPHA: f32 = 0.6;

    /// Minimum window size
    pub const MIN_WINDOW_WIDTH: f32 = 240.0;
    pub const MIN_WINDOW_HEIGHT: f32 = 240.0;
}

/// Delay before a valid/wrong highlight reverts to normal
pub const BORDER_RESET_DELAY: Duration = Duration::from_secs(1);

/// Simulated reader defaults
pub mod simulation {
    use std::time::Duration;

    /// Resolution reported by the simulated reader
    pub const DEFAULT_RESOLUTION: (u32, u32) = (1280, 720);

    /// Interval between simulated scan results
    pub const RESULT_INTERVAL: Duration = Duration::from_secs(3);

    /// Delay between start of scanning and the first dimension report
    pub const FORMAT_DETECT_DELAY: Duration = Duration::from_millis(200);

    /// Granularity of the cancel-flag check in the capture thread
    pub const POLL_INTERVAL: Duration = Duration::from_millis(50);
}

/// Application information utilities
pub mod app_info {
    /// Get the application version from build-time environment
    pub fn version() -> &'static str {
        env!("GIT_VERSION")
    }

    /// Check if the application is running inside a Flatpak sandbox
    pub fn is_flatpak() -> bool {
        std::path::Path::new("/.flatpak-info").exists()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_corner_buttons_fit_beside_each_other() {
        // Both corner buttons plus spacing must fit the minimum window width
        assert!(2.0 * ui::CORNER_BUTTON_WIDTH + ui::STANDARD_SPACING <= ui::MIN_WINDOW_WIDTH);
    }

    #[test]
    fn test_dash_pattern_is_positive() {
        assert!(overlay::DASH_PATTERN.iter().all(|len| *len > 0.0));
    }
}
