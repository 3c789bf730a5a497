// SPDX-License-Identifier: MPL-2.0

//! Integration tests for configuration module

use cosmic::iced::Color;
use std::time::Duration;
use viewfinder::{Config, NormalizedRect, ResetPolicy};

#[test]
fn test_config_default() {
    let config = Config::default();

    assert!(config.show_cancel_button, "Cancel button should be shown by default");
    assert!(config.show_switch_camera_button);
    assert!(!config.show_torch_button, "Torch button should be hidden by default");
    assert!(config.show_overlay_view);
    assert_eq!(config.rect_of_interest, None);
    assert_eq!(config.reset_delay(), Duration::from_secs(1));
    assert_eq!(config.reset_policy, ResetPolicy::ReplacePending);
}

#[test]
fn test_default_colors() {
    let colors = Config::default().overlay_colors();
    assert_eq!(colors.default_color, Color::WHITE);
    assert_eq!(colors.highlight_valid_color, Color::from_rgb(0.0, 1.0, 0.0));
    assert_eq!(colors.highlight_wrong_color, Color::from_rgb(1.0, 0.0, 0.0));
}

#[test]
fn test_config_serde_roundtrip() {
    let config = Config {
        rect_of_interest: Some(NormalizedRect::new(0.1, 0.2, 0.3, 0.4).unwrap()),
        reset_policy: ResetPolicy::Independent,
        ..Default::default()
    };

    let json = serde_json::to_string(&config).unwrap();
    let decoded: Config = serde_json::from_str(&json).unwrap();
    assert_eq!(decoded, config);
}
