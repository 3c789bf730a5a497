// SPDX-License-Identifier: MPL-2.0

//! Device and video orientation mapping
//!
//! The preview connection of a scan source has a video orientation that must
//! follow the device. Not every device orientation is allowed by the host,
//! so the mapping falls back to the closest supported one.

use cosmic::iced::Size;
use serde::{Deserialize, Serialize};

/// Physical orientation of the device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DeviceOrientation {
    #[default]
    Unknown,
    Portrait,
    PortraitUpsideDown,
    /// Device rotated with its top edge to the left
    LandscapeLeft,
    /// Device rotated with its top edge to the right
    LandscapeRight,
    FaceUp,
    FaceDown,
}

impl DeviceOrientation {
    /// Orientation implied by a window size
    ///
    /// Desktop windows have no rotation sensor, so the aspect decides:
    /// wider than tall is treated as landscape-left.
    pub fn from_window_size(size: Size) -> Self {
        if size.width <= 0.0 || size.height <= 0.0 {
            Self::Unknown
        } else if size.width > size.height {
            Self::LandscapeLeft
        } else {
            Self::Portrait
        }
    }
}

/// Orientation of the video frames delivered by the preview connection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum VideoOrientation {
    #[default]
    Portrait,
    PortraitUpsideDown,
    LandscapeLeft,
    LandscapeRight,
}

impl VideoOrientation {
    /// Interface orientation mask entry matching this video orientation
    pub fn mask(self) -> InterfaceOrientations {
        match self {
            Self::Portrait => InterfaceOrientations::PORTRAIT,
            Self::PortraitUpsideDown => InterfaceOrientations::PORTRAIT_UPSIDE_DOWN,
            Self::LandscapeLeft => InterfaceOrientations::LANDSCAPE_LEFT,
            Self::LandscapeRight => InterfaceOrientations::LANDSCAPE_RIGHT,
        }
    }
}

/// Set of interface orientations the host application allows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InterfaceOrientations(u8);

impl InterfaceOrientations {
    pub const NONE: Self = Self(0);
    pub const PORTRAIT: Self = Self(1 << 0);
    pub const PORTRAIT_UPSIDE_DOWN: Self = Self(1 << 1);
    pub const LANDSCAPE_LEFT: Self = Self(1 << 2);
    pub const LANDSCAPE_RIGHT: Self = Self(1 << 3);
    pub const LANDSCAPE: Self = Self(Self::LANDSCAPE_LEFT.0 | Self::LANDSCAPE_RIGHT.0);
    pub const ALL_BUT_UPSIDE_DOWN: Self = Self(Self::PORTRAIT.0 | Self::LANDSCAPE.0);
    pub const ALL: Self = Self(Self::ALL_BUT_UPSIDE_DOWN.0 | Self::PORTRAIT_UPSIDE_DOWN.0);

    /// True if every orientation in `other` is allowed
    pub fn contains(self, other: Self) -> bool {
        other.0 != 0 && self.0 & other.0 == other.0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl std::ops::BitOr for InterfaceOrientations {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl Default for InterfaceOrientations {
    fn default() -> Self {
        Self::ALL_BUT_UPSIDE_DOWN
    }
}

/// Video orientation to apply for a device orientation
///
/// Landscape is mirrored between the two enums: a device turned
/// landscape-left delivers landscape-right video. Device orientations with
/// no video counterpart (face up/down, unknown) keep `fallback`.
///
/// If the candidate is not allowed by `supported`, the fallback is tried,
/// then portrait, landscape-left and landscape-right in that order, and
/// upside-down as the last resort.
pub fn video_orientation(
    device: DeviceOrientation,
    supported: InterfaceOrientations,
    fallback: Option<VideoOrientation>,
) -> VideoOrientation {
    let candidate = match (device, fallback) {
        (DeviceOrientation::LandscapeLeft, _) => VideoOrientation::LandscapeRight,
        (DeviceOrientation::LandscapeRight, _) => VideoOrientation::LandscapeLeft,
        (DeviceOrientation::Portrait, _) => VideoOrientation::Portrait,
        (DeviceOrientation::PortraitUpsideDown, _) => VideoOrientation::PortraitUpsideDown,
        (_, Some(fallback)) => fallback,
        _ => VideoOrientation::Portrait,
    };

    if supported.contains(candidate.mask()) {
        return candidate;
    }

    if let Some(fallback) = fallback
        && supported.contains(fallback.mask())
    {
        return fallback;
    }

    [
        VideoOrientation::Portrait,
        VideoOrientation::LandscapeLeft,
        VideoOrientation::LandscapeRight,
    ]
    .into_iter()
    .find(|orientation| supported.contains(orientation.mask()))
    .unwrap_or(VideoOrientation::PortraitUpsideDown)
}
