// SPDX-License-Identifier: MPL-2.0

//! Error types for the viewfinder component

use std::fmt;

/// Result type alias using ViewfinderError
pub type ViewfinderResult<T> = Result<T, ViewfinderError>;

/// Main viewfinder error type
///
/// Geometry and highlight transitions are total; these variants cover input
/// validation, lifecycle misuse, and paths that are not implemented.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewfinderError {
    /// Region of interest outside the unit square
    InvalidRegion(String),
    /// Camera dimensions with a zero side
    InvalidDimensions { width: u32, height: u32 },
    /// Resolution string not in `WIDTHxHEIGHT` form
    InvalidResolution(String),
    /// `setup_components` called on an already configured container
    AlreadyConfigured,
    /// Operation requires `setup_components` first
    NotConfigured,
    /// The scan source has been dropped
    ReaderGone,
    /// Behavior with no defined implementation
    Unsupported(String),
}

impl fmt::Display for ViewfinderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewfinderError::InvalidRegion(msg) => write!(f, "Invalid region of interest: {}", msg),
            ViewfinderError::InvalidDimensions { width, height } => {
                write!(f, "Invalid camera dimensions: {}x{}", width, height)
            }
            ViewfinderError::InvalidResolution(s) => write!(f, "Invalid resolution: {}", s),
            ViewfinderError::AlreadyConfigured => write!(f, "Viewfinder is already configured"),
            ViewfinderError::NotConfigured => write!(f, "Viewfinder is not configured"),
            ViewfinderError::ReaderGone => write!(f, "Scan source is no longer available"),
            ViewfinderError::Unsupported(msg) => write!(f, "Unsupported: {}", msg),
        }
    }
}

impl std::error::Error for ViewfinderError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        assert_eq!(
            ViewfinderError::InvalidDimensions {
                width: 0,
                height: 480
            }
            .to_string(),
            "Invalid camera dimensions: 0x480"
        );
        assert_eq!(
            ViewfinderError::Unsupported("no camera dimensions".into()).to_string(),
            "Unsupported: no camera dimensions"
        );
    }
}
