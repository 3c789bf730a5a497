// SPDX-License-Identifier: MPL-2.0

//! Control placement inside the viewfinder
//!
//! ```text
//! ┌─────────┬─────────────────┬─────────┐
//! │  torch  │                 │ switch  │  ← 70x50, standard spacing from the top
//! ├─────────┘                 └─────────┤
//! │                                     │
//! │             camera view             │
//! │                                     │
//! ├─────────────────────────────────────┤
//! │   │          cancel           │     │  ← 40 high, standard spacing left/right
//! └─────────────────────────────────────┘
//! ```

use crate::constants::ui::{
    CANCEL_STRIP_HEIGHT, CORNER_BUTTON_HEIGHT, CORNER_BUTTON_WIDTH, STANDARD_SPACING,
};
use cosmic::iced::{Rectangle, Size};

/// Optional controls of the viewfinder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlKind {
    Cancel,
    SwitchCamera,
    ToggleTorch,
}

impl ControlKind {
    pub const ALL: [ControlKind; 3] = [
        ControlKind::Cancel,
        ControlKind::SwitchCamera,
        ControlKind::ToggleTorch,
    ];
}

/// Which controls take part in layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ControlVisibility {
    pub cancel_button: bool,
    pub switch_camera_button: bool,
    pub torch_button: bool,
}

impl ControlVisibility {
    pub fn is_visible(&self, kind: ControlKind) -> bool {
        match kind {
            ControlKind::Cancel => self.cancel_button,
            ControlKind::SwitchCamera => self.switch_camera_button,
            ControlKind::ToggleTorch => self.torch_button,
        }
    }
}

/// Frames of the camera view and visible controls, in container coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ViewfinderLayout {
    pub camera_view: Rectangle,
    pub cancel_button: Option<Rectangle>,
    pub switch_camera_button: Option<Rectangle>,
    pub torch_button: Option<Rectangle>,
}

impl ViewfinderLayout {
    pub fn control(&self, kind: ControlKind) -> Option<Rectangle> {
        match kind {
            ControlKind::Cancel => self.cancel_button,
            ControlKind::SwitchCamera => self.switch_camera_button,
            ControlKind::ToggleTorch => self.torch_button,
        }
    }
}

/// Place the camera view and controls inside `bounds`
///
/// Hidden controls get no frame. Sizes never go negative in small
/// containers; controls may overlap instead.
pub fn compute_layout(bounds: Size, visibility: ControlVisibility) -> ViewfinderLayout {
    let camera_height = if visibility.cancel_button {
        (bounds.height - CANCEL_STRIP_HEIGHT).max(0.0)
    } else {
        bounds.height
    };

    let camera_view = Rectangle {
        x: 0.0,
        y: 0.0,
        width: bounds.width,
        height: camera_height,
    };

    let cancel_button = visibility.cancel_button.then(|| Rectangle {
        x: STANDARD_SPACING,
        y: camera_height,
        width: (bounds.width - 2.0 * STANDARD_SPACING).max(0.0),
        height: CANCEL_STRIP_HEIGHT.min(bounds.height),
    });

    let switch_camera_button = visibility.switch_camera_button.then(|| Rectangle {
        x: bounds.width - CORNER_BUTTON_WIDTH,
        y: STANDARD_SPACING,
        width: CORNER_BUTTON_WIDTH,
        height: CORNER_BUTTON_HEIGHT,
    });

    let torch_button = visibility.torch_button.then(|| Rectangle {
        x: 0.0,
        y: STANDARD_SPACING,
        width: CORNER_BUTTON_WIDTH,
        height: CORNER_BUTTON_HEIGHT,
    });

    ViewfinderLayout {
        camera_view,
        cancel_button,
        switch_camera_button,
        torch_button,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_VISIBLE: ControlVisibility = ControlVisibility {
        cancel_button: true,
        switch_camera_button: true,
        torch_button: true,
    };

    #[test]
    fn test_camera_view_fills_without_cancel() {
        let layout = compute_layout(Size::new(320.0, 480.0), ControlVisibility::default());
        assert_eq!(
            layout.camera_view,
            Rectangle {
                x: 0.0,
                y: 0.0,
                width: 320.0,
                height: 480.0
            }
        );
        assert!(layout.cancel_button.is_none());
        assert!(layout.switch_camera_button.is_none());
        assert!(layout.torch_button.is_none());
    }

    #[test]
    fn test_cancel_reserves_bottom_strip() {
        let layout = compute_layout(
            Size::new(320.0, 480.0),
            ControlVisibility {
                cancel_button: true,
                ..Default::default()
            },
        );
        assert_eq!(layout.camera_view.height, 440.0);

        let cancel = layout.cancel_button.unwrap();
        assert_eq!(cancel.y, 440.0);
        assert_eq!(cancel.height, 40.0);
        assert_eq!(cancel.x, 8.0);
        assert_eq!(cancel.width, 304.0);
    }

    #[test]
    fn test_corner_buttons() {
        let layout = compute_layout(Size::new(320.0, 480.0), ALL_VISIBLE);

        let switch = layout.switch_camera_button.unwrap();
        assert_eq!(switch.x + switch.width, 320.0);
        assert_eq!(switch.y, 8.0);
        assert_eq!((switch.width, switch.height), (70.0, 50.0));

        let torch = layout.torch_button.unwrap();
        assert_eq!(torch.x, 0.0);
        assert_eq!(torch.y, 8.0);
        assert_eq!((torch.width, torch.height), (70.0, 50.0));
    }

    #[test]
    fn test_tiny_container_never_goes_negative() {
        let layout = compute_layout(Size::new(10.0, 20.0), ALL_VISIBLE);
        assert_eq!(layout.camera_view.height, 0.0);
        let cancel = layout.cancel_button.unwrap();
        assert_eq!(cancel.width, 0.0);
        assert_eq!(cancel.height, 20.0);
    }

    #[test]
    fn test_control_lookup_matches_visibility() {
        let visibility = ControlVisibility {
            cancel_button: false,
            switch_camera_button: true,
            torch_button: false,
        };
        let layout = compute_layout(Size::new(200.0, 200.0), visibility);
        for kind in ControlKind::ALL {
            assert_eq!(layout.control(kind).is_some(), visibility.is_visible(kind));
        }
    }
}
