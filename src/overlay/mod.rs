// SPDX-License-Identifier: MPL-2.0

//! Scan-region overlay
//!
//! The overlay sits above the camera preview and outlines the region of
//! interest with a dashed rounded rectangle. Its stroke color gives scan
//! feedback:
//!
//! - `Normal`: waiting for a code
//! - `Valid`: the last code was accepted
//! - `Wrong`: the last code was rejected
//!
//! # Coordinate System
//!
//! The region of interest is normalized (0.0 to 1.0) relative to the overlay
//! bounds. The overlay itself is positioned by its center, in container
//! coordinates, the same way the container positions it over the preview.

pub mod render;

use crate::constants::overlay::{CORNER_RADIUS, DASH_PATTERN, DASH_PHASE, LINE_WIDTH};
use crate::geometry::{NormalizedRect, RoundedRect, centered_frame};
use cosmic::iced::{Color, Point, Rectangle, Size};
use tracing::trace;

/// Visual feedback mode of the overlay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HighlightState {
    /// Waiting for a code
    #[default]
    Normal,
    /// A valid code has been scanned
    Valid,
    /// A wrong code has been scanned
    Wrong,
}

/// Stroke colors for each highlight state
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayColors {
    /// The default overlay color
    pub default_color: Color,
    /// The overlay color when a valid code has been scanned
    pub highlight_valid_color: Color,
    /// The overlay color when a wrong code has been scanned
    pub highlight_wrong_color: Color,
}

impl OverlayColors {
    pub fn color_for(&self, state: HighlightState) -> Color {
        match state {
            HighlightState::Normal => self.default_color,
            HighlightState::Valid => self.highlight_valid_color,
            HighlightState::Wrong => self.highlight_wrong_color,
        }
    }
}

impl Default for OverlayColors {
    fn default() -> Self {
        Self {
            default_color: Color::WHITE,
            highlight_valid_color: Color::from_rgb(0.0, 1.0, 0.0),
            highlight_wrong_color: Color::from_rgb(1.0, 0.0, 0.0),
        }
    }
}

/// Dashed stroke drawn by the overlay
#[derive(Debug, Clone, PartialEq)]
pub struct StrokeShape {
    /// Size of the shape, matching the overlay bounds
    pub bounds: Size,
    /// Center of the shape in overlay coordinates
    pub position: Point,
    /// Path to stroke; `None` until the first draw
    pub path: Option<RoundedRect>,
    pub stroke_color: Color,
    pub line_width: f32,
    pub dash_pattern: [f32; 2],
    pub dash_phase: f32,
}

impl Default for StrokeShape {
    fn default() -> Self {
        Self {
            bounds: Size::ZERO,
            position: Point::ORIGIN,
            path: None,
            stroke_color: Color::WHITE,
            line_width: LINE_WIDTH,
            dash_pattern: DASH_PATTERN,
            dash_phase: DASH_PHASE,
        }
    }
}

/// Placement and redraw bookkeeping shared by overlay variants
#[derive(Debug, Clone, PartialEq, Default)]
pub struct OverlayLayer {
    /// Size of the overlay
    pub bounds: Size,
    /// Center of the overlay in container coordinates
    pub position: Point,
    pub hidden: bool,
    /// Set when the overlay must be repainted
    pub needs_display: bool,
    /// Number of `draw_overlay` calls so far
    pub draw_count: u64,
}

impl OverlayLayer {
    /// Frame of the overlay in container coordinates
    pub fn frame(&self) -> Rectangle {
        centered_frame(self.position, self.bounds)
    }
}

/// Overlay drawn over the camera preview
///
/// Any outline shape (rectangle, circle, corner brackets) can implement
/// this; the viewfinder only needs state changes and redraws.
pub trait ViewfinderOverlay: Send {
    /// Set the highlight state
    fn set_state(&mut self, state: HighlightState);

    /// Recompute the stroke path from the current bounds
    fn draw_overlay(&mut self);

    fn state(&self) -> HighlightState;

    fn layer(&self) -> &OverlayLayer;

    fn layer_mut(&mut self) -> &mut OverlayLayer;

    /// Stroke to render
    fn stroke(&self) -> &StrokeShape;

    /// Update the outlined region; shapes without a region ignore it
    fn set_rect_of_interest(&mut self, _rect: NormalizedRect) {}

    fn set_hidden(&mut self, hidden: bool) {
        self.layer_mut().hidden = hidden;
    }

    fn set_needs_display(&mut self) {
        self.layer_mut().needs_display = true;
    }

    /// Resize and move the overlay; `position` is its center
    fn set_frame(&mut self, bounds: Size, position: Point) {
        let layer = self.layer_mut();
        layer.bounds = bounds;
        layer.position = position;
    }
}

/// Overlay outlining the region of interest with a dashed rounded rectangle
#[derive(Debug, Clone)]
pub struct ReaderOverlay {
    layer: OverlayLayer,
    overlay: StrokeShape,
    state: HighlightState,
    colors: OverlayColors,
    rect_of_interest: NormalizedRect,
}

impl ReaderOverlay {
    pub fn new(colors: OverlayColors) -> Self {
        let mut overlay = Self {
            layer: OverlayLayer::default(),
            overlay: StrokeShape::default(),
            state: HighlightState::Normal,
            colors,
            rect_of_interest: NormalizedRect::FULL,
        };
        overlay.set_state(HighlightState::Normal);
        overlay
    }

    pub fn colors(&self) -> &OverlayColors {
        &self.colors
    }

    /// Replace the palette, keeping the current state
    pub fn set_colors(&mut self, colors: OverlayColors) {
        self.colors = colors;
        self.set_state(self.state);
    }

    /// Current stroke color
    pub fn stroke_color(&self) -> Color {
        self.overlay.stroke_color
    }

    pub fn rect_of_interest(&self) -> NormalizedRect {
        self.rect_of_interest
    }

    pub fn draw_count(&self) -> u64 {
        self.layer.draw_count
    }
}

impl Default for ReaderOverlay {
    fn default() -> Self {
        Self::new(OverlayColors::default())
    }
}

impl ViewfinderOverlay for ReaderOverlay {
    fn set_state(&mut self, state: HighlightState) {
        self.state = state;
        self.overlay.stroke_color = self.colors.color_for(state);
        self.set_needs_display();
    }

    fn draw_overlay(&mut self) {
        let bounds = self.layer.bounds;
        self.overlay.bounds = bounds;
        self.overlay.position = Point::new(bounds.width / 2.0, bounds.height / 2.0);
        self.overlay.path = Some(RoundedRect {
            rect: self.rect_of_interest.scaled_to(bounds),
            corner_radius: CORNER_RADIUS,
        });

        self.layer.draw_count += 1;
        trace!(
            draw_count = self.layer.draw_count,
            width = bounds.width,
            height = bounds.height,
            "Overlay path recomputed"
        );
    }

    fn state(&self) -> HighlightState {
        self.state
    }

    fn layer(&self) -> &OverlayLayer {
        &self.layer
    }

    fn layer_mut(&mut self) -> &mut OverlayLayer {
        &mut self.layer
    }

    fn stroke(&self) -> &StrokeShape {
        &self.overlay
    }

    fn set_rect_of_interest(&mut self, rect: NormalizedRect) {
        self.rect_of_interest = rect;
        self.draw_overlay();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        let overlay = ReaderOverlay::default();
        assert_eq!(overlay.state(), HighlightState::Normal);
        assert_eq!(overlay.stroke_color(), Color::WHITE);
        assert_eq!(overlay.rect_of_interest(), NormalizedRect::FULL);
        assert_eq!(overlay.stroke().line_width, 3.0);
        assert_eq!(overlay.stroke().dash_pattern, [7.0, 7.0]);
        assert!(overlay.stroke().path.is_none());
    }

    #[test]
    fn test_state_maps_to_configured_color() {
        let colors = OverlayColors {
            default_color: Color::from_rgb(0.1, 0.1, 0.1),
            highlight_valid_color: Color::from_rgb(0.2, 0.8, 0.2),
            highlight_wrong_color: Color::from_rgb(0.8, 0.2, 0.2),
        };
        let mut overlay = ReaderOverlay::new(colors);

        overlay.set_state(HighlightState::Valid);
        assert_eq!(overlay.stroke_color(), colors.highlight_valid_color);

        overlay.set_state(HighlightState::Wrong);
        assert_eq!(overlay.stroke_color(), colors.highlight_wrong_color);

        overlay.set_state(HighlightState::Normal);
        assert_eq!(overlay.stroke_color(), colors.default_color);
    }

    #[test]
    fn test_set_state_requests_display() {
        let mut overlay = ReaderOverlay::default();
        overlay.layer_mut().needs_display = false;
        overlay.set_state(HighlightState::Wrong);
        assert!(overlay.layer().needs_display);
        // State changes repaint but never recompute the path
        assert_eq!(overlay.draw_count(), 0);
    }

    #[test]
    fn test_set_colors_keeps_state() {
        let mut overlay = ReaderOverlay::default();
        overlay.set_state(HighlightState::Valid);

        let mut colors = OverlayColors::default();
        colors.highlight_valid_color = Color::from_rgb(0.0, 0.0, 1.0);
        overlay.set_colors(colors);

        assert_eq!(overlay.state(), HighlightState::Valid);
        assert_eq!(overlay.stroke_color(), Color::from_rgb(0.0, 0.0, 1.0));
    }

    #[test]
    fn test_draw_overlay_scales_region_into_bounds() {
        let mut overlay = ReaderOverlay::default();
        overlay.set_frame(Size::new(400.0, 300.0), Point::new(200.0, 150.0));

        for (x, y, w, h) in [
            (0.0, 0.0, 1.0, 1.0),
            (0.1, 0.2, 0.5, 0.5),
            (0.25, 0.25, 0.5, 0.5),
            (0.9, 0.9, 0.1, 0.1),
        ] {
            overlay.set_rect_of_interest(NormalizedRect::new(x, y, w, h).unwrap());

            let path = overlay.stroke().path.unwrap();
            assert!((path.rect.x - 400.0 * x).abs() < 0.001);
            assert!((path.rect.y - 300.0 * y).abs() < 0.001);
            assert!((path.rect.width - 400.0 * w).abs() < 0.001);
            assert!((path.rect.height - 300.0 * h).abs() < 0.001);
            assert_eq!(path.corner_radius, 5.0);
        }

        assert_eq!(overlay.stroke().bounds, Size::new(400.0, 300.0));
        assert_eq!(overlay.stroke().position, Point::new(200.0, 150.0));
    }

    #[test]
    fn test_region_mutation_draws_exactly_once() {
        let mut overlay = ReaderOverlay::default();
        overlay.set_frame(Size::new(100.0, 100.0), Point::new(50.0, 50.0));
        assert_eq!(overlay.draw_count(), 0);

        overlay.set_rect_of_interest(NormalizedRect::new(0.1, 0.1, 0.8, 0.8).unwrap());
        assert_eq!(overlay.draw_count(), 1);

        overlay.set_rect_of_interest(NormalizedRect::ZERO);
        assert_eq!(overlay.draw_count(), 2);
    }

    #[test]
    fn test_layer_frame_is_centered_on_position() {
        let mut overlay = ReaderOverlay::default();
        overlay.set_frame(Size::new(426.0, 320.0), Point::new(160.0, 160.0));
        let frame = overlay.layer().frame();
        assert_eq!(frame.x, -53.0);
        assert_eq!(frame.y, 0.0);
        assert_eq!(frame.width, 426.0);
    }
}
