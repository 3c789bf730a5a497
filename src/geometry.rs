// SPDX-License-Identifier: MPL-2.0

//! Geometry shared by the overlay and the viewfinder container
//!
//! Regions of interest are normalized (0.0 to 1.0) relative to the overlay
//! bounds, like the detection regions produced by frame analysis. Everything
//! else is in logical view units.

use crate::errors::{ViewfinderError, ViewfinderResult};
use cosmic::iced::{Point, Rectangle, Size};
use serde::{Deserialize, Serialize};

/// A rectangle in fractions of some reference bounds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalizedRect {
    /// Left edge (0.0 = left of bounds, 1.0 = right of bounds)
    pub x: f32,
    /// Top edge (0.0 = top of bounds, 1.0 = bottom of bounds)
    pub y: f32,
    /// Width as fraction of the bounds width
    pub width: f32,
    /// Height as fraction of the bounds height
    pub height: f32,
}

impl NormalizedRect {
    /// The whole reference area
    pub const FULL: Self = Self {
        x: 0.0,
        y: 0.0,
        width: 1.0,
        height: 1.0,
    };

    /// Degenerate region at the origin
    pub const ZERO: Self = Self {
        x: 0.0,
        y: 0.0,
        width: 0.0,
        height: 0.0,
    };

    /// Create a region, rejecting anything that leaves the unit square
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> ViewfinderResult<Self> {
        let rect = Self {
            x,
            y,
            width,
            height,
        };
        rect.validate()?;
        Ok(rect)
    }

    /// Check that every component is in [0, 1] and origin plus extent stays within 1
    pub fn validate(&self) -> ViewfinderResult<()> {
        let in_unit = |v: f32| v.is_finite() && (0.0..=1.0).contains(&v);
        if !(in_unit(self.x) && in_unit(self.y) && in_unit(self.width) && in_unit(self.height)) {
            return Err(ViewfinderError::InvalidRegion(format!(
                "components must be within [0, 1], got {:?}",
                self
            )));
        }
        // Small tolerance so 0.1 + 0.9 style sums are accepted
        if self.x + self.width > 1.0 + f32::EPSILON || self.y + self.height > 1.0 + f32::EPSILON {
            return Err(ViewfinderError::InvalidRegion(format!(
                "region extends past the bounds: {:?}",
                self
            )));
        }
        Ok(())
    }

    /// Parse `x,y,width,height`
    pub fn parse(s: &str) -> ViewfinderResult<Self> {
        let parts: Vec<f32> = s
            .split(',')
            .map(|p| p.trim().parse::<f32>())
            .collect::<Result<_, _>>()
            .map_err(|e| ViewfinderError::InvalidRegion(format!("{}: {}", s, e)))?;

        match parts.as_slice() {
            [x, y, width, height] => Self::new(*x, *y, *width, *height),
            _ => Err(ViewfinderError::InvalidRegion(format!(
                "expected x,y,width,height, got {}",
                s
            ))),
        }
    }

    /// Scale into the coordinate space of `bounds`
    ///
    /// The result is relative to the bounds' own origin, not offset by it.
    pub fn scaled_to(&self, bounds: Size) -> Rectangle {
        Rectangle {
            x: bounds.width * self.x,
            y: bounds.height * self.y,
            width: bounds.width * self.width,
            height: bounds.height * self.height,
        }
    }
}

impl Default for NormalizedRect {
    fn default() -> Self {
        Self::FULL
    }
}

/// Capture format size reported by the scan source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CameraDimensions {
    pub width: u32,
    pub height: u32,
}

impl CameraDimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Rounded rectangle path for the overlay stroke
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoundedRect {
    pub rect: Rectangle,
    pub corner_radius: f32,
}

impl RoundedRect {
    /// Corner radius actually drawable for this rectangle
    ///
    /// Radii larger than half the short side are clamped, so degenerate
    /// regions still produce a valid path.
    pub fn effective_radius(&self) -> f32 {
        self.corner_radius
            .min(self.rect.width / 2.0)
            .min(self.rect.height / 2.0)
            .max(0.0)
    }
}

/// Aspect-fill scale factor for camera `dimensions` into `bounds`
///
/// The larger of the width and height ratios, so the scaled content covers
/// the bounds entirely and may overflow on one axis.
pub fn aspect_fill_scale(dimensions: CameraDimensions, bounds: Size) -> ViewfinderResult<f32> {
    if dimensions.width == 0 || dimensions.height == 0 {
        return Err(ViewfinderError::InvalidDimensions {
            width: dimensions.width,
            height: dimensions.height,
        });
    }

    let width_scale = bounds.width / dimensions.width as f32;
    let height_scale = bounds.height / dimensions.height as f32;

    Ok(width_scale.max(height_scale))
}

/// Displayed preview rectangle: camera dimensions aspect-filled into bounds, anchored at the origin
pub fn aspect_fill_rect(dimensions: CameraDimensions, bounds: Size) -> ViewfinderResult<Rectangle> {
    let scale = aspect_fill_scale(dimensions, bounds)?;

    Ok(Rectangle::new(
        Point::ORIGIN,
        Size::new(
            dimensions.width as f32 * scale,
            dimensions.height as f32 * scale,
        ),
    ))
}

/// Region of interest remapped for a new capture format
///
/// The mapping from view-space region to capture-space region is not
/// defined yet. This always returns [`NormalizedRect::ZERO`]; the scan
/// source and overlay must tolerate a degenerate region.
pub fn adjusted_rect_of_interest(
    _rect_of_interest: NormalizedRect,
    _dimensions: CameraDimensions,
    _bounds: Size,
) -> NormalizedRect {
    NormalizedRect::ZERO
}

/// Rectangle of `size` whose center sits at `position`
pub fn centered_frame(position: Point, size: Size) -> Rectangle {
    Rectangle {
        x: position.x - size.width / 2.0,
        y: position.y - size.height / 2.0,
        width: size.width,
        height: size.height,
    }
}

/// Parse resolution string in format "WIDTHxHEIGHT"
pub fn parse_resolution(resolution_str: &str) -> ViewfinderResult<CameraDimensions> {
    let invalid = || ViewfinderError::InvalidResolution(resolution_str.to_string());

    let (width, height) = resolution_str.split_once('x').ok_or_else(invalid)?;
    let width = width.trim().parse::<u32>().map_err(|_| invalid())?;
    let height = height.trim().parse::<u32>().map_err(|_| invalid())?;

    Ok(CameraDimensions::new(width, height))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 0.1
    }

    #[test]
    fn test_aspect_fill_landscape_into_square() {
        let rect = aspect_fill_rect(CameraDimensions::new(640, 480), Size::new(320.0, 320.0))
            .unwrap();

        assert_eq!(rect.x, 0.0);
        assert_eq!(rect.y, 0.0);
        assert!(approx(rect.width, 426.7), "width was {}", rect.width);
        assert!(approx(rect.height, 320.0), "height was {}", rect.height);
    }

    #[test]
    fn test_aspect_fill_portrait() {
        let scale =
            aspect_fill_scale(CameraDimensions::new(1080, 1920), Size::new(400.0, 800.0)).unwrap();
        assert!((scale - 0.4167).abs() < 0.001);

        let rect = aspect_fill_rect(CameraDimensions::new(1080, 1920), Size::new(400.0, 800.0))
            .unwrap();
        assert!(approx(rect.width, 450.0));
        assert!(approx(rect.height, 800.0));
    }

    #[test]
    fn test_aspect_fill_covers_bounds() {
        let bounds = Size::new(300.0, 700.0);
        for (w, h) in [(640, 480), (1920, 1080), (480, 640), (100, 100)] {
            let rect = aspect_fill_rect(CameraDimensions::new(w, h), bounds).unwrap();
            assert!(rect.width >= bounds.width - 0.01);
            assert!(rect.height >= bounds.height - 0.01);
        }
    }

    #[test]
    fn test_aspect_fill_rejects_zero_dimensions() {
        assert_eq!(
            aspect_fill_rect(CameraDimensions::new(0, 480), Size::new(100.0, 100.0)),
            Err(ViewfinderError::InvalidDimensions {
                width: 0,
                height: 480
            })
        );
    }

    #[test]
    fn test_normalized_rect_validation() {
        assert!(NormalizedRect::new(0.1, 0.2, 0.8, 0.6).is_ok());
        assert!(NormalizedRect::new(0.0, 0.0, 1.0, 1.0).is_ok());
        assert!(NormalizedRect::new(0.5, 0.0, 0.6, 0.5).is_err());
        assert!(NormalizedRect::new(-0.1, 0.0, 0.5, 0.5).is_err());
        assert!(NormalizedRect::new(0.0, 0.0, f32::NAN, 0.5).is_err());
    }

    #[test]
    fn test_normalized_rect_parse() {
        let rect = NormalizedRect::parse("0.25, 0.25, 0.5, 0.5").unwrap();
        assert_eq!(rect, NormalizedRect::new(0.25, 0.25, 0.5, 0.5).unwrap());
        assert!(NormalizedRect::parse("0.25,0.25,0.5").is_err());
        assert!(NormalizedRect::parse("a,b,c,d").is_err());
    }

    #[test]
    fn test_scaled_to() {
        let rect = NormalizedRect::new(0.1, 0.2, 0.5, 0.25)
            .unwrap()
            .scaled_to(Size::new(200.0, 400.0));
        assert!(approx(rect.x, 20.0));
        assert!(approx(rect.y, 80.0));
        assert!(approx(rect.width, 100.0));
        assert!(approx(rect.height, 100.0));
    }

    #[test]
    fn test_adjusted_rect_is_degenerate_placeholder() {
        let adjusted = adjusted_rect_of_interest(
            NormalizedRect::FULL,
            CameraDimensions::new(640, 480),
            Size::new(320.0, 320.0),
        );
        assert_eq!(adjusted, NormalizedRect::ZERO);
    }

    #[test]
    fn test_effective_radius_clamps() {
        let path = RoundedRect {
            rect: Rectangle::new(Point::ORIGIN, Size::new(4.0, 100.0)),
            corner_radius: 5.0,
        };
        assert_eq!(path.effective_radius(), 2.0);
    }

    #[test]
    fn test_centered_frame() {
        let frame = centered_frame(Point::new(160.0, 160.0), Size::new(426.0, 320.0));
        assert_eq!(frame.x, -53.0);
        assert_eq!(frame.y, 0.0);
    }

    #[test]
    fn test_parse_resolution() {
        assert_eq!(
            parse_resolution("1920x1080"),
            Ok(CameraDimensions::new(1920, 1080))
        );
        assert!(parse_resolution("invalid").is_err());
        assert!(parse_resolution("1920").is_err());
    }
}
