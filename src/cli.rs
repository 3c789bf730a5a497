// SPDX-License-Identifier: GPL-3.0-only

//! CLI commands
//!
//! `geometry` prints where the viewfinder would place the preview and the
//! scan-region outline for a capture format and container size, without
//! opening a window.

use cosmic::iced::{Point, Rectangle, Size};
use serde::Serialize;
use viewfinder::geometry::{self, CameraDimensions, NormalizedRect};
use viewfinder::overlay::{ReaderOverlay, ViewfinderOverlay};

/// Rectangle as printed by the CLI
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RectReport {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl From<Rectangle> for RectReport {
    fn from(rect: Rectangle) -> Self {
        Self {
            x: rect.x,
            y: rect.y,
            width: rect.width,
            height: rect.height,
        }
    }
}

/// Computed viewfinder geometry
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeometryReport {
    pub camera: CameraDimensions,
    pub bounds: (f32, f32),
    pub scale: f32,
    /// Aspect-filled preview, top-left anchored in the container
    pub preview: RectReport,
    /// Overlay frame, centered in the container
    pub overlay: RectReport,
    /// Outline path in container coordinates
    pub path: RectReport,
    pub corner_radius: f32,
}

/// Compute the geometry for a capture format, container size and scan region
pub fn compute_geometry(
    camera: CameraDimensions,
    bounds: Size,
    rect_of_interest: NormalizedRect,
) -> Result<GeometryReport, Box<dyn std::error::Error>> {
    rect_of_interest.validate()?;
    let scale = geometry::aspect_fill_scale(camera, bounds)?;
    let preview = geometry::aspect_fill_rect(camera, bounds)?;

    let mut overlay = ReaderOverlay::default();
    overlay.set_frame(
        preview.size(),
        Point::new(bounds.width / 2.0, bounds.height / 2.0),
    );
    overlay.set_rect_of_interest(rect_of_interest);

    let frame = overlay.layer().frame();
    let path = overlay
        .stroke()
        .path
        .ok_or("overlay produced no outline path")?;
    let path_in_container = Rectangle {
        x: frame.x + path.rect.x,
        y: frame.y + path.rect.y,
        ..path.rect
    };

    Ok(GeometryReport {
        camera,
        bounds: (bounds.width, bounds.height),
        scale,
        preview: preview.into(),
        overlay: frame.into(),
        path: path_in_container.into(),
        corner_radius: path.corner_radius,
    })
}

/// Print viewfinder geometry
pub fn print_geometry(
    camera: &str,
    bounds: &str,
    roi: Option<&str>,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let camera = geometry::parse_resolution(camera)?;
    let container = geometry::parse_resolution(bounds)?;
    let rect_of_interest = match roi {
        Some(roi) => NormalizedRect::parse(roi)?,
        None => NormalizedRect::FULL,
    };

    let report = compute_geometry(
        camera,
        Size::new(container.width as f32, container.height as f32),
        rect_of_interest,
    )?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!(
        "Camera {}x{} in {}x{} (scale {:.3})",
        camera.width, camera.height, container.width, container.height, report.scale
    );
    println!();
    print_rect("Preview", &report.preview);
    print_rect("Overlay", &report.overlay);
    print_rect("Outline", &report.path);
    println!("  {:<10} {:.1}", "Radius", report.corner_radius);

    Ok(())
}

fn print_rect(label: &str, rect: &RectReport) {
    println!(
        "  {:<10} x={:.1} y={:.1} w={:.1} h={:.1}",
        label, rect.x, rect.y, rect.width, rect.height
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 0.01
    }

    #[test]
    fn test_landscape_camera_in_square_container() {
        let report = compute_geometry(
            CameraDimensions::new(640, 480),
            Size::new(320.0, 320.0),
            NormalizedRect::FULL,
        )
        .unwrap();

        assert!(approx(report.scale, 2.0 / 3.0));
        assert!(approx(report.preview.width, 426.667));
        assert!(approx(report.preview.height, 320.0));
        assert_eq!((report.preview.x, report.preview.y), (0.0, 0.0));

        // Overlay is centered, so it overhangs both sides equally
        assert!(approx(report.overlay.x, -53.333));
        assert!(approx(report.overlay.y, 0.0));
        assert_eq!(report.path, report.overlay);
    }

    #[test]
    fn test_region_is_scaled_into_overlay() {
        let report = compute_geometry(
            CameraDimensions::new(1080, 1920),
            Size::new(400.0, 800.0),
            NormalizedRect::new(0.25, 0.25, 0.5, 0.5).unwrap(),
        )
        .unwrap();

        assert!(approx(report.preview.width, 450.0));
        assert!(approx(report.preview.height, 800.0));
        assert!(approx(report.overlay.x, -25.0));
        assert!(approx(report.path.x, -25.0 + 112.5));
        assert!(approx(report.path.y, 200.0));
        assert!(approx(report.path.width, 225.0));
        assert_eq!(report.corner_radius, 5.0);
    }

    #[test]
    fn test_invalid_inputs_are_rejected() {
        assert!(
            compute_geometry(
                CameraDimensions::new(0, 480),
                Size::new(320.0, 320.0),
                NormalizedRect::FULL,
            )
            .is_err()
        );
        assert!(print_geometry("640x480", "320x320", Some("0.5,0.5,0.6,0.1"), true).is_err());
        assert!(print_geometry("640x", "320x320", None, false).is_err());
    }
}
