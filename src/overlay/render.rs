// SPDX-License-Identifier: MPL-2.0

//! Dashed rounded-rectangle rendering with renderer quads
//!
//! The straight edges are split into dash quads following the dash pattern.
//! Each corner is a bordered quad with the corner radius, clipped to one
//! quadrant so only a quarter arc shows.

use super::{OverlayLayer, StrokeShape};
use crate::geometry::RoundedRect;
use cosmic::Renderer;
use cosmic::iced::advanced::renderer;
use cosmic::iced::{Border, Color, Rectangle, Vector};

/// A clipped quarter arc of the stroke
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CornerArc {
    /// Region the arc quad is clipped to
    pub clip: Rectangle,
    /// Full bordered quad whose corner forms the arc
    pub quad: Rectangle,
    pub radius: f32,
}

/// Split `[start, start + length)` into painted dash intervals
fn dash_intervals(length: f32, pattern: [f32; 2], phase: f32) -> Vec<(f32, f32)> {
    let [on, off] = pattern;
    let period = on + off;
    if length <= 0.0 || on <= 0.0 || period <= 0.0 {
        return Vec::new();
    }

    let mut intervals = Vec::new();
    let mut offset = -(phase.rem_euclid(period));
    while offset < length {
        let from = offset.max(0.0);
        let to = (offset + on).min(length);
        if to > from {
            intervals.push((from, to));
        }
        offset += period;
    }
    intervals
}

/// Dash quads along the straight edges of `path`, centered on the path line
pub fn dash_segments(
    path: &RoundedRect,
    line_width: f32,
    pattern: [f32; 2],
    phase: f32,
) -> Vec<Rectangle> {
    let rect = path.rect;
    let radius = path.effective_radius();
    let half = line_width / 2.0;
    let horizontal = rect.width - 2.0 * radius;
    let vertical = rect.height - 2.0 * radius;

    let mut segments = Vec::new();

    for (from, to) in dash_intervals(horizontal, pattern, phase) {
        let x = rect.x + radius + from;
        let width = to - from;
        // top, bottom
        for y in [rect.y, rect.y + rect.height] {
            segments.push(Rectangle {
                x,
                y: y - half,
                width,
                height: line_width,
            });
        }
    }

    for (from, to) in dash_intervals(vertical, pattern, phase) {
        let y = rect.y + radius + from;
        let height = to - from;
        // left, right
        for x in [rect.x, rect.x + rect.width] {
            segments.push(Rectangle {
                x: x - half,
                y,
                width: line_width,
                height,
            });
        }
    }

    segments
}

/// Quarter arcs for the four corners; empty when the radius is zero
pub fn corner_arcs(path: &RoundedRect, line_width: f32) -> Vec<CornerArc> {
    let radius = path.effective_radius();
    if radius <= 0.0 {
        return Vec::new();
    }

    let rect = path.rect;
    let half = line_width / 2.0;
    let quad_size = 2.0 * radius + line_width;
    let clip_size = radius + half;

    // (corner x, corner y, quad grows right?, quad grows down?)
    let corners = [
        (rect.x, rect.y, true, true),
        (rect.x + rect.width, rect.y, false, true),
        (rect.x, rect.y + rect.height, true, false),
        (rect.x + rect.width, rect.y + rect.height, false, false),
    ];

    corners
        .into_iter()
        .map(|(cx, cy, right, down)| {
            let quad_x = if right { cx - half } else { cx + half - quad_size };
            let quad_y = if down { cy - half } else { cy + half - quad_size };
            let clip_x = if right { cx - half } else { cx + half - clip_size };
            let clip_y = if down { cy - half } else { cy + half - clip_size };

            CornerArc {
                clip: Rectangle {
                    x: clip_x,
                    y: clip_y,
                    width: clip_size,
                    height: clip_size,
                },
                quad: Rectangle {
                    x: quad_x,
                    y: quad_y,
                    width: quad_size,
                    height: quad_size,
                },
                radius: radius + half,
            }
        })
        .collect()
}

/// Draw the overlay stroke
///
/// `origin` is the top-left of the container in window coordinates; the
/// overlay frame is placed relative to it and everything is clipped to
/// `clip`.
pub fn draw_stroke(
    renderer: &mut Renderer,
    layer: &OverlayLayer,
    stroke: &StrokeShape,
    origin: Vector,
    clip: Rectangle,
) {
    use cosmic::iced::advanced::Renderer as _;

    if layer.hidden {
        return;
    }
    let Some(path) = stroke.path else {
        return;
    };

    let frame = layer.frame();
    let Some(clip) = clip.intersection(&(frame + origin)) else {
        return;
    };

    // Path coordinates are relative to the overlay frame
    let offset = origin + Vector::new(frame.x, frame.y);
    let color = stroke.stroke_color;

    renderer.with_layer(clip, |renderer| {
        for segment in dash_segments(&path, stroke.line_width, stroke.dash_pattern, stroke.dash_phase)
        {
            renderer.fill_quad(
                renderer::Quad {
                    bounds: segment + offset,
                    ..Default::default()
                },
                color,
            );
        }

        for arc in corner_arcs(&path, stroke.line_width) {
            renderer.with_layer(arc.clip + offset, |renderer| {
                renderer.fill_quad(
                    renderer::Quad {
                        bounds: arc.quad + offset,
                        border: Border {
                            color,
                            width: stroke.line_width,
                            radius: arc.radius.into(),
                        },
                        ..Default::default()
                    },
                    Color::TRANSPARENT,
                );
            });
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use cosmic::iced::{Point, Size};

    fn path(x: f32, y: f32, width: f32, height: f32, radius: f32) -> RoundedRect {
        RoundedRect {
            rect: Rectangle::new(Point::new(x, y), Size::new(width, height)),
            corner_radius: radius,
        }
    }

    #[test]
    fn test_dash_intervals_follow_pattern() {
        assert_eq!(
            dash_intervals(30.0, [7.0, 7.0], 0.0),
            vec![(0.0, 7.0), (14.0, 21.0), (28.0, 30.0)]
        );
        assert_eq!(
            dash_intervals(10.0, [7.0, 7.0], 3.0),
            vec![(0.0, 4.0)]
        );
        assert!(dash_intervals(0.0, [7.0, 7.0], 0.0).is_empty());
    }

    #[test]
    fn test_dash_segments_stay_on_edges() {
        let rounded = path(10.0, 20.0, 110.0, 60.0, 5.0);
        let segments = dash_segments(&rounded, 3.0, [7.0, 7.0], 0.0);
        assert!(!segments.is_empty());

        for segment in &segments {
            let on_horizontal = (segment.y + 1.5 - 20.0).abs() < 0.001
                || (segment.y + 1.5 - 80.0).abs() < 0.001;
            let on_vertical = (segment.x + 1.5 - 10.0).abs() < 0.001
                || (segment.x + 1.5 - 120.0).abs() < 0.001;
            assert!(on_horizontal || on_vertical, "{:?} is off the path", segment);

            // Nothing intrudes on the rounded corners
            if on_horizontal {
                assert!(segment.x >= 15.0 - 0.001);
                assert!(segment.x + segment.width <= 115.0 + 0.001);
            } else {
                assert!(segment.y >= 25.0 - 0.001);
                assert!(segment.y + segment.height <= 75.0 + 0.001);
            }
        }
    }

    #[test]
    fn test_degenerate_path_draws_nothing() {
        let rounded = path(0.0, 0.0, 0.0, 0.0, 5.0);
        assert!(dash_segments(&rounded, 3.0, [7.0, 7.0], 0.0).is_empty());
        assert!(corner_arcs(&rounded, 3.0).is_empty());
    }

    #[test]
    fn test_corner_arcs_clip_to_quadrants() {
        let rounded = path(0.0, 0.0, 100.0, 50.0, 5.0);
        let arcs = corner_arcs(&rounded, 2.0);
        assert_eq!(arcs.len(), 4);

        for arc in &arcs {
            assert_eq!(arc.clip.width, 6.0);
            assert_eq!(arc.quad.width, 12.0);
            assert_eq!(arc.radius, 6.0);
            // Clip region lies inside the quad
            assert!(arc.clip.x >= arc.quad.x);
            assert!(arc.clip.y >= arc.quad.y);
            assert!(arc.clip.x + arc.clip.width <= arc.quad.x + arc.quad.width + 0.001);
            assert!(arc.clip.y + arc.clip.height <= arc.quad.y + arc.quad.height + 0.001);
        }

        // Bottom-right corner hugs the outer stroke edge
        let last = arcs[3];
        assert_eq!(last.quad.x + last.quad.width, 101.0);
        assert_eq!(last.quad.y + last.quad.height, 51.0);
    }
}
