//! Grid snapping math and grid line generation.
//!
//! Vertical grid lines are spaced along the x axis by the *vertical* spacing,
//! horizontal grid lines along the y axis by the *horizontal* spacing.

use crate::geometry::{Line, Point, Rect};

/// Grid spacings captured when a drag or resize gesture starts.
///
/// Gestures snap against this snapshot so changing the panel's grid
/// mid-gesture doesn't make the component jump.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridSnap {
    /// Spacing between horizontal grid lines (snaps y values)
    pub horizontal_spacing: f64,
    /// Spacing between vertical grid lines (snaps x values)
    pub vertical_spacing: f64,
}

impl GridSnap {
    pub fn new(horizontal_spacing: f64, vertical_spacing: f64) -> Self {
        Self {
            horizontal_spacing,
            vertical_spacing,
        }
    }

    /// Snap a point down to the grid on both axes.
    pub fn snap_point(&self, point: Point) -> Point {
        Point::new(
            snap_down(point.x, self.vertical_spacing),
            snap_down(point.y, self.horizontal_spacing),
        )
    }

    /// Amount `x` sits past the previous vertical grid line.
    pub fn x_remainder(&self, x: f64) -> f64 {
        remainder(x, self.vertical_spacing)
    }

    /// Amount `y` sits past the previous horizontal grid line.
    pub fn y_remainder(&self, y: f64) -> f64 {
        remainder(y, self.horizontal_spacing)
    }
}

/// Distance from `value` back to the grid line at or below it.
///
/// Uses `rem_euclid` so negative values snap downward too. Returns 0 for
/// non-positive spacing.
pub fn remainder(value: f64, spacing: f64) -> f64 {
    if spacing <= 0.0 {
        return 0.0;
    }
    value.rem_euclid(spacing)
}

/// Snap `value` to the grid line at or below it.
pub fn snap_down(value: f64, spacing: f64) -> f64 {
    value - remainder(value, spacing)
}

/// The first grid line strictly greater than `value`.
///
/// Falls back to `value + 1` when the spacing is non-positive.
pub fn next_grid_line(value: f64, spacing: f64) -> f64 {
    if spacing <= 0.0 {
        return value + 1.0;
    }
    snap_down(value, spacing) + spacing
}

/// The last grid line strictly less than `value`.
///
/// Falls back to `value - 1` when the spacing is non-positive.
pub fn previous_grid_line(value: f64, spacing: f64) -> f64 {
    if spacing <= 0.0 {
        return value - 1.0;
    }
    let snapped = snap_down(value, spacing);
    if snapped < value {
        snapped
    } else {
        value - spacing
    }
}

/// Grid lines covering `area`.
///
/// Lines sit on multiples of the spacing in the area's coordinate space, so
/// the grid stays anchored when the area scrolls.
///
/// # Arguments
/// * `area` - Region to cover, usually the panel's visible rect
/// * `horizontal_spacing` - Distance between horizontal lines, or `None` to skip them
/// * `vertical_spacing` - Distance between vertical lines, or `None` to skip them
///
/// # Returns
/// Vertical lines first (left to right), then horizontal lines (top to bottom).
pub fn grid_lines(
    area: Rect,
    horizontal_spacing: Option<f64>,
    vertical_spacing: Option<f64>,
) -> Vec<Line> {
    let mut lines = Vec::new();
    if area.is_empty() {
        return lines;
    }

    if let Some(spacing) = vertical_spacing.filter(|s| *s > 0.0) {
        let mut x = snap_down(area.x, spacing);
        if x < area.x {
            x += spacing;
        }
        while x < area.max_x() {
            lines.push(Line::new(Point::new(x, area.y), Point::new(x, area.max_y())));
            x += spacing;
        }
    }

    if let Some(spacing) = horizontal_spacing.filter(|s| *s > 0.0) {
        let mut y = snap_down(area.y, spacing);
        if y < area.y {
            y += spacing;
        }
        while y < area.max_y() {
            lines.push(Line::new(Point::new(area.x, y), Point::new(area.max_x(), y)));
            y += spacing;
        }
    }

    lines
}
