//! # Grid plot layout
//!
//! Geometry for the coordinate-grid panel: named points, an optional
//! reference image overlay and the mapping from grid units to pixels.
//! Nothing here draws; a front end feeds the computed layout to its canvas.

use serde::{Deserialize, Serialize};

use crate::error::{PlotError, Result};

/// A named point in grid units (origin bottom-left)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub name: String,
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// Longest name kept when editing
    pub const MAX_NAME_LEN: usize = 50;

    /// Create a point; the name is trimmed and must be non-empty, both
    /// coordinates must be finite and non-negative.
    pub fn new(name: &str, x: f64, y: f64) -> Result<Self> {
        let name = sanitize_name(name);
        if name.is_empty() {
            return Err(PlotError::InvalidPoint {
                details: "name cannot be empty".to_string(),
            }
            .into());
        }
        check_coordinate("x", x)?;
        check_coordinate("y", y)?;

        Ok(Self { name, x, y })
    }

    /// Up to three uppercase characters drawn inside the marker
    pub fn label(&self) -> String {
        let label: String = self.name.trim().chars().take(3).collect::<String>().to_uppercase();
        if label.is_empty() {
            "?".to_string()
        } else {
            label
        }
    }
}

fn sanitize_name(name: &str) -> String {
    name.trim().chars().take(Point::MAX_NAME_LEN).collect()
}

fn check_coordinate(axis: &str, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(PlotError::InvalidPoint {
            details: format!("{} must be a non-negative number, got {}", axis, value),
        }
        .into())
    }
}

/// Ordered, editable list of points
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PointList {
    points: Vec<Point>,
}

impl PointList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Append a validated point
    pub fn add(&mut self, name: &str, x: f64, y: f64) -> Result<()> {
        self.points.push(Point::new(name, x, y)?);
        Ok(())
    }

    /// Insert a copy of the point at `index` directly after it
    pub fn clone_at(&mut self, index: usize) -> Result<()> {
        let copy = self.get(index)?.clone();
        self.points.insert(index + 1, copy);
        Ok(())
    }

    pub fn remove(&mut self, index: usize) -> Result<Point> {
        self.get(index)?;
        Ok(self.points.remove(index))
    }

    /// Rename a point. The stored name is trimmed; an empty name is kept so a
    /// half-typed edit does not lose the row, and is labelled `?`.
    pub fn rename(&mut self, index: usize, name: &str) -> Result<()> {
        self.get(index)?;
        self.points[index].name = sanitize_name(name);
        Ok(())
    }

    pub fn move_to(&mut self, index: usize, x: f64, y: f64) -> Result<()> {
        self.get(index)?;
        check_coordinate("x", x)?;
        check_coordinate("y", y)?;
        let point = &mut self.points[index];
        point.x = x;
        point.y = y;
        Ok(())
    }

    fn get(&self, index: usize) -> Result<&Point> {
        self.points.get(index).ok_or_else(|| {
            PlotError::IndexOutOfRange {
                index,
                len: self.points.len(),
            }
            .into()
        })
    }

    /// Largest coordinates, zero when empty
    pub fn extent(&self) -> (f64, f64) {
        self.points
            .iter()
            .fold((0.0f64, 0.0f64), |(mx, my), p| (mx.max(p.x), my.max(p.y)))
    }
}

/// Reference image placed on the grid, bottom-left corner at the offset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Overlay {
    /// Drawn width in grid units; height follows the image aspect ratio
    pub width_units: f64,
    pub offset_x: f64,
    pub offset_y: f64,
    /// Image size in pixels
    pub natural_width: u32,
    pub natural_height: u32,
    pub opacity_percent: f64,
}

impl Overlay {
    pub const DEFAULT_OPACITY_PERCENT: f64 = 40.0;

    pub fn new(natural_width: u32, natural_height: u32) -> Self {
        Self {
            width_units: 0.0,
            offset_x: 0.0,
            offset_y: 0.0,
            natural_width,
            natural_height,
            opacity_percent: Self::DEFAULT_OPACITY_PERCENT,
        }
    }

    fn width(&self) -> f64 {
        non_negative(self.width_units)
    }

    /// Drawn height in grid units
    pub fn height_units(&self) -> f64 {
        self.width() * (self.natural_height as f64 / self.natural_width.max(1) as f64)
    }

    /// Top-right corner in grid units, `None` while the overlay has no width
    pub fn extent(&self) -> Option<(f64, f64)> {
        if self.width() <= 0.0 {
            return None;
        }
        Some((
            non_negative(self.offset_x) + self.width(),
            non_negative(self.offset_y) + self.height_units(),
        ))
    }

    /// Draw opacity in `[0, 1]`; zero or unset falls back to the default
    pub fn alpha(&self) -> f64 {
        let percent = if self.opacity_percent.is_finite() && self.opacity_percent != 0.0 {
            self.opacity_percent
        } else {
            Self::DEFAULT_OPACITY_PERCENT
        };
        (percent / 100.0).clamp(0.0, 1.0)
    }
}

fn non_negative(value: f64) -> f64 {
    if value.is_finite() {
        value.max(0.0)
    } else {
        0.0
    }
}

/// Pixel margins around the plotting area
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Margins {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
}

impl Default for Margins {
    fn default() -> Self {
        Self {
            left: 60.0,
            right: 20.0,
            top: 20.0,
            bottom: 50.0,
        }
    }
}

/// Pixel rectangle, origin top-left
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Scale and axis ranges for one canvas size
#[derive(Debug, Clone, PartialEq)]
pub struct PlotLayout {
    pub canvas_width: f64,
    pub canvas_height: f64,
    pub margins: Margins,
    /// Pixels per grid unit, equal on both axes
    pub scale: f64,
    pub range_x: u32,
    pub range_y: u32,
}

impl PlotLayout {
    /// Axes always show at least this many units
    pub const MIN_RANGE: u32 = 10;

    /// Fit every point and the overlay into the canvas with 10% headroom
    pub fn compute(
        points: &PointList,
        overlay: Option<&Overlay>,
        canvas_width: f64,
        canvas_height: f64,
    ) -> Self {
        let margins = Margins::default();
        let (mut max_x, mut max_y) = points.extent();
        if let Some((ox, oy)) = overlay.and_then(Overlay::extent) {
            max_x = max_x.max(ox);
            max_y = max_y.max(oy);
        }

        let range = |max: f64| ((max + max * 0.1).ceil() as u32).max(Self::MIN_RANGE);
        let range_x = range(max_x);
        let range_y = range(max_y);

        let w = canvas_width - margins.left - margins.right;
        let h = canvas_height - margins.top - margins.bottom;
        let scale = (w / range_x as f64).min(h / range_y as f64);

        Self {
            canvas_width,
            canvas_height,
            margins,
            scale,
            range_x,
            range_y,
        }
    }

    /// Label every n-th unit so numbers do not collide
    pub fn label_every(&self) -> u32 {
        match self.scale {
            s if s >= 28.0 => 1,
            s if s >= 14.0 => 2,
            s if s >= 7.0 => 5,
            _ => 10,
        }
    }

    /// Draw a grid line every n-th unit
    pub fn grid_every(&self) -> u32 {
        match self.scale {
            s if s >= 12.0 => 1,
            s if s >= 6.0 => 2,
            _ => 5,
        }
    }

    /// Map grid units to canvas pixels (y grows downward on screen)
    pub fn to_screen(&self, x: f64, y: f64) -> (f64, f64) {
        let bottom = self.canvas_height - self.margins.bottom;
        (self.margins.left + x * self.scale, bottom - y * self.scale)
    }

    /// Pixel rectangle the overlay image occupies, `None` while it has no width
    pub fn overlay_rect(&self, overlay: &Overlay) -> Option<Rect> {
        overlay.extent()?;

        let width = overlay.width() * self.scale;
        let height = overlay.height_units() * self.scale;
        let (x, bottom) = self.to_screen(non_negative(overlay.offset_x), non_negative(overlay.offset_y));
        Some(Rect {
            x,
            y: bottom - height,
            width,
            height,
        })
    }
}
