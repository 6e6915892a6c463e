// Core types shared by capture, rasterization and the record builder.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone)]
pub struct FrameBuffer {
    pub width: usize,      // how wide the image is (pixels)
    pub height: usize,     // how tall the image is (pixels)
    pub pixels: Vec<u32>,  // each entry is 0x00RRGGBB for minifb
}

impl FrameBuffer {
    /// A frame of the given size filled with one color.
    pub fn filled(width: usize, height: usize, color: u32) -> Self {
        Self { width, height, pixels: vec![color; width * height] }
    }
}

/// One vertex in image pixel space. Persisted as a `[x, y]` pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<[f64; 2]> for Point {
    fn from([x, y]: [f64; 2]) -> Self {
        Self { x, y }
    }
}

impl From<Point> for [f64; 2] {
    fn from(p: Point) -> Self {
        [p.x, p.y]
    }
}

/// Ordered vertices of an implicitly closed polygon.
/// Fewer than 3 points is degenerate: kept in the data model, skipped by rasterization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Polygon(pub Vec<Point>);

impl Polygon {
    pub fn new(points: Vec<Point>) -> Self {
        Self(points)
    }

    pub fn points(&self) -> &[Point] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn is_degenerate(&self) -> bool {
        self.0.len() < 3
    }

    /// Axis-aligned bounds as (min_x, min_y, max_x, max_y); None when empty.
    pub fn bounding_box(&self) -> Option<(f64, f64, f64, f64)> {
        let first = self.0.first()?;
        Some(self.0.iter().fold(
            (first.x, first.y, first.x, first.y),
            |(x0, y0, x1, y1), p| (x0.min(p.x), y0.min(p.y), x1.max(p.x), y1.max(p.y)),
        ))
    }

    /// Vertices for drawing: first point re-appended when there is more than one,
    /// so the outline reads as closed.
    pub fn closed_loop(&self) -> Vec<Point> {
        let mut pts = self.0.clone();
        if pts.len() > 1 {
            pts.push(pts[0]);
        }
        pts
    }
}

impl From<Vec<(f64, f64)>> for Polygon {
    fn from(pts: Vec<(f64, f64)>) -> Self {
        Self(pts.into_iter().map(|(x, y)| Point::new(x, y)).collect())
    }
}

/// Binary mask, row-major, one byte per pixel: 255 = inside, 0 = outside.
/// Ready to be written as an 8-bit grayscale image as-is.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterMask {
    pub width: usize,
    pub height: usize,
    pub cells: Vec<u8>,    // length = width * height
}

impl RasterMask {
    pub const INSIDE: u8 = u8::MAX;
    pub const OUTSIDE: u8 = u8::MIN;

    /// All-outside mask.
    pub fn empty(height: usize, width: usize) -> Self {
        Self { width, height, cells: vec![Self::OUTSIDE; width * height] }
    }

    /// Pixel at column `x`, row `y`. Out-of-range reads count as outside.
    pub fn is_inside(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height && self.cells[y * self.width + x] == Self::INSIDE
    }

    pub fn count_inside(&self) -> usize {
        self.cells.iter().filter(|&&c| c == Self::INSIDE).count()
    }
}

/// What a drawn polygon stands for; each role gets its own color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Target,
    Distractor,
    InProgress,
}
