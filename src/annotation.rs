use eframe::egui;
use serde::{Deserialize, Serialize};

/// A vertex in image space: pixels of the source image, origin top-left.
///
/// Serialized as a bare `[x, y]` pair.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f32; 2]", into = "[f32; 2]")]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// True when both axis offsets to `other` are strictly below `threshold`.
    pub fn is_near(&self, other: &Point, threshold: f32) -> bool {
        (self.x - other.x).abs() < threshold && (self.y - other.y).abs() < threshold
    }
}

impl From<[f32; 2]> for Point {
    fn from([x, y]: [f32; 2]) -> Self {
        Self { x, y }
    }
}

impl From<Point> for [f32; 2] {
    fn from(p: Point) -> Self {
        [p.x, p.y]
    }
}

impl From<Point> for egui::Pos2 {
    fn from(p: Point) -> Self {
        egui::pos2(p.x, p.y)
    }
}

/// A closed ring of at least three vertices. Frozen once built.
#[derive(Clone, Debug, PartialEq)]
pub struct Polygon {
    points: Vec<Point>,
}

impl Polygon {
    /// Wraps `points` if there are at least `min` of them, handing them back otherwise.
    pub fn new(points: Vec<Point>, min: usize) -> Result<Self, Vec<Point>> {
        if points.len() >= min.max(3) {
            Ok(Self { points })
        } else {
            Err(points)
        }
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Annotation {
    pub polygon: Polygon,
    pub label: String,
}
