//! Points and segments in image pixel space.

use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul, Neg, Sub};

/// A 2D point (or vector) in pixel space, `(0, 0)` being the top-left corner.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    /// Creates a new point.
    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean length when the point is read as a vector.
    #[inline]
    pub fn norm(&self) -> f64 {
        self.x.hypot(self.y)
    }

    /// Returns true if both coordinates are finite (not NaN or infinite).
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Truncates both coordinates toward zero.
    #[inline]
    pub fn trunc(&self) -> Self {
        Self::new(self.x.trunc(), self.y.trunc())
    }

    /// Distance to another point.
    #[inline]
    pub fn distance(&self, other: Point2D) -> f64 {
        (other - *self).norm()
    }
}

impl Add for Point2D {
    type Output = Point2D;

    #[inline]
    fn add(self, rhs: Point2D) -> Point2D {
        Point2D::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point2D {
    type Output = Point2D;

    #[inline]
    fn sub(self, rhs: Point2D) -> Point2D {
        Point2D::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Point2D {
    type Output = Point2D;

    #[inline]
    fn mul(self, rhs: f64) -> Point2D {
        Point2D::new(self.x * rhs, self.y * rhs)
    }
}

impl Neg for Point2D {
    type Output = Point2D;

    #[inline]
    fn neg(self) -> Point2D {
        Point2D::new(-self.x, -self.y)
    }
}

impl From<(f64, f64)> for Point2D {
    fn from((x, y): (f64, f64)) -> Self {
        Point2D::new(x, y)
    }
}

/// An ordered pair of points marking a linear feature, e.g. a crop-row
/// marker or the long axis of a rotated box.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub p1: Point2D,
    pub p2: Point2D,
}

impl Segment {
    /// Creates a segment from its two endpoints.
    #[inline]
    pub fn new(p1: Point2D, p2: Point2D) -> Self {
        Self { p1, p2 }
    }

    /// Creates a segment from `x1, y1, x2, y2`.
    #[inline]
    pub fn from_coords(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self::new(Point2D::new(x1, y1), Point2D::new(x2, y2))
    }

    /// Direction vector `p2 - p1`.
    #[inline]
    pub fn direction(&self) -> Point2D {
        self.p2 - self.p1
    }

    #[inline]
    pub fn length(&self) -> f64 {
        self.p1.distance(self.p2)
    }

    /// Returns true if the endpoints coincide.
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.p1 == self.p2
    }

    /// Midpoint of the segment.
    #[inline]
    pub fn midpoint(&self) -> Point2D {
        (self.p1 + self.p2) * 0.5
    }

    /// Truncates both endpoints toward zero.
    #[inline]
    pub fn trunc(&self) -> Self {
        Self::new(self.p1.trunc(), self.p2.trunc())
    }
}
