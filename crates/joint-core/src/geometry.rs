//! 2D vectors and point-containment predicates.
//!
//! Everything here is pure: no state, no allocation beyond what the caller
//! passes in. Hit testing for nodes, edges, arrow heads, and labels is built
//! on these predicates.

use serde::{Deserialize, Serialize};
use std::ops::{Add, Neg, Sub};

/// A 2D value used for positions, directions, and pointer samples.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vector2d {
    pub x: f64,
    pub y: f64,
}

impl Vector2d {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn add(self, other: Self) -> Self {
        Self::new(self.x + other.x, self.y + other.y)
    }

    pub fn subtract(self, other: Self) -> Self {
        Self::new(self.x - other.x, self.y - other.y)
    }

    pub fn scale(self, factor: f64) -> Self {
        Self::new(self.x * factor, self.y * factor)
    }

    pub fn dot(self, other: Self) -> f64 {
        self.x * other.x + self.y * other.y
    }

    pub fn length(self) -> f64 {
        self.x.hypot(self.y)
    }

    /// Unit vector in the same direction. The zero vector stays zero.
    pub fn normalize(self) -> Self {
        let len = self.length();
        if len == 0.0 {
            return Self::ZERO;
        }
        Self::new(self.x / len, self.y / len)
    }

    pub fn distance(self, other: Self) -> f64 {
        self.subtract(other).length()
    }

    /// Rotate around the origin by `angle` radians (positive turns +x toward +y).
    pub fn rotate(self, angle: f64) -> Self {
        let (sin, cos) = angle.sin_cos();
        Self::new(self.x * cos - self.y * sin, self.x * sin + self.y * cos)
    }

    /// Angle between this vector and the +x axis, in `(-π, π]`.
    pub fn x_axis_angle(self) -> f64 {
        self.y.atan2(self.x)
    }
}

impl Add for Vector2d {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Vector2d::add(self, rhs)
    }
}

impl Sub for Vector2d {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        self.subtract(rhs)
    }
}

impl Neg for Vector2d {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.x, -self.y)
    }
}

impl From<(f64, f64)> for Vector2d {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

// ─── Distances ───────────────────────────────────────────────────────────

/// Shortest distance from `point` to the segment `a`–`b`.
pub fn distance_to_segment(point: Vector2d, a: Vector2d, b: Vector2d) -> f64 {
    let ab = b - a;
    let len_sq = ab.dot(ab);
    if len_sq == 0.0 {
        return point.distance(a);
    }
    let t = ((point - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    point.distance(a + ab.scale(t))
}

/// Sum of all segment lengths.
pub fn polyline_length(vertices: &[Vector2d]) -> f64 {
    vertices.windows(2).map(|w| w[0].distance(w[1])).sum()
}

// ─── Containment ─────────────────────────────────────────────────────────

/// True when `point` lies within `tolerance` of any segment of the polyline.
pub fn is_point_in_polyline(point: Vector2d, vertices: &[Vector2d], tolerance: f64) -> bool {
    vertices
        .windows(2)
        .any(|w| distance_to_segment(point, w[0], w[1]) <= tolerance)
}

/// Triangle containment by edge-sign agreement. Boundary points are inside.
pub fn is_point_in_triangle(point: Vector2d, a: Vector2d, b: Vector2d, c: Vector2d) -> bool {
    fn side(p: Vector2d, v1: Vector2d, v2: Vector2d) -> f64 {
        (p.x - v2.x) * (v1.y - v2.y) - (v1.x - v2.x) * (p.y - v2.y)
    }

    let d1 = side(point, a, b);
    let d2 = side(point, b, c);
    let d3 = side(point, c, a);

    let has_neg = d1 < 0.0 || d2 < 0.0 || d3 < 0.0;
    let has_pos = d1 > 0.0 || d2 > 0.0 || d3 > 0.0;
    !(has_neg && has_pos)
}

/// Even-odd ray cast over an ordered, simple polygon.
pub fn is_point_in_polygon(point: Vector2d, vertices: &[Vector2d]) -> bool {
    if vertices.len() < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = vertices.len() - 1;
    for i in 0..vertices.len() {
        let (vi, vj) = (vertices[i], vertices[j]);
        if (vi.y > point.y) != (vj.y > point.y) {
            let cross_x = (vj.x - vi.x) * (point.y - vi.y) / (vj.y - vi.y) + vi.x;
            if point.x < cross_x {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

// ─── Parametric lookup ───────────────────────────────────────────────────

/// Point at arc-length fraction `t` along the whole polyline.
///
/// `t` is clamped to `[0, 1]`. Returns `None` for fewer than two vertices or
/// a polyline of zero total length.
pub fn get_line_point(vertices: &[Vector2d], t: f64) -> Option<Vector2d> {
    if vertices.len() < 2 {
        return None;
    }
    let total = polyline_length(vertices);
    if total == 0.0 || !total.is_finite() {
        return None;
    }

    let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
    let mut remaining = total * t;
    for w in vertices.windows(2) {
        let seg = w[0].distance(w[1]);
        if seg == 0.0 {
            continue;
        }
        if remaining <= seg {
            return Some(w[0] + (w[1] - w[0]).scale(remaining / seg));
        }
        remaining -= seg;
    }
    vertices.last().copied()
}
