//! Orthogonal edge routing.
//!
//! Picks the closest pair of join points between two nodes, classifies how
//! the path leaves the source and enters the target, and inserts one or two
//! via-points so every segment is axis-aligned. Also holds the arrow-head and
//! label-box geometry that rendering and hit testing share.

use joint_core::geometry::{Vector2d, is_point_in_polygon, is_point_in_triangle};
use smallvec::{SmallVec, smallvec};

/// Slack when deciding whether a unit direction lies on the x axis.
pub const AXIS_EPSILON: f64 = 1e-9;

/// Via-points between the two join points.
pub type MiddlePoints = SmallVec<[Vector2d; 2]>;

/// Closest (source, target) pair over the full cartesian product.
///
/// Iterates source-major, target-minor; a pair only replaces the current
/// best when it is strictly closer, so ties go to the first pair enumerated.
/// `None` if either side has no candidates.
pub fn select_join_points(source: &[Vector2d], target: &[Vector2d]) -> Option<(Vector2d, Vector2d)> {
    let mut best: Option<(Vector2d, Vector2d, f64)> = None;
    for &s in source {
        for &t in target {
            let distance = s.distance(t);
            let closer = match best {
                Some((_, _, min)) => distance < min,
                None => true,
            };
            if closer {
                best = Some((s, t, distance));
            }
        }
    }
    best.map(|(s, t, _)| (s, t))
}

/// Axis a departure/approach direction runs along.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Heading {
    Horizontal,
    Vertical,
}

impl Heading {
    /// Horizontal only for (near-)exact ±x unit directions; everything else,
    /// diagonals and the zero vector included, is vertical.
    pub fn classify(direction: Vector2d) -> Self {
        if direction.x.abs() > 1.0 - AXIS_EPSILON {
            Heading::Horizontal
        } else {
            Heading::Vertical
        }
    }
}

/// Via-points for an orthogonal path between two join points.
pub fn middle_points(
    source_join: Vector2d,
    target_join: Vector2d,
    departure: Heading,
    approach: Heading,
) -> MiddlePoints {
    let (s, t) = (source_join, target_join);
    match (departure, approach) {
        (Heading::Horizontal, Heading::Horizontal) => {
            let mid_x = (s.x + t.x) / 2.0;
            smallvec![Vector2d::new(mid_x, s.y), Vector2d::new(mid_x, t.y)]
        }
        (Heading::Horizontal, Heading::Vertical) => smallvec![Vector2d::new(t.x, s.y)],
        (Heading::Vertical, Heading::Horizontal) => smallvec![Vector2d::new(s.x, t.y)],
        (Heading::Vertical, Heading::Vertical) => {
            let mid_y = (s.y + t.y) / 2.0;
            smallvec![Vector2d::new(s.x, mid_y), Vector2d::new(t.x, mid_y)]
        }
    }
}

/// A routed edge path.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    pub source_join: Vector2d,
    pub target_join: Vector2d,
    pub middle_points: MiddlePoints,
    /// Unit vector from the source center out through the source join point.
    pub departure: Vector2d,
    /// Unit vector from the target join point in toward the target center.
    pub approach: Vector2d,
}

impl Route {
    /// `[source_join, ..middle_points, target_join]`.
    pub fn path(&self) -> Vec<Vector2d> {
        let mut path = Vec::with_capacity(self.middle_points.len() + 2);
        path.push(self.source_join);
        path.extend_from_slice(&self.middle_points);
        path.push(self.target_join);
        path
    }
}

/// Route between two nodes given their centers and join candidates.
pub fn route(
    source_center: Vector2d,
    source_joins: &[Vector2d],
    target_center: Vector2d,
    target_joins: &[Vector2d],
) -> Option<Route> {
    let (source_join, target_join) = select_join_points(source_joins, target_joins)?;
    let departure = source_join.subtract(source_center).normalize();
    let approach = target_center.subtract(target_join).normalize();
    let middle_points = middle_points(
        source_join,
        target_join,
        Heading::classify(departure),
        Heading::classify(approach),
    );
    Some(Route {
        source_join,
        target_join,
        middle_points,
        departure,
        approach,
    })
}

// ─── Arrow head ──────────────────────────────────────────────────────────

/// Triangle with its tip at `tip`, pointing along `rotate`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArrowHead {
    pub tip: Vector2d,
    pub rotate: f64,
    pub length: f64,
    pub half_width: f64,
}

impl ArrowHead {
    pub fn new(tip: Vector2d, rotate: f64, length: f64, half_width: f64) -> Self {
        Self {
            tip,
            rotate,
            length,
            half_width,
        }
    }

    /// Unrotated triangle in the arrow's local frame: tip at the origin.
    pub fn local_triangle(&self) -> [Vector2d; 3] {
        [
            Vector2d::ZERO,
            Vector2d::new(-self.length, self.half_width),
            Vector2d::new(-self.length, -self.half_width),
        ]
    }

    /// Whether `point` (pixel space) falls inside the arrow head.
    pub fn contains(&self, point: Vector2d) -> bool {
        let [a, b, c] = self.local_triangle().map(|p| p.rotate(self.rotate));
        is_point_in_triangle(point.subtract(self.tip), a, b, c)
    }
}

// ─── Label box ───────────────────────────────────────────────────────────

/// Opaque background rectangle behind an edge label.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelBox {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl LabelBox {
    /// Box of `width × height` centred on `center`.
    pub fn around(center: Vector2d, width: f64, height: f64) -> Self {
        Self {
            left: center.x - width / 2.0,
            top: center.y - height / 2.0,
            width,
            height,
        }
    }

    pub fn corners(&self) -> [Vector2d; 4] {
        let (l, t, w, h) = (self.left, self.top, self.width, self.height);
        [
            Vector2d::new(l, t),
            Vector2d::new(l + w, t),
            Vector2d::new(l + w, t + h),
            Vector2d::new(l, t + h),
        ]
    }

    pub fn contains(&self, point: Vector2d) -> bool {
        is_point_in_polygon(point, &self.corners())
    }
}
