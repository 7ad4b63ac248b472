//! Capability contracts for client-supplied nodes and edges.
//!
//! The engine never constructs nodes or edges itself. Clients hand in
//! shared handles ([`NodeRef`], [`EdgeRef`]) and the engine reads positions,
//! join points, and visibility through the traits below. Membership and
//! identity are by reference (`Rc::ptr_eq`), never by a derived key.
//!
//! [`ShapeNode`] is the stock node: a geometry strategy ([`ShapeGeometry`])
//! composed with a paint strategy ([`NodePainter`]); either side can be
//! swapped without touching the other.

use crate::geometry::{Vector2d, is_point_in_polygon};
use crate::id::ShapeId;
use crate::input::InputEvent;
use crate::surface::Surface;
use crate::viewport::CoordinateSpace;
use smallvec::{SmallVec, smallvec};
use std::cell::RefCell;
use std::rc::Rc;

/// Candidate connector anchors on a node boundary, in enumeration order.
pub type JoinPoints = SmallVec<[Vector2d; 8]>;

/// Shared handle to a node. Identity is the allocation.
pub type NodeRef = Rc<RefCell<dyn DiagramNode>>;

/// Shared handle to an edge. Identity is the allocation.
pub type EdgeRef = Rc<RefCell<dyn DiagramEdge>>;

/// What the engine needs from a node.
pub trait DiagramNode {
    /// Optional external label, reported in event payloads.
    fn shape_id(&self) -> Option<ShapeId> {
        None
    }

    /// Logical position (pixel space).
    fn position(&self) -> Vector2d;
    fn set_position(&mut self, position: Vector2d);

    fn visible(&self) -> bool;
    fn active(&self) -> bool;
    fn set_active(&mut self, active: bool);

    fn center_point(&self) -> Vector2d;
    fn bounding_join_points(&self) -> JoinPoints;

    /// Whether the pointer event lands on this node.
    fn hit_test(&self, event: &InputEvent, space: &CoordinateSpace) -> bool;

    fn render(&mut self, surface: &mut dyn Surface);
}

/// What the engine needs from an edge.
pub trait DiagramEdge {
    fn visible(&self) -> bool;
    fn active(&self) -> bool;
    fn set_active(&mut self, active: bool);

    /// Label anchor from the last render, if any.
    fn center_point(&self) -> Option<Vector2d>;

    /// Whether the pointer event lands on the edge as last rendered.
    /// `None` (no recorded pointer event) is never a hit.
    fn hit_test(&self, event: Option<&InputEvent>, space: &CoordinateSpace) -> bool;

    fn render(&mut self, surface: &mut dyn Surface);
}

// ─── Composition: geometry × painter ─────────────────────────────────────

/// Geometry strategy for a node positioned at `origin`.
pub trait ShapeGeometry {
    /// Closed outline, used for painting and the default containment test.
    fn outline(&self, origin: Vector2d) -> SmallVec<[Vector2d; 8]>;

    fn center(&self, origin: Vector2d) -> Vector2d;

    fn join_points(&self, origin: Vector2d) -> JoinPoints;

    fn contains(&self, origin: Vector2d, point: Vector2d) -> bool {
        is_point_in_polygon(point, &self.outline(origin))
    }
}

/// Paint strategy for a node outline.
pub trait NodePainter {
    fn paint(&self, surface: &mut dyn Surface, outline: &[Vector2d], center: Vector2d, active: bool);
}

/// Axis-aligned box anchored at its top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RectGeometry {
    pub width: f64,
    pub height: f64,
}

impl RectGeometry {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

impl ShapeGeometry for RectGeometry {
    fn outline(&self, o: Vector2d) -> SmallVec<[Vector2d; 8]> {
        smallvec![
            o,
            Vector2d::new(o.x + self.width, o.y),
            Vector2d::new(o.x + self.width, o.y + self.height),
            Vector2d::new(o.x, o.y + self.height),
        ]
    }

    fn center(&self, o: Vector2d) -> Vector2d {
        Vector2d::new(o.x + self.width / 2.0, o.y + self.height / 2.0)
    }

    /// Edge midpoints: top, right, bottom, left.
    fn join_points(&self, o: Vector2d) -> JoinPoints {
        let c = self.center(o);
        smallvec![
            Vector2d::new(c.x, o.y),
            Vector2d::new(o.x + self.width, c.y),
            Vector2d::new(c.x, o.y + self.height),
            Vector2d::new(o.x, c.y),
        ]
    }

    fn contains(&self, o: Vector2d, p: Vector2d) -> bool {
        p.x >= o.x && p.x <= o.x + self.width && p.y >= o.y && p.y <= o.y + self.height
    }
}

/// Outline with an optional centred label.
#[derive(Debug, Clone)]
pub struct BoxPainter {
    pub label: Option<String>,
    pub font: String,
    pub fill: String,
    pub stroke: String,
    pub active_stroke: String,
}

impl Default for BoxPainter {
    fn default() -> Self {
        Self {
            label: None,
            font: "14px sans-serif".to_string(),
            fill: "#fff".to_string(),
            stroke: "#29c1f8".to_string(),
            active_stroke: "#e96160".to_string(),
        }
    }
}

impl BoxPainter {
    pub fn labelled(label: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
            ..Self::default()
        }
    }
}

impl NodePainter for BoxPainter {
    fn paint(&self, surface: &mut dyn Surface, outline: &[Vector2d], center: Vector2d, active: bool) {
        let color = if active { &self.active_stroke } else { &self.stroke };

        surface.begin_path();
        surface.trace_polyline(outline);
        surface.close_path();
        surface.set_fill_style(&self.fill);
        surface.fill();
        surface.set_stroke_style(color);
        surface.stroke();

        if let Some(label) = self.label.as_deref().filter(|l| !l.is_empty()) {
            surface.set_font(&self.font);
            surface.set_text_baseline_top();
            let width = surface.measure_text(label);
            surface.set_fill_style(color);
            surface.fill_text(label, center.x - width / 2.0, center.y - 7.0);
        }
    }
}

/// A node built from a geometry strategy and a paint strategy.
#[derive(Debug, Clone)]
pub struct ShapeNode<G, P> {
    pub id: Option<ShapeId>,
    pub position: Vector2d,
    pub visible: bool,
    pub active: bool,
    pub geometry: G,
    pub painter: P,
}

/// The stock rectangle node.
pub type RectNode = ShapeNode<RectGeometry, BoxPainter>;

impl<G: ShapeGeometry, P: NodePainter> ShapeNode<G, P> {
    pub fn new(position: Vector2d, geometry: G, painter: P) -> Self {
        Self {
            id: None,
            position,
            visible: true,
            active: false,
            geometry,
            painter,
        }
    }

    pub fn with_id(mut self, id: ShapeId) -> Self {
        self.id = Some(id);
        self
    }

    /// Wrap into a shared scene handle.
    pub fn into_ref(self) -> NodeRef
    where
        G: 'static,
        P: 'static,
    {
        Rc::new(RefCell::new(self))
    }
}

impl RectNode {
    pub fn rect(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::new(
            Vector2d::new(x, y),
            RectGeometry::new(width, height),
            BoxPainter::default(),
        )
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.painter.label = Some(label.into());
        self
    }
}

impl<G: ShapeGeometry, P: NodePainter> DiagramNode for ShapeNode<G, P> {
    fn shape_id(&self) -> Option<ShapeId> {
        self.id
    }

    fn position(&self) -> Vector2d {
        self.position
    }

    fn set_position(&mut self, position: Vector2d) {
        self.position = position;
    }

    fn visible(&self) -> bool {
        self.visible
    }

    fn active(&self) -> bool {
        self.active
    }

    fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    fn center_point(&self) -> Vector2d {
        self.geometry.center(self.position)
    }

    fn bounding_join_points(&self) -> JoinPoints {
        self.geometry.join_points(self.position)
    }

    fn hit_test(&self, event: &InputEvent, space: &CoordinateSpace) -> bool {
        self.visible
            && self
                .geometry
                .contains(self.position, space.view_to_pixel(event.position()))
    }

    fn render(&mut self, surface: &mut dyn Surface) {
        if !self.visible {
            return;
        }
        let outline = self.geometry.outline(self.position);
        let center = self.geometry.center(self.position);
        self.painter.paint(surface, &outline, center, self.active);
    }
}
