//! The orthogonal ("L-shaped") edge.
//!
//! Holds non-owning links to its endpoints and re-derives its whole path
//! every render. Derived fields describe the last frame only; nothing reads
//! them as persistent truth except hit testing, which asks "is the pointer
//! on the edge as it was last drawn".

use crate::route::{ArrowHead, LabelBox, MiddlePoints, route};
use joint_core::config::EdgeStyle;
use joint_core::geometry::{Vector2d, get_line_point, is_point_in_polyline};
use joint_core::input::InputEvent;
use joint_core::model::{DiagramEdge, DiagramNode, EdgeRef, NodeRef};
use joint_core::surface::Surface;
use joint_core::viewport::CoordinateSpace;
use std::cell::RefCell;
use std::rc::{Rc, Weak};

pub struct OrthogonalEdge {
    source: Weak<RefCell<dyn DiagramNode>>,
    target: Weak<RefCell<dyn DiagramNode>>,
    pub dash: bool,
    pub arrow: bool,
    pub text: String,
    pub visible: bool,
    pub active: bool,
    pub style: EdgeStyle,

    // Derived per render.
    pub source_join_point: Option<Vector2d>,
    pub target_join_point: Option<Vector2d>,
    pub middle_points: MiddlePoints,
    pub center_point: Option<Vector2d>,
    pub rotate: f64,
    pub arrow_start: Option<Vector2d>,
    label_width: Option<f64>,
}

impl OrthogonalEdge {
    pub fn new(source: &NodeRef, target: &NodeRef) -> Self {
        Self {
            source: Rc::downgrade(source),
            target: Rc::downgrade(target),
            dash: false,
            arrow: false,
            text: String::new(),
            visible: true,
            active: false,
            style: EdgeStyle::default(),
            source_join_point: None,
            target_join_point: None,
            middle_points: MiddlePoints::new(),
            center_point: None,
            rotate: 0.0,
            arrow_start: None,
            label_width: None,
        }
    }

    pub fn dashed(mut self) -> Self {
        self.dash = true;
        self
    }

    pub fn with_arrow(mut self) -> Self {
        self.arrow = true;
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn with_style(mut self, style: EdgeStyle) -> Self {
        self.style = style;
        self
    }

    pub fn into_ref(self) -> EdgeRef {
        Rc::new(RefCell::new(self))
    }

    pub fn source(&self) -> Option<NodeRef> {
        self.source.upgrade()
    }

    pub fn target(&self) -> Option<NodeRef> {
        self.target.upgrade()
    }

    /// `[source_join, ..middle_points, target_join]` from the last render.
    pub fn path(&self) -> Option<Vec<Vector2d>> {
        let (s, t) = (self.source_join_point?, self.target_join_point?);
        let mut path = Vec::with_capacity(self.middle_points.len() + 2);
        path.push(s);
        path.extend_from_slice(&self.middle_points);
        path.push(t);
        Some(path)
    }

    pub fn arrow_head(&self) -> Option<ArrowHead> {
        if !self.arrow {
            return None;
        }
        self.arrow_start.map(|tip| {
            ArrowHead::new(tip, self.rotate, self.style.arrow_length, self.style.arrow_half_width)
        })
    }

    pub fn label_box(&self) -> Option<LabelBox> {
        if self.text.is_empty() {
            return None;
        }
        let center = self.center_point?;
        let width = self.label_width?;
        Some(LabelBox::around(center, width, self.style.label_height))
    }

    fn reset_derived(&mut self) {
        self.source_join_point = None;
        self.target_join_point = None;
        self.middle_points.clear();
        self.center_point = None;
        self.arrow_start = None;
        self.label_width = None;
    }

    fn color(&self) -> &str {
        if self.active {
            &self.style.active_color
        } else {
            &self.style.color
        }
    }
}

impl DiagramEdge for OrthogonalEdge {
    fn visible(&self) -> bool {
        self.visible
    }

    fn active(&self) -> bool {
        self.active
    }

    fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    fn center_point(&self) -> Option<Vector2d> {
        self.center_point
    }

    fn hit_test(&self, event: Option<&InputEvent>, space: &CoordinateSpace) -> bool {
        let Some(event) = event else {
            return false;
        };
        let Some(path) = self.path() else {
            return false;
        };
        let point = space.view_to_pixel(event.position());

        if is_point_in_polyline(point, &path, self.style.hit_tolerance) {
            return true;
        }
        if let Some(arrow) = self.arrow_head()
            && arrow.contains(point)
        {
            return true;
        }
        if let Some(label) = self.label_box()
            && label.contains(point)
        {
            return true;
        }
        false
    }

    fn render(&mut self, surface: &mut dyn Surface) {
        self.reset_derived();
        if !self.visible {
            return;
        }
        let (Some(source), Some(target)) = (self.source(), self.target()) else {
            return;
        };

        let routed = {
            let (s, t) = (source.borrow(), target.borrow());
            if !s.visible() && !t.visible() {
                return;
            }
            route(
                s.center_point(),
                &s.bounding_join_points(),
                t.center_point(),
                &t.bounding_join_points(),
            )
        };
        let Some(routed) = routed else {
            return;
        };

        self.source_join_point = Some(routed.source_join);
        self.target_join_point = Some(routed.target_join);
        self.middle_points = routed.middle_points.clone();
        let path = routed.path();
        let color = self.color().to_string();
        log::trace!("edge path {:?}", path);

        // Line
        surface.save();
        if self.dash {
            surface.set_line_dash(&self.style.dash);
        }
        surface.begin_path();
        surface.trace_polyline(&path);
        surface.set_stroke_style(&color);
        surface.stroke();
        surface.restore();

        // Label
        if !self.text.is_empty() {
            self.center_point = get_line_point(&path, 0.5);
            if let Some(center) = self.center_point {
                surface.set_font(&self.style.label_font);
                surface.set_text_baseline_top();
                let width = surface.measure_text(&self.text);
                self.label_width = Some(width);
                let label = LabelBox::around(center, width, self.style.label_height);

                surface.begin_path();
                surface.rect(label.left, label.top, label.width, label.height);
                surface.set_fill_style(&self.style.label_background);
                surface.fill();
                surface.set_fill_style(&color);
                surface.fill_text(&self.text, label.left, label.top);
            }
        }

        // Arrow
        if self.arrow {
            self.arrow_start = Some(routed.target_join);
            self.rotate = routed.approach.x_axis_angle();
            if let Some(arrow) = self.arrow_head() {
                let [p0, p1, p2] = arrow.local_triangle();
                surface.save();
                surface.translate(arrow.tip.x, arrow.tip.y);
                surface.rotate(arrow.rotate);
                surface.begin_path();
                surface.move_to(p0);
                surface.line_to(p1);
                surface.line_to(p2);
                surface.close_path();
                surface.set_fill_style(&color);
                surface.fill();
                surface.restore();
            }
        }
    }
}
