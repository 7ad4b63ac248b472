//! Display-list surface.
//!
//! Records every surface call as a [`DrawOp`] instead of rasterizing. Used
//! for headless rendering and for asserting what a frame drew. Transforms
//! are tracked so recorded path points are in surface coordinates, the same
//! as a real canvas would rasterize them.

use joint_core::geometry::Vector2d;
use joint_core::surface::Surface;

/// Average glyph advance as a fraction of the font size.
pub(crate) const GLYPH_ADVANCE: f64 = 0.5;

#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    BeginPath,
    MoveTo(Vector2d),
    LineTo(Vector2d),
    ClosePath,
    Rect { x: f64, y: f64, width: f64, height: f64 },
    SetFillStyle(String),
    SetStrokeStyle(String),
    SetLineDash(Vec<f64>),
    Fill,
    Stroke,
    Save,
    Restore,
    SetFont(String),
    FillText { text: String, x: f64, y: f64 },
    ClearRect { x: f64, y: f64, width: f64, height: f64 },
}

#[derive(Debug, Clone, Default)]
struct State {
    translate: Vector2d,
    rotate: f64,
    dash: Vec<f64>,
    font_px: Option<f64>,
}

#[derive(Debug, Default)]
pub struct DisplayList {
    ops: Vec<DrawOp>,
    state: State,
    stack: Vec<State>,
}

impl DisplayList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    /// Drain the recorded ops, keeping graphics state.
    pub fn take_ops(&mut self) -> Vec<DrawOp> {
        std::mem::take(&mut self.ops)
    }

    pub fn current_dash(&self) -> &[f64] {
        &self.state.dash
    }

    /// Number of `ClearRect` ops recorded so far.
    pub fn clear_count(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| matches!(op, DrawOp::ClearRect { .. }))
            .count()
    }

    fn to_surface(&self, p: Vector2d) -> Vector2d {
        p.rotate(self.state.rotate).add(self.state.translate)
    }
}

/// Leading `<n>px` of a CSS font shorthand.
pub(crate) fn font_px(font: &str) -> Option<f64> {
    font.split_whitespace()
        .find_map(|part| part.strip_suffix("px"))
        .and_then(|n| n.parse().ok())
}

impl Surface for DisplayList {
    fn begin_path(&mut self) {
        self.ops.push(DrawOp::BeginPath);
    }

    fn move_to(&mut self, point: Vector2d) {
        let p = self.to_surface(point);
        self.ops.push(DrawOp::MoveTo(p));
    }

    fn line_to(&mut self, point: Vector2d) {
        let p = self.to_surface(point);
        self.ops.push(DrawOp::LineTo(p));
    }

    fn close_path(&mut self) {
        self.ops.push(DrawOp::ClosePath);
    }

    fn rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.ops.push(DrawOp::Rect {
            x,
            y,
            width,
            height,
        });
    }

    fn set_fill_style(&mut self, color: &str) {
        self.ops.push(DrawOp::SetFillStyle(color.to_string()));
    }

    fn set_stroke_style(&mut self, color: &str) {
        self.ops.push(DrawOp::SetStrokeStyle(color.to_string()));
    }

    fn set_line_dash(&mut self, segments: &[f64]) {
        self.state.dash = segments.to_vec();
        self.ops.push(DrawOp::SetLineDash(segments.to_vec()));
    }

    fn fill(&mut self) {
        self.ops.push(DrawOp::Fill);
    }

    fn stroke(&mut self) {
        self.ops.push(DrawOp::Stroke);
    }

    fn save(&mut self) {
        self.stack.push(self.state.clone());
        self.ops.push(DrawOp::Save);
    }

    fn restore(&mut self) {
        if let Some(state) = self.stack.pop() {
            self.state = state;
        }
        self.ops.push(DrawOp::Restore);
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        let offset = Vector2d::new(dx, dy).rotate(self.state.rotate);
        self.state.translate = self.state.translate.add(offset);
    }

    fn rotate(&mut self, angle: f64) {
        self.state.rotate += angle;
    }

    fn set_font(&mut self, font: &str) {
        self.state.font_px = font_px(font);
        self.ops.push(DrawOp::SetFont(font.to_string()));
    }

    fn set_text_baseline_top(&mut self) {}

    fn measure_text(&mut self, text: &str) -> f64 {
        let px = self.state.font_px.unwrap_or(10.0);
        text.chars().count() as f64 * px * GLYPH_ADVANCE
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64) {
        let p = self.to_surface(Vector2d::new(x, y));
        self.ops.push(DrawOp::FillText {
            text: text.to_string(),
            x: p.x,
            y: p.y,
        });
    }

    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.ops.push(DrawOp::ClearRect {
            x,
            y,
            width,
            height,
        });
    }
}
