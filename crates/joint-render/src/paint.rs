//! Surface → Vello drawing commands.
//!
//! Implements [`Surface`] over a `vello::Scene` so the same node and edge
//! render code paints natively through wgpu. Paths are built with `kurbo`,
//! with the current transform applied as points are added (canvas
//! semantics); fills and strokes are then emitted at identity.
//!
//! Native hosts hand one surface per layer to `DiagramCanvas::tick` and
//! present the resulting scenes.

use crate::display::{GLYPH_ADVANCE, font_px};
use joint_core::geometry::Vector2d;
use joint_core::surface::Surface;
use kurbo::{Affine, BezPath, Point, Stroke as KurboStroke};
use peniko::{Color, Fill};
use vello::Scene;

#[derive(Debug, Clone)]
struct PaintState {
    transform: Affine,
    fill: Color,
    stroke: Color,
    dash: Vec<f64>,
    font_px: f64,
}

impl Default for PaintState {
    fn default() -> Self {
        Self {
            transform: Affine::IDENTITY,
            fill: Color::from_rgb8(0, 0, 0),
            stroke: Color::from_rgb8(0, 0, 0),
            dash: Vec::new(),
            font_px: 10.0,
        }
    }
}

/// A [`Surface`] that records into a Vello scene.
///
/// Call [`into_scene`](Self::into_scene) or [`scene`](Self::scene) once per
/// frame and present it via wgpu.
pub struct VelloSurface {
    scene: Scene,
    path: BezPath,
    state: PaintState,
    stack: Vec<PaintState>,
    line_width: f64,
    draws: usize,
}

impl Default for VelloSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl VelloSurface {
    pub fn new() -> Self {
        Self {
            scene: Scene::new(),
            path: BezPath::new(),
            state: PaintState::default(),
            stack: Vec::new(),
            line_width: 1.0,
            draws: 0,
        }
    }

    /// Fills and strokes encoded since the last clear.
    pub fn draw_count(&self) -> usize {
        self.draws
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn into_scene(self) -> Scene {
        self.scene
    }

    fn point(&self, p: Vector2d) -> Point {
        self.state.transform * Point::new(p.x, p.y)
    }
}

impl Surface for VelloSurface {
    fn begin_path(&mut self) {
        self.path = BezPath::new();
    }

    fn move_to(&mut self, point: Vector2d) {
        let p = self.point(point);
        self.path.move_to(p);
    }

    fn line_to(&mut self, point: Vector2d) {
        let p = self.point(point);
        self.path.line_to(p);
    }

    fn close_path(&mut self) {
        self.path.close_path();
    }

    fn rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.move_to(Vector2d::new(x, y));
        self.line_to(Vector2d::new(x + width, y));
        self.line_to(Vector2d::new(x + width, y + height));
        self.line_to(Vector2d::new(x, y + height));
        self.close_path();
    }

    fn set_fill_style(&mut self, color: &str) {
        self.state.fill = css_color(color);
    }

    fn set_stroke_style(&mut self, color: &str) {
        self.state.stroke = css_color(color);
    }

    fn set_line_dash(&mut self, segments: &[f64]) {
        self.state.dash = segments.to_vec();
    }

    fn fill(&mut self) {
        self.scene
            .fill(Fill::NonZero, Affine::IDENTITY, self.state.fill, None, &self.path);
        self.draws += 1;
    }

    fn stroke(&mut self) {
        let mut stroke = KurboStroke::new(self.line_width);
        if !self.state.dash.is_empty() {
            stroke = stroke.with_dashes(0.0, self.state.dash.iter().copied());
        }
        self.scene
            .stroke(&stroke, Affine::IDENTITY, self.state.stroke, None, &self.path);
        self.draws += 1;
    }

    fn save(&mut self) {
        self.stack.push(self.state.clone());
    }

    fn restore(&mut self) {
        if let Some(state) = self.stack.pop() {
            self.state = state;
        }
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        self.state.transform = self.state.transform * Affine::translate((dx, dy));
    }

    fn rotate(&mut self, angle: f64) {
        self.state.transform = self.state.transform * Affine::rotate(angle);
    }

    fn set_font(&mut self, font: &str) {
        if let Some(px) = font_px(font) {
            self.state.font_px = px;
        }
    }

    fn set_text_baseline_top(&mut self) {}

    // Full text shaping requires a font context; deferred to font milestone.
    fn measure_text(&mut self, text: &str) -> f64 {
        text.chars().count() as f64 * self.state.font_px * GLYPH_ADVANCE
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64) {
        log::trace!("TEXT {:?} at ({}, {})", text, x, y);
    }

    /// Vello scenes cannot be partially erased; a clear drops the whole scene.
    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        log::trace!("CLEAR ({}, {}) {}x{}", x, y, width, height);
        self.scene.reset();
        self.draws = 0;
    }
}

// ─── Helpers ─────────────────────────────────────────────────────────────────

fn hex_val(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

/// Parse `#RGB`, `#RGBA`, `#RRGGBB`, `#RRGGBBAA`; anything else is black.
fn css_color(css: &str) -> Color {
    let [r, g, b, a] = parse_hex(css).unwrap_or([0, 0, 0, 255]);
    Color::from_rgba8(r, g, b, a)
}

fn parse_hex(css: &str) -> Option<[u8; 4]> {
    let hex = css.strip_prefix('#')?;
    let b = hex.as_bytes();
    match b.len() {
        3 | 4 => {
            let r = hex_val(b[0])? * 17;
            let g = hex_val(b[1])? * 17;
            let bl = hex_val(b[2])? * 17;
            let a = if b.len() == 4 { hex_val(b[3])? * 17 } else { 255 };
            Some([r, g, bl, a])
        }
        6 | 8 => {
            let byte = |i: usize| Some(hex_val(b[i])? << 4 | hex_val(b[i + 1])?);
            let a = if b.len() == 8 { byte(6)? } else { 255 };
            Some([byte(0)?, byte(2)?, byte(4)?, a])
        }
        _ => None,
    }
}
