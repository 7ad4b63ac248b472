//! The rasterizing surface nodes and edges draw into.
//!
//! Mirrors the subset of a 2D canvas context the engine needs: path
//! construction, fill/stroke with a settable style and dash pattern,
//! save/restore, translate/rotate, text with measurement, and clearing.
//! Transforms apply to coordinates at path-construction time.

use crate::geometry::Vector2d;

pub trait Surface {
    fn begin_path(&mut self);
    fn move_to(&mut self, point: Vector2d);
    fn line_to(&mut self, point: Vector2d);
    fn close_path(&mut self);
    /// Append an axis-aligned rectangle as a closed sub-path.
    fn rect(&mut self, x: f64, y: f64, width: f64, height: f64);

    fn set_fill_style(&mut self, color: &str);
    fn set_stroke_style(&mut self, color: &str);
    /// Empty slice means a solid line.
    fn set_line_dash(&mut self, segments: &[f64]);
    fn fill(&mut self);
    fn stroke(&mut self);

    fn save(&mut self);
    fn restore(&mut self);
    fn translate(&mut self, dx: f64, dy: f64);
    fn rotate(&mut self, angle: f64);

    /// CSS font shorthand, e.g. `14px sans-serif`.
    fn set_font(&mut self, font: &str);
    /// Text is drawn with its top edge at the given `y`.
    fn set_text_baseline_top(&mut self);
    /// Rendered width of `text` at the current font.
    fn measure_text(&mut self, text: &str) -> f64;
    fn fill_text(&mut self, text: &str, x: f64, y: f64);

    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64);

    /// Trace `points` as an open sub-path. Does not stroke or fill.
    fn trace_polyline(&mut self, points: &[Vector2d]) {
        let mut iter = points.iter();
        if let Some(first) = iter.next() {
            self.move_to(*first);
            for p in iter {
                self.line_to(*p);
            }
        }
    }
}
