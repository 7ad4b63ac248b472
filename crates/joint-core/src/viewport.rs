//! View ↔ logical pixel space.
//!
//! The container reports a view size (CSS pixels). Content is laid out at a
//! fixed logical size of `view / scale` and scaled visually around the view
//! center, so zooming never re-lays-out nodes. Hit testing and all edge
//! geometry live in the logical (pixel) space.

use crate::geometry::Vector2d;
use serde::Serialize;

/// Default additive zoom-in step.
pub const ZOOM_IN_STEP: f64 = 0.1;
/// Default multiplicative zoom-out factor.
pub const ZOOM_OUT_FACTOR: f64 = 0.9;

/// Where the scaled content wrapper sits inside the container.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WrapperLayout {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
    pub scale: f64,
}

/// View size, logical canvas size, and scale.
///
/// Invariant: `canvas_width * scale == view_width` (and likewise for the
/// height) after every resize or zoom.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateSpace {
    pub view_width: f64,
    pub view_height: f64,
    pub canvas_width: f64,
    pub canvas_height: f64,
    pub scale: f64,
    zoom_in_step: f64,
    zoom_out_factor: f64,
}

impl Default for CoordinateSpace {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl CoordinateSpace {
    pub fn new(scale: f64) -> Self {
        Self::with_zoom(scale, ZOOM_IN_STEP, ZOOM_OUT_FACTOR)
    }

    pub fn with_zoom(scale: f64, zoom_in_step: f64, zoom_out_factor: f64) -> Self {
        Self {
            view_width: 0.0,
            view_height: 0.0,
            canvas_width: 0.0,
            canvas_height: 0.0,
            scale,
            zoom_in_step,
            zoom_out_factor,
        }
    }

    /// The container changed size.
    pub fn on_resize(&mut self, width: f64, height: f64) {
        self.view_width = width;
        self.view_height = height;
        self.fit_canvas();
        log::debug!(
            "resize: view {}x{} → canvas {}x{} @ {}",
            width,
            height,
            self.canvas_width,
            self.canvas_height,
            self.scale
        );
    }

    /// Grow the scale by a fixed step (additive).
    pub fn zoom_in(&mut self) {
        self.set_scale(self.scale + self.zoom_in_step);
        log::debug!("zoom in → {}", self.scale);
    }

    /// Shrink the scale by a fixed factor (multiplicative).
    ///
    /// Deliberately not the inverse of [`zoom_in`](Self::zoom_in):
    /// 1.0 → 1.1 → 0.99.
    pub fn zoom_out(&mut self) {
        self.set_scale(self.scale * self.zoom_out_factor);
        log::debug!("zoom out → {}", self.scale);
    }

    /// A scale that is not finite and positive leaves the space unchanged.
    fn set_scale(&mut self, scale: f64) {
        if !scale.is_finite() || scale <= 0.0 {
            log::warn!("ignoring zoom to scale {scale}, keeping {}", self.scale);
            return;
        }
        self.scale = scale;
        self.fit_canvas();
    }

    fn fit_canvas(&mut self) {
        self.canvas_width = self.view_width / self.scale;
        self.canvas_height = self.view_height / self.scale;
    }

    /// Offset of the logical canvas inside the view: `(view − canvas) / 2`.
    pub fn offset(&self) -> Vector2d {
        Vector2d::new(
            (self.view_width - self.canvas_width) / 2.0,
            (self.view_height - self.canvas_height) / 2.0,
        )
    }

    /// Map a view (client) coordinate into logical pixel space.
    pub fn view_to_pixel(&self, view: Vector2d) -> Vector2d {
        view.subtract(self.offset()).scale(1.0 / self.scale)
    }

    /// Inverse of [`view_to_pixel`](Self::view_to_pixel).
    pub fn pixel_to_view(&self, pixel: Vector2d) -> Vector2d {
        pixel.scale(self.scale).add(self.offset())
    }

    pub fn wrapper_layout(&self) -> WrapperLayout {
        let offset = self.offset();
        WrapperLayout {
            left: offset.x,
            top: offset.y,
            width: self.canvas_width,
            height: self.canvas_height,
            scale: self.scale,
        }
    }
}
