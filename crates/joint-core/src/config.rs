//! Canvas tunables.
//!
//! Defaults reproduce the stock behaviour: additive zoom-in by 0.1,
//! multiplicative zoom-out by 0.9, a one-frame pointer-move throttle, and the
//! edge styling constants (0.1 hit tolerance, 14px labels, 10×8 arrows).

use crate::error::CanvasError;
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    pub initial_scale: f64,
    pub zoom_in_step: f64,
    pub zoom_out_factor: f64,
    /// Minimum interval between handled pointer-move events, in ms.
    pub move_throttle_ms: f64,
    pub edge: EdgeStyle,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            initial_scale: 1.0,
            zoom_in_step: crate::viewport::ZOOM_IN_STEP,
            zoom_out_factor: crate::viewport::ZOOM_OUT_FACTOR,
            move_throttle_ms: 16.0,
            edge: EdgeStyle::default(),
        }
    }
}

impl CanvasConfig {
    pub fn from_json(json: &str) -> Result<Self, CanvasError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), CanvasError> {
        let finite = [
            ("initial_scale", self.initial_scale),
            ("zoom_in_step", self.zoom_in_step),
            ("zoom_out_factor", self.zoom_out_factor),
            ("move_throttle_ms", self.move_throttle_ms),
            ("edge.hit_tolerance", self.edge.hit_tolerance),
            ("edge.label_height", self.edge.label_height),
        ];
        if let Some((name, _)) = finite.iter().find(|(_, v)| !v.is_finite()) {
            return Err(CanvasError::Configuration(format!("{name} must be finite")));
        }
        if self.initial_scale <= 0.0 {
            return Err(CanvasError::Configuration(format!(
                "initial_scale must be > 0, got {}",
                self.initial_scale
            )));
        }
        if self.zoom_in_step <= 0.0 {
            return Err(CanvasError::Configuration(format!(
                "zoom_in_step must be > 0, got {}",
                self.zoom_in_step
            )));
        }
        if self.zoom_out_factor <= 0.0 {
            return Err(CanvasError::Configuration(format!(
                "zoom_out_factor must be > 0, got {}",
                self.zoom_out_factor
            )));
        }
        if self.move_throttle_ms < 0.0 {
            return Err(CanvasError::Configuration(
                "move_throttle_ms must not be negative".to_string(),
            ));
        }
        Ok(())
    }
}

/// Styling and hit-test constants for routed edges.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct EdgeStyle {
    /// Max distance from the path that still counts as a hit.
    pub hit_tolerance: f64,
    pub label_font: String,
    pub label_height: f64,
    pub arrow_length: f64,
    pub arrow_half_width: f64,
    pub dash: Vec<f64>,
    pub color: String,
    pub active_color: String,
    pub label_background: String,
}

impl Default for EdgeStyle {
    fn default() -> Self {
        Self {
            hit_tolerance: 0.1,
            label_font: "14px sans-serif".to_string(),
            label_height: 14.0,
            arrow_length: 10.0,
            arrow_half_width: 4.0,
            dash: vec![4.0, 4.0],
            color: "#29c1f8".to_string(),
            active_color: "#e96160".to_string(),
            label_background: "#fff".to_string(),
        }
    }
}
