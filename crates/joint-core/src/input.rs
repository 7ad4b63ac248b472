//! Input abstraction layer.
//!
//! Normalizes host mouse/pointer events into a unified `InputEvent` carrying
//! client (view) coordinates. Conversion into logical pixel space happens at
//! the consumer, through [`CoordinateSpace`](crate::viewport::CoordinateSpace).

use crate::geometry::Vector2d;

/// A normalized single-pointer event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Pointer pressed (mouse down).
    PointerDown { x: f64, y: f64 },

    /// Pointer moved while the page has focus.
    PointerMove { x: f64, y: f64 },

    /// Pointer released.
    PointerUp { x: f64, y: f64 },
}

impl InputEvent {
    pub fn from_pointer_down(x: f64, y: f64) -> Self {
        Self::PointerDown { x, y }
    }

    pub fn from_pointer_move(x: f64, y: f64) -> Self {
        Self::PointerMove { x, y }
    }

    pub fn from_pointer_up(x: f64, y: f64) -> Self {
        Self::PointerUp { x, y }
    }

    /// Client-space position of the event.
    pub fn position(&self) -> Vector2d {
        match *self {
            Self::PointerDown { x, y } | Self::PointerMove { x, y } | Self::PointerUp { x, y } => {
                Vector2d::new(x, y)
            }
        }
    }
}
