pub mod config;
pub mod error;
pub mod event;
pub mod geometry;
pub mod id;
pub mod input;
pub mod model;
pub mod scene;
pub mod surface;
pub mod viewport;

pub use config::{CanvasConfig, EdgeStyle};
pub use error::CanvasError;
pub use event::{BusEvent, EventBus, PointerPayload, SubscriptionId, Topic};
pub use geometry::Vector2d;
pub use id::ShapeId;
pub use input::InputEvent;
pub use model::*;
pub use scene::SceneGraph;
pub use surface::Surface;
pub use viewport::{CoordinateSpace, WrapperLayout};
