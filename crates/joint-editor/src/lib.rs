pub mod canvas;
pub mod frame;
pub mod interaction;
pub mod throttle;

pub use canvas::{ContentRect, DiagramCanvas};
pub use frame::{FrameHandle, FrameReport, FrameScheduler, QueuedFrames, RenderLoop};
pub use interaction::{DragState, InteractionController};
pub use throttle::Throttle;
