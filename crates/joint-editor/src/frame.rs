//! Frame-driven render loop.
//!
//! The host owns the clock: it hands out a [`FrameHandle`] per requested
//! frame and later calls back with that handle. A handle that no longer
//! matches the pending one (cancelled, or superseded) is ignored, so nothing
//! renders after [`RenderLoop::stop`].
//!
//! Two layers are drawn:
//!
//! - **node layer**: cleared and re-rendered every frame. No dirty tracking.
//! - **edge layer**: cleared and re-rendered only while `repaint` is set (a
//!   drag is in progress) or a one-shot redraw was requested. Otherwise the
//!   last drawn edges stay on the raster untouched.

use joint_core::scene::SceneGraph;
use joint_core::surface::Surface;
use joint_core::viewport::CoordinateSpace;

/// Opaque token for one scheduled frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub u64);

/// Host-provided "call me on the next frame" facility.
pub trait FrameScheduler {
    fn request_frame(&mut self) -> FrameHandle;
    /// Cancel a pending request. Must take effect before returning.
    fn cancel_frame(&mut self, handle: FrameHandle);
}

/// In-process scheduler: at most one pending frame, fired by the owner.
///
/// Used headless and by hosts that drive frames themselves (the wasm
/// binding calls into the canvas from its own `requestAnimationFrame`).
#[derive(Debug, Default)]
pub struct QueuedFrames {
    next: u64,
    pending: Option<FrameHandle>,
}

impl QueuedFrames {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending(&self) -> Option<FrameHandle> {
        self.pending
    }

    /// Take the pending frame, if any, for dispatch.
    pub fn take_due(&mut self) -> Option<FrameHandle> {
        self.pending.take()
    }
}

impl FrameScheduler for QueuedFrames {
    fn request_frame(&mut self) -> FrameHandle {
        self.next += 1;
        let handle = FrameHandle(self.next);
        self.pending = Some(handle);
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        if self.pending == Some(handle) {
            self.pending = None;
        }
    }
}

/// What a single frame did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameReport {
    pub nodes_drawn: usize,
    /// `true` when the edge layer was cleared and redrawn.
    pub edges_redrawn: bool,
    pub edges_drawn: usize,
}

pub struct RenderLoop<S: FrameScheduler> {
    scheduler: S,
    pending: Option<FrameHandle>,
    redraw: bool,
    frames: u64,
}

impl<S: FrameScheduler> RenderLoop<S> {
    pub fn new(scheduler: S) -> Self {
        Self {
            scheduler,
            pending: None,
            redraw: false,
            frames: 0,
        }
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    pub fn is_running(&self) -> bool {
        self.pending.is_some()
    }

    /// Frames rendered since construction.
    pub fn frame_count(&self) -> u64 {
        self.frames
    }

    /// Schedule the first frame. No-op while running.
    pub fn start(&mut self) {
        if self.pending.is_some() {
            return;
        }
        self.pending = Some(self.scheduler.request_frame());
        log::debug!("render loop started");
    }

    /// Cancel the pending frame. No-op when stopped.
    pub fn stop(&mut self) {
        if let Some(handle) = self.pending.take() {
            self.scheduler.cancel_frame(handle);
            log::debug!("render loop stopped after {} frame(s)", self.frames);
        }
    }

    /// Draw the edge layer once on the next frame even when not repainting.
    pub fn request_redraw(&mut self) {
        self.redraw = true;
    }

    pub fn redraw_requested(&self) -> bool {
        self.redraw
    }

    /// Render one frame and schedule the next.
    ///
    /// Returns `None` for a stale or cancelled handle.
    pub fn on_frame(
        &mut self,
        handle: FrameHandle,
        scene: &SceneGraph,
        space: &CoordinateSpace,
        repaint: bool,
        node_layer: &mut dyn Surface,
        edge_layer: &mut dyn Surface,
    ) -> Option<FrameReport> {
        if self.pending != Some(handle) {
            log::trace!("ignoring stale frame {:?}", handle);
            return None;
        }
        self.frames += 1;

        let mut report = FrameReport::default();
        node_layer.clear_rect(0.0, 0.0, space.canvas_width, space.canvas_height);
        for node in scene.nodes() {
            node.borrow_mut().render(node_layer);
            report.nodes_drawn += 1;
        }

        if repaint || self.redraw {
            self.redraw = false;
            edge_layer.clear_rect(0.0, 0.0, space.canvas_width, space.canvas_height);
            for edge in scene.edges() {
                edge.borrow_mut().render(edge_layer);
                report.edges_drawn += 1;
            }
            report.edges_redrawn = true;
        }

        self.pending = Some(self.scheduler.request_frame());
        Some(report)
    }
}
