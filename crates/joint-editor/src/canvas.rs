//! The diagram canvas: one owner for scene, coordinate space, drag state,
//! and render loop.
//!
//! Hosts forward container resizes, pointer events, and frame callbacks.
//! Zoom arrives over the bus (`zoomIn` / `zoomOut`) from any publisher; the
//! bus handlers only enqueue, and the canvas applies the queue itself, so
//! every mutation of canvas state happens on the canvas's own call path.

use crate::frame::{FrameHandle, FrameReport, FrameScheduler, QueuedFrames, RenderLoop};
use crate::interaction::InteractionController;
use joint_core::config::CanvasConfig;
use joint_core::error::CanvasError;
use joint_core::event::{EventBus, SubscriptionId, Topic};
use joint_core::input::InputEvent;
use joint_core::model::{EdgeRef, NodeRef};
use joint_core::scene::SceneGraph;
use joint_core::surface::Surface;
use joint_core::viewport::{CoordinateSpace, WrapperLayout};
use joint_render::edge::OrthogonalEdge;
use joint_render::hit::hit_test_edges;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

/// Container content box as reported by the host's resize source.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContentRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl ContentRect {
    pub fn sized(width: f64, height: f64) -> Self {
        Self {
            left: 0.0,
            top: 0.0,
            width,
            height,
        }
    }

    fn validate(&self) -> Result<(), CanvasError> {
        let dims = [self.left, self.top, self.width, self.height];
        if dims.iter().any(|v| !v.is_finite()) || self.width < 0.0 || self.height < 0.0 {
            return Err(CanvasError::Configuration(format!(
                "invalid container rect {}x{} at ({}, {})",
                self.width, self.height, self.left, self.top
            )));
        }
        Ok(())
    }
}

type ZoomQueue = Rc<RefCell<VecDeque<Topic>>>;

pub struct DiagramCanvas<S: FrameScheduler = QueuedFrames> {
    bus: Rc<EventBus>,
    config: CanvasConfig,
    scene: SceneGraph,
    space: CoordinateSpace,
    interaction: InteractionController,
    render_loop: RenderLoop<S>,
    /// Set while a drag is in progress; gates the full edge redraw.
    repaint: bool,
    mounted: bool,
    zoom_queue: ZoomQueue,
    subscriptions: Vec<SubscriptionId>,
}

impl DiagramCanvas<QueuedFrames> {
    pub fn new(
        container: Option<ContentRect>,
        bus: Rc<EventBus>,
        config: CanvasConfig,
    ) -> Result<Self, CanvasError> {
        Self::with_scheduler(container, bus, config, QueuedFrames::new())
    }

    /// Fire the pending frame, if any. Returns `true` when a frame rendered.
    pub fn tick(&mut self, node_layer: &mut dyn Surface, edge_layer: &mut dyn Surface) -> bool {
        match self.render_loop.scheduler_mut().take_due() {
            Some(handle) => self.on_frame(handle, node_layer, edge_layer).is_some(),
            None => false,
        }
    }
}

impl<S: FrameScheduler> DiagramCanvas<S> {
    /// Fails before any bus subscription when the container is missing or
    /// malformed, or the config is invalid.
    pub fn with_scheduler(
        container: Option<ContentRect>,
        bus: Rc<EventBus>,
        config: CanvasConfig,
        scheduler: S,
    ) -> Result<Self, CanvasError> {
        let container = container
            .ok_or_else(|| CanvasError::Configuration("missing container".to_string()))?;
        container.validate()?;
        config.validate()?;

        let mut space = CoordinateSpace::with_zoom(
            config.initial_scale,
            config.zoom_in_step,
            config.zoom_out_factor,
        );
        space.on_resize(container.width, container.height);

        let zoom_queue: ZoomQueue = Rc::new(RefCell::new(VecDeque::new()));
        let subscriptions = [Topic::ZoomIn, Topic::ZoomOut]
            .into_iter()
            .map(|topic| {
                let queue = zoom_queue.clone();
                bus.subscribe(topic, move |event| queue.borrow_mut().push_back(event.topic))
            })
            .collect();

        Ok(Self {
            interaction: InteractionController::new(bus.clone(), config.move_throttle_ms),
            bus,
            config,
            scene: SceneGraph::new(),
            space,
            render_loop: RenderLoop::new(scheduler),
            repaint: false,
            mounted: false,
            zoom_queue,
            subscriptions,
        })
    }

    // ─── Accessors ───────────────────────────────────────────────────────

    pub fn bus(&self) -> &Rc<EventBus> {
        &self.bus
    }

    pub fn config(&self) -> &CanvasConfig {
        &self.config
    }

    pub fn scene(&self) -> &SceneGraph {
        &self.scene
    }

    pub fn space(&self) -> &CoordinateSpace {
        &self.space
    }

    pub fn repaint(&self) -> bool {
        self.repaint
    }

    pub fn interaction(&self) -> &InteractionController {
        &self.interaction
    }

    pub fn render_loop(&self) -> &RenderLoop<S> {
        &self.render_loop
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn is_running(&self) -> bool {
        self.render_loop.is_running()
    }

    pub fn wrapper_layout(&self) -> WrapperLayout {
        self.space.wrapper_layout()
    }

    // ─── Scene ───────────────────────────────────────────────────────────

    pub fn add_node(&mut self, node: NodeRef) -> bool {
        self.scene.add_node(node)
    }

    /// Remove `node` from the scene and the drag set, so dropping the
    /// caller's handle releases it and its edges stop drawing.
    pub fn remove_node(&mut self, node: &NodeRef) -> bool {
        let removed = self.scene.remove_node(node);
        if removed {
            self.interaction.forget(node);
            self.render_loop.request_redraw();
        }
        removed
    }

    /// Newly added edges are drawn on the next frame even when idle.
    pub fn add_edge(&mut self, edge: EdgeRef) -> bool {
        let added = self.scene.add_edge(edge);
        if added {
            self.render_loop.request_redraw();
        }
        added
    }

    pub fn remove_edge(&mut self, edge: &EdgeRef) -> bool {
        let removed = self.scene.remove_edge(edge);
        if removed {
            self.render_loop.request_redraw();
        }
        removed
    }

    /// Add an orthogonal edge styled from the canvas config.
    pub fn connect(&mut self, source: &NodeRef, target: &NodeRef) -> EdgeRef {
        let edge = OrthogonalEdge::new(source, target)
            .with_style(self.config.edge.clone())
            .into_ref();
        self.add_edge(edge.clone());
        edge
    }

    /// Topmost edge under `event`, as last drawn.
    pub fn edge_at(&self, event: &InputEvent) -> Option<EdgeRef> {
        hit_test_edges(&self.scene, event, &self.space)
    }

    // ─── Container ───────────────────────────────────────────────────────

    /// The container changed size. The first call announces `canvas:mounted`.
    pub fn on_resize(&mut self, rect: ContentRect) -> WrapperLayout {
        log::debug!(
            "container {}x{}, padding ({}, {})",
            rect.width,
            rect.height,
            rect.left,
            rect.top
        );
        self.space.on_resize(rect.width, rect.height);
        self.render_loop.request_redraw();
        if !self.mounted {
            self.mounted = true;
            self.bus.publish(Topic::CanvasMounted, None);
        }
        self.space.wrapper_layout()
    }

    pub fn zoom_in(&mut self) -> WrapperLayout {
        self.bus.publish(Topic::ZoomIn, None);
        self.apply_zoom_requests();
        self.space.wrapper_layout()
    }

    pub fn zoom_out(&mut self) -> WrapperLayout {
        self.bus.publish(Topic::ZoomOut, None);
        self.apply_zoom_requests();
        self.space.wrapper_layout()
    }

    /// Apply zoom requests published on the bus since the last call.
    pub fn apply_zoom_requests(&mut self) -> usize {
        let requests: Vec<Topic> = self.zoom_queue.borrow_mut().drain(..).collect();
        for topic in &requests {
            match topic {
                Topic::ZoomIn => self.space.zoom_in(),
                Topic::ZoomOut => self.space.zoom_out(),
                _ => {}
            }
        }
        if !requests.is_empty() {
            self.render_loop.request_redraw();
        }
        requests.len()
    }

    // ─── Pointer ─────────────────────────────────────────────────────────

    pub fn pointer_down(&mut self, event: &InputEvent) {
        self.apply_zoom_requests();
        self.repaint = true;
        self.interaction.pointer_down(event, &self.scene, &self.space);
    }

    pub fn pointer_move(&mut self, event: &InputEvent, now_ms: f64) -> bool {
        self.interaction.pointer_move(event, now_ms)
    }

    pub fn pointer_up(&mut self, event: &InputEvent) -> bool {
        let ended = self.interaction.pointer_up(event);
        if ended {
            self.repaint = false;
            // Settle edges on the final drag positions.
            self.render_loop.request_redraw();
        }
        ended
    }

    pub fn click(&self) {
        self.interaction.click();
    }

    // ─── Frames ──────────────────────────────────────────────────────────

    pub fn start(&mut self) {
        self.render_loop.start();
    }

    pub fn stop(&mut self) {
        self.render_loop.stop();
    }

    /// Host frame callback. `None` when `handle` is stale or cancelled.
    pub fn on_frame(
        &mut self,
        handle: FrameHandle,
        node_layer: &mut dyn Surface,
        edge_layer: &mut dyn Surface,
    ) -> Option<FrameReport> {
        self.apply_zoom_requests();
        self.render_loop.on_frame(
            handle,
            &self.scene,
            &self.space,
            self.repaint,
            node_layer,
            edge_layer,
        )
    }
}

impl<S: FrameScheduler> Drop for DiagramCanvas<S> {
    fn drop(&mut self) {
        self.render_loop.stop();
        for id in self.subscriptions.drain(..) {
            self.bus.unsubscribe(id);
        }
    }
}
