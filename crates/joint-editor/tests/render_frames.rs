//! Integration tests: frame-driven rendering through `DiagramCanvas`.
//!
//! Nodes redraw every frame; edges redraw only while a drag is in
//! progress or after a change that invalidates the edge layer.

use joint_core::event::EventBus;
use joint_core::input::InputEvent;
use joint_core::model::RectNode;
use joint_core::CanvasConfig;
use joint_editor::{ContentRect, DiagramCanvas, FrameScheduler};
use joint_render::display::{DisplayList, DrawOp};
use joint_render::paint::VelloSurface;
use pretty_assertions::assert_eq;
use std::rc::Rc;

struct Layers {
    nodes: DisplayList,
    edges: DisplayList,
}

impl Layers {
    fn new() -> Self {
        Self {
            nodes: DisplayList::new(),
            edges: DisplayList::new(),
        }
    }

    fn tick(&mut self, canvas: &mut DiagramCanvas) -> bool {
        canvas.tick(&mut self.nodes, &mut self.edges)
    }

    fn edge_strokes(&self) -> usize {
        self.edges
            .ops()
            .iter()
            .filter(|op| matches!(op, DrawOp::Stroke))
            .count()
    }
}

fn two_connected_nodes() -> DiagramCanvas {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut canvas = DiagramCanvas::new(
        Some(ContentRect::sized(800.0, 600.0)),
        Rc::new(EventBus::new()),
        CanvasConfig::default(),
    )
    .unwrap();
    let a = RectNode::rect(0.0, 0.0, 100.0, 100.0).into_ref();
    let b = RectNode::rect(300.0, 0.0, 100.0, 100.0).into_ref();
    canvas.add_node(a.clone());
    canvas.add_node(b.clone());
    canvas.connect(&a, &b);
    canvas
}

#[test]
fn nothing_renders_before_start() {
    let mut canvas = two_connected_nodes();
    let mut layers = Layers::new();
    assert!(!layers.tick(&mut canvas));
    assert!(layers.nodes.ops().is_empty());
}

#[test]
fn idle_frames_leave_edges_alone() {
    let mut canvas = two_connected_nodes();
    let mut layers = Layers::new();
    canvas.start();

    // The freshly added edge is drawn once.
    assert!(layers.tick(&mut canvas));
    assert_eq!(layers.edges.clear_count(), 1);
    assert_eq!(layers.edge_strokes(), 1);

    for _ in 0..5 {
        assert!(layers.tick(&mut canvas));
    }
    assert_eq!(layers.nodes.clear_count(), 6);
    assert_eq!(layers.edges.clear_count(), 1);
    assert_eq!(layers.edge_strokes(), 1);
}

#[test]
fn drag_redraws_edges_every_frame_then_settles() {
    let mut canvas = two_connected_nodes();
    let mut layers = Layers::new();
    canvas.start();
    layers.tick(&mut canvas);

    canvas.pointer_down(&InputEvent::from_pointer_down(50.0, 50.0));
    canvas.pointer_move(&InputEvent::from_pointer_move(50.0, 250.0), 0.0);
    layers.tick(&mut canvas);
    layers.tick(&mut canvas);
    assert_eq!(layers.edges.clear_count(), 3);

    canvas.pointer_up(&InputEvent::from_pointer_up(50.0, 250.0));
    layers.tick(&mut canvas);
    layers.tick(&mut canvas);
    // One settle frame after the drag, then idle again.
    assert_eq!(layers.edges.clear_count(), 4);
}

#[test]
fn stop_is_synchronous_and_restartable() {
    let mut canvas = two_connected_nodes();
    let mut layers = Layers::new();
    canvas.stop();
    canvas.start();
    canvas.start();
    assert!(canvas.is_running());

    canvas.stop();
    assert!(!canvas.is_running());
    assert_eq!(canvas.render_loop().scheduler().pending(), None);
    assert!(!layers.tick(&mut canvas));

    canvas.start();
    assert!(layers.tick(&mut canvas));
    assert_eq!(canvas.render_loop().frame_count(), 1);
}

#[test]
fn stale_handle_is_ignored() {
    let mut canvas = two_connected_nodes();
    let mut layers = Layers::new();
    canvas.start();
    let stale = canvas.render_loop().scheduler().pending().unwrap();
    canvas.stop();
    canvas.start();

    assert!(canvas.on_frame(stale, &mut layers.nodes, &mut layers.edges).is_none());
    assert!(layers.nodes.ops().is_empty());
}

#[test]
fn edge_hit_follows_last_drawn_route() {
    let mut canvas = two_connected_nodes();
    let mut layers = Layers::new();
    let on_route = InputEvent::from_pointer_down(200.0, 50.0);
    assert!(canvas.edge_at(&on_route).is_none());

    canvas.start();
    layers.tick(&mut canvas);
    assert!(canvas.edge_at(&on_route).is_some());
    assert!(canvas.edge_at(&InputEvent::from_pointer_down(200.0, 300.0)).is_none());
}

#[test]
fn removing_an_edge_clears_it_on_the_next_frame() {
    let mut canvas = two_connected_nodes();
    let mut layers = Layers::new();
    canvas.start();
    layers.tick(&mut canvas);
    let edge = canvas.scene().edges()[0].clone();

    assert!(canvas.remove_edge(&edge));
    assert!(!canvas.remove_edge(&edge));
    layers.tick(&mut canvas);
    assert_eq!(layers.edges.clear_count(), 2);
    assert_eq!(layers.edge_strokes(), 1);
    assert_eq!(canvas.scene().edge_count(), 0);
}

#[test]
fn removed_node_is_released_and_its_edge_stops_drawing() {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut canvas = DiagramCanvas::new(
        Some(ContentRect::sized(800.0, 600.0)),
        Rc::new(EventBus::new()),
        CanvasConfig::default(),
    )
    .unwrap();
    let a = RectNode::rect(0.0, 0.0, 100.0, 100.0).into_ref();
    let b = RectNode::rect(300.0, 0.0, 100.0, 100.0).into_ref();
    canvas.add_node(a.clone());
    canvas.add_node(b.clone());
    canvas.connect(&a, &b);
    let mut layers = Layers::new();
    canvas.start();
    layers.tick(&mut canvas);
    assert_eq!(layers.edge_strokes(), 1);

    // Leaves `b` as the last drag set.
    canvas.pointer_down(&InputEvent::from_pointer_down(350.0, 50.0));
    canvas.pointer_up(&InputEvent::from_pointer_up(350.0, 50.0));
    layers.tick(&mut canvas);
    assert_eq!(layers.edge_strokes(), 2);

    assert!(canvas.remove_node(&b));
    assert!(canvas.interaction().active_nodes().is_empty());
    let weak = Rc::downgrade(&b);
    drop(b);
    assert!(weak.upgrade().is_none());

    layers.tick(&mut canvas);
    assert_eq!(layers.edges.clear_count(), 3);
    assert_eq!(layers.edge_strokes(), 2);
}

#[test]
fn frames_paint_into_vello_scenes() {
    let mut canvas = two_connected_nodes();
    let (mut nodes, mut edges) = (VelloSurface::new(), VelloSurface::new());
    canvas.start();

    assert!(canvas.tick(&mut nodes, &mut edges));
    let node_draws = nodes.draw_count();
    assert!(node_draws > 0);
    assert_eq!(edges.draw_count(), 1);

    // Idle frame: nodes repaint from a cleared scene, edges keep theirs.
    assert!(canvas.tick(&mut nodes, &mut edges));
    assert_eq!(nodes.draw_count(), node_draws);
    assert_eq!(edges.draw_count(), 1);
}

#[test]
fn custom_scheduler_receives_requests() {
    #[derive(Default)]
    struct Counting {
        requested: u64,
        cancelled: Vec<u64>,
    }
    impl FrameScheduler for Counting {
        fn request_frame(&mut self) -> joint_editor::FrameHandle {
            self.requested += 1;
            joint_editor::FrameHandle(self.requested)
        }
        fn cancel_frame(&mut self, handle: joint_editor::FrameHandle) {
            self.cancelled.push(handle.0);
        }
    }

    let mut canvas = DiagramCanvas::with_scheduler(
        Some(ContentRect::sized(100.0, 100.0)),
        Rc::new(EventBus::new()),
        CanvasConfig::default(),
        Counting::default(),
    )
    .unwrap();
    let mut layers = Layers::new();
    canvas.start();
    let report = canvas
        .on_frame(joint_editor::FrameHandle(1), &mut layers.nodes, &mut layers.edges)
        .unwrap();
    assert_eq!(report.nodes_drawn, 0);
    canvas.stop();
    assert_eq!(canvas.render_loop().scheduler().requested, 2);
    assert_eq!(canvas.render_loop().scheduler().cancelled, vec![2]);
}
