//! Integration tests: pointer sessions driven through `DiagramCanvas`.
//!
//! Exercises hit testing, drag-set selection, throttled moves, bus
//! notifications, and the repaint flag across crate boundaries.

use joint_core::event::{BusEvent, EventBus, Topic};
use joint_core::geometry::Vector2d;
use joint_core::id::ShapeId;
use joint_core::input::InputEvent;
use joint_core::model::{NodeRef, RectNode};
use joint_core::CanvasConfig;
use joint_editor::{ContentRect, DiagramCanvas, DragState};
use pretty_assertions::assert_eq;
use std::cell::RefCell;
use std::rc::Rc;

fn init_logs() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn canvas(bus: &Rc<EventBus>) -> DiagramCanvas {
    DiagramCanvas::new(
        Some(ContentRect::sized(800.0, 600.0)),
        bus.clone(),
        CanvasConfig::default(),
    )
    .unwrap()
}

fn record(bus: &EventBus, topics: &[Topic]) -> Rc<RefCell<Vec<BusEvent>>> {
    let log = Rc::new(RefCell::new(Vec::new()));
    for &topic in topics {
        let sink = log.clone();
        bus.subscribe(topic, move |e| sink.borrow_mut().push(e.clone()));
    }
    log
}

fn position(node: &NodeRef) -> Vector2d {
    node.borrow().position()
}

// ─── Drag set ───────────────────────────────────────────────────────────

#[test]
fn dragging_a_node_moves_only_that_node() {
    init_logs();
    let bus = Rc::new(EventBus::new());
    let mut canvas = canvas(&bus);
    let node = RectNode::rect(0.0, 0.0, 200.0, 200.0).into_ref();
    let bystander = RectNode::rect(400.0, 400.0, 50.0, 50.0).into_ref();
    canvas.add_node(node.clone());
    canvas.add_node(bystander.clone());

    canvas.pointer_down(&InputEvent::from_pointer_down(100.0, 100.0));
    assert!(canvas.repaint());
    assert!(canvas.pointer_move(&InputEvent::from_pointer_move(130.0, 100.0), 0.0));

    assert_eq!(position(&node), Vector2d::new(30.0, 0.0));
    assert_eq!(position(&bystander), Vector2d::new(400.0, 400.0));
    assert!(node.borrow().active());
    assert!(!bystander.borrow().active());
}

#[test]
fn dragging_empty_space_moves_all_nodes_together() {
    init_logs();
    let bus = Rc::new(EventBus::new());
    let mut canvas = canvas(&bus);
    let nodes: Vec<NodeRef> = [(0.0, 0.0), (100.0, 0.0), (0.0, 100.0)]
        .into_iter()
        .map(|(x, y)| RectNode::rect(x, y, 40.0, 40.0).into_ref())
        .collect();
    for node in &nodes {
        canvas.add_node(node.clone());
    }

    canvas.pointer_down(&InputEvent::from_pointer_down(700.0, 500.0));
    assert_eq!(canvas.interaction().active_nodes().len(), 3);
    canvas.pointer_move(&InputEvent::from_pointer_move(690.0, 520.0), 0.0);

    let moved: Vec<_> = nodes.iter().map(position).collect();
    assert_eq!(
        moved,
        vec![
            Vector2d::new(-10.0, 20.0),
            Vector2d::new(90.0, 20.0),
            Vector2d::new(-10.0, 120.0),
        ]
    );
}

#[test]
fn second_press_replaces_drag_set() {
    let bus = Rc::new(EventBus::new());
    let mut canvas = canvas(&bus);
    let a = RectNode::rect(0.0, 0.0, 50.0, 50.0).into_ref();
    let b = RectNode::rect(100.0, 0.0, 50.0, 50.0).into_ref();
    canvas.add_node(a.clone());
    canvas.add_node(b.clone());

    canvas.pointer_down(&InputEvent::from_pointer_down(10.0, 10.0));
    canvas.pointer_up(&InputEvent::from_pointer_up(10.0, 10.0));
    canvas.pointer_down(&InputEvent::from_pointer_down(110.0, 10.0));

    assert!(!a.borrow().active());
    assert!(b.borrow().active());
}

// ─── Session lifecycle ──────────────────────────────────────────────────

#[test]
fn pointer_up_ends_drag_and_clears_repaint() {
    let bus = Rc::new(EventBus::new());
    let mut canvas = canvas(&bus);
    canvas.add_node(RectNode::rect(0.0, 0.0, 50.0, 50.0).into_ref());

    canvas.pointer_down(&InputEvent::from_pointer_down(10.0, 10.0));
    assert_eq!(canvas.interaction().state(), DragState::Dragging);
    assert!(canvas.pointer_up(&InputEvent::from_pointer_up(20.0, 10.0)));
    assert_eq!(canvas.interaction().state(), DragState::Idle);
    assert!(!canvas.repaint());

    // Listeners are detached: later moves do nothing.
    assert!(!canvas.pointer_move(&InputEvent::from_pointer_move(90.0, 90.0), 1000.0));
}

#[test]
fn session_publishes_in_order() {
    let bus = Rc::new(EventBus::new());
    let log = record(
        &bus,
        &[Topic::MouseDown, Topic::MouseMove, Topic::MouseUp, Topic::Click],
    );
    let mut canvas = canvas(&bus);
    let node = RectNode::rect(0.0, 0.0, 50.0, 50.0)
        .with_id(ShapeId::intern("task"))
        .into_ref();
    canvas.add_node(node);

    canvas.pointer_down(&InputEvent::from_pointer_down(10.0, 10.0));
    canvas.pointer_move(&InputEvent::from_pointer_move(20.0, 10.0), 0.0);
    canvas.pointer_move(&InputEvent::from_pointer_move(25.0, 10.0), 4.0);
    canvas.pointer_up(&InputEvent::from_pointer_up(30.0, 10.0));
    canvas.click();

    let topics: Vec<&str> = log.borrow().iter().map(|e| e.topic.name()).collect();
    assert_eq!(topics, vec!["mousedown", "mousemove", "mouseup", "click"]);

    let json = log.borrow()[0].payload_json();
    assert!(json.contains("\"mousePosition\""));
    assert!(json.contains("\"task\""));
}

#[test]
fn first_resize_announces_mount_once() {
    let bus = Rc::new(EventBus::new());
    let log = record(&bus, &[Topic::CanvasMounted]);
    let mut canvas = canvas(&bus);
    assert!(!canvas.is_mounted());

    let layout = canvas.on_resize(ContentRect::sized(400.0, 300.0));
    canvas.on_resize(ContentRect::sized(500.0, 300.0));

    assert!(canvas.is_mounted());
    assert_eq!(log.borrow().len(), 1);
    assert_eq!(layout.width, 400.0);
    assert_eq!(layout.left, 0.0);
}

// ─── Zoomed hit testing ─────────────────────────────────────────────────

#[test]
fn hit_testing_follows_zoom() {
    let bus = Rc::new(EventBus::new());
    let mut canvas = canvas(&bus);
    let near = RectNode::rect(0.0, 0.0, 20.0, 20.0).into_ref();
    let far = RectNode::rect(300.0, 300.0, 20.0, 20.0).into_ref();
    canvas.add_node(near.clone());
    canvas.add_node(far);

    // Published by a toolbar rather than through the canvas.
    bus.publish(Topic::ZoomIn, None);
    bus.publish(Topic::ZoomIn, None);
    assert_eq!(canvas.space().scale, 1.0);
    assert_eq!(canvas.apply_zoom_requests(), 2);
    assert!((canvas.space().scale - 1.2).abs() < 1e-12);

    let inside = canvas.space().pixel_to_view(Vector2d::new(10.0, 10.0));
    canvas.pointer_down(&InputEvent::from_pointer_down(inside.x, inside.y));
    let active = canvas.interaction().active_nodes();
    assert_eq!(active.len(), 1);
    assert!(Rc::ptr_eq(&active[0], &near));
}
