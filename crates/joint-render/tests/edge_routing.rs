//! Integration tests: edges routed between live scene nodes.
//!
//! Covers join-point choice, the three path shapes, rerouting after a node
//! moves, and topmost-first edge hit testing.

use joint_core::geometry::Vector2d;
use joint_core::input::InputEvent;
use joint_core::model::{DiagramEdge, EdgeRef, NodeRef, RectNode};
use joint_core::scene::SceneGraph;
use joint_core::viewport::CoordinateSpace;
use joint_render::display::DisplayList;
use joint_render::edge::OrthogonalEdge;
use joint_render::hit::hit_test_edges;
use pretty_assertions::assert_eq;
use std::rc::Rc;

fn init_logs() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn v(x: f64, y: f64) -> Vector2d {
    Vector2d::new(x, y)
}

fn rendered_path(source: &NodeRef, target: &NodeRef) -> Vec<Vector2d> {
    let mut edge = OrthogonalEdge::new(source, target);
    edge.render(&mut DisplayList::new());
    edge.path().unwrap()
}

#[test]
fn stacked_boxes_route_vertically() {
    init_logs();
    let top = RectNode::rect(0.0, 0.0, 100.0, 100.0).into_ref();
    let bottom = RectNode::rect(0.0, 200.0, 100.0, 100.0).into_ref();

    assert_eq!(
        rendered_path(&top, &bottom),
        vec![v(50.0, 100.0), v(50.0, 150.0), v(50.0, 150.0), v(50.0, 200.0)]
    );
}

#[test]
fn tied_join_pairs_keep_the_first_source_candidate() {
    init_logs();
    // right→top and right→left are equally far; right→top is enumerated first.
    let a = RectNode::rect(0.0, 0.0, 100.0, 100.0).into_ref();
    let b = RectNode::rect(200.0, 150.0, 100.0, 100.0).into_ref();

    assert_eq!(
        rendered_path(&a, &b),
        vec![v(100.0, 50.0), v(250.0, 50.0), v(250.0, 150.0)]
    );
}

#[test]
fn moving_a_node_reroutes_on_next_render() {
    init_logs();
    let a = RectNode::rect(0.0, 0.0, 100.0, 100.0).into_ref();
    let b = RectNode::rect(0.0, 200.0, 100.0, 100.0).into_ref();
    let mut edge = OrthogonalEdge::new(&a, &b);
    edge.render(&mut DisplayList::new());
    assert_eq!(edge.source_join_point, Some(v(50.0, 100.0)));

    b.borrow_mut().set_position(v(300.0, 0.0));
    edge.render(&mut DisplayList::new());
    assert_eq!(
        edge.path().unwrap(),
        vec![v(100.0, 50.0), v(200.0, 50.0), v(200.0, 50.0), v(300.0, 50.0)]
    );
}

#[test]
fn overlapping_edges_hit_topmost_first() {
    init_logs();
    let mut scene = SceneGraph::new();
    let a = RectNode::rect(0.0, 0.0, 100.0, 100.0).into_ref();
    let b = RectNode::rect(300.0, 0.0, 100.0, 100.0).into_ref();
    let under: EdgeRef = OrthogonalEdge::new(&a, &b).into_ref();
    let over: EdgeRef = OrthogonalEdge::new(&a, &b).dashed().into_ref();
    scene.add_node(a);
    scene.add_node(b);
    scene.add_edge(under.clone());
    scene.add_edge(over.clone());

    let mut surface = DisplayList::new();
    for edge in scene.edges() {
        edge.borrow_mut().render(&mut surface);
    }

    let space = CoordinateSpace::default();
    let hit = hit_test_edges(&scene, &InputEvent::from_pointer_down(200.0, 50.0), &space).unwrap();
    assert!(Rc::ptr_eq(&hit, &over));

    scene.remove_edge(&over);
    let hit = hit_test_edges(&scene, &InputEvent::from_pointer_down(200.0, 50.0), &space).unwrap();
    assert!(Rc::ptr_eq(&hit, &under));
}
