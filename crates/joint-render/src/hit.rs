//! Hit testing: pointer event → node / edge lookup.
//!
//! Linear scans over the scene. Nodes are checked in collection order and
//! the first hit wins; edges are checked topmost first (reverse paint order).

use joint_core::input::InputEvent;
use joint_core::model::{EdgeRef, NodeRef};
use joint_core::scene::SceneGraph;
use joint_core::viewport::CoordinateSpace;

/// First node in collection order that reports a hit.
/// Returns `None` if no node is hit (background).
pub fn hit_test_nodes(
    scene: &SceneGraph,
    event: &InputEvent,
    space: &CoordinateSpace,
) -> Option<NodeRef> {
    scene
        .nodes()
        .iter()
        .find(|node| node.borrow().hit_test(event, space))
        .cloned()
}

/// Topmost edge under the pointer, as last rendered.
pub fn hit_test_edges(
    scene: &SceneGraph,
    event: &InputEvent,
    space: &CoordinateSpace,
) -> Option<EdgeRef> {
    scene
        .edges()
        .iter()
        .rev()
        .find(|edge| edge.borrow().hit_test(Some(event), space))
        .cloned()
}
