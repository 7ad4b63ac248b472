//! Ordered node and edge collections.
//!
//! Insertion order doubles as paint order within each collection. Nodes and
//! edges are independent sequences; nothing orders one relative to the
//! other. Lookups are linear scans: diagrams are expected to be small, and
//! there is no spatial index.

use crate::model::{EdgeRef, NodeRef};
use std::rc::Rc;

#[derive(Default)]
pub struct SceneGraph {
    nodes: Vec<NodeRef>,
    edges: Vec<EdgeRef>,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn nodes(&self) -> &[NodeRef] {
        &self.nodes
    }

    pub fn edges(&self) -> &[EdgeRef] {
        &self.edges
    }

    /// Append `node` unless this exact handle is already present.
    /// Returns `true` if it was added.
    pub fn add_node(&mut self, node: NodeRef) -> bool {
        if self.contains_node(&node) {
            return false;
        }
        self.nodes.push(node);
        true
    }

    /// Remove `node` by identity. Returns `true` if it was present.
    pub fn remove_node(&mut self, node: &NodeRef) -> bool {
        match self.nodes.iter().position(|n| Rc::ptr_eq(n, node)) {
            Some(index) => {
                self.nodes.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn contains_node(&self, node: &NodeRef) -> bool {
        self.nodes.iter().any(|n| Rc::ptr_eq(n, node))
    }

    /// Append `edge` unless this exact handle is already present.
    pub fn add_edge(&mut self, edge: EdgeRef) -> bool {
        if self.contains_edge(&edge) {
            return false;
        }
        self.edges.push(edge);
        true
    }

    /// Remove `edge` by identity. Returns `true` if it was present.
    pub fn remove_edge(&mut self, edge: &EdgeRef) -> bool {
        match self.edges.iter().position(|e| Rc::ptr_eq(e, edge)) {
            Some(index) => {
                self.edges.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn contains_edge(&self, edge: &EdgeRef) -> bool {
        self.edges.iter().any(|e| Rc::ptr_eq(e, edge))
    }

    /// Nodes whose `active` flag is set, in collection order.
    pub fn active_nodes(&self) -> Vec<NodeRef> {
        self.nodes
            .iter()
            .filter(|n| n.borrow().active())
            .cloned()
            .collect()
    }

    /// Mark exactly `selection` as active; every other node is deactivated.
    pub fn set_active_nodes(&self, selection: &[NodeRef]) {
        for node in &self.nodes {
            let selected = selection.iter().any(|s| Rc::ptr_eq(s, node));
            node.borrow_mut().set_active(selected);
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.edges.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RectNode;

    #[test]
    fn add_node_is_idempotent_per_handle() {
        let mut scene = SceneGraph::new();
        let node = RectNode::rect(0.0, 0.0, 10.0, 10.0).into_ref();
        assert!(scene.add_node(node.clone()));
        assert!(!scene.add_node(node.clone()));
        assert_eq!(scene.node_count(), 1);
    }

    #[test]
    fn identical_attributes_are_distinct_entries() {
        let mut scene = SceneGraph::new();
        scene.add_node(RectNode::rect(0.0, 0.0, 10.0, 10.0).into_ref());
        scene.add_node(RectNode::rect(0.0, 0.0, 10.0, 10.0).into_ref());
        assert_eq!(scene.node_count(), 2);
    }

    #[test]
    fn remove_preserves_order_and_ignores_unknown() {
        let mut scene = SceneGraph::new();
        let a = RectNode::rect(0.0, 0.0, 1.0, 1.0).into_ref();
        let b = RectNode::rect(1.0, 0.0, 1.0, 1.0).into_ref();
        let c = RectNode::rect(2.0, 0.0, 1.0, 1.0).into_ref();
        let stranger = RectNode::rect(0.0, 0.0, 1.0, 1.0).into_ref();
        for n in [&a, &b, &c] {
            scene.add_node(n.clone());
        }

        assert!(!scene.remove_node(&stranger));
        assert_eq!(scene.node_count(), 3);

        assert!(scene.remove_node(&b));
        assert!(Rc::ptr_eq(&scene.nodes()[0], &a));
        assert!(Rc::ptr_eq(&scene.nodes()[1], &c));
    }

    #[test]
    fn active_subset_tracks_flags() {
        let mut scene = SceneGraph::new();
        let a = RectNode::rect(0.0, 0.0, 1.0, 1.0).into_ref();
        let b = RectNode::rect(1.0, 0.0, 1.0, 1.0).into_ref();
        scene.add_node(a.clone());
        scene.add_node(b.clone());

        scene.set_active_nodes(std::slice::from_ref(&b));
        let active = scene.active_nodes();
        assert_eq!(active.len(), 1);
        assert!(Rc::ptr_eq(&active[0], &b));
        assert!(!a.borrow().active());

        scene.set_active_nodes(&[]);
        assert!(scene.active_nodes().is_empty());
    }
}
