//! Drag interaction: pointer events → selection and node positions.
//!
//! Two states. A pointer-down picks the drag set and snapshots positions;
//! throttled pointer-moves offset every node in the set from its snapshot;
//! pointer-up ends the drag. Move and up events outside a drag are ignored,
//! the equivalent of those listeners only being attached while dragging.
//!
//! ## Drag set
//!
//! | Pointer-down lands on | Active nodes          |
//! |-----------------------|-----------------------|
//! | a node                | that node only        |
//! | empty space           | every node in the scene |
//!
//! Movement is measured in view (client) coordinates and applied unscaled.

use crate::throttle::Throttle;
use joint_core::event::{EventBus, PointerPayload, Topic};
use joint_core::geometry::Vector2d;
use joint_core::id::ShapeId;
use joint_core::input::InputEvent;
use joint_core::model::NodeRef;
use joint_core::scene::SceneGraph;
use joint_core::viewport::CoordinateSpace;
use joint_render::hit::hit_test_nodes;
use std::collections::BTreeSet;
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragState {
    Idle,
    Dragging,
}

pub struct InteractionController {
    bus: Rc<EventBus>,
    state: DragState,
    active_nodes: Vec<NodeRef>,
    /// Positions at drag start, index-aligned with `active_nodes`.
    cache_positions: Vec<Vector2d>,
    active_shape_ids: BTreeSet<ShapeId>,
    pub mousedown_position: Vector2d,
    pub mousemove_position: Vector2d,
    pub mouseup_position: Vector2d,
    last_event: Option<InputEvent>,
    throttle: Throttle,
}

impl InteractionController {
    pub fn new(bus: Rc<EventBus>, move_throttle_ms: f64) -> Self {
        Self {
            bus,
            state: DragState::Idle,
            active_nodes: Vec::new(),
            cache_positions: Vec::new(),
            active_shape_ids: BTreeSet::new(),
            mousedown_position: Vector2d::ZERO,
            mousemove_position: Vector2d::ZERO,
            mouseup_position: Vector2d::ZERO,
            last_event: None,
            throttle: Throttle::new(move_throttle_ms),
        }
    }

    pub fn state(&self) -> DragState {
        self.state
    }

    pub fn is_dragging(&self) -> bool {
        self.state == DragState::Dragging
    }

    pub fn active_nodes(&self) -> &[NodeRef] {
        &self.active_nodes
    }

    pub fn cache_positions(&self) -> &[Vector2d] {
        &self.cache_positions
    }

    pub fn active_shape_ids(&self) -> &BTreeSet<ShapeId> {
        &self.active_shape_ids
    }

    /// The most recent pointer event seen, for hit testing against it.
    pub fn last_event(&self) -> Option<&InputEvent> {
        self.last_event.as_ref()
    }

    /// Idle → Dragging.
    pub fn pointer_down(&mut self, event: &InputEvent, scene: &SceneGraph, space: &CoordinateSpace) {
        self.last_event = Some(*event);
        self.active_shape_ids.clear();

        match hit_test_nodes(scene, event, space) {
            Some(hit) => {
                if let Some(id) = hit.borrow().shape_id() {
                    self.active_shape_ids.insert(id);
                }
                self.active_nodes = vec![hit];
            }
            None => self.active_nodes = scene.nodes().to_vec(),
        }
        scene.set_active_nodes(&self.active_nodes);
        self.cache_positions = self
            .active_nodes
            .iter()
            .map(|n| n.borrow().position())
            .collect();

        self.mousedown_position = event.position();
        self.throttle.reset();
        self.state = DragState::Dragging;
        log::debug!(
            "drag start at {:?}: {} active node(s)",
            self.mousedown_position,
            self.active_nodes.len()
        );

        self.bus.publish(
            Topic::MouseDown,
            Some(PointerPayload {
                mouse_position: self.mousedown_position,
                movement: None,
                active_shape_ids: Some(self.active_shape_ids.clone()),
            }),
        );
    }

    /// Offset the drag set. Returns `false` when idle or throttled.
    pub fn pointer_move(&mut self, event: &InputEvent, now_ms: f64) -> bool {
        if self.state != DragState::Dragging || !self.throttle.admit(now_ms) {
            return false;
        }
        self.last_event = Some(*event);
        self.mousemove_position = event.position();
        let movement = self.mousemove_position.subtract(self.mousedown_position);
        log::trace!("drag move {:?}", movement);

        self.bus.publish(
            Topic::MouseMove,
            Some(PointerPayload {
                mouse_position: self.mousemove_position,
                movement: Some(movement),
                active_shape_ids: Some(self.active_shape_ids.clone()),
            }),
        );

        for (node, cached) in self.active_nodes.iter().zip(&self.cache_positions) {
            node.borrow_mut().set_position(cached.add(movement));
        }
        true
    }

    /// Dragging → Idle. Returns `false` when no drag was in progress.
    pub fn pointer_up(&mut self, event: &InputEvent) -> bool {
        if self.state != DragState::Dragging {
            return false;
        }
        self.last_event = Some(*event);
        self.mouseup_position = event.position();
        let movement = self.mouseup_position.subtract(self.mousedown_position);
        self.state = DragState::Idle;
        log::debug!("drag end, movement {:?}", movement);

        self.bus.publish(
            Topic::MouseUp,
            Some(PointerPayload {
                mouse_position: self.mouseup_position,
                movement: Some(movement),
                active_shape_ids: None,
            }),
        );
        true
    }

    pub fn click(&self) {
        self.bus.publish(Topic::Click, None);
    }

    /// Drop `node` from the drag set and its position snapshot.
    /// Returns `true` if it was in the set.
    pub fn forget(&mut self, node: &NodeRef) -> bool {
        let before = self.active_nodes.len();
        let (nodes, positions) = self
            .active_nodes
            .drain(..)
            .zip(self.cache_positions.drain(..))
            .filter(|(n, _)| !Rc::ptr_eq(n, node))
            .unzip();
        self.active_nodes = nodes;
        self.cache_positions = positions;
        if let Some(id) = node.borrow().shape_id() {
            self.active_shape_ids.remove(&id);
        }
        self.active_nodes.len() != before
    }
}
