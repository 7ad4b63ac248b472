//! Publish/subscribe event bus.
//!
//! The bus is an explicitly constructed value, shared as `Rc<EventBus>` by
//! whoever needs it; there is no process-wide instance. Dispatch is
//! synchronous and single-threaded. Handlers may publish or subscribe from
//! inside a callback: the handler list is snapshotted before dispatch.

use crate::geometry::Vector2d;
use crate::id::ShapeId;
use serde::Serialize;
use std::cell::{Cell, RefCell};
use std::collections::BTreeSet;
use std::rc::Rc;

/// Named channels the canvas publishes on or listens to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topic {
    MouseDown,
    MouseMove,
    MouseUp,
    Click,
    CanvasMounted,
    ZoomIn,
    ZoomOut,
}

impl Topic {
    pub const ALL: [Topic; 7] = [
        Topic::MouseDown,
        Topic::MouseMove,
        Topic::MouseUp,
        Topic::Click,
        Topic::CanvasMounted,
        Topic::ZoomIn,
        Topic::ZoomOut,
    ];

    /// Wire name, as seen by JS listeners.
    pub fn name(self) -> &'static str {
        match self {
            Topic::MouseDown => "mousedown",
            Topic::MouseMove => "mousemove",
            Topic::MouseUp => "mouseup",
            Topic::Click => "click",
            Topic::CanvasMounted => "canvas:mounted",
            Topic::ZoomIn => "zoomIn",
            Topic::ZoomOut => "zoomOut",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.name() == name)
    }
}

/// Pointer notification payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PointerPayload {
    pub mouse_position: Vector2d,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub movement: Option<Vector2d>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_shape_ids: Option<BTreeSet<ShapeId>>,
}

/// One delivered notification.
#[derive(Debug, Clone, PartialEq)]
pub struct BusEvent {
    pub topic: Topic,
    pub payload: Option<PointerPayload>,
}

impl BusEvent {
    /// Payload as JSON, `null` when absent.
    pub fn payload_json(&self) -> String {
        serde_json::to_string(&self.payload).unwrap_or_else(|_| "null".to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    /// Numeric form for handing across an FFI boundary.
    pub fn raw(self) -> u64 {
        self.0
    }

    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }
}

type Handler = Rc<dyn Fn(&BusEvent)>;

#[derive(Default)]
pub struct EventBus {
    handlers: RefCell<Vec<(SubscriptionId, Topic, Handler)>>,
    next_id: Cell<u64>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, topic: Topic, handler: impl Fn(&BusEvent) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.handlers.borrow_mut().push((id, topic, Rc::new(handler)));
        id
    }

    /// Returns `true` if the subscription existed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut handlers = self.handlers.borrow_mut();
        let before = handlers.len();
        handlers.retain(|(sid, _, _)| *sid != id);
        handlers.len() != before
    }

    pub fn publish(&self, topic: Topic, payload: Option<PointerPayload>) {
        let targets: Vec<Handler> = self
            .handlers
            .borrow()
            .iter()
            .filter(|(_, t, _)| *t == topic)
            .map(|(_, _, h)| Rc::clone(h))
            .collect();
        log::trace!("publish {} → {} listener(s)", topic.name(), targets.len());

        let event = BusEvent { topic, payload };
        for handler in targets {
            handler(&event);
        }
    }

    pub fn listener_count(&self, topic: Topic) -> usize {
        self.handlers
            .borrow()
            .iter()
            .filter(|(_, t, _)| *t == topic)
            .count()
    }
}
