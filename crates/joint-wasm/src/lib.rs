//! WASM bridge for Joint: exposes the diagram canvas to JavaScript.
//!
//! Compiled via `wasm-pack build --target web`. The page stacks two
//! `<canvas>` elements (nodes over edges), forwards pointer and resize events,
//! and calls [`JointCanvas::frame`] from its own `requestAnimationFrame` loop.
//!
//! Exported methods take `&self` and keep the canvas in a `RefCell`. Bus
//! listeners registered with [`JointCanvas::on`] are queued and called after
//! that borrow is released, so a listener may call back into the canvas.

mod outbox;
mod surface2d;

pub use outbox::Outbox;
pub use surface2d::Canvas2dSurface;

use joint_core::config::CanvasConfig;
use joint_core::error::CanvasError;
use joint_core::event::{EventBus, SubscriptionId, Topic};
use joint_core::id::ShapeId;
use joint_core::input::InputEvent;
use joint_core::model::{NodeRef, RectNode};
use joint_core::viewport::WrapperLayout;
use joint_editor::canvas::{ContentRect, DiagramCanvas};
use joint_render::edge::OrthogonalEdge;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use web_sys::CanvasRenderingContext2d;

struct Diagram {
    canvas: DiagramCanvas,
    nodes: HashMap<ShapeId, NodeRef>,
}

/// A JS listener call waiting for the canvas borrow to end.
struct Delivery {
    listener: js_sys::Function,
    topic: Topic,
    payload: Option<String>,
}

/// The JS-facing canvas controller.
#[wasm_bindgen]
pub struct JointCanvas {
    diagram: RefCell<Diagram>,
    bus: Rc<EventBus>,
    outbox: Outbox<Delivery>,
}

#[wasm_bindgen]
impl JointCanvas {
    /// Create a canvas for a container of the given content size.
    /// `config` is optional JSON; omitted fields take their defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(width: f64, height: f64, config: Option<String>) -> Result<JointCanvas, JsValue> {
        console_error_panic_hook_setup();

        let config = parse_config(config.as_deref()).map_err(to_js)?;
        let bus = Rc::new(EventBus::new());
        let container = ContentRect::sized(width, height);
        let canvas = DiagramCanvas::new(Some(container), bus.clone(), config).map_err(to_js)?;
        Ok(Self {
            diagram: RefCell::new(Diagram {
                canvas,
                nodes: HashMap::new(),
            }),
            bus,
            outbox: Outbox::new(),
        })
    }

    /// Add a rectangle node and return its id. An empty `id` generates one.
    /// Returns `undefined` if `id` is already taken.
    pub fn add_rect(
        &self,
        id: &str,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        label: Option<String>,
    ) -> Option<String> {
        let shape_id = if id.is_empty() {
            ShapeId::generate("rect")
        } else {
            ShapeId::intern(id)
        };
        let mut diagram = self.diagram.borrow_mut();
        if diagram.nodes.contains_key(&shape_id) {
            return None;
        }
        let mut rect = RectNode::rect(x, y, width, height).with_id(shape_id);
        if let Some(label) = label {
            rect = rect.with_label(label);
        }
        let node = rect.into_ref();
        diagram.canvas.add_node(node.clone());
        diagram.nodes.insert(shape_id, node);
        Some(shape_id.as_str().to_string())
    }

    /// Connect two nodes by id. Returns `false` if either id is unknown.
    pub fn add_edge(
        &self,
        source: &str,
        target: &str,
        dashed: bool,
        arrow: bool,
        text: Option<String>,
    ) -> bool {
        let mut diagram = self.diagram.borrow_mut();
        let Diagram { canvas, nodes } = &mut *diagram;
        let nodes = &*nodes;
        let find = move |id: &str| ShapeId::lookup(id).and_then(|id| nodes.get(&id));
        let (Some(source), Some(target)) = (find(source), find(target)) else {
            return false;
        };
        let mut edge = OrthogonalEdge::new(source, target).with_style(canvas.config().edge.clone());
        if dashed {
            edge = edge.dashed();
        }
        if arrow {
            edge = edge.with_arrow();
        }
        if let Some(text) = text {
            edge = edge.with_text(text);
        }
        canvas.add_edge(edge.into_ref())
    }

    /// Remove a node by id. Edges attached to it stop rendering.
    pub fn remove_node(&self, id: &str) -> bool {
        let mut diagram = self.diagram.borrow_mut();
        let Some(node) = ShapeId::lookup(id).and_then(|id| diagram.nodes.remove(&id)) else {
            return false;
        };
        diagram.canvas.remove_node(&node)
    }

    /// Container resized. Returns the wrapper layout as JSON.
    pub fn resize(&self, width: f64, height: f64, left: f64, top: f64) -> String {
        let rect = ContentRect {
            left,
            top,
            width,
            height,
        };
        let layout = self.diagram.borrow_mut().canvas.on_resize(rect);
        self.deliver();
        layout_json(&layout)
    }

    pub fn zoom_in(&self) -> String {
        let layout = self.diagram.borrow_mut().canvas.zoom_in();
        self.deliver();
        layout_json(&layout)
    }

    pub fn zoom_out(&self) -> String {
        let layout = self.diagram.borrow_mut().canvas.zoom_out();
        self.deliver();
        layout_json(&layout)
    }

    pub fn pointer_down(&self, x: f64, y: f64) {
        let event = InputEvent::from_pointer_down(x, y);
        self.diagram.borrow_mut().canvas.pointer_down(&event);
        self.deliver();
    }

    /// Returns `true` if the move was applied (dragging and not throttled).
    pub fn pointer_move(&self, x: f64, y: f64, now_ms: f64) -> bool {
        let event = InputEvent::from_pointer_move(x, y);
        let moved = self.diagram.borrow_mut().canvas.pointer_move(&event, now_ms);
        self.deliver();
        moved
    }

    pub fn pointer_up(&self, x: f64, y: f64) -> bool {
        let event = InputEvent::from_pointer_up(x, y);
        let ended = self.diagram.borrow_mut().canvas.pointer_up(&event);
        self.deliver();
        ended
    }

    pub fn click(&self) {
        self.diagram.borrow().canvas.click();
        self.deliver();
    }

    pub fn start(&self) {
        self.diagram.borrow_mut().canvas.start();
    }

    pub fn stop(&self) {
        self.diagram.borrow_mut().canvas.stop();
    }

    pub fn is_running(&self) -> bool {
        self.diagram.borrow().canvas.is_running()
    }

    /// Render the pending frame, if any. Returns `true` when one rendered.
    pub fn frame(&self, nodes: &CanvasRenderingContext2d, edges: &CanvasRenderingContext2d) -> bool {
        let mut node_layer = Canvas2dSurface::new(nodes);
        let mut edge_layer = Canvas2dSurface::new(edges);
        let rendered = self
            .diagram
            .borrow_mut()
            .canvas
            .tick(&mut node_layer, &mut edge_layer);
        self.deliver();
        rendered
    }

    /// Listen on a bus topic (`"mousedown"`, `"canvas:mounted"`, ...). The
    /// callback receives the payload object, or `undefined` when there is
    /// none. Returns a subscription id for [`off`](Self::off), or
    /// `undefined` for an unknown topic.
    pub fn on(&self, topic: &str, callback: js_sys::Function) -> Option<u32> {
        let topic = Topic::from_name(topic)?;
        let outbox = self.outbox.clone();
        let id = self.bus.subscribe(topic, move |event| {
            outbox.push(Delivery {
                listener: callback.clone(),
                topic: event.topic,
                payload: event.payload.as_ref().map(|_| event.payload_json()),
            })
        });
        match u32::try_from(id.raw()) {
            Ok(raw) => Some(raw),
            Err(_) => {
                self.bus.unsubscribe(id);
                None
            }
        }
    }

    /// Remove a listener registered with [`on`](Self::on).
    pub fn off(&self, id: u32) -> bool {
        self.bus.unsubscribe(SubscriptionId::from_raw(u64::from(id)))
    }

    /// Publish a bus topic from JS, e.g. a toolbar's `"zoomIn"`.
    pub fn emit(&self, topic: &str) -> bool {
        let Some(topic) = Topic::from_name(topic) else {
            return false;
        };
        self.bus.publish(topic, None);
        self.deliver();
        true
    }
}

impl JointCanvas {
    fn deliver(&self) {
        self.outbox.drain(|delivery| {
            let payload = match delivery.payload {
                Some(json) => js_sys::JSON::parse(&json).unwrap_or(JsValue::UNDEFINED),
                None => JsValue::UNDEFINED,
            };
            if let Err(err) = delivery.listener.call1(&JsValue::NULL, &payload) {
                log::warn!("{} listener threw: {:?}", delivery.topic.name(), err);
            }
        });
    }
}

fn parse_config(json: Option<&str>) -> Result<CanvasConfig, CanvasError> {
    match json {
        Some(json) => CanvasConfig::from_json(json),
        None => Ok(CanvasConfig::default()),
    }
}

fn layout_json(layout: &WrapperLayout) -> String {
    serde_json::to_string(layout).unwrap_or_else(|_| "{}".to_string())
}

fn to_js(err: CanvasError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

// ─── Panic hook for WASM debugging ───────────────────────────────────────

fn console_error_panic_hook_setup() {
    #[cfg(target_arch = "wasm32")]
    {
        use std::sync::Once;
        static SET_HOOK: Once = Once::new();
        SET_HOOK.call_once(|| {
            std::panic::set_hook(Box::new(|info| {
                let msg = format!("Joint WASM panic: {info}");
                web_sys::console::error_1(&msg.into());
            }));
        });
    }
}

// ─── Standalone validation (no canvas needed) ────────────────────────────

/// Validate a canvas config. Returns JSON: `{"ok":true}` or `{"ok":false,"error":"..."}`.
#[wasm_bindgen]
pub fn validate_config(json: &str) -> String {
    match CanvasConfig::from_json(json) {
        Ok(_) => r#"{"ok":true}"#.to_string(),
        Err(e) => serde_json::json!({ "ok": false, "error": e.to_string() }).to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn missing_config_uses_defaults() {
        assert_eq!(parse_config(None), Ok(CanvasConfig::default()));
    }

    #[test]
    fn partial_config_overrides_fields() {
        let config = parse_config(Some(r#"{"move_throttle_ms": 33}"#)).unwrap();
        assert_eq!(config.move_throttle_ms, 33.0);
        assert_eq!(config.initial_scale, 1.0);
    }

    #[test]
    fn validate_config_reports_errors_as_json() {
        assert_eq!(validate_config("{}"), r#"{"ok":true}"#);
        let bad: serde_json::Value = serde_json::from_str(&validate_config(r#"{"initial_scale": -1}"#)).unwrap();
        assert_eq!(bad["ok"], false);
        assert!(bad["error"].as_str().unwrap().contains("initial_scale"));
        let broken: serde_json::Value = serde_json::from_str(&validate_config("{")).unwrap();
        assert_eq!(broken["ok"], false);
    }

    #[test]
    fn layout_serializes_all_fields() {
        let layout = WrapperLayout {
            left: 10.0,
            top: 5.0,
            width: 100.0,
            height: 50.0,
            scale: 1.5,
        };
        let v: serde_json::Value = serde_json::from_str(&layout_json(&layout)).unwrap();
        assert_eq!(v["left"], 10.0);
        assert_eq!(v["scale"], 1.5);
    }
}
