//! DOM event bindings. Every listener is a [`DomListener`] owned by the scene
//! host, so dispose detaches all of them.

use crate::error::HyperspeedError;
use crate::host::HostBinding;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys as web;

pub mod pointer;

pub use pointer::{wire_input_handlers, wire_resize};

pub struct DomListener {
    target: web::EventTarget,
    event: &'static str,
    closure: Option<Closure<dyn FnMut(web::Event)>>,
}

impl DomListener {
    pub fn attach(
        target: &web::EventTarget,
        event: &'static str,
        handler: impl FnMut(web::Event) + 'static,
    ) -> anyhow::Result<Self> {
        let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(web::Event)>);
        target
            .add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())
            .map_err(|e| HyperspeedError::host(format!("add {} listener: {:?}", event, e)))?;
        Ok(Self {
            target: target.clone(),
            event,
            closure: Some(closure),
        })
    }
}

impl HostBinding for DomListener {
    fn release(&mut self) {
        if let Some(closure) = self.closure.take() {
            _ = self
                .target
                .remove_event_listener_with_callback(self.event, closure.as_ref().unchecked_ref());
        }
    }
}

impl Drop for DomListener {
    fn drop(&mut self) {
        self.release();
    }
}

/// Optional host notifications, `{ onSpeedUp, onSlowDown }`.
#[derive(Clone, Default)]
pub struct HostCallbacks {
    pub on_speed_up: Option<js_sys::Function>,
    pub on_slow_down: Option<js_sys::Function>,
}

impl HostCallbacks {
    pub fn from_js(value: &JsValue) -> Self {
        if value.is_undefined() || value.is_null() {
            return Self::default();
        }
        let get = |name: &str| {
            js_sys::Reflect::get(value, &JsValue::from_str(name))
                .ok()
                .and_then(|f| f.dyn_into::<js_sys::Function>().ok())
        };
        Self {
            on_speed_up: get("onSpeedUp"),
            on_slow_down: get("onSlowDown"),
        }
    }

    pub fn speed_up(&self) {
        notify(&self.on_speed_up, "onSpeedUp");
    }

    pub fn slow_down(&self) {
        notify(&self.on_slow_down, "onSlowDown");
    }
}

// Runs the callback on a later microtask: it may dispose the host, which
// drops the listener that is still on the stack.
fn notify(callback: &Option<js_sys::Function>, name: &'static str) {
    if let Some(f) = callback.clone() {
        wasm_bindgen_futures::spawn_local(async move {
            if let Err(e) = f.call0(&JsValue::NULL) {
                log::warn!("[input] {} threw: {:?}", name, e);
            }
        });
    }
}
