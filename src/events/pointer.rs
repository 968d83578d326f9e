use super::{DomListener, HostCallbacks};
use crate::dom;
use crate::error::HyperspeedError;
use crate::host::SceneSlot;
use crate::render::GpuState;
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use wasm_bindgen::JsCast;
use web_sys as web;

pub type SharedSlot = Rc<RefCell<SceneSlot<GpuState>>>;

/// Press on the container boosts; release, leave and cancel end the boost.
pub fn wire_input_handlers(
    container: &web::HtmlElement,
    slot: &SharedSlot,
    callbacks: &HostCallbacks,
) -> anyhow::Result<Vec<DomListener>> {
    let target: &web::EventTarget = container.as_ref();
    let mut listeners = Vec::with_capacity(4);

    let weak = Rc::downgrade(slot);
    let cb = callbacks.clone();
    let capture = container.clone();
    listeners.push(DomListener::attach(target, "pointerdown", move |ev| {
        if let Some(pe) = ev.dyn_ref::<web::PointerEvent>() {
            _ = capture.set_pointer_capture(pe.pointer_id());
        }
        if with_host(&weak, |h| h.pointer_down()) {
            log::debug!("[input] boost on");
            cb.speed_up();
        }
    })?);

    for event in ["pointerup", "pointerleave", "pointercancel"] {
        let weak = Rc::downgrade(slot);
        let cb = callbacks.clone();
        listeners.push(DomListener::attach(target, event, move |_ev| {
            if with_host(&weak, |h| h.pointer_up()) {
                log::debug!("[input] boost off");
                cb.slow_down();
            }
        })?);
    }
    Ok(listeners)
}

/// Window resize re-measures the container and resizes canvas and renderer.
pub fn wire_resize(
    container: &web::HtmlElement,
    canvas: &web::HtmlCanvasElement,
    slot: &SharedSlot,
) -> anyhow::Result<DomListener> {
    let window = web::window().ok_or_else(|| HyperspeedError::host("no window"))?;
    let weak = Rc::downgrade(slot);
    let container = container.clone();
    let canvas = canvas.clone();
    DomListener::attach(window.as_ref(), "resize", move |_ev| {
        let size = dom::container_size(&container);
        if let Some(s) = size {
            dom::sync_canvas_backing_size(&canvas, s);
        }
        with_host(&weak, |h| {
            h.resize(size);
            false
        });
    })
}

// The slot borrow ends before the caller acts on the result.
fn with_host(
    weak: &Weak<RefCell<SceneSlot<GpuState>>>,
    f: impl FnOnce(&mut crate::host::SceneHost<GpuState>) -> bool,
) -> bool {
    let Some(slot) = weak.upgrade() else {
        return false;
    };
    let mut slot = slot.borrow_mut();
    slot.get_mut().is_some_and(f)
}
