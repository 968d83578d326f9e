//! The JavaScript-facing entry points.

use crate::config::HyperspeedOptions;
use crate::core::Scene;
use crate::dom::{self, DetachCanvas};
use crate::events::{self, HostCallbacks, pointer::SharedSlot};
use crate::frame;
use crate::host::{HostBinding, SceneHost, SceneSlot};
use crate::render::GpuState;
use anyhow::Context;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use web_sys as web;

/// Handle returned by [`mount`]; owns the scene slot of one container.
#[wasm_bindgen]
pub struct HyperspeedHandle {
    slot: SharedSlot,
    container: web::HtmlElement,
    callbacks: HostCallbacks,
    // Bumped by dispose and reconfigure so a build that finishes late
    // does not install itself over a newer state.
    generation: Rc<Cell<u32>>,
}

#[wasm_bindgen]
impl HyperspeedHandle {
    /// Tear everything down. Safe to call repeatedly.
    pub fn dispose(&self) {
        self.generation.set(self.generation.get().wrapping_add(1));
        self.slot.borrow_mut().dispose();
    }

    /// Dispose the current scene, then rebuild it in the same container.
    pub fn reconfigure(&self, options_json: Option<String>) -> js_sys::Promise {
        let generation = self.generation.get().wrapping_add(1);
        self.generation.set(generation);
        self.slot.borrow_mut().dispose();
        log::info!("[host] reconfigure");

        let slot = self.slot.clone();
        let container = self.container.clone();
        let callbacks = self.callbacks.clone();
        let current = self.generation.clone();
        wasm_bindgen_futures::future_to_promise(async move {
            build(&slot, &container, options_json.as_deref(), &callbacks, &current, generation)
                .await
                .map(|_| JsValue::UNDEFINED)
                .map_err(to_js)
        })
    }

    #[wasm_bindgen(js_name = isLive)]
    pub fn is_live(&self) -> bool {
        self.slot.borrow().is_live()
    }
}

/// Mount the animation into `container`. `options_json` is merged over the
/// defaults; `callbacks` may carry `onSpeedUp` and `onSlowDown`.
#[wasm_bindgen]
pub async fn mount(
    container: web::HtmlElement,
    options_json: Option<String>,
    callbacks: JsValue,
) -> Result<HyperspeedHandle, JsValue> {
    let handle = HyperspeedHandle {
        slot: Rc::new(RefCell::new(SceneSlot::default())),
        container,
        callbacks: HostCallbacks::from_js(&callbacks),
        generation: Rc::new(Cell::new(0)),
    };
    build(
        &handle.slot,
        &handle.container,
        options_json.as_deref(),
        &handle.callbacks,
        &handle.generation,
        0,
    )
    .await
    .map_err(to_js)?;
    Ok(handle)
}

fn to_js(e: anyhow::Error) -> JsValue {
    log::error!("[host] {:#}", e);
    JsValue::from_str(&format!("{:#}", e))
}

async fn build(
    slot: &SharedSlot,
    container: &web::HtmlElement,
    options_json: Option<&str>,
    callbacks: &HostCallbacks,
    current: &Cell<u32>,
    generation: u32,
) -> anyhow::Result<()> {
    let options = HyperspeedOptions::from_json(options_json.unwrap_or("")).context("options")?;
    let scene = Scene::build(&options).context("scene")?;

    let canvas = dom::create_canvas(container)?;
    let mut detach = DetachCanvas(canvas.clone());
    let size = dom::container_size(container).unwrap_or((1, 1));
    dom::sync_canvas_backing_size(&canvas, size);

    let gpu = match GpuState::new(canvas.clone(), &scene, options.bloom).await {
        Ok(gpu) => gpu,
        Err(e) => {
            detach.release();
            return Err(e.context("WebGPU init"));
        }
    };

    let mut host = SceneHost::new(&options, scene, gpu, size);
    host.bind(Box::new(detach));
    if current.get() != generation {
        log::info!("[host] superseded before install");
        host.dispose();
        return Ok(());
    }

    let listeners = events::wire_input_handlers(container, slot, callbacks)?;
    let resize = events::wire_resize(container, &canvas, slot)?;
    for l in listeners {
        host.bind(Box::new(l));
    }
    host.bind(Box::new(resize));
    slot.borrow_mut().install(host);

    let frame_loop = frame::start_loop(Rc::downgrade(slot));
    match slot.borrow_mut().get_mut() {
        Some(h) => h.bind(Box::new(frame_loop)),
        None => {
            let mut frame_loop = frame_loop;
            frame_loop.release();
        }
    }
    log::info!("[host] mounted {}x{}", size.0, size.1);
    Ok(())
}
