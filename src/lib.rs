//! Infinite distortable road with streaking car lights, rendered with wgpu.
//!
//! The scene model, animation driver and host lifecycle build on every
//! target; the DOM glue and the WebGPU renderer only on `wasm32`.

pub mod camera;
pub mod config;
pub mod constants;
pub mod core;
pub mod error;
pub mod frame;
pub mod host;
pub mod input;

#[cfg(target_arch = "wasm32")]
mod dom;
#[cfg(target_arch = "wasm32")]
mod events;
#[cfg(target_arch = "wasm32")]
mod mount;
#[cfg(target_arch = "wasm32")]
pub mod render;

pub use camera::Camera;
pub use config::HyperspeedOptions;
pub use error::{ConfigError, HyperspeedError, RenderError};
pub use host::{FrameRenderer, HostBinding, SceneHost, SceneSlot};

#[cfg(target_arch = "wasm32")]
pub use mount::{mount, HyperspeedHandle};

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn start() -> Result<(), wasm_bindgen::JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("hyperspeed-web starting");
    Ok(())
}
