use crate::error::HyperspeedError;
use crate::host::HostBinding;
use anyhow::Context;
use wasm_bindgen::JsCast;
use web_sys as web;

#[inline]
pub fn window_document() -> Option<web::Document> {
    web::window().and_then(|w| w.document())
}

/// Append a full-size canvas to `container`.
pub fn create_canvas(container: &web::HtmlElement) -> anyhow::Result<web::HtmlCanvasElement> {
    let document = window_document().context("no document")?;
    let canvas: web::HtmlCanvasElement = document
        .create_element("canvas")
        .map_err(|e| HyperspeedError::host(format!("{:?}", e)))?
        .dyn_into::<web::HtmlCanvasElement>()
        .map_err(|e| HyperspeedError::host(format!("{:?}", e)))?;
    let style = canvas.style();
    _ = style.set_property("display", "block");
    _ = style.set_property("width", "100%");
    _ = style.set_property("height", "100%");
    container
        .append_child(&canvas)
        .map_err(|e| HyperspeedError::host(format!("{:?}", e)))?;
    Ok(canvas)
}

/// Backing-store size of `container` in device pixels. `None` once the
/// container has left the document or collapsed to nothing.
pub fn container_size(container: &web::HtmlElement) -> Option<(u32, u32)> {
    if !container.is_connected() {
        return None;
    }
    let dpr = web::window().map(|w| w.device_pixel_ratio()).unwrap_or(1.0);
    let w = (container.client_width() as f64 * dpr) as u32;
    let h = (container.client_height() as f64 * dpr) as u32;
    (w > 0 && h > 0).then_some((w, h))
}

pub fn sync_canvas_backing_size(canvas: &web::HtmlCanvasElement, size: (u32, u32)) {
    canvas.set_width(size.0.max(1));
    canvas.set_height(size.1.max(1));
}

/// Removes the mounted canvas from the container on teardown.
pub struct DetachCanvas(pub web::HtmlCanvasElement);

impl HostBinding for DetachCanvas {
    fn release(&mut self) {
        self.0.remove();
    }
}
