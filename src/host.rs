//! Scene lifecycle.
//!
//! A [`SceneHost`] owns the renderer, camera, scene and animation state of one
//! mount, plus every binding it registered with the host environment
//! (listeners, the frame loop, the canvas). [`SceneHost::dispose`] releases all
//! of them once; afterwards every entry point is a no-op.

use crate::camera::Camera;
use crate::config::HyperspeedOptions;
use crate::core::Scene;
use crate::error::RenderError;
use crate::frame::{AnimationDriver, AnimationState, FrameReport};
use crate::input::InteractionController;

/// Draws a scene. Implemented by the wgpu renderer.
pub trait FrameRenderer {
    fn resize(&mut self, width: u32, height: u32);
    fn render(&mut self, scene: &Scene, camera: &Camera) -> Result<(), RenderError>;
    /// Free GPU buffers, textures and pipelines. Must tolerate repeat calls.
    fn release(&mut self);
}

/// Something registered with the host environment that must be undone on
/// teardown: an event listener, the frame loop, an appended element.
pub trait HostBinding {
    fn release(&mut self);
}

struct LiveScene<R: FrameRenderer> {
    renderer: R,
    scene: Scene,
    camera: Camera,
    driver: AnimationDriver,
    controls: InteractionController,
}

pub struct SceneHost<R: FrameRenderer> {
    live: Option<LiveScene<R>>,
    bindings: Vec<Box<dyn HostBinding>>,
}

impl<R: FrameRenderer> SceneHost<R> {
    pub fn new(options: &HyperspeedOptions, scene: Scene, mut renderer: R, size: (u32, u32)) -> Self {
        let (width, height) = size;
        let mut camera = Camera::new(options.fov, 1.0);
        camera.set_aspect(width, height);
        renderer.resize(width, height);
        Self {
            live: Some(LiveScene {
                renderer,
                scene,
                camera,
                driver: AnimationDriver::new(options.fov),
                controls: InteractionController::from_options(options),
            }),
            bindings: Vec::new(),
        }
    }

    /// Take ownership of a binding; released on dispose. A binding handed to
    /// an already disposed host is released immediately.
    pub fn bind(&mut self, mut binding: Box<dyn HostBinding>) {
        if self.live.is_some() {
            self.bindings.push(binding);
        } else {
            binding.release();
        }
    }

    pub fn is_live(&self) -> bool {
        self.live.is_some()
    }

    /// Returns `true` when the press starts a boost.
    pub fn pointer_down(&mut self) -> bool {
        match &mut self.live {
            Some(l) => l.controls.pointer_down(&mut l.driver.state),
            None => false,
        }
    }

    /// Returns `true` when a boost ends.
    pub fn pointer_up(&mut self) -> bool {
        match &mut self.live {
            Some(l) => l.controls.pointer_up(&mut l.driver.state),
            None => false,
        }
    }

    /// New viewport size; `None` (host element gone) or a zero side is ignored.
    pub fn resize(&mut self, size: Option<(u32, u32)>) {
        let (Some(l), Some((w, h))) = (&mut self.live, size) else {
            return;
        };
        if w == 0 || h == 0 {
            return;
        }
        l.renderer.resize(w, h);
        l.camera.set_aspect(w, h);
        log::debug!("[host] resize {}x{}", w, h);
    }

    /// Run one tick off the monotonic clock. `Ok(None)` once disposed.
    pub fn frame(&mut self) -> Result<Option<FrameReport>, RenderError> {
        match &mut self.live {
            Some(l) => l
                .driver
                .tick(&mut l.scene, &mut l.camera, &mut l.renderer)
                .map(Some),
            None => Ok(None),
        }
    }

    /// Run one tick with an explicit `dt` in seconds.
    pub fn step(&mut self, dt: f32) -> Result<Option<FrameReport>, RenderError> {
        match &mut self.live {
            Some(l) => {
                let report = l.driver.advance(dt, &mut l.scene, &mut l.camera);
                l.renderer.render(&l.scene, &l.camera)?;
                Ok(Some(report))
            }
            None => Ok(None),
        }
    }

    pub fn animation(&self) -> Option<&AnimationState> {
        self.live.as_ref().map(|l| &l.driver.state)
    }

    pub fn scene(&self) -> Option<&Scene> {
        self.live.as_ref().map(|l| &l.scene)
    }

    pub fn camera(&self) -> Option<&Camera> {
        self.live.as_ref().map(|l| &l.camera)
    }

    pub fn renderer(&self) -> Option<&R> {
        self.live.as_ref().map(|l| &l.renderer)
    }

    /// Stop the loop, drop listeners, free GPU resources, clear the scene.
    /// Safe to call any number of times.
    pub fn dispose(&mut self) {
        let had_scene = self.live.is_some();
        for mut binding in self.bindings.drain(..) {
            binding.release();
        }
        if let Some(mut live) = self.live.take() {
            live.renderer.release();
        }
        if had_scene {
            log::info!("[host] disposed");
        }
    }
}

impl<R: FrameRenderer> Drop for SceneHost<R> {
    fn drop(&mut self) {
        self.dispose();
    }
}

/// Holds at most one live host; installing a new one disposes the old first.
pub struct SceneSlot<R: FrameRenderer> {
    host: Option<SceneHost<R>>,
}

impl<R: FrameRenderer> Default for SceneSlot<R> {
    fn default() -> Self {
        Self { host: None }
    }
}

impl<R: FrameRenderer> SceneSlot<R> {
    pub fn install(&mut self, host: SceneHost<R>) -> &mut SceneHost<R> {
        self.dispose();
        self.host.insert(host)
    }

    pub fn get(&self) -> Option<&SceneHost<R>> {
        self.host.as_ref()
    }

    pub fn get_mut(&mut self) -> Option<&mut SceneHost<R>> {
        self.host.as_mut()
    }

    pub fn is_live(&self) -> bool {
        self.host.as_ref().is_some_and(|h| h.is_live())
    }

    pub fn dispose(&mut self) {
        if let Some(mut old) = self.host.take() {
            old.dispose();
        }
    }
}
