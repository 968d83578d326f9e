// Shared fixtures for the host-side tests: a renderer and a host binding that
// only count what happens to them.

#![allow(dead_code)]

use hyperspeed_web::camera::Camera;
use hyperspeed_web::config::HyperspeedOptions;
use hyperspeed_web::core::Scene;
use hyperspeed_web::error::RenderError;
use hyperspeed_web::host::{FrameRenderer, HostBinding, SceneHost};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

#[derive(Clone, Default)]
pub struct Probe {
    pub renders: Rc<Cell<u32>>,
    pub releases: Rc<Cell<u32>>,
    pub resizes: Rc<RefCell<Vec<(u32, u32)>>>,
}

pub struct MockRenderer {
    probe: Probe,
    released: bool,
}

impl MockRenderer {
    pub fn new(probe: &Probe) -> Self {
        Self {
            probe: probe.clone(),
            released: false,
        }
    }
}

impl FrameRenderer for MockRenderer {
    fn resize(&mut self, width: u32, height: u32) {
        assert!(!self.released, "resize after release");
        self.probe.resizes.borrow_mut().push((width, height));
    }

    fn render(&mut self, _scene: &Scene, _camera: &Camera) -> Result<(), RenderError> {
        assert!(!self.released, "render after release");
        self.probe.renders.set(self.probe.renders.get() + 1);
        Ok(())
    }

    fn release(&mut self) {
        assert!(!self.released, "released twice");
        self.released = true;
        self.probe.releases.set(self.probe.releases.get() + 1);
    }
}

pub struct CountingBinding(pub Rc<Cell<u32>>);

impl HostBinding for CountingBinding {
    fn release(&mut self) {
        self.0.set(self.0.get() + 1);
    }
}

pub fn seeded(json: &str) -> HyperspeedOptions {
    let mut options = HyperspeedOptions::from_json(json).expect("valid options");
    options.seed.get_or_insert(7);
    options
}

pub fn mock_host(options: &HyperspeedOptions, probe: &Probe) -> SceneHost<MockRenderer> {
    let scene = Scene::build(options).expect("scene builds");
    SceneHost::new(options, scene, MockRenderer::new(probe), (800, 600))
}

pub fn approx(a: f32, b: f32, tol: f32) -> bool {
    (a - b).abs() <= tol
}
