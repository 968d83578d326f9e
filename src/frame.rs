use crate::camera::Camera;
use crate::constants::*;
use crate::core::{FrameHook, Scene};
use crate::error::RenderError;
use crate::host::FrameRenderer;
use instant::Instant;

/// Eased animation values, owned by the driver for the life of a mount.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnimationState {
    pub current_speed: f32,
    pub target_speed: f32,
    pub current_fov: f32,
    pub target_fov: f32,
    /// Extra travel time accumulated while sped up.
    pub time_offset: f32,
    pub clock_elapsed: f32,
}

impl AnimationState {
    pub fn at_rest(fov: f32) -> Self {
        Self {
            current_speed: 0.0,
            target_speed: 0.0,
            current_fov: fov,
            target_fov: fov,
            time_offset: 0.0,
            clock_elapsed: 0.0,
        }
    }

    #[inline]
    pub fn render_time(&self) -> f32 {
        self.clock_elapsed + self.time_offset
    }
}

/// Move `current` toward `target` by the fraction an exponential decay closes
/// in `dt` seconds. Composes exactly across steps, so any frame rate gives the
/// same curve.
///
/// The snap tolerance scales with the target: near 150 adjacent `f32` values
/// are further apart than `EASE_SNAP_EPSILON`, and an absolute threshold would
/// leave the value stuck one ulp short.
#[inline]
pub fn ease_toward(current: f32, target: f32, dt: f32) -> f32 {
    let alpha = 1.0 - (-ease_rate() * dt).exp();
    let next = current + (target - current) * alpha;
    if (target - next).abs() <= EASE_SNAP_EPSILON * target.abs().max(1.0) {
        target
    } else {
        next
    }
}

/// Monotonic frame clock.
#[derive(Debug, Default)]
pub struct Clock {
    last: Option<Instant>,
}

impl Clock {
    /// Seconds since the previous call; zero on the first.
    pub fn delta(&mut self) -> f32 {
        let now = Instant::now();
        let dt = self
            .last
            .map(|last| (now - last).as_secs_f32())
            .unwrap_or(0.0);
        self.last = Some(now);
        dt
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameReport {
    pub render_time: f32,
    pub projection_updated: bool,
}

pub struct AnimationDriver {
    pub state: AnimationState,
    clock: Clock,
}

impl AnimationDriver {
    pub fn new(rest_fov: f32) -> Self {
        Self {
            state: AnimationState::at_rest(rest_fov),
            clock: Clock::default(),
        }
    }

    /// One full tick: clock, easing, time push, camera, render.
    pub fn tick<R: FrameRenderer>(
        &mut self,
        scene: &mut Scene,
        camera: &mut Camera,
        renderer: &mut R,
    ) -> Result<FrameReport, RenderError> {
        let dt = self.clock.delta();
        let report = self.advance(dt, scene, camera);
        renderer.render(scene, camera)?;
        Ok(report)
    }

    /// Everything a tick does before rendering, for an explicit `dt`.
    pub fn advance(&mut self, dt: f32, scene: &mut Scene, camera: &mut Camera) -> FrameReport {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        let s = &mut self.state;
        s.clock_elapsed += dt;

        s.current_speed = ease_toward(s.current_speed, s.target_speed, dt);
        s.time_offset += s.current_speed * dt;
        let render_time = s.render_time();

        scene.update(render_time);

        let next_fov = ease_toward(s.current_fov, s.target_fov, dt);
        // Compare against the last applied FOV so sub-epsilon steps still
        // accumulate, and the final snap to target is always applied.
        let drift = (next_fov - camera.fov_degrees).abs();
        let settled = next_fov == s.target_fov && drift > 0.0;
        let projection_updated = drift > FOV_EPSILON_DEG || settled;
        s.current_fov = next_fov;
        if projection_updated {
            camera.fov_degrees = next_fov;
            camera.update_projection();
        }

        camera.aim(scene.distortion.look_at(render_time));

        FrameReport {
            render_time,
            projection_updated,
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use web_loop::{start_loop, FrameLoop};

#[cfg(target_arch = "wasm32")]
mod web_loop {
    use crate::host::{FrameRenderer, HostBinding, SceneSlot};
    use std::cell::{Cell, RefCell};
    use std::rc::{Rc, Weak};
    use wasm_bindgen::closure::Closure;
    use wasm_bindgen::JsCast;
    use web_sys as web;

    type Tick = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

    /// The requestAnimationFrame loop of one host.
    pub struct FrameLoop {
        running: Rc<Cell<bool>>,
        pending: Rc<Cell<Option<i32>>>,
        tick: Tick,
    }

    impl HostBinding for FrameLoop {
        fn release(&mut self) {
            self.running.set(false);
            if let (Some(id), Some(w)) = (self.pending.take(), web::window()) {
                _ = w.cancel_animation_frame(id);
            }
            // Breaks the closure's reference to itself.
            self.tick.borrow_mut().take();
        }
    }

    fn schedule(tick: &Tick, pending: &Cell<Option<i32>>) {
        let Some(w) = web::window() else {
            return;
        };
        if let Some(cb) = tick.borrow().as_ref() {
            pending.set(w.request_animation_frame(cb.as_ref().unchecked_ref()).ok());
        }
    }

    /// Tick the slot's host once per animation frame until released, the host
    /// is disposed, or a frame fails.
    pub fn start_loop<R: FrameRenderer + 'static>(slot: Weak<RefCell<SceneSlot<R>>>) -> FrameLoop {
        let running = Rc::new(Cell::new(true));
        let pending = Rc::new(Cell::new(None));
        let tick: Tick = Rc::new(RefCell::new(None));

        let (run, pend, me) = (running.clone(), pending.clone(), tick.clone());
        *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
            pend.set(None);
            if !run.get() {
                return;
            }
            let Some(slot) = slot.upgrade() else {
                run.set(false);
                return;
            };
            let result = slot.borrow_mut().get_mut().map(|h| h.frame());
            match result {
                Some(Ok(Some(_))) => schedule(&me, &pend),
                Some(Err(e)) => {
                    log::error!("[host] frame failed, stopping loop: {}", e);
                    run.set(false);
                }
                _ => run.set(false),
            }
        }) as Box<dyn FnMut()>));
        schedule(&tick, &pending);

        FrameLoop {
            running,
            pending,
            tick,
        }
    }
}
