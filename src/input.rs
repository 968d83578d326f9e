use crate::config::HyperspeedOptions;
use crate::frame::AnimationState;

/// Maps pointer presses to speed/FOV targets. Never touches geometry.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InteractionController {
    pub rest_speed: f32,
    pub boost_speed: f32,
    pub rest_fov: f32,
    pub boost_fov: f32,
    boosted: bool,
}

impl InteractionController {
    pub fn from_options(options: &HyperspeedOptions) -> Self {
        Self {
            rest_speed: 0.0,
            boost_speed: options.speed_up,
            rest_fov: options.fov,
            boost_fov: options.fov_speed_up,
            boosted: false,
        }
    }

    /// Returns `true` when this press starts a boost.
    pub fn pointer_down(&mut self, state: &mut AnimationState) -> bool {
        state.target_speed = self.boost_speed;
        state.target_fov = self.boost_fov;
        !std::mem::replace(&mut self.boosted, true)
    }

    /// Release or leave. Returns `true` when a boost ends.
    pub fn pointer_up(&mut self, state: &mut AnimationState) -> bool {
        state.target_speed = self.rest_speed;
        state.target_fov = self.rest_fov;
        std::mem::replace(&mut self.boosted, false)
    }

    pub fn is_boosted(&self) -> bool {
        self.boosted
    }
}
