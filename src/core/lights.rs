use super::geometry::{unit_tube, Mesh};
use super::scene::FrameHook;
use super::wrap_travel;
use crate::config::{HyperspeedOptions, Palette, Span};
use crate::constants::{ALPHA_DISCARD, CAR_LIGHT_LIFT, TUBE_RADIAL_SEGMENTS, TUBE_SEGMENTS};
use rand::Rng;

/// One light of a pair; mirrors the instance attributes of `streaks.wgsl`.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LightInstance {
    /// Lateral position, height, depth offset.
    pub offset: [f32; 3],
    /// Radius, length, speed.
    pub metrics: [f32; 3],
    pub color: [f32; 3],
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct StreakUniforms {
    pub fade: [f32; 2],
    pub time: f32,
    pub travel_length: f32,
    pub x_offset: f32,
    /// Fragments with a fade below this are discarded.
    pub alpha_discard: f32,
    pub _pad: [f32; 2],
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TravelDirection {
    /// Left roadway, traffic receding from the camera.
    Away,
    /// Right roadway, traffic approaching the camera.
    Closer,
}

/// Instanced stream of car-light pairs for one travel direction.
#[derive(Clone, Debug)]
pub struct LightStreakField {
    pub direction: TravelDirection,
    pub mesh: Mesh,
    instances: Vec<LightInstance>,
    pub uniforms: StreakUniforms,
}

impl LightStreakField {
    pub fn build(
        options: &HyperspeedOptions,
        direction: TravelDirection,
        rng: &mut impl Rng,
    ) -> Self {
        let (speed, palette, fade, x_offset) = match direction {
            TravelDirection::Away => (
                options.moving_away_speed,
                &options.colors.left_cars,
                [0.0, 1.0 - options.car_lights_fade],
                -(options.road_width * 0.5 + options.island_width * 0.5),
            ),
            TravelDirection::Closer => (
                options.moving_closer_speed,
                &options.colors.right_cars,
                [1.0, options.car_lights_fade],
                options.road_width * 0.5 + options.island_width * 0.5,
            ),
        };
        let instances = sample_pairs(options, speed, palette, rng);
        Self {
            direction,
            mesh: unit_tube(TUBE_SEGMENTS, TUBE_RADIAL_SEGMENTS),
            instances,
            uniforms: StreakUniforms {
                fade,
                time: 0.0,
                travel_length: options.length,
                x_offset,
                alpha_discard: ALPHA_DISCARD,
                _pad: [0.0; 2],
            },
        }
    }

    pub fn instances(&self) -> &[LightInstance] {
        &self.instances
    }

    pub fn instance_count(&self) -> u32 {
        self.instances.len() as u32
    }

    pub fn time(&self) -> f32 {
        self.uniforms.time
    }

    /// Wrapped travel `(time * speed + offset) mod travelLength` of an instance
    /// at the field's current time.
    pub fn travel(&self, index: usize) -> Option<f32> {
        let inst = self.instances.get(index)?;
        Some(wrap_travel(
            self.uniforms.time * inst.metrics[2] + inst.offset[2],
            self.uniforms.travel_length,
        ))
    }

    /// Depth of the near end of an instance's tube before distortion.
    pub fn head_z(&self, index: usize) -> Option<f32> {
        let length = self.instances.get(index)?.metrics[1];
        self.travel(index).map(|t| length - t)
    }

    /// Alpha along the trail at tube coordinate `u` (0 = near end).
    pub fn fade_alpha(&self, u: f32) -> f32 {
        fade_step(self.uniforms.fade[0], self.uniforms.fade[1], u)
    }

    /// Whether the fragment at `u` survives the discard in `streaks.wgsl`.
    pub fn is_visible(&self, u: f32) -> bool {
        self.fade_alpha(u) >= self.uniforms.alpha_discard
    }
}

impl FrameHook for LightStreakField {
    fn update(&mut self, time: f32) {
        self.uniforms.time = time;
    }
}

fn sample_pairs(
    options: &HyperspeedOptions,
    speed: Span,
    palette: &Palette,
    rng: &mut impl Rng,
) -> Vec<LightInstance> {
    let lane_width = options.lane_width();
    let pairs = options.light_pairs_per_road_way as usize;
    let mut out = Vec::with_capacity(pairs * 2);
    for i in 0..pairs {
        let radius = options.car_lights_radius.sample(rng);
        let length = options.car_lights_length.sample(rng);
        let pair_speed = speed.sample(rng);
        let lane = (i as u32 % options.lanes_per_road) as f32;
        let mut lane_x = lane * lane_width - options.road_width * 0.5 + lane_width * 0.5;
        let car_width = options.car_width_percentage.sample(rng) * lane_width;
        lane_x += options.car_shift_x.sample(rng) * lane_width;
        let offset_y = options.car_floor_separation.sample(rng) + radius * CAR_LIGHT_LIFT;
        let offset_z = -Span::new(0.0, options.length).sample(rng);
        let color = palette.pick(rng).0;
        let metrics = [radius, length, pair_speed];
        for side in [-0.5, 0.5] {
            out.push(LightInstance {
                offset: [lane_x + car_width * side, offset_y, offset_z],
                metrics,
                color,
            });
        }
    }
    out
}

/// Smooth Hermite step that also runs backwards when `a > b`.
#[inline]
pub fn fade_step(a: f32, b: f32, x: f32) -> f32 {
    if a == b {
        return if x < a { 0.0 } else { 1.0 };
    }
    let t = ((x - a) / (b - a)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}
