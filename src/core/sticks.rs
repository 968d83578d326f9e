use super::geometry::{unit_quad, Mesh};
use super::scene::FrameHook;
use super::wrap_travel;
use crate::config::HyperspeedOptions;
use rand::Rng;

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct StickInstance {
    /// Depth offset along the travel axis.
    pub offset: f32,
    /// Width, height.
    pub metrics: [f32; 2],
    pub color: [f32; 3],
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct StickUniforms {
    pub time: f32,
    pub travel_length: f32,
    pub speed: f32,
    pub x_offset: f32,
}

/// Roadside markers along the left edge.
#[derive(Clone, Debug)]
pub struct SideStickField {
    pub mesh: Mesh,
    instances: Vec<StickInstance>,
    pub uniforms: StickUniforms,
}

impl SideStickField {
    pub fn build(options: &HyperspeedOptions, rng: &mut impl Rng) -> Self {
        let total = options.total_side_light_sticks as usize;
        let step = stick_spacing(options.length, total);
        let instances = (0..total)
            .map(|i| {
                let width = options.light_stick_width.sample(rng);
                let height = options.light_stick_height.sample(rng);
                StickInstance {
                    offset: i as f32 * step + rng.gen::<f32>() * step,
                    metrics: [width, height],
                    color: options.colors.sticks.pick(rng).0,
                }
            })
            .collect();
        Self {
            mesh: unit_quad(),
            instances,
            uniforms: StickUniforms {
                time: 0.0,
                travel_length: options.length,
                speed: options.side_sticks_speed,
                x_offset: -(options.road_width + options.island_width * 0.5),
            },
        }
    }

    pub fn instances(&self) -> &[StickInstance] {
        &self.instances
    }

    pub fn instance_count(&self) -> u32 {
        self.instances.len() as u32
    }

    pub fn time(&self) -> f32 {
        self.uniforms.time
    }

    /// Wrapped travel of a stick at the field's current time.
    pub fn travel(&self, index: usize) -> Option<f32> {
        let inst = self.instances.get(index)?;
        Some(wrap_travel(
            self.uniforms.time * self.uniforms.speed + inst.offset,
            self.uniforms.travel_length,
        ))
    }
}

impl FrameHook for SideStickField {
    fn update(&mut self, time: f32) {
        self.uniforms.time = time;
    }
}

/// Even spacing between `count` sticks over one travel length.
#[inline]
pub fn stick_spacing(travel_length: f32, count: usize) -> f32 {
    travel_length / count.saturating_sub(1).max(1) as f32
}
