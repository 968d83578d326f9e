use super::distortion::DistortionModel;
use super::lights::{LightStreakField, TravelDirection};
use super::road::RoadSurface;
use super::sticks::SideStickField;
use crate::config::{HyperspeedOptions, Rgb};
use crate::error::ConfigError;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Per-frame hook: receives the render time once per tick.
pub trait FrameHook {
    fn update(&mut self, time: f32);
}

/// Everything drawn in a frame, built once per mount.
#[derive(Clone, Debug)]
pub struct Scene {
    pub distortion: DistortionModel,
    pub road: RoadSurface,
    pub away: LightStreakField,
    pub closer: LightStreakField,
    pub sticks: SideStickField,
    pub travel_length: f32,
    pub background: Rgb,
}

impl Scene {
    pub fn build(options: &HyperspeedOptions) -> Result<Self, ConfigError> {
        options.validate()?;
        let distortion = options.distortion_model()?;
        let mut rng = match options.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let road = RoadSurface::build(options);
        let away = LightStreakField::build(options, TravelDirection::Away, &mut rng);
        let closer = LightStreakField::build(options, TravelDirection::Closer, &mut rng);
        let sticks = SideStickField::build(options, &mut rng);
        log::info!(
            "[scene] distortion={} lights={}+{} sticks={}",
            distortion.name,
            away.instance_count(),
            closer.instance_count(),
            sticks.instance_count()
        );
        Ok(Self {
            distortion,
            road,
            away,
            closer,
            sticks,
            travel_length: options.length,
            background: options.colors.background,
        })
    }
}

impl FrameHook for Scene {
    fn update(&mut self, time: f32) {
        self.road.update(time);
        self.away.update(time);
        self.closer.update(time);
        self.sticks.update(time);
    }
}
