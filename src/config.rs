//! Mount-time configuration.
//!
//! The host passes a (possibly partial) JSON object; every field missing from
//! it falls back to the defaults below. Options are validated once and never
//! mutated afterwards.

use crate::core::{DistortionModel, DistortionSpec};
use crate::error::ConfigError;
use rand::Rng;
use serde::Deserialize;

/// A `[min, max]` range sampled uniformly per instance.
///
/// `min > max` is allowed; sampling simply runs the other way.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(from = "SpanRepr")]
pub struct Span {
    pub min: f32,
    pub max: f32,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SpanRepr {
    Pair([f32; 2]),
    Scalar(f32),
}

impl From<SpanRepr> for Span {
    fn from(r: SpanRepr) -> Self {
        match r {
            SpanRepr::Pair([min, max]) => Span { min, max },
            SpanRepr::Scalar(v) => Span { min: v, max: v },
        }
    }
}

impl Span {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    #[inline]
    pub fn sample(&self, rng: &mut impl Rng) -> f32 {
        self.min + rng.gen::<f32>() * (self.max - self.min)
    }

    #[inline]
    pub fn contains(&self, v: f32) -> bool {
        let (lo, hi) = if self.min <= self.max {
            (self.min, self.max)
        } else {
            (self.max, self.min)
        };
        v >= lo && v <= hi
    }

    fn is_finite(&self) -> bool {
        self.min.is_finite() && self.max.is_finite()
    }
}

/// Linear-space RGB color, parsed from `0xRRGGBB` or `"#rrggbb"`.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(try_from = "ColorRepr")]
pub struct Rgb(pub [f32; 3]);

#[derive(Deserialize)]
#[serde(untagged)]
enum ColorRepr {
    Hex(u32),
    Css(String),
}

impl TryFrom<ColorRepr> for Rgb {
    type Error = ConfigError;

    fn try_from(r: ColorRepr) -> Result<Self, Self::Error> {
        match r {
            ColorRepr::Hex(v) if v <= 0xff_ffff => Ok(Rgb::from_hex(v)),
            ColorRepr::Hex(v) => Err(ConfigError::InvalidColor(format!("{v:#x}"))),
            ColorRepr::Css(s) => {
                let digits = s.trim().trim_start_matches('#');
                if digits.len() != 6 {
                    return Err(ConfigError::InvalidColor(s));
                }
                u32::from_str_radix(digits, 16)
                    .map(Rgb::from_hex)
                    .map_err(|_| ConfigError::InvalidColor(s))
            }
        }
    }
}

impl Rgb {
    pub fn from_hex(hex: u32) -> Self {
        let channel = |shift: u32| srgb_to_linear(((hex >> shift) & 0xff) as f32 / 255.0);
        Rgb([channel(16), channel(8), channel(0)])
    }

    pub fn to_array4(self, a: f32) -> [f32; 4] {
        [self.0[0], self.0[1], self.0[2], a]
    }
}

#[inline]
pub fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// One color or a list to pick from per instance.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(from = "PaletteRepr")]
pub struct Palette(pub Vec<Rgb>);

#[derive(Deserialize)]
#[serde(untagged)]
enum PaletteRepr {
    One(Rgb),
    Many(Vec<Rgb>),
}

impl From<PaletteRepr> for Palette {
    fn from(r: PaletteRepr) -> Self {
        match r {
            PaletteRepr::One(c) => Palette(vec![c]),
            PaletteRepr::Many(v) => Palette(v),
        }
    }
}

impl Palette {
    pub fn from_hex(hex: &[u32]) -> Self {
        Palette(hex.iter().copied().map(Rgb::from_hex).collect())
    }

    /// Uniform pick. Validation guarantees the palette is non-empty.
    pub fn pick(&self, rng: &mut impl Rng) -> Rgb {
        match self.0.len() {
            0 => Rgb([1.0, 1.0, 1.0]),
            n => self.0[rng.gen_range(0..n)],
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Colors {
    pub road_color: Rgb,
    pub island_color: Rgb,
    pub background: Rgb,
    pub shoulder_lines: Rgb,
    pub broken_lines: Rgb,
    pub left_cars: Palette,
    pub right_cars: Palette,
    pub sticks: Palette,
}

impl Default for Colors {
    fn default() -> Self {
        Self {
            road_color: Rgb::from_hex(0x080808),
            island_color: Rgb::from_hex(0x0a0a0a),
            background: Rgb::from_hex(0x000000),
            shoulder_lines: Rgb::from_hex(0xffffff),
            broken_lines: Rgb::from_hex(0xffffff),
            left_cars: Palette::from_hex(&[0xd856bf, 0x6750a2, 0xc247ac]),
            right_cars: Palette::from_hex(&[0x03b3c3, 0x0e5ea5, 0x324555]),
            sticks: Palette::from_hex(&[0x03b3c3]),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct BloomOptions {
    pub strength: f32,
    pub threshold: f32,
}

impl Default for BloomOptions {
    fn default() -> Self {
        Self {
            strength: crate::constants::BLOOM_STRENGTH,
            threshold: crate::constants::BLOOM_THRESHOLD,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HyperspeedOptions {
    pub distortion: DistortionSpec,
    pub length: f32,
    pub road_width: f32,
    pub island_width: f32,
    pub lanes_per_road: u32,
    pub fov: f32,
    pub fov_speed_up: f32,
    pub speed_up: f32,
    pub car_lights_fade: f32,
    pub total_side_light_sticks: u32,
    #[serde(alias = "lightPairsPerRoadway")]
    pub light_pairs_per_road_way: u32,
    pub shoulder_lines_width_percentage: f32,
    pub broken_lines_width_percentage: f32,
    pub broken_lines_length_percentage: f32,
    pub light_stick_width: Span,
    pub light_stick_height: Span,
    pub moving_away_speed: Span,
    pub moving_closer_speed: Span,
    pub car_lights_length: Span,
    pub car_lights_radius: Span,
    pub car_width_percentage: Span,
    pub car_shift_x: Span,
    pub car_floor_separation: Span,
    pub side_sticks_speed: f32,
    pub seed: Option<u64>,
    pub bloom: BloomOptions,
    pub colors: Colors,
}

impl Default for HyperspeedOptions {
    fn default() -> Self {
        Self {
            distortion: DistortionSpec::default(),
            length: 400.0,
            road_width: 10.0,
            island_width: 2.0,
            lanes_per_road: 4,
            fov: 90.0,
            fov_speed_up: 150.0,
            speed_up: 2.0,
            car_lights_fade: 0.4,
            total_side_light_sticks: 20,
            light_pairs_per_road_way: 40,
            shoulder_lines_width_percentage: 0.05,
            broken_lines_width_percentage: 0.1,
            broken_lines_length_percentage: 0.5,
            light_stick_width: Span::new(0.12, 0.5),
            light_stick_height: Span::new(1.3, 1.7),
            moving_away_speed: Span::new(60.0, 80.0),
            moving_closer_speed: Span::new(-120.0, -160.0),
            car_lights_length: Span::new(400.0 * 0.03, 400.0 * 0.2),
            car_lights_radius: Span::new(0.05, 0.14),
            car_width_percentage: Span::new(0.3, 0.5),
            car_shift_x: Span::new(-0.8, 0.8),
            car_floor_separation: Span::new(0.0, 5.0),
            side_sticks_speed: 120.0,
            seed: None,
            bloom: BloomOptions::default(),
            colors: Colors::default(),
        }
    }
}

impl HyperspeedOptions {
    /// Parse a partial options object and validate the merged result.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let trimmed = json.trim();
        let options: Self = if trimmed.is_empty() || trimmed == "null" {
            Self::default()
        } else {
            serde_json::from_str(trimmed)?
        };
        options.validate()?;
        Ok(options)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("length", self.length)?;
        positive("roadWidth", self.road_width)?;
        positive("lanesPerRoad", self.lanes_per_road as f32)?;
        positive("lightPairsPerRoadWay", self.light_pairs_per_road_way as f32)?;
        positive("totalSideLightSticks", self.total_side_light_sticks as f32)?;
        positive("fov", self.fov)?;
        positive("fovSpeedUp", self.fov_speed_up)?;
        if !(self.island_width >= 0.0 && self.island_width.is_finite()) {
            return Err(out_of_range("islandWidth", self.island_width));
        }
        if self.fov >= 180.0 {
            return Err(out_of_range("fov", self.fov));
        }
        if self.fov_speed_up >= 180.0 {
            return Err(out_of_range("fovSpeedUp", self.fov_speed_up));
        }
        for (field, v) in [
            ("speedUp", self.speed_up),
            ("sideSticksSpeed", self.side_sticks_speed),
            ("bloom.strength", self.bloom.strength),
            ("bloom.threshold", self.bloom.threshold),
        ] {
            if !v.is_finite() {
                return Err(out_of_range(field, v));
            }
        }
        for (field, v) in [
            ("carLightsFade", self.car_lights_fade),
            ("shoulderLinesWidthPercentage", self.shoulder_lines_width_percentage),
            ("brokenLinesWidthPercentage", self.broken_lines_width_percentage),
            ("brokenLinesLengthPercentage", self.broken_lines_length_percentage),
        ] {
            if !(0.0..=1.0).contains(&v) {
                return Err(out_of_range(field, v));
            }
        }
        for (field, span) in [
            ("lightStickWidth", self.light_stick_width),
            ("lightStickHeight", self.light_stick_height),
            ("carLightsLength", self.car_lights_length),
            ("carLightsRadius", self.car_lights_radius),
        ] {
            positive(field, span.min)?;
            positive(field, span.max)?;
        }
        for (field, span) in [
            ("movingAwaySpeed", self.moving_away_speed),
            ("movingCloserSpeed", self.moving_closer_speed),
            ("carWidthPercentage", self.car_width_percentage),
            ("carShiftX", self.car_shift_x),
            ("carFloorSeparation", self.car_floor_separation),
        ] {
            if !span.is_finite() {
                return Err(out_of_range(field, f32::NAN));
            }
        }
        for (field, palette) in [
            ("colors.leftCars", &self.colors.left_cars),
            ("colors.rightCars", &self.colors.right_cars),
            ("colors.sticks", &self.colors.sticks),
        ] {
            if palette.0.is_empty() {
                return Err(ConfigError::OutOfRange { field, value: 0.0 });
            }
        }
        self.distortion_model().map(|_| ())
    }

    /// Resolve the configured distortion, by registry name or inline.
    pub fn distortion_model(&self) -> Result<DistortionModel, ConfigError> {
        DistortionModel::from_spec(&self.distortion)
    }

    /// Width of a single lane in world units.
    pub fn lane_width(&self) -> f32 {
        self.road_width / self.lanes_per_road as f32
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NonPositive {
            field,
            value: value as f64,
        })
    }
}

fn out_of_range(field: &'static str, value: f32) -> ConfigError {
    ConfigError::OutOfRange {
        field,
        value: value as f64,
    }
}
