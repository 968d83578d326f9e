//! Road distortion models.
//!
//! A model is a formula family plus its parameters. The GPU evaluates it from
//! the packed [`DistortionUniforms`] block through `get_distortion` in
//! `common.wgsl`; the CPU evaluates the same formula through
//! [`DistortionModel::displace`] to aim the camera along the bent road.

use crate::error::ConfigError;
use glam::{Vec2, Vec3, Vec4};
use serde::Deserialize;
use std::f32::consts::{FRAC_PI_2, PI};

/// Progress at which the camera samples the road ahead.
pub const LOOK_AHEAD_PROGRESS: f32 = 0.025;

/// Names accepted by [`DistortionModel::named`].
pub const DISTORTION_NAMES: [&str; 7] = [
    "mountainDistortion",
    "xyDistortion",
    "LongRaceDistortion",
    "turbulentDistortion",
    "turbulentDistortionStill",
    "deepDistortion",
    "deepDistortionStill",
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DistortionKind {
    Mountain,
    Xy,
    LongRace,
    Turbulent,
    Deep,
}

impl DistortionKind {
    /// Discriminant shared with the `switch` in `common.wgsl`.
    pub fn id(self) -> u32 {
        match self {
            DistortionKind::Mountain => 0,
            DistortionKind::Xy => 1,
            DistortionKind::LongRace => 2,
            DistortionKind::Turbulent => 3,
            DistortionKind::Deep => 4,
        }
    }

    /// Inverse of [`DistortionKind::id`]; `None` for ids the shader treats as flat.
    pub fn from_id(id: u32) -> Option<Self> {
        match id {
            0 => Some(DistortionKind::Mountain),
            1 => Some(DistortionKind::Xy),
            2 => Some(DistortionKind::LongRace),
            3 => Some(DistortionKind::Turbulent),
            4 => Some(DistortionKind::Deep),
            _ => None,
        }
    }

    pub fn parse(s: &str) -> Result<Self, ConfigError> {
        match s {
            "mountain" => Ok(DistortionKind::Mountain),
            "xy" => Ok(DistortionKind::Xy),
            "longRace" => Ok(DistortionKind::LongRace),
            "turbulent" => Ok(DistortionKind::Turbulent),
            "deep" => Ok(DistortionKind::Deep),
            other => Err(ConfigError::UnknownKind(other.to_string())),
        }
    }
}

/// How the camera aims along a model's road.
///
/// With `slope_step = Some(h)` the aim follows the local slope
/// `raw(p) - raw(p + h)`; otherwise it follows `displace(p)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraAim {
    pub progress: f32,
    pub amplitude: Vec3,
    pub offset: Vec3,
    pub slope_step: Option<f32>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct DistortionModel {
    pub name: String,
    pub kind: DistortionKind,
    pub freq: Vec4,
    pub amp: Vec4,
    pub pow_y: Vec2,
    /// Progress pinned to zero displacement so the road stays under the camera.
    pub anchor: f32,
    /// Multiplier on time; `0.0` freezes the road shape.
    pub time_scale: f32,
    pub camera: CameraAim,
}

#[inline]
fn nsin(v: f32) -> f32 {
    v.sin() * 0.5 + 0.5
}

impl DistortionModel {
    /// Default parameters of a formula family.
    pub fn preset(kind: DistortionKind) -> Self {
        let aim = |amplitude: Vec3, offset: Vec3, slope_step: Option<f32>| CameraAim {
            progress: LOOK_AHEAD_PROGRESS,
            amplitude,
            offset,
            slope_step,
        };
        match kind {
            DistortionKind::Mountain => Self {
                name: "mountainDistortion".into(),
                kind,
                freq: Vec4::new(3.0, 6.0, 10.0, 0.0),
                amp: Vec4::new(30.0, 30.0, 20.0, 0.0),
                pow_y: Vec2::ZERO,
                anchor: 0.02,
                time_scale: 1.0,
                camera: aim(Vec3::new(2.0, 2.0, 2.0), Vec3::new(0.0, 0.0, -5.0), None),
            },
            DistortionKind::Xy => Self {
                name: "xyDistortion".into(),
                kind,
                freq: Vec4::new(5.0, 2.0, 0.0, 0.0),
                amp: Vec4::new(25.0, 15.0, 0.0, 0.0),
                pow_y: Vec2::ZERO,
                anchor: 0.02,
                time_scale: 1.0,
                camera: aim(Vec3::new(2.0, 0.4, 1.0), Vec3::new(0.0, 0.0, -3.0), None),
            },
            DistortionKind::LongRace => Self {
                name: "LongRaceDistortion".into(),
                kind,
                freq: Vec4::new(2.0, 3.0, 0.0, 0.0),
                amp: Vec4::new(35.0, 10.0, 0.0, 0.0),
                pow_y: Vec2::ZERO,
                anchor: 0.0125,
                time_scale: 1.0,
                camera: aim(Vec3::new(1.0, 1.0, 0.0), Vec3::new(0.0, 0.0, -5.0), None),
            },
            DistortionKind::Turbulent => Self {
                name: "turbulentDistortion".into(),
                kind,
                freq: Vec4::new(4.0, 8.0, 8.0, 1.0),
                amp: Vec4::new(25.0, 5.0, 10.0, 10.0),
                pow_y: Vec2::ZERO,
                anchor: 0.0125,
                time_scale: 1.0,
                camera: aim(
                    Vec3::new(-2.0, -5.0, 0.0),
                    Vec3::new(0.0, 0.0, -10.0),
                    Some(0.007),
                ),
            },
            DistortionKind::Deep => Self {
                name: "deepDistortion".into(),
                kind,
                freq: Vec4::new(4.0, 8.0, 0.0, 0.0),
                amp: Vec4::new(10.0, 20.0, 0.0, 0.0),
                pow_y: Vec2::new(20.0, 2.0),
                anchor: 0.02,
                time_scale: 1.0,
                camera: aim(
                    Vec3::new(-2.0, -4.0, 0.0),
                    Vec3::new(0.0, 0.0, -10.0),
                    Some(0.01),
                ),
            },
        }
    }

    /// Look up a model from the fixed registry.
    pub fn named(name: &str) -> Result<Self, ConfigError> {
        let (kind, still) = match name {
            "mountainDistortion" => (DistortionKind::Mountain, false),
            "xyDistortion" => (DistortionKind::Xy, false),
            "LongRaceDistortion" => (DistortionKind::LongRace, false),
            "turbulentDistortion" => (DistortionKind::Turbulent, false),
            "turbulentDistortionStill" => (DistortionKind::Turbulent, true),
            "deepDistortion" => (DistortionKind::Deep, false),
            "deepDistortionStill" => (DistortionKind::Deep, true),
            other => return Err(ConfigError::UnknownDistortion(other.to_string())),
        };
        let mut model = Self::preset(kind);
        model.name = name.to_string();
        if still {
            model.time_scale = 0.0;
        }
        Ok(model)
    }

    pub fn from_spec(spec: &DistortionSpec) -> Result<Self, ConfigError> {
        match spec {
            DistortionSpec::Named(name) => Self::named(name),
            DistortionSpec::Inline(inline) => inline.resolve(),
        }
    }

    /// Undisplaced formula value; `time` is render time before scaling.
    pub fn raw(&self, p: f32, time: f32) -> Vec3 {
        let t = time * self.time_scale;
        let (f, a) = (self.freq, self.amp);
        match self.kind {
            DistortionKind::Mountain => Vec3::new(
                (p * PI * f.x + t).cos() * a.x,
                nsin(p * PI * f.y + t) * a.y,
                nsin(p * PI * f.z + t) * a.z,
            ),
            DistortionKind::Xy => Vec3::new(
                (p * PI * f.x + t).cos() * a.x,
                (p * PI * f.y + FRAC_PI_2 + t).sin() * a.y,
                0.0,
            ),
            DistortionKind::LongRace => Vec3::new(
                (p * PI * f.x + t).sin() * a.x,
                (p * PI * f.y + t).sin() * a.y,
                0.0,
            ),
            DistortionKind::Turbulent => {
                let swing = (PI * p * f.y + t * (f.y / f.x)).cos();
                let dip = nsin(PI * p * f.w + t / (f.z / f.w));
                Vec3::new(
                    (PI * p * f.x + t).cos() * a.x + swing * swing * a.y,
                    -nsin(PI * p * f.z + t) * a.z - dip.powi(5) * a.w,
                    0.0,
                )
            }
            DistortionKind::Deep => {
                let base = (p * self.pow_y.x).abs();
                let rise = if base > 0.0 { base.powf(self.pow_y.y) } else { 0.0 };
                Vec3::new(
                    (p * PI * f.x + t).sin() * a.x,
                    rise + (p * PI * f.y + t).sin() * a.y,
                    0.0,
                )
            }
        }
    }

    /// Displacement applied to geometry at `progress`. Zero at the anchor.
    pub fn displace(&self, progress: f32, time: f32) -> Vec3 {
        self.raw(progress, time) - self.raw(self.anchor, time)
    }

    /// CPU counterpart of the shader's `get_distortion(progress, time)`.
    #[inline]
    pub fn cpu_evaluate(&self, progress: f32, time: f32) -> Vec3 {
        self.displace(progress, time)
    }

    /// Vector from the camera eye to its aiming point at `time`.
    pub fn look_at(&self, time: f32) -> Vec3 {
        let aim = &self.camera;
        let v = match aim.slope_step {
            Some(h) => self.raw(aim.progress, time) - self.raw(aim.progress + h, time),
            None => self.displace(aim.progress, time),
        };
        v * aim.amplitude + aim.offset
    }

    pub fn uniforms(&self) -> DistortionUniforms {
        DistortionUniforms {
            freq: self.freq.to_array(),
            amp: self.amp.to_array(),
            params: [self.pow_y.x, self.pow_y.y, self.anchor, self.time_scale],
            kind: self.kind.id(),
            _pad: [0; 3],
        }
    }
}

/// GPU layout of a model; mirrors `struct Distortion` in `common.wgsl`.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct DistortionUniforms {
    pub freq: [f32; 4],
    pub amp: [f32; 4],
    /// pow_y.x, pow_y.y, anchor, time_scale
    pub params: [f32; 4],
    pub kind: u32,
    pub _pad: [u32; 3],
}

impl DistortionUniforms {
    /// Line-for-line port of `get_distortion` in `common.wgsl`, reading only
    /// the packed block the GPU sees.
    pub fn shader_mirror(&self, progress: f32, time: f32) -> [f32; 3] {
        let raw = |p: f32| -> [f32; 3] {
            let t = time * self.params[3];
            let f = self.freq;
            let a = self.amp;
            let ns = |v: f32| v.sin() * 0.5 + 0.5;
            match DistortionKind::from_id(self.kind) {
                Some(DistortionKind::Mountain) => [
                    (p * PI * f[0] + t).cos() * a[0],
                    ns(p * PI * f[1] + t) * a[1],
                    ns(p * PI * f[2] + t) * a[2],
                ],
                Some(DistortionKind::Xy) => [
                    (p * PI * f[0] + t).cos() * a[0],
                    (p * PI * f[1] + PI / 2.0 + t).sin() * a[1],
                    0.0,
                ],
                Some(DistortionKind::LongRace) => [
                    (p * PI * f[0] + t).sin() * a[0],
                    (p * PI * f[1] + t).sin() * a[1],
                    0.0,
                ],
                Some(DistortionKind::Turbulent) => {
                    let c = (PI * p * f[1] + t * (f[1] / f[0])).cos();
                    let n = ns(PI * p * f[3] + t / (f[2] / f[3]));
                    [
                        (PI * p * f[0] + t).cos() * a[0] + c * c * a[1],
                        -ns(PI * p * f[2] + t) * a[2] - n * n * n * n * n * a[3],
                        0.0,
                    ]
                }
                Some(DistortionKind::Deep) => {
                    let ax = (p * self.params[0]).abs();
                    let py = if ax > 0.0 { ax.powf(self.params[1]) } else { 0.0 };
                    [
                        (p * PI * f[0] + t).sin() * a[0],
                        py + (p * PI * f[1] + t).sin() * a[1],
                        0.0,
                    ]
                }
                None => [0.0; 3],
            }
        };
        let d = raw(progress);
        let o = raw(self.params[2]);
        [d[0] - o[0], d[1] - o[1], d[2] - o[2]]
    }
}

/// Distortion as written in the options: a registry name or an inline model.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum DistortionSpec {
    Named(String),
    Inline(InlineDistortion),
}

impl Default for DistortionSpec {
    fn default() -> Self {
        DistortionSpec::Named("turbulentDistortion".to_string())
    }
}

/// Inline model: a family preset with any parameter overridden.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InlineDistortion {
    pub kind: String,
    pub name: Option<String>,
    pub freq: Option<Vec<f32>>,
    pub amp: Option<Vec<f32>>,
    pub pow_y: Option<[f32; 2]>,
    pub anchor: Option<f32>,
    pub time_scale: Option<f32>,
    pub look_at_amp: Option<[f32; 3]>,
    pub look_at_offset: Option<[f32; 3]>,
    pub look_at_slope_step: Option<f32>,
}

impl InlineDistortion {
    pub fn resolve(&self) -> Result<DistortionModel, ConfigError> {
        let kind = DistortionKind::parse(&self.kind)?;
        let mut model = DistortionModel::preset(kind);
        model.name = self.name.clone().unwrap_or_else(|| "inline".to_string());
        if let Some(freq) = &self.freq {
            model.freq = vec4_from("distortion.freq", freq)?;
        }
        if let Some(amp) = &self.amp {
            model.amp = vec4_from("distortion.amp", amp)?;
        }
        if let Some([x, y]) = self.pow_y {
            model.pow_y = Vec2::new(x, y);
        }
        if let Some(anchor) = self.anchor {
            model.anchor = anchor;
        }
        if let Some(scale) = self.time_scale {
            model.time_scale = scale;
        }
        if let Some(a) = self.look_at_amp {
            model.camera.amplitude = Vec3::from_array(a);
        }
        if let Some(o) = self.look_at_offset {
            model.camera.offset = Vec3::from_array(o);
        }
        if let Some(h) = self.look_at_slope_step {
            model.camera.slope_step = Some(h);
        }
        // Turbulent divides by freq.x, freq.w and freq.z / freq.w.
        if kind == DistortionKind::Turbulent && [model.freq.x, model.freq.z, model.freq.w].contains(&0.0) {
            return Err(ConfigError::OutOfRange {
                field: "distortion.freq",
                value: 0.0,
            });
        }
        let all = model.freq.to_array().into_iter().chain(model.amp.to_array());
        let scalars = [model.pow_y.x, model.pow_y.y, model.anchor, model.time_scale];
        if !all.chain(scalars).all(f32::is_finite) {
            return Err(ConfigError::OutOfRange {
                field: "distortion",
                value: f64::NAN,
            });
        }
        Ok(model)
    }
}

fn vec4_from(field: &'static str, v: &[f32]) -> Result<Vec4, ConfigError> {
    if v.is_empty() || v.len() > 4 {
        return Err(ConfigError::OutOfRange {
            field,
            value: v.len() as f64,
        });
    }
    let mut out = [0.0; 4];
    out[..v.len()].copy_from_slice(v);
    Ok(Vec4::from_array(out))
}
