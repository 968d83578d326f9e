pub mod distortion;
pub mod geometry;
pub mod lights;
pub mod road;
pub mod scene;
pub mod sticks;

pub use distortion::*;
pub use geometry::*;
pub use lights::*;
pub use road::*;
pub use scene::*;
pub use sticks::*;

// Shaders bundled as string constants. `COMMON_WGSL` is prepended to every
// scene shader: it declares the shared bindings and `get_distortion`.
pub static COMMON_WGSL: &str = include_str!("../../shaders/common.wgsl");
pub static ROAD_WGSL: &str = include_str!("../../shaders/road.wgsl");
pub static STREAKS_WGSL: &str = include_str!("../../shaders/streaks.wgsl");
pub static STICKS_WGSL: &str = include_str!("../../shaders/sticks.wgsl");
pub static POST_WGSL: &str = include_str!("../../shaders/post.wgsl");

/// Full source of a scene shader module (common prelude + body).
pub fn scene_shader_source(body: &str) -> String {
    format!("{COMMON_WGSL}\n{body}")
}

/// GLSL-style `mod`: result has the sign of `y`, so for a positive travel
/// length it always lands in `[0, y)`.
#[inline]
pub fn wrap_travel(x: f32, y: f32) -> f32 {
    x - y * (x / y).floor()
}
