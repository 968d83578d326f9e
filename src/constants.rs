/// Animation and rendering tuning constants.
///
/// These constants express intended behavior (e.g., time constants, clamp
/// limits) and keep magic numbers out of the code.
// Easing: fraction of the remaining gap closed within `EASE_SETTLE_SEC`
pub const EASE_CONVERGENCE: f32 = 0.9;
pub const EASE_SETTLE_SEC: f32 = 0.1;

// Remaining gap, relative to the target's magnitude (at least 1), below which
// eased values snap to their target
pub const EASE_SNAP_EPSILON: f32 = 1e-5;

// Minimum FOV change (degrees) that triggers a projection update
pub const FOV_EPSILON_DEG: f32 = 1e-3;

// Camera
pub const CAMERA_EYE: [f32; 3] = [0.0, 8.0, -5.0];
pub const CAMERA_NEAR: f32 = 0.1;
pub const CAMERA_FAR: f32 = 10_000.0;

// Road grid resolution (lateral x longitudinal)
pub const ROAD_SEGMENTS_X: u32 = 20;
pub const ROAD_SEGMENTS_Z: u32 = 100;

// Lane-marking scroll rate (uv units per render-time second)
pub const ROAD_MARKING_SCROLL: f32 = 0.05;
pub const BROKEN_LINES_PER_WRAP: f32 = 10.0;

// Car light tube resolution
pub const TUBE_SEGMENTS: u32 = 40;
pub const TUBE_RADIAL_SEGMENTS: u32 = 8;

// Car lights hover above the floor by this multiple of their radius
pub const CAR_LIGHT_LIFT: f32 = 1.3;

// Fragments dimmer than this are discarded
pub const ALPHA_DISCARD: f32 = 1e-4;

// Fog range as multiples of the travel length
pub const FOG_NEAR_FACTOR: f32 = 0.2;
pub const FOG_FAR_FACTOR: f32 = 500.0;

// Post-processing defaults
pub const BLOOM_STRENGTH: f32 = 1.0;
pub const BLOOM_THRESHOLD: f32 = 0.2;

/// Rate constant `k` of the exponential ease `exp(-k * dt)`.
#[inline]
pub fn ease_rate() -> f32 {
    -(1.0 - EASE_CONVERGENCE).ln() / EASE_SETTLE_SEC
}
