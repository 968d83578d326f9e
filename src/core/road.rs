use super::geometry::{floor_grid, Mesh};
use super::scene::FrameHook;
use crate::config::HyperspeedOptions;
use crate::constants::{BROKEN_LINES_PER_WRAP, ROAD_MARKING_SCROLL, ROAD_SEGMENTS_X, ROAD_SEGMENTS_Z};

/// Uniforms shared by all three road surfaces; mirrors `struct Road` in `road.wgsl`.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct RoadUniforms {
    pub broken_color: [f32; 4],
    pub shoulder_color: [f32; 4],
    pub lanes: f32,
    pub broken_width: f32,
    pub broken_length: f32,
    pub shoulder_width: f32,
    pub time: f32,
    pub travel_length: f32,
    pub scroll: f32,
    pub dashes: f32,
}

/// Per-surface uniforms; mirrors `struct Surface` in `road.wgsl`.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SurfaceUniforms {
    pub color: [f32; 4],
    /// 1.0 draws lane markings, 0.0 leaves the surface plain.
    pub markings: f32,
    pub _pad: [f32; 3],
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SurfacePart {
    LeftRoad,
    RightRoad,
    Island,
}

#[derive(Clone, Debug)]
pub struct RoadPiece {
    pub part: SurfacePart,
    pub center_x: f32,
    pub mesh: Mesh,
    pub uniforms: SurfaceUniforms,
}

/// Left road, right road and center island, sharing one time uniform.
#[derive(Clone, Debug)]
pub struct RoadSurface {
    pub pieces: Vec<RoadPiece>,
    pub uniforms: RoadUniforms,
}

impl RoadSurface {
    pub fn build(options: &HyperspeedOptions) -> Self {
        let colors = &options.colors;
        let side_x = options.island_width * 0.5 + options.road_width * 0.5;
        let road_piece = |part, center_x: f32| RoadPiece {
            part,
            center_x,
            mesh: floor_grid(
                center_x,
                options.road_width,
                options.length,
                ROAD_SEGMENTS_X,
                ROAD_SEGMENTS_Z,
            ),
            uniforms: SurfaceUniforms {
                color: colors.road_color.to_array4(1.0),
                markings: 1.0,
                _pad: [0.0; 3],
            },
        };
        let mut pieces = vec![
            road_piece(SurfacePart::LeftRoad, -side_x),
            road_piece(SurfacePart::RightRoad, side_x),
        ];
        // A zero-width island has nothing to draw.
        if options.island_width > 0.0 {
            pieces.push(RoadPiece {
                part: SurfacePart::Island,
                center_x: 0.0,
                mesh: floor_grid(
                    0.0,
                    options.island_width,
                    options.length,
                    ROAD_SEGMENTS_X,
                    ROAD_SEGMENTS_Z,
                ),
                uniforms: SurfaceUniforms {
                    color: colors.island_color.to_array4(1.0),
                    markings: 0.0,
                    _pad: [0.0; 3],
                },
            });
        }
        Self {
            pieces,
            uniforms: RoadUniforms {
                broken_color: colors.broken_lines.to_array4(1.0),
                shoulder_color: colors.shoulder_lines.to_array4(1.0),
                lanes: options.lanes_per_road as f32,
                broken_width: options.broken_lines_width_percentage,
                broken_length: options.broken_lines_length_percentage,
                shoulder_width: options.shoulder_lines_width_percentage,
                time: 0.0,
                travel_length: options.length,
                scroll: ROAD_MARKING_SCROLL,
                dashes: BROKEN_LINES_PER_WRAP,
            },
        }
    }

    pub fn time(&self) -> f32 {
        self.uniforms.time
    }

    pub fn piece(&self, part: SurfacePart) -> Option<&RoadPiece> {
        self.pieces.iter().find(|p| p.part == part)
    }
}

impl FrameHook for RoadSurface {
    fn update(&mut self, time: f32) {
        self.uniforms.time = time;
    }
}

/// Progress of a road vertex from its along-axis coordinate.
#[inline]
pub fn local_progress(along: f32, travel_length: f32) -> f32 {
    (along + travel_length * 0.5) / travel_length
}
