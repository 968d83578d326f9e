//! Scene draw layers: road surfaces, roadside sticks and the two light-streak
//! fields, all sharing the frame globals and distortion uniforms in group 0.

use super::helpers::{self, GpuMesh, ScenePipelineDesc, ADDITIVE};
use crate::camera::Camera;
use crate::constants::{FOG_FAR_FACTOR, FOG_NEAR_FACTOR};
use crate::core::{
    scene_shader_source, LightInstance, LightStreakField, Scene, StickInstance, ROAD_WGSL,
    STICKS_WGSL, STREAKS_WGSL,
};
use wgpu::util::DeviceExt;

/// Mirrors `struct Globals` in `common.wgsl`.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub(crate) struct SceneGlobals {
    pub(crate) view_proj: [[f32; 4]; 4],
    pub(crate) camera_pos: [f32; 4],
    pub(crate) fog_color: [f32; 4],
    pub(crate) fog: [f32; 4],
}

impl SceneGlobals {
    pub(crate) fn new(scene: &Scene, camera: &Camera) -> Self {
        let l = scene.travel_length;
        Self {
            view_proj: camera.view_proj().to_cols_array_2d(),
            camera_pos: camera.eye.extend(1.0).to_array(),
            fog_color: scene.background.to_array4(1.0),
            fog: [l * FOG_NEAR_FACTOR, l * FOG_FAR_FACTOR, 0.0, 0.0],
        }
    }
}

const LIGHT_ATTRIBUTES: [wgpu::VertexAttribute; 3] =
    wgpu::vertex_attr_array![2 => Float32x3, 3 => Float32x3, 4 => Float32x3];
const STICK_ATTRIBUTES: [wgpu::VertexAttribute; 3] =
    wgpu::vertex_attr_array![2 => Float32, 3 => Float32x2, 4 => Float32x3];

fn instance_layout<T>(attributes: &'static [wgpu::VertexAttribute]) -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<T>() as u64,
        step_mode: wgpu::VertexStepMode::Instance,
        attributes,
    }
}

struct Instanced {
    mesh: GpuMesh,
    instances: wgpu::Buffer,
    count: u32,
    uniforms: wgpu::Buffer,
    group: wgpu::BindGroup,
}

impl Instanced {
    fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        if self.count == 0 {
            return;
        }
        pass.set_bind_group(1, &self.group, &[]);
        pass.set_vertex_buffer(0, self.mesh.vertices.slice(..));
        pass.set_vertex_buffer(1, self.instances.slice(..));
        pass.set_index_buffer(self.mesh.indices.slice(..), wgpu::IndexFormat::Uint32);
        pass.draw_indexed(0..self.mesh.index_count, 0, 0..self.count);
    }

    fn destroy(&self) {
        self.mesh.destroy();
        self.instances.destroy();
        self.uniforms.destroy();
    }
}

struct RoadPieceGpu {
    mesh: GpuMesh,
    uniforms: wgpu::Buffer,
    group: wgpu::BindGroup,
}

pub(crate) struct SceneLayers {
    globals: wgpu::Buffer,
    distortion: wgpu::Buffer,
    shared_group: wgpu::BindGroup,

    road_pipeline: wgpu::RenderPipeline,
    road_uniforms: wgpu::Buffer,
    road_group: wgpu::BindGroup,
    road_pieces: Vec<RoadPieceGpu>,

    sticks_pipeline: wgpu::RenderPipeline,
    sticks: Instanced,

    streaks_pipeline: wgpu::RenderPipeline,
    away: Instanced,
    closer: Instanced,
}

impl SceneLayers {
    pub(crate) fn new(device: &wgpu::Device, scene: &Scene) -> Self {
        let vf = wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT;
        let shared_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("scene_shared_bgl"),
            entries: &[
                helpers::uniform_layout_entry(0, vf),
                helpers::uniform_layout_entry(1, wgpu::ShaderStages::VERTEX),
            ],
        });
        let local_layout = helpers::single_uniform_layout(device, "scene_local_bgl");

        // Globals depend on the camera and are written before every draw.
        let globals = helpers::uniform_buffer(device, "globals", &<SceneGlobals as bytemuck::Zeroable>::zeroed());
        let distortion = helpers::uniform_buffer(device, "distortion", &scene.distortion.uniforms());
        let shared_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("scene_shared_bg"),
            layout: &shared_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: globals.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: distortion.as_entire_binding(),
                },
            ],
        });

        // Road
        let road_shader = shader(device, "road_shader", ROAD_WGSL);
        let road_pl = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("road_pl"),
            bind_group_layouts: &[&shared_layout, &local_layout, &local_layout],
            push_constant_ranges: &[],
        });
        let road_pipeline = helpers::make_scene_pipeline(
            device,
            ScenePipelineDesc {
                label: "road_pipeline",
                layout: &road_pl,
                shader: &road_shader,
                buffers: &[helpers::mesh_layout()],
                blend: None,
                depth_write: true,
                cull_mode: None,
            },
        );
        let road_uniforms = helpers::uniform_buffer(device, "road_uniforms", &scene.road.uniforms);
        let road_group = helpers::single_uniform_group(device, "road_bg", &local_layout, &road_uniforms);
        let road_pieces = scene
            .road
            .pieces
            .iter()
            .map(|piece| {
                let uniforms = helpers::uniform_buffer(device, "surface_uniforms", &piece.uniforms);
                let group = helpers::single_uniform_group(device, "surface_bg", &local_layout, &uniforms);
                RoadPieceGpu {
                    mesh: GpuMesh::upload(device, "road_mesh", &piece.mesh),
                    uniforms,
                    group,
                }
            })
            .collect();

        // Sticks
        let sticks_shader = shader(device, "sticks_shader", STICKS_WGSL);
        let instanced_pl = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("instanced_pl"),
            bind_group_layouts: &[&shared_layout, &local_layout],
            push_constant_ranges: &[],
        });
        let sticks_pipeline = helpers::make_scene_pipeline(
            device,
            ScenePipelineDesc {
                label: "sticks_pipeline",
                layout: &instanced_pl,
                shader: &sticks_shader,
                buffers: &[
                    helpers::mesh_layout(),
                    instance_layout::<StickInstance>(&STICK_ATTRIBUTES),
                ],
                blend: None,
                depth_write: true,
                cull_mode: None,
            },
        );
        let stick_uniforms = helpers::uniform_buffer(device, "stick_uniforms", &scene.sticks.uniforms);
        let sticks = Instanced {
            mesh: GpuMesh::upload(device, "stick_mesh", &scene.sticks.mesh),
            instances: device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("stick_instances"),
                contents: bytemuck::cast_slice(scene.sticks.instances()),
                usage: wgpu::BufferUsages::VERTEX,
            }),
            count: scene.sticks.instance_count(),
            group: helpers::single_uniform_group(device, "stick_bg", &local_layout, &stick_uniforms),
            uniforms: stick_uniforms,
        };

        // Light streaks
        let streaks_shader = shader(device, "streaks_shader", STREAKS_WGSL);
        let streaks_pipeline = helpers::make_scene_pipeline(
            device,
            ScenePipelineDesc {
                label: "streaks_pipeline",
                layout: &instanced_pl,
                shader: &streaks_shader,
                buffers: &[
                    helpers::mesh_layout(),
                    instance_layout::<LightInstance>(&LIGHT_ATTRIBUTES),
                ],
                blend: Some(ADDITIVE),
                depth_write: false,
                cull_mode: None,
            },
        );
        let away = streak_layer(device, &local_layout, &scene.away, "away");
        let closer = streak_layer(device, &local_layout, &scene.closer, "closer");

        Self {
            globals,
            distortion,
            shared_group,
            road_pipeline,
            road_uniforms,
            road_group,
            road_pieces,
            sticks_pipeline,
            sticks,
            streaks_pipeline,
            away,
            closer,
        }
    }

    /// Per-frame uniform upload. Geometry and instance buffers never change.
    pub(crate) fn write(&self, queue: &wgpu::Queue, scene: &Scene, camera: &Camera) {
        queue.write_buffer(&self.globals, 0, bytemuck::bytes_of(&SceneGlobals::new(scene, camera)));
        queue.write_buffer(&self.distortion, 0, bytemuck::bytes_of(&scene.distortion.uniforms()));
        queue.write_buffer(&self.road_uniforms, 0, bytemuck::bytes_of(&scene.road.uniforms));
        queue.write_buffer(&self.sticks.uniforms, 0, bytemuck::bytes_of(&scene.sticks.uniforms));
        queue.write_buffer(&self.away.uniforms, 0, bytemuck::bytes_of(&scene.away.uniforms));
        queue.write_buffer(&self.closer.uniforms, 0, bytemuck::bytes_of(&scene.closer.uniforms));
    }

    /// Opaque layers first, then additive streaks over them.
    pub(crate) fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        pass.set_bind_group(0, &self.shared_group, &[]);

        pass.set_pipeline(&self.road_pipeline);
        pass.set_bind_group(1, &self.road_group, &[]);
        for piece in &self.road_pieces {
            pass.set_bind_group(2, &piece.group, &[]);
            pass.set_vertex_buffer(0, piece.mesh.vertices.slice(..));
            pass.set_index_buffer(piece.mesh.indices.slice(..), wgpu::IndexFormat::Uint32);
            pass.draw_indexed(0..piece.mesh.index_count, 0, 0..1);
        }

        pass.set_pipeline(&self.sticks_pipeline);
        self.sticks.draw(pass);

        pass.set_pipeline(&self.streaks_pipeline);
        self.away.draw(pass);
        self.closer.draw(pass);
    }

    pub(crate) fn destroy(&self) {
        self.globals.destroy();
        self.distortion.destroy();
        self.road_uniforms.destroy();
        for piece in &self.road_pieces {
            piece.mesh.destroy();
            piece.uniforms.destroy();
        }
        self.sticks.destroy();
        self.away.destroy();
        self.closer.destroy();
    }
}

fn shader(device: &wgpu::Device, label: &str, body: &str) -> wgpu::ShaderModule {
    device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(label),
        source: wgpu::ShaderSource::Wgsl(scene_shader_source(body).into()),
    })
}

fn streak_layer(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    field: &LightStreakField,
    label: &str,
) -> Instanced {
    let uniforms = helpers::uniform_buffer(device, label, &field.uniforms);
    Instanced {
        mesh: GpuMesh::upload(device, label, &field.mesh),
        instances: device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::cast_slice(field.instances()),
            usage: wgpu::BufferUsages::VERTEX,
        }),
        count: field.instance_count(),
        group: helpers::single_uniform_group(device, label, layout, &uniforms),
        uniforms,
    }
}
