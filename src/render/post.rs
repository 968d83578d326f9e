use super::helpers::{self, HDR_FORMAT};
use super::targets::RenderTargets;
use crate::config::BloomOptions;

/// Mirrors `struct Post` in `post.wgsl`.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub(crate) struct PostUniforms {
    pub(crate) resolution: [f32; 2],
    pub(crate) blur_dir: [f32; 2],
    pub(crate) bloom_strength: f32,
    pub(crate) threshold: f32,
    pub(crate) _pad: [f32; 2],
}

// Each pass reads its own uniform buffer: queue writes land before the
// encoder runs, so one shared buffer would leave every pass with the last value.
struct PassUniforms {
    bright: wgpu::Buffer,
    blur_h: wgpu::Buffer,
    blur_v: wgpu::Buffer,
    composite: wgpu::Buffer,
}

/// Size-dependent bind groups, rebuilt whenever the targets are recreated.
struct PostBindGroups {
    bright: wgpu::BindGroup,
    blur_h: wgpu::BindGroup,
    blur_v: wgpu::BindGroup,
    composite: wgpu::BindGroup,
    bloom_only: wgpu::BindGroup,
}

pub(crate) struct PostResources {
    bgl0: wgpu::BindGroupLayout, // tex+sampler+uniform
    bgl1: wgpu::BindGroupLayout, // tex+sampler
    sampler: wgpu::Sampler,
    uniforms: PassUniforms,
    groups: PostBindGroups,
    bright_pipeline: wgpu::RenderPipeline,
    blur_pipeline: wgpu::RenderPipeline,
    composite_pipeline: wgpu::RenderPipeline,
    bloom: BloomOptions,
}

impl PostResources {
    pub(crate) fn new(
        device: &wgpu::Device,
        post_shader: &wgpu::ShaderModule,
        swap_format: wgpu::TextureFormat,
        targets: &RenderTargets,
        size: (u32, u32),
        bloom: BloomOptions,
    ) -> Self {
        let texture_entry = |binding| wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Texture {
                multisampled: false,
                view_dimension: wgpu::TextureViewDimension::D2,
                sample_type: wgpu::TextureSampleType::Float { filterable: true },
            },
            count: None,
        };
        let sampler_entry = |binding| wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
            count: None,
        };
        let bgl0 = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("post_bgl0"),
            entries: &[
                texture_entry(0),
                sampler_entry(1),
                helpers::uniform_layout_entry(2, wgpu::ShaderStages::FRAGMENT),
            ],
        });
        let bgl1 = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("post_bgl1"),
            entries: &[texture_entry(0), sampler_entry(1)],
        });
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("linear_sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });
        let values = pass_values(size, targets.bloom_size, bloom);
        let uniforms = PassUniforms {
            bright: helpers::uniform_buffer(device, "post_bright", &values[0]),
            blur_h: helpers::uniform_buffer(device, "post_blur_h", &values[1]),
            blur_v: helpers::uniform_buffer(device, "post_blur_v", &values[2]),
            composite: helpers::uniform_buffer(device, "post_composite", &values[3]),
        };
        let groups = build_groups(device, &bgl0, &bgl1, &sampler, &uniforms, targets);

        let pl_bright_blur = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("pl_post_0"),
            bind_group_layouts: &[&bgl0],
            push_constant_ranges: &[],
        });
        let pl_composite = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("pl_post_comp"),
            bind_group_layouts: &[&bgl0, &bgl1],
            push_constant_ranges: &[],
        });
        let bright_pipeline = helpers::make_post_pipeline(
            device,
            &pl_bright_blur,
            post_shader,
            "fs_bright",
            HDR_FORMAT,
            None,
        );
        let blur_pipeline = helpers::make_post_pipeline(
            device,
            &pl_bright_blur,
            post_shader,
            "fs_blur",
            HDR_FORMAT,
            None,
        );
        let composite_pipeline = helpers::make_post_pipeline(
            device,
            &pl_composite,
            post_shader,
            "fs_composite",
            swap_format,
            Some(wgpu::BlendState::REPLACE),
        );

        Self {
            bgl0,
            bgl1,
            sampler,
            uniforms,
            groups,
            bright_pipeline,
            blur_pipeline,
            composite_pipeline,
            bloom,
        }
    }

    /// Point the bind groups at freshly created targets and refresh the
    /// resolution-dependent uniforms.
    pub(crate) fn retarget(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        targets: &RenderTargets,
        size: (u32, u32),
    ) {
        let values = pass_values(size, targets.bloom_size, self.bloom);
        let buffers = [
            &self.uniforms.bright,
            &self.uniforms.blur_h,
            &self.uniforms.blur_v,
            &self.uniforms.composite,
        ];
        for (buffer, value) in buffers.into_iter().zip(values.iter()) {
            queue.write_buffer(buffer, 0, bytemuck::bytes_of(value));
        }
        self.groups = build_groups(
            device,
            &self.bgl0,
            &self.bgl1,
            &self.sampler,
            &self.uniforms,
            targets,
        );
    }

    /// Bright-pass, separable blur, then composite onto `output`.
    pub(crate) fn run(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        targets: &RenderTargets,
        output: &wgpu::TextureView,
    ) {
        let g = &self.groups;
        blit(
            encoder,
            "bright_pass",
            &targets.bloom_a_view,
            &self.bright_pipeline,
            &g.bright,
            None,
        );
        blit(
            encoder,
            "blur_h",
            &targets.bloom_b_view,
            &self.blur_pipeline,
            &g.blur_h,
            None,
        );
        blit(
            encoder,
            "blur_v",
            &targets.bloom_a_view,
            &self.blur_pipeline,
            &g.blur_v,
            None,
        );
        blit(
            encoder,
            "composite",
            output,
            &self.composite_pipeline,
            &g.composite,
            Some(&g.bloom_only),
        );
    }

    pub(crate) fn destroy(&self) {
        self.uniforms.bright.destroy();
        self.uniforms.blur_h.destroy();
        self.uniforms.blur_v.destroy();
        self.uniforms.composite.destroy();
    }
}

fn pass_values(size: (u32, u32), bloom_size: (u32, u32), bloom: BloomOptions) -> [PostUniforms; 4] {
    let full = [size.0.max(1) as f32, size.1.max(1) as f32];
    let half = [bloom_size.0 as f32, bloom_size.1 as f32];
    let base = PostUniforms {
        resolution: full,
        blur_dir: [0.0, 0.0],
        bloom_strength: bloom.strength,
        threshold: bloom.threshold,
        _pad: [0.0; 2],
    };
    [
        base,
        PostUniforms {
            resolution: half,
            blur_dir: [1.0, 0.0],
            ..base
        },
        PostUniforms {
            resolution: half,
            blur_dir: [0.0, 1.0],
            ..base
        },
        base,
    ]
}

fn build_groups(
    device: &wgpu::Device,
    bgl0: &wgpu::BindGroupLayout,
    bgl1: &wgpu::BindGroupLayout,
    sampler: &wgpu::Sampler,
    uniforms: &PassUniforms,
    targets: &RenderTargets,
) -> PostBindGroups {
    let source = |label: &str, view: &wgpu::TextureView, buffer: &wgpu::Buffer| {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(label),
            layout: bgl0,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: buffer.as_entire_binding(),
                },
            ],
        })
    };
    PostBindGroups {
        bright: source("bg_bright", &targets.hdr_view, &uniforms.bright),
        blur_h: source("bg_blur_h", &targets.bloom_a_view, &uniforms.blur_h),
        blur_v: source("bg_blur_v", &targets.bloom_b_view, &uniforms.blur_v),
        composite: source("bg_composite", &targets.hdr_view, &uniforms.composite),
        bloom_only: device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("bg_bloom_only"),
            layout: bgl1,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&targets.bloom_a_view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
            ],
        }),
    }
}

fn blit(
    encoder: &mut wgpu::CommandEncoder,
    label: &str,
    target: &wgpu::TextureView,
    pipeline: &wgpu::RenderPipeline,
    bg0: &wgpu::BindGroup,
    bg1: Option<&wgpu::BindGroup>,
) {
    let mut r = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
        label: Some(label),
        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
            view: target,
            resolve_target: None,
            ops: wgpu::Operations {
                load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                store: wgpu::StoreOp::Store,
            },
        })],
        depth_stencil_attachment: None,
        timestamp_writes: None,
        occlusion_query_set: None,
    });
    r.set_pipeline(pipeline);
    r.set_bind_group(0, bg0, &[]);
    if let Some(g1) = bg1 {
        r.set_bind_group(1, g1, &[]);
    }
    r.draw(0..3, 0..1);
}
