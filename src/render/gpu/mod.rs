//! GPU 驻留的火花粒子系统
//!
//! 粒子流完全保存在 GPU 存储缓冲中，每帧由三个计算阶段推进：
//!
//! ```text
//! ┌──────────┐   dispatch args   ┌──────────┐   dst_count   ┌──────────┐
//! │ prepare  │──────────────────►│ simulate │──────────────►│ finalize │
//! │ (1 线程) │                   │ (间接派发)│               │ (1 线程) │
//! └──────────┘                   └──────────┘               └────┬─────┘
//!                                                               │ draw args
//!                                                               ▼
//!                                                        draw_indirect (LineList)
//! ```
//!
//! 两组粒子缓冲/计数缓冲乒乓交替，CPU 不需要知道存活粒子数。

pub mod height_map;
pub mod shaders;
pub mod uniforms;

pub use height_map::HeightMap;
pub use uniforms::{DispatchIndirectArgs, DrawIndirectArgs, RenderUniforms, SimulationUniforms};

use crate::config::{RenderConfig, SimulationConfig, SparkConfig};
use crate::core::error::{RenderError, RenderResult, SparkResult};
use crate::particles::{FrameParams, GpuParticle, NoiseTable, Particle};
use crate::render::atlas::StreakAtlas;

const PARTICLE_STRIDE: wgpu::BufferAddress = std::mem::size_of::<GpuParticle>() as wgpu::BufferAddress;
const COUNT_SIZE: wgpu::BufferAddress = std::mem::size_of::<u32>() as wgpu::BufferAddress;

/// 叠加混合：火花越密越亮
const ADDITIVE_BLENDING: wgpu::BlendState = wgpu::BlendState {
    color: wgpu::BlendComponent {
        src_factor: wgpu::BlendFactor::SrcAlpha,
        dst_factor: wgpu::BlendFactor::One,
        operation: wgpu::BlendOperation::Add,
    },
    alpha: wgpu::BlendComponent {
        src_factor: wgpu::BlendFactor::One,
        dst_factor: wgpu::BlendFactor::One,
        operation: wgpu::BlendOperation::Add,
    },
};

/// GPU 火花系统
pub struct GpuSparkSystem {
    simulation: SimulationConfig,
    render: RenderConfig,
    capacity: u32,

    particle_buffers: [wgpu::Buffer; 2],
    count_buffers: [wgpu::Buffer; 2],
    dispatch_buffer: wgpu::Buffer,
    draw_buffer: wgpu::Buffer,
    simulation_uniforms: wgpu::Buffer,
    render_uniforms: wgpu::Buffer,

    prepare_pipeline: wgpu::ComputePipeline,
    simulate_pipeline: wgpu::ComputePipeline,
    finalize_pipeline: wgpu::ComputePipeline,
    render_pipeline: wgpu::RenderPipeline,

    /// 按当前读端索引：`[i]` 读取第 i 组、写入另一组
    simulate_bind_groups: [wgpu::BindGroup; 2],
    control_bind_groups: [wgpu::BindGroup; 2],
    render_bind_groups: [wgpu::BindGroup; 2],

    current: usize,
    frame_index: u64,
}

impl GpuSparkSystem {
    /// 创建全部 GPU 资源并放入初始发射器
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        config: &SparkConfig,
        target_format: wgpu::TextureFormat,
        noise: &NoiseTable,
        atlas: &StreakAtlas,
        height_map: &HeightMap,
    ) -> SparkResult<Self> {
        config.validate()?;
        check_limits(&device.limits(), &config.simulation, noise, atlas, height_map)?;

        let capacity = config.simulation.max_particles as u32;

        let particle_buffers = [0, 1].map(|i| {
            device.create_buffer(&wgpu::BufferDescriptor {
                label: Some(&format!("Spark Particles {}", i)),
                size: PARTICLE_STRIDE * capacity as wgpu::BufferAddress,
                usage: wgpu::BufferUsages::STORAGE
                    | wgpu::BufferUsages::COPY_DST
                    | wgpu::BufferUsages::COPY_SRC,
                mapped_at_creation: false,
            })
        });
        let count_buffers = [0, 1].map(|i| {
            device.create_buffer(&wgpu::BufferDescriptor {
                label: Some(&format!("Spark Count {}", i)),
                size: COUNT_SIZE,
                usage: wgpu::BufferUsages::STORAGE
                    | wgpu::BufferUsages::COPY_DST
                    | wgpu::BufferUsages::COPY_SRC,
                mapped_at_creation: false,
            })
        });
        let dispatch_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Spark Dispatch Args"),
            size: std::mem::size_of::<DispatchIndirectArgs>() as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::INDIRECT,
            mapped_at_creation: false,
        });
        let draw_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Spark Draw Args"),
            size: std::mem::size_of::<DrawIndirectArgs>() as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::STORAGE
                | wgpu::BufferUsages::INDIRECT
                | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let simulation_uniforms = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Spark Simulation Uniforms"),
            size: std::mem::size_of::<SimulationUniforms>() as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let render_uniforms = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Spark Render Uniforms"),
            size: std::mem::size_of::<RenderUniforms>() as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let noise_view = upload_noise(device, queue, noise);
        let atlas_view = upload_atlas(device, queue, atlas);
        let height_view = upload_height_map(device, queue, height_map);
        let atlas_sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Streak Atlas Sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        // 模拟阶段布局；高度图占用 binding 6，着色器当前不声明它
        let simulate_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Spark Simulate BGL"),
            entries: &[
                uniform_entry(0, wgpu::ShaderStages::COMPUTE),
                storage_entry(1, true, wgpu::ShaderStages::COMPUTE),
                storage_entry(2, true, wgpu::ShaderStages::COMPUTE),
                storage_entry(3, false, wgpu::ShaderStages::COMPUTE),
                storage_entry(4, false, wgpu::ShaderStages::COMPUTE),
                texture_entry(
                    5,
                    wgpu::TextureViewDimension::D1,
                    false,
                    wgpu::ShaderStages::COMPUTE,
                ),
                texture_entry(
                    6,
                    wgpu::TextureViewDimension::D2,
                    false,
                    wgpu::ShaderStages::COMPUTE,
                ),
            ],
        });
        let control_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Spark Control BGL"),
            entries: &[
                uniform_entry(0, wgpu::ShaderStages::COMPUTE),
                storage_entry(1, true, wgpu::ShaderStages::COMPUTE),
                storage_entry(2, false, wgpu::ShaderStages::COMPUTE),
                storage_entry(3, false, wgpu::ShaderStages::COMPUTE),
                storage_entry(4, false, wgpu::ShaderStages::COMPUTE),
            ],
        });
        let render_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Spark Render BGL"),
            entries: &[
                uniform_entry(0, wgpu::ShaderStages::VERTEX_FRAGMENT),
                storage_entry(1, true, wgpu::ShaderStages::VERTEX),
                texture_entry(
                    2,
                    wgpu::TextureViewDimension::D2Array,
                    true,
                    wgpu::ShaderStages::FRAGMENT,
                ),
                wgpu::BindGroupLayoutEntry {
                    binding: 3,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let simulate_module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Spark Simulate Shader"),
            source: wgpu::ShaderSource::Wgsl(shaders::compose(shaders::SIMULATE_WGSL).into()),
        });
        let control_module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Spark Control Shader"),
            source: wgpu::ShaderSource::Wgsl(shaders::compose(shaders::CONTROL_WGSL).into()),
        });
        let render_module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Spark Render Shader"),
            source: wgpu::ShaderSource::Wgsl(shaders::compose(shaders::RENDER_WGSL).into()),
        });

        let simulate_pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Spark Simulate Pipeline Layout"),
            bind_group_layouts: &[&simulate_layout],
            push_constant_ranges: &[],
        });
        let control_pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Spark Control Pipeline Layout"),
            bind_group_layouts: &[&control_layout],
            push_constant_ranges: &[],
        });
        let render_pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Spark Render Pipeline Layout"),
            bind_group_layouts: &[&render_layout],
            push_constant_ranges: &[],
        });

        let simulate_pipeline = create_compute_pipeline(
            device,
            &simulate_pipeline_layout,
            &simulate_module,
            "simulate_main",
        );
        let prepare_pipeline = create_compute_pipeline(
            device,
            &control_pipeline_layout,
            &control_module,
            "prepare_main",
        );
        let finalize_pipeline = create_compute_pipeline(
            device,
            &control_pipeline_layout,
            &control_module,
            "finalize_main",
        );

        let render_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Spark Line Pipeline"),
            layout: Some(&render_pipeline_layout),
            vertex: wgpu::VertexState {
                module: &render_module,
                entry_point: "vs_main",
                buffers: &[],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &render_module,
                entry_point: "fs_main",
                targets: &[Some(wgpu::ColorTargetState {
                    format: target_format,
                    blend: Some(ADDITIVE_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::LineList,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
        });

        let simulate_bind_groups = [0usize, 1].map(|src| {
            let dst = 1 - src;
            device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some(&format!("Spark Simulate BG {}", src)),
                layout: &simulate_layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: simulation_uniforms.as_entire_binding(),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: particle_buffers[src].as_entire_binding(),
                    },
                    wgpu::BindGroupEntry {
                        binding: 2,
                        resource: count_buffers[src].as_entire_binding(),
                    },
                    wgpu::BindGroupEntry {
                        binding: 3,
                        resource: particle_buffers[dst].as_entire_binding(),
                    },
                    wgpu::BindGroupEntry {
                        binding: 4,
                        resource: count_buffers[dst].as_entire_binding(),
                    },
                    wgpu::BindGroupEntry {
                        binding: 5,
                        resource: wgpu::BindingResource::TextureView(&noise_view),
                    },
                    wgpu::BindGroupEntry {
                        binding: 6,
                        resource: wgpu::BindingResource::TextureView(&height_view),
                    },
                ],
            })
        });
        let control_bind_groups = [0usize, 1].map(|src| {
            let dst = 1 - src;
            device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some(&format!("Spark Control BG {}", src)),
                layout: &control_layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: simulation_uniforms.as_entire_binding(),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: count_buffers[src].as_entire_binding(),
                    },
                    wgpu::BindGroupEntry {
                        binding: 2,
                        resource: count_buffers[dst].as_entire_binding(),
                    },
                    wgpu::BindGroupEntry {
                        binding: 3,
                        resource: dispatch_buffer.as_entire_binding(),
                    },
                    wgpu::BindGroupEntry {
                        binding: 4,
                        resource: draw_buffer.as_entire_binding(),
                    },
                ],
            })
        });
        let render_bind_groups = [0usize, 1].map(|current| {
            device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some(&format!("Spark Render BG {}", current)),
                layout: &render_layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: render_uniforms.as_entire_binding(),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: particle_buffers[current].as_entire_binding(),
                    },
                    wgpu::BindGroupEntry {
                        binding: 2,
                        resource: wgpu::BindingResource::TextureView(&atlas_view),
                    },
                    wgpu::BindGroupEntry {
                        binding: 3,
                        resource: wgpu::BindingResource::Sampler(&atlas_sampler),
                    },
                ],
            })
        });

        let mut system = Self {
            simulation: config.simulation.clone(),
            render: config.render.clone(),
            capacity,
            particle_buffers,
            count_buffers,
            dispatch_buffer,
            draw_buffer,
            simulation_uniforms,
            render_uniforms,
            prepare_pipeline,
            simulate_pipeline,
            finalize_pipeline,
            render_pipeline,
            simulate_bind_groups,
            control_bind_groups,
            render_bind_groups,
            current: 0,
            frame_index: 0,
        };
        system.reset(queue);

        tracing::info!(
            target: "sparks::gpu",
            "GPU spark system created (capacity {}, noise {} texels, atlas {}x{}x{})",
            capacity,
            noise.len(),
            atlas.width(),
            atlas.height(),
            atlas.layers()
        );
        Ok(system)
    }

    /// 回到只有一个发射器的初始状态
    pub fn reset(&mut self, queue: &wgpu::Queue) {
        self.upload(queue, &[Particle::emitter(self.simulation.emit_position)]);
        self.frame_index = 0;
    }

    /// 用给定粒子替换当前流，超出容量的部分被截断
    pub fn upload(&mut self, queue: &wgpu::Queue, particles: &[Particle]) {
        let count = particles.len().min(self.capacity as usize);
        if count < particles.len() {
            tracing::warn!(
                target: "sparks::gpu",
                "Upload truncated to capacity {} ({} particles given)",
                self.capacity,
                particles.len()
            );
        }

        self.current = 0;
        let data: Vec<GpuParticle> = particles[..count].iter().copied().map(GpuParticle::from).collect();
        if !data.is_empty() {
            queue.write_buffer(&self.particle_buffers[0], 0, bytemuck::cast_slice(&data));
        }
        queue.write_buffer(&self.count_buffers[0], 0, bytemuck::bytes_of(&(count as u32)));
        queue.write_buffer(&self.count_buffers[1], 0, bytemuck::bytes_of(&0u32));
        // 首次模拟之前没有可绘制的火花
        queue.write_buffer(
            &self.draw_buffer,
            0,
            bytemuck::bytes_of(&DrawIndirectArgs {
                vertex_count: 2,
                ..Default::default()
            }),
        );
    }

    /// 编码一次模拟阶段（准备 → 模拟 → 收尾）并交换读写角色
    ///
    /// Uniform 通过 `queue.write_buffer` 更新，每次提交只应编码一次模拟。
    pub fn simulate(
        &mut self,
        encoder: &mut wgpu::CommandEncoder,
        queue: &wgpu::Queue,
        frame: &FrameParams,
    ) {
        let uniforms = SimulationUniforms::new(&self.simulation, frame);
        queue.write_buffer(&self.simulation_uniforms, 0, bytemuck::bytes_of(&uniforms));

        let control = &self.control_bind_groups[self.current];
        {
            let mut cpass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
                label: Some("Spark Prepare Pass"),
                timestamp_writes: None,
            });
            cpass.set_pipeline(&self.prepare_pipeline);
            cpass.set_bind_group(0, control, &[]);
            cpass.dispatch_workgroups(1, 1, 1);
        }
        {
            let mut cpass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
                label: Some("Spark Simulate Pass"),
                timestamp_writes: None,
            });
            cpass.set_pipeline(&self.simulate_pipeline);
            cpass.set_bind_group(0, &self.simulate_bind_groups[self.current], &[]);
            cpass.dispatch_workgroups_indirect(&self.dispatch_buffer, 0);
        }
        {
            let mut cpass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
                label: Some("Spark Finalize Pass"),
                timestamp_writes: None,
            });
            cpass.set_pipeline(&self.finalize_pipeline);
            cpass.set_bind_group(0, control, &[]);
            cpass.dispatch_workgroups(1, 1, 1);
        }

        self.current = 1 - self.current;
        self.frame_index += 1;
        tracing::debug!(
            target: "sparks::gpu",
            frame = self.frame_index,
            current = self.current,
            "simulate pass encoded"
        );
    }

    /// 把当前流绘制为线段，叠加到目标上（不清除）
    pub fn render(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        queue: &wgpu::Queue,
        target: &wgpu::TextureView,
        frame: &FrameParams,
    ) {
        let uniforms = RenderUniforms::new(&self.render, frame);
        queue.write_buffer(&self.render_uniforms, 0, bytemuck::bytes_of(&uniforms));

        let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Spark Line Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            occlusion_query_set: None,
            timestamp_writes: None,
        });
        rpass.set_pipeline(&self.render_pipeline);
        rpass.set_bind_group(0, &self.render_bind_groups[self.current], &[]);
        rpass.draw_indirect(&self.draw_buffer, 0);
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }

    /// 当前读端的缓冲索引（0 或 1）
    pub fn current_index(&self) -> usize {
        self.current
    }
}

fn check_limits(
    limits: &wgpu::Limits,
    simulation: &SimulationConfig,
    noise: &NoiseTable,
    atlas: &StreakAtlas,
    height_map: &HeightMap,
) -> RenderResult<()> {
    let particle_bytes = PARTICLE_STRIDE * simulation.max_particles as wgpu::BufferAddress;
    if particle_bytes > limits.max_storage_buffer_binding_size as wgpu::BufferAddress {
        return Err(RenderError::LimitExceeded(format!(
            "particle buffer of {} bytes exceeds storage binding limit {}",
            particle_bytes, limits.max_storage_buffer_binding_size
        )));
    }
    if noise.len() as u32 > limits.max_texture_dimension_1d {
        return Err(RenderError::LimitExceeded(format!(
            "noise table of {} texels exceeds 1D texture limit {}",
            noise.len(),
            limits.max_texture_dimension_1d
        )));
    }
    let max_2d = limits.max_texture_dimension_2d;
    if atlas.width() > max_2d || atlas.height() > max_2d {
        return Err(RenderError::LimitExceeded(format!(
            "atlas of {}x{} exceeds 2D texture limit {}",
            atlas.width(),
            atlas.height(),
            max_2d
        )));
    }
    if height_map.width() > max_2d || height_map.height() > max_2d {
        return Err(RenderError::LimitExceeded(format!(
            "height map of {}x{} exceeds 2D texture limit {}",
            height_map.width(),
            height_map.height(),
            max_2d
        )));
    }
    if atlas.layers() > limits.max_texture_array_layers {
        return Err(RenderError::LimitExceeded(format!(
            "atlas has {} layers, limit is {}",
            atlas.layers(),
            limits.max_texture_array_layers
        )));
    }
    Ok(())
}

fn uniform_entry(binding: u32, visibility: wgpu::ShaderStages) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

fn storage_entry(
    binding: u32,
    read_only: bool,
    visibility: wgpu::ShaderStages,
) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Storage { read_only },
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

fn texture_entry(
    binding: u32,
    view_dimension: wgpu::TextureViewDimension,
    filterable: bool,
    visibility: wgpu::ShaderStages,
) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility,
        ty: wgpu::BindingType::Texture {
            sample_type: wgpu::TextureSampleType::Float { filterable },
            view_dimension,
            multisampled: false,
        },
        count: None,
    }
}

fn create_compute_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    module: &wgpu::ShaderModule,
    entry_point: &str,
) -> wgpu::ComputePipeline {
    device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
        label: Some(&format!("Spark {} Pipeline", entry_point)),
        layout: Some(layout),
        module,
        entry_point,
        compilation_options: wgpu::PipelineCompilationOptions::default(),
    })
}

fn upload_noise(device: &wgpu::Device, queue: &wgpu::Queue, noise: &NoiseTable) -> wgpu::TextureView {
    let width = noise.len() as u32;
    let size = wgpu::Extent3d {
        width,
        height: 1,
        depth_or_array_layers: 1,
    };
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Spark Noise Table"),
        size,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D1,
        format: wgpu::TextureFormat::Rgba32Float,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });
    let texels = noise.to_rgba32f();
    queue.write_texture(
        wgpu::ImageCopyTexture {
            texture: &texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        bytemuck::cast_slice(&texels),
        wgpu::ImageDataLayout {
            offset: 0,
            bytes_per_row: Some(16 * width),
            rows_per_image: None,
        },
        size,
    );
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}

fn upload_atlas(device: &wgpu::Device, queue: &wgpu::Queue, atlas: &StreakAtlas) -> wgpu::TextureView {
    let size = wgpu::Extent3d {
        width: atlas.width(),
        height: atlas.height(),
        depth_or_array_layers: atlas.layers(),
    };
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Streak Atlas"),
        size,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Rgba8Unorm,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });
    queue.write_texture(
        wgpu::ImageCopyTexture {
            texture: &texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        atlas.as_bytes(),
        wgpu::ImageDataLayout {
            offset: 0,
            bytes_per_row: Some(4 * atlas.width()),
            rows_per_image: Some(atlas.height()),
        },
        size,
    );
    texture.create_view(&wgpu::TextureViewDescriptor {
        label: Some("Streak Atlas View"),
        dimension: Some(wgpu::TextureViewDimension::D2Array),
        ..Default::default()
    })
}

fn upload_height_map(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    height_map: &HeightMap,
) -> wgpu::TextureView {
    let size = wgpu::Extent3d {
        width: height_map.width(),
        height: height_map.height(),
        depth_or_array_layers: 1,
    };
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Spark Height Map"),
        size,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::R32Float,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });
    queue.write_texture(
        wgpu::ImageCopyTexture {
            texture: &texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        height_map.as_bytes(),
        wgpu::ImageDataLayout {
            offset: 0,
            bytes_per_row: Some(4 * height_map.width()),
            rows_per_image: Some(height_map.height()),
        },
        size,
    );
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}
