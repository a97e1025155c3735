//! The wgpu implementation of the rendering collaborator.
//!
//! One pipeline, one uniform block, one instance buffer, one draw call
//! per frame. The driver hands particle sets and frame params across the
//! `FieldRenderer` seam; everything GPU-shaped stays in here, including
//! surface-loss recovery.

use wgpu::util::DeviceExt;

use phosphor_core::renderer::{FieldRenderer, FrameParams};
use phosphor_core::sampler::ParticleSet;
use phosphor_core::viewport::ViewportConfig;

use crate::shaders::FieldShaders;
use crate::uniforms::{particle_instance_layout, FieldUniforms};

/// GPU point-sprite renderer for a particle field.
pub struct PointFieldRenderer {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    surface_config: wgpu::SurfaceConfiguration,
    pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    instance_buffer: Option<wgpu::Buffer>,
    instance_count: u32,
    clear_color: wgpu::Color,
}

impl PointFieldRenderer {
    /// Builds the pipeline against an already-configured surface.
    ///
    /// The host creates the instance/adapter/device and the surface
    /// configuration (format, present mode, alpha mode); this constructor
    /// configures the surface and owns everything from there.
    #[must_use]
    pub fn new(
        device: wgpu::Device,
        queue: wgpu::Queue,
        surface: wgpu::Surface<'static>,
        surface_config: wgpu::SurfaceConfiguration,
    ) -> Self {
        surface.configure(&device, &surface_config);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Field Shader"),
            source: wgpu::ShaderSource::Wgsl(FieldShaders::source().into()),
        });

        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Field Uniforms"),
            size: FieldUniforms::SIZE as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Field Uniform Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Field Uniform Bind Group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Field Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Field Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: "vs_main",
                buffers: &[particle_instance_layout()],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: "fs_main",
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_config.format,
                    // Normal alpha blending, matching the reference visual.
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: None,
                ..Default::default()
            },
            // Flat dots over a clear color: no depth buffer, no depth writes.
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
        });

        tracing::info!(
            "Field pipeline ready ({}x{}, {:?})",
            surface_config.width,
            surface_config.height,
            surface_config.format
        );

        Self {
            surface,
            device,
            queue,
            surface_config,
            pipeline,
            uniform_buffer,
            bind_group,
            instance_buffer: None,
            instance_count: 0,
            clear_color: wgpu::Color::BLACK,
        }
    }

    /// Current surface size in device pixels (width, height).
    #[must_use]
    pub fn surface_size(&self) -> (u32, u32) {
        (self.surface_config.width, self.surface_config.height)
    }
}

impl FieldRenderer for PointFieldRenderer {
    fn set_particles(&mut self, set: &ParticleSet) {
        if set.is_empty() {
            self.instance_buffer = None;
            self.instance_count = 0;
            return;
        }
        // Whole-buffer replacement: the next render draws the new set in
        // full, never a partial update.
        self.instance_buffer = Some(self.device.create_buffer_init(
            &wgpu::util::BufferInitDescriptor {
                label: Some("Particle Instances"),
                contents: set.as_bytes(),
                usage: wgpu::BufferUsages::VERTEX,
            },
        ));
        self.instance_count = set.len() as u32;
        tracing::debug!("Particle buffer swapped: {} instances", self.instance_count);
    }

    fn resize(&mut self, viewport: &ViewportConfig) {
        self.surface_config.width = viewport.physical_width();
        self.surface_config.height = viewport.physical_height();
        self.surface.configure(&self.device, &self.surface_config);
    }

    fn push_frame(&mut self, params: &FrameParams) {
        let [r, g, b, a] = params.clear_color;
        self.clear_color = wgpu::Color {
            r: f64::from(r),
            g: f64::from(g),
            b: f64::from(b),
            a: f64::from(a),
        };
        let uniforms = FieldUniforms::from_params(params);
        self.queue
            .write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(&uniforms));
    }

    fn render(&mut self) {
        let output = match self.surface.get_current_texture() {
            Ok(texture) => texture,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                // Recoverable: reconfigure and skip this frame.
                self.surface.configure(&self.device, &self.surface_config);
                return;
            }
            Err(error) => {
                tracing::error!("Surface error, frame dropped: {error:?}");
                return;
            }
        };

        let view = output.texture.create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor::default());

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Field Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                ..Default::default()
            });

            if let Some(instances) = &self.instance_buffer {
                pass.set_pipeline(&self.pipeline);
                pass.set_bind_group(0, &self.bind_group, &[]);
                pass.set_vertex_buffer(0, instances.slice(..));
                // Six quad vertices per particle instance.
                pass.draw(0..6, 0..self.instance_count);
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();
    }

    fn release(&mut self) {
        self.instance_buffer = None;
        self.instance_count = 0;
        tracing::info!("Field renderer released");
    }
}
