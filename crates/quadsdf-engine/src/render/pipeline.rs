//! Bind group layout and per-variant render pipelines.

use crate::quad::{
    min_binding_size, BlendMode, CanvasUniform, QuadVariant, RectInstance, TransformUniform,
};

pub(crate) const FLAT_SHADER: &str = concat!(
    include_str!("shaders/quad_common.wgsl"),
    include_str!("shaders/quad_flat.wgsl"),
);

pub(crate) const SDF_SHADER: &str = concat!(
    include_str!("shaders/quad_common.wgsl"),
    include_str!("shaders/quad_sdf.wgsl"),
);

pub(crate) fn shader_source(variant: QuadVariant) -> &'static str {
    match variant {
        QuadVariant::Flat => FLAT_SHADER,
        QuadVariant::Antialiased => SDF_SHADER,
    }
}

/// Pipelines for one `(target format, blend mode)` pair.
///
/// The layout is shared by both variants; pipelines are created on first use.
pub(crate) struct QuadPipelines {
    label: &'static str,
    format: wgpu::TextureFormat,
    blend: BlendMode,
    bind_group_layout: wgpu::BindGroupLayout,
    pipeline_layout: wgpu::PipelineLayout,
    pipelines: [Option<wgpu::RenderPipeline>; 2],
}

impl QuadPipelines {
    pub(crate) fn new(
        device: &wgpu::Device,
        label: &'static str,
        format: wgpu::TextureFormat,
        blend: BlendMode,
    ) -> Self {
        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some(&format!("{label} quad bgl")),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: Some(min_binding_size::<CanvasUniform>()),
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        // One slot per distinct transform of the frame.
                        has_dynamic_offset: true,
                        min_binding_size: Some(min_binding_size::<TransformUniform>()),
                    },
                    count: None,
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some(&format!("{label} quad pipeline layout")),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        Self {
            label,
            format,
            blend,
            bind_group_layout,
            pipeline_layout,
            pipelines: [None, None],
        }
    }

    #[inline]
    pub(crate) fn matches(&self, format: wgpu::TextureFormat, blend: BlendMode) -> bool {
        self.format == format && self.blend == blend
    }

    #[inline]
    pub(crate) fn bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.bind_group_layout
    }

    #[inline]
    pub(crate) fn get(&self, variant: QuadVariant) -> Option<&wgpu::RenderPipeline> {
        self.pipelines[variant.index()].as_ref()
    }

    pub(crate) fn ensure(&mut self, device: &wgpu::Device, variant: QuadVariant) {
        if self.pipelines[variant.index()].is_some() {
            return;
        }

        let name = format!("{} quad {}", self.label, variant.label());
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(&format!("{name} shader")),
            source: wgpu::ShaderSource::Wgsl(shader_source(variant).into()),
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(&format!("{name} pipeline")),
            layout: Some(&self.pipeline_layout),

            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                // Corners come from the template; only instances are streamed.
                buffers: &[RectInstance::layout()],
            },

            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: self.format,
                    blend: self.blend.blend_state(),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),

            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                // Mirroring transforms flip the winding.
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },

            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        log::info!("created {name} pipeline ({:?}, {:?})", self.format, self.blend);
        self.pipelines[variant.index()] = Some(pipeline);
    }
}
