use std::collections::HashMap;
use std::ops::Range;

use crate::quad::{BlendMode, CanvasUniform, QuadBatch, QuadVariant, RectInstance, TransformUniform};

use super::pipeline::QuadPipelines;
use super::{RenderCtx, RenderTarget};

/// Renderer configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadRendererConfig {
    /// Prefix for wgpu object labels.
    pub label: &'static str,
    /// Blend state of the color target.
    pub blend: BlendMode,
}

impl Default for QuadRendererConfig {
    fn default() -> Self {
        Self {
            label: "quadsdf",
            blend: BlendMode::Alpha,
        }
    }
}

/// Instanced rectangle renderer for both quad variants.
///
/// Each [`QuadBatch`] becomes one instanced draw of six template vertices. All
/// batches of a frame share one instance buffer; every distinct transform gets
/// its own slot in a dynamic-offset uniform buffer, so a draw sees exactly the
/// transform it was submitted with.
///
/// Usage per frame: [`prepare`](Self::prepare) uploads, [`render`](Self::render)
/// records the pass. [`draw`](Self::draw) does both.
pub struct QuadRenderer {
    config: QuadRendererConfig,
    pipelines: Option<QuadPipelines>,

    bind_group: Option<wgpu::BindGroup>,
    canvas_ubo: Option<wgpu::Buffer>,

    transform_ubo: Option<wgpu::Buffer>,
    transform_capacity: usize,
    transform_stride: u64,

    instance_vbo: Option<wgpu::Buffer>,
    instance_capacity: usize,

    draws: Vec<PreparedDraw>,

    warned_empty: bool,
    warned_non_finite: bool,
}

#[derive(Debug, Clone, PartialEq)]
struct PreparedDraw {
    variant: QuadVariant,
    transform_slot: u32,
    instances: Range<u32>,
}

/// CPU-side upload plan for one frame.
#[derive(Debug, Default)]
struct FramePlan {
    draws: Vec<PreparedDraw>,
    transforms: Vec<TransformUniform>,
    instances: Vec<RectInstance>,
    skipped_empty: usize,
    skipped_non_finite: usize,
}

impl Default for QuadRenderer {
    fn default() -> Self {
        Self::new(QuadRendererConfig::default())
    }
}

impl QuadRenderer {
    pub fn new(config: QuadRendererConfig) -> Self {
        Self {
            config,
            pipelines: None,
            bind_group: None,
            canvas_ubo: None,
            transform_ubo: None,
            transform_capacity: 0,
            transform_stride: 0,
            instance_vbo: None,
            instance_capacity: 0,
            draws: Vec::new(),
            warned_empty: false,
            warned_non_finite: false,
        }
    }

    #[inline]
    pub fn config(&self) -> QuadRendererConfig {
        self.config
    }

    /// Number of draws recorded by the next [`render`](Self::render).
    #[inline]
    pub fn prepared_draws(&self) -> usize {
        self.draws.len()
    }

    /// Prepares and records `batches` in one call.
    pub fn draw(&mut self, ctx: &RenderCtx<'_>, target: &mut RenderTarget<'_>, batches: &[QuadBatch]) {
        self.prepare(ctx, batches);
        self.render(target);
    }

    /// Uploads canvas, transforms and instances for `batches`.
    ///
    /// Empty batches and batches with a non-finite transform are skipped
    /// (one-time log message each).
    pub fn prepare(&mut self, ctx: &RenderCtx<'_>, batches: &[QuadBatch]) {
        self.ensure_pipelines(ctx);

        let plan = plan_frame(batches);
        if plan.skipped_empty > 0 && !self.warned_empty {
            log::debug!("QuadRenderer: empty batch encountered; skipped");
            self.warned_empty = true;
        }
        if plan.skipped_non_finite > 0 && !self.warned_non_finite {
            log::warn!("QuadRenderer: batch with non-finite transform; skipped");
            self.warned_non_finite = true;
        }

        self.draws.clear();
        if plan.draws.is_empty() {
            return;
        }

        // Mutating methods must happen before borrowing pipeline/buffers immutably.
        self.ensure_transform_capacity(ctx, plan.transforms.len());
        self.ensure_instance_capacity(ctx, plan.instances.len());
        self.ensure_bindings(ctx);

        if let Some(pipelines) = self.pipelines.as_mut() {
            for draw in &plan.draws {
                pipelines.ensure(ctx.device, draw.variant);
            }
        }

        let (Some(canvas_ubo), Some(transform_ubo), Some(instance_vbo)) = (
            self.canvas_ubo.as_ref(),
            self.transform_ubo.as_ref(),
            self.instance_vbo.as_ref(),
        ) else {
            return;
        };

        let canvas = CanvasUniform::from(ctx.canvas);
        ctx.queue.write_buffer(canvas_ubo, 0, bytemuck::bytes_of(&canvas));
        ctx.queue.write_buffer(
            transform_ubo,
            0,
            &pack_transform_slots(&plan.transforms, self.transform_stride),
        );
        ctx.queue.write_buffer(instance_vbo, 0, bytemuck::cast_slice(&plan.instances));

        self.draws = plan.draws;
    }

    /// Records the draws uploaded by the last [`prepare`](Self::prepare) into `target`.
    ///
    /// The pass loads existing contents; clear first with [`RenderTarget::clear`].
    pub fn render(&self, target: &mut RenderTarget<'_>) {
        if self.draws.is_empty() {
            return;
        }

        let Some(pipelines) = self.pipelines.as_ref() else { return };
        let Some(bind_group) = self.bind_group.as_ref() else { return };
        let Some(instance_vbo) = self.instance_vbo.as_ref() else { return };

        let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("quadsdf quad pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        rpass.set_vertex_buffer(0, instance_vbo.slice(..));

        for draw in &self.draws {
            let Some(pipeline) = pipelines.get(draw.variant) else { continue };
            let offset = draw.transform_slot as u64 * self.transform_stride;

            rpass.set_pipeline(pipeline);
            rpass.set_bind_group(0, bind_group, &[offset as wgpu::DynamicOffset]);
            rpass.draw(0..crate::quad::VERTICES_PER_INSTANCE, draw.instances.clone());
        }
    }

    fn ensure_pipelines(&mut self, ctx: &RenderCtx<'_>) {
        let blend = self.config.blend;
        if self
            .pipelines
            .as_ref()
            .is_some_and(|p| p.matches(ctx.target_format, blend))
        {
            return;
        }

        self.pipelines = Some(QuadPipelines::new(
            ctx.device,
            self.config.label,
            ctx.target_format,
            blend,
        ));

        // The bind group belongs to the old layout.
        self.bind_group = None;
    }

    fn ensure_bindings(&mut self, ctx: &RenderCtx<'_>) {
        if self.canvas_ubo.is_none() {
            self.canvas_ubo = Some(ctx.device.create_buffer(&wgpu::BufferDescriptor {
                label: Some(&format!("{} canvas ubo", self.config.label)),
                size: std::mem::size_of::<CanvasUniform>() as u64,
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            }));
            self.bind_group = None;
        }

        if self.bind_group.is_some() {
            return;
        }

        let Some(bgl) = self.pipelines.as_ref().map(QuadPipelines::bind_group_layout) else { return };
        let (Some(canvas_ubo), Some(transform_ubo)) =
            (self.canvas_ubo.as_ref(), self.transform_ubo.as_ref())
        else {
            return;
        };

        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(&format!("{} quad bind group", self.config.label)),
            layout: bgl,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: canvas_ubo.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                        buffer: transform_ubo,
                        offset: 0,
                        size: Some(crate::quad::min_binding_size::<TransformUniform>()),
                    }),
                },
            ],
        });

        self.bind_group = Some(bind_group);
    }

    fn ensure_transform_capacity(&mut self, ctx: &RenderCtx<'_>, required_slots: usize) {
        let alignment = ctx.device.limits().min_uniform_buffer_offset_alignment as u64;
        let stride = slot_stride(alignment);

        if required_slots <= self.transform_capacity
            && self.transform_stride == stride
            && self.transform_ubo.is_some()
        {
            return;
        }

        let new_cap = required_slots.next_power_of_two().max(8);
        self.transform_ubo = Some(ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(&format!("{} transform ubo", self.config.label)),
            size: new_cap as u64 * stride,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        }));
        self.transform_capacity = new_cap;
        self.transform_stride = stride;

        // The bind group references the old buffer.
        self.bind_group = None;
    }

    fn ensure_instance_capacity(&mut self, ctx: &RenderCtx<'_>, required_instances: usize) {
        if required_instances <= self.instance_capacity && self.instance_vbo.is_some() {
            return;
        }

        let new_cap = required_instances.next_power_of_two().max(64);
        let new_size = (new_cap * std::mem::size_of::<RectInstance>()) as u64;

        self.instance_vbo = Some(ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(&format!("{} instance vbo", self.config.label)),
            size: new_size,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        }));
        self.instance_capacity = new_cap;
        log::debug!("QuadRenderer: instance buffer grown to {new_cap} instances");
    }
}

/// Byte distance between transform slots for a device's offset alignment.
fn slot_stride(alignment: u64) -> u64 {
    wgpu::util::align_to(std::mem::size_of::<TransformUniform>() as u64, alignment.max(1))
}

/// Concatenates instances and assigns transform slots, deduplicating identical
/// transforms by bit pattern.
fn plan_frame(batches: &[QuadBatch]) -> FramePlan {
    let mut plan = FramePlan::default();
    let mut slots: HashMap<[u32; 6], u32> = HashMap::new();

    for batch in batches {
        if batch.is_empty() {
            plan.skipped_empty += 1;
            continue;
        }
        if !batch.transform.is_finite() {
            plan.skipped_non_finite += 1;
            continue;
        }

        let transforms = &mut plan.transforms;
        let slot = *slots.entry(batch.transform.to_bits()).or_insert_with(|| {
            transforms.push(TransformUniform::from(batch.transform));
            (transforms.len() - 1) as u32
        });

        let start = plan.instances.len() as u32;
        plan.instances.extend_from_slice(&batch.instances);
        let end = plan.instances.len() as u32;

        plan.draws.push(PreparedDraw {
            variant: batch.variant,
            transform_slot: slot,
            instances: start..end,
        });
    }

    plan
}

/// Lays out transform uniforms at `stride`-byte intervals.
fn pack_transform_slots(transforms: &[TransformUniform], stride: u64) -> Vec<u8> {
    let stride = stride as usize;
    let mut bytes = vec![0u8; transforms.len() * stride];
    for (i, t) in transforms.iter().enumerate() {
        let raw = bytemuck::bytes_of(t);
        bytes[i * stride..i * stride + raw.len()].copy_from_slice(raw);
    }
    bytes
}
