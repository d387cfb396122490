use std::sync::mpsc;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::coords::Canvas;

use super::{init, GpuInit};

/// How long `read_rgba8` waits for the map callback before giving up.
const READBACK_TIMEOUT: Duration = Duration::from_secs(10);

/// Adapter, device and queue without a surface.
///
/// Used for snapshots and GPU tests; pair with [`OffscreenTarget`].
pub struct HeadlessGpu {
    _instance: wgpu::Instance,
    adapter: wgpu::Adapter,
    device: wgpu::Device,
    queue: wgpu::Queue,
}

impl HeadlessGpu {
    /// Requests an adapter and device. Fails when no adapter is available.
    pub async fn new(init: &GpuInit) -> Result<Self> {
        let instance = init::create_instance();
        let adapter = init::request_adapter(&instance, init, None).await?;
        let (device, queue) = init::request_device(&adapter, init).await?;

        Ok(Self {
            _instance: instance,
            adapter,
            device,
            queue,
        })
    }

    /// [`new`](Self::new) driven to completion on the current thread.
    pub fn new_blocking(init: &GpuInit) -> Result<Self> {
        pollster::block_on(Self::new(init))
    }

    pub fn adapter_info(&self) -> wgpu::AdapterInfo {
        self.adapter.get_info()
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }
}

/// Row pitch for texture → buffer copies (`COPY_BYTES_PER_ROW_ALIGNMENT` multiple).
pub fn padded_bytes_per_row(width: u32) -> u32 {
    let unpadded = width * 4;
    let align = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;
    unpadded.div_ceil(align) * align
}

/// RGBA8 render target plus a readback buffer sized for it.
pub struct OffscreenTarget {
    canvas: Canvas,
    texture: wgpu::Texture,
    view: wgpu::TextureView,
    readback: wgpu::Buffer,
    padded_bytes_per_row: u32,
}

impl OffscreenTarget {
    /// Linear storage: shader output is written as-is, which keeps GPU output
    /// comparable with the software reference.
    pub const FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

    pub fn new(device: &wgpu::Device, canvas: Canvas) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("quadsdf offscreen texture"),
            size: wgpu::Extent3d {
                width: canvas.width(),
                height: canvas.height(),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: Self::FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        let padded_bytes_per_row = padded_bytes_per_row(canvas.width());
        let readback = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("quadsdf offscreen readback"),
            size: padded_bytes_per_row as u64 * canvas.height() as u64,
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
            mapped_at_creation: false,
        });

        Self {
            canvas,
            texture,
            view,
            readback,
            padded_bytes_per_row,
        }
    }

    #[inline]
    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    #[inline]
    pub fn view(&self) -> &wgpu::TextureView {
        &self.view
    }

    /// Copies the texture into the readback buffer and returns tightly packed
    /// RGBA8 rows, top to bottom.
    ///
    /// Blocks until the GPU has finished all submitted work.
    pub fn read_rgba8(&self, device: &wgpu::Device, queue: &wgpu::Queue) -> Result<Vec<u8>> {
        let (width, height) = (self.canvas.width(), self.canvas.height());

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("quadsdf readback encoder"),
        });
        encoder.copy_texture_to_buffer(
            wgpu::TexelCopyTextureInfo {
                texture: &self.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::TexelCopyBufferInfo {
                buffer: &self.readback,
                layout: wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(self.padded_bytes_per_row),
                    rows_per_image: Some(height),
                },
            },
            wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
        );
        let submission = queue.submit(std::iter::once(encoder.finish()));

        let slice = self.readback.slice(..);
        let (sender, receiver) = mpsc::channel();
        slice.map_async(wgpu::MapMode::Read, move |res| {
            let _ = sender.send(res);
        });

        device
            .poll(wgpu::PollType::Wait {
                submission_index: Some(submission),
                timeout: Some(READBACK_TIMEOUT),
            })
            .context("waiting for readback failed")?;
        receiver
            .try_recv()
            .context("readback callback did not run")?
            .context("failed to map readback buffer")?;

        let row_bytes = width as usize * 4;
        let mapped = slice.get_mapped_range();
        let mut out = Vec::with_capacity(row_bytes * height as usize);
        for row in mapped.chunks_exact(self.padded_bytes_per_row as usize) {
            out.extend_from_slice(&row[..row_bytes]);
        }
        drop(mapped);
        self.readback.unmap();

        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_are_padded_to_copy_alignment() {
        assert_eq!(padded_bytes_per_row(1), 256);
        assert_eq!(padded_bytes_per_row(64), 256);
        assert_eq!(padded_bytes_per_row(65), 512);
        assert_eq!(padded_bytes_per_row(100), 512);
    }
}
