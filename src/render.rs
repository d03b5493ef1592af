//! Per-frame draw submission.
//!
//! A frame is always the same sequence: clear the render target, bind the
//! pipeline and buffers, issue one draw, present. [`encode_frame`] records the
//! first three steps into a command encoder; [`Context::render`] wraps it with
//! surface acquisition, submission and presentation and reports failures to the
//! caller instead of swallowing them.

use std::iter;

use crate::context::{Context, SceneResources};

/// Record one frame: clear `view` to `clear`, set a full-target viewport and
/// draw the scene.
pub fn encode_frame(
    encoder: &mut wgpu::CommandEncoder,
    view: &wgpu::TextureView,
    scene: &SceneResources,
    clear: wgpu::Color,
    (width, height): (u32, u32),
) {
    let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
        label: Some("Render Pass"),
        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
            view,
            resolve_target: None,
            ops: wgpu::Operations {
                load: wgpu::LoadOp::Clear(clear),
                store: wgpu::StoreOp::Store,
            },
            depth_slice: None,
        })],
        ..Default::default()
    });
    render_pass.set_viewport(0.0, 0.0, width as f32, height as f32, 0.0, 1.0);
    scene.draw(&mut render_pass);
}

impl Context {
    /// Draw and present one frame.
    ///
    /// Errors are the surface's: `Lost`/`Outdated` mean the surface needs to be
    /// reconfigured, anything else is left to the caller to judge.
    pub fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });
        encode_frame(
            &mut encoder,
            &view,
            &self.scene,
            self.clear_colour,
            (self.config.width, self.config.height),
        );

        self.queue.submit(iter::once(encoder.finish()));
        output.present();
        Ok(())
    }
}

/// Colour format of [`capture_frame`] targets.
#[cfg(feature = "integration-tests")]
pub const CAPTURE_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

/// Render one frame into an offscreen texture and read it back.
///
/// `scene` must have been built for [`CAPTURE_FORMAT`].
#[cfg(feature = "integration-tests")]
pub async fn capture_frame(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    scene: &SceneResources,
    clear: wgpu::Color,
    (width, height): (u32, u32),
) -> anyhow::Result<image::RgbaImage> {
    use anyhow::{Context as _, anyhow};

    let extent = wgpu::Extent3d {
        width,
        height,
        depth_or_array_layers: 1,
    };
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Capture Texture"),
        size: extent,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: CAPTURE_FORMAT,
        usage: wgpu::TextureUsages::COPY_SRC | wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

    // Rows of a texture-to-buffer copy have to be 256-byte aligned.
    let unpadded_bytes_per_row = 4 * width;
    let align = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;
    let padded_bytes_per_row = unpadded_bytes_per_row.div_ceil(align) * align;
    let output_buffer = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Capture Buffer"),
        size: (padded_bytes_per_row * height) as wgpu::BufferAddress,
        usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
        mapped_at_creation: false,
    });

    let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
        label: Some("Capture Encoder"),
    });
    encode_frame(&mut encoder, &view, scene, clear, (width, height));
    encoder.copy_texture_to_buffer(
        wgpu::TexelCopyTextureInfo {
            aspect: wgpu::TextureAspect::All,
            texture: &texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
        },
        wgpu::TexelCopyBufferInfo {
            buffer: &output_buffer,
            layout: wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(padded_bytes_per_row),
                rows_per_image: Some(height),
            },
        },
        extent,
    );
    queue.submit(iter::once(encoder.finish()));

    let (tx, rx) = futures_intrusive::channel::shared::oneshot_channel();
    let buffer_slice = output_buffer.slice(..);
    buffer_slice.map_async(wgpu::MapMode::Read, move |result| {
        let _ = tx.send(result);
    });
    device
        .poll(wgpu::PollType::Wait {
            submission_index: None,
            timeout: Some(std::time::Duration::from_secs(3)),
        })
        .map_err(|e| anyhow!("Waiting for the capture failed: {e:?}"))?;
    rx.receive()
        .await
        .context("The capture buffer was never mapped")?
        .context("Failed to map the capture buffer")?;

    let pixels: Vec<u8> = {
        let data = buffer_slice.get_mapped_range();
        data.chunks(padded_bytes_per_row as usize)
            .flat_map(|row| &row[..unpadded_bytes_per_row as usize])
            .copied()
            .collect()
    };
    output_buffer.unmap();

    image::RgbaImage::from_raw(width, height, pixels)
        .context("Captured pixels do not fill the image")
}
