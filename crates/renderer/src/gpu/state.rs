use anyhow::Result;
use raw_window_handle::{HasDisplayHandle, HasWindowHandle};
use winit::dpi::PhysicalSize;

use crate::config::RenderConfig;
use crate::shader::QUAD_VERTEX_COUNT;

use super::context::GpuContext;
use super::pipeline::DitherPipeline;
use super::uniforms::DitherUniforms;

/// Owns every GPU resource behind one surface: device, swapchain, the
/// dither pipeline, and the uniform buffer it reads.
pub(crate) struct GpuState {
    context: GpuContext,
    pipeline: DitherPipeline,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    uniforms: DitherUniforms,
}

impl GpuState {
    pub(crate) fn new<T>(
        target: &T,
        initial_size: PhysicalSize<u32>,
        config: &RenderConfig,
    ) -> Result<Self>
    where
        T: HasDisplayHandle + HasWindowHandle,
    {
        let context = GpuContext::new(target, initial_size)?;
        let pipeline = DitherPipeline::new(&context.device, context.surface_format)?;

        let uniform_buffer = context.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("uniform buffer"),
            size: std::mem::size_of::<DitherUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let uniform_bind_group = context
            .device
            .create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("uniform bind group"),
                layout: &pipeline.uniform_layout,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: uniform_buffer.as_entire_binding(),
                }],
            });

        let uniforms = DitherUniforms::new(context.size.width, context.size.height, config);
        context
            .queue
            .write_buffer(&uniform_buffer, 0, bytemuck::bytes_of(&uniforms));

        Ok(Self {
            context,
            pipeline,
            uniform_buffer,
            uniform_bind_group,
            uniforms,
        })
    }

    pub(crate) fn size(&self) -> PhysicalSize<u32> {
        self.context.size
    }

    pub(crate) fn resize(&mut self, new_size: PhysicalSize<u32>) {
        self.context.resize(new_size);
        self.uniforms.set_resolution(
            self.context.size.width as f32,
            self.context.size.height as f32,
        );
    }

    /// Draws one frame at the given animation timestamp and presents it.
    pub(crate) fn render(
        &mut self,
        config: &RenderConfig,
        time: f32,
    ) -> Result<(), wgpu::SurfaceError> {
        self.uniforms.apply_config(config);
        self.uniforms.set_time(time);
        self.uniforms.set_resolution(
            self.context.config.width as f32,
            self.context.config.height as f32,
        );
        self.context.queue.write_buffer(
            &self.uniform_buffer,
            0,
            bytemuck::bytes_of(&self.uniforms),
        );

        let frame = self.context.surface.get_current_texture()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder =
            self.context
                .device
                .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                    label: Some("render encoder"),
                });
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("dither pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    depth_slice: None,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                occlusion_query_set: None,
                timestamp_writes: None,
            });
            render_pass.set_pipeline(&self.pipeline.pipeline);
            render_pass.set_bind_group(0, &self.uniform_bind_group, &[]);
            render_pass.draw(0..QUAD_VERTEX_COUNT, 0..1);
        }

        self.context.queue.submit(Some(encoder.finish()));
        frame.present();
        Ok(())
    }
}
