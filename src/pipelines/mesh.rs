use crate::{data_structures::vertex::Vertex, resources::ShaderSources};

/// The switches that distinguish the bootstrap stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineOptions {
    /// Draw through an index buffer instead of an expanded vertex list.
    pub indexed: bool,
    /// Transform positions by the camera uniform at `@group(0) @binding(0)`.
    pub camera: bool,
    pub cull_mode: Option<wgpu::Face>,
}

impl PipelineOptions {
    pub fn vertex_entry_point(&self) -> &'static str {
        if self.camera { "vs_main" } else { "vs_passthrough" }
    }
}

pub fn mk_mesh_pipeline(
    device: &wgpu::Device,
    color_format: wgpu::TextureFormat,
    shaders: &ShaderSources,
    camera_bind_group_layout: Option<&wgpu::BindGroupLayout>,
    options: PipelineOptions,
) -> wgpu::RenderPipeline {
    let bind_group_layouts: Vec<&wgpu::BindGroupLayout> =
        camera_bind_group_layout.into_iter().collect();
    let render_pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("Mesh Pipeline Layout"),
        bind_group_layouts: &bind_group_layouts,
        push_constant_ranges: &[],
    });

    let vertex_shader = wgpu::ShaderModuleDescriptor {
        label: Some("Vertex Shader"),
        source: wgpu::ShaderSource::Wgsl(shaders.vertex.as_str().into()),
    };
    let pixel_shader = wgpu::ShaderModuleDescriptor {
        label: Some("Pixel Shader"),
        source: wgpu::ShaderSource::Wgsl(shaders.pixel.as_str().into()),
    };

    mk_render_pipeline(
        device,
        &render_pipeline_layout,
        color_format,
        Some(wgpu::BlendState::REPLACE),
        options,
        &[Vertex::desc()],
        vertex_shader,
        pixel_shader,
    )
}

#[allow(clippy::too_many_arguments)]
pub fn mk_render_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    color_format: wgpu::TextureFormat,
    blend: Option<wgpu::BlendState>,
    options: PipelineOptions,
    vertex_layouts: &[wgpu::VertexBufferLayout],
    vertex_shader: wgpu::ShaderModuleDescriptor,
    pixel_shader: wgpu::ShaderModuleDescriptor,
) -> wgpu::RenderPipeline {
    let vertex_shader = device.create_shader_module(vertex_shader);
    let pixel_shader = device.create_shader_module(pixel_shader);

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        cache: None,
        label: Some("Mesh Render Pipeline"),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: &vertex_shader,
            entry_point: Some(options.vertex_entry_point()),
            buffers: vertex_layouts,
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: &pixel_shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format: color_format,
                blend,
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            // clockwise triangles face the viewer
            front_face: wgpu::FrontFace::Cw,
            cull_mode: options.cull_mode,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: None,
        multisample: wgpu::MultisampleState {
            count: 1,
            mask: !0,
            alpha_to_coverage_enabled: false,
        },
        multiview: None,
    })
}
