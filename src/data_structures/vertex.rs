//! Vertex layout shared by every mesh the renderer draws.
//!
//! A [`Vertex`] is a position followed by an RGBA colour. The byte layout is
//! fixed: 12 bytes of position at offset 0 and 16 bytes of colour at offset 12,
//! which is what [`Vertex::desc`] advertises to the vertex shader.

/// Solid colour assigned to every imported vertex. Model positions carry no
/// shading information, so the whole mesh is drawn in one colour.
pub const MESH_COLOR: [f32; 4] = [0.949, 0.353, 0.114, 1.0];

/// A single vertex: position in model space and a straight RGBA colour.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub color: [f32; 4],
}

impl Vertex {
    const ATTRIBS: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x4];

    pub fn new(position: [f32; 3], color: [f32; 4]) -> Self {
        Self { position, color }
    }

    /// A vertex at `position` in the solid [`MESH_COLOR`].
    pub fn solid(position: [f32; 3]) -> Self {
        Self::new(position, MESH_COLOR)
    }

    /// Input layout: `@location(0)` position, `@location(1)` colour.
    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBS,
        }
    }
}
