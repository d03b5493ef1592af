//! Fixed perspective camera.
//!
//! The camera is built once at start-up from an eye position, a target and an
//! up vector, and uploaded once as a [`CameraUniform`]. Both matrices follow
//! the left-handed convention with a `[0, 1]` depth range, which is also the
//! clip space wgpu expects, so no extra correction matrix is needed.

use cgmath::{Matrix4, Point3, Rad, Vector3};
use wgpu::util::DeviceExt;

/// Look-at camera: where it sits, what it looks at and which way is up.
#[derive(Debug, Clone, Copy)]
pub struct Camera {
    pub eye: Point3<f32>,
    pub target: Point3<f32>,
    pub up: Vector3<f32>,
}

impl Camera {
    pub fn new<E: Into<Point3<f32>>, T: Into<Point3<f32>>, U: Into<Vector3<f32>>>(
        eye: E,
        target: T,
        up: U,
    ) -> Self {
        Self {
            eye: eye.into(),
            target: target.into(),
            up: up.into(),
        }
    }

    pub fn calc_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_lh(self.eye, self.target, self.up)
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new((0.0, 0.0, 3.0), (0.0, 0.0, 0.0), (0.0, 1.0, 0.0))
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Projection {
    aspect: f32,
    fovy: Rad<f32>,
    znear: f32,
    zfar: f32,
}

impl Projection {
    pub fn new<F: Into<Rad<f32>>>(width: u32, height: u32, fovy: F, znear: f32, zfar: f32) -> Self {
        Self::with_aspect(width as f32 / height.max(1) as f32, fovy, znear, zfar)
    }

    pub fn with_aspect<F: Into<Rad<f32>>>(aspect: f32, fovy: F, znear: f32, zfar: f32) -> Self {
        Self {
            aspect,
            fovy: fovy.into(),
            znear,
            zfar,
        }
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    /// Left-handed perspective projection mapping `znear..zfar` to `0..1`.
    pub fn calc_matrix(&self) -> Matrix4<f32> {
        let y_scale = 1.0 / (self.fovy.0 / 2.0).tan();
        let x_scale = y_scale / self.aspect;
        let range = self.zfar / (self.zfar - self.znear);

        // cgmath takes the arguments column by column
        #[rustfmt::skip]
        let m = Matrix4::new(
            x_scale, 0.0,     0.0,                 0.0,
            0.0,     y_scale, 0.0,                 0.0,
            0.0,     0.0,     range,               1.0,
            0.0,     0.0,     -range * self.znear, 0.0,
        );
        m
    }
}

/// GPU copy of the camera: view and projection matrices.
///
/// Matrices are stored column by column, the layout WGSL reads a `mat4x4<f32>`
/// in. That is the transposition the row-major maths of other APIs has to do
/// by hand before uploading.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    pub view: [[f32; 4]; 4],
    pub projection: [[f32; 4]; 4],
}

impl CameraUniform {
    pub fn new(camera: &Camera, projection: &Projection) -> Self {
        Self {
            view: camera.calc_matrix().into(),
            projection: projection.calc_matrix().into(),
        }
    }
}

/// Camera uniform buffer plus the bind group that exposes it at
/// `@group(0) @binding(0)`.
#[derive(Debug)]
pub struct CameraResources {
    pub uniform: CameraUniform,
    pub buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
    pub bind_group_layout: wgpu::BindGroupLayout,
}

impl CameraResources {
    pub fn new(device: &wgpu::Device, uniform: CameraUniform) -> Self {
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Camera Buffer"),
            contents: bytemuck::cast_slice(&[uniform]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group_layout = mk_bind_group_layout(device);

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
            label: Some("camera_bind_group"),
        });

        Self {
            uniform,
            buffer,
            bind_group,
            bind_group_layout,
        }
    }
}

pub fn mk_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        }],
        label: Some("camera_bind_group_layout"),
    })
}
