//! Start-up configuration.
//!
//! Everything the renderer needs to know before it opens the window lives in
//! [`Settings`]. The presets reproduce the three bootstrap stages the renderer
//! grew through:
//!
//! - [`Settings::triangle`] draws a hard-coded triangle in clip space
//! - [`Settings::mesh`] draws the loaded model without an index buffer
//! - [`Settings::indexed_camera`] (the default) draws the loaded model with an
//!   index buffer through the perspective camera

use cgmath::Rad;

use crate::{camera::Camera, pipelines::mesh::PipelineOptions};

/// Where the vertices come from.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    /// The built-in RGB triangle.
    Triangle,
    /// A model file, relative to the assets root.
    Model(String),
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub geometry: Geometry,
    pub vertex_shader: String,
    pub pixel_shader: String,
    pub clear_colour: wgpu::Color,
    pub camera: Camera,
    /// Vertical field of view.
    pub fovy: Rad<f32>,
    pub znear: f32,
    pub zfar: f32,
    /// Wait for vertical blank when presenting.
    pub vsync: bool,
    pub indexed: bool,
    pub use_camera: bool,
}

impl Settings {
    pub const DEFAULT_MODEL: &'static str = "models/cube.obj";
    pub const VERTEX_SHADER: &'static str = "shaders/vertex.wgsl";
    pub const PIXEL_SHADER: &'static str = "shaders/pixel.wgsl";
    pub const CORNFLOWER_BLUE: wgpu::Color = wgpu::Color {
        r: 0.392,
        g: 0.584,
        b: 0.929,
        a: 1.0,
    };

    pub fn triangle() -> Self {
        Self {
            width: 800,
            height: 600,
            geometry: Geometry::Triangle,
            vsync: true,
            indexed: false,
            use_camera: false,
            ..Self::indexed_camera()
        }
    }

    pub fn mesh() -> Self {
        Self {
            indexed: false,
            use_camera: false,
            ..Self::indexed_camera()
        }
    }

    pub fn indexed_camera() -> Self {
        Self {
            title: "mesh-ngin".to_string(),
            width: 1600,
            height: 900,
            geometry: Geometry::Model(Self::DEFAULT_MODEL.to_string()),
            vertex_shader: Self::VERTEX_SHADER.to_string(),
            pixel_shader: Self::PIXEL_SHADER.to_string(),
            clear_colour: Self::CORNFLOWER_BLUE,
            camera: Camera::default(),
            // roughly 172 degrees
            fovy: Rad(3.0),
            znear: 0.1,
            zfar: 1000.0,
            vsync: false,
            indexed: true,
            use_camera: true,
        }
    }

    pub fn with_model(mut self, file_name: impl Into<String>) -> Self {
        self.geometry = Geometry::Model(file_name.into());
        self
    }

    pub fn with_fovy<F: Into<Rad<f32>>>(mut self, fovy: F) -> Self {
        self.fovy = fovy.into();
        self
    }

    pub fn pipeline_options(&self) -> PipelineOptions {
        PipelineOptions {
            indexed: self.indexed,
            camera: self.use_camera,
            // The camera stage culls front faces; the clip-space triangle keeps
            // the rasterizer default of culling back faces.
            cull_mode: if self.use_camera {
                Some(wgpu::Face::Front)
            } else {
                Some(wgpu::Face::Back)
            },
        }
    }

    pub fn present_mode(&self, supported: &[wgpu::PresentMode]) -> wgpu::PresentMode {
        if !self.vsync && supported.contains(&wgpu::PresentMode::Immediate) {
            wgpu::PresentMode::Immediate
        } else {
            wgpu::PresentMode::Fifo
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::indexed_camera()
    }
}
