use std::sync::Arc;

use anyhow::{Context as _, bail};
use wgpu::util::DeviceExt;
use winit::window::Window;

use crate::{
    camera::{CameraResources, CameraUniform, Projection},
    data_structures::mesh::Mesh,
    pipelines::mesh::{PipelineOptions, mk_mesh_pipeline},
    resources::{self, ShaderSources},
    settings::{Geometry, Settings},
};

/// Everything that is uploaded once and drawn every frame: buffers, camera
/// uniform and the pipeline.
///
/// Each resource sits in an `Option` so [`release`](Self::release) can free
/// them in a fixed order and be called any number of times.
#[derive(Debug)]
pub struct SceneResources {
    pub name: String,
    pub options: PipelineOptions,
    /// Index count when drawing indexed, vertex count otherwise.
    pub draw_count: u32,
    vertex_buffer: Option<wgpu::Buffer>,
    index_buffer: Option<wgpu::Buffer>,
    camera: Option<CameraResources>,
    pipeline: Option<wgpu::RenderPipeline>,
}

impl SceneResources {
    pub fn new(
        device: &wgpu::Device,
        color_format: wgpu::TextureFormat,
        mesh: &Mesh,
        camera: Option<CameraUniform>,
        shaders: &ShaderSources,
        options: PipelineOptions,
    ) -> anyhow::Result<Self> {
        if mesh.indices.is_empty() {
            bail!("{} has no triangles to draw", mesh.name);
        }
        mesh.validate()?;

        let (vertices, draw_count) = if options.indexed {
            (mesh.vertices.clone(), mesh.index_count())
        } else {
            let vertices = mesh.unindexed();
            let count = vertices.len() as u32;
            (vertices, count)
        };

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{:?} Vertex Buffer", mesh.name)),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let index_buffer = options.indexed.then(|| {
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("{:?} Index Buffer", mesh.name)),
                contents: bytemuck::cast_slice(mesh.flat_indices()),
                usage: wgpu::BufferUsages::INDEX,
            })
        });

        let camera = match (options.camera, camera) {
            (true, Some(uniform)) => Some(CameraResources::new(device, uniform)),
            (true, None) => bail!("The camera pipeline needs a camera uniform"),
            (false, _) => None,
        };

        let pipeline = mk_mesh_pipeline(
            device,
            color_format,
            shaders,
            camera.as_ref().map(|c| &c.bind_group_layout),
            options,
        );

        Ok(Self {
            name: mesh.name.clone(),
            options,
            draw_count,
            vertex_buffer: Some(vertex_buffer),
            index_buffer,
            camera,
            pipeline: Some(pipeline),
        })
    }

    /// Record the draw into `render_pass`. A released scene records nothing.
    pub fn draw(&self, render_pass: &mut wgpu::RenderPass<'_>) {
        let (Some(pipeline), Some(vertex_buffer)) = (&self.pipeline, &self.vertex_buffer) else {
            return;
        };
        render_pass.set_pipeline(pipeline);
        if let Some(camera) = &self.camera {
            render_pass.set_bind_group(0, &camera.bind_group, &[]);
        }
        render_pass.set_vertex_buffer(0, vertex_buffer.slice(..));
        match (self.options.indexed, &self.index_buffer) {
            (true, Some(index_buffer)) => {
                render_pass.set_index_buffer(index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                render_pass.draw_indexed(0..self.draw_count, 0, 0..1);
            }
            (false, _) => render_pass.draw(0..self.draw_count, 0..1),
            (true, None) => (),
        }
    }

    pub fn camera(&self) -> Option<&CameraResources> {
        self.camera.as_ref()
    }

    pub fn is_released(&self) -> bool {
        self.vertex_buffer.is_none()
            && self.index_buffer.is_none()
            && self.camera.is_none()
            && self.pipeline.is_none()
    }

    /// Free vertex buffer, index buffer, camera buffer and pipeline, in that
    /// order. Resources that are already gone are skipped.
    pub fn release(&mut self) {
        if let Some(buffer) = self.vertex_buffer.take() {
            buffer.destroy();
        }
        if let Some(buffer) = self.index_buffer.take() {
            buffer.destroy();
        }
        if let Some(camera) = self.camera.take() {
            camera.buffer.destroy();
        }
        if self.pipeline.take().is_some() {
            log::debug!("Released scene resources of {:?}", self.name);
        }
    }
}

impl Drop for SceneResources {
    fn drop(&mut self) {
        self.release();
    }
}

/// The device context: surface, device, queue and the uploaded scene.
///
/// Fields are dropped top to bottom, so the scene goes first, then the
/// surface, the queue, the device and finally the window.
#[derive(Debug)]
pub struct Context {
    pub scene: SceneResources,
    pub surface: wgpu::Surface<'static>,
    pub queue: wgpu::Queue,
    pub device: wgpu::Device,
    pub config: wgpu::SurfaceConfiguration,
    pub clear_colour: wgpu::Color,
    pub(crate) window: Arc<Window>,
}

impl Context {
    pub async fn new(window: Arc<Window>, settings: &Settings) -> anyhow::Result<Self> {
        let size = window.inner_size();

        log::info!("WGPU setup");
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .context("Failed to create a surface for the window")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("No hardware adapter can present to this window")?;
        let info = adapter.get_info();
        log::info!("Adapter: {} ({:?}, {:?})", info.name, info.backend, info.device_type);
        if info.device_type == wgpu::DeviceType::Cpu {
            log::warn!("{} is a software rasterizer", info.name);
        }

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("mesh-ngin device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                ..Default::default()
            })
            .await
            .context("Failed to create the device")?;

        let surface_caps = surface.get_capabilities(&adapter);
        // Colours are written as-is, so prefer a linear (non-sRGB) back buffer.
        let Some(surface_format) = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| !f.is_srgb())
            .or_else(|| surface_caps.formats.first().copied())
        else {
            bail!("The surface is not compatible with {}", info.name);
        };
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: settings.present_mode(&surface_caps.present_modes),
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);
        log::info!(
            "Surface {}x{} {:?} {:?}",
            config.width,
            config.height,
            config.format,
            config.present_mode
        );

        let (mesh, shaders) = futures::try_join!(
            load_geometry(&settings.geometry),
            resources::load_shaders(&settings.vertex_shader, &settings.pixel_shader),
        )?;

        let camera = settings.use_camera.then(|| {
            let projection = Projection::new(
                config.width,
                config.height,
                settings.fovy,
                settings.znear,
                settings.zfar,
            );
            CameraUniform::new(&settings.camera, &projection)
        });

        let scene = SceneResources::new(
            &device,
            config.format,
            &mesh,
            camera,
            &shaders,
            settings.pipeline_options(),
        )?;

        Ok(Self {
            scene,
            surface,
            queue,
            device,
            config,
            clear_colour: settings.clear_colour,
            window,
        })
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    /// Reconfigure the surface for a new window size. The camera keeps the
    /// aspect ratio it was built with.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.config.width = width;
            self.config.height = height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    /// Reconfigure with the current window size, e.g. after the surface was
    /// lost.
    pub fn reconfigure(&mut self) {
        let size = self.window.inner_size();
        self.resize(size.width, size.height);
    }

    /// Release the GPU resources owned by the scene. Safe to call repeatedly;
    /// the remaining handles are released when the context is dropped.
    pub fn release(&mut self) {
        self.scene.release();
    }
}

pub async fn load_geometry(geometry: &Geometry) -> anyhow::Result<Mesh> {
    match geometry {
        Geometry::Triangle => Ok(Mesh::triangle()),
        Geometry::Model(file_name) => resources::load_mesh(file_name)
            .await
            .with_context(|| format!("Failed to load model {file_name}")),
    }
}
