//! Application event loop.
//!
//! The loop alternates between draining pending window events and rendering
//! one frame when none are left: `winit` runs in [`ControlFlow::Poll`], and
//! [`ApplicationHandler::about_to_wait`] requests a redraw after each batch of
//! events.
//!
//! # Lifecycle
//!
//! 1. `resumed` creates the window and the [`Context`] (device, surface, scene)
//! 2. every `RedrawRequested` renders one frame through [`Context::render`]
//! 3. closing the window, or a frame failure that cannot be recovered, ends
//!    the loop; the context is released before the loop returns
//!
//! The loop's outcome becomes the process exit code: `0` after a normal close,
//! `1` when start-up or rendering failed.

use std::{process::ExitCode, sync::Arc};

use instant::{Duration, Instant};
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

use crate::{context::Context, settings::Settings};

/// What the loop does after a frame failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameRecovery {
    /// Reconfigure the surface and keep going.
    Reconfigure,
    /// Drop this frame and try the next one.
    Skip,
    /// Shut down cleanly and exit with a failure code.
    Exit,
}

impl FrameRecovery {
    pub fn for_error(error: &wgpu::SurfaceError) -> Self {
        match error {
            wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => Self::Reconfigure,
            wgpu::SurfaceError::Timeout => Self::Skip,
            _ => Self::Exit,
        }
    }
}

/// Counts frames and logs the rate about once a second.
#[derive(Debug)]
struct FrameStats {
    frames: u32,
    since: Instant,
}

impl FrameStats {
    fn new() -> Self {
        Self {
            frames: 0,
            since: Instant::now(),
        }
    }

    fn frame(&mut self) {
        self.frames += 1;
        let elapsed = self.since.elapsed();
        if elapsed >= Duration::from_secs(1) {
            log::debug!(
                "{:.1} fps",
                self.frames as f64 / elapsed.as_secs_f64()
            );
            self.frames = 0;
            self.since = Instant::now();
        }
    }
}

pub struct App {
    async_runtime: tokio::runtime::Runtime,
    settings: Settings,
    ctx: Option<Context>,
    stats: FrameStats,
    exit_code: u8,
}

impl App {
    pub fn new(settings: Settings) -> anyhow::Result<Self> {
        let async_runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        Ok(Self {
            async_runtime,
            settings,
            ctx: None,
            stats: FrameStats::new(),
            exit_code: 0,
        })
    }

    pub fn exit_code(&self) -> ExitCode {
        ExitCode::from(self.exit_code)
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop) {
        self.exit_code = 1;
        self.shutdown();
        event_loop.exit();
    }

    fn shutdown(&mut self) {
        if let Some(mut ctx) = self.ctx.take() {
            log::info!("Shutting down");
            ctx.release();
        }
    }

    fn render(&mut self, event_loop: &ActiveEventLoop) {
        let Some(ctx) = &mut self.ctx else {
            return;
        };
        match ctx.render() {
            Ok(()) => self.stats.frame(),
            Err(e) => match FrameRecovery::for_error(&e) {
                FrameRecovery::Reconfigure => {
                    log::warn!("Surface {e}, reconfiguring");
                    ctx.reconfigure();
                }
                FrameRecovery::Skip => log::warn!("Frame skipped: {e}"),
                FrameRecovery::Exit => {
                    log::error!("Unable to render {e}");
                    self.fail(event_loop);
                }
            },
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.ctx.is_some() {
            return;
        }

        let window_attributes = Window::default_attributes()
            .with_title(self.settings.title.clone())
            .with_inner_size(PhysicalSize::new(self.settings.width, self.settings.height));
        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                log::error!("Failed to create the window: {e}");
                self.fail(event_loop);
                return;
            }
        };

        match self
            .async_runtime
            .block_on(Context::new(window, &self.settings))
        {
            Ok(ctx) => {
                log::info!("Ready to draw {:?}", ctx.scene.name);
                self.ctx = Some(ctx);
            }
            Err(e) => {
                log::error!("Initialization failed: {e:#}");
                self.fail(event_loop);
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                self.shutdown();
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                if let Some(ctx) = &mut self.ctx {
                    ctx.resize(size.width, size.height);
                }
            }
            WindowEvent::RedrawRequested => self.render(event_loop),
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(ctx) = &self.ctx {
            ctx.window().request_redraw();
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        self.shutdown();
    }
}

/// Open the window, run the loop until it ends and return its exit code.
pub fn run(settings: Settings) -> anyhow::Result<ExitCode> {
    if let Err(e) = env_logger::try_init() {
        println!("Warning: Could not initialize logger: {}", e);
    }

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(settings)?;
    event_loop.run_app(&mut app)?;

    Ok(app.exit_code())
}
