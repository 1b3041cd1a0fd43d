use anyhow::{Context, Result};
use ouroboros::self_referencing;

use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::core::{App, AppControl, FrameCtx, WindowCtx};
use crate::device::{Gpu, GpuInit};
use crate::input::PointerState;
use crate::time::FrameClock;

/// Window configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "quill".to_string(),
            initial_size: LogicalSize::new(1280.0, 720.0),
        }
    }
}

/// Runs one window with a GPU surface until the app exits or the window
/// closes.
pub struct Runtime;

impl Runtime {
    /// Blocks on the winit event loop.
    ///
    /// Window or GPU setup failures end the loop and are returned here.
    pub fn run<A>(config: RuntimeConfig, gpu_init: GpuInit, app: A) -> Result<()>
    where
        A: App + 'static,
    {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut driver = Driver {
            config,
            gpu_init,
            app,
            surface: None,
            failure: None,
        };

        event_loop
            .run_app(&mut driver)
            .context("winit event loop terminated with error")?;

        match driver.failure {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

/// The window, the GPU surface borrowing it, and per-window frame state.
#[self_referencing]
struct Surface {
    clock: FrameClock,
    pointer: PointerState,

    window: Window,

    #[borrows(window)]
    #[covariant]
    gpu: Gpu<'this>,
}

impl Surface {
    fn open(event_loop: &ActiveEventLoop, config: &RuntimeConfig, gpu_init: GpuInit) -> Result<Self> {
        let attrs = Window::default_attributes()
            .with_title(config.title.clone())
            .with_inner_size(config.initial_size);
        let window = event_loop.create_window(attrs).context("failed to create window")?;

        SurfaceTryBuilder {
            clock: FrameClock::default(),
            pointer: PointerState::new(),
            window,
            gpu_builder: |w| pollster::block_on(Gpu::new(w, gpu_init)),
        }
        .try_build()
        .context("GPU initialization failed for window")
    }

    fn id(&self) -> WindowId {
        self.borrow_window().id()
    }

    fn request_redraw(&self) {
        self.borrow_window().request_redraw();
    }

    /// Matches the surface to the window's current physical size.
    fn sync_size(&mut self) {
        let size = self.borrow_window().inner_size();
        self.with_gpu_mut(|gpu| gpu.resize(size));
    }
}

struct Driver<A: App> {
    config: RuntimeConfig,
    gpu_init: GpuInit,
    app: A,

    surface: Option<Surface>,
    failure: Option<anyhow::Error>,
}

impl<A: App> Driver<A> {
    fn fail(&mut self, event_loop: &ActiveEventLoop, error: anyhow::Error) {
        log::error!("{error:#}");
        self.failure = Some(error);
        event_loop.exit();
    }

    fn close(&mut self, event_loop: &ActiveEventLoop) {
        // Drop the GPU and surface before the loop winds down.
        self.surface = None;
        event_loop.exit();
    }

    /// Forwards `event` to the pointer tracker and the app.
    fn dispatch(&mut self, event: &WindowEvent) -> AppControl {
        let Self { app, surface, .. } = self;
        let Some(surface) = surface.as_mut() else {
            return AppControl::Continue;
        };
        surface.with_mut(|fields| {
            fields.pointer.handle_event(event);
            app.on_window_event(&WindowCtx { window: fields.window }, event)
        })
    }

    fn redraw(&mut self) -> AppControl {
        let Self { app, surface, .. } = self;
        let Some(surface) = surface.as_mut() else {
            return AppControl::Continue;
        };
        surface.with_mut(|fields| {
            let mut ctx = FrameCtx {
                window: WindowCtx { window: fields.window },
                gpu: fields.gpu,
                time: fields.clock.tick(),
                pointer: fields.pointer.take_frame(),
            };
            app.on_frame(&mut ctx)
        })
    }
}

impl<A: App> ApplicationHandler for Driver<A> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.surface.is_some() {
            return;
        }
        match Surface::open(event_loop, &self.config, self.gpu_init.clone()) {
            Ok(surface) => {
                surface.request_redraw();
                self.surface = Some(surface);
            }
            Err(e) => self.fail(event_loop, e.context("failed to open the initial window")),
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        event_loop.set_control_flow(ControlFlow::Wait);
        // Continuous redraw.
        if let Some(surface) = &self.surface {
            surface.request_redraw();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, window_id: WindowId, event: WindowEvent) {
        if self.surface.as_ref().is_none_or(|s| s.id() != window_id) {
            return;
        }

        if self.dispatch(&event) == AppControl::Exit {
            self.close(event_loop);
            return;
        }

        match event {
            WindowEvent::CloseRequested => self.close(event_loop),

            WindowEvent::Resized(_) => {
                if let Some(surface) = self.surface.as_mut() {
                    surface.sync_size();
                    surface.request_redraw();
                }
            }

            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                log::debug!("scale factor changed to {scale_factor}");
                if let Some(surface) = self.surface.as_mut() {
                    surface.sync_size();
                    surface.request_redraw();
                }
            }

            WindowEvent::RedrawRequested => {
                if self.redraw() == AppControl::Exit {
                    self.close(event_loop);
                }
            }

            _ => {}
        }
    }
}
