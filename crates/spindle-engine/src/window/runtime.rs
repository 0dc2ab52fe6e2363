use anyhow::{Context, Result};
use ouroboros::self_referencing;

use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::core::{CloseReason, FrameLoop, Lifecycle, LoopState, SceneConfig};
use crate::device::{Gpu, GpuInit};
use crate::render::{RenderCtx, ShaderSources, TriangleScene, WgpuFrameBackend};
use crate::time::SystemClock;

/// Window/runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
}

impl RuntimeConfig {
    /// Aspect ratio of the initial window size; degenerate sizes give 1.0.
    pub fn aspect(&self) -> f32 {
        let LogicalSize { width, height } = self.initial_size;
        if width > 0.0 && height > 0.0 {
            (width / height) as f32
        } else {
            1.0
        }
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "Spinning Triangle".to_string(),
            initial_size: LogicalSize::new(1200.0, 800.0),
        }
    }
}

/// Entry point for the runtime.
pub struct Runtime;

impl Runtime {
    /// Opens the window, renders the spinning triangle until it is closed, and
    /// tears everything down.
    ///
    /// Returns an error when the event loop, window, GPU context or shader
    /// program cannot be created, or when the surface fails mid-run.
    pub fn run(config: RuntimeConfig, gpu_init: GpuInit, scene: SceneConfig) -> Result<()> {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut state = AppState::new(config, gpu_init, scene);

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        state.teardown();
        log::info!("teardown complete: {:?}", state.lifecycle.released());

        match state.fatal.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[self_referencing]
struct WindowEntry {
    window: Window,

    #[borrows(window)]
    #[covariant]
    gpu: Gpu<'this>,
}

struct AppState {
    config: RuntimeConfig,
    gpu_init: GpuInit,
    scene_config: SceneConfig,

    window: Option<WindowEntry>,
    scene: Option<TriangleScene>,
    frame_loop: Option<FrameLoop<SystemClock>>,

    lifecycle: Lifecycle,
    fatal: Option<anyhow::Error>,
    started: bool,
}

impl AppState {
    fn new(config: RuntimeConfig, gpu_init: GpuInit, scene_config: SceneConfig) -> Self {
        Self {
            config,
            gpu_init,
            scene_config,
            window: None,
            scene: None,
            frame_loop: None,
            lifecycle: Lifecycle::new(),
            fatal: None,
            started: false,
        }
    }

    /// Creates the window, its GPU context, and the triangle scene.
    fn start(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(self.config.initial_size);

        let window = event_loop
            .create_window(attrs)
            .context("failed to create window")?;
        log::info!("window created: \"{}\" {:?}", self.config.title, window.inner_size());

        let gpu_init = self.gpu_init.clone();
        let entry = WindowEntry::try_new(window, |w| pollster::block_on(Gpu::new(w, gpu_init)))
            .context("GPU initialization failed")?;

        // Keep the context even if the scene fails, so teardown still releases it.
        let scene = entry.with_gpu(|gpu| {
            TriangleScene::build(&RenderCtx::from_gpu(gpu), &ShaderSources::TRIANGLE)
        });
        self.window = Some(entry);
        let scene = scene.context("failed to build the triangle shader program")?;

        self.scene = Some(scene);
        self.frame_loop = Some(FrameLoop::new(
            SystemClock::new(),
            &self.scene_config,
            self.config.aspect(),
        ));
        Ok(())
    }

    /// Stores the first fatal error for `Runtime::run` to return, then shuts down.
    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        log::debug!("stopping after fatal error: {err:#}");
        if self.fatal.is_none() {
            self.fatal = Some(err);
        }
        self.teardown();
        event_loop.exit();
    }

    /// Releases the scene handles, then the window and its GPU context.
    ///
    /// Idempotent: handles already released are gone from `self`.
    fn teardown(&mut self) {
        self.frame_loop = None;
        self.lifecycle
            .release_remaining(&mut self.scene, &mut self.window);
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let (Some(entry), Some(scene), Some(frame_loop)) = (
            self.window.as_mut(),
            self.scene.as_ref(),
            self.frame_loop.as_mut(),
        ) else {
            return;
        };

        let (state, failure) = entry.with_mut(|fields| {
            let mut backend = WgpuFrameBackend::new(fields.gpu, scene, fields.window);
            let state = frame_loop.iterate(&mut backend);
            (state, backend.take_failure())
        });

        if state == LoopState::Running {
            return;
        }

        if frame_loop.close_reason() == Some(CloseReason::SurfaceFailed) {
            let err = match failure {
                Some(e) => anyhow::Error::new(e).context("rendering surface failed"),
                None => anyhow::anyhow!("rendering surface failed"),
            };
            self.fail(event_loop, err);
        } else {
            self.teardown();
            event_loop.exit();
        }
    }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.started {
            return;
        }
        self.started = true;

        match self.start(event_loop) {
            Ok(()) => {
                if let Some(entry) = &self.window {
                    entry.with_window(|w| w.request_redraw());
                }
            }
            Err(e) => self.fail(event_loop, e),
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        event_loop.set_control_flow(ControlFlow::Wait);

        // Continuous redraw while the loop is running.
        if let Some(entry) = &self.window {
            entry.with_window(|w| w.request_redraw());
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(entry) = self.window.as_mut() else {
            return;
        };
        if entry.with_window(|w| w.id()) != window_id {
            return;
        }

        match event {
            WindowEvent::CloseRequested => {
                log::info!("close requested");
                if let Some(frame_loop) = self.frame_loop.as_mut() {
                    frame_loop.request_close();
                }
                self.teardown();
                event_loop.exit();
            }

            WindowEvent::Resized(new_size) => {
                entry.with_gpu_mut(|gpu| gpu.resize(new_size));
                entry.with_window(|w| w.request_redraw());
            }

            WindowEvent::ScaleFactorChanged { .. } => {
                let new_size = entry.with_window(|w| w.inner_size());
                entry.with_gpu_mut(|gpu| gpu.resize(new_size));
                entry.with_window(|w| w.request_redraw());
            }

            WindowEvent::RedrawRequested => self.redraw(event_loop),

            _ => {}
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        self.teardown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_matches_the_demo_window() {
        let c = RuntimeConfig::default();
        assert_eq!(c.title, "Spinning Triangle");
        assert_eq!(c.initial_size, LogicalSize::new(1200.0, 800.0));
        assert_eq!(c.aspect(), 1.5);
    }

    #[test]
    fn degenerate_size_falls_back_to_square_aspect() {
        let c = RuntimeConfig {
            initial_size: LogicalSize::new(640.0, 0.0),
            ..RuntimeConfig::default()
        };
        assert_eq!(c.aspect(), 1.0);
    }
}
