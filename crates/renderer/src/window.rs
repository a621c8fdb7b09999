//! Windowed presentation driven by `winit`.
//!
//! The event loop owns a [`WindowState`] that carries the GPU resources and
//! the animation clock. GPU initialisation failures are tolerated: the
//! window stays open and inert with an error logged, so a missing adapter
//! never takes the host process down.

use std::sync::Arc;
use std::time::Instant;

use anyhow::{anyhow, Result};
use tracing::{debug, error, info, warn};
use winit::dpi::{LogicalSize, PhysicalSize};
use winit::event::{Event, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::window::{Window, WindowBuilder};

use crate::config::{RenderConfig, RenderPolicy};
use crate::gpu::GpuState;
use crate::runtime::{AnimationClock, FrameScheduler};

const DEFAULT_SURFACE_SIZE: (u32, u32) = (800, 800);
const WINDOW_TITLE: &str = "Dithering Shader";

/// Aggregates the window, its GPU resources, and the animation clock.
pub(crate) struct WindowState {
    window: Arc<Window>,
    gpu: Option<GpuState>,
    config: RenderConfig,
    clock: AnimationClock,
    hidden: bool,
    drawn_since_resume: bool,
}

impl WindowState {
    pub(crate) fn new(window: Arc<Window>, config: RenderConfig, now: Instant) -> Self {
        let size = window.inner_size();
        let gpu = match GpuState::new(window.as_ref(), size, &config) {
            Ok(gpu) => Some(gpu),
            Err(err) => {
                // Inert window: events keep flowing, frames are skipped.
                error!("failed to initialise GPU renderer: {err:?}");
                None
            }
        };

        let clock = AnimationClock::new(config.speed, now);
        Self {
            window,
            gpu,
            config,
            clock,
            hidden: false,
            drawn_since_resume: false,
        }
    }

    pub(crate) fn window(&self) -> &Window {
        self.window.as_ref()
    }

    fn size(&self) -> PhysicalSize<u32> {
        self.gpu
            .as_ref()
            .map(GpuState::size)
            .unwrap_or_else(|| self.window.inner_size())
    }

    fn resize(&mut self, new_size: PhysicalSize<u32>) {
        if let Some(gpu) = self.gpu.as_mut() {
            gpu.resize(new_size);
        }
        self.drawn_since_resume = false;
    }

    fn paused(&self) -> bool {
        self.hidden && self.config.pause_when_hidden
    }

    fn set_hidden(&mut self, hidden: bool, now: Instant) {
        if hidden == self.hidden {
            return;
        }
        self.hidden = hidden;
        if !self.config.pause_when_hidden {
            return;
        }
        if hidden {
            // Fold elapsed time into the phase before the pause starts.
            self.clock.sample(now);
            debug!("surface hidden; pausing animation");
        } else {
            // Hidden wall-clock time must not advance the animation.
            self.clock.rebase(now);
            self.drawn_since_resume = false;
            debug!("surface visible again; resuming animation");
        }
    }

    fn render_frame(&mut self, now: Instant) -> Result<(), wgpu::SurfaceError> {
        let Some(gpu) = self.gpu.as_mut() else {
            return Ok(());
        };
        let time = self.clock.sample(now);
        gpu.render(&self.config, time)?;
        self.drawn_since_resume = true;
        Ok(())
    }

    /// Releases the GPU resources. Safe to call more than once.
    fn dispose(&mut self) {
        if self.gpu.take().is_some() {
            debug!("released GPU resources");
        }
    }
}

/// Runs the windowed renderer until the window is closed.
///
/// `Still` renders a single frame at the requested timestamp and keeps the
/// window open; `Animate` drives the clock continuously, pausing while the
/// window is occluded (unless configured otherwise).
pub fn run_windowed(config: RenderConfig, policy: RenderPolicy) -> Result<()> {
    let event_loop =
        EventLoop::new().map_err(|err| anyhow!("failed to create event loop: {err}"))?;

    let (width, height) = config.size.unwrap_or(DEFAULT_SURFACE_SIZE);
    let mut builder = WindowBuilder::new().with_title(WINDOW_TITLE);
    // An explicit size is given in logical pixels; without hidpi the backing
    // store keeps exactly the requested pixel count instead.
    builder = if config.high_density {
        builder.with_inner_size(LogicalSize::new(width, height))
    } else {
        builder.with_inner_size(PhysicalSize::new(width, height))
    };
    let window = Arc::new(
        builder
            .build(&event_loop)
            .map_err(|err| anyhow!("failed to create window: {err}"))?,
    );

    let now = Instant::now();
    let mut state = WindowState::new(window, config, now);
    if let RenderPolicy::Still { time } = policy {
        state.clock.set_speed(0.0, now);
        state.clock.set_elapsed(time, now);
    }
    let mut scheduler = FrameScheduler::new(&policy);

    info!(
        shape = %state.config.shape,
        dither = %state.config.dither,
        pixel_size = state.config.pixel_size,
        speed = state.clock.speed(),
        "starting windowed renderer"
    );

    if scheduler.ready_for_frame(now) {
        state.window().request_redraw();
    }

    event_loop
        .run(move |event, elwt| match event {
            Event::WindowEvent { window_id, event } if window_id == state.window().id() => {
                match event {
                    WindowEvent::CloseRequested | WindowEvent::Destroyed => {
                        state.dispose();
                        elwt.exit();
                    }
                    WindowEvent::Resized(new_size) => {
                        state.resize(new_size);
                        state.window().request_redraw();
                    }
                    WindowEvent::ScaleFactorChanged {
                        mut inner_size_writer,
                        scale_factor,
                    } => {
                        debug!(scale_factor, "display scale changed");
                        if !state.config.high_density {
                            if let Some((w, h)) = state.config.size {
                                let _ =
                                    inner_size_writer.request_inner_size(PhysicalSize::new(w, h));
                            }
                        }
                    }
                    WindowEvent::Occluded(occluded) => {
                        state.set_hidden(occluded, Instant::now());
                        if !state.paused() {
                            state.window().request_redraw();
                        }
                    }
                    WindowEvent::RedrawRequested => {
                        let now = Instant::now();
                        if state.paused() {
                            return;
                        }
                        match state.render_frame(now) {
                            Ok(()) => scheduler.mark_rendered(now),
                            Err(wgpu::SurfaceError::Lost) | Err(wgpu::SurfaceError::Outdated) => {
                                let size = state.size();
                                state.resize(size);
                            }
                            Err(wgpu::SurfaceError::OutOfMemory) => {
                                error!("surface out of memory; exiting");
                                state.dispose();
                                elwt.exit();
                            }
                            Err(err) => {
                                warn!("surface error: {err:?}; retrying next frame");
                            }
                        }
                    }
                    _ => {}
                }
            }
            Event::AboutToWait => {
                let now = Instant::now();
                // A frozen clock produces identical frames, so one is enough
                // until something (resize, resume) invalidates it.
                let wants_frame = !state.paused()
                    && scheduler.ready_for_frame(now)
                    && (!state.clock.is_frozen() || !state.drawn_since_resume);
                if wants_frame {
                    state.window().request_redraw();
                    elwt.set_control_flow(ControlFlow::Wait);
                } else if let Some(deadline) = scheduler.next_deadline() {
                    elwt.set_control_flow(ControlFlow::WaitUntil(deadline));
                } else {
                    elwt.set_control_flow(ControlFlow::Wait);
                }
            }
            _ => {}
        })
        .map_err(|err| anyhow!("window event loop error: {err}"))
}
