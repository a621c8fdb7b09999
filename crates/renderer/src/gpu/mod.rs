//! GPU orchestration.
//!
//! - `context` owns wgpu instance/device/surface wiring and knows how to
//!   rebuild swapchain state when the window resizes.
//! - `pipeline` compiles the static GLSL pair into a render pipeline with a
//!   single uniform bind group.
//! - `uniforms` mirrors the fragment shader's std140 block and is rewritten
//!   from the config each frame.
//! - `state` glues everything together and exposes the `GpuState` API used
//!   by `window`.

mod context;
mod pipeline;
mod state;
mod uniforms;

pub(crate) use state::GpuState;
