//! wgpu graphics device for the roomview scene pipeline.
//!
//! Each renderable owns its vertex/index buffers, texture, and transform
//! uniform. Draws recorded between `begin_frame` and `end_frame` are encoded
//! into one render pass in submission order.
//!
//! # Invariants
//! - Shader stage modules are dropped once the pipeline is built.
//! - Texture pixels are copied to the GPU; the caller keeps ownership.

mod gpu;
mod shaders;

pub use gpu::{CompiledStage, GpuDrawable, ProgramHandle, WgpuDevice};
pub use shaders::{FRAGMENT_ENTRY, GpuVertex, TransformUniform, VERTEX_ENTRY};
