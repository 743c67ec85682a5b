//! Rendering adapter: backend-agnostic scene pipeline.
//!
//! The graphics backend is reached only through [`GraphicsDevice`]. Shader
//! programs are built once at startup, the scene catalog is loaded once, and
//! the frame driver then issues one draw per renderable per frame.
//!
//! # Invariants
//! - Renderers never mutate mesh or texture data after load.
//! - Catalog insertion order is draw order.
//! - The composed transform is recomputed every frame and never cached.

mod catalog;
mod error;
mod frame;
mod program;
mod renderer;

pub use catalog::{LoadReport, Renderable, SceneCatalog};
pub use error::RenderError;
pub use frame::{FrameDriver, FrameHost, ScriptedHost};
pub use program::{ProgramCompiler, read_source};
pub use renderer::{
    DebugDrawable, DebugProgram, DebugStage, DebugTextDevice, GraphicsDevice, ShaderStage,
};

pub fn crate_info() -> &'static str {
    "roomview-render v0.1.0"
}
