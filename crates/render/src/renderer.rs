use crate::error::RenderError;
use glam::{Mat4, Vec4};
use roomview_assets::TexturePixels;
use roomview_common::Mesh;
use std::fmt;
use std::fmt::Write;

/// Programmable pipeline stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    /// WGSL attribute that marks this stage's entry point.
    pub fn entry_attribute(self) -> &'static str {
        match self {
            ShaderStage::Vertex => "@vertex",
            ShaderStage::Fragment => "@fragment",
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => f.write_str("vertex"),
            ShaderStage::Fragment => f.write_str("fragment"),
        }
    }
}

/// Backend-agnostic graphics device. All backends implement this trait.
///
/// The scene pipeline compiles programs, uploads renderables, and submits
/// draws only through these operations; it never touches backend objects.
pub trait GraphicsDevice {
    /// A compiled shader stage, released when dropped.
    type Stage;
    /// A linked program. Clones refer to the same program.
    type Program: Clone;
    /// Device-resident mesh, texture and per-draw state of one renderable.
    type Drawable;

    /// Compile one stage. The error carries the backend's diagnostic text.
    fn compile_stage(&mut self, stage: ShaderStage, source: &str) -> Result<Self::Stage, String>;

    /// Link a vertex and a fragment stage. The error carries the backend's diagnostic text.
    fn link_program(
        &mut self,
        vertex: &Self::Stage,
        fragment: &Self::Stage,
    ) -> Result<Self::Program, String>;

    /// Upload a mesh and its texture for drawing with `program`.
    fn create_drawable(
        &mut self,
        label: &str,
        mesh: &Mesh,
        texture: &TexturePixels,
        program: &Self::Program,
    ) -> Result<Self::Drawable, RenderError>;

    /// Start recording a frame.
    fn begin_frame(&mut self) -> Result<(), RenderError>;

    /// Draw one renderable with the given clip-space transform.
    fn draw(&mut self, drawable: &Self::Drawable, transform: &Mat4) -> Result<(), RenderError>;

    /// Submit and present the recorded frame.
    fn end_frame(&mut self) -> Result<(), RenderError>;
}

/// Stage accepted by [`DebugTextDevice`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DebugStage {
    pub stage: ShaderStage,
    pub lines: usize,
}

/// Program handle issued by [`DebugTextDevice`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DebugProgram(pub usize);

/// Renderable uploaded to [`DebugTextDevice`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DebugDrawable {
    pub label: String,
    pub program: DebugProgram,
    pub triangles: usize,
}

/// Debug text device: a headless stand-in for a GPU backend.
///
/// Produces a human-readable log of every device operation. Useful for CLI
/// output, logging, and testing the scene pipeline without a window.
#[derive(Debug, Default)]
pub struct DebugTextDevice {
    out: String,
    programs: usize,
    frames: u64,
    in_frame: bool,
}

impl DebugTextDevice {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn output(&self) -> &str {
        &self.out
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Labels of every draw in submission order, across all frames.
    pub fn draw_labels(&self) -> Vec<&str> {
        self.out
            .lines()
            .filter_map(|l| l.strip_prefix("  draw "))
            .filter_map(|rest| rest.split_whitespace().next())
            .collect()
    }
}

impl GraphicsDevice for DebugTextDevice {
    type Stage = DebugStage;
    type Program = DebugProgram;
    type Drawable = DebugDrawable;

    fn compile_stage(&mut self, stage: ShaderStage, source: &str) -> Result<DebugStage, String> {
        if !source.contains(stage.entry_attribute()) {
            return Err(format!("no {} entry point", stage.entry_attribute()));
        }
        Ok(DebugStage {
            stage,
            lines: source.lines().count(),
        })
    }

    fn link_program(
        &mut self,
        vertex: &DebugStage,
        fragment: &DebugStage,
    ) -> Result<DebugProgram, String> {
        if vertex.stage != ShaderStage::Vertex || fragment.stage != ShaderStage::Fragment {
            return Err("stages attached in the wrong slots".into());
        }
        self.programs += 1;
        let _ = writeln!(
            self.out,
            "program #{} linked ({} + {} lines)",
            self.programs, vertex.lines, fragment.lines
        );
        Ok(DebugProgram(self.programs))
    }

    fn create_drawable(
        &mut self,
        label: &str,
        mesh: &Mesh,
        texture: &TexturePixels,
        program: &DebugProgram,
    ) -> Result<DebugDrawable, RenderError> {
        let _ = writeln!(
            self.out,
            "upload {label}: {} vertices, {} triangles, texture {}x{}, program #{}",
            mesh.vertex_count(),
            mesh.triangle_count(),
            texture.width,
            texture.height,
            program.0
        );
        Ok(DebugDrawable {
            label: label.to_string(),
            program: *program,
            triangles: mesh.triangle_count(),
        })
    }

    fn begin_frame(&mut self) -> Result<(), RenderError> {
        if self.in_frame {
            return Err(RenderError::Device("frame already in progress".into()));
        }
        self.in_frame = true;
        self.frames += 1;
        let _ = writeln!(self.out, "frame {}", self.frames);
        Ok(())
    }

    fn draw(&mut self, drawable: &DebugDrawable, transform: &Mat4) -> Result<(), RenderError> {
        if !self.in_frame {
            return Err(RenderError::Device("draw outside a frame".into()));
        }
        let origin = *transform * Vec4::W;
        let _ = writeln!(
            self.out,
            "  draw {} ({} triangles) origin=({:.3}, {:.3}, {:.3}, {:.3})",
            drawable.label, drawable.triangles, origin.x, origin.y, origin.z, origin.w
        );
        Ok(())
    }

    fn end_frame(&mut self) -> Result<(), RenderError> {
        if !self.in_frame {
            return Err(RenderError::Device("present without a frame".into()));
        }
        self.in_frame = false;
        self.out.push_str("  present\n");
        Ok(())
    }
}
