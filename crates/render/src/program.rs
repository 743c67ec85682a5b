use crate::error::RenderError;
use crate::renderer::{GraphicsDevice, ShaderStage};
use roomview_assets::ProgramSources;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Read a shader source file. Unreadable and blank files are both errors.
pub fn read_source(path: &Path) -> Result<String, RenderError> {
    let source = std::fs::read_to_string(path).map_err(|source| RenderError::SourceRead {
        path: path.to_path_buf(),
        source,
    })?;
    if source.trim().is_empty() {
        return Err(RenderError::EmptySource {
            path: path.to_path_buf(),
        });
    }
    Ok(source)
}

/// Builds shader programs from vertex/fragment source file pairs.
///
/// Each distinct pair is compiled and linked once; later requests for the
/// same pair return a clone of the cached handle.
pub struct ProgramCompiler<D: GraphicsDevice> {
    programs: HashMap<(PathBuf, PathBuf), D::Program>,
}

impl<D: GraphicsDevice> Default for ProgramCompiler<D> {
    fn default() -> Self {
        Self {
            programs: HashMap::new(),
        }
    }
}

impl<D: GraphicsDevice> ProgramCompiler<D> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct programs built so far.
    pub fn len(&self) -> usize {
        self.programs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.programs.is_empty()
    }

    /// Compile and link the program for `sources`, or reuse the cached one.
    pub fn compile(
        &mut self,
        device: &mut D,
        sources: &ProgramSources,
    ) -> Result<D::Program, RenderError> {
        let key = (sources.vertex.clone(), sources.fragment.clone());
        if let Some(program) = self.programs.get(&key) {
            return Ok(program.clone());
        }

        let program = build(device, &sources.vertex, &sources.fragment).inspect_err(|e| {
            tracing::error!("{e}");
        })?;
        tracing::info!(
            "shader program built from {} and {}",
            sources.vertex.display(),
            sources.fragment.display()
        );
        self.programs.insert(key, program.clone());
        Ok(program)
    }
}

/// Compile both stages and link them. The stage objects are dropped on return
/// on every path, so only the linked program outlives the call.
fn build<D: GraphicsDevice>(
    device: &mut D,
    vertex_path: &Path,
    fragment_path: &Path,
) -> Result<D::Program, RenderError> {
    let vertex_source = read_source(vertex_path)?;
    let fragment_source = read_source(fragment_path)?;

    let vertex = compile_stage(device, ShaderStage::Vertex, &vertex_source)?;
    let fragment = compile_stage(device, ShaderStage::Fragment, &fragment_source)?;

    device
        .link_program(&vertex, &fragment)
        .map_err(|log| RenderError::Link { log })
}

fn compile_stage<D: GraphicsDevice>(
    device: &mut D,
    stage: ShaderStage,
    source: &str,
) -> Result<D::Stage, RenderError> {
    device
        .compile_stage(stage, source)
        .map_err(|log| RenderError::StageCompile { stage, log })
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Mat4;
    use roomview_assets::TexturePixels;
    use roomview_common::Mesh;
    use std::cell::Cell;
    use std::rc::Rc;

    /// Device that counts live stage objects and can be told to reject links.
    #[derive(Default)]
    struct CountingDevice {
        live_stages: Rc<Cell<i32>>,
        compiled: usize,
        linked: usize,
        reject_link: bool,
    }

    struct Stage(Rc<Cell<i32>>);

    impl Drop for Stage {
        fn drop(&mut self) {
            self.0.set(self.0.get() - 1);
        }
    }

    impl GraphicsDevice for CountingDevice {
        type Stage = Stage;
        type Program = usize;
        type Drawable = ();

        fn compile_stage(&mut self, stage: ShaderStage, source: &str) -> Result<Stage, String> {
            if source.contains("syntax error") {
                return Err(format!("{stage}: syntax error at line 1"));
            }
            self.compiled += 1;
            self.live_stages.set(self.live_stages.get() + 1);
            Ok(Stage(self.live_stages.clone()))
        }

        fn link_program(&mut self, _: &Stage, _: &Stage) -> Result<usize, String> {
            if self.reject_link {
                return Err("varying `uv` not written by vertex stage".into());
            }
            self.linked += 1;
            Ok(self.linked)
        }

        fn create_drawable(
            &mut self,
            _: &str,
            _: &Mesh,
            _: &TexturePixels,
            _: &usize,
        ) -> Result<(), RenderError> {
            Ok(())
        }

        fn begin_frame(&mut self) -> Result<(), RenderError> {
            Ok(())
        }

        fn draw(&mut self, _: &(), _: &Mat4) -> Result<(), RenderError> {
            Ok(())
        }

        fn end_frame(&mut self) -> Result<(), RenderError> {
            Ok(())
        }
    }

    fn write_sources(dir: &Path, vertex: &str, fragment: &str) -> ProgramSources {
        let sources = ProgramSources {
            vertex: dir.join("scene.vert.wgsl"),
            fragment: dir.join("scene.frag.wgsl"),
        };
        std::fs::write(&sources.vertex, vertex).unwrap();
        std::fs::write(&sources.fragment, fragment).unwrap();
        sources
    }

    #[test]
    fn compiles_links_and_releases_stages() {
        let dir = tempfile::tempdir().unwrap();
        let sources = write_sources(dir.path(), "@vertex", "@fragment");
        let mut device = CountingDevice::default();
        let mut compiler = ProgramCompiler::new();

        let program = compiler.compile(&mut device, &sources).unwrap();
        assert_eq!(program, 1);
        assert_eq!(device.compiled, 2);
        assert_eq!(device.live_stages.get(), 0);
    }

    #[test]
    fn same_pair_is_built_once() {
        let dir = tempfile::tempdir().unwrap();
        let sources = write_sources(dir.path(), "@vertex", "@fragment");
        let mut device = CountingDevice::default();
        let mut compiler = ProgramCompiler::new();

        let first = compiler.compile(&mut device, &sources).unwrap();
        let second = compiler.compile(&mut device, &sources).unwrap();
        assert_eq!(first, second);
        assert_eq!(device.linked, 1);
        assert_eq!(compiler.len(), 1);
    }

    #[test]
    fn stage_failure_surfaces_diagnostic() {
        let dir = tempfile::tempdir().unwrap();
        let sources = write_sources(dir.path(), "@vertex", "syntax error");
        let mut device = CountingDevice::default();
        let mut compiler = ProgramCompiler::new();

        let err = compiler.compile(&mut device, &sources).unwrap_err();
        match err {
            RenderError::StageCompile { stage, log } => {
                assert_eq!(stage, ShaderStage::Fragment);
                assert!(log.contains("syntax error at line 1"));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(device.linked, 0);
        assert_eq!(device.live_stages.get(), 0);
        assert!(compiler.is_empty());
    }

    #[test]
    fn link_failure_surfaces_diagnostic() {
        let dir = tempfile::tempdir().unwrap();
        let sources = write_sources(dir.path(), "@vertex", "@fragment");
        let mut device = CountingDevice {
            reject_link: true,
            ..CountingDevice::default()
        };
        let mut compiler = ProgramCompiler::new();

        let err = compiler.compile(&mut device, &sources).unwrap_err();
        assert!(matches!(err, RenderError::Link { ref log } if log.contains("varying")));
        assert_eq!(device.live_stages.get(), 0);
    }

    #[test]
    fn empty_source_is_rejected_before_compiling() {
        let dir = tempfile::tempdir().unwrap();
        let sources = write_sources(dir.path(), "  \n", "@fragment");
        let mut device = CountingDevice::default();

        let err = ProgramCompiler::new()
            .compile(&mut device, &sources)
            .unwrap_err();
        assert!(matches!(err, RenderError::EmptySource { .. }));
        assert_eq!(device.compiled, 0);
    }

    #[test]
    fn missing_source_is_a_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let sources = ProgramSources {
            vertex: dir.path().join("nope.vert.wgsl"),
            fragment: dir.path().join("nope.frag.wgsl"),
        };
        let mut device = CountingDevice::default();

        let err = ProgramCompiler::new()
            .compile(&mut device, &sources)
            .unwrap_err();
        assert!(matches!(err, RenderError::SourceRead { .. }));
    }
}
