use crate::renderer::ShaderStage;
use roomview_assets::AssetError;
use std::path::PathBuf;

/// Errors from building or drawing the scene.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("could not read shader source {path}: {source}")]
    SourceRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("shader source {path} is empty")]
    EmptySource { path: PathBuf },
    #[error("{stage} stage failed to compile: {log}")]
    StageCompile { stage: ShaderStage, log: String },
    #[error("program failed to link: {log}")]
    Link { log: String },
    #[error("mesh {path} has no vertices")]
    EmptyMesh { path: PathBuf },
    #[error(transparent)]
    Asset(#[from] AssetError),
    #[error("graphics device error: {0}")]
    Device(String),
    #[error("surface error: {0}")]
    Surface(String),
}
