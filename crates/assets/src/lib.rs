//! Asset ingestion: mesh files, texture pixels, and the scene manifest.
//!
//! Loading is synchronous and happens once before the frame loop starts.
//! Every loaded asset is read-only afterwards.
//!
//! # Invariants
//! - A mesh load never panics: failures are reported and yield the data read so far.
//! - Texture pixels are handed to the caller, who drops them after upload.

pub mod manifest;
pub mod ply;
pub mod texture;

pub use manifest::{ProgramSources, SceneEntry, SceneManifest};
pub use ply::{PlyError, PlyHeader, PlyLoad, VertexLayout, load_ply, parse_ply};
pub use texture::{ImageTextureProvider, TexturePixels, TextureProvider};

use std::path::PathBuf;

/// Errors from asset operations.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not decode image {path}: {message}")]
    Image { path: PathBuf, message: String },
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("mesh error: {0}")]
    Ply(#[from] PlyError),
}

pub fn crate_info() -> &'static str {
    "roomview-assets v0.1.0"
}
