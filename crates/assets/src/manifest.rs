//! Scene manifest: the ordered list of mesh/texture pairs and the shader pair.
//!
//! Entry order is draw order. Relative paths resolve against an asset root.

use crate::AssetError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The ten meshes of the room scene, in draw order.
const ROOM: [(&str, &str); 10] = [
    ("Bottles.ply", "bottles.bmp"),
    ("Floor.ply", "floor.bmp"),
    ("Patio.ply", "patio.bmp"),
    ("Table.ply", "table.bmp"),
    ("Walls.ply", "walls.bmp"),
    ("WindowBG.ply", "windowbg.bmp"),
    ("WoodObjects.ply", "woodobjects.bmp"),
    ("DoorBG.ply", "doorbg.bmp"),
    ("MetalObjects.ply", "metalobjects.bmp"),
    ("Curtains.ply", "curtains.bmp"),
];

/// One renderable: a mesh file and the texture drawn on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneEntry {
    pub geometry: PathBuf,
    pub texture: PathBuf,
}

impl SceneEntry {
    pub fn new(geometry: impl Into<PathBuf>, texture: impl Into<PathBuf>) -> Self {
        Self {
            geometry: geometry.into(),
            texture: texture.into(),
        }
    }

    /// Display name taken from the mesh file stem.
    pub fn name(&self) -> String {
        self.geometry
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.geometry.display().to_string())
    }
}

/// Vertex and fragment stage source files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgramSources {
    pub vertex: PathBuf,
    pub fragment: PathBuf,
}

impl Default for ProgramSources {
    fn default() -> Self {
        Self {
            vertex: PathBuf::from("shaders/scene.vert.wgsl"),
            fragment: PathBuf::from("shaders/scene.frag.wgsl"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneManifest {
    #[serde(default)]
    pub program: ProgramSources,
    pub entries: Vec<SceneEntry>,
}

impl Default for SceneManifest {
    fn default() -> Self {
        Self::room()
    }
}

impl SceneManifest {
    /// The fixed room scene.
    pub fn room() -> Self {
        Self {
            program: ProgramSources::default(),
            entries: ROOM
                .iter()
                .map(|(geometry, texture)| SceneEntry::new(*geometry, *texture))
                .collect(),
        }
    }

    /// Load a manifest from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, AssetError> {
        let file = std::fs::File::open(path)?;
        Ok(serde_json::from_reader(file)?)
    }

    /// Save the manifest to a JSON file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), AssetError> {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    /// Copy of the manifest with relative paths joined onto `root`.
    pub fn resolve(&self, root: &Path) -> Self {
        let join = |p: &PathBuf| {
            if p.is_absolute() {
                p.clone()
            } else {
                root.join(p)
            }
        };
        Self {
            program: ProgramSources {
                vertex: join(&self.program.vertex),
                fragment: join(&self.program.fragment),
            },
            entries: self
                .entries
                .iter()
                .map(|e| SceneEntry::new(join(&e.geometry), join(&e.texture)))
                .collect(),
        }
    }

    /// Every referenced file that does not exist, in manifest order.
    pub fn missing_files(&self) -> Vec<&Path> {
        [&self.program.vertex, &self.program.fragment]
            .into_iter()
            .chain(self.entries.iter().flat_map(|e| [&e.geometry, &e.texture]))
            .filter(|p| !p.exists())
            .map(PathBuf::as_path)
            .collect()
    }
}
