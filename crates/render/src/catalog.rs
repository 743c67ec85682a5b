use crate::error::RenderError;
use crate::renderer::GraphicsDevice;
use glam::Mat4;
use roomview_assets::{SceneEntry, TextureProvider, load_ply};
use roomview_common::Mesh;

/// A loaded mesh bound to its texture and program, ready to draw.
pub struct Renderable<D: GraphicsDevice> {
    pub name: String,
    pub mesh: Mesh,
    /// Placement in the world. Identity for every manifest entry.
    pub model: Mat4,
    pub drawable: D::Drawable,
    pub program: D::Program,
}

/// Per-entry outcome of a catalog load.
#[derive(Debug, Default)]
pub struct LoadReport {
    /// Names of entries that loaded completely.
    pub loaded: Vec<String>,
    /// Names of entries kept with a partially read mesh.
    pub partial: Vec<String>,
    /// Entries that were skipped and why.
    pub failed: Vec<(SceneEntry, RenderError)>,
}

impl LoadReport {
    pub fn is_complete(&self) -> bool {
        self.partial.is_empty() && self.failed.is_empty()
    }
}

/// The ordered set of renderables for one run.
///
/// Entries keep manifest order, which is also draw order. A failure on one
/// entry is reported and skipped; the remaining entries still load.
pub struct SceneCatalog<D: GraphicsDevice> {
    renderables: Vec<Renderable<D>>,
}

impl<D: GraphicsDevice> Default for SceneCatalog<D> {
    fn default() -> Self {
        Self {
            renderables: Vec::new(),
        }
    }
}

impl<D: GraphicsDevice> SceneCatalog<D> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load one renderable per entry, all sharing `program`.
    pub fn load(
        device: &mut D,
        entries: &[SceneEntry],
        program: &D::Program,
        textures: &impl TextureProvider,
    ) -> (Self, LoadReport) {
        let mut catalog = Self::new();
        let mut report = LoadReport::default();

        for entry in entries {
            let name = entry.name();
            match load_entry(device, entry, &name, program, textures) {
                Ok((renderable, complete)) => {
                    if complete {
                        report.loaded.push(name);
                    } else {
                        tracing::warn!("{name}: drawing partially loaded mesh");
                        report.partial.push(name);
                    }
                    catalog.push(renderable);
                }
                Err(err) => {
                    tracing::error!("skipping {name}: {err}");
                    report.failed.push((entry.clone(), err));
                }
            }
        }

        tracing::info!(
            "scene catalog ready: {} of {} entries loaded",
            catalog.len(),
            entries.len()
        );
        (catalog, report)
    }

    /// Append a renderable after the existing ones.
    pub fn push(&mut self, renderable: Renderable<D>) {
        self.renderables.push(renderable);
    }

    /// Renderables in draw order.
    pub fn iter(&self) -> impl Iterator<Item = &Renderable<D>> {
        self.renderables.iter()
    }

    pub fn names(&self) -> Vec<&str> {
        self.renderables.iter().map(|r| r.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.renderables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.renderables.is_empty()
    }
}

/// Returns the renderable and whether its mesh was read completely.
fn load_entry<D: GraphicsDevice>(
    device: &mut D,
    entry: &SceneEntry,
    name: &str,
    program: &D::Program,
    textures: &impl TextureProvider,
) -> Result<(Renderable<D>, bool), RenderError> {
    let load = load_ply(&entry.geometry);
    if load.mesh.is_empty() {
        return Err(match load.error {
            Some(err) => RenderError::Asset(err.into()),
            None => RenderError::EmptyMesh {
                path: entry.geometry.clone(),
            },
        });
    }
    let complete = load.is_complete();

    // Pixels are released once the device holds its own copy.
    let pixels = textures.load(&entry.texture)?;
    let drawable = device.create_drawable(name, &load.mesh, &pixels, program)?;
    drop(pixels);

    Ok((
        Renderable {
            name: name.to_string(),
            mesh: load.mesh,
            model: Mat4::IDENTITY,
            drawable,
            program: program.clone(),
        },
        complete,
    ))
}
