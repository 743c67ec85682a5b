//! ASCII PLY reader for triangle meshes.
//!
//! Only the subset the scene uses is read: an ASCII body, a `vertex` element
//! whose records hold position followed by optional normal, color, and UV
//! (in that order), and a `face` element of triangles. The header decides once
//! which optional attributes every vertex carries.

use glam::{Vec2, Vec3};
use roomview_common::{Mesh, Triangle, Vertex};
use std::path::{Path, PathBuf};
use std::str::SplitAsciiWhitespace;

/// Errors raised while reading a PLY file.
#[derive(Debug, thiserror::Error)]
pub enum PlyError {
    #[error("could not open mesh file {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("header is incomplete: end_header never seen")]
    IncompleteHeader,
    #[error("malformed header at line {line}: {reason}")]
    MalformedHeader { line: usize, reason: String },
    #[error("unsupported encoding `{0}`: only ascii bodies are read")]
    UnsupportedFormat(String),
    #[error("data ended while reading {element} {index}")]
    UnexpectedEof { element: &'static str, index: usize },
    #[error("invalid number `{token}` in {element} {index}")]
    InvalidNumber {
        token: String,
        element: &'static str,
        index: usize,
    },
    #[error("face {face} has {arity} vertices, only triangles are supported")]
    NonTriangleFace { face: usize, arity: i64 },
    #[error("face {face} references vertex {index} but the mesh has {vertex_count}")]
    IndexOutOfRange {
        face: usize,
        index: u32,
        vertex_count: usize,
    },
}

impl PlyError {
    /// True for errors raised before any body data is read.
    pub fn is_header_error(&self) -> bool {
        matches!(
            self,
            Self::Open { .. }
                | Self::IncompleteHeader
                | Self::MalformedHeader { .. }
                | Self::UnsupportedFormat(_)
        )
    }
}

/// Optional vertex attributes declared by the header.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VertexLayout {
    pub normals: bool,
    pub colors: bool,
    pub uvs: bool,
    /// Per-channel divisor for red, green, blue: the type maximum for
    /// integer channels, 1.0 for float channels.
    pub color_range: Vec3,
}

impl Default for VertexLayout {
    fn default() -> Self {
        Self {
            normals: false,
            colors: false,
            uvs: false,
            color_range: Vec3::ONE,
        }
    }
}

impl VertexLayout {
    fn declare(&mut self, ty: &str, name: &str) {
        match name {
            "nx" | "ny" | "nz" => self.normals = true,
            "red" => self.declare_color(0, ty),
            "green" => self.declare_color(1, ty),
            "blue" => self.declare_color(2, ty),
            "u" | "v" => self.uvs = true,
            _ => {}
        }
    }

    fn declare_color(&mut self, channel: usize, ty: &str) {
        self.colors = true;
        self.color_range[channel] = channel_range(ty);
    }
}

fn channel_range(ty: &str) -> f32 {
    match ty {
        "uchar" | "uint8" => u8::MAX as f32,
        "char" | "int8" => i8::MAX as f32,
        "ushort" | "uint16" => u16::MAX as f32,
        _ => 1.0,
    }
}

/// Declared element counts and vertex layout.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PlyHeader {
    pub vertex_count: usize,
    pub face_count: usize,
    pub layout: VertexLayout,
}

impl PlyHeader {
    /// Parse the header and return it with the byte offset where the body starts.
    pub fn parse(text: &str) -> Result<(Self, usize), PlyError> {
        let mut header = Self::default();
        let mut offset = 0;

        for (number, line) in text.split_inclusive('\n').enumerate() {
            offset += line.len();
            let line_no = number + 1;
            let mut tokens = line.split_whitespace();
            match tokens.next() {
                Some("element") => {
                    let name = tokens.next().unwrap_or_default();
                    let count = parse_count(tokens.next(), line_no)?;
                    match name {
                        "vertex" => header.vertex_count = count,
                        "face" => header.face_count = count,
                        _ => {}
                    }
                }
                Some("property") => {
                    let ty = tokens.next().unwrap_or_default();
                    let name = tokens.next().unwrap_or_default();
                    header.layout.declare(ty, name);
                }
                Some("format") => {
                    let encoding = tokens.next().unwrap_or_default();
                    if encoding != "ascii" {
                        return Err(PlyError::UnsupportedFormat(encoding.to_string()));
                    }
                }
                Some("end_header") => return Ok((header, offset)),
                _ => {}
            }
        }

        Err(PlyError::IncompleteHeader)
    }
}

fn parse_count(token: Option<&str>, line: usize) -> Result<usize, PlyError> {
    let token = token.ok_or_else(|| PlyError::MalformedHeader {
        line,
        reason: "element without a count".into(),
    })?;
    token.parse().map_err(|_| PlyError::MalformedHeader {
        line,
        reason: format!("element count `{token}` is not a non-negative integer"),
    })
}

/// Result of reading a mesh file.
///
/// `mesh` holds every complete record read before `error` stopped the parse.
/// A header error always leaves `mesh` empty.
#[derive(Debug, Default)]
pub struct PlyLoad {
    pub mesh: Mesh,
    pub error: Option<PlyError>,
}

impl PlyLoad {
    fn failed(error: PlyError) -> Self {
        Self {
            mesh: Mesh::new(),
            error: Some(error),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.error.is_none()
    }

    /// Strict view: any error discards the partial mesh.
    pub fn into_result(self) -> Result<Mesh, PlyError> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.mesh),
        }
    }
}

/// Whitespace-separated numeric tokens of the body, read across line breaks.
struct Body<'a> {
    tokens: SplitAsciiWhitespace<'a>,
}

impl<'a> Body<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            tokens: text.split_ascii_whitespace(),
        }
    }

    fn next<T: std::str::FromStr>(
        &mut self,
        element: &'static str,
        index: usize,
    ) -> Result<T, PlyError> {
        let token = self
            .tokens
            .next()
            .ok_or(PlyError::UnexpectedEof { element, index })?;
        token.parse().map_err(|_| PlyError::InvalidNumber {
            token: token.to_string(),
            element,
            index,
        })
    }

    fn vec3(&mut self, element: &'static str, index: usize) -> Result<Vec3, PlyError> {
        Ok(Vec3::new(
            self.next(element, index)?,
            self.next(element, index)?,
            self.next(element, index)?,
        ))
    }

    fn vec2(&mut self, element: &'static str, index: usize) -> Result<Vec2, PlyError> {
        Ok(Vec2::new(
            self.next(element, index)?,
            self.next(element, index)?,
        ))
    }

    fn vertex(&mut self, layout: &VertexLayout, index: usize) -> Result<Vertex, PlyError> {
        let mut vertex = Vertex::at(self.vec3("vertex", index)?);
        if layout.normals {
            vertex.normal = self.vec3("vertex", index)?;
        }
        if layout.colors {
            vertex.color = self.vec3("vertex", index)? / layout.color_range;
        }
        if layout.uvs {
            vertex.uv = self.vec2("vertex", index)?;
        }
        Ok(vertex)
    }

    fn triangle(&mut self, face: usize, vertex_count: usize) -> Result<Triangle, PlyError> {
        let arity: i64 = self.next("face", face)?;
        if arity != 3 {
            return Err(PlyError::NonTriangleFace { face, arity });
        }
        let mut indices = [0u32; 3];
        for slot in &mut indices {
            *slot = self.next("face", face)?;
        }
        if let Some(&index) = indices.iter().find(|&&i| i as usize >= vertex_count) {
            return Err(PlyError::IndexOutOfRange {
                face,
                index,
                vertex_count,
            });
        }
        Ok(Triangle(indices))
    }
}

/// Parse PLY text. Never panics; see [`PlyLoad`] for the partial-result rules.
pub fn parse_ply(text: &str) -> PlyLoad {
    let (header, body_start) = match PlyHeader::parse(text) {
        Ok(parsed) => parsed,
        Err(err) => return PlyLoad::failed(err),
    };

    // Declared counts are untrusted. The shortest vertex record ("0 0 0\n")
    // is 6 bytes and the shortest face ("3 0 0 0\n") is 8.
    let body_text = &text[body_start..];
    let mut load = PlyLoad {
        mesh: Mesh::with_capacity(
            header.vertex_count.min(body_text.len() / 6),
            header.face_count.min(body_text.len() / 8),
        ),
        error: None,
    };
    let mut body = Body::new(body_text);

    for index in 0..header.vertex_count {
        match body.vertex(&header.layout, index) {
            Ok(vertex) => load.mesh.vertices.push(vertex),
            Err(err) => {
                load.error = Some(err);
                return load;
            }
        }
    }

    let vertex_count = load.mesh.vertices.len();
    for face in 0..header.face_count {
        match body.triangle(face, vertex_count) {
            Ok(triangle) => load.mesh.triangles.push(triangle),
            Err(err) => {
                load.error = Some(err);
                return load;
            }
        }
    }

    load
}

/// Read a mesh file from disk, logging the outcome once.
pub fn load_ply(path: impl AsRef<Path>) -> PlyLoad {
    let path = path.as_ref();
    let load = match std::fs::read(path) {
        Ok(bytes) => parse_ply(&String::from_utf8_lossy(&bytes)),
        Err(source) => PlyLoad::failed(PlyError::Open {
            path: path.to_path_buf(),
            source,
        }),
    };

    match &load.error {
        None => tracing::info!(
            "loaded {} vertices and {} faces from {}",
            load.mesh.vertex_count(),
            load.mesh.triangle_count(),
            path.display()
        ),
        Some(err) => tracing::error!("{}: {err}", path.display()),
    }
    load
}
