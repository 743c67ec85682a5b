use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// A single mesh vertex.
///
/// Attributes a mesh file does not declare keep their defaults: zero normal,
/// white color, UV at the origin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vertex {
    pub position: Vec3,
    pub normal: Vec3,
    pub color: Vec3,
    pub uv: Vec2,
}

impl Vertex {
    /// A vertex at `position` with every optional attribute at its default.
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }
}

impl Default for Vertex {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            normal: Vec3::ZERO,
            color: Vec3::ONE,
            uv: Vec2::ZERO,
        }
    }
}

/// Three indices into the vertex list of the owning mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Triangle(pub [u32; 3]);

impl Triangle {
    pub fn new(a: u32, b: u32, c: u32) -> Self {
        Self([a, b, c])
    }

    pub fn indices(&self) -> [u32; 3] {
        self.0
    }
}

/// Indexed triangle mesh.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub triangles: Vec<Triangle>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty mesh with room for the declared element counts.
    pub fn with_capacity(vertices: usize, triangles: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertices),
            triangles: Vec::with_capacity(triangles),
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Flattened index list, three entries per triangle.
    pub fn indices(&self) -> Vec<u32> {
        self.triangles.iter().flat_map(|t| t.indices()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertex_default_attributes() {
        let v = Vertex::at(Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(v.position, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(v.normal, Vec3::ZERO);
        assert_eq!(v.color, Vec3::ONE);
        assert_eq!(v.uv, Vec2::ZERO);
    }

    #[test]
    fn mesh_flattens_indices_in_order() {
        let mesh = Mesh {
            vertices: vec![Vertex::default(); 4],
            triangles: vec![Triangle::new(0, 1, 2), Triangle::new(2, 3, 0)],
        };
        assert_eq!(mesh.indices(), vec![0, 1, 2, 2, 3, 0]);
        assert_eq!(mesh.triangle_count(), 2);
        assert!(!mesh.is_empty());
    }
}
