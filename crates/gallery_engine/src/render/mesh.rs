//! Mesh representation for 3D models
//!
//! Pure geometry containers. The interleaved [`Vertex`] layout is what the
//! OpenGL model uploads verbatim; [`VertexAttribute`] describes it so the
//! backend can set up attribute pointers without hardcoding offsets.

use bytemuck::{Pod, Zeroable};

/// 3D vertex data structure for rendering
///
/// `#[repr(C)]` keeps the field order and packing that the vertex attribute
/// table below describes.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    /// Position in 3D space
    pub position: [f32; 3],

    /// Normal vector
    pub normal: [f32; 3],

    /// Texture coordinates
    pub tex_coord: [f32; 2],
}

/// One float attribute inside an interleaved vertex
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexAttribute {
    /// Shader input location
    pub location: u32,
    /// Number of `f32` components
    pub components: i32,
    /// Byte offset from the start of the vertex
    pub offset: usize,
}

impl Vertex {
    /// Create a new vertex
    pub fn new(position: [f32; 3], normal: [f32; 3], tex_coord: [f32; 2]) -> Self {
        Self {
            position,
            normal,
            tex_coord,
        }
    }

    /// Size of one vertex in bytes
    pub const STRIDE: usize = std::mem::size_of::<Self>();

    /// Attribute layout: position at 0, normal at 1, texture coordinate at 2
    pub const ATTRIBUTES: [VertexAttribute; 3] = [
        VertexAttribute {
            location: 0,
            components: 3,
            offset: 0,
        },
        VertexAttribute {
            location: 1,
            components: 3,
            offset: 12,
        },
        VertexAttribute {
            location: 2,
            components: 2,
            offset: 24,
        },
    ];
}

/// 3D mesh containing vertices and indices for rendering
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    /// Vertex data
    pub vertices: Vec<Vertex>,

    /// Index data for triangles
    pub indices: Vec<u32>,
}

impl Mesh {
    /// Create a new mesh
    pub fn new(vertices: Vec<Vertex>, indices: Vec<u32>) -> Self {
        Self { vertices, indices }
    }

    /// Number of triangles described by the index buffer
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Whether every index points at an existing vertex
    pub fn indices_in_bounds(&self) -> bool {
        let count = self.vertices.len();
        self.indices.iter().all(|&index| (index as usize) < count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attribute_offsets_match_layout() {
        assert_eq!(Vertex::STRIDE, 32);
        assert_eq!(Vertex::ATTRIBUTES[1].offset, std::mem::offset_of!(Vertex, normal));
        assert_eq!(Vertex::ATTRIBUTES[2].offset, std::mem::offset_of!(Vertex, tex_coord));
    }

    #[test]
    fn test_vertices_cast_to_bytes() {
        let vertices = [Vertex::new([1.0, 2.0, 3.0], [0.0, 1.0, 0.0], [0.5, 0.25])];
        let bytes: &[u8] = bytemuck::cast_slice(&vertices);
        assert_eq!(bytes.len(), Vertex::STRIDE);
        assert_eq!(&bytes[0..4], &1.0f32.to_ne_bytes());
    }

    #[test]
    fn test_index_bounds_check() {
        let vertex = Vertex::new([0.0; 3], [0.0, 1.0, 0.0], [0.0; 2]);
        let mesh = Mesh::new(vec![vertex; 3], vec![0, 1, 2]);
        assert!(mesh.indices_in_bounds());
        assert_eq!(mesh.triangle_count(), 1);

        let broken = Mesh::new(vec![vertex; 2], vec![0, 1, 2]);
        assert!(!broken.indices_in_bounds());
    }
}
