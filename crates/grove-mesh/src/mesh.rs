//! Indexed mesh data structure holding vertices and indices ready for GPU upload.

use glam::Vec3;

/// A single interleaved vertex: position, normal, and flat color.
///
/// Layout (36 bytes total):
///   - `[0..12]`  position `[f32; 3]`
///   - `[12..24]` normal `[f32; 3]` (not necessarily unit length)
///   - `[24..36]` color `[f32; 3]` in linear `0.0..=1.0`
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    /// Position in mesh-local coordinates.
    pub position: [f32; 3],
    /// Shading normal. Consumers must renormalize before lighting.
    pub normal: [f32; 3],
    /// Vertex color.
    pub color: [f32; 3],
}

static_assertions::assert_eq_size!(Vertex, [u8; 36]);

impl Vertex {
    /// Construct a vertex from glam vectors.
    pub fn new(position: Vec3, normal: Vec3, color: Vec3) -> Self {
        Self {
            position: position.to_array(),
            normal: normal.to_array(),
            color: color.to_array(),
        }
    }

    /// Position as a [`Vec3`].
    #[inline]
    pub fn position(&self) -> Vec3 {
        Vec3::from_array(self.position)
    }

    /// Normal as a [`Vec3`].
    #[inline]
    pub fn normal(&self) -> Vec3 {
        Vec3::from_array(self.normal)
    }
}

/// An 8-bit RGB color.
///
/// Used for hashable color identity (shape cache keys) and converted to
/// linear floats when written into vertices.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rgb8(pub u8, pub u8, pub u8);

impl Rgb8 {
    /// Build a color from floating-point channels in `0.0..=255.0`, rounding
    /// and clamping each channel.
    pub fn from_f64_channels(r: f64, g: f64, b: f64) -> Self {
        let q = |c: f64| c.round().clamp(0.0, 255.0) as u8;
        Self(q(r), q(g), q(b))
    }

    /// Convert to `0.0..=1.0` floats.
    pub fn to_vec3(self) -> Vec3 {
        Vec3::new(self.0 as f32, self.1 as f32, self.2 as f32) / 255.0
    }
}

/// How the index buffer is interpreted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Topology {
    /// Three indices per triangle.
    #[default]
    Triangles,
    /// Two indices per line segment.
    Lines,
}

impl Topology {
    /// Number of indices per primitive.
    pub const fn indices_per_primitive(self) -> usize {
        match self {
            Topology::Triangles => 3,
            Topology::Lines => 2,
        }
    }
}

/// Material tag telling the renderer which shading path to use.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Material {
    /// Lit with vertex color and vertex normal.
    #[default]
    Lit,
    /// Flat vertex color, no lighting.
    Unlit,
}

/// Errors reported by [`Mesh::validate`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MeshError {
    /// An index refers past the end of the vertex buffer.
    #[error("index {index} at position {position} is out of range for {vertex_count} vertices")]
    IndexOutOfRange {
        /// Offending index value.
        index: u32,
        /// Position of the index in the index buffer.
        position: usize,
        /// Length of the vertex buffer.
        vertex_count: usize,
    },
    /// The index buffer does not hold a whole number of primitives.
    #[error("{len} indices do not form whole {topology:?} primitives")]
    IncompletePrimitive {
        /// Index buffer length.
        len: usize,
        /// Mesh topology.
        topology: Topology,
    },
}

/// An indexed mesh.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Mesh {
    /// Vertex buffer.
    pub vertices: Vec<Vertex>,
    /// Index buffer.
    pub indices: Vec<u32>,
    /// Primitive type of the index buffer.
    pub topology: Topology,
}

impl Mesh {
    /// Creates an empty triangle mesh.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty mesh with the given topology and capacity hints.
    pub fn with_capacity(topology: Topology, vertices: usize, indices: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertices),
            indices: Vec::with_capacity(indices),
            topology,
        }
    }

    /// Appends a vertex and returns its index.
    pub fn push_vertex(&mut self, vertex: Vertex) -> u32 {
        let index = self.vertices.len() as u32;
        self.vertices.push(vertex);
        index
    }

    /// Appends one triangle.
    pub fn push_triangle(&mut self, a: u32, b: u32, c: u32) {
        debug_assert_eq!(self.topology, Topology::Triangles);
        self.indices.extend_from_slice(&[a, b, c]);
    }

    /// Appends one line segment.
    pub fn push_line(&mut self, a: u32, b: u32) {
        debug_assert_eq!(self.topology, Topology::Lines);
        self.indices.extend_from_slice(&[a, b]);
    }

    /// Number of triangles (or line segments) in the mesh.
    pub fn primitive_count(&self) -> usize {
        self.indices.len() / self.topology.indices_per_primitive()
    }

    /// Checks that every index is in range and the index buffer holds whole
    /// primitives.
    ///
    /// # Errors
    ///
    /// Returns the first violation found.
    pub fn validate(&self) -> Result<(), MeshError> {
        if self.indices.len() % self.topology.indices_per_primitive() != 0 {
            return Err(MeshError::IncompletePrimitive {
                len: self.indices.len(),
                topology: self.topology,
            });
        }
        let vertex_count = self.vertices.len();
        if let Some((position, &index)) = self
            .indices
            .iter()
            .enumerate()
            .find(|&(_, &i)| i as usize >= vertex_count)
        {
            return Err(MeshError::IndexOutOfRange {
                index,
                position,
                vertex_count,
            });
        }
        Ok(())
    }

    /// Raw vertex bytes for buffer upload.
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Raw index bytes for buffer upload.
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> Mesh {
        let mut mesh = Mesh::new();
        let v = Vertex::new(Vec3::ZERO, Vec3::Y, Vec3::ONE);
        let a = mesh.push_vertex(v);
        let b = mesh.push_vertex(v);
        let c = mesh.push_vertex(v);
        mesh.push_triangle(a, b, c);
        mesh
    }

    #[test]
    fn test_valid_triangle_passes() {
        assert_eq!(triangle().validate(), Ok(()));
        assert_eq!(triangle().primitive_count(), 1);
    }

    #[test]
    fn test_out_of_range_index_rejected() {
        let mut mesh = triangle();
        mesh.indices.extend_from_slice(&[0, 1, 7]);
        assert_eq!(
            mesh.validate(),
            Err(MeshError::IndexOutOfRange {
                index: 7,
                position: 5,
                vertex_count: 3,
            })
        );
    }

    #[test]
    fn test_incomplete_triangle_rejected() {
        let mut mesh = triangle();
        mesh.indices.push(0);
        assert!(matches!(
            mesh.validate(),
            Err(MeshError::IncompletePrimitive { len: 4, .. })
        ));
    }

    #[test]
    fn test_line_topology_counts_pairs() {
        let mut mesh = Mesh::with_capacity(Topology::Lines, 2, 2);
        let v = Vertex::new(Vec3::ZERO, Vec3::ZERO, Vec3::ONE);
        let a = mesh.push_vertex(v);
        let b = mesh.push_vertex(v);
        mesh.push_line(a, b);
        assert_eq!(mesh.validate(), Ok(()));
        assert_eq!(mesh.primitive_count(), 1);
    }

    #[test]
    fn test_vertex_bytes_match_stride() {
        let mesh = triangle();
        assert_eq!(mesh.vertex_bytes().len(), 3 * 36);
        assert_eq!(mesh.index_bytes().len(), 3 * 4);
    }

    #[test]
    fn test_rgb8_quantization_clamps() {
        assert_eq!(Rgb8::from_f64_channels(-4.0, 109.6, 300.0), Rgb8(0, 110, 255));
        let v = Rgb8(255, 0, 51).to_vec3();
        assert!((v.x - 1.0).abs() < 1e-6 && v.y == 0.0 && (v.z - 0.2).abs() < 1e-6);
    }
}
