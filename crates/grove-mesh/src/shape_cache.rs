//! Memoized primitive meshes keyed by their construction parameters.

use std::sync::Arc;

use hashbrown::HashMap;

use crate::mesh::{Mesh, Rgb8};
use crate::primitives;

/// Construction parameters of a cacheable primitive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ShapeKey {
    /// [`primitives::cube`].
    Cube {
        /// Vertex color.
        color: Rgb8,
    },
    /// [`primitives::icosphere`].
    Sphere {
        /// Icosahedron subdivision level.
        subdivisions: u32,
        /// Vertex color.
        color: Rgb8,
    },
    /// [`primitives::cylinder`].
    Cylinder {
        /// Number of radial segments.
        segments: u32,
        /// Vertex color.
        color: Rgb8,
    },
    /// [`primitives::cone`].
    Cone {
        /// Number of radial segments.
        segments: u32,
        /// Vertex color.
        color: Rgb8,
    },
}

impl ShapeKey {
    /// Build the mesh this key describes.
    pub fn build(self) -> Mesh {
        match self {
            ShapeKey::Cube { color } => primitives::cube(color),
            ShapeKey::Sphere {
                subdivisions,
                color,
            } => primitives::icosphere(subdivisions, color),
            ShapeKey::Cylinder { segments, color } => primitives::cylinder(segments, color),
            ShapeKey::Cone { segments, color } => primitives::cone(segments, color),
        }
    }
}

/// Shape store: each distinct [`ShapeKey`] is built once and shared afterwards.
///
/// Entries are immutable and never evicted; drop the cache to release them.
#[derive(Default)]
pub struct ShapeCache {
    shapes: HashMap<ShapeKey, Arc<Mesh>>,
    hits: u64,
}

impl ShapeCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the mesh for `key`, building and inserting it on first use.
    pub fn get(&mut self, key: ShapeKey) -> Arc<Mesh> {
        if let Some(mesh) = self.shapes.get(&key) {
            self.hits += 1;
            tracing::trace!(?key, "shape cache hit");
            return Arc::clone(mesh);
        }
        let mesh = Arc::new(key.build());
        self.shapes.insert(key, Arc::clone(&mesh));
        mesh
    }

    /// Number of distinct shapes built so far.
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    /// Returns `true` if nothing has been built yet.
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Number of lookups served without building.
    pub fn hits(&self) -> u64 {
        self.hits
    }
}
