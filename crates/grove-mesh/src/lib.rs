//! Mesh data structures, shape primitives, and debug geometry shared by the
//! terrain and scene-population pipeline.

pub mod debug_lines;
pub mod mesh;
pub mod primitives;
pub mod shape_cache;

pub use debug_lines::{normal_lines, normal_matrix};
pub use mesh::{Material, Mesh, MeshError, Rgb8, Topology, Vertex};
pub use primitives::{cone, cube, cylinder, icosphere};
pub use shape_cache::{ShapeCache, ShapeKey};
