//! Procedural terrain: gradient noise, smoothed heightmaps, skirted terrain
//! meshes, and random object scattering, all driven by one seeded generator.

pub mod error;
pub mod heightmap;
pub mod mesher;
pub mod noise_field;
pub mod random;
pub mod scatter;
pub mod scene;

pub use error::TerrainError;
pub use heightmap::{Heightmap, HeightmapBuilder, HeightmapParams};
pub use mesher::{SIDE_BOTTOM, TerrainMesh, TerrainMesher, skirt_index_count, skirt_vertex_count};
pub use noise_field::NoiseField;
pub use random::scene_rng;
pub use scatter::{ObjectScatterer, ObjectTemplate, Part, PlacedObject, Placement};
pub use scene::{Drawable, GeneratedScene, GenerationParams, generate};
