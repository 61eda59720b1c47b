//! One-shot scene generation: heightmap, terrain mesh, scattered objects, and
//! optional debug geometry, all derived from a single seed.

use std::sync::Arc;

use glam::{Mat4, Vec3};
use grove_mesh::{Material, Mesh, Rgb8, ShapeCache, ShapeKey, normal_lines};

use crate::error::{TerrainError, check_non_negative};
use crate::heightmap::{HeightmapBuilder, HeightmapParams};
use crate::mesher::{TerrainMesh, TerrainMesher};
use crate::random::scene_rng;
use crate::scatter::{ObjectScatterer, PlacedObject};

const TERRAIN_COLOR: Rgb8 = Rgb8(86, 125, 70);
const MARKER_COLOR: Rgb8 = Rgb8(0, 0, 191);
const NORMAL_LINE_COLOR: Rgb8 = Rgb8(255, 230, 0);
const NORMAL_LINE_LENGTH: f32 = 0.2;
const MARKER_HEIGHT: f32 = 7.0;

/// Every knob of a generation pass.
#[derive(Clone, Debug, PartialEq)]
pub struct GenerationParams {
    /// Seed of the scene's random source.
    pub seed: u64,
    /// Gradient grid size along both axes.
    pub noise_grid_resolution: usize,
    /// Heightmap size along both axes.
    pub vertex_resolution: usize,
    /// World-space vertical scale applied to heights.
    pub vertical_scale: f64,
    /// World-space edge length of the terrain square.
    pub world_size: f64,
    /// Box-blur passes.
    pub smooth_passes: u32,
    /// Box-blur window width in cells.
    pub smooth_kernel_width: usize,
    /// Mean number of scattered objects.
    pub object_frequency: f64,
    /// Emit normal-visualization line meshes.
    pub show_normals: bool,
    /// Emit a cube marking the scene origin.
    pub show_origin_marker: bool,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            seed: 42,
            noise_grid_resolution: 5,
            vertex_resolution: 100,
            vertical_scale: 3.0,
            world_size: 20.0,
            smooth_passes: 2,
            smooth_kernel_width: 3,
            object_frequency: 20.0,
            show_normals: false,
            show_origin_marker: true,
        }
    }
}

impl GenerationParams {
    /// Heightmap parameters for a square grid.
    pub fn heightmap_params(&self) -> HeightmapParams {
        HeightmapParams {
            grad_cols: self.noise_grid_resolution,
            grad_rows: self.noise_grid_resolution,
            nx: self.vertex_resolution,
            ny: self.vertex_resolution,
            smooth_passes: self.smooth_passes,
            smooth_kernel_width: self.smooth_kernel_width,
        }
    }

    /// Check every precondition of [`generate`].
    ///
    /// # Errors
    ///
    /// Returns the first violated precondition.
    pub fn validate(&self) -> Result<(), TerrainError> {
        self.heightmap_params().validate()?;
        check_non_negative("vertical_scale", self.vertical_scale)?;
        check_non_negative("world_size", self.world_size)?;
        check_non_negative("object_frequency", self.object_frequency)?;
        Ok(())
    }

    /// Terrain world transform: the unit-square mesh centered on the origin,
    /// stretched to `world_size` horizontally and `vertical_scale` vertically.
    pub fn terrain_transform(&self) -> Mat4 {
        let size = self.world_size as f32;
        Mat4::from_scale(Vec3::new(size, self.vertical_scale as f32, size))
            * Mat4::from_translation(Vec3::new(-0.5, 0.0, -0.5))
    }
}

/// A mesh ready for the renderer.
#[derive(Clone, Debug)]
pub struct Drawable {
    /// Geometry.
    pub mesh: Arc<Mesh>,
    /// World transform.
    pub transform: Mat4,
    /// Shading path.
    pub material: Material,
}

/// Output of one [`generate`] call.
#[derive(Debug)]
pub struct GeneratedScene {
    /// The terrain and its heightmap.
    pub terrain: TerrainMesh,
    /// World transform of the terrain mesh.
    pub terrain_transform: Mat4,
    /// Scattered objects, parts already in world space.
    pub objects: Vec<PlacedObject>,
    /// Optional debug geometry (origin marker, normal lines).
    pub debug: Vec<Drawable>,
    /// Distinct primitive shapes built for this scene.
    pub cached_shapes: usize,
}

impl GeneratedScene {
    /// Everything to draw: terrain first, then object parts, then debug geometry.
    pub fn drawables(&self) -> Vec<Drawable> {
        let terrain = Drawable {
            mesh: Arc::clone(self.terrain.mesh()),
            transform: self.terrain_transform,
            material: Material::Lit,
        };
        let parts = self.objects.iter().flat_map(|object| {
            object.parts.iter().map(|part| Drawable {
                mesh: Arc::clone(&part.mesh),
                transform: part.transform,
                material: part.material,
            })
        });
        std::iter::once(terrain)
            .chain(parts)
            .chain(self.debug.iter().cloned())
            .collect()
    }

    /// Heightmap value at `(row, col)`.
    pub fn height_at(&self, row: usize, col: usize) -> f64 {
        self.terrain.height_at(row, col)
    }

    /// Total object parts across all placed objects.
    pub fn part_count(&self) -> usize {
        self.objects.iter().map(|o| o.parts.len()).sum()
    }
}

/// Build a complete scene from scratch.
///
/// Runs to completion synchronously; every random draw comes from one
/// generator seeded with `params.seed`, so equal params give equal scenes.
///
/// # Errors
///
/// Returns a [`TerrainError`] if `params` violate a precondition.
pub fn generate(params: &GenerationParams) -> Result<GeneratedScene, TerrainError> {
    params.validate()?;
    let _span = tracing::info_span!("generate", seed = params.seed).entered();

    let mut rng = scene_rng(params.seed);
    let mut cache = ShapeCache::new();

    let heightmap = HeightmapBuilder::new(params.heightmap_params())?.build(&mut rng);
    let terrain = TerrainMesher::with_color(TERRAIN_COLOR).build(Arc::new(heightmap))?;
    let terrain_transform = params.terrain_transform();

    let scatterer = ObjectScatterer::new(
        params.vertical_scale,
        params.world_size,
        params.object_frequency,
    )?;
    let objects = scatterer.scatter(&terrain, &mut rng, &mut cache);

    let mut debug_drawables = Vec::new();
    if params.show_origin_marker {
        debug_drawables.push(Drawable {
            mesh: cache.get(ShapeKey::Cube {
                color: MARKER_COLOR,
            }),
            transform: Mat4::from_translation(Vec3::new(0.0, MARKER_HEIGHT, 0.0)),
            material: Material::Lit,
        });
    }
    if params.show_normals {
        let unlit = |mesh: Mesh| Drawable {
            mesh: Arc::new(mesh),
            transform: Mat4::IDENTITY,
            material: Material::Unlit,
        };
        debug_drawables.push(unlit(normal_lines(
            terrain.mesh(),
            &terrain_transform,
            NORMAL_LINE_LENGTH,
            NORMAL_LINE_COLOR,
        )));
        for part in objects.iter().flat_map(|o| &o.parts) {
            debug_drawables.push(unlit(normal_lines(
                &part.mesh,
                &part.transform,
                NORMAL_LINE_LENGTH,
                NORMAL_LINE_COLOR,
            )));
        }
    }

    tracing::info!(
        vertices = terrain.mesh().vertices.len(),
        objects = objects.len(),
        debug_meshes = debug_drawables.len(),
        cached_shapes = cache.len(),
        "scene generated"
    );

    Ok(GeneratedScene {
        terrain,
        terrain_transform,
        objects,
        debug: debug_drawables,
        cached_shapes: cache.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesher::skirt_index_count;
    use crate::scatter::VERTICAL_OFFSET;
    use grove_mesh::Topology;

    fn small(seed: u64) -> GenerationParams {
        GenerationParams {
            seed,
            noise_grid_resolution: 5,
            vertex_resolution: 10,
            smooth_passes: 0,
            smooth_kernel_width: 1,
            show_origin_marker: false,
            ..Default::default()
        }
    }

    #[test]
    fn test_end_to_end_index_count() {
        let scene = generate(&small(1)).unwrap();
        let mesh = scene.terrain.mesh();
        assert_eq!(
            mesh.indices.len(),
            (10 - 1) * (10 - 1) * 6 + skirt_index_count(10, 10)
        );
        assert!(
            mesh.indices
                .iter()
                .all(|&i| (i as usize) < mesh.vertices.len())
        );
    }

    #[test]
    fn test_same_seed_same_scene() {
        let a = generate(&small(77)).unwrap();
        let b = generate(&small(77)).unwrap();
        assert_eq!(a.terrain.mesh(), b.terrain.mesh());
        assert_eq!(a.objects.len(), b.objects.len());
        for (x, y) in a.objects.iter().zip(&b.objects) {
            assert_eq!(x.template, y.template);
            assert_eq!(x.placement, y.placement);
        }
    }

    #[test]
    fn test_different_seeds_different_terrain() {
        let a = generate(&small(1)).unwrap();
        let b = generate(&small(2)).unwrap();
        assert_ne!(a.terrain.heightmap(), b.terrain.heightmap());
    }

    #[test]
    fn test_zero_frequency_draws_only_terrain() {
        let params = GenerationParams {
            object_frequency: 0.0,
            ..small(3)
        };
        let scene = generate(&params).unwrap();
        assert!(scene.objects.is_empty());
        let drawables = scene.drawables();
        assert_eq!(drawables.len(), 1);
        assert!(Arc::ptr_eq(&drawables[0].mesh, scene.terrain.mesh()));
    }

    #[test]
    fn test_drawables_cover_every_part() {
        let params = GenerationParams {
            object_frequency: 15.0,
            ..small(4)
        };
        let scene = generate(&params).unwrap();
        assert_eq!(scene.drawables().len(), 1 + scene.part_count());
        for d in scene.drawables() {
            d.mesh.validate().unwrap();
        }
    }

    #[test]
    fn test_objects_stand_on_rendered_surface() {
        let params = GenerationParams {
            object_frequency: 25.0,
            ..small(5)
        };
        let scene = generate(&params).unwrap();
        let mesh = scene.terrain.mesh();
        for object in &scene.objects {
            let p = object.placement;
            let vertex = mesh.vertices[scene.terrain.surface_vertex(p.row, p.col).unwrap() as usize];
            let world = scene.terrain_transform.transform_point3(vertex.position());
            let expected = p.translation + Vec3::new(0.0, VERTICAL_OFFSET, 0.0);
            assert!(
                world.abs_diff_eq(expected, 1e-4),
                "object at {:?} floats off terrain point {world:?}",
                p.translation
            );
        }
    }

    #[test]
    fn test_debug_geometry() {
        let params = GenerationParams {
            object_frequency: 4.0,
            show_normals: true,
            show_origin_marker: true,
            ..small(6)
        };
        let scene = generate(&params).unwrap();
        assert_eq!(scene.debug.len(), 2 + scene.part_count());
        let marker = &scene.debug[0];
        assert_eq!(marker.mesh.vertices.len(), 24);
        let terrain_lines = &scene.debug[1];
        assert_eq!(terrain_lines.material, Material::Unlit);
        assert_eq!(terrain_lines.mesh.topology, Topology::Lines);
        assert_eq!(
            terrain_lines.mesh.vertices.len(),
            scene.terrain.mesh().vertices.len() * 2
        );
    }

    #[test]
    fn test_invalid_params_rejected() {
        let params = GenerationParams {
            vertex_resolution: 1,
            ..Default::default()
        };
        assert!(generate(&params).is_err());

        let params = GenerationParams {
            object_frequency: -2.0,
            ..Default::default()
        };
        assert!(matches!(
            generate(&params),
            Err(TerrainError::InvalidParameter { .. })
        ));

        let params = GenerationParams {
            smooth_kernel_width: 11,
            ..small(0)
        };
        assert!(matches!(
            params.validate(),
            Err(TerrainError::KernelTooWide { .. })
        ));
    }

    #[test]
    fn test_default_scene_carries_origin_marker() {
        let params = GenerationParams {
            vertex_resolution: 8,
            object_frequency: 0.0,
            ..Default::default()
        };
        assert!(params.show_origin_marker);
        let scene = generate(&params).unwrap();
        assert_eq!(scene.debug.len(), 1, "only the origin cube is expected");
        let marker = &scene.debug[0];
        assert_eq!(marker.material, Material::Lit);
        let origin = marker.transform.transform_point3(Vec3::ZERO);
        assert!(origin.abs_diff_eq(Vec3::new(0.0, MARKER_HEIGHT, 0.0), 1e-6));
        assert_eq!(scene.drawables().len(), 2);
    }

    #[test]
    fn test_normal_lines_counted_per_drawable() {
        let params = GenerationParams {
            object_frequency: 3.0,
            show_normals: true,
            ..small(9)
        };
        let scene = generate(&params).unwrap();
        let line_meshes = scene
            .debug
            .iter()
            .filter(|d| d.mesh.topology == Topology::Lines)
            .count();
        assert_eq!(line_meshes, 1 + scene.part_count());
        assert_eq!(scene.drawables().len(), 1 + 2 * scene.part_count() + 1);
    }

    #[test]
    fn test_terrain_transform_centers_unit_square() {
        let t = GenerationParams::default().terrain_transform();
        let low = t.transform_point3(Vec3::new(0.0, 1.0, 0.0));
        let high = t.transform_point3(Vec3::new(1.0, 0.0, 1.0));
        assert!(low.abs_diff_eq(Vec3::new(-10.0, 3.0, -10.0), 1e-6));
        assert!(high.abs_diff_eq(Vec3::new(10.0, 0.0, 10.0), 1e-6));
    }
}
