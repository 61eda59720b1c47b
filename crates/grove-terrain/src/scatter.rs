//! Object scattering: Poisson-distributed counts of procedurally assembled
//! rocks and trees, placed on random heightmap cells.

use std::sync::Arc;

use glam::{Mat4, Vec3};
use grove_mesh::{Material, Mesh, Rgb8, ShapeCache, ShapeKey};
use rand::Rng;

use crate::error::{TerrainError, check_non_negative};
use crate::mesher::TerrainMesh;
use crate::random::{angle, normal, poisson};

/// How far object bases are sunk below the sampled terrain height.
pub const VERTICAL_OFFSET: f32 = 0.1;

const TRUNK_RADIUS: f32 = 0.2;
const CONE_LAYER_OFFSET: f32 = 1.0;
const RADIAL_SEGMENTS: u32 = 10;
const FOLIAGE_SUBDIVISIONS: u32 = 2;
const ROCK_SUBDIVISIONS: u32 = 1;
/// Floor for sizes drawn from a normal distribution, whose tails reach below zero.
const MIN_SIZE: f64 = 0.1;

const TRUNK_COLOR: Rgb8 = Rgb8(102, 66, 38);
const ROCK_COLOR: Rgb8 = Rgb8(125, 122, 118);
const FOLIAGE_COLOR: Rgb8 = Rgb8(46, 139, 58);

/// One rigid piece of an object: a shared mesh and its transform.
#[derive(Clone, Debug)]
pub struct Part {
    /// Mesh, usually shared through a [`ShapeCache`].
    pub mesh: Arc<Mesh>,
    /// Object-local transform from the template, or world transform once placed.
    pub transform: Mat4,
    /// Shading path.
    pub material: Material,
}

impl Part {
    fn lit(mesh: Arc<Mesh>, transform: Mat4) -> Self {
        Self {
            mesh,
            transform,
            material: Material::Lit,
        }
    }
}

/// The procedural object recipes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ObjectTemplate {
    /// A flattened, randomly stretched boulder.
    Rock,
    /// Trunk topped by a stack of cones.
    ConeTree,
    /// Trunk topped by a sphere of foliage.
    SphereTree,
}

impl ObjectTemplate {
    /// Every template, in selection order.
    pub const ALL: [ObjectTemplate; 3] = [
        ObjectTemplate::Rock,
        ObjectTemplate::ConeTree,
        ObjectTemplate::SphereTree,
    ];

    /// Pick a template uniformly at random.
    pub fn choose<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }

    /// Generate this template's parts with object-local transforms.
    ///
    /// Parts are ordered bottom-up (trunk before foliage). The object's origin
    /// is its base on the ground.
    pub fn build_parts<R: Rng + ?Sized>(self, rng: &mut R, cache: &mut ShapeCache) -> Vec<Part> {
        match self {
            ObjectTemplate::Rock => rock(rng, cache),
            ObjectTemplate::ConeTree => cone_tree(rng, cache),
            ObjectTemplate::SphereTree => sphere_tree(rng, cache),
        }
    }
}

fn rock<R: Rng + ?Sized>(rng: &mut R, cache: &mut ShapeCache) -> Vec<Part> {
    let sx = rng.random_range(0.75..2.0_f32);
    let sy = 1.0 / rng.random_range(0.75..2.0_f32);
    let sz = rng.random_range(0.75..2.0_f32);
    let yaw = angle(rng) as f32;

    let mesh = cache.get(ShapeKey::Sphere {
        subdivisions: ROCK_SUBDIVISIONS,
        color: ROCK_COLOR,
    });
    let local = Mat4::from_rotation_y(yaw) * Mat4::from_scale(Vec3::new(sx, sy, sz));
    vec![Part::lit(mesh, local)]
}

fn sphere_tree<R: Rng + ?Sized>(rng: &mut R, cache: &mut ShapeCache) -> Vec<Part> {
    let trunk_height = normal(rng, 4.0, 1.0).max(MIN_SIZE) as f32;
    let radius = normal(rng, 1.5, 0.2).max(MIN_SIZE) as f32;

    let trunk = trunk_part(cache, trunk_height);
    let foliage = cache.get(ShapeKey::Sphere {
        subdivisions: FOLIAGE_SUBDIVISIONS,
        color: FOLIAGE_COLOR,
    });
    let center = Vec3::new(0.0, trunk_height + radius / 3.0, 0.0);
    let local = Mat4::from_translation(center) * Mat4::from_scale(Vec3::splat(radius));
    vec![trunk, Part::lit(foliage, local)]
}

fn cone_tree<R: Rng + ?Sized>(rng: &mut R, cache: &mut ShapeCache) -> Vec<Part> {
    let trunk_height = normal(rng, 5.0, 0.8).max(MIN_SIZE) as f32;
    let layers = rng.random_range(2..=3u32);

    let mut parts = Vec::with_capacity(1 + layers as usize);
    parts.push(trunk_part(cache, trunk_height));

    for layer in 0..layers {
        // Upper layers taper.
        let taper = 1.0 - 0.2 * layer as f32;
        let radius = normal(rng, 1.6, 0.15).max(MIN_SIZE) as f32 * taper;
        let height = normal(rng, 2.2, 0.2).max(MIN_SIZE) as f32;
        let green = normal(rng, 110.0, 10.0);
        let color = Rgb8::from_f64_channels(34.0, green, 40.0);

        let mesh = cache.get(ShapeKey::Cone {
            segments: RADIAL_SEGMENTS,
            color,
        });
        let base = Vec3::new(0.0, trunk_height * 0.5 + layer as f32 * CONE_LAYER_OFFSET, 0.0);
        let local = Mat4::from_translation(base) * Mat4::from_scale(Vec3::new(radius, height, radius));
        parts.push(Part::lit(mesh, local));
    }
    parts
}

fn trunk_part(cache: &mut ShapeCache, height: f32) -> Part {
    let mesh = cache.get(ShapeKey::Cylinder {
        segments: RADIAL_SEGMENTS,
        color: TRUNK_COLOR,
    });
    Part::lit(
        mesh,
        Mat4::from_scale(Vec3::new(TRUNK_RADIUS, height, TRUNK_RADIUS)),
    )
}

/// Where an object stands: its grid cell and world-space base position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Placement {
    /// Heightmap row.
    pub row: usize,
    /// Heightmap column.
    pub col: usize,
    /// World-space base position.
    pub translation: Vec3,
}

impl Placement {
    /// World transform of the object origin.
    pub fn transform(&self) -> Mat4 {
        Mat4::from_translation(self.translation)
    }
}

/// An object placed in the world.
#[derive(Clone, Debug)]
pub struct PlacedObject {
    /// Recipe the object was built from.
    pub template: ObjectTemplate,
    /// Where it stands.
    pub placement: Placement,
    /// Parts with world transforms (`placement · local`).
    pub parts: Vec<Part>,
}

/// Scatters objects over a terrain mesh.
#[derive(Clone, Debug)]
pub struct ObjectScatterer {
    y_scale: f32,
    world_size: f32,
    frequency: f64,
}

impl ObjectScatterer {
    /// Create a scatterer.
    ///
    /// `y_scale` and `world_size` must match the terrain's world transform so
    /// objects land on the rendered surface; `frequency` is the mean object count.
    ///
    /// # Errors
    ///
    /// Returns [`TerrainError::InvalidParameter`] for negative or non-finite values.
    pub fn new(y_scale: f64, world_size: f64, frequency: f64) -> Result<Self, TerrainError> {
        check_non_negative("vertical_scale", y_scale)?;
        check_non_negative("world_size", world_size)?;
        check_non_negative("object_frequency", frequency)?;
        Ok(Self {
            y_scale: y_scale as f32,
            world_size: world_size as f32,
            frequency,
        })
    }

    /// Pick a uniformly random grid cell and compute its world-space base position.
    pub fn place<R: Rng + ?Sized>(&self, terrain: &TerrainMesh, rng: &mut R) -> Placement {
        let row = rng.random_range(0..terrain.rows());
        let col = rng.random_range(0..terrain.cols());
        self.placement_at(terrain, row, col)
    }

    /// World-space base position for grid cell `(row, col)`.
    pub fn placement_at(&self, terrain: &TerrainMesh, row: usize, col: usize) -> Placement {
        let unit_x = row as f32 / (terrain.rows() - 1) as f32;
        let unit_z = col as f32 / (terrain.cols() - 1) as f32;
        let y = terrain.height_at(row, col) as f32 * self.y_scale - VERTICAL_OFFSET;
        Placement {
            row,
            col,
            translation: Vec3::new(
                (unit_x - 0.5) * self.world_size,
                y,
                (unit_z - 0.5) * self.world_size,
            ),
        }
    }

    /// Build `template` at `placement`, composing every part as `placement · local`.
    pub fn assemble<R: Rng + ?Sized>(
        &self,
        template: ObjectTemplate,
        placement: Placement,
        rng: &mut R,
        cache: &mut ShapeCache,
    ) -> PlacedObject {
        let world = placement.transform();
        let parts = template
            .build_parts(rng, cache)
            .into_iter()
            .map(|part| Part {
                transform: world * part.transform,
                ..part
            })
            .collect();
        PlacedObject {
            template,
            placement,
            parts,
        }
    }

    /// Draw a Poisson count of objects and place each one.
    pub fn scatter<R: Rng + ?Sized>(
        &self,
        terrain: &TerrainMesh,
        rng: &mut R,
        cache: &mut ShapeCache,
    ) -> Vec<PlacedObject> {
        let count = poisson(rng, self.frequency);
        let objects: Vec<PlacedObject> = (0..count)
            .map(|_| {
                let placement = self.place(terrain, rng);
                let template = ObjectTemplate::choose(rng);
                self.assemble(template, placement, rng, cache)
            })
            .collect();
        tracing::debug!(
            requested_mean = self.frequency,
            placed = objects.len(),
            cached_shapes = cache.len(),
            "objects scattered"
        );
        objects
    }
}
