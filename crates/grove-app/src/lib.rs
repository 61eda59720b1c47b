//! Headless Grove application: resolve directories, load configuration,
//! initialize logging, generate a scene, and summarize it.

pub mod platform;

use std::fmt;
use std::path::PathBuf;

use grove_config::{CliArgs, Config, ConfigError};
use grove_mesh::Topology;
use grove_terrain::{GeneratedScene, GenerationParams, ObjectTemplate, TerrainError, generate};

use crate::platform::{PlatformDirs, PlatformError};

/// Anything that stops the application before a scene is produced.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Platform directories could not be resolved or created.
    #[error(transparent)]
    Platform(#[from] PlatformError),

    /// `config.ron` could not be loaded or written.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Generation parameters were rejected.
    #[error("scene generation failed: {0}")]
    Terrain(#[from] TerrainError),
}

/// Map persisted configuration onto generation parameters.
pub fn generation_params(config: &Config) -> GenerationParams {
    let t = &config.terrain;
    GenerationParams {
        seed: t.seed,
        noise_grid_resolution: t.noise_grid_resolution,
        vertex_resolution: t.vertex_resolution,
        vertical_scale: t.vertical_scale,
        world_size: t.world_size,
        smooth_passes: t.smooth_passes,
        smooth_kernel_width: t.smooth_kernel_width,
        object_frequency: t.object_frequency,
        show_normals: config.debug.show_normals,
        show_origin_marker: config.debug.show_origin_marker,
    }
}

/// Config directory to use: `--config` if given, otherwise the platform default.
pub fn config_dir(args: &CliArgs, dirs: &PlatformDirs) -> PathBuf {
    args.config
        .clone()
        .unwrap_or_else(|| dirs.config_dir.clone())
}

/// Load `config.ron` from `config_dir` (creating it if absent) and apply CLI overrides.
///
/// # Errors
///
/// Returns [`AppError::Config`] if the file cannot be read, parsed, or created.
pub fn load_config(config_dir: &std::path::Path, args: &CliArgs) -> Result<Config, AppError> {
    let mut config = Config::load_or_create(config_dir)?;
    config.apply_cli_overrides(args);
    Ok(config)
}

/// Generate the scene described by `config` and summarize it.
///
/// # Errors
///
/// Returns [`AppError::Terrain`] for out-of-range parameters.
pub fn run(config: &Config) -> Result<SceneSummary, AppError> {
    let params = generation_params(config);
    tracing::debug!(?params, "generating scene");
    let scene = generate(&params)?;
    Ok(SceneSummary::of(&scene, &params))
}

/// Counts describing a generated scene.
#[derive(Clone, Debug, PartialEq)]
pub struct SceneSummary {
    /// Seed the scene was generated from.
    pub seed: u64,
    /// Heightmap rows and columns.
    pub grid: (usize, usize),
    /// Lowest and highest heightmap values.
    pub height_range: (f64, f64),
    /// Terrain vertices, skirts included.
    pub terrain_vertices: usize,
    /// Terrain triangles, skirts included.
    pub terrain_triangles: usize,
    /// Placed rocks.
    pub rocks: usize,
    /// Placed cone trees.
    pub cone_trees: usize,
    /// Placed sphere trees.
    pub sphere_trees: usize,
    /// Meshes handed to a renderer.
    pub drawables: usize,
    /// Triangles across every triangle drawable.
    pub total_triangles: usize,
    /// Distinct primitive shapes built.
    pub cached_shapes: usize,
}

impl SceneSummary {
    fn of(scene: &GeneratedScene, params: &GenerationParams) -> Self {
        let terrain = scene.terrain.mesh();
        let count = |kind: ObjectTemplate| {
            scene
                .objects
                .iter()
                .filter(|o| o.template == kind)
                .count()
        };
        let drawables = scene.drawables();
        let total_triangles = drawables
            .iter()
            .filter(|d| d.mesh.topology == Topology::Triangles)
            .map(|d| d.mesh.primitive_count())
            .sum();
        Self {
            seed: params.seed,
            grid: (scene.terrain.rows(), scene.terrain.cols()),
            height_range: scene.terrain.heightmap().min_max().unwrap_or_default(),
            terrain_vertices: terrain.vertices.len(),
            terrain_triangles: terrain.primitive_count(),
            rocks: count(ObjectTemplate::Rock),
            cone_trees: count(ObjectTemplate::ConeTree),
            sphere_trees: count(ObjectTemplate::SphereTree),
            drawables: drawables.len(),
            total_triangles,
            cached_shapes: scene.cached_shapes,
        }
    }

    /// Total placed objects.
    pub fn objects(&self) -> usize {
        self.rocks + self.cone_trees + self.sphere_trees
    }
}

impl fmt::Display for SceneSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Grove scene (seed {})", self.seed)?;
        writeln!(f, "  grid:      {} x {}", self.grid.0, self.grid.1)?;
        writeln!(
            f,
            "  heights:   {:.4} .. {:.4}",
            self.height_range.0, self.height_range.1
        )?;
        writeln!(
            f,
            "  terrain:   {} vertices, {} triangles",
            self.terrain_vertices, self.terrain_triangles
        )?;
        writeln!(
            f,
            "  objects:   {} ({} rocks, {} cone trees, {} sphere trees)",
            self.objects(),
            self.rocks,
            self.cone_trees,
            self.sphere_trees
        )?;
        write!(
            f,
            "  drawables: {} ({} triangles, {} cached shapes)",
            self.drawables, self.total_triangles, self.cached_shapes
        )
    }
}
