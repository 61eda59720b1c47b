//! Command-line argument parsing.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

/// Grove command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "grove", about = "Procedural terrain and scene generator")]
pub struct CliArgs {
    /// Random seed.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Gradient grid size along each axis.
    #[arg(long)]
    pub noise_resolution: Option<usize>,

    /// Heightmap samples along each axis.
    #[arg(long)]
    pub vertex_resolution: Option<usize>,

    /// World-space height scale.
    #[arg(long)]
    pub vertical_scale: Option<f64>,

    /// World-space edge length of the terrain.
    #[arg(long)]
    pub world_size: Option<f64>,

    /// Box-blur passes.
    #[arg(long)]
    pub smooth_passes: Option<u32>,

    /// Box-blur window width.
    #[arg(long)]
    pub kernel_width: Option<usize>,

    /// Mean number of scattered objects.
    #[arg(long)]
    pub frequency: Option<f64>,

    /// Emit normal-visualization lines.
    #[arg(long)]
    pub show_normals: Option<bool>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        let terrain = &mut self.terrain;
        if let Some(seed) = args.seed {
            terrain.seed = seed;
        }
        if let Some(res) = args.noise_resolution {
            terrain.noise_grid_resolution = res;
        }
        if let Some(res) = args.vertex_resolution {
            terrain.vertex_resolution = res;
        }
        if let Some(scale) = args.vertical_scale {
            terrain.vertical_scale = scale;
        }
        if let Some(size) = args.world_size {
            terrain.world_size = size;
        }
        if let Some(passes) = args.smooth_passes {
            terrain.smooth_passes = passes;
        }
        if let Some(width) = args.kernel_width {
            terrain.smooth_kernel_width = width;
        }
        if let Some(freq) = args.frequency {
            terrain.object_frequency = freq;
        }
        if let Some(show) = args.show_normals {
            self.debug.show_normals = show;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}
