//! Heightmap to indexed triangle mesh: welded top surface with averaged
//! normals, closed by vertical skirt walls on all four boundary edges.
//!
//! Grid row `i` maps to `x = i / (rows - 1)` and column `j` to
//! `z = j / (cols - 1)`, so the surface covers the unit square in `(x, z)` with
//! `y` taken directly from the heightmap. Callers scale it into the world with
//! a transform.

use std::sync::Arc;

use glam::Vec3;
use grove_mesh::{Mesh, Rgb8, Topology, Vertex};

use crate::error::{TerrainError, check_resolution};
use crate::heightmap::Heightmap;

/// Depth of the skirt walls' lower edge, below any height the noise produces.
pub const SIDE_BOTTOM: f32 = -1.5;

/// Marks a grid point with no vertex emitted yet.
const UNASSIGNED: u32 = u32::MAX;

/// Number of skirt vertices for a `rows × cols` grid: a top and a bottom
/// record for every point of each of the four edges.
pub const fn skirt_vertex_count(rows: usize, cols: usize) -> usize {
    2 * (2 * rows + 2 * cols)
}

/// Number of skirt indices for a `rows × cols` grid: two triangles per edge segment.
pub const fn skirt_index_count(rows: usize, cols: usize) -> usize {
    6 * (2 * (rows - 1) + 2 * (cols - 1))
}

/// A terrain mesh together with the heightmap it was built from.
#[derive(Clone, Debug)]
pub struct TerrainMesh {
    mesh: Arc<Mesh>,
    heightmap: Arc<Heightmap>,
    /// Surface vertex index per grid point, row-major.
    vertex_index: Vec<u32>,
    surface_vertex_count: usize,
    surface_index_count: usize,
}

impl TerrainMesh {
    /// The combined surface and skirt mesh.
    pub fn mesh(&self) -> &Arc<Mesh> {
        &self.mesh
    }

    /// The source heightmap.
    pub fn heightmap(&self) -> &Arc<Heightmap> {
        &self.heightmap
    }

    /// Grid rows.
    pub fn rows(&self) -> usize {
        self.heightmap.rows()
    }

    /// Grid columns.
    pub fn cols(&self) -> usize {
        self.heightmap.cols()
    }

    /// Heightmap value at `(row, col)`.
    pub fn height_at(&self, row: usize, col: usize) -> f64 {
        self.heightmap.height_at(row, col)
    }

    /// Nearest grid cell to a point of the unit square, or `None` outside it.
    pub fn cell_at_unit(&self, x: f64, z: f64) -> Option<(usize, usize)> {
        if !(0.0..=1.0).contains(&x) || !(0.0..=1.0).contains(&z) {
            return None;
        }
        let row = (x * (self.rows() - 1) as f64).round() as usize;
        let col = (z * (self.cols() - 1) as f64).round() as usize;
        Some((row, col))
    }

    /// Index of the welded surface vertex for grid point `(row, col)`.
    pub fn surface_vertex(&self, row: usize, col: usize) -> Option<u32> {
        if row >= self.rows() || col >= self.cols() {
            return None;
        }
        let index = self.vertex_index[row * self.cols() + col];
        (index != UNASSIGNED).then_some(index)
    }

    /// Vertices `0..surface_vertex_count()` belong to the top surface; the rest are skirt.
    pub fn surface_vertex_count(&self) -> usize {
        self.surface_vertex_count
    }

    /// Indices `0..surface_index_count()` belong to the top surface; the rest are skirt.
    pub fn surface_index_count(&self) -> usize {
        self.surface_index_count
    }
}

/// Converts heightmaps into closed terrain meshes.
#[derive(Clone, Debug)]
pub struct TerrainMesher {
    /// Color of the top surface.
    pub surface_color: Rgb8,
    /// Color of the skirt walls.
    pub side_color: Rgb8,
    /// Height of the skirt walls' lower edge.
    pub side_bottom: f32,
}

impl Default for TerrainMesher {
    fn default() -> Self {
        Self {
            surface_color: Rgb8(0, 0, 191),
            side_color: Rgb8(102, 77, 51),
            side_bottom: SIDE_BOTTOM,
        }
    }
}

impl TerrainMesher {
    /// Mesher with the given surface color and default skirt settings.
    pub fn with_color(surface_color: Rgb8) -> Self {
        Self {
            surface_color,
            ..Self::default()
        }
    }

    /// Build the terrain mesh for `heightmap`.
    ///
    /// # Errors
    ///
    /// Returns [`TerrainError::ResolutionTooSmall`] if the heightmap has fewer
    /// than two rows or columns.
    pub fn build(&self, heightmap: Arc<Heightmap>) -> Result<TerrainMesh, TerrainError> {
        let rows = heightmap.rows();
        let cols = heightmap.cols();
        check_resolution("heightmap rows", rows, 2)?;
        check_resolution("heightmap cols", cols, 2)?;

        let grid = Grid {
            heightmap: &heightmap,
            h: (rows - 1) as f32,
            w: (cols - 1) as f32,
        };
        let quads = (rows - 1) * (cols - 1);
        let mut mesh = Mesh::with_capacity(
            Topology::Triangles,
            rows * cols + skirt_vertex_count(rows, cols),
            quads * 6 + skirt_index_count(rows, cols),
        );

        // Both face normals of a quad go to all four of its corners.
        let mut normal_sum = vec![Vec3::ZERO; rows * cols];
        let mut normal_count = vec![0u32; rows * cols];
        for i in 0..rows - 1 {
            for j in 0..cols - 1 {
                let (abc, acd) = grid.face_normals(i, j);
                for (r, c) in quad_corners(i, j) {
                    normal_sum[r * cols + c] += abc + acd;
                    normal_count[r * cols + c] += 2;
                }
            }
        }

        let surface = Vertex::new(Vec3::ZERO, Vec3::ZERO, self.surface_color.to_vec3());
        let mut vertex_index = vec![UNASSIGNED; rows * cols];
        for i in 0..rows - 1 {
            for j in 0..cols - 1 {
                let [a, b, c, d] = quad_corners(i, j).map(|(r, c)| {
                    let slot = r * cols + c;
                    if vertex_index[slot] == UNASSIGNED {
                        let normal = normal_sum[slot] / normal_count[slot] as f32;
                        vertex_index[slot] = mesh.push_vertex(Vertex {
                            position: grid.position(r, c).to_array(),
                            normal: normal.to_array(),
                            ..surface
                        });
                    }
                    vertex_index[slot]
                });
                mesh.push_triangle(a, b, c);
                mesh.push_triangle(a, c, d);
            }
        }
        let surface_vertex_count = mesh.vertices.len();
        let surface_index_count = mesh.indices.len();

        // Edge points are listed in increasing order along the edge; the flag
        // flips winding where that order runs clockwise seen from outside.
        self.push_skirt(&mut mesh, &grid, (0..cols).map(|j| (0, j)), Vec3::NEG_X, false);
        self.push_skirt(&mut mesh, &grid, (0..cols).map(|j| (rows - 1, j)), Vec3::X, true);
        self.push_skirt(&mut mesh, &grid, (0..rows).map(|i| (i, 0)), Vec3::NEG_Z, true);
        self.push_skirt(&mut mesh, &grid, (0..rows).map(|i| (i, cols - 1)), Vec3::Z, false);

        tracing::debug!(
            rows,
            cols,
            vertices = mesh.vertices.len(),
            triangles = mesh.primitive_count(),
            "terrain mesh built"
        );

        Ok(TerrainMesh {
            mesh: Arc::new(mesh),
            heightmap,
            vertex_index,
            surface_vertex_count,
            surface_index_count,
        })
    }

    /// One vertical wall strip along a boundary edge.
    ///
    /// Each edge point gets a top record (on the surface) and a bottom record
    /// (at `side_bottom`); consecutive quads share them.
    fn push_skirt(
        &self,
        mesh: &mut Mesh,
        grid: &Grid<'_>,
        points: impl Iterator<Item = (usize, usize)>,
        outward: Vec3,
        flip: bool,
    ) {
        let color = self.side_color.to_vec3();
        let base = mesh.vertices.len() as u32;
        let mut count = 0u32;
        for (r, c) in points {
            let top = grid.position(r, c);
            let bottom = Vec3::new(top.x, self.side_bottom, top.z);
            mesh.push_vertex(Vertex::new(top, outward, color));
            mesh.push_vertex(Vertex::new(bottom, outward, color));
            count += 1;
        }
        for k in 0..count.saturating_sub(1) {
            let t0 = base + 2 * k;
            let b0 = t0 + 1;
            let t1 = t0 + 2;
            let b1 = t0 + 3;
            if flip {
                mesh.push_triangle(t0, b1, b0);
                mesh.push_triangle(t0, t1, b1);
            } else {
                mesh.push_triangle(t0, b0, b1);
                mesh.push_triangle(t0, b1, t1);
            }
        }
    }
}

/// Grid points `a, b, c, d` of quad `(i, j)`.
#[inline]
fn quad_corners(i: usize, j: usize) -> [(usize, usize); 4] {
    [(i, j), (i, j + 1), (i + 1, j + 1), (i + 1, j)]
}

/// Unit-square positions of heightmap grid points.
struct Grid<'a> {
    heightmap: &'a Heightmap,
    h: f32,
    w: f32,
}

impl Grid<'_> {
    #[inline]
    fn position(&self, row: usize, col: usize) -> Vec3 {
        Vec3::new(
            row as f32 / self.h,
            self.heightmap.height_at(row, col) as f32,
            col as f32 / self.w,
        )
    }

    /// Unnormalized normals of triangles `(a, b, c)` and `(a, c, d)` of quad `(i, j)`.
    fn face_normals(&self, i: usize, j: usize) -> (Vec3, Vec3) {
        let [a, b, c, d] = quad_corners(i, j).map(|(r, c)| self.position(r, c));
        let u = b - a;
        let v = c - a;
        let w = d - a;
        (u.cross(v), v.cross(w))
    }
}
