//! Unit-sized shape primitives used as building blocks for scene objects.
//!
//! Every primitive is emitted with counter-clockwise winding when viewed from
//! outside, so `(b - a) × (c - a)` points away from the solid. Sizes are fixed
//! (unit radius / unit height); callers scale them through a transform.

use glam::Vec3;
use hashbrown::HashMap;

use crate::mesh::{Mesh, Rgb8, Topology, Vertex};

/// Axis-aligned cube with half-extent 1, 4 vertices per face and flat face normals.
pub fn cube(color: Rgb8) -> Mesh {
    // (normal, four corners in CCW order seen from outside)
    const FACES: [([f32; 3], [[f32; 3]; 4]); 6] = [
        ([0.0, 0.0, 1.0], [[-1.0, -1.0, 1.0], [1.0, -1.0, 1.0], [1.0, 1.0, 1.0], [-1.0, 1.0, 1.0]]),
        ([0.0, 0.0, -1.0], [[-1.0, -1.0, -1.0], [-1.0, 1.0, -1.0], [1.0, 1.0, -1.0], [1.0, -1.0, -1.0]]),
        ([0.0, 1.0, 0.0], [[-1.0, 1.0, -1.0], [-1.0, 1.0, 1.0], [1.0, 1.0, 1.0], [1.0, 1.0, -1.0]]),
        ([0.0, -1.0, 0.0], [[-1.0, -1.0, -1.0], [1.0, -1.0, -1.0], [1.0, -1.0, 1.0], [-1.0, -1.0, 1.0]]),
        ([1.0, 0.0, 0.0], [[1.0, -1.0, -1.0], [1.0, 1.0, -1.0], [1.0, 1.0, 1.0], [1.0, -1.0, 1.0]]),
        ([-1.0, 0.0, 0.0], [[-1.0, -1.0, -1.0], [-1.0, -1.0, 1.0], [-1.0, 1.0, 1.0], [-1.0, 1.0, -1.0]]),
    ];

    let color = color.to_vec3().to_array();
    let mut mesh = Mesh::with_capacity(Topology::Triangles, 24, 36);
    for (normal, corners) in FACES {
        let base = mesh.vertices.len() as u32;
        for position in corners {
            mesh.vertices.push(Vertex {
                position,
                normal,
                color,
            });
        }
        mesh.push_triangle(base, base + 1, base + 2);
        mesh.push_triangle(base, base + 2, base + 3);
    }
    mesh
}

/// Unit-radius sphere built by repeatedly subdividing an icosahedron.
///
/// Each subdivision level quadruples the triangle count (20 · 4ⁿ triangles).
/// Normals equal the unit positions, giving smooth shading.
pub fn icosphere(subdivisions: u32, color: Rgb8) -> Mesh {
    let t = (1.0 + 5.0_f32.sqrt()) / 2.0;
    let mut positions: Vec<Vec3> = [
        [-1.0, t, 0.0],
        [1.0, t, 0.0],
        [-1.0, -t, 0.0],
        [1.0, -t, 0.0],
        [0.0, -1.0, t],
        [0.0, 1.0, t],
        [0.0, -1.0, -t],
        [0.0, 1.0, -t],
        [t, 0.0, -1.0],
        [t, 0.0, 1.0],
        [-t, 0.0, -1.0],
        [-t, 0.0, 1.0],
    ]
    .into_iter()
    .map(|p| Vec3::from_array(p).normalize())
    .collect();

    let mut faces: Vec<[u32; 3]> = vec![
        [0, 11, 5],
        [0, 5, 1],
        [0, 1, 7],
        [0, 7, 10],
        [0, 10, 11],
        [1, 5, 9],
        [5, 11, 4],
        [11, 10, 2],
        [10, 7, 6],
        [7, 1, 8],
        [3, 9, 4],
        [3, 4, 2],
        [3, 2, 6],
        [3, 6, 8],
        [3, 8, 9],
        [4, 9, 5],
        [2, 4, 11],
        [6, 2, 10],
        [8, 6, 7],
        [9, 8, 1],
    ];

    for _ in 0..subdivisions {
        // Edge midpoints are shared between the two faces of an edge.
        let mut midpoints: HashMap<(u32, u32), u32> = HashMap::new();
        let mut midpoint = |a: u32, b: u32, positions: &mut Vec<Vec3>| -> u32 {
            let key = (a.min(b), a.max(b));
            *midpoints.entry(key).or_insert_with(|| {
                let mid = (positions[a as usize] + positions[b as usize]).normalize();
                positions.push(mid);
                (positions.len() - 1) as u32
            })
        };

        let mut next = Vec::with_capacity(faces.len() * 4);
        for [a, b, c] in faces {
            let ab = midpoint(a, b, &mut positions);
            let bc = midpoint(b, c, &mut positions);
            let ca = midpoint(c, a, &mut positions);
            next.push([a, ab, ca]);
            next.push([b, bc, ab]);
            next.push([c, ca, bc]);
            next.push([ab, bc, ca]);
        }
        faces = next;
    }

    let color = color.to_vec3();
    let mut mesh = Mesh::with_capacity(Topology::Triangles, positions.len(), faces.len() * 3);
    for p in positions {
        mesh.push_vertex(Vertex::new(p, p, color));
    }
    for [a, b, c] in faces {
        mesh.push_triangle(a, b, c);
    }
    mesh
}

/// Closed cylinder of radius 1 spanning `y = 0..=1`.
///
/// The side has radial normals; both caps have flat axial normals and their
/// own vertex records.
pub fn cylinder(segments: u32, color: Rgb8) -> Mesh {
    let segments = segments.max(3);
    let color = color.to_vec3();
    let ring = ring_directions(segments);
    let n = segments as usize;
    let mut mesh = Mesh::with_capacity(Topology::Triangles, 4 * n + 2, 12 * n);

    // Side: bottom ring then top ring.
    for &dir in &ring {
        mesh.push_vertex(Vertex::new(dir, dir, color));
    }
    for &dir in &ring {
        mesh.push_vertex(Vertex::new(dir + Vec3::Y, dir, color));
    }
    for k in 0..segments {
        let k1 = (k + 1) % segments;
        let (b0, b1) = (k, k1);
        let (t0, t1) = (segments + k, segments + k1);
        mesh.push_triangle(b0, t0, b1);
        mesh.push_triangle(b1, t0, t1);
    }

    // Caps.
    let bottom_center = mesh.push_vertex(Vertex::new(Vec3::ZERO, Vec3::NEG_Y, color));
    let bottom_start = mesh.vertices.len() as u32;
    for &dir in &ring {
        mesh.push_vertex(Vertex::new(dir, Vec3::NEG_Y, color));
    }
    let top_center = mesh.push_vertex(Vertex::new(Vec3::Y, Vec3::Y, color));
    let top_start = mesh.vertices.len() as u32;
    for &dir in &ring {
        mesh.push_vertex(Vertex::new(dir + Vec3::Y, Vec3::Y, color));
    }
    for k in 0..segments {
        let k1 = (k + 1) % segments;
        mesh.push_triangle(bottom_center, bottom_start + k, bottom_start + k1);
        mesh.push_triangle(top_center, top_start + k1, top_start + k);
    }
    mesh
}

/// Cone with a radius-1 base at `y = 0` and its apex at `y = 1`, closed by a base cap.
///
/// Each side segment gets its own apex vertex so the slanted normals stay
/// continuous around the circumference.
pub fn cone(segments: u32, color: Rgb8) -> Mesh {
    let segments = segments.max(3);
    let color = color.to_vec3();
    let ring = ring_directions(segments);
    let n = segments as usize;
    let mut mesh = Mesh::with_capacity(Topology::Triangles, 3 * n + 1, 6 * n);

    // For unit radius and unit height the slant normal is (dir + Y) / √2.
    let slant = |dir: Vec3| (dir + Vec3::Y).normalize();

    for &dir in &ring {
        mesh.push_vertex(Vertex::new(dir, slant(dir), color));
    }
    let apex_start = mesh.vertices.len() as u32;
    for k in 0..segments {
        let mid = ring[k as usize].lerp(ring[((k + 1) % segments) as usize], 0.5);
        let normal = if mid.length_squared() > 0.0 {
            slant(mid.normalize())
        } else {
            Vec3::Y
        };
        mesh.push_vertex(Vertex::new(Vec3::Y, normal, color));
    }
    for k in 0..segments {
        let k1 = (k + 1) % segments;
        mesh.push_triangle(k, apex_start + k, k1);
    }

    let center = mesh.push_vertex(Vertex::new(Vec3::ZERO, Vec3::NEG_Y, color));
    let base_start = mesh.vertices.len() as u32;
    for &dir in &ring {
        mesh.push_vertex(Vertex::new(dir, Vec3::NEG_Y, color));
    }
    for k in 0..segments {
        let k1 = (k + 1) % segments;
        mesh.push_triangle(center, base_start + k, base_start + k1);
    }
    mesh
}

/// Unit directions in the XZ plane, evenly spaced by angle.
fn ring_directions(segments: u32) -> Vec<Vec3> {
    (0..segments)
        .map(|k| {
            let theta = std::f32::consts::TAU * k as f32 / segments as f32;
            Vec3::new(theta.cos(), 0.0, theta.sin())
        })
        .collect()
}
