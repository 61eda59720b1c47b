//! Debug line geometry for visualizing vertex normals.

use glam::{Mat3, Mat4, Vec3};

use crate::mesh::{Mesh, Rgb8, Topology, Vertex};

/// Matrix that maps object-space normals to world space under `transform`.
///
/// This is the inverse-transpose of the upper 3×3 block, which keeps normals
/// perpendicular to surfaces under non-uniform scale.
pub fn normal_matrix(transform: &Mat4) -> Mat3 {
    Mat3::from_mat4(*transform).inverse().transpose()
}

/// Build a line mesh with one segment per vertex of `mesh`.
///
/// Each segment starts at the world-space vertex position and extends `length`
/// units along the renormalized world-space normal. Line vertices carry a zero
/// normal and `color`, and are meant to be drawn unlit with an identity
/// transform.
pub fn normal_lines(mesh: &Mesh, transform: &Mat4, length: f32, color: Rgb8) -> Mesh {
    let normal_mat = normal_matrix(transform);
    let color = color.to_vec3();
    let mut lines = Mesh::with_capacity(
        Topology::Lines,
        mesh.vertices.len() * 2,
        mesh.vertices.len() * 2,
    );

    for vertex in &mesh.vertices {
        let start = transform.transform_point3(vertex.position());
        let dir = (normal_mat * vertex.normal()).normalize_or_zero();
        let end = start + dir * length;
        let a = lines.push_vertex(Vertex::new(start, Vec3::ZERO, color));
        let b = lines.push_vertex(Vertex::new(end, Vec3::ZERO, color));
        lines.push_line(a, b);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::cube;

    #[test]
    fn test_normal_matrix_identity() {
        let m = normal_matrix(&Mat4::IDENTITY);
        assert!(m.abs_diff_eq(Mat3::IDENTITY, 1e-6));
    }

    #[test]
    fn test_normal_matrix_keeps_normals_perpendicular_under_scale() {
        let transform = Mat4::from_scale(Vec3::new(4.0, 1.0, 1.0));
        // Surface tangent along the diagonal of the xy plane, normal perpendicular to it.
        let tangent = Vec3::new(1.0, 1.0, 0.0);
        let normal = Vec3::new(1.0, -1.0, 0.0);
        let world_tangent = transform.transform_vector3(tangent);
        let world_normal = normal_matrix(&transform) * normal;
        assert!(
            world_tangent.dot(world_normal).abs() < 1e-5,
            "Transformed normal must stay perpendicular: {world_tangent:?} · {world_normal:?}"
        );
    }

    #[test]
    fn test_normal_lines_one_segment_per_vertex() {
        let mesh = cube(Rgb8(0, 0, 191));
        let lines = normal_lines(&mesh, &Mat4::IDENTITY, 0.5, Rgb8(255, 255, 0));
        assert_eq!(lines.topology, Topology::Lines);
        assert_eq!(lines.vertices.len(), mesh.vertices.len() * 2);
        assert_eq!(lines.primitive_count(), mesh.vertices.len());
        lines.validate().unwrap();
    }

    #[test]
    fn test_normal_lines_have_requested_length_in_world_space() {
        let mesh = cube(Rgb8(0, 0, 191));
        let transform = Mat4::from_scale_rotation_translation(
            Vec3::new(3.0, 0.5, 2.0),
            glam::Quat::from_rotation_y(0.7),
            Vec3::new(1.0, 2.0, 3.0),
        );
        let lines = normal_lines(&mesh, &transform, 0.25, Rgb8(255, 255, 0));
        for pair in lines.indices.chunks_exact(2) {
            let a = lines.vertices[pair[0] as usize].position();
            let b = lines.vertices[pair[1] as usize].position();
            assert!(((b - a).length() - 0.25).abs() < 1e-4);
        }
    }
}
