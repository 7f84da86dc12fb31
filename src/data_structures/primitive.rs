//! Procedural mesh generation for the diorama's primitive shapes.
//!
//! Everything here is CPU-side: [`MeshData`] holds plain vertex and index
//! vectors and only touches the GPU in [`MeshData::upload`]. The scene
//! builder and its tests work on this data directly.

use wgpu::util::DeviceExt;

use crate::data_structures::model::{Mesh, ModelVertex};

/// CPU-side mesh: vertices plus a `u32` triangle index list.
#[derive(Clone, Debug, Default)]
pub struct MeshData {
    pub vertices: Vec<ModelVertex>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Create GPU buffers for this mesh.
    ///
    /// `material` is the index into the owning model's material list.
    pub fn upload(&self, device: &wgpu::Device, name: &str, material: usize) -> Mesh {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{name} Vertex Buffer")),
            contents: bytemuck::cast_slice(&self.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{name} Index Buffer")),
            contents: bytemuck::cast_slice(&self.indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        Mesh {
            name: name.to_string(),
            vertex_buffer,
            index_buffer,
            num_elements: self.indices.len() as u32,
            material,
        }
    }

    fn push_quad(&mut self, corners: [[f32; 3]; 4], normal: [f32; 3]) {
        let base = self.vertices.len() as u32;
        let uvs = [[0.0, 1.0], [1.0, 1.0], [1.0, 0.0], [0.0, 0.0]];
        for (position, tex_coords) in corners.into_iter().zip(uvs) {
            self.vertices.push(ModelVertex {
                position,
                tex_coords,
                normal,
            });
        }
        self.indices
            .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    fn push_triangle(&mut self, corners: [[f32; 3]; 3], normal: [f32; 3], uvs: [[f32; 2]; 3]) {
        let base = self.vertices.len() as u32;
        for (position, tex_coords) in corners.into_iter().zip(uvs) {
            self.vertices.push(ModelVertex {
                position,
                tex_coords,
                normal,
            });
        }
        self.indices.extend_from_slice(&[base, base + 1, base + 2]);
    }
}

fn face_normal(a: [f32; 3], b: [f32; 3], c: [f32; 3]) -> [f32; 3] {
    use cgmath::InnerSpace;
    let a = cgmath::Vector3::from(a);
    let edge1 = cgmath::Vector3::from(b) - a;
    let edge2 = cgmath::Vector3::from(c) - a;
    edge1.cross(edge2).normalize().into()
}

/// An axis-aligned box centered at the origin, outward-facing, 24 vertices.
pub fn cuboid(width: f32, height: f32, depth: f32) -> MeshData {
    let (x, y, z) = (width / 2.0, height / 2.0, depth / 2.0);
    let mut mesh = MeshData::default();
    // +z
    mesh.push_quad(
        [[-x, -y, z], [x, -y, z], [x, y, z], [-x, y, z]],
        [0.0, 0.0, 1.0],
    );
    // -z
    mesh.push_quad(
        [[x, -y, -z], [-x, -y, -z], [-x, y, -z], [x, y, -z]],
        [0.0, 0.0, -1.0],
    );
    // +x
    mesh.push_quad(
        [[x, -y, z], [x, -y, -z], [x, y, -z], [x, y, z]],
        [1.0, 0.0, 0.0],
    );
    // -x
    mesh.push_quad(
        [[-x, -y, -z], [-x, -y, z], [-x, y, z], [-x, y, -z]],
        [-1.0, 0.0, 0.0],
    );
    // +y
    mesh.push_quad(
        [[-x, y, z], [x, y, z], [x, y, -z], [-x, y, -z]],
        [0.0, 1.0, 0.0],
    );
    // -y
    mesh.push_quad(
        [[-x, -y, -z], [x, -y, -z], [x, -y, z], [-x, -y, z]],
        [0.0, -1.0, 0.0],
    );
    mesh
}

/// A capped cylinder centered at the origin, axis along y.
pub fn cylinder(radius: f32, height: f32, segments: u32) -> MeshData {
    assert!(segments >= 3);
    let mut mesh = MeshData::default();
    let half = height / 2.0;

    // Side: one vertex ring at the top and bottom, duplicated at the seam
    // so the texture wraps cleanly.
    let base = mesh.vertices.len() as u32;
    for s in 0..=segments {
        let angle = 2.0 * std::f32::consts::PI * s as f32 / segments as f32;
        let (sin, cos) = angle.sin_cos();
        let normal = [sin, 0.0, cos];
        let u = s as f32 / segments as f32;
        mesh.vertices.push(ModelVertex {
            position: [radius * sin, half, radius * cos],
            tex_coords: [u, 0.0],
            normal,
        });
        mesh.vertices.push(ModelVertex {
            position: [radius * sin, -half, radius * cos],
            tex_coords: [u, 1.0],
            normal,
        });
    }
    for s in 0..segments {
        let top = base + s * 2;
        let bottom = top + 1;
        mesh.indices
            .extend_from_slice(&[top, bottom, bottom + 2, top, bottom + 2, top + 2]);
    }

    // Caps as triangle fans around a center vertex.
    for (y, normal) in [(half, [0.0, 1.0, 0.0]), (-half, [0.0, -1.0, 0.0])] {
        let center = mesh.vertices.len() as u32;
        mesh.vertices.push(ModelVertex {
            position: [0.0, y, 0.0],
            tex_coords: [0.5, 0.5],
            normal,
        });
        for s in 0..=segments {
            let angle = 2.0 * std::f32::consts::PI * s as f32 / segments as f32;
            let (sin, cos) = angle.sin_cos();
            mesh.vertices.push(ModelVertex {
                position: [radius * sin, y, radius * cos],
                tex_coords: [0.5 + 0.5 * sin, 0.5 + 0.5 * cos],
                normal,
            });
        }
        for s in 0..segments {
            let rim = center + 1 + s;
            if y > 0.0 {
                mesh.indices.extend_from_slice(&[center, rim, rim + 1]);
            } else {
                mesh.indices.extend_from_slice(&[center, rim + 1, rim]);
            }
        }
    }
    mesh
}

/// A regular icosahedron inscribed in a sphere of the given radius.
pub fn icosahedron(radius: f32) -> MeshData {
    use cgmath::InnerSpace;

    let t = (1.0 + 5.0_f32.sqrt()) / 2.0;
    let corners: [[f32; 3]; 12] = [
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
    ];
    let faces: [[usize; 3]; 20] = [
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

    let scaled: Vec<[f32; 3]> = corners
        .iter()
        .map(|v| (cgmath::Vector3::from(*v).normalize() * radius).into())
        .collect();

    let mut mesh = MeshData::default();
    for face in &faces {
        let (a, b, c) = (scaled[face[0]], scaled[face[1]], scaled[face[2]]);
        mesh.push_triangle(
            [a, b, c],
            face_normal(a, b, c),
            [[0.0, 1.0], [1.0, 1.0], [0.5, 0.0]],
        );
    }
    mesh
}

/// A regular tetrahedron inscribed in a sphere of the given radius.
pub fn tetrahedron(radius: f32) -> MeshData {
    use cgmath::InnerSpace;

    let corners: [[f32; 3]; 4] = [
        [1.0, 1.0, 1.0],
        [-1.0, -1.0, 1.0],
        [-1.0, 1.0, -1.0],
        [1.0, -1.0, -1.0],
    ];
    let faces: [[usize; 3]; 4] = [[2, 1, 0], [0, 3, 2], [1, 3, 0], [2, 3, 1]];

    let scaled: Vec<[f32; 3]> = corners
        .iter()
        .map(|v| (cgmath::Vector3::from(*v).normalize() * radius).into())
        .collect();

    let mut mesh = MeshData::default();
    for face in &faces {
        let (a, b, c) = (scaled[face[0]], scaled[face[1]], scaled[face[2]]);
        mesh.push_triangle(
            [a, b, c],
            face_normal(a, b, c),
            [[0.0, 1.0], [1.0, 1.0], [0.5, 0.0]],
        );
    }
    mesh
}

/// A flat plane in the xz plane, normal up.
pub fn plane(width: f32, depth: f32) -> MeshData {
    let (x, z) = (width / 2.0, depth / 2.0);
    let mut mesh = MeshData::default();
    mesh.push_quad(
        [[-x, 0.0, z], [x, 0.0, z], [x, 0.0, -z], [-x, 0.0, -z]],
        [0.0, 1.0, 0.0],
    );
    mesh
}

/// One face of an axis-aligned box, wound outward.
///
/// Face indices follow the skybox texture order: 0 = +x (front), 1 = -x
/// (back), 2 = +y (up), 3 = -y (down), 4 = +z (right), 5 = -z (left). The
/// faces are drawn with a front-culling pipeline so only their back sides
/// render, which is what makes the box visible from the inside.
pub fn box_face(face: usize, size: f32) -> MeshData {
    let h = size / 2.0;
    let mut mesh = MeshData::default();
    match face {
        0 => mesh.push_quad(
            [[h, -h, h], [h, -h, -h], [h, h, -h], [h, h, h]],
            [1.0, 0.0, 0.0],
        ),
        1 => mesh.push_quad(
            [[-h, -h, -h], [-h, -h, h], [-h, h, h], [-h, h, -h]],
            [-1.0, 0.0, 0.0],
        ),
        2 => mesh.push_quad(
            [[-h, h, h], [h, h, h], [h, h, -h], [-h, h, -h]],
            [0.0, 1.0, 0.0],
        ),
        3 => mesh.push_quad(
            [[-h, -h, -h], [h, -h, -h], [h, -h, h], [-h, -h, h]],
            [0.0, -1.0, 0.0],
        ),
        4 => mesh.push_quad(
            [[-h, -h, h], [h, -h, h], [h, h, h], [-h, h, h]],
            [0.0, 0.0, 1.0],
        ),
        5 => mesh.push_quad(
            [[h, -h, -h], [-h, -h, -h], [-h, h, -h], [h, h, -h]],
            [0.0, 0.0, -1.0],
        ),
        _ => panic!("a box has six faces, got index {face}"),
    }
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cuboid_has_twelve_triangles() {
        let mesh = cuboid(1.0, 1.0, 1.0);
        assert_eq!(mesh.vertices.len(), 24);
        assert_eq!(mesh.triangle_count(), 12);
    }

    #[test]
    fn cylinder_triangle_count_matches_segments() {
        let segments = 32;
        let mesh = cylinder(0.25, 1.0, segments);
        // Two triangles per side quad plus one fan triangle per cap segment.
        assert_eq!(mesh.triangle_count() as u32, segments * 2 + segments * 2);
    }

    #[test]
    fn icosahedron_has_twenty_faces() {
        let mesh = icosahedron(0.5);
        assert_eq!(mesh.vertices.len(), 60);
        assert_eq!(mesh.triangle_count(), 20);
    }

    #[test]
    fn icosahedron_vertices_lie_on_sphere() {
        let radius = 0.5;
        let mesh = icosahedron(radius);
        for vertex in &mesh.vertices {
            let [x, y, z] = vertex.position;
            let len = (x * x + y * y + z * z).sqrt();
            assert!((len - radius).abs() < 1e-5);
        }
    }

    #[test]
    fn tetrahedron_has_four_faces() {
        let mesh = tetrahedron(0.5);
        assert_eq!(mesh.triangle_count(), 4);
    }

    #[test]
    fn box_face_index_out_of_range_panics() {
        let result = std::panic::catch_unwind(|| box_face(6, 500.0));
        assert!(result.is_err());
    }

    #[test]
    fn box_faces_cover_all_axes() {
        use cgmath::InnerSpace;
        let mut sum = cgmath::Vector3::new(0.0_f32, 0.0, 0.0);
        for face in 0..6 {
            let mesh = box_face(face, 500.0);
            assert_eq!(mesh.triangle_count(), 2);
            sum += cgmath::Vector3::from(mesh.vertices[0].normal);
        }
        // Opposite face normals cancel out.
        assert!(sum.magnitude() < 1e-6);
    }
}
