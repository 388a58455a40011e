use super::buffers::MeshBuffers;
use crate::math::Vec3;

/// Unit normal of triangle `a, b, c` from the cross product of its edges.
/// Degenerate triangles give the zero vector.
pub fn face_normal(a: Vec3, b: Vec3, c: Vec3) -> Vec3 {
    (b - a).cross(&(c - a)).normalize()
}

/// A vertex carrying its face's normal
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlatVertex {
    pub position: Vec3,
    pub normal: Vec3,
}

impl FlatVertex {
    /// Layout: position(3) + normal(3) = 6 floats
    pub fn to_array(&self) -> [f32; 6] {
        [
            self.position.x, self.position.y, self.position.z,
            self.normal.x, self.normal.y, self.normal.z,
        ]
    }
}

/// Flat-shaded copy of a mesh: three unshared vertices per triangle
#[derive(Debug, Clone, Default)]
pub struct FlatMesh {
    pub vertices: Vec<FlatVertex>,
    pub indices: Vec<u32>,
}

impl FlatMesh {
    /// Duplicate every triangle's vertices in face order, each tagged with the face normal
    pub fn from_buffers(mesh: &MeshBuffers) -> Self {
        let mut vertices = Vec::with_capacity(mesh.faces.len() * 3);
        for face in &mesh.faces {
            let [a, b, c] = face.map(|i| mesh.vertex(i));
            let normal = face_normal(a, b, c);
            vertices.extend([a, b, c].map(|position| FlatVertex { position, normal }));
        }
        let indices = (0..vertices.len() as u32).collect();
        Self { vertices, indices }
    }

    /// Interleaved vertex data as a flat f32 array
    pub fn vertex_data(&self) -> Vec<f32> {
        self.vertices.iter().flat_map(|v| v.to_array()).collect()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}
