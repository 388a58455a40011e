use crate::math::Vec3;

/// One triangle as three vertex indices
pub type Face = [u32; 3];

/// Append-only vertex and triangle buffers; a vertex index is its insertion order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshBuffers {
    pub vertices: Vec<Vec3>,
    pub faces: Vec<Face>,
}

impl MeshBuffers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a vertex and return its index
    pub fn add_vertex(&mut self, position: Vec3) -> u32 {
        let index = self.vertices.len() as u32;
        self.vertices.push(position);
        index
    }

    pub fn add_triangle(&mut self, a: u32, b: u32, c: u32) {
        self.faces.push([a, b, c]);
    }

    pub fn vertex(&self, index: u32) -> Vec3 {
        self.vertices[index as usize]
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Positions as a flat `x, y, z` array
    pub fn vertex_data(&self) -> Vec<f32> {
        self.vertices.iter().flat_map(|v| v.to_array()).collect()
    }

    /// Triangles as a flat index array
    pub fn index_data(&self) -> Vec<u32> {
        self.faces.iter().flat_map(|f| f.iter().copied()).collect()
    }

    /// True when every face refers to an existing vertex
    pub fn indices_in_range(&self) -> bool {
        let n = self.vertices.len() as u32;
        self.faces.iter().all(|f| f.iter().all(|&i| i < n))
    }

    pub fn is_finite(&self) -> bool {
        self.vertices.iter().all(Vec3::is_finite)
    }

    /// Bounding sphere as (centroid, max distance from centroid)
    pub fn bounds(&self) -> (Vec3, f32) {
        if self.vertices.is_empty() {
            return (Vec3::ZERO, 0.0);
        }

        let mut center = Vec3::ZERO;
        for v in &self.vertices {
            center += *v;
        }
        center = center.scale(1.0 / self.vertices.len() as f32);

        let radius = self
            .vertices
            .iter()
            .map(|v| v.distance(&center))
            .fold(0.0f32, f32::max);

        (center, radius)
    }
}

/// Output of one generation run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TreeMesh {
    /// Trunk and branch tube mesh
    pub branches: MeshBuffers,
    /// Optional twig quads; empty unless the twig pass ran
    pub twigs: MeshBuffers,
}

impl TreeMesh {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bounding sphere of the branch mesh, for camera framing
    pub fn bounds(&self) -> (Vec3, f32) {
        self.branches.bounds()
    }
}
