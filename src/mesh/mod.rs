pub mod buffers;
pub mod faces;
pub mod flat;
pub mod generator;
pub mod rings;
pub mod twigs;

pub use buffers::{Face, MeshBuffers, TreeMesh};
pub use flat::{face_normal, FlatMesh, FlatVertex};
pub use generator::TreeGenerator;
