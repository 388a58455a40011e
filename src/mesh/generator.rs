use log::{debug, trace, warn};

use super::buffers::TreeMesh;
use super::faces::stitch_faces;
use super::rings::create_forks;
use super::twigs::build_twigs;
use crate::growth::{BranchArena, TreeGrowth};
use crate::params::TreeProperties;

/// Runs growth, ring allocation and face stitching for one set of properties
///
/// The branch skeleton only lives for the duration of a call; each call
/// starts from a fresh random source and fresh buffers.
#[derive(Debug, Clone, Default)]
pub struct TreeGenerator {
    pub props: TreeProperties,
}

impl TreeGenerator {
    pub fn new(props: TreeProperties) -> Self {
        Self { props }
    }

    /// Generate the trunk and branch mesh
    pub fn generate(&self) -> TreeMesh {
        self.build(false)
    }

    /// Generate the branch mesh and the twig quads
    pub fn generate_with_twigs(&self) -> TreeMesh {
        self.build(true)
    }

    /// Grow the bare skeleton without emitting geometry
    pub fn grow_skeleton(&self) -> BranchArena {
        TreeGrowth::new(&self.props).grow()
    }

    fn build(&self, twigs: bool) -> TreeMesh {
        let props = &self.props;
        if props.segments == 0 {
            warn!("segments is 0; branch rings and faces will be empty");
        }

        let mut arena = self.grow_skeleton();
        let mut mesh = TreeMesh::new();

        create_forks(&mut arena, props, &mut mesh.branches);
        stitch_faces(&arena, props, &mut mesh.branches);

        if twigs {
            let quads = build_twigs(&arena, props, &mut mesh.twigs);
            trace!("added {} twig quads", quads);
        }

        debug!(
            "generated tree seed={} branches={} vertices={} faces={}",
            props.seed,
            arena.len(),
            mesh.branches.vertex_count(),
            mesh.branches.face_count()
        );

        mesh
    }
}
