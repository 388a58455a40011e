use super::buffers::MeshBuffers;
use crate::growth::BranchArena;
use crate::params::TreeProperties;

/// Append a double-sided twig quad at every leaf, depth-first child0 first.
///
/// Each quad lies in the plane of the parent fork, is `2 * twig_scale` wide
/// and `2 * twig_scale` long, with its base edge the leaf's own length back
/// from the tip. Returns the number of quads added.
pub fn build_twigs(arena: &BranchArena, props: &TreeProperties, twigs: &mut MeshBuffers) -> usize {
    let scale = props.twig_scale;
    let mut count = 0;

    for (id, leaf) in arena.iter_preorder().filter(|(_, b)| b.is_leaf()) {
        let Some(parent) = arena.parent_of(id) else {
            continue;
        };
        let Some((c0, c1)) = parent.children else {
            continue;
        };

        let tangent = (arena.get(c0).head - parent.head)
            .cross(&(arena.get(c1).head - parent.head))
            .normalize();
        let binormal = (leaf.head - parent.head).normalize();

        let side = tangent * scale;
        let far = binormal * (scale * 2.0 - leaf.length);
        let near = binormal * -leaf.length;

        let corners = [
            leaf.head + side + far,
            leaf.head + -side + far,
            leaf.head + -side + near,
            leaf.head + side + near,
        ];

        let front: Vec<u32> = corners.iter().map(|&c| twigs.add_vertex(c)).collect();
        let back: Vec<u32> = corners.iter().map(|&c| twigs.add_vertex(c)).collect();

        twigs.add_triangle(front[0], front[1], front[2]);
        twigs.add_triangle(front[3], front[0], front[2]);
        twigs.add_triangle(back[2], back[1], back[0]);
        twigs.add_triangle(back[2], back[0], back[3]);

        count += 1;
    }

    count
}
