//! Triangle stitching between consecutive rings.
//!
//! Mirrors the ring pass traversal. The root ring is capped onto the first
//! fork, every fork is joined to each forked child through a rotational
//! offset chosen to keep the tube from twisting, and forks with leaf children
//! are closed with cones onto the tip vertices.

use std::f32::consts::PI;

use super::buffers::MeshBuffers;
use crate::growth::{Branch, BranchArena, Ring};
use crate::math::Vec3;
use crate::params::TreeProperties;

/// Emit all branch triangles. Rings must already be allocated.
pub fn stitch_faces(arena: &BranchArena, props: &TreeProperties, mesh: &mut MeshBuffers) {
    let stitcher = FaceStitcher {
        segments: props.segments,
    };
    for (_, branch) in arena.iter_preorder() {
        stitcher.visit(arena, branch, mesh);
    }
}

struct FaceStitcher {
    segments: usize,
}

impl FaceStitcher {
    /// Emit the triangles owned by one fork; leaves and ringless forks emit nothing
    fn visit(&self, arena: &BranchArena, branch: &Branch, mesh: &mut MeshBuffers) {
        let (Some((c0, c1)), Some(rings)) = (branch.children, branch.rings.as_ref()) else {
            return;
        };
        let child0 = arena.get(c0);
        let child1 = arena.get(c1);
        let segments = self.segments;

        if branch.parent.is_none() {
            let offset = root_seam_offset(branch.head, child0.head, child1.head, segments);
            for i in 0..segments {
                let v1 = rings.ring0[i];
                let v2 = branch.root_ring[wrap(i + 1, offset, segments)];
                let v3 = branch.root_ring[wrap(i, offset, segments)];
                let v4 = rings.ring0[(i + 1) % segments];
                mesh.add_triangle(v1, v4, v3);
                mesh.add_triangle(v4, v2, v3);
            }
        }

        match (child0.rings.as_ref(), child1.rings.as_ref()) {
            (Some(rings0), Some(rings1)) => {
                let offset0 =
                    self.child_offset(mesh, branch.head, &rings.ring1, child0.head, &rings0.ring0);
                let offset1 =
                    self.child_offset(mesh, branch.head, &rings.ring2, child1.head, &rings1.ring0);

                for i in 0..segments {
                    let next = (i + 1) % segments;

                    let v1 = rings0.ring0[i];
                    let v2 = rings.ring1[(i + offset0 + 1) % segments];
                    let v3 = rings.ring1[(i + offset0) % segments];
                    let v4 = rings0.ring0[next];
                    mesh.add_triangle(v1, v4, v3);
                    mesh.add_triangle(v4, v2, v3);

                    let v1 = rings1.ring0[i];
                    let v2 = rings.ring2[(i + offset1 + 1) % segments];
                    let v3 = rings.ring2[(i + offset1) % segments];
                    let v4 = rings1.ring0[next];
                    mesh.add_triangle(v1, v2, v3);
                    mesh.add_triangle(v1, v4, v2);
                }
            }
            _ => {
                let (Some(tip0), Some(tip1)) = (child0.tip, child1.tip) else {
                    return;
                };
                for i in 0..segments {
                    let next = (i + 1) % segments;
                    mesh.add_triangle(tip0, rings.ring1[next], rings.ring1[i]);
                    mesh.add_triangle(tip1, rings.ring2[next], rings.ring2[i]);
                }
            }
        }
    }

    /// Rotation that best lines up a parent-side ring with the child's own ring.
    ///
    /// The reference direction is the parent ring's first vertex, projected
    /// off the child axis; each candidate is scored by its dot product with
    /// the child's ring directions.
    fn child_offset(
        &self,
        mesh: &MeshBuffers,
        head: Vec3,
        parent_ring: &Ring,
        child_head: Vec3,
        child_ring: &Ring,
    ) -> usize {
        let Some(&first) = parent_ring.first() else {
            return 0;
        };
        let child_axis = (child_head - head).normalize();
        let reference = (mesh.vertex(first) - head)
            .normalize()
            .scale_in_direction(&child_axis, 0.0);

        best_ring_offset(self.segments, |i| {
            let d = (mesh.vertex(child_ring[i]) - child_head).normalize();
            d.dot(&reference)
        })
    }
}

/// Pick the offset of the highest scoring ring index.
///
/// Index `i` maps to offset `segments - i`. Ties keep the lowest index; a NaN
/// score never replaces the current best.
pub fn best_ring_offset(segments: usize, score: impl Fn(usize) -> f32) -> usize {
    let mut best: Option<(usize, f32)> = None;
    for i in 0..segments {
        let l = score(i);
        match best {
            Some((_, m)) if l <= m || l.is_nan() => {}
            _ => best = Some((segments - i, l)),
        }
    }
    best.map(|(offset, _)| offset).unwrap_or(0)
}

/// Whole-segment rotation of the root ring against the first fork.
///
/// Measures the angle from -X to the fork tangent around the trunk axis.
pub fn root_seam_offset(head: Vec3, child0: Vec3, child1: Vec3, segments: usize) -> i64 {
    let tangent = (child0 - head).cross(&(child1 - head)).normalize();
    let normal = head.normalize();
    let left = Vec3::LEFT;

    let mut angle = tangent.dot(&left).clamp(-1.0, 1.0).acos();
    if left.cross(&tangent).dot(&normal) > 0.0 {
        angle = 2.0 * PI - angle;
    }
    // NaN saturates to 0
    (0.5 + (angle / PI / 2.0 * segments as f32)).floor() as i64
}

fn wrap(i: usize, offset: i64, segments: usize) -> usize {
    (i as i64 + offset).rem_euclid(segments as i64) as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::growth::TreeGrowth;
    use crate::mesh::rings::create_forks;

    fn build(props: &TreeProperties) -> (BranchArena, MeshBuffers) {
        let mut arena = TreeGrowth::new(props).grow();
        let mut mesh = MeshBuffers::new();
        create_forks(&mut arena, props, &mut mesh);
        stitch_faces(&arena, props, &mut mesh);
        (arena, mesh)
    }

    fn props(segments: usize, levels: i32, tree_steps: i32) -> TreeProperties {
        TreeProperties {
            segments,
            levels,
            tree_steps,
            ..Default::default()
        }
    }

    #[test]
    fn test_best_offset_takes_maximum_not_first_positive() {
        let scores = [0.1, 0.9, 0.95, 0.3];
        assert_eq!(best_ring_offset(4, |i| scores[i]), 4 - 2);
    }

    #[test]
    fn test_best_offset_first_wins_ties() {
        let scores = [0.2, 0.7, 0.7, 0.7];
        assert_eq!(best_ring_offset(4, |i| scores[i]), 4 - 1);
    }

    #[test]
    fn test_best_offset_all_negative() {
        let scores = [-0.5, -0.9, -0.1];
        assert_eq!(best_ring_offset(3, |i| scores[i]), 3 - 2);
    }

    #[test]
    fn test_best_offset_ignores_nan() {
        let scores = [f32::NAN, 0.4, f32::NAN];
        assert_eq!(best_ring_offset(3, |i| scores[i]), 3 - 1);
        assert_eq!(best_ring_offset(0, |_| 1.0), 0);
    }

    #[test]
    fn test_root_seam_offset_quarter_turn() {
        // Tangent along Z: three quarters of a turn from -X around +Y
        let head = Vec3::new(0.0, 2.0, 0.0);
        let c0 = Vec3::new(1.0, 3.0, 0.0);
        let c1 = Vec3::new(-1.0, 3.0, 0.0);
        let tangent = (c0 - head).cross(&(c1 - head)).normalize();
        assert!((tangent.z - 1.0).abs() < 1e-6 || (tangent.z + 1.0).abs() < 1e-6);
        let offset = root_seam_offset(head, c0, c1, 8);
        assert!(offset == 2 || offset == 6, "offset={}", offset);
    }

    #[test]
    fn test_root_seam_offset_nan_is_zero() {
        let head = Vec3::new(0.0, 1.0, 0.0);
        let nan = Vec3::new(f32::NAN, 0.0, 0.0);
        assert_eq!(root_seam_offset(head, nan, nan, 6), 0);
    }

    #[test]
    fn test_wrap_negative_offset() {
        assert_eq!(wrap(0, -1, 6), 5);
        assert_eq!(wrap(5, 7, 6), 0);
    }

    #[test]
    fn test_single_fork_face_count() {
        let p = props(3, 0, 0);
        let (_, mesh) = build(&p);
        assert_eq!(mesh.face_count(), 2 * 3 + 2 * 3);
        assert!(mesh.indices_in_range());
    }

    #[test]
    fn test_face_count_per_fork_kind() {
        for segments in [3, 6, 8] {
            let p = props(segments, 3, 2);
            let (arena, mesh) = build(&p);

            let mut expected = 2 * segments;
            for (_, branch) in arena.iter_preorder() {
                if let Some((c0, _)) = branch.children {
                    expected += if arena.get(c0).is_leaf() {
                        2 * segments
                    } else {
                        4 * segments
                    };
                }
            }
            assert_eq!(mesh.face_count(), expected, "segments={}", segments);
            assert!(mesh.indices_in_range());
        }
    }

    #[test]
    fn test_leaf_caps_use_tips() {
        let p = props(4, 0, 0);
        let (arena, mesh) = build(&p);
        let (c0, c1) = arena.root().children.unwrap();
        let tip0 = arena.get(c0).tip.unwrap();
        let tip1 = arena.get(c1).tip.unwrap();

        let caps = &mesh.faces[2 * 4..];
        assert_eq!(caps.len(), 8);
        for (i, face) in caps.iter().enumerate() {
            let tip = if i % 2 == 0 { tip0 } else { tip1 };
            assert_eq!(face[0], tip);
        }
    }

    #[test]
    fn test_symmetric_tree_uses_best_alignment() {
        let p = TreeProperties {
            clump_min: 0.43,
            clump_max: 0.43,
            branch_factor: 0.0,
            ..props(6, 2, 0)
        };
        let (arena, mesh) = build(&p);
        let root = arena.root();
        let rings = root.rings.as_ref().unwrap();
        let (c0, _) = root.children.unwrap();
        let child = arena.get(c0);
        let child_ring = &child.rings.as_ref().unwrap().ring0;

        let axis = (child.head - root.head).normalize();
        let reference = (mesh.vertex(rings.ring1[0]) - root.head)
            .normalize()
            .scale_in_direction(&axis, 0.0);
        let scores: Vec<f32> = child_ring
            .iter()
            .map(|&v| (mesh.vertex(v) - child.head).normalize().dot(&reference))
            .collect();

        let mut best = 0;
        for (i, s) in scores.iter().enumerate() {
            if *s > scores[best] {
                best = i;
            }
        }
        let offset = 6 - best;

        let expected = [child_ring[0], child_ring[1], rings.ring1[offset % 6]];
        assert!(
            mesh.faces.contains(&expected),
            "no face joins child0 at offset {}",
            offset
        );
    }

    #[test]
    fn test_long_trunk_chain() {
        let p = props(6, 1, 50_000);
        let (arena, mesh) = build(&p);
        let inner_forks = arena.len() - arena.leaf_count() - arena.leaf_count() / 2;
        let leaf_forks = arena.leaf_count() / 2;
        assert_eq!(
            mesh.face_count(),
            2 * 6 + inner_forks * 4 * 6 + leaf_forks * 2 * 6
        );
        assert!(mesh.indices_in_range());
    }

    #[test]
    fn test_zero_segments_emit_no_faces() {
        let p = props(0, 2, 1);
        let (_, mesh) = build(&p);
        assert_eq!(mesh.face_count(), 0);
    }
}
