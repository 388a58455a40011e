//! Cross-section rings.
//!
//! Depth-first over the grown skeleton, child0 before child1. The root gets a
//! horizontal base ring, every fork gets one seam-split cross-section shared by
//! its three rings, and every leaf gets a single tip vertex. Indices are stored
//! on the branches for the face pass.

use std::f32::consts::PI;

use super::buffers::MeshBuffers;
use crate::growth::{BranchArena, BranchId, ForkRings, Ring};
use crate::math::Vec3;
use crate::params::TreeProperties;

/// Angle used to probe the seam plane orientation
const SEAM_PROBE_ANGLE: f32 = 1.57;

/// Allocate rings and tip vertices for the whole skeleton
pub fn create_forks(arena: &mut BranchArena, props: &TreeProperties, mesh: &mut MeshBuffers) {
    let builder = RingBuilder::new(props);
    let mut stack = vec![(BranchArena::ROOT, props.max_radius)];
    while let Some((id, radius)) = stack.pop() {
        builder.visit(arena, id, radius, mesh, &mut stack);
    }
}

struct RingBuilder<'a> {
    props: &'a TreeProperties,
    segments: usize,
    segment_angle: f32,
}

impl<'a> RingBuilder<'a> {
    fn new(props: &'a TreeProperties) -> Self {
        Self {
            props,
            segments: props.segments,
            segment_angle: PI * 2.0 / props.segments as f32,
        }
    }

    /// Emit one branch's geometry and queue its children, child0 on top
    fn visit(
        &self,
        arena: &mut BranchArena,
        id: BranchId,
        radius: f32,
        mesh: &mut MeshBuffers,
        stack: &mut Vec<(BranchId, f32)>,
    ) {
        let radius = radius.min(arena.get(id).length);
        arena.get_mut(id).radius = radius;

        if arena.get(id).parent.is_none() {
            let root_ring = self.root_ring(radius, mesh);
            arena.get_mut(id).root_ring = root_ring;
        }

        let Some((c0, c1)) = arena.get(id).children else {
            let head = arena.get(id).head;
            arena.get_mut(id).tip = Some(mesh.add_vertex(head));
            return;
        };

        let (tangent, rings) = self.fork_rings(arena, id, radius, mesh);
        let branch = arena.get_mut(id);
        branch.tangent = tangent;
        branch.rings = Some(rings);

        let radius1 = radius * self.props.radius_falloff_rate;
        let radius0 = if arena.get(c0).trunk {
            radius * self.props.taper_rate
        } else {
            radius1
        };

        stack.push((c1, radius1));
        stack.push((c0, radius0));
    }

    /// Horizontal circle under the first fork, starting at -X
    fn root_ring(&self, radius: f32, mesh: &mut MeshBuffers) -> Ring {
        let scaled = radius / self.props.radius_falloff_rate;
        (0..self.segments)
            .map(|i| {
                let v = Vec3::LEFT.rotate_about_axis(&Vec3::UP, -self.segment_angle * i as f32);
                mesh.add_vertex(v * scaled)
            })
            .collect()
    }

    /// Emit the fork cross-section and return its tangent and rings.
    ///
    /// The section is split at the tangent plane into a half shared by ring0
    /// and ring2, a half shared by ring0 and ring1, and an inner half shared by
    /// ring1 and ring2 (reversed for ring2). The two seam vertices sit on the
    /// tangent line and belong to all three.
    fn fork_rings(
        &self,
        arena: &BranchArena,
        id: BranchId,
        radius: f32,
        mesh: &mut MeshBuffers,
    ) -> (Vec3, ForkRings) {
        let branch = arena.get(id);
        let Some((c0, c1)) = branch.children else {
            return (Vec3::ZERO, ForkRings::default());
        };
        let child0 = arena.get(c0);
        let child1 = arena.get(c1);
        let head = branch.head;

        let axis = match arena.parent_of(id) {
            Some(parent) => (head - parent.head).normalize(),
            None => Vec3::UP,
        };
        let axis1 = (head - child0.head).normalize();
        let axis2 = (head - child1.head).normalize();
        let tangent = axis1.cross(&axis2).normalize();
        let axis3 = tangent.cross(&(-axis1 + -axis2).normalize()).normalize();

        let offset_dir = Vec3::new(axis2.x, 0.0, axis2.z);
        let center = head + offset_dir * (-self.props.max_radius / 2.0);

        let scale = if child0.trunk || branch.trunk {
            1.0 / self.props.taper_rate
        } else {
            self.props.radius_falloff_rate
        };
        let r = radius * scale;

        let segments = self.segments;
        let half = segments / 2;
        let mut ring0 = Ring::with_capacity(segments);
        let mut ring1 = Ring::with_capacity(segments);
        let mut ring2 = Ring::with_capacity(segments);

        let seam0 = mesh.add_vertex(center + tangent * r);
        ring0.push(seam0);
        ring2.push(seam0);

        // Flatten the outer half toward the parent axis so it meets the incoming tube
        let probe = tangent.rotate_about_axis(&axis2, SEAM_PROBE_ANGLE);
        let flatten_dir = tangent.cross(&axis).normalize();
        let flatten = 1.0 / probe.dot(&flatten_dir);

        for i in 1..half {
            let v = tangent
                .rotate_about_axis(&axis2, self.segment_angle * i as f32)
                .scale_in_direction(&flatten_dir, flatten);
            let index = mesh.add_vertex(center + v * r);
            ring0.push(index);
            ring2.push(index);
        }

        let seam1 = mesh.add_vertex(center + tangent * -r);
        ring0.push(seam1);
        ring1.push(seam1);

        for i in (half + 1)..segments {
            let v = tangent.rotate_about_axis(&axis1, self.segment_angle * i as f32);
            let index = mesh.add_vertex(center + v * r);
            ring0.push(index);
            ring1.push(index);
        }

        ring1.push(seam0);
        ring2.push(seam1);

        let inner_start = mesh.vertex_count() as u32 - 1;
        for i in 1..half {
            let v = tangent.rotate_about_axis(&axis3, self.segment_angle * i as f32);
            ring1.push(inner_start + i as u32);
            ring2.push(inner_start + (half - i) as u32);
            mesh.add_vertex(center + v * r);
        }

        close_ring(&mut ring0, segments);
        close_ring(&mut ring1, segments);
        close_ring(&mut ring2, segments);

        (tangent, ForkRings { ring0, ring1, ring2 })
    }
}

/// Force a ring to exactly `segments` entries.
///
/// Odd segment counts leave ring2 one short; the gap is filled with its first
/// seam vertex. Counts below 3 truncate.
fn close_ring(ring: &mut Ring, segments: usize) {
    if ring.len() > segments {
        ring.truncate(segments);
    } else if let Some(&first) = ring.first() {
        ring.resize(segments, first);
    }
}

/// Distinct vertices one fork adds to the buffer
pub fn fork_vertex_count(segments: usize) -> usize {
    let half = segments / 2;
    2 + half.saturating_sub(1) * 2 + segments.saturating_sub(half + 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::growth::TreeGrowth;

    fn grown(props: &TreeProperties) -> (BranchArena, MeshBuffers) {
        let mut arena = TreeGrowth::new(props).grow();
        let mut mesh = MeshBuffers::new();
        create_forks(&mut arena, props, &mut mesh);
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
    fn test_root_ring_is_horizontal_circle() {
        let p = props(6, 0, 0);
        let (arena, mesh) = grown(&p);
        let root = arena.root();
        assert_eq!(root.root_ring, vec![0, 1, 2, 3, 4, 5]);

        let expected = root.radius / p.radius_falloff_rate;
        for &i in &root.root_ring {
            let v = mesh.vertex(i);
            assert!(v.y.abs() < 1e-6);
            assert!(((v.x * v.x + v.z * v.z).sqrt() - expected).abs() < 1e-5);
        }
        // First vertex sits on -X
        assert!((mesh.vertex(0).x + expected).abs() < 1e-5);
    }

    #[test]
    fn test_three_segment_single_fork() {
        let p = props(3, 0, 0);
        let (arena, mesh) = grown(&p);
        let root = arena.root();

        assert_eq!(root.root_ring.len(), 3);
        let rings = root.rings.as_ref().unwrap();
        assert_eq!(rings.ring0.len(), 3);
        assert_eq!(rings.ring1.len(), 3);
        assert_eq!(rings.ring2.len(), 3);

        // 3 root ring + 3 fork + 2 tips
        assert_eq!(mesh.vertex_count(), 8);
        let (c0, c1) = root.children.unwrap();
        assert_eq!(arena.get(c0).tip, Some(6));
        assert_eq!(arena.get(c1).tip, Some(7));
    }

    #[test]
    fn test_ring_indices_belong_to_fork() {
        let p = props(6, 1, 0);
        let (arena, mesh) = grown(&p);
        let root = arena.root();
        let rings = root.rings.as_ref().unwrap();

        // Root fork vertices follow the 6 root ring vertices
        let fork_range = 6..(6 + fork_vertex_count(6) as u32);
        for ring in [&rings.ring0, &rings.ring1, &rings.ring2] {
            assert_eq!(ring.len(), 6);
            assert!(ring.iter().all(|i| fork_range.contains(i)));
        }
        // Seam vertices are shared by all three rings
        assert_eq!(rings.ring0[0], rings.ring2[0]);
        assert_eq!(rings.ring1[3], rings.ring0[0]);
        assert_eq!(rings.ring0[3], rings.ring1[0]);
        assert!(mesh.vertex_count() > 6);
    }

    #[test]
    fn test_fork_vertex_count() {
        assert_eq!(fork_vertex_count(3), 3);
        assert_eq!(fork_vertex_count(4), 5);
        assert_eq!(fork_vertex_count(6), 8);
        assert_eq!(fork_vertex_count(7), 9);
        assert_eq!(fork_vertex_count(0), 2);
    }

    #[test]
    fn test_vertex_total_matches_skeleton() {
        for segments in [3, 4, 5, 6, 8] {
            let p = props(segments, 2, 3);
            let (arena, mesh) = grown(&p);
            let forks = arena.len() - arena.leaf_count();
            let expected = segments + forks * fork_vertex_count(segments) + arena.leaf_count();
            assert_eq!(mesh.vertex_count(), expected, "segments={}", segments);
        }
    }

    #[test]
    fn test_radius_clamped_and_falls_off() {
        let p = TreeProperties {
            max_radius: 10.0,
            ..props(6, 1, 0)
        };
        let (arena, _) = grown(&p);
        let root = arena.root();
        assert_eq!(root.radius, root.length);

        let (_, c1) = root.children.unwrap();
        let child = arena.get(c1);
        let expected = (root.radius * p.radius_falloff_rate).min(child.length);
        assert_eq!(child.radius, expected);
    }

    #[test]
    fn test_trunk_child_uses_taper() {
        let p = props(6, 2, 2);
        let (arena, _) = grown(&p);
        let root = arena.root();
        let (c0, _) = root.children.unwrap();
        let child = arena.get(c0);
        assert!(child.trunk);
        let expected = (root.radius * p.taper_rate).min(child.length);
        assert_eq!(child.radius, expected);
    }

    #[test]
    fn test_odd_ring_padding_stays_in_fork() {
        let p = props(5, 0, 0);
        let (arena, _) = grown(&p);
        let rings = arena.root().rings.as_ref().unwrap();
        assert_eq!(rings.ring2.len(), 5);
        assert_eq!(rings.ring2[4], rings.ring2[0]);
    }

    #[test]
    fn test_long_trunk_chain() {
        let p = props(6, 1, 50_000);
        let (arena, mesh) = grown(&p);
        let forks = arena.len() - arena.leaf_count();
        assert_eq!(
            mesh.vertex_count(),
            6 + forks * fork_vertex_count(6) + arena.leaf_count()
        );
    }

    #[test]
    fn test_root_fork_at_ground_level() {
        let p = TreeProperties {
            trunk_length: 0.0,
            ..props(6, 1, 0)
        };
        let (arena, mesh) = grown(&p);
        let rings = arena.root().rings.as_ref().unwrap();
        for &i in &rings.ring0 {
            assert!(mesh.vertex(i).is_finite());
        }
    }

    #[test]
    fn test_zero_segments_does_not_panic() {
        let p = props(0, 1, 0);
        let (arena, _) = grown(&p);
        assert!(arena.root().root_ring.is_empty());
        assert!(arena.root().rings.as_ref().unwrap().ring0.is_empty());
    }
}
