use std::f32::consts::PI;

use super::branch::{Branch, BranchArena, BranchId};
use crate::math::Vec3;
use crate::params::{RandomState, TreeProperties};

/// Dichotomous branch-splitting growth
///
/// Every split draws one keyed random value whose key depends only on the
/// split's position in the tree and the seed, so the same properties always
/// grow the same skeleton regardless of traversal order.
pub struct TreeGrowth<'a> {
    pub props: &'a TreeProperties,
    rng: RandomState,
}

impl<'a> TreeGrowth<'a> {
    pub fn new(props: &'a TreeProperties) -> Self {
        Self {
            props,
            rng: props.random_state(),
        }
    }

    /// Grow the full skeleton from a single root branch
    pub fn grow(&mut self) -> BranchArena {
        self.rng = self.props.random_state();

        let mut root = Branch::new(Vec3::new(0.0, self.props.trunk_length, 0.0), None);
        root.length = self.props.initial_branch_length;

        let mut arena = BranchArena::new(root);
        let mut stack = vec![SplitTask {
            id: BranchArena::ROOT,
            level: self.props.levels,
            steps: self.props.tree_steps,
            l1: 1,
            l2: 1,
        }];
        while let Some(task) = stack.pop() {
            self.split(&mut arena, task, &mut stack);
        }
        arena
    }

    /// Split one branch into two children and queue their own splits.
    ///
    /// child1 is queued below child0 so the stack pops child0's subtree first.
    fn split(&mut self, arena: &mut BranchArena, task: SplitTask, stack: &mut Vec<SplitTask>) {
        let SplitTask {
            id,
            level,
            steps,
            l1,
            l2,
        } = task;
        let props = self.props;
        let r_level = props.levels - level;

        let head = arena.get(id).head;
        let length = arena.get(id).length;
        let dir = match arena.get(id).parent {
            Some(parent) => (head - arena.get(parent).head).normalize(),
            None => {
                arena.get_mut(id).trunk = true;
                Vec3::UP
            }
        };

        // Local frame. Not orthonormal; the exact construction shapes the output.
        let swizzled = Vec3::new(dir.z, dir.x, dir.y);
        let normal = dir.cross(&swizzled);
        let tangent = dir.cross(&normal);

        let r = self.rng.random(Some(split_key(r_level, l1, l2, props.seed)));

        let mut adj = normal * r + tangent * (1.0 - r);
        if r > 0.5 {
            adj = -adj;
        }

        let clump = (props.clump_max - props.clump_min) * r + props.clump_min;
        let mut newdir = (adj * (1.0 - clump) + dir * clump).normalize();
        let mut newdir2 = mirror_branch(newdir, dir, props.branch_factor);
        if r > 0.5 {
            std::mem::swap(&mut newdir, &mut newdir2);
        }

        if steps > 0 {
            let angle = steps as f32 / props.tree_steps as f32 * 2.0 * PI * props.twist_rate;
            newdir2 = Vec3::new(angle.sin(), r, angle.cos()).normalize();
        }

        let grow = if props.levels == 0 {
            0.0
        } else {
            (level as f32 * level as f32) / (props.levels as f32 * props.levels as f32)
                * props.grow_amount
        };
        let drop = r_level as f32 * props.drop_amount;
        let sweep = r_level as f32 * props.sweep_amount;
        let bias = Vec3::new(sweep, drop + grow, 0.0);
        newdir = (newdir + bias).normalize();
        newdir2 = (newdir2 + bias).normalize();

        let child_length = length.powf(props.length_falloff_power) * props.length_falloff_factor;

        let mut child0 = Branch::new(head + newdir * length, Some(id));
        child0.length = child_length;
        let mut child1 = Branch::new(head + newdir2 * length, Some(id));
        child1.length = child_length;

        let continue_trunk = level > 0 && steps > 0;
        if continue_trunk {
            let kink = (r - 0.5) * 2.0 * props.trunk_kink;
            child0.head = head + Vec3::new(kink, props.climb_rate, kink);
            child0.trunk = true;
            child0.length = length * props.taper_rate;
        }

        let c0 = arena.push(child0);
        let c1 = arena.push(child1);
        arena.get_mut(id).children = Some((c0, c1));

        if level > 0 {
            stack.push(SplitTask {
                id: c1,
                level: level - 1,
                steps: 0,
                l1,
                l2: l2 + 1,
            });
            let (level, steps) = if continue_trunk {
                (level, steps - 1)
            } else {
                (level - 1, 0)
            };
            stack.push(SplitTask {
                id: c0,
                level,
                steps,
                l1: l1 + 1,
                l2,
            });
        }
    }
}

/// Pending split of one branch
#[derive(Debug, Clone, Copy)]
struct SplitTask {
    id: BranchId,
    level: i32,
    steps: i32,
    l1: i32,
    l2: i32,
}

/// Random key for one split; depends only on tree position and seed
pub fn split_key(r_level: i32, l1: i32, l2: i32, seed: i32) -> f32 {
    let a = r_level as f32 * 10.0 + l1 as f32 * 5.0;
    let b = l2 as f32 + seed as f32;
    a + b
}

/// Reflect `v` across the plane spanned by `axis`, scaled by `branch_factor`
pub fn mirror_branch(v: Vec3, axis: Vec3, branch_factor: f32) -> Vec3 {
    let proj = axis.cross(&v.cross(&axis));
    let s = branch_factor * proj.dot(&v);
    v - proj * s
}
