use crate::math::Vec3;

/// Handle into a [`BranchArena`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BranchId(pub usize);

/// Vertex indices of one cross-section ring
pub type Ring = Vec<u32>;

/// Rings allocated at a fork
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ForkRings {
    /// The fork's own cross-section, seen from its parent side
    pub ring0: Ring,
    /// Cross-section facing child0
    pub ring1: Ring,
    /// Cross-section facing child1
    pub ring2: Ring,
}

/// One segment of the skeletal binary tree, spanning from its parent's head to its own head
#[derive(Debug, Clone)]
pub struct Branch {
    pub head: Vec3,
    /// Cross-section orientation; only set on forks
    pub tangent: Vec3,
    pub length: f32,
    pub radius: f32,
    /// Part of the initial trunk extension chain rather than a true split
    pub trunk: bool,
    pub parent: Option<BranchId>,
    /// Either no children or exactly two
    pub children: Option<(BranchId, BranchId)>,
    /// Base ring, root only
    pub root_ring: Ring,
    pub rings: Option<ForkRings>,
    /// Tip vertex, leaves only
    pub tip: Option<u32>,
}

impl Branch {
    pub fn new(head: Vec3, parent: Option<BranchId>) -> Self {
        Self {
            head,
            tangent: Vec3::ZERO,
            length: 1.0,
            radius: 0.0,
            trunk: false,
            parent,
            children: None,
            root_ring: Vec::new(),
            rings: None,
            tip: None,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }
}

/// Owns every branch of one tree; the root is always `BranchId(0)`.
///
/// Parent links are plain handles used for upward lookups only.
#[derive(Debug, Clone)]
pub struct BranchArena {
    nodes: Vec<Branch>,
}

impl BranchArena {
    pub const ROOT: BranchId = BranchId(0);

    pub fn new(root: Branch) -> Self {
        Self { nodes: vec![root] }
    }

    pub fn push(&mut self, branch: Branch) -> BranchId {
        self.nodes.push(branch);
        BranchId(self.nodes.len() - 1)
    }

    pub fn get(&self, id: BranchId) -> &Branch {
        &self.nodes[id.0]
    }

    pub fn get_mut(&mut self, id: BranchId) -> &mut Branch {
        &mut self.nodes[id.0]
    }

    pub fn root(&self) -> &Branch {
        self.get(Self::ROOT)
    }

    pub fn parent_of(&self, id: BranchId) -> Option<&Branch> {
        self.get(id).parent.map(|p| self.get(p))
    }

    /// Total number of branches
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Depth-first, child0 before child1
    pub fn iter_preorder(&self) -> PreorderIter<'_> {
        PreorderIter {
            arena: self,
            stack: vec![Self::ROOT],
        }
    }

    /// Number of edges on the longest root-to-leaf path
    pub fn max_depth(&self) -> usize {
        let mut deepest: usize = 0;
        let mut stack = vec![(Self::ROOT, 0)];
        while let Some((id, depth)) = stack.pop() {
            deepest = deepest.max(depth);
            if let Some((c0, c1)) = self.get(id).children {
                stack.push((c1, depth + 1));
                stack.push((c0, depth + 1));
            }
        }
        deepest
    }

    pub fn leaf_count(&self) -> usize {
        self.nodes.iter().filter(|b| b.is_leaf()).count()
    }
}

pub struct PreorderIter<'a> {
    arena: &'a BranchArena,
    stack: Vec<BranchId>,
}

impl<'a> Iterator for PreorderIter<'a> {
    type Item = (BranchId, &'a Branch);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        let branch = self.arena.get(id);
        if let Some((c0, c1)) = branch.children {
            self.stack.push(c1);
            self.stack.push(c0);
        }
        Some((id, branch))
    }
}
