pub mod algorithm;
pub mod branch;

pub use algorithm::TreeGrowth;
pub use branch::{Branch, BranchArena, BranchId, ForkRings, Ring};
