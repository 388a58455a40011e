use serde::{Deserialize, Serialize};

use super::random::RandomState;
use crate::error::TreeError;

/// Shape coefficients and seed for one tree
///
/// Falloff and rate values are applied multiplicatively per level or trunk
/// step. Nothing is validated: zero or negative values are accepted and only
/// make the tree look odd.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeProperties {
    /// Seed for the keyed random draws
    pub seed: i32,
    /// Vertices per cross-section ring
    pub segments: usize,
    /// Recursion depth of dichotomous branching
    pub levels: i32,
    /// Texture V scale per unit of branch length (unused by the position/face output)
    pub v_multiplier: f32,
    /// Half-width of twig quads
    pub twig_scale: f32,
    /// Length of the root branch segment
    pub initial_branch_length: f32,
    pub length_falloff_factor: f32,
    pub length_falloff_power: f32,
    /// Upper bound of how strongly a split keeps the parent direction
    pub clump_max: f32,
    /// Lower bound of how strongly a split keeps the parent direction
    pub clump_min: f32,
    /// Asymmetry of the mirrored sibling branch
    pub branch_factor: f32,
    /// Vertical bias growing with distance from the root level
    pub drop_amount: f32,
    /// Vertical bias growing with remaining levels
    pub grow_amount: f32,
    /// Sideways (+X) bias growing with distance from the root level
    pub sweep_amount: f32,
    /// Trunk radius at the base
    pub max_radius: f32,
    /// Vertical rise per trunk extension step
    pub climb_rate: f32,
    /// Horizontal jitter per trunk extension step
    pub trunk_kink: f32,
    /// Trunk extension steps before true branching starts
    pub tree_steps: i32,
    /// Radius and length reduction per trunk extension step
    pub taper_rate: f32,
    /// Radius reduction per branch level
    pub radius_falloff_rate: f32,
    /// Helical turns of the trunk over all extension steps
    pub twist_rate: f32,
    /// Height of the first fork above the ground
    pub trunk_length: f32,
}

impl Default for TreeProperties {
    fn default() -> Self {
        Self {
            seed: 262,
            segments: 6,
            levels: 5,
            v_multiplier: 0.36,
            twig_scale: 0.39,
            initial_branch_length: 0.49,
            length_falloff_factor: 0.85,
            length_falloff_power: 0.99,
            clump_max: 0.454,
            clump_min: 0.404,
            branch_factor: 2.45,
            drop_amount: -0.1,
            grow_amount: 0.235,
            sweep_amount: 0.01,
            max_radius: 0.139,
            climb_rate: 0.371,
            trunk_kink: 0.093,
            tree_steps: 5,
            taper_rate: 0.947,
            radius_falloff_rate: 0.73,
            twist_rate: 3.02,
            trunk_length: 2.4,
        }
    }
}

impl TreeProperties {
    /// Parse from YAML. Missing fields take their default preset value.
    pub fn from_yaml(yaml: &str) -> Result<Self, TreeError> {
        serde_yaml::from_str(yaml).map_err(TreeError::Parse)
    }

    pub fn to_yaml(&self) -> Result<String, TreeError> {
        serde_yaml::to_string(self).map_err(TreeError::Serialize)
    }

    /// Fresh random source seeded from `seed`
    pub fn random_state(&self) -> RandomState {
        RandomState::new(self.seed)
    }

    pub fn with_seed(mut self, seed: i32) -> Self {
        self.seed = seed;
        self
    }

    pub fn set_seed(&mut self, value: i32) {
        self.seed = value;
    }

    pub fn set_drop_amount(&mut self, value: f32) {
        self.drop_amount = value;
    }

    pub fn set_climb_rate(&mut self, value: f32) {
        self.climb_rate = value;
    }

    pub fn set_max_radius(&mut self, value: f32) {
        self.max_radius = value;
    }

    pub fn set_initial_branch_length(&mut self, value: f32) {
        self.initial_branch_length = value;
    }

    pub fn set_branch_factor(&mut self, value: f32) {
        self.branch_factor = value;
    }

    pub fn set_trunk_length(&mut self, value: f32) {
        self.trunk_length = value;
    }

    pub fn set_trunk_kink(&mut self, value: f32) {
        self.trunk_kink = value;
    }

    pub fn set_sweep_amount(&mut self, value: f32) {
        self.sweep_amount = value;
    }

    /// Levels come from slider values, so fractional input is floored.
    pub fn set_levels(&mut self, value: f32) {
        self.levels = value.floor() as i32;
    }

    pub fn set_length_falloff_power(&mut self, value: f32) {
        self.length_falloff_power = value;
    }

    pub fn set_length_falloff_factor(&mut self, value: f32) {
        self.length_falloff_factor = value;
    }

    pub fn set_twist_rate(&mut self, value: f32) {
        self.twist_rate = value;
    }

    pub fn set_clump_max(&mut self, value: f32) {
        self.clump_max = value;
    }

    pub fn set_clump_min(&mut self, value: f32) {
        self.clump_min = value;
    }
}
