use wasm_bindgen::prelude::*;

pub mod error;
pub mod growth;
pub mod math;
pub mod mesh;
pub mod params;

pub use error::TreeError;
pub use mesh::{FlatMesh, TreeGenerator, TreeMesh};
pub use params::{RandomState, TreeProperties};

/// Initialize panic hook for better error messages
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Tree generator state exposed to JavaScript
///
/// Property edits only take effect on the next `generate` call.
#[wasm_bindgen]
pub struct ProcTree {
    generator: TreeGenerator,
    mesh: TreeMesh,
    twigs_enabled: bool,
}

impl Default for ProcTree {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl ProcTree {
    /// Create a generator with the default preset
    #[wasm_bindgen(constructor)]
    pub fn new() -> ProcTree {
        Self::with_properties(TreeProperties::default())
    }

    /// Create a generator from a YAML properties document
    #[wasm_bindgen]
    pub fn from_yaml(yaml: &str) -> Result<ProcTree, JsValue> {
        let props = TreeProperties::from_yaml(yaml).map_err(to_js_error)?;
        Ok(Self::with_properties(props))
    }

    /// Current properties as YAML
    #[wasm_bindgen]
    pub fn to_yaml(&self) -> Result<String, JsValue> {
        self.generator.props.to_yaml().map_err(to_js_error)
    }

    /// Regenerate the mesh from the current properties
    #[wasm_bindgen]
    pub fn generate(&mut self) {
        self.mesh = if self.twigs_enabled {
            self.generator.generate_with_twigs()
        } else {
            self.generator.generate()
        };
    }

    #[wasm_bindgen]
    pub fn set_twigs_enabled(&mut self, enabled: bool) {
        self.twigs_enabled = enabled;
    }

    // === Buffers ===

    /// Branch positions, 3 floats per vertex
    #[wasm_bindgen]
    pub fn vertices(&self) -> Vec<f32> {
        self.mesh.branches.vertex_data()
    }

    /// Branch triangles, 3 indices per face
    #[wasm_bindgen]
    pub fn faces(&self) -> Vec<u32> {
        self.mesh.branches.index_data()
    }

    #[wasm_bindgen]
    pub fn twig_vertices(&self) -> Vec<f32> {
        self.mesh.twigs.vertex_data()
    }

    #[wasm_bindgen]
    pub fn twig_faces(&self) -> Vec<u32> {
        self.mesh.twigs.index_data()
    }

    /// Flat-shaded branch mesh: position(3) + normal(3) per vertex, 3 vertices per face
    #[wasm_bindgen]
    pub fn flat_vertex_data(&self) -> Vec<f32> {
        FlatMesh::from_buffers(&self.mesh.branches).vertex_data()
    }

    #[wasm_bindgen]
    pub fn vertex_count(&self) -> usize {
        self.mesh.branches.vertex_count()
    }

    #[wasm_bindgen]
    pub fn face_count(&self) -> usize {
        self.mesh.branches.face_count()
    }

    // === Properties ===

    #[wasm_bindgen]
    pub fn seed(&self) -> i32 {
        self.generator.props.seed
    }

    #[wasm_bindgen]
    pub fn set_seed(&mut self, value: i32) {
        self.generator.props.set_seed(value);
    }

    /// Pick a new seed in `[0, 1000)` and return it
    #[wasm_bindgen]
    pub fn randomize_seed(&mut self) -> i32 {
        let seed = (js_sys::Math::random() * 1000.0).floor() as i32;
        self.generator.props.set_seed(seed);
        seed
    }

    #[wasm_bindgen]
    pub fn set_drop_amount(&mut self, value: f32) {
        self.generator.props.set_drop_amount(value);
    }

    #[wasm_bindgen]
    pub fn set_climb_rate(&mut self, value: f32) {
        self.generator.props.set_climb_rate(value);
    }

    #[wasm_bindgen]
    pub fn set_max_radius(&mut self, value: f32) {
        self.generator.props.set_max_radius(value);
    }

    #[wasm_bindgen]
    pub fn set_initial_branch_length(&mut self, value: f32) {
        self.generator.props.set_initial_branch_length(value);
    }

    #[wasm_bindgen]
    pub fn set_branch_factor(&mut self, value: f32) {
        self.generator.props.set_branch_factor(value);
    }

    #[wasm_bindgen]
    pub fn set_trunk_length(&mut self, value: f32) {
        self.generator.props.set_trunk_length(value);
    }

    #[wasm_bindgen]
    pub fn set_trunk_kink(&mut self, value: f32) {
        self.generator.props.set_trunk_kink(value);
    }

    #[wasm_bindgen]
    pub fn set_sweep_amount(&mut self, value: f32) {
        self.generator.props.set_sweep_amount(value);
    }

    #[wasm_bindgen]
    pub fn set_levels(&mut self, value: f32) {
        self.generator.props.set_levels(value);
    }

    #[wasm_bindgen]
    pub fn set_length_falloff_power(&mut self, value: f32) {
        self.generator.props.set_length_falloff_power(value);
    }

    #[wasm_bindgen]
    pub fn set_length_falloff_factor(&mut self, value: f32) {
        self.generator.props.set_length_falloff_factor(value);
    }

    #[wasm_bindgen]
    pub fn set_twist_rate(&mut self, value: f32) {
        self.generator.props.set_twist_rate(value);
    }

    #[wasm_bindgen]
    pub fn set_clump_max(&mut self, value: f32) {
        self.generator.props.set_clump_max(value);
    }

    #[wasm_bindgen]
    pub fn set_clump_min(&mut self, value: f32) {
        self.generator.props.set_clump_min(value);
    }
}

impl ProcTree {
    pub fn with_properties(props: TreeProperties) -> Self {
        Self {
            generator: TreeGenerator::new(props),
            mesh: TreeMesh::new(),
            twigs_enabled: false,
        }
    }

    pub fn properties(&self) -> &TreeProperties {
        &self.generator.props
    }

    pub fn mesh(&self) -> &TreeMesh {
        &self.mesh
    }
}

fn to_js_error(err: TreeError) -> JsValue {
    JsValue::from_str(&err.to_string())
}
