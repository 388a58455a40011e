pub mod properties;
pub mod random;

pub use properties::TreeProperties;
pub use random::RandomState;
