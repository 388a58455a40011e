//! Error types for loading and saving tree properties.

/// Errors raised while reading or writing a [`TreeProperties`](crate::params::TreeProperties) document.
///
/// Generation itself never fails; these only come from the YAML layer.
#[derive(Debug, thiserror::Error)]
pub enum TreeError {
    /// The YAML input could not be parsed into properties.
    #[error("failed to parse tree properties: {0}")]
    Parse(#[source] serde_yaml::Error),

    /// The properties could not be serialized to YAML.
    #[error("failed to serialize tree properties: {0}")]
    Serialize(#[source] serde_yaml::Error),
}
