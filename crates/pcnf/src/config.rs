//! Normalizer configuration types.

use crate::normalize::naming::NamingPolicy;
use serde::{Deserialize, Serialize};

/// Configuration for the normalization pipeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizerConfig {
    /// Fresh names for standardizing bound variables apart
    pub naming: NamingPolicy,
    /// Prefix of the variables introduced by function elimination
    pub function_variable_prefix: String,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        NormalizerConfig {
            naming: NamingPolicy::ReverseAlphabet,
            function_variable_prefix: "v".to_string(),
        }
    }
}
