#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GjkConfig {
    /// Support evaluations after the first before giving up. Running out
    /// counts as no collision.
    pub max_iterations: u32,
}

impl Default for GjkConfig {
    fn default() -> Self {
        GjkConfig {
            max_iterations: 100,
        }
    }
}
