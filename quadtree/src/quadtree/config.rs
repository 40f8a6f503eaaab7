use fixmath::{Fix64, FixVec2};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// World grid: the root cell spans `cell_size * 2^max_depth` on each side,
/// starting at `origin`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct QuadTreeConfig {
    pub origin: FixVec2,
    pub cell_size: Fix64,
    pub max_depth: u32,
}

impl Default for QuadTreeConfig {
    fn default() -> Self {
        QuadTreeConfig {
            origin: FixVec2::from_ints(-4096, -4096),
            cell_size: Fix64::from_int(32),
            max_depth: 8,
        }
    }
}
