use collisions::GjkConfig;
use quadtree::QuadTreeConfig;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// How group queries find their candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum BroadPhase {
    /// Scan the whole group bucket in insertion order.
    #[default]
    Buckets,
    /// Only visit shapes sharing a quadtree cell with the source.
    QuadTree(QuadTreeConfig),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BatchConfig {
    /// Candidates handed to one worker task.
    pub chunk_size: usize,
    /// Worker threads in the batch pool; 0 lets rayon decide.
    pub worker_threads: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        BatchConfig {
            chunk_size: 64,
            worker_threads: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct WorldConfig {
    pub gjk: GjkConfig,
    pub broad_phase: BroadPhase,
    pub batch: BatchConfig,
}
