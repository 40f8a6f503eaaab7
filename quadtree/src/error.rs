use fixmath::Fix64;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuadtreeError {
    InvalidCellSize { cell_size: Fix64 },
    InvalidMaxDepth { max_depth: u32 },
    RootTooLarge { cell_size: Fix64, max_depth: u32 },
}

pub type QuadtreeResult<T> = Result<T, QuadtreeError>;

impl fmt::Display for QuadtreeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuadtreeError::InvalidCellSize { cell_size } => {
                write!(f, "cell size must be positive (cell_size: {})", cell_size)
            }
            QuadtreeError::InvalidMaxDepth { max_depth } => {
                write!(
                    f,
                    "max depth must be at most {} (max_depth: {})",
                    crate::quadtree::MAX_DEPTH_LIMIT,
                    max_depth
                )
            }
            QuadtreeError::RootTooLarge {
                cell_size,
                max_depth,
            } => {
                write!(
                    f,
                    "cell size scaled by 2^max_depth does not fit a fixed-point value (cell_size: {}, max_depth: {})",
                    cell_size, max_depth
                )
            }
        }
    }
}

impl std::error::Error for QuadtreeError {}
