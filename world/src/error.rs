use common::ShapeError;
use quadtree::QuadtreeError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CollisionError {
    #[error("invalid shape: {0}")]
    Shape(#[from] ShapeError),
    #[error("invalid quadtree config: {0}")]
    QuadTree(#[from] QuadtreeError),
    #[error("batch chunk size must be positive")]
    InvalidChunkSize,
    #[error("failed to build batch worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

pub type CollisionResult<T> = Result<T, CollisionError>;
