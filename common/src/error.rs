use fixmath::Fix64;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ShapeError {
    #[error("radius must be non-negative (radius: {radius})")]
    InvalidRadius { radius: Fix64 },
    #[error("oval axes must be non-negative (a: {a}, b: {b})")]
    InvalidAxis { a: Fix64, b: Fix64 },
    #[error("polygon needs at least one vertex")]
    EmptyPolygon,
}

pub type ShapeResult<T> = Result<T, ShapeError>;
