//! Deterministic Q32.32 fixed-point math.
//!
//! Every operation here is integer-only, so identical inputs produce identical
//! bit patterns on every platform and thread.

pub mod fix64;
mod lut;
pub mod vec2;

pub use fix64::Fix64;
pub use vec2::FixVec2;
