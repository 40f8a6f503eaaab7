use fixmath::{Fix64, FixVec2};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Axis-aligned box with inclusive bounds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Aabb {
    pub min: FixVec2,
    pub max: FixVec2,
}

impl Aabb {
    pub fn new(min: FixVec2, max: FixVec2) -> Self {
        debug_assert!(
            min.x <= max.x && min.y <= max.y,
            "aabb min {:?} exceeds max {:?}",
            min,
            max
        );
        Self { min, max }
    }

    pub fn from_center_half(center: FixVec2, half: FixVec2) -> Self {
        Self::new(center - half, center + half)
    }

    /// Smallest box holding every point. Empty input gives the zero box.
    pub fn from_points(points: &[FixVec2]) -> Self {
        let Some((first, rest)) = points.split_first() else {
            return Aabb::default();
        };
        let (mut min, mut max) = (*first, *first);
        for p in rest {
            min = min.min(*p);
            max = max.max(*p);
        }
        Self { min, max }
    }

    #[inline(always)]
    pub fn width(&self) -> Fix64 {
        self.max.x - self.min.x
    }

    #[inline(always)]
    pub fn height(&self) -> Fix64 {
        self.max.y - self.min.y
    }

    #[inline(always)]
    pub fn center(&self) -> FixVec2 {
        FixVec2::new(
            self.min.x + (self.max.x - self.min.x) * Fix64::HALF,
            self.min.y + (self.max.y - self.min.y) * Fix64::HALF,
        )
    }

    #[inline(always)]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x <= other.max.x
            && other.min.x <= self.max.x
            && self.min.y <= other.max.y
            && other.min.y <= self.max.y
    }

    #[inline(always)]
    pub fn contains(&self, other: &Aabb) -> bool {
        self.min.x <= other.min.x
            && self.min.y <= other.min.y
            && other.max.x <= self.max.x
            && other.max.y <= self.max.y
    }

    pub fn contains_point(&self, p: FixVec2) -> bool {
        self.min.x <= p.x && p.x <= self.max.x && self.min.y <= p.y && p.y <= self.max.y
    }

    pub fn union(&self, other: &Aabb) -> Aabb {
        Aabb {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }
}
