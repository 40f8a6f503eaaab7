use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Identifier handed out by a world when a shape is registered. Ids increase
/// monotonically and are never reused while the shape is alive.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ShapeId(pub u32);

impl ShapeId {
    #[inline(always)]
    pub fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for ShapeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl fmt::Display for ShapeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Broad-phase bucket a shape belongs to. Declaration order is the order used
/// whenever several groups are scanned.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum CollisionGroup {
    #[default]
    Default,
    Hero,
    HeroBullet,
    Bullet,
    Enemy,
    EnemyCollideBullet,
    Item,
}

impl CollisionGroup {
    pub const COUNT: usize = 7;
    pub const ALL: [CollisionGroup; CollisionGroup::COUNT] = [
        CollisionGroup::Default,
        CollisionGroup::Hero,
        CollisionGroup::HeroBullet,
        CollisionGroup::Bullet,
        CollisionGroup::Enemy,
        CollisionGroup::EnemyCollideBullet,
        CollisionGroup::Item,
    ];

    #[inline(always)]
    pub fn index(self) -> usize {
        self as usize
    }
}
