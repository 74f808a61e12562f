//! Object kinds and kind bit-sets.
//!
//! Every body in the arena carries exactly one [`ObjectKind`].  Sensors
//! filter contacts with a [`KindMask`], a bit-set over kinds.

use std::fmt;
use std::ops::{BitAnd, BitOr};

/// What a physical body represents.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ObjectKind {
    Robot,
    Wall,
    RedPuck,
    GreenPuck,
    Nest,
    GoalZone,
}

impl ObjectKind {
    pub const ALL: [ObjectKind; 6] = [
        ObjectKind::Robot,
        ObjectKind::Wall,
        ObjectKind::RedPuck,
        ObjectKind::GreenPuck,
        ObjectKind::Nest,
        ObjectKind::GoalZone,
    ];

    /// Single-bit mask for this kind.
    #[inline]
    pub const fn mask(self) -> KindMask {
        KindMask(1 << self as u8)
    }

    #[inline]
    pub const fn is_puck(self) -> bool {
        matches!(self, ObjectKind::RedPuck | ObjectKind::GreenPuck)
    }

    /// Display colour used by renderers.
    pub const fn colour(self) -> &'static str {
        match self {
            ObjectKind::Robot     => "white",
            ObjectKind::Wall      => "grey",
            ObjectKind::RedPuck   => "red",
            ObjectKind::GreenPuck => "green",
            ObjectKind::Nest      => "yellow",
            ObjectKind::GoalZone  => "lightblue",
        }
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

// ── KindMask ──────────────────────────────────────────────────────────────────

/// Bit-set over [`ObjectKind`]s.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct KindMask(pub u8);

impl KindMask {
    pub const NONE:       KindMask = KindMask(0);
    pub const ROBOT:      KindMask = ObjectKind::Robot.mask();
    pub const WALL:       KindMask = ObjectKind::Wall.mask();
    pub const RED_PUCK:   KindMask = ObjectKind::RedPuck.mask();
    pub const GREEN_PUCK: KindMask = ObjectKind::GreenPuck.mask();
    pub const NEST:       KindMask = ObjectKind::Nest.mask();
    pub const GOAL_ZONE:  KindMask = ObjectKind::GoalZone.mask();
    pub const ANY_PUCK:   KindMask = KindMask(Self::RED_PUCK.0 | Self::GREEN_PUCK.0);

    #[inline]
    pub const fn contains(self, kind: ObjectKind) -> bool {
        self.0 & kind.mask().0 != 0
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// `true` if the mask contains only puck kinds (and at least one).
    #[inline]
    pub const fn is_puck_only(self) -> bool {
        !self.is_empty() && self.0 & !Self::ANY_PUCK.0 == 0
    }
}

impl BitOr for KindMask {
    type Output = KindMask;
    #[inline]
    fn bitor(self, rhs: KindMask) -> KindMask {
        KindMask(self.0 | rhs.0)
    }
}

impl BitAnd for KindMask {
    type Output = KindMask;
    #[inline]
    fn bitand(self, rhs: KindMask) -> KindMask {
        KindMask(self.0 & rhs.0)
    }
}

impl From<ObjectKind> for KindMask {
    #[inline]
    fn from(kind: ObjectKind) -> KindMask {
        kind.mask()
    }
}
