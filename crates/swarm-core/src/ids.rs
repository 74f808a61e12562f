//! Strongly typed, zero-cost identifier wrappers.
//!
//! All IDs are `Copy + Ord + Hash` so they can be used as map keys and sorted
//! collection elements without ceremony.  They are indices into the owning
//! collection (robot list, puck store, physics body table), never pointers,
//! so there are no ownership cycles between bodies, sensors, and robots.

use std::fmt;

/// Generate a typed ID wrapper around a primitive integer.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub $inner);

        impl $name {
            /// Sentinel meaning "no valid ID".
            pub const INVALID: $name = $name(<$inner>::MAX);

            /// Cast to `usize` for direct use as a `Vec` index.
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl Default for $name {
            #[inline(always)]
            fn default() -> Self {
                Self::INVALID
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl From<$name> for usize {
            #[inline(always)]
            fn from(id: $name) -> usize {
                id.0 as usize
            }
        }

        impl TryFrom<usize> for $name {
            type Error = std::num::TryFromIntError;
            fn try_from(n: usize) -> Result<$name, Self::Error> {
                <$inner>::try_from(n).map($name)
            }
        }
    };
}

typed_id! {
    /// Position of a robot in the simulation's robot list.
    ///
    /// Robots are appended on spawn and popped from the end on despawn, so
    /// the ids of surviving robots stay stable.
    pub struct RobotId(u32);
}

typed_id! {
    /// Slot of a puck in the puck store.  An absorbed puck's slot goes to
    /// the next puck created.
    pub struct PuckId(u32);
}

typed_id! {
    /// Handle of a body (solid or sensor zone) in the physics world.
    pub struct BodyHandle(u32);
}

typed_id! {
    /// Handle of a hold constraint in the physics world.
    pub struct ConstraintHandle(u32);
}
