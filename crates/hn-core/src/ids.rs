use core::fmt;

/// Declares a `u32`-backed identifier newtype.
///
/// Ids come from outside the engine (project files, editors), so any value
/// including zero is valid. Distinct types keep node, edge and pipe ids from
/// being mixed up at compile time.
macro_rules! typed_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[cfg_attr(feature = "serde", serde(transparent))]
        pub struct $name(u32);

        impl $name {
            pub const fn new(raw: u32) -> Self {
                Self(raw)
            }

            pub const fn get(self) -> u32 {
                self.0
            }

            /// The id following this one, or `None` at `u32::MAX`.
            pub fn checked_next(self) -> Option<Self> {
                self.0.checked_add(1).map(Self)
            }
        }

        impl From<u32> for $name {
            fn from(raw: u32) -> Self {
                Self(raw)
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}#{}", $prefix, self.0)
            }
        }
    };
}

typed_id!(
    /// Identifier of a network node (source, mixer or substation).
    NodeId,
    "node"
);
typed_id!(
    /// Identifier of a network edge (pipe segment).
    EdgeId,
    "edge"
);
typed_id!(
    /// Identifier of an entry in the external pipe catalog.
    PipeId,
    "pipe"
);
