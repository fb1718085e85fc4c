//! Typed identifiers.
//!
//! The inner integer is `pub` so SoA code can index with `id.0 as usize`;
//! prefer [`AgentId::index`] for readability.  `Ord` on `AgentId` decides
//! move conflicts in `tw-sim`: the lowest id wins.

use std::fmt;

/// Define a `Copy` id newtype displayed as `"<label> <n>"`.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty) => $label:literal;) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[cfg_attr(feature = "serde", serde(transparent))]
        $vis struct $name(pub $inner);

        impl $name {
            #[inline]
            pub fn index(self) -> usize {
                self.0 as usize
            }

            /// The id for slot `i`, or `None` if `i` does not fit.
            #[inline]
            pub fn from_index(i: usize) -> Option<$name> {
                <$inner>::try_from(i).ok().map($name)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($label, " {}"), self.0)
            }
        }
    };
}

typed_id! {
    /// An agent's slot in the `AgentStore`.  Never reused after despawn.
    pub struct AgentId(u32) => "agent";
}

typed_id! {
    /// Host-defined terminal action performed on arrival (open a door,
    /// harvest, attack…).  The engine carries it through without
    /// interpreting it.
    pub struct ActionId(u16) => "action";
}
