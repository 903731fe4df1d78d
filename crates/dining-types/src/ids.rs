//! Type-safe identifier wrappers around ring positions.
//!
//! Agents and resources are both numbered `0..N-1` around the table. Giving
//! each its own newtype keeps an agent index from being passed where a
//! resource index is expected.

use serde::{Deserialize, Serialize};

/// Generates a newtype wrapper around a `usize` ring position.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub usize);

        impl $name {
            /// Create an identifier for the given ring position.
            pub const fn new(position: usize) -> Self {
                Self(position)
            }

            /// Return the ring position as a plain index.
            pub const fn index(self) -> usize {
                self.0
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<usize> for $name {
            fn from(position: usize) -> Self {
                Self(position)
            }
        }

        impl From<$name> for usize {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id! {
    /// Identifier of a philosopher seated at the table.
    AgentId
}

define_id! {
    /// Identifier of a stick lying between two philosophers.
    ResourceId
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_round_trip_through_usize() {
        let agent = AgentId::new(3);
        assert_eq!(usize::from(agent), 3);
        assert_eq!(ResourceId::from(4).index(), 4);
    }

    #[test]
    fn ids_display_as_bare_numbers() {
        assert_eq!(AgentId::new(2).to_string(), "2");
        assert_eq!(ResourceId::new(0).to_string(), "0");
    }

    #[test]
    fn ids_serialize_transparently() {
        let json = serde_json::to_string(&ResourceId::new(7)).unwrap_or_default();
        assert_eq!(json, "7");
    }
}
