//! Type-safe identifier wrappers.
//!
//! Catalog data (buildings, planets, systems, skills) is keyed by stable
//! string slugs that appear verbatim in saved documents and in the HTTP
//! API, so those identifiers wrap [`String`]. Player identities are minted
//! at runtime and wrap [`Uuid`] (v7, time-ordered) for efficient database
//! indexing. Strong typing prevents accidental mixing at compile time.

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

/// Generates a newtype wrapper around a string slug with standard derives.
macro_rules! define_key {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
        #[serde(transparent)]
        #[ts(export, export_to = "bindings/")]
        pub struct $name(pub String);

        impl $name {
            /// Create a key from any string-like value.
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            /// Return the key as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the key and return the inner [`String`].
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }
    };
}

/// Generates a newtype wrapper around [`Uuid`] with standard derives.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
        #[ts(export, export_to = "bindings/")]
        pub struct $name(pub Uuid);

        impl $name {
            /// Create a new identifier using UUID v7 (time-ordered).
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            /// Return the inner [`Uuid`] value.
            pub const fn into_inner(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<Uuid> for $name {
            fn from(id: Uuid) -> Self {
                Self(id)
            }
        }

        impl From<$name> for Uuid {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_key! {
    /// Identifier of a building definition, meaningful only within the
    /// catalog of the planet it was drawn from.
    BuildingId
}

define_key! {
    /// Globally unique identifier of a planet across the whole universe.
    PlanetKey
}

define_key! {
    /// Identifier of a star system in the universe chart.
    SystemId
}

define_key! {
    /// Identifier of a skill in the research tree.
    SkillId
}

define_id! {
    /// Identity of a player, used as the persistence slot key.
    PlayerId
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_distinct_types() {
        let building = BuildingId::from("wind_turbine");
        let planet = PlanetKey::from("sol-0");
        // Different types -- the compiler enforces no mixing.
        assert_eq!(building.as_str(), "wind_turbine");
        assert_eq!(planet.as_str(), "sol-0");
    }

    #[test]
    fn key_serializes_as_bare_string() {
        let key = SystemId::from("alpha-centauri");
        let json = serde_json::to_string(&key).ok();
        assert_eq!(json.as_deref(), Some("\"alpha-centauri\""));
    }

    #[test]
    fn key_roundtrip_serde() {
        let original = SkillId::from("efficient_blades");
        let json = serde_json::to_string(&original).ok();
        let restored: Result<SkillId, _> =
            serde_json::from_str(json.as_deref().unwrap_or(""));
        assert_eq!(restored.ok(), Some(original));
    }

    #[test]
    fn player_id_display_matches_uuid() {
        let id = PlayerId::new();
        assert_eq!(id.to_string(), id.into_inner().to_string());
    }
}
