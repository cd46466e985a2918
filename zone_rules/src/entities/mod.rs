//! Entity definitions for stalkers and the things they carry.

mod components;
mod player;

pub use components::*;
pub use player::*;

use serde::{Deserialize, Serialize};

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            /// Create an ID from any string-like value.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl std::borrow::Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_id!(
    /// Chat-platform identifier of a stalker.
    PlayerId
);
string_id!(
    /// Catalog key of an item or artifact.
    ItemId
);
string_id!(
    /// Catalog key of a mutant.
    MutantId
);
string_id!(
    /// Catalog key of a zone.
    ZoneId
);

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_id_lookup_by_str() {
        let mut map = BTreeMap::new();
        map.insert(ItemId::from("pm_pistol"), 1);
        assert_eq!(map.get("pm_pistol"), Some(&1));
        assert_eq!(ItemId::new("pm_pistol").to_string(), "pm_pistol");
    }

    #[test]
    fn test_id_is_transparent() {
        let id: ZoneId = serde_json::from_str(r#""cordon""#).unwrap();
        assert_eq!(id.as_str(), "cordon");
    }
}
