#![deny(unsafe_code)]

use std::fmt;

use crate::ModelError;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident, $kind:literal) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
        )]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Ids are opaque: blank values are rejected, anything else is
            /// kept byte for byte.
            pub fn new(value: impl Into<String>) -> Result<Self, ModelError> {
                let value = value.into();
                if value.trim().is_empty() {
                    return Err(ModelError::InvalidId {
                        kind: $kind,
                        value,
                    });
                }
                Ok(Self(value))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = ModelError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_id!(
    /// Stable identifier of a record in a remote table.
    ItemId,
    "item id"
);
string_id!(
    /// Customer partition that every query is restricted to.
    TenantId,
    "tenant id"
);
string_id!(UserId, "user id");

impl ItemId {
    /// Allocate a fresh random identifier for a record that has none yet.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_ids_are_rejected() {
        assert!(ItemId::new("   ").is_err());
        assert!(TenantId::new("").is_err());
    }

    #[test]
    fn surrounding_whitespace_is_kept() {
        let padded = ItemId::new(" emp-1 ").unwrap();
        assert_eq!(padded.as_str(), " emp-1 ");
        assert_ne!(padded, ItemId::new("emp-1").unwrap());
    }

    #[test]
    fn generated_ids_are_unique() {
        assert_ne!(ItemId::generate(), ItemId::generate());
    }

    #[test]
    fn deserialization_validates() {
        let ok: ItemId = serde_json::from_str("\"emp-7\"").unwrap();
        assert_eq!(ok.as_str(), "emp-7");
        assert!(serde_json::from_str::<ItemId>("\"  \"").is_err());
    }
}
