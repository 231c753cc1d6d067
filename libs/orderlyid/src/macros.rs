//! Macros for defining typed ID types.

/// Macro to define a typed ID bound to a fixed prefix.
///
/// This generates a newtype wrapper around [`crate::OrderlyId`] with:
/// - A `PREFIX` constant
/// - `generate()` to mint a fresh ID from the global generator
/// - `parse()` that also rejects other prefixes
/// - `Display` and `FromStr` implementations
/// - `Serialize` and `Deserialize` as the canonical string
/// - `Ord`, `Hash`, and other standard traits
///
/// # Example
///
/// ```ignore
/// define_id!(OrderId, "order");
/// define_id!(UserId, "user");
///
/// let order_id = OrderId::generate(&Options::new().with_checksum(true))?;
/// let parsed: OrderId = "order_00myngy59c0003000dfk59mg3e36j3rr-9xgg".parse()?;
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident, $prefix:literal) => {
        /// A typed ID for this entity type.
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name($crate::OrderlyId);

        impl $name {
            /// The prefix for this ID type.
            pub const PREFIX: &'static str = $prefix;

            /// Generates a new ID with the process-wide generator.
            pub fn generate(options: &$crate::Options) -> Result<Self, $crate::IdError> {
                $crate::Generator::global()
                    .generate_id(Self::PREFIX, options)
                    .map(Self)
            }

            /// Wraps a decoded ID, checking its prefix.
            pub fn from_id(id: $crate::OrderlyId) -> Result<Self, $crate::IdError> {
                if id.prefix() != Self::PREFIX {
                    return Err($crate::IdError::PrefixMismatch {
                        expected: Self::PREFIX,
                        actual: id.prefix().to_string(),
                    });
                }
                Ok(Self(id))
            }

            /// Returns the decoded ID.
            #[must_use]
            pub fn id(&self) -> &$crate::OrderlyId {
                &self.0
            }

            /// Returns the creation timestamp in Unix milliseconds.
            #[must_use]
            pub fn timestamp_ms(&self) -> u64 {
                self.0.time_ms()
            }

            /// Parses an ID from a string.
            ///
            /// The string must be in the format `{prefix}_{payload}[-{checksum}]`.
            pub fn parse(s: &str) -> Result<Self, $crate::IdError> {
                Self::from_id($crate::OrderlyId::parse(s)?)
            }

            /// Formats the ID, optionally with its checksum.
            #[must_use]
            pub fn encode(&self, with_checksum: bool) -> String {
                self.0.encode(with_checksum)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                std::fmt::Display::fmt(&self.0, f)
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::IdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s)
            }
        }

        impl $crate::__private::serde::Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: $crate::__private::serde::Serializer,
            {
                serializer.serialize_str(&self.0.encode(false))
            }
        }

        impl<'de> $crate::__private::serde::Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: $crate::__private::serde::Deserializer<'de>,
            {
                let s = <String as $crate::__private::serde::Deserialize>::deserialize(deserializer)?;
                Self::parse(&s).map_err($crate::__private::serde::de::Error::custom)
            }
        }

        impl AsRef<$crate::OrderlyId> for $name {
            fn as_ref(&self) -> &$crate::OrderlyId {
                &self.0
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use crate::define_id;
    use crate::{IdError, Options};

    define_id!(OrderId, "order");
    define_id!(UserId, "user");

    #[test]
    fn test_order_id_roundtrip() {
        let id = OrderId::generate(&Options::new()).unwrap();
        let s = id.to_string();
        assert!(s.starts_with("order_"));
        let parsed: OrderId = s.parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_parse_accepts_checksum() {
        let id = OrderId::parse("order_00myngy59c0003000dfk59mg3e36j3rr-9xgg").unwrap();
        assert_eq!(id.id().tenant(), 12);
        assert_eq!(id.encode(true), "order_00myngy59c0003000dfk59mg3e36j3rr-9xgg");
    }

    #[test]
    fn test_prefix_mismatch() {
        let user = UserId::generate(&Options::new()).unwrap();
        let err = OrderId::parse(&user.to_string()).unwrap_err();
        assert!(matches!(
            err,
            IdError::PrefixMismatch {
                expected: "order",
                ..
            }
        ));
        assert!(err.is_prefix_error());
    }

    #[test]
    fn test_json_roundtrip() {
        let id = OrderId::generate(&Options::new().with_tenant(3)).unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{id}\""));
        let parsed: OrderId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, parsed);
        assert!(serde_json::from_str::<OrderId>("\"user_00000000000000000000000000000000\"").is_err());
    }

    #[test]
    fn test_ids_from_one_generator_sort_by_creation() {
        let first = OrderId::generate(&Options::new()).unwrap();
        std::thread::sleep(std::time::Duration::from_millis(2));
        let second = OrderId::generate(&Options::new()).unwrap();
        assert!(first < second);
        assert!(first.to_string() < second.to_string());
        assert!(first.timestamp_ms() < second.timestamp_ms());
    }
}
