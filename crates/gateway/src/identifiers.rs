//! Newtype domain identifiers.
//!
//! The gateway handles a handful of strings that must never be mixed up: the
//! repository owner, the repository name, and the per-request correlation id.
//! Each is a distinct newtype so a [`RepositoryName`] cannot be passed where an
//! [`OwnerName`] is expected.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Macro for String-wrapped newtypes.
// Generates: struct, new() returning Option<Self>, as_str(), Display.
// ---------------------------------------------------------------------------
macro_rules! string_id {
    (
        $(#[$attr:meta])*
        $name:ident
    ) => {
        $(#[$attr])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Creates a new identifier, returning `None` if the value is empty.
            pub fn new(value: impl Into<String>) -> Option<Self> {
                let v = value.into();
                if v.is_empty() { None } else { Some(Self(v)) }
            }

            /// Returns the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

// ---------------------------------------------------------------------------
// Identifiers — upstream repository coordinates
// ---------------------------------------------------------------------------

string_id! {
    /// The user or organisation that owns the target repository (`GH_OWNER`).
    OwnerName
}

string_id! {
    /// The name of the target repository within its owner (`GH_REPO`).
    RepositoryName
}

// ---------------------------------------------------------------------------
// Correlation id
// ---------------------------------------------------------------------------

/// Ties one inbound request to its one outbound dispatch.
///
/// Either supplied by the caller (used verbatim) or generated as a random
/// UUID v4. Echoed to the caller and embedded in `client_payload.request_id`;
/// never stored. No deduplication is performed: two requests carrying the same
/// id are two independent dispatches.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(String);

impl RequestId {
    /// Generates a fresh random identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Accepts a caller-supplied identifier.
    ///
    /// Returns `None` when the value is empty or whitespace only. A non-blank
    /// value is kept exactly as given, surrounding whitespace included.
    pub fn from_caller(value: &str) -> Option<Self> {
        if value.trim().is_empty() {
            None
        } else {
            Some(Self(value.to_owned()))
        }
    }

    /// Uses the caller's identifier when usable, otherwise generates one.
    pub fn from_caller_or_generate(value: Option<&str>) -> Self {
        value
            .and_then(Self::from_caller)
            .unwrap_or_else(Self::generate)
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn caller_id_is_kept_verbatim() {
        let id = RequestId::from_caller("  abc-123 ").unwrap();
        assert_eq!(id.as_str(), "  abc-123 ");
    }

    #[test]
    fn blank_caller_id_is_rejected() {
        assert!(RequestId::from_caller("").is_none());
        assert!(RequestId::from_caller(" \t\n").is_none());
    }

    #[test]
    fn missing_or_blank_caller_id_generates_a_uuid() {
        let generated = RequestId::from_caller_or_generate(Some("   "));
        assert!(Uuid::parse_str(generated.as_str()).is_ok());

        let generated = RequestId::from_caller_or_generate(None);
        assert!(Uuid::parse_str(generated.as_str()).is_ok());
    }

    #[test]
    fn generated_ids_differ() {
        assert_ne!(RequestId::generate(), RequestId::generate());
    }

    #[test]
    fn empty_owner_is_rejected() {
        assert!(OwnerName::new("").is_none());
        assert_eq!(OwnerName::new("octo").unwrap().as_str(), "octo");
    }

    #[test]
    fn request_id_serializes_as_plain_string() {
        let id = RequestId::from_caller("r-1").unwrap();
        assert_eq!(serde_json::to_value(&id).unwrap(), serde_json::json!("r-1"));
    }
}
