//! Caller authentication against the accepted API key set.

use std::collections::HashSet;

use crate::errors::GatewayError;

/// Name of the request header carrying the caller's API key.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Deduplicated set of accepted caller API keys.
///
/// An empty set means the deployment is misconfigured: every dispatch is
/// refused with [`GatewayError::MissingApiKeyConfig`] regardless of what the
/// caller presents.
#[derive(Clone, Default)]
pub struct CredentialSet {
    keys: HashSet<String>,
}

impl CredentialSet {
    /// Builds the set from the primary key, the alias key, and a
    /// comma-separated list.
    ///
    /// Primary and alias values are taken as-is when non-empty. List entries
    /// are trimmed and empty entries dropped.
    pub fn from_sources(primary: Option<&str>, alias: Option<&str>, list: Option<&str>) -> Self {
        let singles = [primary, alias]
            .into_iter()
            .flatten()
            .filter(|k| !k.is_empty());
        let listed = list
            .into_iter()
            .flat_map(|l| l.split(','))
            .map(str::trim)
            .filter(|k| !k.is_empty());

        Self {
            keys: singles.chain(listed).map(str::to_owned).collect(),
        }
    }

    /// Number of distinct accepted keys.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Returns `true` when no key is accepted.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Checks the caller's presented key.
    ///
    /// Membership is exact string equality; no trimming or case folding.
    ///
    /// # Errors
    ///
    /// - [`GatewayError::MissingApiKeyConfig`] when the set is empty.
    /// - [`GatewayError::Unauthorized`] when `presented` is absent, empty, or
    ///   not a member.
    pub fn authenticate(&self, presented: Option<&str>) -> Result<(), GatewayError> {
        if self.keys.is_empty() {
            return Err(GatewayError::MissingApiKeyConfig);
        }
        match presented {
            Some(key) if self.keys.contains(key) => Ok(()),
            _ => Err(GatewayError::Unauthorized),
        }
    }
}

impl std::fmt::Debug for CredentialSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialSet")
            .field("len", &self.keys.len())
            .finish()
    }
}
