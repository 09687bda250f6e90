//! Query identifiers

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies a logical query. Equal keys share one cache entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QueryKey(String);

impl QueryKey {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The namespace list query
    pub fn namespaces() -> Self {
        Self::new("namespaces")
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn equal_keys_share_a_slot() {
        let mut map = HashMap::new();
        map.insert(QueryKey::namespaces(), 1);
        map.insert(QueryKey::new("namespaces"), 2);
        assert_eq!(map.len(), 1);
        assert_eq!(map[&QueryKey::namespaces()], 2);
    }

    #[test]
    fn display_is_the_name() {
        assert_eq!(QueryKey::namespaces().to_string(), "namespaces");
    }
}
