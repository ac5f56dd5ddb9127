//! Identity registry: durable peer identity to live session id
//!
//! Identities are client-supplied strings (typically public keys) and are
//! not validated beyond whitespace normalization. Uniqueness is enforced
//! only at the mapping level: the last registration wins.

use std::collections::HashMap;

/// Maps a normalized identity string to the session id currently serving it
#[derive(Debug, Default)]
pub struct IdentityRegistry {
    entries: HashMap<String, String>,
}

impl IdentityRegistry {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Strip all whitespace from a client-supplied identity
    pub fn normalize(identity: &str) -> String {
        identity.split_whitespace().collect()
    }

    /// Register an identity for a session, overwriting any prior mapping.
    ///
    /// Returns the normalized identity that was stored, or `None` if the
    /// identity is empty after normalization (a no-op announce).
    pub fn register(&mut self, identity: &str, session_id: &str) -> Option<String> {
        let normalized = Self::normalize(identity);
        if normalized.is_empty() {
            return None;
        }
        self.entries
            .insert(normalized.clone(), session_id.to_string());
        Some(normalized)
    }

    /// Look up the session id currently registered for an identity
    pub fn resolve(&self, identity: &str) -> Option<&str> {
        self.entries
            .get(&Self::normalize(identity))
            .map(String::as_str)
    }

    /// Remove an identity mapping, but only if it still points at the given
    /// session. A reconnect may have re-registered the identity under a new
    /// session; the old session's disconnect must not evict that mapping.
    pub fn unregister(&mut self, identity: &str, session_id: &str) {
        let owned = self
            .entries
            .get(identity)
            .map_or(false, |sid| sid == session_id);
        if owned {
            self.entries.remove(identity);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_whitespace() {
        assert_eq!(IdentityRegistry::normalize("  pk a b \n"), "pkab");
        assert_eq!(IdentityRegistry::normalize("   "), "");
    }

    #[test]
    fn test_register_and_resolve() {
        let mut registry = IdentityRegistry::new();
        assert_eq!(
            registry.register("pk-a", "session-1"),
            Some("pk-a".to_string())
        );
        assert_eq!(registry.resolve("pk-a"), Some("session-1"));
        assert_eq!(registry.resolve(" pk-a "), Some("session-1"));
        assert_eq!(registry.resolve("pk-b"), None);
    }

    #[test]
    fn test_empty_identity_is_noop() {
        let mut registry = IdentityRegistry::new();
        assert_eq!(registry.register("   ", "session-1"), None);
        assert_eq!(registry.resolve(""), None);
    }

    #[test]
    fn test_last_registration_wins() {
        let mut registry = IdentityRegistry::new();
        registry.register("pk-a", "session-1");
        registry.register("pk-a", "session-2");
        assert_eq!(registry.resolve("pk-a"), Some("session-2"));
    }

    #[test]
    fn test_unregister_is_guarded() {
        let mut registry = IdentityRegistry::new();
        registry.register("pk-a", "session-1");
        registry.register("pk-a", "session-2");

        // Stale session disconnecting must not evict the newer mapping
        registry.unregister("pk-a", "session-1");
        assert_eq!(registry.resolve("pk-a"), Some("session-2"));

        registry.unregister("pk-a", "session-2");
        assert_eq!(registry.resolve("pk-a"), None);
    }
}
