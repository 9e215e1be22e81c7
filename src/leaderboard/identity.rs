//! Leaderboard domain: identity keys and display-name resolution.

use bevy::log::warn;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use crate::leaderboard::services::IdentityResolver;

/// Label for entries submitted without an identity.
pub const ANONYMOUS_PLAYER_ID: &str = "Anonymous";

const IDENTITY_KEY_LEN: usize = 66;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub name: String,
    pub identity_key: String,
}

/// Short form of an identity key for display: keys longer than 12
/// characters keep their first 6 followed by "...".
pub fn shorten_identity_key(key: &str) -> String {
    if key.chars().count() <= 12 {
        return key.to_string();
    }
    let prefix: String = key.chars().take(6).collect();
    format!("{}...", prefix)
}

/// A compressed public key: 66 hex characters.
pub fn is_likely_identity_key(value: &str) -> bool {
    value.len() == IDENTITY_KEY_LEN && value.bytes().all(|b| b.is_ascii_hexdigit())
}

/// Caller-side cache in front of an [`IdentityResolver`]. Misses and
/// failures are cached too, so each key is looked up at most once.
pub struct IdentityCache {
    resolver: Arc<dyn IdentityResolver>,
    cache: Mutex<HashMap<String, Option<Identity>>>,
}

impl IdentityCache {
    pub fn new(resolver: Arc<dyn IdentityResolver>) -> Self {
        Self {
            resolver,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Resolve `key` to its first identity. Strings that are not identity
    /// keys resolve to `None` without a lookup.
    pub fn resolve(&self, key: &str) -> Option<Identity> {
        if !is_likely_identity_key(key) {
            return None;
        }

        if let Some(cached) = self
            .cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
        {
            return cached.clone();
        }

        let resolved = match self.resolver.resolve_by_identity_key(key) {
            Ok(identities) => identities.into_iter().next(),
            Err(e) => {
                warn!("Identity lookup for {} failed: {}", shorten_identity_key(key), e);
                None
            }
        };

        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), resolved.clone());
        resolved
    }

    /// Resolved name if there is one, else the shortened id, else anonymous.
    pub fn display_label(&self, player_id: Option<&str>) -> String {
        match player_id {
            None => ANONYMOUS_PLAYER_ID.to_string(),
            Some(key) => self
                .resolve(key)
                .map(|identity| identity.name)
                .unwrap_or_else(|| shorten_identity_key(key)),
        }
    }
}

/// Label shown before a name lookup completes.
pub fn fallback_label(player_id: Option<&str>) -> String {
    player_id
        .map(shorten_identity_key)
        .unwrap_or_else(|| ANONYMOUS_PLAYER_ID.to_string())
}
