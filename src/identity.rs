//! Identity resolution: source identifiers → Mattermost usernames.

use std::collections::BTreeMap;

use crate::config::ImportConfig;

/// Borrowing view over the config's `users` and `mentions` maps.
///
/// All lookups are infallible at the type level; a failed lookup returns
/// `None` and the caller decides whether that is a skip, a dropped span or
/// a pass-through.
#[derive(Debug, Clone, Copy)]
pub struct IdentityMap<'a> {
    users: &'a BTreeMap<String, String>,
    mentions: &'a BTreeMap<String, String>,
}

impl<'a> IdentityMap<'a> {
    /// Creates a view over the given maps.
    pub fn new(
        users: &'a BTreeMap<String, String>,
        mentions: &'a BTreeMap<String, String>,
    ) -> Self {
        Self { users, mentions }
    }

    /// Creates a view over a config's maps.
    pub fn from_config(config: &'a ImportConfig) -> Self {
        Self::new(&config.users, &config.mentions)
    }

    /// Resolves an author identifier (`user123456`) to a username.
    pub fn resolve_author(&self, from_id: &str) -> Option<&'a str> {
        self.users.get(from_id).map(String::as_str)
    }

    /// Resolves a numeric mention target, keyed as `user{id}`.
    pub fn resolve_user_id(&self, user_id: i64) -> Option<&'a str> {
        self.users.get(&format!("user{user_id}")).map(String::as_str)
    }

    /// Resolves bare mention text (leading `@` already stripped).
    pub fn resolve_mention(&self, text: &str) -> Option<&'a str> {
        self.mentions.get(text).map(String::as_str)
    }

    /// Returns `true` if a mentions mapping is configured at all.
    pub fn mentions_configured(&self) -> bool {
        !self.mentions.is_empty()
    }
}
