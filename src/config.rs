//! Import configuration loading and validation.
//!
//! A conversion run is driven by a `config.toml` placed next to the
//! Telegram export:
//!
//! ```toml
//! timezone = "Europe/Zurich"
//!
//! [users]
//! user123 = "abc"
//! user456 = "def"
//!
//! [mentions]
//! "a.b.cexample" = "abc"
//!
//! [import_into]
//! team = "example"
//! channel = "town square"
//! ```
//!
//! `users` maps Telegram `from_id` values to Mattermost usernames and is
//! always required. `import_into` names the destination channel and is
//! required unless the import is a direct chat. The timezone is the zone
//! the export's naive timestamps were written in; it must be a valid IANA
//! name.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::{MigrateError, Result};

/// Default name of the configuration file inside the input directory.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Kind of Mattermost import this config describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatType {
    /// Direct conversation between the mapped users.
    #[default]
    DirectChat,

    /// Import into a named team/channel pair.
    Channel,
}

/// Destination channel for non-direct imports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportTarget {
    /// Mattermost team name
    pub team: String,
    /// Mattermost channel name
    pub channel: String,
}

/// Settings for one conversion run.
///
/// Loaded from `config.toml` in the input directory and validated once
/// with [`ImportConfig::validate`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportConfig {
    /// Kind of import (default: direct chat).
    #[serde(default)]
    pub chat_type: ChatType,

    /// Telegram `from_id` → Mattermost username.
    ///
    /// A `BTreeMap` so derived lists (direct-chat members) come out in a
    /// deterministic order.
    pub users: BTreeMap<String, String>,

    /// Bare mention text → Mattermost username.
    ///
    /// Empty means mention remapping is not configured and `mention` spans
    /// pass through verbatim.
    #[serde(default)]
    pub mentions: BTreeMap<String, String>,

    /// Destination team/channel. Required unless `chat_type` is
    /// `direct_chat`.
    #[serde(default)]
    pub import_into: Option<ImportTarget>,

    /// IANA zone the export's naive timestamps belong to.
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

fn default_timezone() -> String {
    "UTC".to_string()
}

impl ImportConfig {
    /// Loads and validates a configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        let config: ImportConfig = toml::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the rules the converter relies on.
    ///
    /// - `users` must be non-empty
    /// - non-direct imports must name an `import_into` target
    /// - `timezone` must be a known IANA name
    pub fn validate(&self) -> Result<()> {
        if self.users.is_empty() {
            return Err(MigrateError::invalid_config(
                "Missing required field 'users' in config",
            ));
        }
        if self.chat_type != ChatType::DirectChat && self.import_into.is_none() {
            return Err(MigrateError::invalid_config(
                "Missing required field 'import_into' in config",
            ));
        }
        self.tz()?;
        Ok(())
    }

    /// Parses the configured timezone.
    pub fn tz(&self) -> Result<Tz> {
        Tz::from_str(&self.timezone)
            .map_err(|_| MigrateError::invalid_timezone(self.timezone.clone()))
    }

    /// Usernames of all mapped users, in deterministic order.
    ///
    /// Used as the member list of a direct-chat import.
    pub fn member_names(&self) -> Vec<String> {
        self.users.values().cloned().collect()
    }
}
