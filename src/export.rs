//! Raw Telegram export data model.
//!
//! Telegram Desktop's "Export Chat History" feature produces a
//! `result.json` with a top-level `type` tag and a flat `messages` array.
//! Message records are open-ended dictionaries; this module pins them down
//! to a struct with explicit optional fields, validated once at load time.
//!
//! The `text` field is the awkward one: it is either a plain string or an
//! array mixing bare strings with `{type, text, ...}` formatting entities.
//! [`Span`] models that as an untagged enum with a malformed-catchall
//! variant, so a broken entity never fails deserialization of the whole
//! archive — it is dropped later with a diagnostic when the text is
//! rendered.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use serde_json::Value;

use crate::error::{MigrateError, Result};

/// File name of the Telegram export inside the input directory.
pub const EXPORT_FILE_NAME: &str = "result.json";

/// One formatting entity from a rich-text span array.
///
/// Telegram guarantees `type` and `text`; `user_id` is only present on
/// `mention_name` entities.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SpanEntity {
    /// Entity kind tag, e.g. `bold`, `pre`, `mention_name`
    #[serde(rename = "type")]
    pub kind: String,
    /// The covered text
    pub text: String,
    /// Mentioned numeric user id (only for `mention_name`)
    #[serde(default)]
    pub user_id: Option<i64>,
}

/// One element of a rich-text span array.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Span {
    /// Bare string, emitted verbatim
    Plain(String),
    /// Tagged formatting entity
    Entity(SpanEntity),
    /// Anything that doesn't fit the above (entity missing `type` or
    /// `text`, stray numbers). Dropped with a diagnostic at render time.
    Malformed(Value),
}

/// The `text` field of a raw message.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum TextField {
    /// Plain string content
    Plain(String),
    /// Rich-text span sequence
    Rich(Vec<Span>),
}

impl Default for TextField {
    fn default() -> Self {
        TextField::Plain(String::new())
    }
}

impl TextField {
    /// Short single-line preview for diagnostics.
    pub fn preview(&self) -> String {
        match self {
            TextField::Plain(s) if s.is_empty() => "[no text]".to_string(),
            TextField::Plain(s) => s.clone(),
            TextField::Rich(_) => "[formatted text]".to_string(),
        }
    }
}

/// One record of the export's flat message list.
///
/// Every field except the implicit list position is optional; the
/// converter decides per record whether a missing field is a skip, a
/// diagnostic, or a hard error.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawMessage {
    /// Message id, unique within the archive. Records without one can
    /// never receive replies.
    #[serde(default)]
    pub id: Option<i64>,

    /// Record kind tag (`message`, `service`, ...)
    #[serde(rename = "type", default)]
    pub kind: Option<String>,

    /// Author display name
    #[serde(default)]
    pub from: Option<String>,

    /// Author identifier, e.g. `user123456`
    #[serde(default)]
    pub from_id: Option<String>,

    /// Naive local ISO-8601 timestamp, e.g. `2022-03-15T06:06:11`
    #[serde(default)]
    pub date: Option<String>,

    /// Naive local edit timestamp, if the message was edited
    #[serde(default)]
    pub edited: Option<String>,

    /// Message content
    #[serde(default)]
    pub text: TextField,

    /// Id of the message this one replies to
    #[serde(default)]
    pub reply_to_message_id: Option<i64>,

    /// Photo attachment path, relative to the export directory
    #[serde(default)]
    pub photo: Option<String>,

    /// Generic file attachment path, relative to the export directory
    #[serde(default)]
    pub file: Option<String>,

    /// Media kind of a file attachment (`sticker`, `voice_message`, ...)
    #[serde(default)]
    pub media_type: Option<String>,

    /// Sticker glyph used as message text when `text` is empty
    #[serde(default)]
    pub sticker_emoji: Option<String>,
}

impl RawMessage {
    /// Returns `true` for non-content records (pins, joins, ...).
    pub fn is_service(&self) -> bool {
        self.kind.as_deref() == Some("service")
    }
}

/// A parsed Telegram export.
#[derive(Debug, Clone, Deserialize)]
pub struct TelegramExport {
    /// Chat kind tag (`personal_chat`, `private_supergroup`, ...).
    /// Selects direct vs. channel destination mode.
    #[serde(rename = "type")]
    pub kind: String,

    /// Chat display name
    #[serde(default)]
    pub name: Option<String>,

    /// Chat id
    #[serde(default)]
    pub id: Option<i64>,

    /// Flat, insertion-ordered message list
    pub messages: Vec<RawMessage>,
}

impl TelegramExport {
    /// Returns `true` if this export is a direct (person-to-person) chat.
    pub fn is_direct(&self) -> bool {
        self.kind == "personal_chat"
    }
}

/// Loads and structurally validates a Telegram export file.
///
/// A file that is not JSON, or lacks the top-level `type`/`messages`
/// fields, is rejected with [`MigrateError::InvalidExport`].
pub fn load_export(path: &Path) -> Result<TelegramExport> {
    let raw = fs::read_to_string(path)?;
    serde_json::from_str(&raw)
        .map_err(|e| MigrateError::invalid_export(e.to_string(), Some(path.to_path_buf())))
}

/// Validates that an input directory holds everything a run needs.
///
/// Checks for the directory itself, the config file and the export file.
/// The export's structure is checked later by [`load_export`].
pub fn validate_input_dir(input_dir: &Path, config_file: &str) -> Result<()> {
    if !input_dir.is_dir() {
        return Err(MigrateError::invalid_input_dir(format!(
            "Input directory does not exist: {}",
            input_dir.display()
        )));
    }

    let config_path = input_dir.join(config_file);
    if !config_path.exists() {
        return Err(MigrateError::invalid_input_dir(format!(
            "Config file not found: {}. Please create a {config_file} file in the input directory.",
            config_path.display()
        )));
    }

    let export_path = input_dir.join(EXPORT_FILE_NAME);
    if !export_path.exists() {
        return Err(MigrateError::invalid_input_dir(format!(
            "Telegram export file not found: {}. The input directory must contain a chat export \
             created with Telegram Desktop's 'Export Chat History' feature.",
            export_path.display()
        )));
    }

    Ok(())
}
