//! Optional plain-text rendering of the conversation.
//!
//! Produced alongside the import archive when the user asks for it, as a
//! human-readable record that needs no Mattermost instance to open.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use chrono::NaiveDateTime;

use crate::error::{MigrateError, Result};
use crate::export::RawMessage;
use crate::identity::IdentityMap;
use crate::markup::render_text;
use crate::report::Reporter;

const LEGEND: &str = "\
CONVERSATION LOG LEGEND
----------------------
Message format: [timestamp] @username: message
Reply format: Messages starting with '>' quote the message being replied to
Attachments: Indicated in brackets with type and filename
  [PHOTO: sunset.jpg]
  [FILE: report.pdf]
----------------------

";

/// Writes a text-only log of the conversation to `path`.
///
/// Messages appear in archive order. Service records, messages from unmapped
/// authors, and messages that render to nothing are skipped. A reply quotes
/// the first line of the message it replies to, attributed to that message's
/// author.
pub fn write_conversation_log(
    path: &Path,
    messages: &[RawMessage],
    identities: IdentityMap<'_>,
    reporter: &dyn Reporter,
) -> Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    out.write_all(LEGEND.as_bytes())?;

    // First line of each logged message, keyed by id, for reply quoting.
    let mut quotable: HashMap<i64, (String, String)> = HashMap::new();

    for msg in messages {
        if msg.is_service() {
            continue;
        }
        let Some(username) = msg
            .from_id
            .as_deref()
            .and_then(|from_id| identities.resolve_author(from_id))
        else {
            continue;
        };

        let mut text = render_message_text(msg, identities, reporter);
        if text.is_empty() {
            continue;
        }

        if let Some(id) = msg.id {
            let first_line = text.lines().next().unwrap_or_default().to_string();
            quotable.insert(id, (username.to_string(), first_line));
        }

        if let Some(parent_id) = msg.reply_to_message_id {
            if let Some((author, first_line)) = quotable.get(&parent_id) {
                text = format!("> @{author}: {first_line}\n{text}");
            }
        }

        let timestamp = format_timestamp(msg)?;
        writeln!(out, "[{timestamp}] @{username}:\n{text}\n")?;
    }

    out.flush()?;
    Ok(())
}

/// Renders the message body plus attachment markers, newline-separated.
fn render_message_text(
    msg: &RawMessage,
    identities: IdentityMap<'_>,
    reporter: &dyn Reporter,
) -> String {
    let mut pieces = Vec::new();

    let body = render_text(&msg.text, msg.sticker_emoji.as_deref(), identities, reporter);
    if !body.is_empty() {
        pieces.push(body);
    }

    if let Some(file) = &msg.file {
        if msg.media_type.as_deref() != Some("sticker") {
            pieces.push(format!("[FILE: {}]", base_name(file)));
        }
    }
    if let Some(photo) = &msg.photo {
        pieces.push(format!("[PHOTO: {}]", base_name(photo)));
    }

    pieces.join("\n")
}

fn base_name(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}

fn format_timestamp(msg: &RawMessage) -> Result<String> {
    let date = msg
        .date
        .as_deref()
        .ok_or(MigrateError::MissingTimestamp { id: msg.id })?;
    let naive: NaiveDateTime = date.parse().map_err(|_| MigrateError::InvalidTimestamp {
        raw: date.to_string(),
        zone: "local".to_string(),
    })?;
    Ok(naive.format("%Y-%m-%d %H:%M:%S").to_string())
}
