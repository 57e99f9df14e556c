//! The conversion pass: raw Telegram messages → Mattermost envelopes.
//!
//! One [`Converter`] drives a single run. The message list is first passed
//! through [`ThreadMap`] to resolve reply chains, then scanned again in
//! archive order: service records and thread descendants are skipped, and
//! every remaining message becomes a root envelope with its descendants
//! nested one level deep in `replies`.
//!
//! Per-record problems (unknown kind, unmapped author) are diagnostics and
//! skips; a missing `date` is a data-integrity defect that aborts the run.

use std::collections::BTreeSet;

use chrono::{NaiveDateTime, TimeZone};
use chrono_tz::Tz;

use crate::config::ImportConfig;
use crate::envelope::{Envelope, PostContent};
use crate::error::{MigrateError, Result};
use crate::export::{RawMessage, TelegramExport};
use crate::identity::IdentityMap;
use crate::markup::render_text;
use crate::report::Reporter;
use crate::threads::ThreadMap;

/// Where converted posts are imported to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    /// Direct conversation between the mapped users
    Direct {
        /// Mattermost usernames of all members
        members: Vec<String>,
    },

    /// Team/channel pair
    Channel { channel: String, team: String },
}

impl Destination {
    /// Derives the destination from the export's top-level kind tag.
    ///
    /// `personal_chat` exports become direct imports; every other kind is
    /// imported into the configured channel, which must then be present.
    pub fn for_export(export: &TelegramExport, config: &ImportConfig) -> Result<Self> {
        if export.is_direct() {
            return Ok(Destination::Direct {
                members: config.member_names(),
            });
        }
        let target = config.import_into.as_ref().ok_or_else(|| {
            MigrateError::invalid_config("Missing required field 'import_into' in config")
        })?;
        Ok(Destination::Channel {
            channel: target.channel.clone(),
            team: target.team.clone(),
        })
    }

    fn is_direct(&self) -> bool {
        matches!(self, Destination::Direct { .. })
    }
}

/// Maps a Telegram message kind to a Mattermost post kind.
///
/// Only content messages have a channel-mode mapping; in direct mode every
/// tagged record becomes a `direct_post`.
fn target_kind(kind: &str) -> Option<&'static str> {
    match kind {
        "message" => Some("post"),
        _ => None,
    }
}

/// The result of one conversion pass.
#[derive(Debug)]
pub struct Conversion {
    /// Root envelopes, in original archive order
    pub envelopes: Vec<Envelope>,

    /// Every attachment path referenced anywhere in the archive,
    /// deduplicated. Consumed by the packager.
    pub attachments: BTreeSet<String>,
}

impl Conversion {
    /// Serializes the conversion as import-file lines: version header
    /// first, then one record per envelope.
    pub fn jsonl_lines(&self) -> Result<Vec<String>> {
        let mut lines = Vec::with_capacity(self.envelopes.len() + 1);
        lines.push(crate::envelope::VERSION_HEADER.to_string());
        for envelope in &self.envelopes {
            lines.push(serde_json::to_string(envelope)?);
        }
        Ok(lines)
    }
}

/// Converts a Telegram export into Mattermost import envelopes.
///
/// Construction resolves the timezone and destination once; [`convert`]
/// (Self::convert) consumes the converter and yields the envelopes plus
/// the shared attachment set.
pub struct Converter<'a> {
    identities: IdentityMap<'a>,
    destination: Destination,
    tz: Tz,
    reporter: &'a dyn Reporter,
    attachments: BTreeSet<String>,
}

impl<'a> Converter<'a> {
    /// Creates a converter for one run.
    pub fn new(
        config: &'a ImportConfig,
        destination: Destination,
        reporter: &'a dyn Reporter,
    ) -> Result<Self> {
        Ok(Self {
            identities: IdentityMap::from_config(config),
            destination,
            tz: config.tz()?,
            reporter,
            attachments: BTreeSet::new(),
        })
    }

    /// Runs the full pass over an export's message list.
    pub fn convert(mut self, messages: &[RawMessage]) -> Result<Conversion> {
        let threads = ThreadMap::build(messages);
        let mut envelopes = Vec::new();

        for (idx, msg) in messages.iter().enumerate() {
            if msg.is_service() {
                continue;
            }
            if threads.is_descendant(idx) {
                // Emitted as a nested reply of its root instead.
                continue;
            }
            let Some(mut envelope) = self.transform_message(msg)? else {
                continue;
            };
            if let Some(root_id) = msg.id {
                self.attach_replies(&mut envelope, threads.descendants_of(root_id), messages)?;
            }
            envelopes.push(envelope);
        }

        Ok(Conversion {
            envelopes,
            attachments: self.attachments,
        })
    }

    /// Transforms one raw message, or skips it with a diagnostic.
    ///
    /// Skip conditions: no kind tag; kind without a target mapping (channel
    /// mode); author absent from the users map. A missing `date` is an
    /// error.
    fn transform_message(&mut self, msg: &RawMessage) -> Result<Option<Envelope>> {
        let Some(kind) = msg.kind.as_deref() else {
            return Ok(None);
        };
        if !self.destination.is_direct() && target_kind(kind).is_none() {
            self.reporter
                .warn(&format!("Unsupported message type: {kind}"));
            return Ok(None);
        }

        let author = msg
            .from_id
            .as_deref()
            .and_then(|from_id| self.identities.resolve_author(from_id));
        let Some(user) = author else {
            self.reporter.warn(&format!(
                "Unknown user ID {} not found in config users mapping. Message from {} with \
                 content '{}' will be skipped. Please update your users mapping in the \
                 configuration file.",
                msg.from_id.as_deref().unwrap_or("<missing>"),
                msg.date.as_deref().unwrap_or("unknown date"),
                msg.text.preview()
            ));
            return Ok(None);
        };

        let message = render_text(
            &msg.text,
            msg.sticker_emoji.as_deref(),
            self.identities,
            self.reporter,
        );

        let date = msg
            .date
            .as_deref()
            .ok_or(MigrateError::MissingTimestamp { id: msg.id })?;
        let create_at = self.epoch_millis(date)?;
        let edit_at = match msg.edited.as_deref() {
            Some(edited) => self.epoch_millis(edited)?,
            None => 0,
        };

        let mut content = PostContent {
            message,
            user: user.to_string(),
            create_at,
            edit_at,
            channel: None,
            team: None,
            channel_members: None,
            attachments: None,
            props: None,
            replies: None,
        };
        match &self.destination {
            Destination::Direct { members } => {
                content.channel_members = Some(members.clone());
            }
            Destination::Channel { channel, team } => {
                content.channel = Some(channel.clone());
                content.team = Some(team.clone());
            }
        }

        self.collect_attachments(msg, &mut content);

        Ok(Some(if self.destination.is_direct() {
            Envelope::DirectPost {
                id: msg.id,
                direct_post: content,
            }
        } else {
            Envelope::Post {
                id: msg.id,
                post: content,
            }
        }))
    }

    /// Records the message's attachment references on the envelope and in
    /// the shared set. Sticker files are excluded: stickers render as
    /// glyph text, not file attachments.
    fn collect_attachments(&mut self, msg: &RawMessage, content: &mut PostContent) {
        if let Some(photo) = &msg.photo {
            content.push_attachment(photo.clone());
            self.attachments.insert(photo.clone());
        }
        if let Some(file) = &msg.file {
            if msg.media_type.as_deref() != Some("sticker") {
                content.push_attachment(file.clone());
                self.attachments.insert(file.clone());
            }
        }
    }

    /// Transforms each descendant and nests it under the root, stripping
    /// destination metadata. A descendant that hits a skip condition is
    /// omitted with a diagnostic; the root still goes out.
    fn attach_replies(
        &mut self,
        root: &mut Envelope,
        descendants: &[usize],
        messages: &[RawMessage],
    ) -> Result<()> {
        if descendants.is_empty() {
            return Ok(());
        }
        let root_id = root.id();
        let mut replies = Vec::with_capacity(descendants.len());
        for &idx in descendants {
            let msg = &messages[idx];
            match self.transform_message(msg)? {
                Some(envelope) => {
                    let mut content = envelope.into_content();
                    content.strip_destination();
                    replies.push(content);
                }
                None => {
                    self.reporter.warn(&format!(
                        "Failed to transform reply {} for message {}",
                        msg.id.map_or_else(|| "<no id>".to_string(), |i| i.to_string()),
                        root_id.map_or_else(|| "<no id>".to_string(), |i| i.to_string()),
                    ));
                }
            }
        }
        root.content_mut().replies = Some(replies);
        Ok(())
    }

    /// Interprets a naive local timestamp in the configured zone and
    /// converts it to epoch milliseconds (truncating).
    fn epoch_millis(&self, raw: &str) -> Result<i64> {
        let invalid = || MigrateError::InvalidTimestamp {
            raw: raw.to_string(),
            zone: self.tz.name().to_string(),
        };
        let naive: NaiveDateTime = raw.parse().map_err(|_| invalid())?;
        let local = self
            .tz
            .from_local_datetime(&naive)
            .earliest()
            .ok_or_else(invalid)?;
        Ok(local.timestamp_millis())
    }
}
