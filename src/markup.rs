//! Telegram rich-text spans → Mattermost markdown.
//!
//! The transformation is a fixed, order-independent rule table over the
//! span kind; a message's rendered text is the ordered concatenation of
//! each span's fragment. Unsupported and malformed spans contribute
//! nothing and are reported through the injected
//! [`Reporter`](crate::report::Reporter); they never fail a message.

use crate::export::{Span, SpanEntity, TextField};
use crate::identity::IdentityMap;
use crate::report::Reporter;

/// Span kinds whose text passes through unchanged.
const PLAIN_TEXT_KINDS: &[&str] = &[
    "link",
    "bot_command",
    "email",
    "text_link",
    "phone",
    "hashtag",
    "cashtag",
    "bank_card",
];

/// Renders a message's content to Mattermost markdown.
///
/// A message whose content is an empty plain string but which carries a
/// sticker glyph renders as that glyph.
pub fn render_text(
    text: &TextField,
    sticker_emoji: Option<&str>,
    identities: IdentityMap<'_>,
    reporter: &dyn Reporter,
) -> String {
    match text {
        TextField::Plain(s) if s.is_empty() => sticker_emoji.unwrap_or_default().to_string(),
        TextField::Plain(s) => s.clone(),
        TextField::Rich(spans) => spans
            .iter()
            .map(|span| render_span(span, identities, reporter))
            .collect(),
    }
}

/// Renders one span to a markdown fragment.
///
/// Returns an empty string for dropped spans (unsupported kind, malformed
/// element, unresolvable mention target).
pub fn render_span(span: &Span, identities: IdentityMap<'_>, reporter: &dyn Reporter) -> String {
    match span {
        Span::Plain(s) => s.clone(),
        Span::Entity(entity) => render_entity(entity, identities, reporter),
        Span::Malformed(value) => {
            reporter.warn(&format!(
                "Skipping text element missing required fields: {value}"
            ));
            String::new()
        }
    }
}

fn render_entity(
    entity: &SpanEntity,
    identities: IdentityMap<'_>,
    reporter: &dyn Reporter,
) -> String {
    let text = &entity.text;
    match entity.kind.as_str() {
        kind if PLAIN_TEXT_KINDS.contains(&kind) => text.clone(),
        "code" => format!("`{text}`"),
        "bold" => format!("**{text}**"),
        "italic" => format!("_{text}_"),
        "underline" => format!("**_{text}_**"),
        "strikethrough" => format!("~~{text}~~"),
        "pre" => format!("\n```\n{text}\n```\n"),
        "blockquote" => format!("\n> {text}\n"),
        "mention_name" => render_mention_name(entity, identities, reporter),
        "mention" => render_mention(text, identities, reporter),
        other => {
            reporter.warn(&format!("Unsupported text element type: {other}"));
            String::new()
        }
    }
}

/// `mention_name` spans reference a user by numeric id, keyed `user{id}`
/// in the users map. Unresolvable targets are dropped; the message itself
/// still goes through.
fn render_mention_name(
    entity: &SpanEntity,
    identities: IdentityMap<'_>,
    reporter: &dyn Reporter,
) -> String {
    let Some(user_id) = entity.user_id else {
        reporter.warn("mention_name element missing user_id");
        return String::new();
    };
    match identities.resolve_user_id(user_id) {
        Some(name) => format!("@{name}"),
        None => {
            reporter.warn(&format!("Unknown user ID in mention: user{user_id}"));
            String::new()
        }
    }
}

/// `mention` spans carry literal `@name` text. With a configured mentions
/// map the name is remapped; otherwise the text passes through verbatim.
fn render_mention(text: &str, identities: IdentityMap<'_>, reporter: &dyn Reporter) -> String {
    if !identities.mentions_configured() {
        return text.to_string();
    }
    let bare = text.trim_start_matches('@');
    match identities.resolve_mention(bare) {
        Some(mapped) => format!("@{mapped}"),
        None => {
            reporter.debug(&format!("No mapping found for mention: {text}"));
            text.to_string()
        }
    }
}
