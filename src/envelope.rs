//! Mattermost bulk-import output model.
//!
//! The import format is JSONL: a version header line followed by one
//! record per post. A root post carries its destination (channel/team for
//! channel imports, the member list for direct chats) and a flat
//! `replies` list; nested replies omit the destination since they inherit
//! it from the root.

use serde::Serialize;

/// First line of every import file.
pub const VERSION_HEADER: &str = r#"{"type":"version","version":1}"#;

/// Attachment reference inside a post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attachment {
    /// Path relative to the archive's `data/` directory
    pub path: String,
}

/// Mattermost `props` block accompanying attachments.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Props {
    pub attachments: Vec<Attachment>,
}

/// The body shared by root posts and nested replies.
///
/// Optional fields are omitted from JSON when absent; nested replies have
/// their `channel`/`team` stripped before serialization.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostContent {
    /// Rendered markdown text
    pub message: String,

    /// Resolved Mattermost username of the author
    pub user: String,

    /// Creation time, epoch milliseconds
    pub create_at: i64,

    /// Edit time, epoch milliseconds; 0 when never edited
    pub edit_at: i64,

    /// Destination channel (channel imports, root posts only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,

    /// Destination team (channel imports, root posts only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team: Option<String>,

    /// Conversation members (direct imports only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel_members: Option<Vec<String>>,

    /// Attachment references belonging to this post alone
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attachments: Option<Vec<Attachment>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub props: Option<Props>,

    /// Nested replies, exactly one structural level deep
    #[serde(skip_serializing_if = "Option::is_none")]
    pub replies: Option<Vec<PostContent>>,
}

impl PostContent {
    /// Records an attachment on this post.
    pub fn push_attachment(&mut self, path: impl Into<String>) {
        self.attachments
            .get_or_insert_with(Vec::new)
            .push(Attachment { path: path.into() });
        self.props.get_or_insert_with(Props::default);
    }

    /// Removes destination metadata; replies inherit it from their root.
    pub fn strip_destination(&mut self) {
        self.channel = None;
        self.team = None;
        self.channel_members = None;
    }
}

/// One serialized output record: a root post of either destination kind.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum Envelope {
    /// Post into a team/channel pair
    #[serde(rename = "post")]
    Post {
        #[serde(skip_serializing_if = "Option::is_none")]
        id: Option<i64>,
        post: PostContent,
    },

    /// Post into a direct conversation
    #[serde(rename = "direct_post")]
    DirectPost {
        #[serde(skip_serializing_if = "Option::is_none")]
        id: Option<i64>,
        direct_post: PostContent,
    },
}

impl Envelope {
    /// The post body, regardless of destination kind.
    pub fn content(&self) -> &PostContent {
        match self {
            Envelope::Post { post, .. } => post,
            Envelope::DirectPost { direct_post, .. } => direct_post,
        }
    }

    /// Mutable access to the post body.
    pub fn content_mut(&mut self) -> &mut PostContent {
        match self {
            Envelope::Post { post, .. } => post,
            Envelope::DirectPost { direct_post, .. } => direct_post,
        }
    }

    /// Consumes the envelope, yielding its body.
    pub fn into_content(self) -> PostContent {
        match self {
            Envelope::Post { post, .. } => post,
            Envelope::DirectPost { direct_post, .. } => direct_post,
        }
    }

    /// Original Telegram message id, if the record had one.
    pub fn id(&self) -> Option<i64> {
        match self {
            Envelope::Post { id, .. } | Envelope::DirectPost { id, .. } => *id,
        }
    }
}
