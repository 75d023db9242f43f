use std::collections::BTreeMap;
use std::fmt::Display;

use serde::Serialize;

use crate::config::MessagesConfig;
use crate::model::EventKind;

use super::audience::Audience;
use super::preview::{MessageOverride, Preview};

/// Phrases per audience and event kind. Built-in English defaults, any of
/// which can be replaced from configuration.
#[derive(Debug, Clone, Default)]
pub struct MessageTable {
    notifications: BTreeMap<EventKind, String>,
    activities: BTreeMap<EventKind, String>,
    post_sharing: Option<String>,
}

impl MessageTable {
    pub fn from_config(config: &MessagesConfig) -> MessageTable {
        MessageTable {
            notifications: config.notifications.clone(),
            activities: config.activities.clone(),
            post_sharing: config.post_sharing.clone(),
        }
    }
    pub fn set(&mut self, audience: Audience, kind: EventKind, text: impl Into<String>) {
        let table = match audience {
            Audience::Notifications => &mut self.notifications,
            Audience::Activities => &mut self.activities,
        };
        table.insert(kind, text.into());
    }
    /// An override from the resolver always wins over the audience table.
    pub fn template(
        &self,
        audience: Audience,
        kind: EventKind,
        message_override: Option<MessageOverride>,
    ) -> &str {
        if let Some(MessageOverride::PostSharing) = message_override {
            return self.post_sharing.as_deref().unwrap_or("shared post");
        }
        let table = match audience {
            Audience::Notifications => &self.notifications,
            Audience::Activities => &self.activities,
        };
        table
            .get(&kind)
            .map(String::as_str)
            .unwrap_or_else(|| default_text(audience, kind))
    }
}

fn default_text(audience: Audience, kind: EventKind) -> &'static str {
    match audience {
        Audience::Notifications => match kind {
            EventKind::SpaceFollowed => "followed your space",
            EventKind::SpaceCreated => "created a new space",
            EventKind::CommentCreated => "commented on your post",
            EventKind::CommentReplyCreated => "replied to your comment on",
            EventKind::PostShared => "shared your post",
            EventKind::CommentShared => "shared your comment on",
            EventKind::PostReactionCreated => "reacted to your post",
            EventKind::CommentReactionCreated => "reacted to your comment on",
            EventKind::PostCreated => "created a new post",
        },
        Audience::Activities => match kind {
            EventKind::SpaceFollowed => "followed space",
            EventKind::SpaceCreated => "created space",
            EventKind::CommentCreated => "commented on post",
            EventKind::CommentReplyCreated => "replied to a comment on",
            EventKind::PostShared => "shared post",
            EventKind::CommentShared => "shared a comment on",
            EventKind::PostReactionCreated => "reacted to post",
            EventKind::CommentReactionCreated => "reacted to a comment on",
            EventKind::PostCreated => "created post",
        },
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aggregation: Option<String>,
    pub text: String,
    pub preview: Option<Preview>,
}

impl Display for Message {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let preview = self.preview.as_ref().map(Preview::label);
        let parts = [self.aggregation.as_deref(), Some(self.text.as_str()), preview];
        let mut first = true;
        for part in parts.into_iter().flatten().filter(|p| !p.is_empty()) {
            if !first {
                f.write_str(" ")?;
            }
            f.write_str(part)?;
            first = false;
        }
        Ok(())
    }
}

pub fn aggregation_phrase(count: u64) -> String {
    if count == 1 {
        return "and 1 other person".to_string();
    }
    format!("and {count} other people")
}

/// Only notifications about the viewer's own content collapse other actors
/// into an aggregation phrase.
pub fn compose(
    template: &str,
    agg_count: u64,
    audience: Audience,
    preview: Option<Preview>,
) -> Message {
    let aggregation = match audience {
        Audience::Notifications if agg_count > 0 => Some(aggregation_phrase(agg_count)),
        _ => None,
    };
    Message {
        aggregation,
        text: template.to_string(),
        preview,
    }
}
