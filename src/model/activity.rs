use std::fmt::Display;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::warn;

use super::entity::AccountId;

/// One event record from the feed service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    pub account: AccountId,
    pub event: Event,
    pub date: String,
    #[serde(default, deserialize_with = "raw_id", skip_serializing_if = "Option::is_none")]
    pub space_id: Option<String>,
    #[serde(default, deserialize_with = "raw_id", skip_serializing_if = "Option::is_none")]
    pub post_id: Option<String>,
    #[serde(default, deserialize_with = "raw_id", skip_serializing_if = "Option::is_none")]
    pub comment_id: Option<String>,
    #[serde(default)]
    pub agg_count: u64,
}

/// Event name as received. Names this build does not know still parse, so a
/// single unfamiliar record cannot fail a whole page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Event {
    Known(EventKind),
    Unknown(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EventKind {
    SpaceFollowed,
    SpaceCreated,
    CommentCreated,
    CommentReplyCreated,
    PostShared,
    CommentShared,
    PostReactionCreated,
    CommentReactionCreated,
    PostCreated,
}

impl EventKind {
    pub const ALL: [EventKind; 9] = [
        EventKind::SpaceFollowed,
        EventKind::SpaceCreated,
        EventKind::CommentCreated,
        EventKind::CommentReplyCreated,
        EventKind::PostShared,
        EventKind::CommentShared,
        EventKind::PostReactionCreated,
        EventKind::CommentReactionCreated,
        EventKind::PostCreated,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            EventKind::SpaceFollowed => "SpaceFollowed",
            EventKind::SpaceCreated => "SpaceCreated",
            EventKind::CommentCreated => "CommentCreated",
            EventKind::CommentReplyCreated => "CommentReplyCreated",
            EventKind::PostShared => "PostShared",
            EventKind::CommentShared => "CommentShared",
            EventKind::PostReactionCreated => "PostReactionCreated",
            EventKind::CommentReactionCreated => "CommentReactionCreated",
            EventKind::PostCreated => "PostCreated",
        }
    }
}

impl Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<EventKind> for Event {
    fn from(value: EventKind) -> Self {
        Event::Known(value)
    }
}

impl Activity {
    /// Decode a page of raw records one at a time, skipping the ones that do
    /// not decode.
    pub fn from_page(records: Vec<Value>) -> Vec<Activity> {
        records
            .into_iter()
            .enumerate()
            .filter_map(|(index, record)| match serde_json::from_value(record) {
                Ok(activity) => Some(activity),
                Err(error) => {
                    warn!(target: "feed", index, %error, "skipping malformed activity record");
                    None
                }
            })
            .collect()
    }
}

/// Any JSON scalar is kept as text; validation happens at dispatch.
fn raw_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(text)) => Ok(Some(text)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(Value::Bool(b)) => Ok(Some(b.to_string())),
        Some(other) => Err(D::Error::custom(format!("expected an id, found {other}"))),
    }
}

#[cfg(test)]
mod tests {
    use anyhow::Result;
    use serde_json::json;

    use super::{Activity, Event, EventKind};

    #[test]
    fn parse_feed_record() -> Result<()> {
        let activity: Activity = serde_json::from_value(json!({
            "account": "3osmnRNnrcScHsgkTJH1xyBF5kGjpbWHsGrqM31BDbF9ysZV",
            "event": "CommentCreated",
            "date": "2020-06-10T09:21:51.526Z",
            "post_id": "12",
            "comment_id": 13,
            "agg_count": 2
        }))?;
        assert_eq!(activity.event, Event::Known(EventKind::CommentCreated));
        assert_eq!(activity.comment_id.as_deref(), Some("13"));
        assert_eq!(activity.space_id, None);
        assert_eq!(activity.agg_count, 2);
        Ok(())
    }

    #[test]
    fn unknown_event_still_parses() -> Result<()> {
        let activity: Activity = serde_json::from_value(json!({
            "account": "a",
            "event": "AccountFollowed",
            "date": "2020-06-10T09:21:51Z",
            "space_id": null
        }))?;
        assert_eq!(activity.event, Event::Unknown("AccountFollowed".into()));
        assert_eq!(activity.agg_count, 0);
        Ok(())
    }

    #[test]
    fn scalar_ids_are_kept_as_text() -> Result<()> {
        let activity: Activity = serde_json::from_value(json!({
            "account": "a",
            "event": "PostCreated",
            "date": "2020-06-10T09:21:51Z",
            "space_id": true,
            "post_id": -1,
            "comment_id": 1.5
        }))?;
        assert_eq!(activity.space_id.as_deref(), Some("true"));
        assert_eq!(activity.post_id.as_deref(), Some("-1"));
        assert_eq!(activity.comment_id.as_deref(), Some("1.5"));
        Ok(())
    }

    #[test]
    fn page_skips_undecodable_records() {
        let page = vec![
            json!({ "account": "a", "event": "PostCreated", "date": "d", "post_id": "1" }),
            json!({ "account": "b", "event": "PostCreated", "date": "d", "agg_count": -4 }),
            json!({ "account": "c", "event": "PostCreated" }),
            json!({ "account": "d", "event": "PostCreated", "date": "d", "post_id": [1] }),
            json!({ "account": "e", "event": "PostCreated", "date": "d", "post_id": -1 }),
        ];
        let activities = Activity::from_page(page);
        let accounts: Vec<_> = activities.iter().map(|a| a.account.to_string()).collect();
        assert_eq!(accounts, ["a", "e"]);
        assert_eq!(activities[1].post_id.as_deref(), Some("-1"));
    }

    #[test]
    fn event_names_match_wire_names() -> Result<()> {
        for kind in EventKind::ALL {
            let parsed: EventKind = serde_json::from_value(json!(kind.as_str()))?;
            assert_eq!(parsed, kind);
        }
        Ok(())
    }
}
