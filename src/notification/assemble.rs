use anyhow::{Context, Result};
use jiff::Timestamp;
use jiff::civil::DateTime;
use jiff::fmt::strtime;
use jiff::tz::TimeZone;
use serde::Serialize;
use tracing::{debug, warn};

use crate::config::{MessagesConfig, RenderConfig};
use crate::model::{AccountId, Activity, Profile};
use crate::store::{EntityStore, MemoStore};

use super::audience::route;
use super::dispatch::dispatch;
use super::error::Unrenderable;
use super::link::Link;
use super::message::{Message, MessageTable, compose};
use super::preview::PreviewResolver;

/// A feed entry ready for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    /// The account that performed the activity.
    pub address: AccountId,
    pub message: Message,
    /// Formatted activity date.
    pub details: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<Profile>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub link: Link,
}

/// Turns activities into notifications against an already filled store.
///
/// Holds no state between calls: the viewer is passed in, and lookups are
/// memoized only for the duration of one batch.
#[derive(Debug, Clone)]
pub struct NotificationResolver {
    messages: MessageTable,
    time_zone: TimeZone,
    date_format: String,
    summarize_limit: usize,
    max_share_hops: usize,
}

impl Default for NotificationResolver {
    fn default() -> Self {
        let render = RenderConfig::default();
        NotificationResolver {
            messages: MessageTable::default(),
            time_zone: TimeZone::UTC,
            date_format: render.date_format,
            summarize_limit: render.summarize_limit,
            max_share_hops: render.max_share_hops,
        }
    }
}

impl NotificationResolver {
    pub fn new(render: &RenderConfig, messages: &MessagesConfig) -> Result<NotificationResolver> {
        let time_zone = TimeZone::get(&render.time_zone)
            .with_context(|| format!("unknown time zone {:?}", render.time_zone))?;
        Ok(NotificationResolver {
            messages: MessageTable::from_config(messages),
            time_zone,
            date_format: render.date_format.clone(),
            summarize_limit: render.summarize_limit,
            max_share_hops: render.max_share_hops,
        })
    }

    pub fn with_messages(mut self, messages: MessageTable) -> Self {
        self.messages = messages;
        self
    }

    /// Resolve one activity, or say why it cannot be shown.
    pub fn resolve_activity<S: EntityStore + ?Sized>(
        &self,
        activity: &Activity,
        store: &S,
        viewer: Option<&AccountId>,
    ) -> Result<Notification, Unrenderable> {
        let (kind, subject) = dispatch(activity)?;
        let resolver = PreviewResolver::new(store, self.summarize_limit, self.max_share_hops);
        let resolved = resolver.resolve(&subject)?;

        let owner = match store.profile(&activity.account) {
            Ok(profile) => profile,
            Err(error) => {
                warn!(target: "resolve", account = %activity.account, %error, "profile lookup failed");
                None
            }
        };
        let details = self.format_date(&activity.date);

        let audience = route(viewer, &resolved.owner);
        let template = self
            .messages
            .template(audience, kind, resolved.message_override);
        let message = compose(template, activity.agg_count, audience, resolved.preview);

        Ok(Notification {
            address: activity.account.clone(),
            message,
            details,
            owner,
            image: resolved.image,
            link: resolved.link,
        })
    }

    /// Resolve a page of activities. Items that cannot be shown are logged
    /// and left out; the rest keep their relative order.
    pub fn resolve_batch<S: EntityStore + ?Sized>(
        &self,
        activities: &[Activity],
        store: &S,
        viewer: Option<&AccountId>,
    ) -> Vec<Notification> {
        let store = MemoStore::new(store);
        activities
            .iter()
            .enumerate()
            .filter_map(|(index, activity)| {
                match self.resolve_activity(activity, &store, viewer) {
                    Ok(notification) => Some(notification),
                    Err(error) if error.is_routine() => {
                        debug!(target: "resolve", index, %error, "activity dropped");
                        None
                    }
                    Err(error) => {
                        warn!(target: "resolve", index, %error, "activity dropped");
                        None
                    }
                }
            })
            .collect()
    }

    pub fn format_date(&self, raw: &str) -> String {
        let Some(timestamp) = parse_date(raw) else {
            warn!(target: "resolve", date = raw, "unparseable activity date");
            return raw.to_string();
        };
        let zoned = timestamp.to_zoned(self.time_zone.clone());
        match strtime::format(&self.date_format, &zoned) {
            Ok(formatted) => formatted,
            Err(error) => {
                warn!(target: "resolve", format = %self.date_format, %error, "bad date format");
                raw.to_string()
            }
        }
    }
}

/// Feed dates are RFC 3339 most of the time, sometimes without an offset
/// (taken as UTC), sometimes epoch milliseconds.
fn parse_date(raw: &str) -> Option<Timestamp> {
    let raw = raw.trim();
    if let Ok(timestamp) = raw.parse::<Timestamp>() {
        return Some(timestamp);
    }
    if let Ok(datetime) = raw.parse::<DateTime>() {
        return datetime
            .to_zoned(TimeZone::UTC)
            .ok()
            .map(|zoned| zoned.timestamp());
    }
    if !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_digit()) {
        return raw
            .parse::<i64>()
            .ok()
            .and_then(|millis| Timestamp::from_millisecond(millis).ok());
    }
    None
}
