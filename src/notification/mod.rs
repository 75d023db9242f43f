//! Activity to notification resolution.
//!
//! An activity names an event kind and, depending on the kind, one of a
//! space, post or comment id. Resolution runs in four steps:
//!
//! 1. dispatch the event kind to its subject,
//! 2. resolve the subject to a preview, following shares and comments,
//! 3. route the audience by comparing the viewer with the content owner,
//! 4. compose the message from the audience's phrase table.
//!
//! Anything that fails along the way drops the one activity.

mod assemble;
mod audience;
mod dispatch;
mod error;
mod filters;
mod link;
mod message;
mod preview;

pub use assemble::{Notification, NotificationResolver};
pub use audience::{Audience, route};
pub use dispatch::Subject;
pub use error::{EntityKind, Unrenderable};
pub use link::{Link, POST_HREF, SPACE_HREF, post_slug, post_url, space_url};
pub use message::{Message, MessageTable, aggregation_phrase, compose};
pub use preview::{
    DEFAULT_MAX_SHARE_HOPS, DEFAULT_SUMMARIZE_LIMIT, MessageOverride, Preview,
    PreviewNotification,
};
