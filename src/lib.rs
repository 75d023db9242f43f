//! Render a feed of on-chain social activities (follows, posts, comments,
//! reactions, shares) as notifications with live previews of the content
//! they refer to.
//!
//! Entity caches are filled before resolution; the resolver itself is
//! synchronous and never performs I/O.

pub mod config;
pub mod model;
pub mod notification;
pub mod offchain;
pub mod render;
pub mod store;

pub use config::Config;
pub use notification::{Notification, NotificationResolver, Unrenderable};
pub use store::{EntityStore, KeyspaceStore, MemoStore, Snapshot};
