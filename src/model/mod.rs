mod activity;
mod entity;

pub use activity::{Activity, Event, EventKind};
pub use entity::{
    AccountId, EntityId, MalformedId, Post, PostContent, PostExtension, Profile, ProfileContent,
    Space, SpaceContent,
};
