//! Read-only entity lookups used while resolving notifications.
//!
//! Callers fill a store before a resolution pass. A miss is an ordinary
//! outcome and never a reason to wait or retry.

mod keyspace;
mod memo;
mod snapshot;

use anyhow::Result;

use crate::model::{AccountId, EntityId, Post, Profile, Space};

pub use keyspace::KeyspaceStore;
pub use memo::MemoStore;
pub use snapshot::{Snapshot, SnapshotFile};

pub trait EntityStore {
    fn space(&self, id: &EntityId) -> Result<Option<Space>>;
    /// Posts and comments share one id-space.
    fn post(&self, id: &EntityId) -> Result<Option<Post>>;
    fn profile(&self, account: &AccountId) -> Result<Option<Profile>>;
}

impl<S: EntityStore + ?Sized> EntityStore for &S {
    fn space(&self, id: &EntityId) -> Result<Option<Space>> {
        (**self).space(id)
    }
    fn post(&self, id: &EntityId) -> Result<Option<Post>> {
        (**self).post(id)
    }
    fn profile(&self, account: &AccountId) -> Result<Option<Profile>> {
        (**self).profile(account)
    }
}
