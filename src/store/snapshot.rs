use std::collections::BTreeMap;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::model::{AccountId, EntityId, Post, Profile, Space};

use super::EntityStore;

/// Serialized form of a cache fill, as produced by the chain and off-chain
/// loaders.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapshotFile {
    pub spaces: Vec<Space>,
    pub posts: Vec<Post>,
    pub profiles: Vec<Profile>,
}

/// In-memory store keyed by id.
#[derive(Debug, Default, Clone)]
pub struct Snapshot {
    spaces: BTreeMap<EntityId, Space>,
    posts: BTreeMap<EntityId, Post>,
    profiles: BTreeMap<AccountId, Profile>,
}

impl Snapshot {
    pub fn from_json(bytes: &[u8]) -> Result<Snapshot> {
        let file: SnapshotFile =
            serde_json::from_slice(bytes).context("unable to parse entity snapshot")?;
        Ok(Snapshot::from(file))
    }
    pub fn len(&self) -> usize {
        self.spaces.len() + self.posts.len() + self.profiles.len()
    }
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<SnapshotFile> for Snapshot {
    fn from(file: SnapshotFile) -> Self {
        // Later duplicates win, same as a cache refill.
        let SnapshotFile {
            spaces,
            posts,
            profiles,
        } = file;
        Snapshot {
            spaces: spaces.into_iter().map(|s| (s.id.clone(), s)).collect(),
            posts: posts.into_iter().map(|p| (p.id.clone(), p)).collect(),
            profiles: profiles
                .into_iter()
                .map(|p| (p.account.clone(), p))
                .collect(),
        }
    }
}

impl EntityStore for Snapshot {
    fn space(&self, id: &EntityId) -> Result<Option<Space>> {
        Ok(self.spaces.get(id).cloned())
    }
    fn post(&self, id: &EntityId) -> Result<Option<Post>> {
        Ok(self.posts.get(id).cloned())
    }
    fn profile(&self, account: &AccountId) -> Result<Option<Profile>> {
        Ok(self.profiles.get(account).cloned())
    }
}
