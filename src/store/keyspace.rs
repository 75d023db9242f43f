use std::marker::PhantomData;
use std::path::Path;

use anyhow::{Context, Result};
use fjall::{Batch, Config, Keyspace, PartitionCreateOptions, PartitionHandle, PersistMode};
use minicbor::{Decode, Encode};
use tracing::info;

use crate::model::{AccountId, EntityId, Post, Profile, Space};

use super::{EntityStore, SnapshotFile};

/// Entity cache persisted in a fjall keyspace, one partition per entity kind.
#[derive(Clone)]
pub struct KeyspaceStore {
    keyspace: Keyspace,
    spaces: CborRepo<Space>,
    posts: CborRepo<Post>,
    profiles: CborRepo<Profile>,
}

impl KeyspaceStore {
    pub fn open(dir: &Path) -> Result<KeyspaceStore> {
        let keyspace = Keyspace::open(Config::new(dir))
            .with_context(|| format!("unable to open keyspace at {}", dir.display()))?;
        KeyspaceStore::new(keyspace)
    }
    pub fn new(keyspace: Keyspace) -> Result<KeyspaceStore> {
        let spaces = CborRepo::new(&keyspace, "spaces")?;
        let posts = CborRepo::new(&keyspace, "posts")?;
        let profiles = CborRepo::new(&keyspace, "profiles")?;
        Ok(KeyspaceStore {
            keyspace,
            spaces,
            posts,
            profiles,
        })
    }
    /// Write a whole cache fill in one batch.
    pub fn import(&self, file: &SnapshotFile) -> Result<()> {
        let mut batch = self.keyspace.batch();
        for space in &file.spaces {
            self.spaces.batch_insert(&mut batch, &space.id, space)?;
        }
        for post in &file.posts {
            self.posts.batch_insert(&mut batch, &post.id, post)?;
        }
        for profile in &file.profiles {
            self.profiles
                .batch_insert(&mut batch, profile.account.as_str(), profile)?;
        }
        batch.commit()?;
        self.keyspace.persist(PersistMode::SyncAll)?;
        info!(
            target: "store",
            spaces = file.spaces.len(),
            posts = file.posts.len(),
            profiles = file.profiles.len(),
            "imported snapshot"
        );
        Ok(())
    }
}

impl EntityStore for KeyspaceStore {
    fn space(&self, id: &EntityId) -> Result<Option<Space>> {
        self.spaces.find_one(id)
    }
    fn post(&self, id: &EntityId) -> Result<Option<Post>> {
        self.posts.find_one(id)
    }
    fn profile(&self, account: &AccountId) -> Result<Option<Profile>> {
        self.profiles.find_one(account.as_str())
    }
}

#[derive(Clone)]
struct CborRepo<T> {
    partition: PartitionHandle,
    _marker: PhantomData<fn() -> T>,
}

impl<T> CborRepo<T>
where
    T: Encode<()> + for<'b> Decode<'b, ()>,
{
    fn new(keyspace: &Keyspace, name: &str) -> Result<CborRepo<T>> {
        let partition = keyspace.open_partition(name, PartitionCreateOptions::default())?;
        Ok(CborRepo {
            partition,
            _marker: PhantomData,
        })
    }
    fn batch_insert(&self, b: &mut Batch, key: impl AsRef<[u8]>, value: &T) -> Result<()> {
        let bytes = minicbor::to_vec(value).context("unable to serialize entity")?;
        b.insert(&self.partition, key.as_ref(), bytes);
        Ok(())
    }
    fn find_one(&self, key: impl AsRef<[u8]>) -> Result<Option<T>> {
        if let Some(bytes) = self.partition.get(key.as_ref())? {
            let value = minicbor::decode(&bytes).context("unable to deserialize entity")?;
            return Ok(Some(value));
        }
        Ok(None)
    }
}
