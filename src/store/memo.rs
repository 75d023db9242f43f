use std::cell::RefCell;
use std::collections::HashMap;
use std::hash::Hash;

use anyhow::Result;

use crate::model::{AccountId, EntityId, Post, Profile, Space};

use super::EntityStore;

/// Read-through memoization for one resolution pass. Feeds reference the same
/// spaces and root posts over and over; this keeps each lookup to one hit on
/// the underlying store. Misses are cached too, failures are not.
pub struct MemoStore<'s, S: ?Sized> {
    inner: &'s S,
    spaces: RefCell<HashMap<EntityId, Option<Space>>>,
    posts: RefCell<HashMap<EntityId, Option<Post>>>,
    profiles: RefCell<HashMap<AccountId, Option<Profile>>>,
}

impl<'s, S: EntityStore + ?Sized> MemoStore<'s, S> {
    pub fn new(inner: &'s S) -> Self {
        MemoStore {
            inner,
            spaces: RefCell::default(),
            posts: RefCell::default(),
            profiles: RefCell::default(),
        }
    }
}

fn read_through<K, V>(
    cache: &RefCell<HashMap<K, Option<V>>>,
    key: &K,
    load: impl FnOnce() -> Result<Option<V>>,
) -> Result<Option<V>>
where
    K: Clone + Eq + Hash,
    V: Clone,
{
    let cached = cache.borrow().get(key).cloned();
    if let Some(value) = cached {
        return Ok(value);
    }
    let value = load()?;
    cache.borrow_mut().insert(key.clone(), value.clone());
    Ok(value)
}

impl<S: EntityStore + ?Sized> EntityStore for MemoStore<'_, S> {
    fn space(&self, id: &EntityId) -> Result<Option<Space>> {
        read_through(&self.spaces, id, || self.inner.space(id))
    }
    fn post(&self, id: &EntityId) -> Result<Option<Post>> {
        read_through(&self.posts, id, || self.inner.post(id))
    }
    fn profile(&self, account: &AccountId) -> Result<Option<Profile>> {
        read_through(&self.profiles, account, || self.inner.profile(account))
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use anyhow::{Result, bail};

    use crate::model::{AccountId, EntityId, Post, Profile, Space};
    use crate::store::EntityStore;

    use super::MemoStore;

    #[derive(Default)]
    struct CountingStore {
        space_hits: Cell<usize>,
        fail_posts: bool,
    }

    impl EntityStore for CountingStore {
        fn space(&self, id: &EntityId) -> Result<Option<Space>> {
            self.space_hits.set(self.space_hits.get() + 1);
            if id.as_str() == "1" {
                return Ok(Some(Space {
                    id: id.clone(),
                    owner: AccountId::from("alice"),
                    handle: None,
                    content: None,
                }));
            }
            Ok(None)
        }
        fn post(&self, _id: &EntityId) -> Result<Option<Post>> {
            if self.fail_posts {
                bail!("storage offline");
            }
            Ok(None)
        }
        fn profile(&self, _account: &AccountId) -> Result<Option<Profile>> {
            Ok(None)
        }
    }

    #[test]
    fn hits_and_misses_are_cached() -> Result<()> {
        let inner = CountingStore::default();
        let memo = MemoStore::new(&inner);
        for _ in 0..3 {
            assert!(memo.space(&EntityId::from(1))?.is_some());
            assert!(memo.space(&EntityId::from(2))?.is_none());
        }
        assert_eq!(inner.space_hits.get(), 2);
        Ok(())
    }

    #[test]
    fn failures_are_not_cached() {
        let inner = CountingStore {
            fail_posts: true,
            ..Default::default()
        };
        let memo = MemoStore::new(&inner);
        assert!(memo.post(&EntityId::from(1)).is_err());
        assert!(memo.post(&EntityId::from(1)).is_err());
    }
}
