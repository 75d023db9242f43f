//! Turn a subject id into a preview of the content it points at.
//!
//! Shares and comments are indirections: a shared post previews the post it
//! wraps, a comment previews its root post. Share chains are followed up to a
//! hop limit so that a cycle in upstream data cannot hang a render.

use std::fmt::Display;

use serde::Serialize;
use tracing::warn;

use crate::model::{AccountId, EntityId, Post, PostExtension, Space};
use crate::store::EntityStore;

use super::dispatch::Subject;
use super::error::{EntityKind, Unrenderable};
use super::filters::summarize;
use super::link::Link;

pub const DEFAULT_SUMMARIZE_LIMIT: usize = 50;
pub const DEFAULT_MAX_SHARE_HOPS: usize = 16;

const UNNAMED_SPACE: &str = "<Unnamed Space>";

/// Linked snippet shown after the message text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Preview {
    Space { label: String, path: String },
    Post { label: String, path: String },
}

impl Preview {
    pub fn label(&self) -> &str {
        match self {
            Preview::Space { label, .. } | Preview::Post { label, .. } => label,
        }
    }
    pub fn path(&self) -> &str {
        match self {
            Preview::Space { path, .. } | Preview::Post { path, .. } => path,
        }
    }
}

impl Display for Preview {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Replaces the audience template regardless of who is looking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MessageOverride {
    PostSharing,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewNotification {
    pub preview: Option<Preview>,
    pub owner: AccountId,
    pub image: Option<String>,
    pub link: Link,
    pub message_override: Option<MessageOverride>,
}

pub(crate) struct PreviewResolver<'s, S: ?Sized> {
    store: &'s S,
    summarize_limit: usize,
    max_share_hops: usize,
}

impl<'s, S: EntityStore + ?Sized> PreviewResolver<'s, S> {
    pub(crate) fn new(store: &'s S, summarize_limit: usize, max_share_hops: usize) -> Self {
        PreviewResolver {
            store,
            summarize_limit,
            max_share_hops,
        }
    }

    pub(crate) fn resolve(&self, subject: &Subject) -> Result<PreviewNotification, Unrenderable> {
        match subject {
            Subject::Space(id) => self.space_preview(id),
            Subject::Post(id) => self.post_preview(id),
            Subject::Comment(id) => self.comment_preview(id),
        }
    }

    fn find_space(&self, id: &EntityId) -> Result<Space, Unrenderable> {
        self.store
            .space(id)?
            .ok_or_else(|| Unrenderable::not_found(EntityKind::Space, id))
    }

    fn find_post(&self, kind: EntityKind, id: &EntityId) -> Result<Post, Unrenderable> {
        self.store
            .post(id)?
            .ok_or_else(|| Unrenderable::not_found(kind, id))
    }

    fn space_preview(&self, id: &EntityId) -> Result<PreviewNotification, Unrenderable> {
        let space = self.find_space(id)?;
        let link = Link::space(&space);
        let content = space.content.unwrap_or_default();
        let label = content
            .name
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| UNNAMED_SPACE.to_string());
        Ok(PreviewNotification {
            preview: Some(Preview::Space {
                label,
                path: link.path.clone(),
            }),
            owner: space.owner,
            image: content.image,
            link,
            message_override: None,
        })
    }

    fn post_preview(&self, id: &EntityId) -> Result<PreviewNotification, Unrenderable> {
        let mut post = self.find_post(EntityKind::Post, id)?;
        let mut hops = 0;
        loop {
            match &post.extension {
                PostExtension::RegularPost => break,
                PostExtension::SharedPost(wrapped) => {
                    if hops == self.max_share_hops {
                        warn!(
                            target: "resolve",
                            post = %id,
                            limit = self.max_share_hops,
                            "share chain too long, dropping"
                        );
                        return Err(Unrenderable::HopLimitExceeded {
                            id: id.clone(),
                            limit: self.max_share_hops,
                        });
                    }
                    hops += 1;
                    let wrapped = wrapped.clone();
                    post = self.find_post(EntityKind::Post, &wrapped)?;
                }
                // Comments are only reachable through their own subject.
                PostExtension::Comment { .. } => {
                    return Err(Unrenderable::not_found(EntityKind::Post, &post.id));
                }
            }
        }

        let mut notification = self.regular_post_preview(post)?;
        if hops > 0 {
            notification.message_override = Some(MessageOverride::PostSharing);
        }
        Ok(notification)
    }

    fn comment_preview(&self, id: &EntityId) -> Result<PreviewNotification, Unrenderable> {
        let comment = self.find_post(EntityKind::Comment, id)?;
        let PostExtension::Comment { root_post_id, .. } = &comment.extension else {
            return Err(Unrenderable::not_found(EntityKind::Comment, id));
        };
        let root = self.find_post(EntityKind::Post, root_post_id)?;
        self.regular_post_preview(root)
    }

    fn regular_post_preview(&self, post: Post) -> Result<PreviewNotification, Unrenderable> {
        let space_id = post.space_id.as_ref().ok_or_else(|| Unrenderable::Orphaned {
            post: post.id.clone(),
        })?;
        let space = self.find_space(space_id)?;
        let link = Link::post(&space, &post);
        let content = post.content;
        let preview = content.as_ref().map(|content| Preview::Post {
            label: summarize(
                content.title_or_body().unwrap_or("link"),
                self.summarize_limit,
                "...",
            ),
            path: link.path.clone(),
        });
        Ok(PreviewNotification {
            preview,
            owner: post.owner,
            image: content.and_then(|c| c.image),
            link,
            message_override: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use anyhow::Result;
    use serde_json::json;

    use crate::model::{AccountId, EntityId};
    use crate::notification::dispatch::Subject;
    use crate::notification::error::{EntityKind, Unrenderable};
    use crate::store::{Snapshot, SnapshotFile};

    use super::{MessageOverride, Preview, PreviewResolver};

    fn fixture() -> Result<Snapshot> {
        let file: SnapshotFile = serde_json::from_value(json!({
            "spaces": [
                { "id": "1", "owner": "alice", "handle": "rust",
                  "content": { "name": "Rustaceans", "image": "QmSpace" } },
                { "id": "2", "owner": "bob" }
            ],
            "posts": [
                { "id": "10", "owner": "alice", "space_id": "1",
                  "content": { "title": "Ownership explained in depth for the curious reader", "image": "QmPost" } },
                { "id": "11", "owner": "bob", "space_id": "2", "extension": { "SharedPost": "10" } },
                { "id": "12", "owner": "carol", "space_id": "2", "extension": { "SharedPost": "11" } },
                { "id": "13", "owner": "dave", "extension": { "Comment": { "root_post_id": "10" } } },
                { "id": "14", "owner": "dave", "extension": { "Comment": { "root_post_id": "99" } } },
                { "id": "15", "owner": "erin", "space_id": "1", "extension": { "SharedPost": "16" } },
                { "id": "16", "owner": "erin", "space_id": "1", "extension": { "SharedPost": "15" } },
                { "id": "17", "owner": "frank", "space_id": "9" },
                { "id": "18", "owner": "frank", "space_id": "1" },
                { "id": "19", "owner": "frank" }
            ]
        }))?;
        Ok(Snapshot::from(file))
    }

    fn post(id: u64) -> Subject {
        Subject::Post(EntityId::from(id))
    }

    #[test]
    fn space_preview() -> Result<()> {
        let store = fixture()?;
        let resolver = PreviewResolver::new(&store, 50, 16);
        let found = resolver.resolve(&Subject::Space(EntityId::from(1)))?;
        assert_eq!(found.owner, AccountId::from("alice"));
        assert_eq!(found.image.as_deref(), Some("QmSpace"));
        assert_eq!(found.link.path, "/@rust");
        assert_eq!(found.preview.as_ref().map(Preview::label), Some("Rustaceans"));

        let unnamed = resolver.resolve(&Subject::Space(EntityId::from(2)))?;
        assert_eq!(unnamed.preview.as_ref().map(Preview::label), Some("<Unnamed Space>"));
        assert_eq!(unnamed.link.path, "/2");
        Ok(())
    }

    #[test]
    fn missing_space_is_not_found() -> Result<()> {
        let store = fixture()?;
        let resolver = PreviewResolver::new(&store, 50, 16);
        let error = resolver
            .resolve(&Subject::Space(EntityId::from(3)))
            .unwrap_err();
        assert!(matches!(
            error,
            Unrenderable::NotFound { kind: EntityKind::Space, .. }
        ));
        Ok(())
    }

    #[test]
    fn regular_post_preview() -> Result<()> {
        let store = fixture()?;
        let resolver = PreviewResolver::new(&store, 50, 16);
        let found = resolver.resolve(&post(10))?;
        assert_eq!(found.message_override, None);
        assert_eq!(found.image.as_deref(), Some("QmPost"));
        let label = found.preview.as_ref().map(Preview::label).unwrap_or_default();
        assert!(label.ends_with("..."));
        assert!(label.chars().count() <= 50);
        assert!(found.link.path.starts_with("/@rust/ownership-explained"));
        assert!(found.link.path.ends_with("-10"));
        Ok(())
    }

    #[test]
    fn post_without_content_has_no_preview() -> Result<()> {
        let store = fixture()?;
        let resolver = PreviewResolver::new(&store, 50, 16);
        let found = resolver.resolve(&post(18))?;
        assert_eq!(found.preview, None);
        assert_eq!(found.link.path, "/@rust/18");
        Ok(())
    }

    #[test]
    fn post_needs_its_space() -> Result<()> {
        let store = fixture()?;
        let resolver = PreviewResolver::new(&store, 50, 16);
        assert!(matches!(
            resolver.resolve(&post(17)).unwrap_err(),
            Unrenderable::NotFound { kind: EntityKind::Space, .. }
        ));
        assert!(matches!(
            resolver.resolve(&post(19)).unwrap_err(),
            Unrenderable::Orphaned { .. }
        ));
        Ok(())
    }

    #[test]
    fn share_chain_resolves_to_original_once() -> Result<()> {
        let store = fixture()?;
        let resolver = PreviewResolver::new(&store, 50, 16);
        let original = resolver.resolve(&post(10))?;
        let shared_twice = resolver.resolve(&post(12))?;
        assert_eq!(shared_twice.link, original.link);
        assert_eq!(shared_twice.owner, AccountId::from("alice"));
        assert_eq!(shared_twice.message_override, Some(MessageOverride::PostSharing));
        Ok(())
    }

    #[test]
    fn share_cycle_trips_hop_limit() -> Result<()> {
        let store = fixture()?;
        let resolver = PreviewResolver::new(&store, 50, 16);
        assert!(matches!(
            resolver.resolve(&post(15)).unwrap_err(),
            Unrenderable::HopLimitExceeded { limit: 16, .. }
        ));
        let strict = PreviewResolver::new(&store, 50, 1);
        assert!(matches!(
            strict.resolve(&post(12)).unwrap_err(),
            Unrenderable::HopLimitExceeded { .. }
        ));
        Ok(())
    }

    #[test]
    fn comment_links_root_post() -> Result<()> {
        let store = fixture()?;
        let resolver = PreviewResolver::new(&store, 50, 16);
        let root = resolver.resolve(&post(10))?;
        let comment = resolver.resolve(&Subject::Comment(EntityId::from(13)))?;
        assert_eq!(comment.link, root.link);
        assert_eq!(comment.owner, AccountId::from("alice"));
        assert_eq!(comment.message_override, None);
        Ok(())
    }

    #[test]
    fn comment_subject_must_be_comment() -> Result<()> {
        let store = fixture()?;
        let resolver = PreviewResolver::new(&store, 50, 16);
        assert!(matches!(
            resolver
                .resolve(&Subject::Comment(EntityId::from(10)))
                .unwrap_err(),
            Unrenderable::NotFound { kind: EntityKind::Comment, .. }
        ));
        assert!(matches!(
            resolver
                .resolve(&Subject::Comment(EntityId::from(14)))
                .unwrap_err(),
            Unrenderable::NotFound { kind: EntityKind::Post, .. }
        ));
        assert!(matches!(
            resolver.resolve(&post(13)).unwrap_err(),
            Unrenderable::NotFound { kind: EntityKind::Post, .. }
        ));
        Ok(())
    }
}
