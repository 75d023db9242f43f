use std::fmt::Display;

use crate::model::EntityId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Space,
    Post,
    Comment,
}

impl Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            EntityKind::Space => "space",
            EntityKind::Post => "post",
            EntityKind::Comment => "comment",
        })
    }
}

/// Why one activity cannot be shown. Every variant drops the single
/// activity; none of them aborts a batch.
#[derive(Debug, thiserror::Error)]
pub enum Unrenderable {
    #[error("{kind} {id} not found")]
    NotFound { kind: EntityKind, id: EntityId },

    #[error("post {post} does not belong to a space")]
    Orphaned { post: EntityId },

    #[error("share chain starting at post {id} is longer than {limit} hops")]
    HopLimitExceeded { id: EntityId, limit: usize },

    #[error("unknown event kind {0:?}")]
    UnknownEventKind(String),

    #[error("activity has no {field}")]
    MissingSubject { field: &'static str },

    #[error("{field} {value:?} is not a well-formed entity id")]
    InvalidEntityId { field: &'static str, value: String },

    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

impl Unrenderable {
    pub(crate) fn not_found(kind: EntityKind, id: &EntityId) -> Unrenderable {
        Unrenderable::NotFound {
            kind,
            id: id.clone(),
        }
    }

    /// Stale or partial caches produce misses all the time. Everything else
    /// points at bad upstream data or a broken store and is worth a warning.
    pub fn is_routine(&self) -> bool {
        matches!(
            self,
            Unrenderable::NotFound { .. } | Unrenderable::Orphaned { .. }
        )
    }
}
