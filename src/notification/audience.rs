use serde::{Deserialize, Serialize};

use crate::model::AccountId;

/// Whether an entry is about the viewer's own content or about someone the
/// viewer follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Audience {
    Notifications,
    Activities,
}

pub fn route(viewer: Option<&AccountId>, owner: &AccountId) -> Audience {
    match viewer {
        Some(viewer) if viewer == owner => Audience::Notifications,
        _ => Audience::Activities,
    }
}
