use serde::Serialize;

use crate::model::{Post, Space};

use super::filters::{slugify, summarize};

pub const SPACE_HREF: &str = "/[spaceId]";
pub const POST_HREF: &str = "/[spaceId]/posts/[postId]";

const MAX_SLUG_LENGTH: usize = 60;

/// Route template plus the concrete path it resolves to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Link {
    pub href: &'static str,
    #[serde(rename = "as")]
    pub path: String,
}

impl Link {
    pub fn space(space: &Space) -> Link {
        Link {
            href: SPACE_HREF,
            path: space_url(space),
        }
    }
    pub fn post(space: &Space, post: &Post) -> Link {
        Link {
            href: POST_HREF,
            path: post_url(space, post),
        }
    }
}

/// `/@handle` for spaces with a handle, `/<id>` otherwise.
pub fn space_url(space: &Space) -> String {
    match space.handle.as_deref().map(str::trim) {
        Some(handle) if !handle.is_empty() => format!("/@{}", handle.to_lowercase()),
        _ => format!("/{}", space.id),
    }
}

pub fn post_url(space: &Space, post: &Post) -> String {
    format!("{}/{}", space_url(space), post_slug(post))
}

/// `<slugified summary>-<id>`, or the bare id when the post has no text that
/// survives slugification.
pub fn post_slug(post: &Post) -> String {
    let summary = post
        .content
        .as_ref()
        .and_then(|content| content.title_or_body())
        .map(|text| slugify(&summarize(text, MAX_SLUG_LENGTH, "")))
        .unwrap_or_default();
    if summary.is_empty() {
        return post.id.to_string();
    }
    format!("{summary}-{}", post.id)
}
