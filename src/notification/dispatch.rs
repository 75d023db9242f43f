use crate::model::{Activity, EntityId, Event, EventKind};

use super::error::Unrenderable;

/// The entity an activity is about, tagged with how to resolve it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Subject {
    Space(EntityId),
    Post(EntityId),
    Comment(EntityId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SubjectField {
    Space,
    Post,
    Comment,
}

fn subject_field(kind: EventKind) -> SubjectField {
    match kind {
        EventKind::SpaceFollowed | EventKind::SpaceCreated => SubjectField::Space,
        EventKind::CommentCreated
        | EventKind::CommentReplyCreated
        | EventKind::CommentShared
        | EventKind::CommentReactionCreated => SubjectField::Comment,
        EventKind::PostShared | EventKind::PostReactionCreated | EventKind::PostCreated => {
            SubjectField::Post
        }
    }
}

/// Pick the subject of an activity from its event kind.
pub(crate) fn dispatch(activity: &Activity) -> Result<(EventKind, Subject), Unrenderable> {
    let kind = match &activity.event {
        Event::Known(kind) => *kind,
        Event::Unknown(name) => return Err(Unrenderable::UnknownEventKind(name.clone())),
    };
    let which = subject_field(kind);
    let (field, raw) = match which {
        SubjectField::Space => ("space_id", &activity.space_id),
        SubjectField::Post => ("post_id", &activity.post_id),
        SubjectField::Comment => ("comment_id", &activity.comment_id),
    };
    let raw = raw
        .as_deref()
        .ok_or(Unrenderable::MissingSubject { field })?;
    let id = EntityId::parse(raw).map_err(|_| Unrenderable::InvalidEntityId {
        field,
        value: raw.to_string(),
    })?;
    let subject = match which {
        SubjectField::Space => Subject::Space(id),
        SubjectField::Post => Subject::Post(id),
        SubjectField::Comment => Subject::Comment(id),
    };
    Ok((kind, subject))
}
