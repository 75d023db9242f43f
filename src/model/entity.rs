//! Read-only snapshots of on-chain entities: spaces, posts (comments share the
//! post id-space) and account profiles.

use std::fmt::Display;
use std::str::FromStr;

use minicbor::{Decode, Encode};
use serde::{Deserialize, Serialize};

/// Decimal string id of a space, post or comment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "IdRepr", into = "String")]
pub struct EntityId(String);

#[derive(Debug, thiserror::Error)]
#[error("{0:?} is not a decimal entity id")]
pub struct MalformedId(pub String);

impl EntityId {
    pub fn parse(value: &str) -> Result<EntityId, MalformedId> {
        let trimmed = value.trim();
        if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return Err(MalformedId(value.to_string()));
        }
        Ok(EntityId(trimmed.to_string()))
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for EntityId {
    type Err = MalformedId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EntityId::parse(s)
    }
}

impl From<u64> for EntityId {
    fn from(value: u64) -> Self {
        EntityId(value.to_string())
    }
}

impl From<EntityId> for String {
    fn from(value: EntityId) -> Self {
        value.0
    }
}

impl Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl AsRef<[u8]> for EntityId {
    fn as_ref(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

/// Indexers emit ids either as JSON strings or as plain numbers.
#[derive(Deserialize)]
#[serde(untagged)]
enum IdRepr {
    Text(String),
    Number(u64),
}

impl From<IdRepr> for String {
    fn from(value: IdRepr) -> Self {
        match value {
            IdRepr::Text(text) => text,
            IdRepr::Number(n) => n.to_string(),
        }
    }
}

impl TryFrom<IdRepr> for EntityId {
    type Error = MalformedId;

    fn try_from(value: IdRepr) -> Result<Self, Self::Error> {
        EntityId::parse(&String::from(value))
    }
}

impl<C> Encode<C> for EntityId {
    fn encode<W: minicbor::encode::Write>(
        &self,
        e: &mut minicbor::Encoder<W>,
        _ctx: &mut C,
    ) -> Result<(), minicbor::encode::Error<W::Error>> {
        e.str(&self.0)?;
        Ok(())
    }
}

impl<'b, C> Decode<'b, C> for EntityId {
    fn decode(
        d: &mut minicbor::Decoder<'b>,
        _ctx: &mut C,
    ) -> Result<Self, minicbor::decode::Error> {
        EntityId::parse(d.str()?).map_err(|_| minicbor::decode::Error::message("malformed entity id"))
    }
}

/// Account address. Two addresses are the same account when their trimmed
/// string forms are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct AccountId(String);

impl AccountId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for AccountId {
    fn from(value: String) -> Self {
        let trimmed = value.trim();
        if trimmed.len() == value.len() {
            return AccountId(value);
        }
        AccountId(trimmed.to_string())
    }
}

impl From<&str> for AccountId {
    fn from(value: &str) -> Self {
        AccountId(value.trim().to_string())
    }
}

impl From<AccountId> for String {
    fn from(value: AccountId) -> Self {
        value.0
    }
}

impl Display for AccountId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl<C> Encode<C> for AccountId {
    fn encode<W: minicbor::encode::Write>(
        &self,
        e: &mut minicbor::Encoder<W>,
        _ctx: &mut C,
    ) -> Result<(), minicbor::encode::Error<W::Error>> {
        e.str(&self.0)?;
        Ok(())
    }
}

impl<'b, C> Decode<'b, C> for AccountId {
    fn decode(
        d: &mut minicbor::Decoder<'b>,
        _ctx: &mut C,
    ) -> Result<Self, minicbor::decode::Error> {
        Ok(AccountId::from(d.str()?))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct Space {
    #[n(0)]
    pub id: EntityId,
    #[n(1)]
    pub owner: AccountId,
    #[n(2)]
    #[serde(default)]
    pub handle: Option<String>,
    #[n(3)]
    #[serde(default)]
    pub content: Option<SpaceContent>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
#[serde(default)]
pub struct SpaceContent {
    #[n(0)]
    pub name: Option<String>,
    #[n(1)]
    pub image: Option<String>,
    #[n(2)]
    pub about: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct Post {
    #[n(0)]
    pub id: EntityId,
    #[n(1)]
    pub owner: AccountId,
    #[n(2)]
    #[serde(default)]
    pub space_id: Option<EntityId>,
    #[n(3)]
    #[serde(default)]
    pub extension: PostExtension,
    #[n(4)]
    #[serde(default)]
    pub content: Option<PostContent>,
}

/// What a post entry actually is. Comments and shares live in the post
/// id-space and are told apart only by this tag.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub enum PostExtension {
    #[n(0)]
    #[default]
    RegularPost,
    #[n(1)]
    SharedPost(#[n(0)] EntityId),
    #[n(2)]
    Comment {
        #[n(0)]
        #[serde(default)]
        parent_id: Option<EntityId>,
        #[n(1)]
        root_post_id: EntityId,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
#[serde(default)]
pub struct PostContent {
    #[n(0)]
    pub title: Option<String>,
    #[n(1)]
    pub body: Option<String>,
    #[n(2)]
    pub image: Option<String>,
}

impl PostContent {
    /// First non-blank of title and body.
    pub fn title_or_body(&self) -> Option<&str> {
        [self.title.as_deref(), self.body.as_deref()]
            .into_iter()
            .flatten()
            .find(|s| !s.trim().is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct Profile {
    #[n(0)]
    pub account: AccountId,
    #[n(1)]
    #[serde(default)]
    pub content: Option<ProfileContent>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
#[serde(default)]
pub struct ProfileContent {
    #[n(0)]
    pub name: Option<String>,
    #[n(1)]
    pub avatar: Option<String>,
}

#[cfg(test)]
mod tests {
    use anyhow::Result;
    use serde_json::json;

    use super::{AccountId, EntityId, Post, PostExtension};

    #[test]
    fn entity_id_accepts_decimal_only() {
        assert_eq!(EntityId::parse(" 42 ").unwrap().as_str(), "42");
        assert!(EntityId::parse("").is_err());
        assert!(EntityId::parse("0x2a").is_err());
        assert!(EntityId::parse("-1").is_err());
    }

    #[test]
    fn account_equality_ignores_surrounding_whitespace() {
        assert_eq!(AccountId::from(" 5Grw "), AccountId::from("5Grw".to_string()));
    }

    #[test]
    fn post_from_indexer_json() -> Result<()> {
        let post: Post = serde_json::from_value(json!({
            "id": 7,
            "owner": "5Grw",
            "space_id": "1",
            "extension": { "Comment": { "root_post_id": "3" } },
            "content": { "body": "nice" }
        }))?;
        assert_eq!(post.id, EntityId::from(7));
        assert_eq!(
            post.extension,
            PostExtension::Comment {
                parent_id: None,
                root_post_id: EntityId::from(3)
            }
        );
        Ok(())
    }

    #[test]
    fn post_defaults_to_regular() -> Result<()> {
        let post: Post = serde_json::from_value(json!({ "id": "1", "owner": "a" }))?;
        assert_eq!(post.extension, PostExtension::RegularPost);
        assert!(post.content.is_none());
        Ok(())
    }

    #[test]
    fn cbor_keeps_shared_post_target() -> Result<()> {
        let post: Post = serde_json::from_value(json!({
            "id": "9",
            "owner": "a",
            "extension": { "SharedPost": "4" }
        }))?;
        let bytes = minicbor::to_vec(&post)?;
        let decoded: Post = minicbor::decode(&bytes)?;
        assert_eq!(decoded.extension, PostExtension::SharedPost(EntityId::from(4)));
        Ok(())
    }
}
