use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A profile record as returned by `app.bsky.actor.getProfiles` and
/// `app.bsky.graph.getFollows`. Unknown fields are dropped at the boundary.
///
/// `associated` and `viewer` are relative to the authenticated session, not
/// durable attributes of the account. They are carried opaquely so callers
/// can inspect them, but flattened node rows exclude both.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub did: String,
    pub handle: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub banner: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub followers_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub follows_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub posts_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub indexed_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub associated: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub viewer: Option<Value>,
}

impl Profile {
    /// Minimal record for tests and synthetic seeds.
    pub fn bare(did: impl Into<String>, handle: impl Into<String>) -> Self {
        Self {
            did: did.into(),
            handle: handle.into(),
            display_name: None,
            description: None,
            avatar: None,
            banner: None,
            followers_count: None,
            follows_count: None,
            posts_count: None,
            created_at: None,
            indexed_at: None,
            associated: None,
            viewer: None,
        }
    }
}

/// One entry of `app.bsky.graph.getList`. The member account sits under
/// `subject`; the rest of the item is list bookkeeping we don't need.
#[derive(Debug, Clone, Deserialize)]
pub struct ListItem {
    pub subject: ListSubject,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ListSubject {
    pub did: String,
    pub handle: String,
}

/// The starter pack view from `app.bsky.graph.getStarterPack`. Only the
/// embedded list reference matters here: membership always goes through it.
#[derive(Debug, Clone, Deserialize)]
pub struct StarterPackView {
    pub list: ListRef,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ListRef {
    pub uri: String,
}
