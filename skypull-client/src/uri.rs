use crate::api;
use crate::error::{ClientError, Result};
use crate::session::Session;
use std::fmt;

const STARTER_PACK_MARKER: &str = "bsky.app/starter-pack/";
const PROFILE_MARKER: &str = "/profile/";
const LIST_MARKER: &str = "/lists/";

/// A resolved AT-URI: `at://{authority}/{collection}/{rkey}`.
///
/// Construction only succeeds when the string decomposes into exactly those
/// three non-empty segments, so holding an `AtUri` means the locator is
/// addressable as-is.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AtUri(String);

impl AtUri {
    pub fn parse(s: &str) -> Result<Self> {
        let rest = s
            .strip_prefix("at://")
            .ok_or_else(|| ClientError::InvalidUrl(format!("not an at:// URI: {s}")))?;

        let mut segments = rest.splitn(3, '/');
        let authority = segments.next().unwrap_or_default();
        let collection = segments.next().unwrap_or_default();
        let rkey = segments.next().unwrap_or_default();

        if authority.is_empty() || collection.is_empty() || rkey.is_empty() {
            return Err(ClientError::InvalidUrl(format!(
                "at:// URI must carry authority, collection and record key: {s}"
            )));
        }

        Ok(Self(s.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn authority(&self) -> &str {
        self.segment(0)
    }

    pub fn collection(&self) -> &str {
        self.segment(1)
    }

    pub fn rkey(&self) -> &str {
        self.segment(2)
    }

    fn segment(&self, index: usize) -> &str {
        // parse() guaranteed all three segments exist
        self.0
            .trim_start_matches("at://")
            .splitn(3, '/')
            .nth(index)
            .unwrap_or_default()
    }
}

impl fmt::Display for AtUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Converts a public starter-pack URL into the AT-URI the API expects.
///
/// `https://bsky.app/starter-pack/{handle}/{rkey}` becomes
/// `at://{handle}/app.bsky.starterPack/{rkey}`. No network round trip.
pub fn starter_pack_uri(url: &str) -> Result<AtUri> {
    let Some((_, remainder)) = url.split_once(STARTER_PACK_MARKER) else {
        return Err(ClientError::InvalidUrl(format!(
            "expected a {STARTER_PACK_MARKER} URL: {url}"
        )));
    };

    let Some((authority, rkey)) = remainder.split_once('/') else {
        return Err(ClientError::InvalidUrl(format!(
            "starter-pack URL is missing its record key: {url}"
        )));
    };

    let rkey = rkey.trim_end_matches('/');
    if authority.is_empty() || rkey.is_empty() {
        return Err(ClientError::InvalidUrl(format!(
            "starter-pack URL has an empty handle or record key: {url}"
        )));
    }

    AtUri::parse(&format!("at://{authority}/app.bsky.starterPack/{rkey}"))
}

/// Converts a public list URL into the AT-URI the API expects.
///
/// `https://bsky.app/profile/{handle}/lists/{rkey}` becomes
/// `at://{did}/app.bsky.graph.list/{rkey}`. The handle in the URL is a
/// human-facing alias, so one identity-resolution call is required to pin it
/// to the stable DID.
pub async fn list_uri(session: &Session, url: &str) -> Result<AtUri> {
    let Some((_, after_profile)) = url.split_once(PROFILE_MARKER) else {
        return Err(ClientError::InvalidUrl(format!(
            "expected a {PROFILE_MARKER} section in list URL: {url}"
        )));
    };

    let Some((handle, rkey)) = after_profile.split_once(LIST_MARKER) else {
        return Err(ClientError::InvalidUrl(format!(
            "expected a {LIST_MARKER} section in list URL: {url}"
        )));
    };

    let rkey = rkey.trim_end_matches('/');
    if handle.is_empty() || rkey.is_empty() {
        return Err(ClientError::InvalidUrl(format!(
            "list URL has an empty handle or record key: {url}"
        )));
    }

    let did = api::resolve_handle(session, handle).await?;
    AtUri::parse(&format!("at://{did}/app.bsky.graph.list/{rkey}"))
}

/// True when the URL looks like a starter-pack entry point.
pub fn is_starter_pack_url(url: &str) -> bool {
    url.contains(STARTER_PACK_MARKER)
}

/// True when the URL looks like a curated-list entry point.
pub fn is_list_url(url: &str) -> bool {
    url.contains(PROFILE_MARKER) && url.contains(LIST_MARKER)
}
