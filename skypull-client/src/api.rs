use crate::error::{ClientError, Result};
use crate::model::{Profile, StarterPackView};
use crate::session::Session;
use crate::uri::AtUri;
use serde::Deserialize;
use serde_json::Value;

/// Most handles `app.bsky.actor.getProfiles` accepts in one call.
pub const PROFILE_BATCH_MAX: usize = 25;

/// Resolves a handle to its stable DID. Any failure here means the handle
/// could not be pinned to an account, which is not retryable without user
/// correction.
pub async fn resolve_handle(session: &Session, handle: &str) -> Result<String> {
    #[derive(Deserialize)]
    struct ResolveHandleResponse {
        did: String,
    }

    let value = session
        .get("com.atproto.identity.resolveHandle", &[("handle", handle)])
        .await
        .map_err(|e| ClientError::IdentityResolution(format!("{handle}: {e}")))?;

    let resolved: ResolveHandleResponse =
        serde_json::from_value(value).map_err(|_| ClientError::UnsupportedShape("did"))?;
    Ok(resolved.did)
}

/// One page of `app.bsky.graph.getList`. Returned raw so the caller's
/// selector owns extraction.
pub async fn get_list_page(
    session: &Session,
    list: &AtUri,
    limit: u32,
    cursor: Option<String>,
) -> Result<Value> {
    let limit = limit.to_string();
    let mut params = vec![("list", list.as_str()), ("limit", limit.as_str())];
    if let Some(ref cursor) = cursor {
        params.push(("cursor", cursor));
    }
    session.get("app.bsky.graph.getList", &params).await
}

/// One page of `app.bsky.graph.getFollows` for `actor`.
pub async fn get_follows_page(
    session: &Session,
    actor: &str,
    limit: u32,
    cursor: Option<String>,
) -> Result<Value> {
    let limit = limit.to_string();
    let mut params = vec![("actor", actor), ("limit", limit.as_str())];
    if let Some(ref cursor) = cursor {
        params.push(("cursor", cursor));
    }
    session.get("app.bsky.graph.getFollows", &params).await
}

/// Fetches a starter pack record. Not paginated; the pack embeds the list
/// that actually carries the membership.
pub async fn get_starter_pack(session: &Session, pack: &AtUri) -> Result<StarterPackView> {
    #[derive(Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct GetStarterPackResponse {
        starter_pack: StarterPackView,
    }

    let value = session
        .get("app.bsky.graph.getStarterPack", &[("starterPack", pack.as_str())])
        .await?;

    let response: GetStarterPackResponse =
        serde_json::from_value(value).map_err(|_| ClientError::UnsupportedShape("starterPack"))?;
    Ok(response.starter_pack)
}

/// Hydrates up to [`PROFILE_BATCH_MAX`] handles into full profile records in
/// one non-paginated call. Callers chunk; asking for more is a bug.
pub async fn get_profiles(session: &Session, handles: &[String]) -> Result<Vec<Profile>> {
    if handles.len() > PROFILE_BATCH_MAX {
        return Err(ClientError::ProfileLookup(format!(
            "{} handles in one batch (maximum {PROFILE_BATCH_MAX})",
            handles.len()
        )));
    }

    #[derive(Deserialize)]
    struct GetProfilesResponse {
        profiles: Vec<Profile>,
    }

    let params: Vec<(&str, &str)> = handles.iter().map(|h| ("actors", h.as_str())).collect();
    let value = session.get("app.bsky.actor.getProfiles", &params).await?;

    let response: GetProfilesResponse =
        serde_json::from_value(value).map_err(|_| ClientError::UnsupportedShape("profiles"))?;
    Ok(response.profiles)
}
