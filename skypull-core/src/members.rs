use skypull_client::api;
use skypull_client::error::{ClientError, Result};
use skypull_client::model::{ListItem, Profile};
use skypull_client::paginate::{Paginator, select_field};
use skypull_client::session::Session;
use skypull_client::uri::{self, AtUri};
use tracing::debug;

/// Page-size hint sent to `app.bsky.graph.getList`.
pub const LIST_PAGE_SIZE: u32 = 30;

/// Fetches every member of a list and hydrates them into full profiles.
///
/// Membership comes back paginated; hydration does not paginate but caps
/// each call at [`api::PROFILE_BATCH_MAX`] handles, so the handle sequence
/// is split into consecutive chunks and looked up one chunk at a time.
/// Output order matches membership order. A failed chunk fails the whole
/// fetch; nothing partial is returned.
pub async fn fetch_list_members(
    session: &Session,
    list: &AtUri,
    paginator: &Paginator,
) -> Result<Vec<Profile>> {
    let items: Vec<ListItem> = paginator
        .collect_all(
            |cursor| api::get_list_page(session, list, LIST_PAGE_SIZE, cursor),
            select_field("items"),
        )
        .await?;

    let handles: Vec<String> = items.into_iter().map(|item| item.subject.handle).collect();
    debug!(list = %list, members = handles.len(), "hydrating member profiles");

    let mut profiles = Vec::with_capacity(handles.len());
    for chunk in handles.chunks(api::PROFILE_BATCH_MAX) {
        let batch = api::get_profiles(session, chunk)
            .await
            .map_err(|e| ClientError::ProfileLookup(e.to_string()))?;
        profiles.extend(batch);
    }

    Ok(profiles)
}

/// Fetches every member of a starter pack.
///
/// A starter pack is a record wrapping a list; resolve the pack URL, read
/// the pack to find the embedded list, then pull that list's membership.
pub async fn fetch_starter_pack_members(
    session: &Session,
    url: &str,
    paginator: &Paginator,
) -> Result<Vec<Profile>> {
    let pack_uri = uri::starter_pack_uri(url)?;
    let pack = api::get_starter_pack(session, &pack_uri).await?;
    let list = AtUri::parse(&pack.list.uri)?;
    fetch_list_members(session, &list, paginator).await
}
