use futures::stream::{self, StreamExt, TryStreamExt};
use serde::{Deserialize, Serialize};
use skypull_client::api;
use skypull_client::error::Result;
use skypull_client::model::Profile;
use skypull_client::paginate::{Paginator, select_field};
use skypull_client::session::Session;
use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::info;

/// Page-size hint sent to `app.bsky.graph.getFollows`.
pub const FOLLOWS_PAGE_SIZE: u32 = 30;

/// A flattened profile row. Everything durable from [`Profile`] survives;
/// the session-relative `associated` and `viewer` sub-objects do not.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeRow {
    pub did: String,
    pub handle: String,
    pub display_name: Option<String>,
    pub description: Option<String>,
    pub avatar: Option<String>,
    pub banner: Option<String>,
    pub followers_count: Option<u64>,
    pub follows_count: Option<u64>,
    pub posts_count: Option<u64>,
    pub created_at: Option<String>,
    pub indexed_at: Option<String>,
}

impl From<Profile> for NodeRow {
    fn from(profile: Profile) -> Self {
        Self {
            did: profile.did,
            handle: profile.handle,
            display_name: profile.display_name,
            description: profile.description,
            avatar: profile.avatar,
            banner: profile.banner,
            followers_count: profile.followers_count,
            follows_count: profile.follows_count,
            posts_count: profile.posts_count,
            created_at: profile.created_at,
            indexed_at: profile.indexed_at,
        }
    }
}

/// One observed "source follows target" edge. Raw observation: no weight,
/// no timestamp, and duplicates are kept unless the caller opts into
/// [`GraphTables::dedup_edges`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FollowEdge {
    pub source: String,
    pub target: String,
}

/// The terminal artifacts of a pull: one node row per seed profile and one
/// edge row per observed follow.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GraphTables {
    pub nodes: Vec<NodeRow>,
    pub edges: Vec<FollowEdge>,
}

impl GraphTables {
    /// Removes duplicate (source, target) pairs, keeping first occurrence.
    /// Returns how many rows were dropped. Explicit post-processing; the
    /// expansion itself never deduplicates.
    pub fn dedup_edges(&mut self) -> usize {
        let before = self.edges.len();
        let mut seen = HashSet::new();
        self.edges.retain(|edge| seen.insert(edge.clone()));
        before - self.edges.len()
    }
}

/// Called after each seed finishes: (seeds done so far, seed handle).
pub type ExpandProgressCallback = Arc<dyn Fn(usize, &str) + Send + Sync>;

/// Options for one expansion pass.
pub struct ExpandOptions {
    pub page_size: u32,
    /// Seeds expanded at once. At 1 the pass is fully sequential and row
    /// order is deterministic; above 1 cross-seed order follows completion.
    pub concurrency: usize,
    pub paginator: Paginator,
    pub progress: Option<ExpandProgressCallback>,
}

impl Default for ExpandOptions {
    fn default() -> Self {
        Self {
            page_size: FOLLOWS_PAGE_SIZE,
            concurrency: 1,
            paginator: Paginator::new(),
            progress: None,
        }
    }
}

/// One-hop expansion: for every seed profile, record its flattened node row
/// and one edge per account it follows.
///
/// Followed accounts become edge targets only; they are not fetched or
/// expanded in turn. Callers wanting another hop re-invoke this on the new
/// frontier and own their revisit tracking.
pub async fn expand(
    session: &Session,
    seeds: Vec<Profile>,
    options: &ExpandOptions,
) -> Result<GraphTables> {
    info!(seeds = seeds.len(), concurrency = options.concurrency, "expanding follow graph");

    if options.concurrency > 1 {
        return expand_pooled(session, seeds, options).await;
    }

    let mut tables = GraphTables::default();
    for (idx, seed) in seeds.into_iter().enumerate() {
        let edges = follows_of(session, &seed, options).await?;
        if let Some(ref progress) = options.progress {
            progress(idx + 1, &seed.handle);
        }
        tables.nodes.push(seed.into());
        tables.edges.extend(edges);
    }

    Ok(tables)
}

/// Bounded pool over seeds. Each seed's fetch is independent; the session
/// is shared by reference and never touched. Within one seed's edges page
/// order still holds, across seeds order is completion order.
async fn expand_pooled(
    session: &Session,
    seeds: Vec<Profile>,
    options: &ExpandOptions,
) -> Result<GraphTables> {
    let done = AtomicUsize::new(0);
    let done = &done;

    let results: Vec<(Profile, Vec<FollowEdge>)> = stream::iter(seeds)
        .map(|seed| async move {
            let edges = follows_of(session, &seed, options).await?;
            if let Some(ref progress) = options.progress {
                progress(done.fetch_add(1, Ordering::Relaxed) + 1, &seed.handle);
            }
            Ok::<_, skypull_client::ClientError>((seed, edges))
        })
        .buffer_unordered(options.concurrency)
        .try_collect()
        .await?;

    let mut tables = GraphTables::default();
    for (seed, edges) in results {
        tables.nodes.push(seed.into());
        tables.edges.extend(edges);
    }

    Ok(tables)
}

async fn follows_of(
    session: &Session,
    seed: &Profile,
    options: &ExpandOptions,
) -> Result<Vec<FollowEdge>> {
    let follows: Vec<Profile> = options
        .paginator
        .collect_all(
            |cursor| api::get_follows_page(session, &seed.did, options.page_size, cursor),
            select_field("follows"),
        )
        .await?;

    Ok(follows
        .into_iter()
        .map(|followed| FollowEdge {
            source: seed.did.clone(),
            target: followed.did,
        })
        .collect())
}
