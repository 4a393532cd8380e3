use crate::expand::{self, ExpandOptions, ExpandProgressCallback, GraphTables};
use crate::members;
use indicatif::{ProgressBar, ProgressStyle};
use skypull_client::error::{ClientError, Result};
use skypull_client::model::Profile;
use skypull_client::paginate::Paginator;
use skypull_client::session::Session;
use skypull_client::uri;
use std::sync::Arc;
use tracing::info;

/// Options for configuring a pull run
pub struct PullOptions {
    pub urls: Vec<String>,
    pub concurrency: usize,
    /// `None` removes the pagination safeguard entirely.
    pub page_limit: Option<usize>,
    pub dedup_edges: bool,
    pub show_progress_bars: bool,
}

/// Callback for reporting pull progress
pub type PullProgressCallback = Arc<dyn Fn(String) + Send + Sync>;

/// Execute a full pull: resolve every seed URL, gather the member profiles,
/// then expand them into node/edge tables.
///
/// Any seed that fails aborts the whole run; skipping individual seeds is a
/// decision for the caller, made by trimming its URL list and re-running.
pub async fn execute_pull(
    session: &Session,
    options: PullOptions,
    progress_callback: Option<PullProgressCallback>,
) -> Result<GraphTables> {
    let PullOptions {
        urls,
        concurrency,
        page_limit,
        dedup_edges,
        show_progress_bars,
    } = options;

    let paginator = match page_limit {
        Some(limit) => Paginator::new().with_page_limit(limit),
        None => Paginator::new().unbounded(),
    };

    // Membership phase: one profile set per seed URL, concatenated in seed
    // order. Members appearing in several seeds stay duplicated on purpose.
    let mut seeds: Vec<Profile> = Vec::new();
    for (idx, url) in urls.iter().enumerate() {
        if let Some(ref callback) = progress_callback
            && urls.len() > 1
        {
            callback(format!(
                "Fetching members {}/{}: {}",
                idx + 1,
                urls.len(),
                url
            ));
        }

        let members = if uri::is_starter_pack_url(url) {
            members::fetch_starter_pack_members(session, url, &paginator).await?
        } else if uri::is_list_url(url) {
            let list = uri::list_uri(session, url).await?;
            members::fetch_list_members(session, &list, &paginator).await?
        } else {
            return Err(ClientError::InvalidUrl(format!(
                "seed is neither a starter pack nor a list: {url}"
            )));
        };

        info!(url = %url, members = members.len(), "seed resolved");
        seeds.extend(members);
    }

    // Expansion phase, with one bar ticking over seeds.
    let progress_bar = if show_progress_bars {
        let pb = ProgressBar::new(seeds.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.cyan} [{bar:40}] {pos}/{len} {msg}")
                .unwrap(),
        );
        Some(pb)
    } else {
        None
    };

    let progress: Option<ExpandProgressCallback> = progress_bar.clone().map(|pb| {
        Arc::new(move |_done: usize, handle: &str| {
            pb.set_message(handle.to_string());
            pb.inc(1);
        }) as ExpandProgressCallback
    });

    let expand_options = ExpandOptions {
        concurrency,
        paginator,
        progress,
        ..ExpandOptions::default()
    };

    let mut tables = expand::expand(session, seeds, &expand_options).await?;

    if let Some(pb) = progress_bar {
        pb.finish_with_message(format!(
            "{} nodes, {} edges",
            tables.nodes.len(),
            tables.edges.len()
        ));
    }

    if dedup_edges {
        let removed = tables.dedup_edges();
        info!(removed, "deduplicated edge table");
    }

    Ok(tables)
}
