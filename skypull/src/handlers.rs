use anyhow::{Context, Result, bail};
use clap::ArgMatches;
use colored::Colorize;
use skypull_client::session::{DEFAULT_SERVICE, Session};
use skypull_client::uri;
use skypull_core::dataset::{self, DatasetFormat};
use skypull_core::pull::{PullOptions, PullProgressCallback, execute_pull};
use std::path::PathBuf;
use std::sync::Arc;
use url::Url;

/// Pulls the seed URLs out of a newline-delimited file. Lines not starting
/// with `https` (comments, headings, blanks) are ignored.
pub fn parse_seed_lines(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| line.starts_with("https"))
        .map(str::to_string)
        .collect()
}

pub fn load_seed_urls(path: &str) -> Result<Vec<String>> {
    let expanded = shellexpand::tilde(path);
    let content = std::fs::read_to_string(expanded.as_ref())
        .with_context(|| format!("failed to read seeds file {path}"))?;

    let urls = parse_seed_lines(&content);
    if urls.is_empty() {
        bail!("no seed URLs found in {path}");
    }
    Ok(urls)
}

/// Credentials come from the environment, optionally seeded from a `.env`
/// file in the working directory.
pub fn credentials() -> Result<(String, String, String)> {
    dotenv::dotenv().ok();

    let service =
        std::env::var("BSKY_SERVICE").unwrap_or_else(|_| DEFAULT_SERVICE.to_string());
    let user = std::env::var("BSKY_USER")
        .context("BSKY_USER is not set (handle or email of the account)")?;
    let password = std::env::var("BSKY_PASSWORD")
        .context("BSKY_PASSWORD is not set (use an app password)")?;

    Ok((service, user, password))
}

async fn login() -> Result<Session> {
    let (service, user, password) = credentials()?;
    println!("{} Logging in to {}", "→".blue(), service.bright_white());

    let session = Session::login(&service, &user, &password).await?;
    println!(
        "{} Session for {} ({})",
        "✓".green().bold(),
        session.handle().bright_white(),
        session.did()
    );
    Ok(session)
}

pub async fn handle_pull(args: &ArgMatches) -> Result<()> {
    // Initialize tracing for logging
    tracing_subscriber::fmt::init();

    let url = args.get_one::<Url>("url");
    let seeds_file = args.get_one::<String>("seeds-file");
    let output = args.get_one::<String>("output").unwrap();
    let format = args.get_one::<String>("format").unwrap();
    let concurrency = *args.get_one::<usize>("concurrency").unwrap();
    let page_limit = *args.get_one::<usize>("page-limit").unwrap();
    let dedup = args.get_flag("dedup");

    let urls = match (seeds_file, url) {
        (Some(path), _) => load_seed_urls(path)?,
        (None, Some(url)) => vec![url.as_str().to_string()],
        (None, None) => bail!("either --url or --seeds-file must be provided"),
    };

    let format = DatasetFormat::from_str(format)
        .with_context(|| format!("unknown dataset format {format}"))?;

    let session = login().await?;

    println!();
    println!("🕸  Pulling {} seed URL(s)", urls.len());
    println!("Concurrency: {concurrency}");
    match page_limit {
        0 => println!("Page limit: none\n"),
        n => println!("Page limit: {n}\n"),
    }

    let options = PullOptions {
        urls,
        concurrency,
        page_limit: (page_limit > 0).then_some(page_limit),
        dedup_edges: dedup,
        show_progress_bars: true,
    };

    let progress_callback: PullProgressCallback = Arc::new(|msg: String| {
        println!("{}", msg);
    });

    let tables = execute_pull(&session, options, Some(progress_callback)).await?;

    println!();
    println!("{} Pull complete!", "✓".green().bold());
    println!("  Nodes: {}", tables.nodes.len().to_string().cyan());
    println!("  Edges: {}", tables.edges.len().to_string().cyan());

    let dir = PathBuf::from(shellexpand::tilde(output).as_ref());
    let paths = dataset::write_tables(&tables, &dir, &format)
        .with_context(|| format!("failed to write datasets under {}", dir.display()))?;

    println!();
    for path in paths {
        println!(
            "{} {}",
            "✓".green().bold(),
            path.display().to_string().bright_white()
        );
    }

    Ok(())
}

pub async fn handle_resolve(args: &ArgMatches) -> Result<()> {
    let url = args.get_one::<String>("URL").unwrap();

    if uri::is_starter_pack_url(url) {
        println!("{}", uri::starter_pack_uri(url)?);
    } else if uri::is_list_url(url) {
        // list URLs need one identity lookup, which needs a session
        let session = login().await?;
        println!("{}", uri::list_uri(&session, url).await?);
    } else {
        bail!("URL is neither a starter pack nor a list: {url}");
    }

    Ok(())
}
