// Dataset export for node/edge tables

use crate::expand::{FollowEdge, GraphTables, NodeRow};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum DatasetFormat {
    Json,
    Csv,
}

impl DatasetFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "json" => Some(DatasetFormat::Json),
            "csv" => Some(DatasetFormat::Csv),
            _ => None,
        }
    }
}

const NODE_COLUMNS: &[&str] = &[
    "did",
    "handle",
    "display_name",
    "description",
    "avatar",
    "banner",
    "followers_count",
    "follows_count",
    "posts_count",
    "created_at",
    "indexed_at",
];

/// Writes the tables under `dir` and returns the paths created:
/// `nodes.csv` + `edges.csv`, or a single `graph.json` carrying both tables
/// plus generator metadata.
pub fn write_tables(
    tables: &GraphTables,
    dir: &Path,
    format: &DatasetFormat,
) -> std::io::Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)?;

    match format {
        DatasetFormat::Csv => {
            let nodes_path = dir.join("nodes.csv");
            let edges_path = dir.join("edges.csv");
            save(&render_nodes_csv(&tables.nodes), &nodes_path)?;
            save(&render_edges_csv(&tables.edges), &edges_path)?;
            Ok(vec![nodes_path, edges_path])
        }
        DatasetFormat::Json => {
            let path = dir.join("graph.json");
            let content = render_json(tables).map_err(std::io::Error::other)?;
            save(&content, &path)?;
            Ok(vec![path])
        }
    }
}

pub fn render_nodes_csv(nodes: &[NodeRow]) -> String {
    let mut out = String::new();
    out.push_str(&NODE_COLUMNS.join(","));
    out.push('\n');

    for node in nodes {
        let fields = [
            Some(node.did.as_str()),
            Some(node.handle.as_str()),
            node.display_name.as_deref(),
            node.description.as_deref(),
            node.avatar.as_deref(),
            node.banner.as_deref(),
        ];
        let counts = [node.followers_count, node.follows_count, node.posts_count];
        let times = [node.created_at.as_deref(), node.indexed_at.as_deref()];

        let mut row: Vec<String> = fields
            .iter()
            .map(|field| csv_field(field.unwrap_or_default()))
            .collect();
        row.extend(counts.iter().map(|count| match count {
            Some(n) => n.to_string(),
            None => String::new(),
        }));
        row.extend(times.iter().map(|time| csv_field(time.unwrap_or_default())));

        out.push_str(&row.join(","));
        out.push('\n');
    }

    out
}

pub fn render_edges_csv(edges: &[FollowEdge]) -> String {
    let mut out = String::from("source,target\n");
    for edge in edges {
        out.push_str(&csv_field(&edge.source));
        out.push(',');
        out.push_str(&csv_field(&edge.target));
        out.push('\n');
    }
    out
}

pub fn render_json(tables: &GraphTables) -> Result<String, serde_json::Error> {
    let report = serde_json::json!({
        "metadata": {
            "generator": "skypull",
            "version": env!("CARGO_PKG_VERSION"),
            "generated_at": chrono::Utc::now().to_rfc3339(),
        },
        "summary": {
            "nodes": tables.nodes.len(),
            "edges": tables.edges.len(),
        },
        "nodes": tables.nodes,
        "edges": tables.edges,
    });

    serde_json::to_string_pretty(&report)
}

fn save(content: &str, path: &Path) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(content.as_bytes())?;
    Ok(())
}

/// Quotes a field when it carries a comma, quote or line break.
fn csv_field(value: &str) -> String {
    if value.contains(['"', ',', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
